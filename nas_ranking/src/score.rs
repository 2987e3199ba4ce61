use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::{Bucket, CourseSummary, Observation};

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
struct BucketCounts {
    most: u64,
    neutral: u64,
    least: u64,
}

impl BucketCounts {
    fn add(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Most => self.most += 1,
            Bucket::Neutral => self.neutral += 1,
            Bucket::Least => self.least += 1,
        }
    }

    fn total(&self) -> u64 {
        self.most + self.neutral + self.least
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    (count as f64) / (total as f64) * 100.0
}

// Higher NAS first, then higher share of "most", then more responses.
fn ranking_order(a: &CourseSummary, b: &CourseSummary) -> Ordering {
    b.nas
        .total_cmp(&a.nas)
        .then_with(|| b.pct_most.total_cmp(&a.pct_most))
        .then_with(|| b.n_total.cmp(&a.n_total))
}

/// Aggregates the observations into the final ranking table.
///
/// Courses are grouped by name. Courses without any observation do not appear. The sort
/// is stable over the course names, which makes the output fully deterministic.
pub fn score(observations: &[Observation]) -> Vec<CourseSummary> {
    let mut counts: BTreeMap<&str, BucketCounts> = BTreeMap::new();
    for obs in observations.iter() {
        counts.entry(obs.course.as_str()).or_default().add(obs.bucket);
    }
    debug!("score: {} courses: {:?}", counts.len(), counts);

    let mut rows: Vec<CourseSummary> = counts
        .into_iter()
        .filter(|(_, c)| c.total() > 0)
        .map(|(course, c)| {
            let n_total = c.total();
            let pct_most = percentage(c.most, n_total);
            let pct_least = percentage(c.least, n_total);
            CourseSummary {
                rank: 0,
                course: course.to_string(),
                n_total,
                n_most: c.most,
                n_neutral: c.neutral,
                n_least: c.least,
                pct_most,
                pct_least,
                nas: pct_most - pct_least,
            }
        })
        .collect();

    rows.sort_by(ranking_order);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = (idx + 1) as u32;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations(course: &str, most: usize, neutral: usize, least: usize) -> Vec<Observation> {
        let mut res = Vec::new();
        res.extend(std::iter::repeat(Observation::new(course, Bucket::Most)).take(most));
        res.extend(std::iter::repeat(Observation::new(course, Bucket::Neutral)).take(neutral));
        res.extend(std::iter::repeat(Observation::new(course, Bucket::Least)).take(least));
        res
    }

    #[test]
    fn net_approval_score() {
        let rows = score(&observations("ACC 101", 6, 2, 2));
        assert_eq!(
            rows,
            vec![CourseSummary {
                rank: 1,
                course: "ACC 101".to_string(),
                n_total: 10,
                n_most: 6,
                n_neutral: 2,
                n_least: 2,
                pct_most: 60.0,
                pct_least: 20.0,
                nas: 40.0,
            }]
        );
    }

    #[test]
    fn ties_broken_by_total() {
        let mut obs = observations("B", 3, 1, 1);
        obs.extend(observations("A", 6, 2, 2));
        let rows = score(&obs);
        assert_eq!(rows[0].course, "A");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].course, "B");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[0].nas, rows[1].nas);
    }

    #[test]
    fn ties_broken_by_pct_most() {
        // Same NAS (0), different share of "most".
        let mut obs = observations("Calm", 0, 4, 0);
        obs.extend(observations("Split", 2, 0, 2));
        let rows = score(&obs);
        let names: Vec<&str> = rows.iter().map(|r| r.course.as_str()).collect();
        assert_eq!(names, vec!["Split", "Calm"]);
    }

    #[test]
    fn ranking_is_by_nas() {
        let mut obs = observations("Low", 0, 1, 3);
        obs.extend(observations("High", 4, 0, 0));
        obs.extend(observations("Mid", 2, 1, 1));
        let rows = score(&obs);
        let names: Vec<(u32, &str)> = rows.iter().map(|r| (r.rank, r.course.as_str())).collect();
        assert_eq!(names, vec![(1, "High"), (2, "Mid"), (3, "Low")]);
        assert_eq!(rows[2].nas, -75.0);
    }

    #[test]
    fn independent_of_row_order() {
        let mut obs = observations("A", 2, 1, 1);
        obs.extend(observations("B", 1, 1, 2));
        let mut rev = obs.clone();
        rev.reverse();
        assert_eq!(score(&obs), score(&rev));
    }

    #[test]
    fn no_observations() {
        assert!(score(&[]).is_empty());
    }
}
