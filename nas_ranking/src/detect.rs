use log::{debug, info};
use std::collections::HashSet;

use crate::bucket::{bucketize_cell, bucketize_numeric};
use crate::config::*;
use crate::table::{Column, NormalizedTable};

/// A detection strategy. Returns None (or an empty list) when it does not apply.
type Strategy = fn(&NormalizedTable, &mut DetectionReport) -> Option<Vec<Observation>>;

// Tried in this order. The first one that produces observations wins.
const STRATEGIES: [(&str, Strategy); 3] = [
    ("wide numeric", detect_wide_numeric),
    ("long form course/rank", detect_long_form),
    ("bucketed text", detect_bucketed_text),
];

/// Finds the representation used by the table and extracts all the classified responses.
///
/// The strategies are not merged: only the observations of the first strategy that applies
/// are returned.
pub fn detect(table: &NormalizedTable) -> Result<Vec<Observation>, RankingError> {
    let mut report = DetectionReport {
        num_rows: table.num_rows(),
        num_columns: table.columns().len(),
        has_course_column: table.column(COURSE_COLUMN).is_some(),
        ..Default::default()
    };
    for (name, strategy) in STRATEGIES.iter() {
        match strategy(table, &mut report) {
            Some(obs) if !obs.is_empty() => {
                info!(
                    "detect: using strategy {:?} ({} observations)",
                    name,
                    obs.len()
                );
                return Ok(obs);
            }
            _ => {
                debug!("detect: strategy {:?} does not apply", name);
            }
        }
    }
    Err(RankingError::SchemaDetection(report))
}

// A numeric column that passed the rank checks.
struct RankColumn<'a> {
    column: &'a Column,
    values: Vec<Option<f64>>,
    scale_max: i64,
}

fn valid_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().cloned().collect()
}

// Most of the values must be small integers.
fn looks_like_ranks(valid: &[f64]) -> bool {
    if valid.is_empty() {
        return false;
    }
    let in_range = valid
        .iter()
        .filter(|x| (RANK_VALUE_MIN..=RANK_VALUE_MAX).contains(*x))
        .count();
    (in_range as f64) / (valid.len() as f64) >= RANK_RANGE_SHARE
}

fn distinct_count(valid: &[f64]) -> usize {
    valid
        .iter()
        .map(|x| if *x == 0.0 { 0 } else { x.to_bits() })
        .collect::<HashSet<u64>>()
        .len()
}

fn scale_of(valid: &[f64]) -> i64 {
    valid.iter().cloned().fold(f64::MIN, f64::max).round() as i64
}

fn has_any(name: &str, hints: &[&str]) -> bool {
    hints.iter().any(|h| name.contains(h))
}

fn is_course_column(name: &str) -> bool {
    has_any(name, &["course", "program"])
}

fn is_rank_column(name: &str) -> bool {
    has_any(name, &["rank", "rating"]) || name.starts_with('q')
}

/// One numeric column per course, the column name being the course.
fn detect_wide_numeric(
    table: &NormalizedTable,
    report: &mut DetectionReport,
) -> Option<Vec<Observation>> {
    let mut candidates: Vec<RankColumn> = Vec::new();
    for column in table.columns() {
        let values = column.numeric();
        let valid = valid_values(&values);
        if valid.is_empty() {
            continue;
        }
        if !looks_like_ranks(&valid) {
            debug!(
                "detect_wide_numeric: {:?}: values out of the rank range",
                column.name
            );
            continue;
        }
        if distinct_count(&valid) < MIN_DISTINCT_RANKS {
            debug!(
                "detect_wide_numeric: {:?}: too few distinct values",
                column.name
            );
            continue;
        }
        let scale_max = scale_of(&valid);
        candidates.push(RankColumn {
            column,
            values,
            scale_max,
        });
    }
    report.numeric_columns = candidates.len();

    // When some of the columns are clearly about courses, the others are dropped.
    let (hinted, others): (Vec<RankColumn>, Vec<RankColumn>) = candidates
        .into_iter()
        .partition(|rc| has_any(&rc.column.name, &COURSE_COLUMN_HINTS));
    let selected = if hinted.is_empty() { others } else { hinted };
    if selected.is_empty() {
        return None;
    }
    info!(
        "detect_wide_numeric: detected {} numeric ranking columns: {:?}",
        selected.len(),
        selected
            .iter()
            .map(|rc| rc.column.name.as_str())
            .collect::<Vec<&str>>()
    );

    let mut res: Vec<Observation> = Vec::new();
    for rc in selected.iter() {
        for v in rc.values.iter() {
            if let Some(bucket) = bucketize_numeric(*v, rc.scale_max) {
                res.push(Observation::new(&rc.column.name, bucket));
            }
        }
    }
    Some(res)
}

/// A column with the course names and a column with the rank given to this course.
fn detect_long_form(
    table: &NormalizedTable,
    report: &mut DetectionReport,
) -> Option<Vec<Observation>> {
    let course_cols: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| is_course_column(&c.name))
        .collect();
    let rank_cols: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| is_rank_column(&c.name))
        .collect();

    for ccol in course_cols.iter() {
        for rcol in rank_cols.iter() {
            report.course_rank_pairs += 1;
            let values = rcol.numeric();
            let valid = valid_values(&values);
            if !looks_like_ranks(&valid) {
                debug!(
                    "detect_long_form: {:?} + {:?}: not a rank column",
                    ccol.name, rcol.name
                );
                continue;
            }
            let scale_max = scale_of(&valid);
            let res: Vec<Observation> = ccol
                .cells
                .iter()
                .zip(values.iter())
                .filter_map(|(cell, v)| {
                    let course = cell.as_text()?;
                    let course = course.trim();
                    if course.is_empty() {
                        return None;
                    }
                    let bucket = bucketize_numeric(*v, scale_max)?;
                    Some(Observation::new(course, bucket))
                })
                .collect();
            if !res.is_empty() {
                info!(
                    "detect_long_form: detected long-form ranking columns: {} + {} (scale {})",
                    ccol.name, rcol.name, scale_max
                );
                return Some(res);
            }
        }
    }
    None
}

/// Free-text answers (Most / Neutral / Least), next to a `course` column.
fn detect_bucketed_text(
    table: &NormalizedTable,
    report: &mut DetectionReport,
) -> Option<Vec<Observation>> {
    let course_col = table.column(COURSE_COLUMN);
    for col in table
        .columns()
        .iter()
        .filter(|c| has_any(&c.name, &TEXT_COLUMN_HINTS))
    {
        report.text_columns += 1;
        let buckets: Vec<Option<Bucket>> = col.cells.iter().map(bucketize_cell).collect();
        let num_classified = buckets.iter().flatten().count();
        if num_classified < MIN_TEXT_RESPONSES {
            debug!(
                "detect_bucketed_text: {:?}: only {} classified responses",
                col.name, num_classified
            );
            continue;
        }
        let course_col = match course_col {
            Some(c) => c,
            None => {
                debug!(
                    "detect_bucketed_text: {:?}: no {:?} column to pair with",
                    col.name, COURSE_COLUMN
                );
                continue;
            }
        };
        let res: Vec<Observation> = course_col
            .cells
            .iter()
            .zip(buckets.iter())
            .filter_map(|(cell, bucket)| {
                let course = cell.as_text()?;
                let course = course.trim();
                if course.is_empty() {
                    return None;
                }
                bucket.map(|b| Observation::new(course, b))
            })
            .collect();
        if !res.is_empty() {
            info!(
                "detect_bucketed_text: detected bucketed text in {:?} with explicit course column",
                col.name
            );
            return Some(res);
        }
    }
    None
}
