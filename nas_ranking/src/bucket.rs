use crate::config::{Bucket, CellValue};

/// An inclusive range of values, per bucket.
type BucketRanges = [(Bucket, f64, f64); 3];

// Forced ranking: 1 is the best.
const FORCED_RANK_RANGES: BucketRanges = [
    (Bucket::Most, 1.0, 3.0),
    (Bucket::Neutral, 4.0, 5.0),
    (Bucket::Least, 6.0, 8.0),
];

// Likert: 5 is the best.
const LIKERT_RANGES: BucketRanges = [
    (Bucket::Most, 4.0, 5.0),
    (Bucket::Neutral, 3.0, 3.0),
    (Bucket::Least, 1.0, 2.0),
];

// The first keyword found wins. Phrases come before the single words they contain,
// so that "least beneficial" is never read as "beneficial".
const TEXT_KEYWORDS: [(&str, Bucket); 7] = [
    ("most beneficial", Bucket::Most),
    ("least beneficial", Bucket::Least),
    ("most", Bucket::Most),
    ("beneficial", Bucket::Most),
    ("neutral", Bucket::Neutral),
    ("neither", Bucket::Neutral),
    ("least", Bucket::Least),
];

fn ranges_for_scale(scale_max: i64) -> Option<&'static BucketRanges> {
    if scale_max >= 8 {
        Some(&FORCED_RANK_RANGES)
    } else if scale_max == 5 {
        Some(&LIKERT_RANGES)
    } else {
        None
    }
}

/// Classifies a numeric response given the maximum of the scale it was recorded on.
///
/// Scales of 8 or more are forced rankings, a scale of 5 is a Likert scale. Any other
/// scale is not supported and all its values are left unclassified.
pub fn bucketize_numeric(value: Option<f64>, scale_max: i64) -> Option<Bucket> {
    let x = value?;
    let ranges = ranges_for_scale(scale_max)?;
    ranges
        .iter()
        .find(|(_, low, high)| *low <= x && x <= *high)
        .map(|(b, _, _)| *b)
}

/// Classifies a free-text response by keyword.
///
/// Explicit non-responses ("did not take ...", "n/a") are left unclassified.
pub fn bucketize_text(value: &str) -> Option<Bucket> {
    let text = value.trim().to_lowercase();
    if text.is_empty() || text.contains("did not take") || text == "n/a" {
        return None;
    }
    TEXT_KEYWORDS
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, b)| *b)
}

/// Same as [bucketize_text], for a cell of a table.
pub fn bucketize_cell(cell: &CellValue) -> Option<Bucket> {
    cell.as_text().and_then(|s| bucketize_text(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_rank_scale() {
        assert_eq!(bucketize_numeric(Some(1.0), 8), Some(Bucket::Most));
        assert_eq!(bucketize_numeric(Some(3.0), 8), Some(Bucket::Most));
        assert_eq!(bucketize_numeric(Some(4.0), 8), Some(Bucket::Neutral));
        assert_eq!(bucketize_numeric(Some(5.0), 8), Some(Bucket::Neutral));
        assert_eq!(bucketize_numeric(Some(6.0), 8), Some(Bucket::Least));
        assert_eq!(bucketize_numeric(Some(8.0), 8), Some(Bucket::Least));
        assert_eq!(bucketize_numeric(Some(9.0), 8), None);
        assert_eq!(bucketize_numeric(Some(0.0), 8), None);
        // Between two ranges
        assert_eq!(bucketize_numeric(Some(3.5), 8), None);
        // Larger scales reuse the forced ranking table.
        assert_eq!(bucketize_numeric(Some(2.0), 10), Some(Bucket::Most));
    }

    #[test]
    fn likert_scale() {
        assert_eq!(bucketize_numeric(Some(5.0), 5), Some(Bucket::Most));
        assert_eq!(bucketize_numeric(Some(4.0), 5), Some(Bucket::Most));
        assert_eq!(bucketize_numeric(Some(3.0), 5), Some(Bucket::Neutral));
        assert_eq!(bucketize_numeric(Some(2.0), 5), Some(Bucket::Least));
        assert_eq!(bucketize_numeric(Some(1.0), 5), Some(Bucket::Least));
    }

    #[test]
    fn unsupported_scales() {
        for x in 1..=8 {
            assert_eq!(bucketize_numeric(Some(x as f64), 7), None);
            assert_eq!(bucketize_numeric(Some(x as f64), 4), None);
        }
        assert_eq!(bucketize_numeric(None, 8), None);
    }

    #[test]
    fn text_keywords() {
        assert_eq!(bucketize_text("Most Beneficial"), Some(Bucket::Most));
        assert_eq!(bucketize_text("  most  "), Some(Bucket::Most));
        assert_eq!(bucketize_text("Neutral"), Some(Bucket::Neutral));
        assert_eq!(bucketize_text("neither great nor bad"), Some(Bucket::Neutral));
        assert_eq!(bucketize_text("Least"), Some(Bucket::Least));
    }

    #[test]
    fn text_non_responses() {
        assert_eq!(bucketize_text("N/A"), None);
        assert_eq!(bucketize_text("did not take this course"), None);
        assert_eq!(bucketize_text("I did not take it, but most people liked it"), None);
        assert_eq!(bucketize_text("   "), None);
        assert_eq!(bucketize_text("no opinion"), None);
    }

    #[test]
    fn text_phrases_before_words() {
        assert_eq!(bucketize_text("Least Beneficial"), Some(Bucket::Least));
        assert_eq!(bucketize_text("Beneficial"), Some(Bucket::Most));
        // "most" is checked before "least".
        assert_eq!(bucketize_text("neither most nor least"), Some(Bucket::Most));
        // "n/a" must be the whole answer to count as a non-response.
        assert_eq!(bucketize_text("n/a - least"), Some(Bucket::Least));
    }

    #[test]
    fn cells() {
        assert_eq!(bucketize_cell(&CellValue::Empty), None);
        assert_eq!(
            bucketize_cell(&CellValue::Text("MOST".to_string())),
            Some(Bucket::Most)
        );
        assert_eq!(bucketize_cell(&CellValue::Number(5.0)), None);
    }
}
