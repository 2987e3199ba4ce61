// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of a single cell in a survey table.
///
/// Loaders are expected to map their native cell types onto these three states.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// A missing response, or any content that carries no value (errors, blanks).
    Empty,
}

impl CellValue {
    /// Coerces the cell to a number.
    ///
    /// Text is parsed after trimming. Anything that does not produce a finite number
    /// is treated as missing.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            CellValue::Number(x) => *x,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        if x.is_finite() {
            Some(x)
        } else {
            None
        }
    }

    /// The textual form of the cell, or None if the cell is missing.
    ///
    /// Integral numbers are written without a fractional part.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Number(x) if x.fract() == 0.0 && x.abs() < 1e15 => {
                Some(format!("{}", *x as i64))
            }
            CellValue::Number(x) => Some(x.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Number(x)
    }
}

/// The three-way normalized classification of a single response.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Bucket {
    Most,
    Neutral,
    Least,
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Most => "most",
            Bucket::Neutral => "neutral",
            Bucket::Least => "least",
        }
    }
}

/// One normalized data point contributed by a single survey response.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Observation {
    pub course: String,
    pub bucket: Bucket,
}

impl Observation {
    pub fn new(course: &str, bucket: Bucket) -> Observation {
        Observation {
            course: course.to_string(),
            bucket,
        }
    }
}

// ******** Output data structures *********

/// One row of the final ranking table.
#[derive(PartialEq, Debug, Clone)]
pub struct CourseSummary {
    /// 1-based position in the ranking.
    pub rank: u32,
    pub course: String,
    pub n_total: u64,
    pub n_most: u64,
    pub n_neutral: u64,
    pub n_least: u64,
    pub pct_most: f64,
    pub pct_least: f64,
    /// Net Approval Score: pct_most - pct_least
    pub nas: f64,
}

/// What the detector looked at before giving up.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DetectionReport {
    pub num_rows: usize,
    pub num_columns: usize,
    /// Columns that looked like per-course numeric rankings.
    pub numeric_columns: usize,
    /// Number of (course column, rank column) pairs that were tried.
    pub course_rank_pairs: usize,
    /// Number of free-text columns that were tried.
    pub text_columns: usize,
    pub has_course_column: bool,
}

/// Errors that prevent a ranking from being produced.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingError {
    /// None of the detection strategies recognized the shape of the table.
    SchemaDetection(DetectionReport),
    /// Detection succeeded but no course survived the aggregation.
    EmptySummary,
}

impl Error for RankingError {}

impl Display for RankingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingError::SchemaDetection(report) => write!(
                f,
                "Could not detect ranking fields. Expected either: (1) per-course numeric ranking \
                 columns, (2) a course column plus numeric rank/rating column, or (3) bucketed \
                 Most/Neutral/Least responses with a 'course' column. \
                 The table has {} rows and {} columns; tried {} numeric ranking columns, \
                 {} course/rank column pairs and {} text columns (course column present: {}).",
                report.num_rows,
                report.num_columns,
                report.numeric_columns,
                report.course_rank_pairs,
                report.text_columns,
                report.has_course_column
            ),
            RankingError::EmptySummary => {
                write!(f, "No course received any classified response")
            }
        }
    }
}

// ********* Heuristics **********

// Rank values are expected to be small integers.
pub(crate) const RANK_VALUE_MIN: f64 = 1.0;
pub(crate) const RANK_VALUE_MAX: f64 = 8.0;
/// Minimum share of valid values that must fall in the rank range.
pub(crate) const RANK_RANGE_SHARE: f64 = 0.7;
/// Below this, a numeric column is considered boolean-like or constant.
pub(crate) const MIN_DISTINCT_RANKS: usize = 3;
/// Below this, a text column is considered noise.
pub(crate) const MIN_TEXT_RESPONSES: usize = 5;

/// Name fragments that mark a numeric column as a course ranking.
pub const COURSE_COLUMN_HINTS: [&str; 7] = [
    "rank",
    "beneficial",
    "course",
    "program",
    "acc",
    "q84",
    "preparation",
];

/// Name fragments that mark a column as holding free-text bucket responses.
pub const TEXT_COLUMN_HINTS: [&str; 5] = ["beneficial", "preference", "rank", "rating", "course"];

/// The column holding course names for free-text responses.
pub const COURSE_COLUMN: &str = "course";
