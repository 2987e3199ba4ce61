mod bucket;
mod config;
mod detect;
pub mod manual;
mod score;
mod table;

use log::info;

pub use crate::bucket::{bucketize_cell, bucketize_numeric, bucketize_text};
pub use crate::config::*;
pub use crate::detect::detect;
pub use crate::score::score;
pub use crate::table::{
    normalize, normalize_name, Column, NormalizedTable, RawTable, UNNAMED_COLUMN,
};

/// Produces the Net Approval Score ranking of a survey table.
///
/// Arguments:
/// * `table` the survey responses, with normalized column names. Use [normalize] to
/// build it from the raw columns of a sheet.
///
/// Fails if the shape of the table is not recognized, or if no course receives any
/// classified response.
pub fn rank_courses(table: &NormalizedTable) -> Result<Vec<CourseSummary>, RankingError> {
    info!(
        "rank_courses: processing a table with {} rows and {} columns",
        table.num_rows(),
        table.columns().len()
    );
    let observations = detect(table)?;
    let summary = score(&observations);
    if summary.is_empty() {
        return Err(RankingError::EmptySummary);
    }
    for row in summary.iter() {
        info!(
            "{:>3} {:>8.2} {} ({} responses)",
            row.rank, row.nas, row.course, row.n_total
        );
    }
    Ok(summary)
}
