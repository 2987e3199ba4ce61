// Primitives for reading survey CSV files and writing the ranking table.

use serde::Serialize;

use crate::survey::*;

/// Reads a CSV export of a survey. The first line is the header.
///
/// Lines may have different lengths: missing fields are empty responses.
pub fn read_csv_table(path: &str) -> SurveyResult<NormalizedTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(OpeningCsvSnafu { path })?
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            if s.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                s.to_string()
            }
        })
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let line = line_r.context(OpeningCsvSnafu { path })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", idx + 2, line);
        let row: Vec<CellValue> = line
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(s.to_string())
                }
            })
            .collect();
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    let raw = RawTable::from_rows(&header, &rows);
    ensure!(!raw.is_empty(), NoSheetsSnafu { path });
    Ok(normalize(&raw))
}

// One line of the ranking table, in output order.
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    rank: u32,
    course: &'a str,
    n_total: u64,
    n_most: u64,
    n_neutral: u64,
    n_least: u64,
    pct_most: f64,
    pct_least: f64,
    nas: f64,
}

impl<'a> From<&'a CourseSummary> for SummaryRecord<'a> {
    fn from(row: &'a CourseSummary) -> Self {
        SummaryRecord {
            rank: row.rank,
            course: row.course.as_str(),
            n_total: row.n_total,
            n_most: row.n_most,
            n_neutral: row.n_neutral,
            n_least: row.n_least,
            pct_most: row.pct_most,
            pct_least: row.pct_least,
            nas: row.nas,
        }
    }
}

/// Writes the ranking table, one line per course, in ranking order.
pub fn write_summary_csv(path: &Path, summary: &[CourseSummary]) -> SurveyResult<()> {
    let p = path_str(path);
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path: p.clone() })?;
    for row in summary.iter() {
        wtr.serialize(SummaryRecord::from(row))
            .context(WritingCsvSnafu { path: p.clone() })?;
    }
    wtr.flush().context(WritingFileSnafu { path: p })?;
    Ok(())
}
