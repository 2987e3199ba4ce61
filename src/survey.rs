use log::{debug, info, warn};

use nas_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::io_chart::write_chart;
use crate::survey::io_common::{infer_year, path_str, pick_data_file};
use crate::survey::io_csv::{read_csv_table, write_summary_csv};
use crate::survey::io_excel::read_workbook;

pub mod config_reader;
mod io_chart;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Error reading worksheet {sheet:?} of {path}"))]
    ReadingWorksheet {
        source: calamine::Error,
        path: String,
        sheet: String,
    },
    #[snafu(display("Worksheet {sheet:?} not found in {path} (available: {available:?})"))]
    MissingWorksheet {
        path: String,
        sheet: String,
        available: Vec<String>,
    },
    #[snafu(display("No non-empty sheets found in {path}"))]
    NoSheets { path: String },
    #[snafu(display("Error reading CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("DATA_FILE was set but not found: {path}"))]
    DataFileNotFound { path: String },
    #[snafu(display("No .xlsx files found in {path}. Add one year of data in this directory."))]
    NoDataFiles { path: String },
    #[snafu(display("Invalid search pattern {pattern:?}"))]
    SearchPattern {
        source: glob::PatternError,
        pattern: String,
    },
    #[snafu(display("{source}"))]
    Ranking { source: RankingError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn read_survey_table(path: &Path, worksheets: &[String]) -> SurveyResult<NormalizedTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let p = path_str(path);
    info!("Attempting to read survey file {:?}", p);
    match extension.as_deref() {
        Some("csv") => {
            if !worksheets.is_empty() {
                warn!("read_survey_table: worksheets {:?} ignored for a CSV file", worksheets);
            }
            read_csv_table(&p)
        }
        _ => read_workbook(&p, worksheets),
    }
}

fn check_reference(produced_path: &Path, reference_path: &Path) -> SurveyResult<()> {
    let produced = fs::read_to_string(produced_path).context(ReadingFileSnafu {
        path: path_str(produced_path),
    })?;
    let reference = fs::read_to_string(reference_path).context(ReadingFileSnafu {
        path: path_str(reference_path),
    })?;
    // Line endings are not significant.
    let produced: Vec<&str> = produced.lines().collect();
    let reference: Vec<&str> = reference.lines().collect();
    if produced != reference {
        warn!("Found differences with the reference ranking");
        print_diff(&reference.join("\n"), &produced.join("\n"), "\n");
        whatever!(
            "Difference detected between the produced ranking {} and the reference {}",
            produced_path.display(),
            reference_path.display()
        )
    }
    info!("The ranking matches the reference {}", reference_path.display());
    Ok(())
}

/// Runs the full pipeline: finds the survey file, loads it, ranks the courses and writes
/// the ranking table and the chart.
pub fn run_ranking(args: &Args) -> SurveyResult<Vec<CourseSummary>> {
    let settings = load_settings(args)?;
    info!("settings: {:?}", settings);

    let data_file: PathBuf = pick_data_file(&settings.data_dir, settings.data_file.as_deref())?;
    let table = read_survey_table(&data_file, &settings.worksheets)?;
    debug!("run_ranking: columns: {:?}", table.names());

    let summary = rank_courses(&table).context(RankingSnafu {})?;

    fs::create_dir_all(&settings.output_dir).context(WritingFileSnafu {
        path: path_str(&settings.output_dir),
    })?;
    let csv_path = settings.output_dir.join(&settings.csv_file_name);
    let chart_path = settings.output_dir.join(&settings.chart_file_name);

    write_summary_csv(&csv_path, &summary)?;
    let year = settings.year.clone().or_else(|| infer_year(&data_file));
    write_chart(&chart_path, &summary, year.as_deref())?;

    info!("Wrote ranking table: {}", csv_path.display());
    info!("Wrote figure: {}", chart_path.display());

    if let Some(reference_path) = &settings.reference {
        check_reference(&csv_path, reference_path)?;
    }
    Ok(summary)
}
