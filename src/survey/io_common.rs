use crate::survey::*;

use regex::Regex;

pub fn path_str(path: &Path) -> String {
    path.display().to_string()
}

/// Finds the survey file to process.
///
/// A requested file is resolved against the data directory when it is relative, and must
/// exist. Otherwise, the first .xlsx file of the data directory (in name order) is used.
pub fn pick_data_file(data_dir: &Path, requested: Option<&str>) -> SurveyResult<PathBuf> {
    if let Some(requested) = requested {
        let mut candidate = PathBuf::from(requested);
        if !candidate.is_absolute() {
            candidate = data_dir.join(candidate);
        }
        ensure!(
            candidate.exists(),
            DataFileNotFoundSnafu {
                path: path_str(&candidate)
            }
        );
        info!("Using DATA_FILE override: {}", candidate.display());
        return Ok(candidate);
    }

    let pattern = format!(
        "{}/*.xlsx",
        glob::Pattern::escape(&path_str(data_dir))
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .context(SearchPatternSnafu {
            pattern: pattern.clone(),
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    debug!("pick_data_file: candidates: {:?}", files);
    let first = files.into_iter().next().context(NoDataFilesSnafu {
        path: path_str(data_dir),
    })?;
    info!(
        "No DATA_FILE override provided. Using first file: {}",
        first.display()
    );
    Ok(first)
}

/// The survey year, as found in the name of the file (2000-2099).
pub fn infer_year(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let re = Regex::new(r"(20\d{2})").ok()?;
    re.captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
