use crate::survey::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_CSV_FILE_NAME: &str = "rank_order.csv";
pub const DEFAULT_CHART_FILE_NAME: &str = "rank_order.vl.json";

/// The settings that can be stored in a JSON file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "dataFile")]
    pub data_file: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "worksheets")]
    pub worksheets: Option<Vec<String>>,
    #[serde(rename = "csvFileName")]
    pub csv_file_name: Option<String>,
    #[serde(rename = "chartFileName")]
    pub chart_file_name: Option<String>,
    pub year: Option<String>,
}

/// The settings of a run, once the command line, the configuration file and the defaults
/// have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    /// The input file requested by the user, if any. Relative to the data directory.
    pub data_file: Option<String>,
    pub output_dir: PathBuf,
    pub worksheets: Vec<String>,
    pub csv_file_name: String,
    pub chart_file_name: String,
    pub year: Option<String>,
    pub reference: Option<PathBuf>,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(ReadingFileSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

// Blank values count as not provided.
fn non_blank(s: &Option<String>) -> Option<String> {
    s.as_ref()
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
}

/// Merges the command line arguments with the (optional) configuration file.
///
/// The command line has precedence. The relative paths of the configuration file are
/// resolved against the directory of that file.
pub fn resolve_settings(args: &Args, config: &SurveyConfig, config_root: &Path) -> RunSettings {
    let from_config = |p: &Option<String>| non_blank(p).map(|s| config_root.join(s));

    let data_dir = non_blank(&args.data_dir)
        .map(PathBuf::from)
        .or_else(|| from_config(&config.data_directory))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let output_dir = non_blank(&args.out_dir)
        .map(PathBuf::from)
        .or_else(|| from_config(&config.output_directory))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    RunSettings {
        data_dir,
        data_file: non_blank(&args.input).or_else(|| non_blank(&config.data_file)),
        output_dir,
        worksheets: args
            .worksheet
            .clone()
            .or_else(|| config.worksheets.clone())
            .unwrap_or_default(),
        csv_file_name: non_blank(&config.csv_file_name)
            .unwrap_or_else(|| DEFAULT_CSV_FILE_NAME.to_string()),
        chart_file_name: non_blank(&config.chart_file_name)
            .unwrap_or_else(|| DEFAULT_CHART_FILE_NAME.to_string()),
        year: non_blank(&args.year).or_else(|| non_blank(&config.year)),
        reference: non_blank(&args.reference).map(PathBuf::from),
    }
}

pub fn load_settings(args: &Args) -> SurveyResult<RunSettings> {
    match non_blank(&args.config) {
        Some(config_path) => {
            let config = read_config(&config_path)?;
            info!("config: {:?}", config);
            let config_root: PathBuf = Path::new(&config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            Ok(resolve_settings(args, &config, &config_root))
        }
        None => Ok(resolve_settings(
            args,
            &SurveyConfig::default(),
            Path::new(""),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = load_settings(&Args::default()).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.output_dir, PathBuf::from("outputs"));
        assert_eq!(s.data_file, None);
        assert!(s.worksheets.is_empty());
        assert_eq!(s.csv_file_name, "rank_order.csv");
        assert_eq!(s.chart_file_name, "rank_order.vl.json");
    }

    #[test]
    fn blank_input_is_ignored() {
        let args = Args {
            input: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(load_settings(&args).unwrap().data_file, None);
    }

    #[test]
    fn config_file_is_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("survey.json");
        fs::write(
            &config_path,
            r#"{
                "dataDirectory": "surveys",
                "dataFile": "ranking_2022.xlsx",
                "outputDirectory": "out",
                "worksheets": ["Sheet1", "Sheet2"],
                "chartFileName": "chart.json"
            }"#,
        )
        .unwrap();
        let args = Args {
            config: Some(config_path.display().to_string()),
            out_dir: Some("elsewhere".to_string()),
            ..Default::default()
        };
        let s = load_settings(&args).unwrap();
        assert_eq!(s.data_dir, dir.path().join("surveys"));
        assert_eq!(s.data_file, Some("ranking_2022.xlsx".to_string()));
        // The command line wins.
        assert_eq!(s.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(s.worksheets, vec!["Sheet1".to_string(), "Sheet2".to_string()]);
        assert_eq!(s.csv_file_name, "rank_order.csv");
        assert_eq!(s.chart_file_name, "chart.json");
    }

    #[test]
    fn bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("survey.json");
        fs::write(&config_path, "{ not json").unwrap();
        let args = Args {
            config: Some(config_path.display().to_string()),
            ..Default::default()
        };
        assert!(matches!(
            load_settings(&args),
            Err(SurveyError::ParsingJson { .. })
        ));
    }
}
