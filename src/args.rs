use clap::Parser;

/// This program ranks courses by Net Approval Score, from survey workbooks of any shape.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the run. The relative paths it
    /// contains are resolved against the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The survey workbook (.xlsx, .xls, .ods) or CSV file to process.
    /// A relative path is resolved against the data directory. If not provided, the first
    /// .xlsx file of the data directory is used.
    #[clap(short, long, value_parser, env = "DATA_FILE")]
    pub input: Option<String>,

    /// (directory, default 'data') The directory where the survey workbooks are looked for.
    #[clap(long, value_parser)]
    pub data_dir: Option<String>,

    /// (directory, default 'outputs') The directory where the ranking table and the chart
    /// are written.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (optional, repeatable) When using an Excel file, restricts the processing to the
    /// given worksheets. By default, all the non-empty worksheets are stacked.
    #[clap(long, value_parser)]
    pub worksheet: Option<Vec<String>>,

    /// (file path) A reference ranking table in CSV format. If provided, nasrank will
    /// check that the produced table matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (optional) The year shown in the title of the chart. By default, it is inferred from
    /// the name of the input file.
    #[clap(long, value_parser)]
    pub year: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
