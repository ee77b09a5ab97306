use clap::Parser;

/// This is a tabulation program for the areas of interest of students.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the report: roster sources, taxonomy and rules.
    /// For more information about the file format, read the documentation of the interest_tally::manual module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing a summary in JSON format. If provided, the program will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The roster to read. Setting this option overrides the sources that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default Name) The column containing the names of the students.
    #[clap(long, value_parser)]
    pub name_column: Option<String>,

    /// (repeated, default the four survey columns) The columns containing the areas of interest.
    #[clap(long, value_parser)]
    pub interest_columns: Option<Vec<String>>,

    /// (default: the only worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (integer, optional) Also output the N most common interests, the others being merged into OTHER.
    #[clap(long, value_parser)]
    pub top_n: Option<usize>,

    /// (per-student or per-mention, default per-student) What the counts represent.
    #[clap(long, value_parser)]
    pub count_basis: Option<String>,

    /// If passed, the labels keep their casing instead of being upper-cased.
    #[clap(long, takes_value = false)]
    pub mixed_case: bool,

    /// (repeated, optional) Only list the students having one of these interests.
    /// The names are normalized like the roster entries.
    #[clap(long, value_parser)]
    pub interest: Option<Vec<String>>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
