use clap::Parser;

/// Looks up the funding adequacy figures of Illinois school districts.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the inputs and the district to report on.
    /// Paths in this file are relative to its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference report in JSON format. If provided, peer will check that the
    /// generated report matches the reference and print the differences otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the report will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The wide district dataset. Setting this option overrides the data source of
    /// the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, inferred from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default "State of Illinois") The display name of the district.
    #[clap(short, long, value_parser)]
    pub district: Option<String>,

    /// The RCDTS code of the district. Takes precedence over --district.
    #[clap(long, value_parser)]
    pub district_id: Option<String>,

    /// Shows the headline figures divided by the enrollment.
    #[clap(long, takes_value = false)]
    pub per_pupil: bool,

    /// Restricts the staffing section to one position, for example "Nurses".
    #[clap(long, value_parser)]
    pub staff_category: Option<String>,

    /// (file path) The legislative coverage table, required for the legislative view.
    #[clap(long, value_parser)]
    pub coverage: Option<String>,

    /// The chamber of the legislative district (Senate or House). Use with --legislative-district.
    #[clap(long, value_parser)]
    pub chamber: Option<String>,

    /// The number of the legislative district. Use with --chamber.
    #[clap(long, value_parser)]
    pub legislative_district: Option<u32>,

    /// The name of a legislator, to show their legislative district.
    #[clap(long, value_parser)]
    pub legislator: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
