use clap::Parser;

/// Computes booth-level election statistics for an assembly constituency.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON report configuration: data sources, years, rules and manual entries.
    /// Relative paths in the configuration are resolved against the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference report in JSON format. If provided, boothstats will
    /// check that the computed report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the report will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the booth records. Setting this option overrides the data sources
    /// of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default stations) The type of the input: stations, form20 or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The identifier of the assembly constituency. Required when the records hold several assemblies.
    #[clap(short, long, value_parser)]
    pub assembly: Option<String>,

    /// (default: the latest year) The election year used for the single-year sections.
    #[clap(short, long, value_parser)]
    pub year: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
