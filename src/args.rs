use clap::Parser;

/// Generates standardized SERVEL complaint-response letters from a
/// responses table and a polling-location table.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file naming the responses file, the sites file and
    /// the registry file. Individual flags below override the config values.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The responses table (columns Caso, Respuesta). CSV with ';' or ','
    /// delimiter, or an .xlsx workbook.
    #[clap(long, value_parser)]
    pub responses: Option<String>,

    /// (file path) The polling-location table (site code, region, commune, name,
    /// address; accented header variants are accepted). CSV or .xlsx.
    #[clap(long, value_parser)]
    pub sites: Option<String>,

    /// The claim number to record in the registry.
    #[clap(long, value_parser)]
    pub claim: Option<String>,

    /// The national ID of the claimant (ex: 12.345.678-9).
    #[clap(long, value_parser)]
    pub rut: Option<String>,

    /// The case identifier selecting the response template (ex: 5 or 5.1).
    #[clap(long = "case", value_parser)]
    pub case_id: Option<String>,

    /// The code of the polling location referenced by the letter.
    #[clap(long, value_parser)]
    pub site_code: Option<String>,

    /// (case 5 only) The emission date recorded in the letter.
    #[clap(long, value_parser)]
    pub date: Option<String>,

    /// (case 5 only) The origin of the certificate (ex: Clave Única).
    #[clap(long, value_parser)]
    pub origin: Option<String>,

    /// (file path, optional) Where generated rows are appended. Created with a header
    /// row when missing.
    #[clap(long, value_parser)]
    pub registry: Option<String>,

    /// List the known regions of the sites table and exit.
    #[clap(long, takes_value = false)]
    pub list_regions: bool,

    /// List the communes of --region and exit.
    #[clap(long, takes_value = false)]
    pub list_communes: bool,

    /// List the locations matching --region and --commune and exit.
    #[clap(long, takes_value = false)]
    pub list_sites: bool,

    /// Region filter for the list modes.
    #[clap(long, value_parser)]
    pub region: Option<String>,

    /// Commune filter for --list-sites.
    #[clap(long, value_parser)]
    pub commune: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
