use log::info;

use snafu::{prelude::*, Snafu};

use chrono::Local;

use servel_letters::{generate, Extras, LetterRequest, LogSink, SiteDirectory, TemplateSet};

use crate::args::Args;
use crate::letters::config_reader::*;
use crate::letters::registry::FileRegistry;

pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;
pub mod registry;

#[derive(Debug, Snafu)]
pub enum GenError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no usable sheet: {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening table {path}"))]
    OpeningTable {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading CSV data"))]
    CsvOpen { source: csv::Error },
    #[snafu(display("Error reading a CSV row"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Missing column {column} in {path}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Error opening the configuration file"))]
    OpeningJson { source: std::io::Error },
    #[snafu(display("Error parsing the configuration file"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing to the registry"))]
    Registry { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type GenResult<T> = Result<T, GenError>;

pub mod config_reader {
    use crate::letters::*;

    use serde::{Deserialize, Serialize};
    use std::fs;

    /// The JSON run configuration. Every field can be overridden from the
    /// command line.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct AppConfig {
        #[serde(rename = "responsesFile")]
        pub responses_file: Option<String>,
        #[serde(rename = "sitesFile")]
        pub sites_file: Option<String>,
        #[serde(rename = "registryFile")]
        pub registry_file: Option<String>,
        /// ";" (default) or "\t".
        #[serde(rename = "registryDelimiter")]
        pub registry_delimiter: Option<String>,
    }

    pub fn read_config(path: &str) -> GenResult<AppConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let config: AppConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        info!("config: {:?}", config);
        Ok(config)
    }
}

/// Loads the responses table, dispatching on the file extension.
pub fn load_responses(path: &str) -> GenResult<TemplateSet> {
    let entries = if is_excel(path) {
        io_xlsx::read_responses_xlsx(path)?
    } else {
        io_csv::read_responses_csv(path)?
    };
    Ok(TemplateSet::new(entries))
}

/// Loads the polling-location table, dispatching on the file extension.
pub fn load_sites(path: &str) -> GenResult<SiteDirectory> {
    let records = if is_excel(path) {
        io_xlsx::read_sites_xlsx(path)?
    } else {
        io_csv::read_sites_csv(path)?
    };
    Ok(SiteDirectory::new(records))
}

fn is_excel(path: &str) -> bool {
    path.to_lowercase().ends_with(".xlsx")
}

fn registry_delimiter(config: &Option<AppConfig>) -> u8 {
    match config
        .as_ref()
        .and_then(|c| c.registry_delimiter.as_deref())
    {
        Some("\t") => b'\t',
        _ => b';',
    }
}

pub fn run_app(args: &Args) -> GenResult<()> {
    let config: Option<AppConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };

    let responses_path = args
        .responses
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.responses_file.clone()));
    let sites_path = args
        .sites
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.sites_file.clone()));

    let responses_path = match responses_path {
        Some(p) => p,
        None => whatever!("No responses table specified (use --responses or a config file)"),
    };
    let sites_path = match sites_path {
        Some(p) => p,
        None => whatever!("No sites table specified (use --sites or a config file)"),
    };

    let templates = load_responses(&responses_path)?;
    let sites = load_sites(&sites_path)?;
    info!(
        "Loaded {} template(s) and {} site(s)",
        templates.cases().len(),
        sites.len()
    );

    if args.list_regions {
        for r in sites.regions() {
            println!("{}", r);
        }
        return Ok(());
    }

    if args.list_communes {
        let region = match &args.region {
            Some(r) => r,
            None => whatever!("--list-communes requires --region"),
        };
        for c in sites.communes_in(region) {
            println!("{}", c);
        }
        return Ok(());
    }

    if args.list_sites {
        let (region, commune) = match (&args.region, &args.commune) {
            (Some(r), Some(c)) => (r, c),
            _ => whatever!("--list-sites requires --region and --commune"),
        };
        for s in sites.sites_in(region, commune) {
            println!("{}: {} - {}", s.code, s.name, s.address);
        }
        return Ok(());
    }

    let request = LetterRequest {
        claim_number: args.claim.clone().unwrap_or_default(),
        rut: args.rut.clone().unwrap_or_default(),
        case: args.case_id.clone().unwrap_or_default(),
        site_code: args.site_code.clone().unwrap_or_default(),
        extras: Extras {
            date: args.date.clone(),
            origin: args.origin.clone(),
        },
    };

    match generate(&templates, &sites, &request) {
        Ok(letter) => {
            println!("{}", letter.text);
            let registry_path = args
                .registry
                .clone()
                .or_else(|| config.as_ref().and_then(|c| c.registry_file.clone()));
            if let Some(p) = registry_path {
                let mut registry = FileRegistry::open(&p, registry_delimiter(&config))
                    .context(RegistrySnafu {})?;
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                registry
                    .append(&letter.log_row(&timestamp))
                    .context(RegistrySnafu {})?;
                info!("Appended one row to the registry {:?}", p);
            }
            Ok(())
        }
        Err(failures) => {
            for f in failures.iter() {
                eprintln!("error: {}", f);
            }
            whatever!(
                "The request was rejected with {} validation failure(s)",
                failures.len()
            )
        }
    }
}
