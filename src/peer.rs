use log::{debug, info, warn};

use peer_metrics::figures::DisplayUnits;
use peer_metrics::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::peer::config_reader::*;
use crate::peer::report::{build_report, DistrictQuery, LegislativeQuery, ReportRequest};

pub mod config_reader;
mod io_common;
mod io_coverage;
mod io_csv;
mod io_excel;
pub mod report;

#[derive(Debug, Snafu)]
pub enum PeerError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Missing column {column:?} in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Line {lineno}: missing value for column {column:?}"))]
    MissingCell { lineno: usize, column: String },
    #[snafu(display("Line {lineno}, column {column:?}: cannot read {content:?} as a number"))]
    ValueParse {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet {name:?}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display(
        "Excel file {path} has {count} worksheets, please choose one with --excel-worksheet-name"
    ))]
    AmbiguousWorksheet { path: String, count: usize },
    #[snafu(display("Excel file {path} is empty"))]
    EmptyExcel { path: String },
    #[snafu(display("Line {lineno}, column {column:?}: unexpected cell {content}"))]
    ExcelWrongCellType {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Invalid district data"))]
    Metrics { source: MetricsError },
    #[snafu(display("Unknown input type {provider:?} (expected csv or xlsx)"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown display units {units:?} (expected total or perPupil)"))]
    UnknownUnits { units: String },
    #[snafu(display("Unknown staff category {category:?}"))]
    UnknownCategory { category: String },
    #[snafu(display("No input dataset: use --input or --config"))]
    MissingInput {},
    #[snafu(display("Configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },
    #[snafu(display("Difference detected between the report and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PeerResult<T> = Result<T, PeerError>;

/// The kinds of files the district dataset can be read from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl Provider {
    /// Reads the provider name. Without one, the file extension decides, and
    /// CSV is the default.
    pub fn resolve(provider: Option<&str>, path: &str) -> PeerResult<Provider> {
        match provider {
            Some("csv") => Ok(Provider::Csv),
            Some("xlsx") | Some("excel") => Ok(Provider::Xlsx),
            Some(x) => UnknownProviderSnafu { provider: x }.fail(),
            None => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("xlsx") | Some("xlsm") => Ok(Provider::Xlsx),
                    _ => Ok(Provider::Csv),
                }
            }
        }
    }
}

/// A file to read, with its path already resolved.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InputSource {
    pub provider: Provider,
    pub path: String,
    pub excel_worksheet_name: Option<String>,
}

pub fn load_dataset(source: &InputSource) -> PeerResult<Dataset> {
    info!("Attempting to read dataset {:?}", source.path);
    let dataset = match source.provider {
        Provider::Csv => io_csv::read_dataset_csv(&source.path)?,
        Provider::Xlsx => {
            io_excel::read_dataset_excel(&source.path, source.excel_worksheet_name.as_deref())?
        }
    };
    info!("Read {} districts from {:?}", dataset.len(), source.path);
    Ok(dataset)
}

pub fn load_coverage(source: &InputSource) -> PeerResult<legislative::Coverage> {
    info!("Attempting to read legislative coverage {:?}", source.path);
    match source.provider {
        Provider::Csv => io_coverage::read_coverage_csv(&source.path),
        Provider::Xlsx => whatever!("Legislative coverage can only be read from CSV files"),
    }
}

/// Paths in the configuration are relative to the configuration file.
fn resolve_source(root: &Path, fs_cfg: &FileSource) -> PeerResult<InputSource> {
    let path = root.join(&fs_cfg.file_path).display().to_string();
    Ok(InputSource {
        provider: Provider::resolve(fs_cfg.provider.as_deref(), &path)?,
        path,
        excel_worksheet_name: fs_cfg.excel_worksheet_name.clone(),
    })
}

/// Merges the configuration file (if any) and the command line flags.
/// The flags win.
pub fn build_request(args: &Args) -> PeerResult<ReportRequest> {
    let config: Option<(PeerConfig, &Path)> = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {
                    path: config_path.clone(),
                })?;
            Some((config, root))
        }
        None => None,
    };
    debug!("build_request: config: {:?}", config);

    let data_source = match (&args.input, &config) {
        (Some(input), _) => InputSource {
            provider: Provider::resolve(args.input_type.as_deref(), input)?,
            path: input.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        },
        (None, Some((c, root))) => {
            let mut s = resolve_source(root, &c.data_source)?;
            if args.excel_worksheet_name.is_some() {
                s.excel_worksheet_name = args.excel_worksheet_name.clone();
            }
            s
        }
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let coverage_source = match (&args.coverage, &config) {
        (Some(p), _) => Some(InputSource {
            provider: Provider::resolve(None, p)?,
            path: p.clone(),
            excel_worksheet_name: None,
        }),
        (None, Some((c, root))) => match &c.coverage_source {
            Some(cs) => Some(resolve_source(root, cs)?),
            None => None,
        },
        (None, None) => None,
    };

    let output_settings = config
        .as_ref()
        .and_then(|(c, _)| c.output_settings.clone())
        .unwrap_or_default();

    let units = if args.per_pupil {
        DisplayUnits::PerPupil
    } else {
        match &output_settings.display_units {
            Some(u) => DisplayUnits::parse(u).context(UnknownUnitsSnafu { units: u.clone() })?,
            None => DisplayUnits::Total,
        }
    };

    let district = if let Some(id) = &args.district_id {
        DistrictQuery::ById(id.clone())
    } else if let Some(name) = &args.district {
        DistrictQuery::ByName(name.clone())
    } else {
        match &config {
            Some((c, _)) => match (&c.district_id, &c.district) {
                (Some(id), _) => DistrictQuery::ById(id.clone()),
                (None, Some(name)) => DistrictQuery::ByName(name.clone()),
                (None, None) => DistrictQuery::ByName(STATEWIDE_NAME.to_string()),
            },
            None => DistrictQuery::ByName(STATEWIDE_NAME.to_string()),
        }
    };

    let staff_category = match &args.staff_category {
        Some(label) => Some(ResourceCategory::from_label(label).context(
            UnknownCategorySnafu {
                category: label.clone(),
            },
        )?),
        None => None,
    };

    let legislative = match (&args.legislator, &args.chamber, args.legislative_district) {
        (Some(name), _, _) => Some(LegislativeQuery::Legislator(name.clone())),
        (None, Some(chamber), Some(number)) => Some(LegislativeQuery::District {
            chamber: chamber.clone(),
            number,
        }),
        (None, Some(_), None) | (None, None, Some(_)) => {
            whatever!("--chamber and --legislative-district must be used together")
        }
        (None, None, None) => None,
    };

    let out = match &args.out {
        Some(o) => Some(o.clone()),
        None => match (&output_settings.output_file, &config) {
            (Some(f), Some((_, root))) => Some(root.join(f).display().to_string()),
            (Some(f), None) => Some(f.clone()),
            (None, _) => None,
        },
    };

    Ok(ReportRequest {
        report_name: output_settings
            .report_name
            .clone()
            .unwrap_or_else(|| "PEER district lookup".to_string()),
        data_source,
        coverage_source,
        district,
        units,
        staff_category,
        legislative,
        out,
        reference: args.reference.clone(),
    })
}

/// Compares the report with a reference summary. Both are normalized through
/// the pretty printer so that formatting does not matter.
pub fn check_reference(report: &JSValue, reference_path: &str) -> PeerResult<()> {
    let reference = read_summary(reference_path)?;
    let pretty_ref = serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    let pretty_report = serde_json::to_string_pretty(report).context(SerializingJsonSnafu {})?;
    if pretty_ref != pretty_report {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_ref.as_str(), pretty_report.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The report matches the reference {}", reference_path);
    Ok(())
}

pub fn run_report(args: &Args) -> PeerResult<()> {
    let request = build_request(args)?;
    info!("request: {:?}", request);

    let dataset = load_dataset(&request.data_source)?;
    let coverage = match &request.coverage_source {
        Some(s) => Some(load_coverage(s)?),
        None => None,
    };

    let report = build_report(&dataset, coverage.as_ref(), &request)?;
    let pretty = serde_json::to_string_pretty(&report).context(SerializingJsonSnafu {})?;

    match request.out.as_deref() {
        None | Some("stdout") => println!("{}", pretty),
        Some(path) => {
            info!("Writing report to {}", path);
            fs::write(path, pretty.as_bytes()).context(WritingFileSnafu { path })?;
        }
    }

    if let Some(reference) = &request.reference {
        check_reference(&report, reference)?;
    }
    Ok(())
}
