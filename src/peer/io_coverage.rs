// Reading the legislative coverage table.

use serde::Deserialize;

use crate::peer::io_common::parse_number;
use crate::peer::*;
use peer_metrics::legislative::{Coverage, CoverageRow};

#[derive(Debug, Deserialize)]
struct CoverageLine {
    #[serde(rename = "Chamber")]
    chamber: String,
    #[serde(rename = "District Number")]
    district_number: String,
    #[serde(rename = "Legislator Name")]
    legislator: Option<String>,
    #[serde(rename = "RCDTS")]
    rcdts: String,
    #[serde(rename = "School District")]
    school_district: String,
    #[serde(rename = "Total Students")]
    total_students: Option<String>,
    #[serde(rename = "Share of Students")]
    share_of_students: Option<String>,
}

fn optional_number(
    s: &Option<String>,
    lineno: usize,
    column: &str,
) -> PeerResult<Option<f64>> {
    match s.as_deref().map(|x| x.trim()) {
        None | Some("") => Ok(None),
        Some(x) => Ok(Some(parse_number(x).context(ValueParseSnafu {
            lineno,
            column,
            content: x,
        })?)),
    }
}

pub fn read_coverage_csv(path: &str) -> PeerResult<Coverage> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut rows: Vec<CoverageRow> = Vec::new();
    for (i, line_r) in rdr.deserialize::<CoverageLine>().enumerate() {
        let lineno = i + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_coverage_csv: line {}: {:?}", lineno, line);
        let district_number = line
            .district_number
            .parse::<u32>()
            .ok()
            .context(ValueParseSnafu {
                lineno,
                column: "District Number",
                content: line.district_number.clone(),
            })?;
        rows.push(CoverageRow {
            total_students: optional_number(&line.total_students, lineno, "Total Students")?,
            share_of_students: optional_number(
                &line.share_of_students,
                lineno,
                "Share of Students",
            )?,
            chamber: line.chamber,
            district_number,
            legislator: line.legislator.filter(|n| !n.is_empty()),
            rcdts: line.rcdts,
            school_district: line.school_district,
        });
    }
    Ok(Coverage::new(rows))
}
