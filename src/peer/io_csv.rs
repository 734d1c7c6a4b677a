// Primitives for reading CSV files.

use std::collections::HashSet;
use std::io::Read;

use crate::peer::io_common::{assemble_record, index_header, RawCell};
use crate::peer::*;
use peer_metrics::builder::DatasetBuilder;

pub fn read_dataset_csv(path: &str) -> PeerResult<Dataset> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_dataset(rdr, path)
}

fn read_dataset<R: Read>(mut rdr: csv::Reader<R>, path: &str) -> PeerResult<Dataset> {
    let header: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu { path })?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    debug!("read_dataset_csv: header: {:?}", header);
    let idx = index_header(&header, path)?;
    let known: HashSet<&str> = known_fields().into_iter().collect();

    let mut builder = DatasetBuilder::new();
    for (i, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = i + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<RawCell> = line
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(s.to_string())
                }
            })
            .collect();
        let record = assemble_record(&header, &idx, &known, &cells, lineno)?;
        debug!("read_dataset_csv: line {}: {:?}", lineno, record.id);
        builder.add_record(record).context(MetricsSnafu {})?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(s: &str) -> PeerResult<Dataset> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(s.as_bytes());
        read_dataset(rdr, "inline.csv")
    }

    fn fixture() -> String {
        format!("{}/tests/data/districts.csv", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn reads_fixture() {
        let dataset = read_dataset_csv(&fixture()).unwrap();
        assert_eq!(dataset.len(), 3);
        let payson = dataset.get("010010010260000").unwrap();
        assert_eq!(payson.name, "Payson CUSD 1");
        assert_eq!(payson.enrollment, 1000.0);
        assert_eq!(payson.get("Adequacy Target"), Some(10_000_000.0));
        assert_eq!(payson.get("County"), None);
        assert_eq!(dataset.statewide().map(|r| r.enrollment), Some(0.0));
    }

    #[test]
    fn reads_formatted_numbers() {
        let dataset = read_dataset_csv(&fixture()).unwrap();
        let surplus = dataset.get("020020020260000").unwrap();
        assert_eq!(surplus.get("Adequacy Target"), Some(5_000_000.0));
        assert_eq!(surplus.get("Adequacy Funding Gap"), Some(1_000_000.0));
        let share = surplus.get("Local Property Taxes (%)").unwrap();
        assert!((share - 0.7).abs() < 1e-12);
    }

    #[test]
    fn keeps_leading_zeros() {
        let dataset = read_dataset_csv(&fixture()).unwrap();
        assert!(dataset.get("000000000000000").unwrap().is_statewide());
    }

    #[test]
    fn empty_cells_are_missing() {
        let dataset = from_str(
            "RCDTS,District Name (IRC),Total ASE,Adequacy Target,Actual Resources\n\
             1,A,10,100,\n",
        )
        .unwrap();
        let a = dataset.get("1").unwrap();
        assert_eq!(a.get("Adequacy Target"), Some(100.0));
        assert_eq!(a.get("Actual Resources"), None);
    }

    #[test]
    fn duplicate_district() {
        let res = from_str("RCDTS,District Name (IRC),Total ASE\n1,A,10\n1,B,20\n");
        assert!(matches!(
            res,
            Err(PeerError::Metrics {
                source: MetricsError::DuplicateDistrict(_)
            })
        ));
    }

    #[test]
    fn bad_number_reports_line() {
        let res = from_str(
            "RCDTS,District Name (IRC),Total ASE,Adequacy Target\n1,A,10,100\n2,B,20,n/a\n",
        );
        assert!(matches!(res, Err(PeerError::ValueParse { lineno: 3, .. })));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let res = from_str("RCDTS,District Name (IRC),Total ASE\n1,A,inf\n");
        assert!(matches!(res, Err(PeerError::ValueParse { lineno: 2, .. })));
        let res = from_str(
            "RCDTS,District Name (IRC),Total ASE,Adequacy Funding Gap\n1,A,10,NaN\n",
        );
        assert!(matches!(res, Err(PeerError::ValueParse { lineno: 2, .. })));
    }

    #[test]
    fn missing_name_column() {
        let res = from_str("RCDTS,Total ASE\n1,10\n");
        assert!(matches!(res, Err(PeerError::MissingColumn { .. })));
    }
}
