use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use std::collections::HashSet;

use crate::peer::io_common::{assemble_record, index_header, RawCell};
use crate::peer::*;
use peer_metrics::builder::DatasetBuilder;

pub fn read_dataset_excel(path: &str, worksheet_name: Option<&str>) -> PeerResult<Dataset> {
    let wrange = get_range(path, worksheet_name)?;
    let mut rows = wrange.rows();

    let header_row = rows.next().context(EmptyExcelSnafu { path })?;
    let header: Vec<String> = header_row
        .iter()
        .map(|c| match c {
            DataType::String(s) => s.trim().to_string(),
            DataType::Empty => String::new(),
            DataType::Float(x) => x.to_string(),
            DataType::Int(x) => x.to_string(),
            other => format!("{:?}", other),
        })
        .collect();
    debug!("read_dataset_excel: header: {:?}", header);
    let idx = index_header(&header, path)?;
    let known: HashSet<&str> = known_fields().into_iter().collect();

    let mut builder = DatasetBuilder::new();
    for (i, row) in rows.enumerate() {
        // Same line numbers as in the spreadsheet: the header is row 1.
        let lineno = i + 2;
        if row.iter().all(|c| *c == DataType::Empty) {
            debug!("read_dataset_excel: skipping empty row {}", lineno);
            continue;
        }
        let mut cells: Vec<RawCell> = Vec::with_capacity(row.len());
        for (col, cell) in row.iter().enumerate() {
            let raw = match cell {
                DataType::Empty => RawCell::Empty,
                DataType::Float(x) => RawCell::Number(*x),
                DataType::Int(x) => RawCell::Number(*x as f64),
                DataType::String(s) if s.trim().is_empty() => RawCell::Empty,
                DataType::String(s) => RawCell::Text(s.clone()),
                DataType::Bool(b) => RawCell::Number(if *b { 1.0 } else { 0.0 }),
                _ => {
                    return ExcelWrongCellTypeSnafu {
                        lineno,
                        column: header.get(col).cloned().unwrap_or_default(),
                        content: format!("{:?}", cell),
                    }
                    .fail()
                }
            };
            cells.push(raw);
        }
        let record = assemble_record(&header, &idx, &known, &cells, lineno)?;
        builder.add_record(record).context(MetricsSnafu {})?;
    }
    Ok(builder.build())
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> PeerResult<Range<DataType>> {
    debug!(
        "read_dataset_excel: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let mut all_worksheets = workbook.worksheets();
        match all_worksheets.len() {
            0 => EmptyExcelSnafu { path }.fail(),
            1 => {
                let (worksheet_name, wrange) = all_worksheets.remove(0);
                info!("Reading worksheet {:?} of {}", worksheet_name, path);
                Ok(wrange)
            }
            count => AmbiguousWorksheetSnafu { path, count }.fail(),
        }
    }
}
