// Primitives shared by the dataset readers.

use std::collections::HashSet;

use crate::peer::*;

/// A cell as read from the input, before interpretation.
#[derive(PartialEq, Debug, Clone)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

/// Reads a number as written in the source spreadsheets.
///
/// Accepts thousands separators and a leading `$`; a trailing `%` divides
/// the value by 100. Returns `None` for anything else, including `inf` and
/// `NaN`.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    let (t, scale) = match t.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), 0.01),
        None => (t, 1.0),
    };
    let (negative, t) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t),
    };
    let t = t.strip_prefix('$').unwrap_or(t);
    let cleaned: String = t.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    let x = cleaned.parse::<f64>().ok()?;
    if !x.is_finite() {
        return None;
    }
    let x = if negative { -x } else { x };
    Some(x * scale)
}

/// Position of each mandatory column in the header.
pub struct HeaderIndex {
    pub id: usize,
    pub name: usize,
    pub enrollment: usize,
}

pub fn index_header(header: &[String], path: &str) -> PeerResult<HeaderIndex> {
    let find = |column: &str| -> PeerResult<usize> {
        header
            .iter()
            .position(|h| h == column)
            .context(MissingColumnSnafu { column, path })
    };
    Ok(HeaderIndex {
        id: find(ID_FIELD)?,
        name: find(NAME_FIELD)?,
        enrollment: find(ENROLLMENT_FIELD)?,
    })
}

fn cell_text(cell: &RawCell) -> Option<String> {
    match cell {
        RawCell::Empty => None,
        RawCell::Text(s) => Some(s.clone()),
        // Identifiers stored as numbers in spreadsheets: print them without
        // a fractional part when they have none.
        RawCell::Number(x) if x.fract() == 0.0 => Some(format!("{:.0}", x)),
        RawCell::Number(x) => Some(x.to_string()),
    }
}

/// Builds one district from a data row.
///
/// The columns known to the transformer must hold numbers (or be empty).
/// Other columns are kept when they hold numbers and skipped otherwise.
pub fn assemble_record(
    header: &[String],
    idx: &HeaderIndex,
    known: &HashSet<&str>,
    cells: &[RawCell],
    lineno: usize,
) -> PeerResult<DistrictRecord> {
    let get = |i: usize| cells.get(i).unwrap_or(&RawCell::Empty);

    let id = cell_text(get(idx.id)).context(MissingCellSnafu {
        lineno,
        column: ID_FIELD,
    })?;
    let name = cell_text(get(idx.name)).context(MissingCellSnafu {
        lineno,
        column: NAME_FIELD,
    })?;
    let enrollment = match get(idx.enrollment) {
        RawCell::Number(x) => *x,
        RawCell::Text(s) => parse_number(s).context(ValueParseSnafu {
            lineno,
            column: ENROLLMENT_FIELD,
            content: s.clone(),
        })?,
        RawCell::Empty => {
            return MissingCellSnafu {
                lineno,
                column: ENROLLMENT_FIELD,
            }
            .fail()
        }
    };

    let mut record = DistrictRecord::new(&id, &name, enrollment);
    for (i, column) in header.iter().enumerate() {
        if i == idx.id || i == idx.name || i == idx.enrollment {
            continue;
        }
        let value = match get(i) {
            RawCell::Empty => None,
            RawCell::Number(x) => Some(*x),
            RawCell::Text(s) => match parse_number(s) {
                Some(x) => Some(x),
                None if known.contains(column.as_str()) => {
                    return ValueParseSnafu {
                        lineno,
                        column: column.clone(),
                        content: s.clone(),
                    }
                    .fail()
                }
                None => {
                    debug!(
                        "assemble_record: line {}: skipping non-numeric column {:?}",
                        lineno, column
                    );
                    None
                }
            },
        };
        if let Some(x) = value {
            record.fields.insert(column.clone(), x);
        }
    }
    Ok(record)
}
