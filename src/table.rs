//! Plain-text and JSON rendering of decoded records.
//!
//! [`render`] lays records out as a console table: an index column followed
//! by the five record fields, a dashed rule under the header and two spaces
//! between columns. Columns holding only numbers (and `-` for missing
//! fields) are right-aligned, everything else is left-aligned.
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::{decode, table};
//!
//! let records = decode(&[0x00, 0x07], None, 40001, 2)?;
//!
//! let expected = [
//!     "no  data type  address  data  value  note",
//!     "--  ---------  -------  ----  -----  ----",
//!     " 0  B16_UINT     40001  0007      7  -",
//! ];
//! assert_eq!(table::render(&records), expected.join("\n"));
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```

use crate::error::Result;
use crate::record::{Record, EMPTY_FIELD};

/// Column titles, in display order.
pub const HEADERS: [&str; 6] = ["no", "data type", "address", "data", "value", "note"];

const COLUMN_GAP: &str = "  ";

/// Renders records as an aligned text table.
///
/// The `no` column counts rows from 0. Trailing spaces are trimmed from each
/// line and the output has no final newline.
pub fn render(records: &[Record]) -> String {
    let rows: Vec<[String; 6]> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let [data_type, address, raw, value, note] = record.fields();
            [index.to_string(), data_type, address, raw, value, note]
        })
        .collect();

    let widths: [usize; 6] = std::array::from_fn(|col| {
        rows.iter()
            .map(|row| row[col].chars().count())
            .fold(HEADERS[col].len(), usize::max)
    });
    let right_aligned: [bool; 6] = std::array::from_fn(|col| {
        rows.iter().all(|row| row[col] == EMPTY_FIELD || is_numeric(&row[col]))
            && rows.iter().any(|row| is_numeric(&row[col]))
    });

    let format_line = |cells: [&str; 6]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if right_aligned[col] {
                    format!("{:>width$}", cell, width = widths[col])
                } else {
                    format!("{:<width$}", cell, width = widths[col])
                }
            })
            .collect();
        padded.join(COLUMN_GAP).trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(HEADERS));
    lines.push(
        widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    for row in &rows {
        lines.push(format_line(std::array::from_fn(|col| row[col].as_str())));
    }
    lines.join("\n")
}

fn is_numeric(cell: &str) -> bool {
    cell.parse::<f64>().is_ok()
}

/// Serializes records as a pretty-printed JSON array.
///
/// Missing fields of placeholder rows are `null`.
///
/// # Errors
///
/// Returns `CodecError::Json` if serialization fails.
///
/// # Example
///
/// ```
/// use modbus_regcodec::{table, DataType, Record};
///
/// let json = table::to_json(&[Record::placeholder(DataType::B16Int)])?;
/// assert!(json.contains("\"address\": null"));
/// # Ok::<(), modbus_regcodec::CodecError>(())
/// ```
pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
