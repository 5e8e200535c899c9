//! Spreadsheet (`.xlsx`) reading and writing.
//!
//! [`write_xlsx_table`] writes a [`Table`] to the first sheet of a new
//! workbook: a bold header row of column names, then one row per record, no
//! index column. [`read_xlsx_table`] reads the first sheet of any workbook
//! calamine can open, taking the first row as the header.
//!
//! # Cell mapping
//!
//! | JSON            | written cell        | read back as          |
//! |-----------------|---------------------|-----------------------|
//! | string          | string              | string                |
//! | number          | number              | integer if integral, else float |
//! | bool            | boolean             | bool                  |
//! | null            | blank               | null                  |
//! | array / object  | compact JSON string | string                |
//!
//! Date/time cells read back as their serial number, ISO cells as text,
//! error cells as their error text (e.g. `#DIV/0!`).

use crate::table::Table;
use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use log::info;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::path::Path;

/// Largest magnitude at which every integral `f64` is exactly representable.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

/// Write `table` to a new workbook at `path`, replacing any existing file.
///
/// # Returns
/// The number of data rows written.
///
/// # Errors
/// Returns an error if a cell exceeds spreadsheet limits or the file cannot
/// be saved (including a missing parent directory).
pub fn write_xlsx_table(path: impl AsRef<Path>, table: &Table) -> Result<usize> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    for (c, name) in table.columns().iter().enumerate() {
        sheet
            .write_string_with_format(0, col_num(c)?, name, &header)
            .with_context(|| format!("write header `{name}` to {}", path.display()))?;
    }
    for (r, row) in table.rows().iter().enumerate() {
        let rn = u32::try_from(r + 1).with_context(|| format!("row #{} out of range", r + 1))?;
        for (c, v) in row.iter().enumerate() {
            write_cell(sheet, rn, col_num(c)?, v).with_context(|| {
                format!(
                    "write row #{} column `{}` to {}",
                    r + 1,
                    table.columns()[c],
                    path.display()
                )
            })?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("save {}", path.display()))?;
    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(table.len())
}

fn col_num(c: usize) -> Result<u16> {
    u16::try_from(c).map_err(|_| anyhow!("column #{} out of range", c + 1))
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, v: &Value) -> Result<()> {
    match v {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                sheet.write_number(row, col, f)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        Value::Array(_) | Value::Object(_) => {
            sheet.write_string(row, col, v.to_string())?;
        }
    }
    Ok(())
}

/// Read the first sheet of the workbook at `path` into a [`Table`].
///
/// Blank header cells become `Unnamed: <i>`; repeated header names get a
/// `.1`, `.2`, ... suffix so every column stays addressable.
///
/// # Errors
/// Returns an error if the workbook cannot be opened or parsed, or has no
/// sheets.
pub fn read_xlsx_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("{} has no worksheets", path.display()))?
        .with_context(|| format!("read first sheet of {}", path.display()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns = header_names(header);
    let body = rows
        .map(|r| r.iter().map(cell_to_value).collect())
        .collect::<Vec<Vec<Value>>>();
    Table::from_rows(columns, body).with_context(|| format!("read rows of {}", path.display()))
}

fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashMap::<String, usize>::new();
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {i}"),
                Data::String(s) => s.clone(),
                other => match cell_to_value(other) {
                    Value::String(s) => s,
                    v => v.to_string(),
                },
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base
            } else {
                format!("{base}.{n}")
            };
            *n += 1;
            name
        })
        .collect()
}

/// Convert one spreadsheet cell to a JSON value.
#[must_use]
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => float_to_value(*f),
        Data::DateTime(dt) => float_to_value(dt.as_f64()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}

fn float_to_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64_INT {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}
