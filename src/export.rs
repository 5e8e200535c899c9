//! Locale pairing and export.
//!
//! Every exporter pairs non-reference locales with the reference locale
//! (`en-US` by default) the same way: reference rows are projected onto
//! `id, utt, annot_utt` and inner-joined on `id` with the full rows of each
//! other locale. See [`Table::inner_join`] for column naming and row order.
//!
//! - [`generate_translation_jsonl`] writes every pair to one JSONL file.
//! - [`generate_language_excel_files`] writes the reference rows and one
//!   spreadsheet per locale.
//! - [`filter_into_jsonl`] reads a spreadsheet back and exports the rows
//!   matching `column == value`.
//!
//! Output directories must exist. Existing output files are overwritten.

use crate::config::DatasetConfig;
use crate::io::jsonl::write_jsonl_vec;
use crate::table::{Record, Table};
use crate::value::{ValueKey, value_file_stem};
use anyhow::Result;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[cfg(feature = "io-xlsx")]
use crate::io::jsonl::write_table_jsonl;
#[cfg(feature = "io-xlsx")]
use log::warn;
#[cfg(feature = "io-xlsx")]
use crate::io::xlsx::{read_xlsx_table, write_xlsx_table};

/// Locales other than the reference, each with its pair table.
///
/// Locales are visited in first-appearance order. Rows whose locale is
/// `null` are never paired, so they yield no pair table and no
/// `en-null.xlsx` is ever written for them. Projection columns the table
/// does not have are left out of the pair rows; the id column is always
/// required.
///
/// # Errors
/// Returns an error if the locale column is missing, if another locale
/// exists while the id column is missing, or if a locale's own fields
/// collide with a suffixed name (see [`Table::inner_join`]).
pub fn locale_pairs(table: &Table, config: &DatasetConfig) -> Result<Vec<(Value, Table)>> {
    let reference = Value::String(config.reference_locale.clone());
    let reference_key = ValueKey::from(&reference);
    let others: Vec<Value> = table
        .unique(&config.locale_column)?
        .into_iter()
        .filter(|l| !l.is_null() && ValueKey::from(l) != reference_key)
        .collect();
    if others.is_empty() {
        return Ok(Vec::new());
    }

    let projection: Vec<&str> = config
        .reference_projection
        .iter()
        .map(String::as_str)
        .filter(|c| {
            let present = table.has_column(c);
            if !present {
                debug!("reference projection column `{c}` absent; left out of pairs");
            }
            present
        })
        .collect();
    let left = table
        .filter_eq(&config.locale_column, &reference)?
        .select(&projection)?;
    let suffixes = (
        config.join_suffixes.0.as_str(),
        config.join_suffixes.1.as_str(),
    );
    let mut out = Vec::with_capacity(others.len());
    for locale in others {
        let right = table.filter_eq(&config.locale_column, &locale)?;
        let joined = left.inner_join(&right, &config.id_column, suffixes)?;
        debug!(
            "locale {}: {} rows, {} paired",
            value_file_stem(&locale),
            right.len(),
            joined.len()
        );
        out.push((locale, joined));
    }
    Ok(out)
}

/// Write all reference/locale pairs to `<output_dir>/combined_translation.jsonl`.
///
/// The file is always created, empty when nothing pairs.
///
/// # Errors
/// See [`locale_pairs`]; also fails if the file cannot be written.
pub fn generate_translation_jsonl(table: &Table, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    generate_translation_jsonl_with(table, output_dir, &DatasetConfig::default())
}

/// [`generate_translation_jsonl`] with explicit naming.
///
/// # Errors
/// See [`generate_translation_jsonl`].
pub fn generate_translation_jsonl_with(
    table: &Table,
    output_dir: impl AsRef<Path>,
    config: &DatasetConfig,
) -> Result<PathBuf> {
    let combined: Vec<Record> = locale_pairs(table, config)?
        .iter()
        .flat_map(|(_, pairs)| pairs.records())
        .collect();
    let path = config.combined_path(output_dir.as_ref());
    write_jsonl_vec(&path, &combined)?;
    Ok(path)
}

/// Write `en-en.xlsx` with the reference rows and `en-<locale>.xlsx` with
/// the pairs of each other locale.
///
/// Nothing is written when the reference locale is absent.
///
/// # Returns
/// The written paths, reference file first.
///
/// # Errors
/// See [`locale_pairs`]; also fails if a spreadsheet cannot be saved.
#[cfg(feature = "io-xlsx")]
pub fn generate_language_excel_files(
    table: &Table,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    generate_language_excel_files_with(table, output_dir, &DatasetConfig::default())
}

/// [`generate_language_excel_files`] with explicit naming.
///
/// # Errors
/// See [`generate_language_excel_files`].
#[cfg(feature = "io-xlsx")]
pub fn generate_language_excel_files_with(
    table: &Table,
    output_dir: impl AsRef<Path>,
    config: &DatasetConfig,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    let reference = Value::String(config.reference_locale.clone());
    if !table.contains_value(&config.locale_column, &reference)? {
        warn!(
            "reference locale {} absent; no spreadsheets written",
            config.reference_locale
        );
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    let path = config.reference_spreadsheet_path(output_dir);
    write_xlsx_table(&path, &table.filter_eq(&config.locale_column, &reference)?)?;
    written.push(path);

    for (locale, pairs) in locale_pairs(table, config)? {
        let path = config.locale_spreadsheet_path(output_dir, &value_file_stem(&locale));
        write_xlsx_table(&path, &pairs)?;
        written.push(path);
    }
    Ok(written)
}

/// Read the first sheet of `xlsx_path`, keep rows whose `filter_column`
/// equals `filter_value`, and write them to `<output_dir>/<filter_value>.jsonl`.
///
/// Equality is type-sensitive: the string `"1"` does not match the number
/// `1`. No match writes an empty file.
///
/// # Errors
/// Returns an error if the spreadsheet cannot be read, `filter_column` is
/// not one of its columns, or the output cannot be written.
#[cfg(feature = "io-xlsx")]
pub fn filter_into_jsonl(
    xlsx_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    filter_column: &str,
    filter_value: impl Into<Value>,
) -> Result<PathBuf> {
    let filter_value = filter_value.into();
    let table = read_xlsx_table(xlsx_path)?;
    let kept = table.filter_eq(filter_column, &filter_value)?;
    let path = output_dir
        .as_ref()
        .join(format!("{}.jsonl", value_file_stem(&filter_value)));
    write_table_jsonl(&path, &kept)?;
    Ok(path)
}
