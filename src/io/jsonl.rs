//! JSON Lines (JSONL) reading and writing.
//!
//! - [`write_jsonl_vec`] / [`write_table_jsonl`] write one compact JSON value
//!   per line. Non-ASCII text is written literally (serde_json never
//!   escapes it) and keys keep column order.
//! - [`read_jsonl_records`] reads a file of objects back, skipping
//!   empty/whitespace-only lines.
//!
//! The output file is created or truncated; its parent directory must already
//! exist. Paths ending in `.gz` are compressed/decompressed transparently.

use crate::io::compression::{auto_detect_reader, auto_detect_writer};
use crate::table::{Record, Table};
use anyhow::{Context, Result, bail};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read a JSONL file of objects into records, in line order.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if a line is
/// not valid JSON or not an object. The message names the line number.
pub fn read_jsonl_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let rdr = auto_detect_reader(f, path)
        .with_context(|| format!("setup decompression for {}", path.display()))?;

    let mut records = Vec::new();
    for (n, line) in BufReader::new(rdr).lines().enumerate() {
        let lineno = n + 1;
        let line = line.with_context(|| format!("{}:{lineno}: unreadable line", path.display()))?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(text)
            .with_context(|| format!("{}:{lineno}: invalid JSON", path.display()))?
        {
            Value::Object(rec) => records.push(rec),
            other => bail!(
                "{}:{lineno}: expected a JSON object, found `{other}`",
                path.display()
            ),
        }
    }
    Ok(records)
}

/// Write a slice as JSONL, one compact JSON value per line.
///
/// # Returns
/// The number of lines written.
///
/// # Errors
/// Returns an error if the file cannot be created (including a missing
/// parent directory), an item fails to serialize, or the stream cannot be
/// finished.
pub fn write_jsonl_vec<T: Serialize>(path: impl AsRef<Path>, data: &[T]) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = auto_detect_writer(file, path)?;
    for (i, item) in data.iter().enumerate() {
        serde_json::to_writer(&mut out, item)
            .with_context(|| format!("serialize row #{} to {}", i + 1, path.display()))?;
        out.write_all(b"\n")
            .with_context(|| format!("write {}", path.display()))?;
    }
    out.finish()
        .with_context(|| format!("finish {}", path.display()))?;
    info!("wrote {} rows to {}", data.len(), path.display());
    Ok(data.len())
}

/// Write every row of `table` as a JSON object keyed by column name.
///
/// # Errors
/// See [`write_jsonl_vec`].
pub fn write_table_jsonl(path: impl AsRef<Path>, table: &Table) -> Result<usize> {
    let records: Vec<Record> = table.records().collect();
    write_jsonl_vec(path, &records)
}
