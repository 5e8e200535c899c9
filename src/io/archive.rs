//! Dataset archive loader.
//!
//! A dataset ships as a gzip-compressed tar archive holding one JSONL member
//! per locale. [`load_dataset`] reads every regular-file member whose name
//! ends with the configured suffix (`.jsonl` by default), parses each
//! non-blank line as a JSON object, and returns all records as one [`Table`]
//! in archive order, then line order.
//!
//! Directories, links and members with any other suffix contribute nothing.
//! There is no per-line recovery: the first unreadable or malformed line
//! aborts the load.

use crate::config::DatasetConfig;
use crate::io::compression::gzip_reader;
use crate::table::{Record, Table};
use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Load a `.tar.gz` dataset archive with the default layout.
///
/// # Errors
/// Returns an error if the file is missing or not gzip, the tar stream is
/// malformed, a member line is not UTF-8, or a line is not a JSON object.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Table> {
    load_dataset_with(path, &DatasetConfig::default())
}

/// Load a `.tar.gz` dataset archive, reading members that end with
/// `config.member_suffix`.
///
/// # Errors
/// See [`load_dataset`].
pub fn load_dataset_with(path: impl AsRef<Path>, config: &DatasetConfig) -> Result<Table> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let rdr = gzip_reader(f, path)?;
    let records = read_archive_records(rdr, &config.member_suffix)
        .with_context(|| format!("load dataset archive {}", path.display()))?;
    info!("loaded {} records from {}", records.len(), path.display());
    Ok(Table::from_records(records))
}

/// Parse every qualifying member of an (already decompressed) tar stream.
///
/// # Errors
/// See [`load_dataset`].
pub fn read_archive_records<R: Read>(reader: R, member_suffix: &str) -> Result<Vec<Record>> {
    let mut archive = tar::Archive::new(reader);
    let mut out = Vec::<Record>::new();
    for entry in archive.entries().context("read tar entries")? {
        let entry = entry.context("read tar entry header")?;
        let name = entry
            .path()
            .context("decode tar member name")?
            .to_string_lossy()
            .into_owned();
        if !entry.header().entry_type().is_file() || !name.ends_with(member_suffix) {
            debug!("skipping archive member {name}");
            continue;
        }
        let before = out.len();
        read_member_lines(BufReader::new(entry), &name, &mut out)?;
        debug!("member {name}: {} records", out.len() - before);
    }
    Ok(out)
}

fn read_member_lines<R: BufRead>(reader: R, member: &str, out: &mut Vec<Record>) -> Result<()> {
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {} of member {member}", i + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("parse line {} of member {member}: {line}", i + 1))?;
        match value {
            Value::Object(rec) => out.push(rec),
            other => bail!(
                "line {} of member {member} is not a JSON object: {other}",
                i + 1
            ),
        }
    }
    Ok(())
}
