//! Test fixtures for dataset archives.
//!
//! [`ArchiveBuilder`] writes small `.tar.gz` archives shaped like a real
//! dataset release, and [`sample_records`] provides a three-locale dataset
//! with one unpaired id per non-reference locale.
//!
//! ```no_run
//! use massive_wrangle::load_dataset;
//! use massive_wrangle::testing::ArchiveBuilder;
//!
//! # fn main() -> anyhow::Result<()> {
//! let tmp = tempfile::tempdir()?;
//! let path = tmp.path().join("amazon-massive.tar.gz");
//! ArchiveBuilder::new()
//!     .dir("1.0/data")
//!     .jsonl("1.0/data/en-US.jsonl", &[r#"{"id":"1","locale":"en-US","utt":"hi"}"#])
//!     .write(&path)?;
//! let table = load_dataset(&path)?;
//! assert_eq!(table.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::table::Record;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tar::{EntryType, Header};

enum Member {
    File { name: String, body: Vec<u8> },
    Dir { name: String },
}

/// Builder for gzip-compressed tar archives.
#[derive(Default)]
pub struct ArchiveBuilder {
    members: Vec<Member>,
}

impl ArchiveBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file with raw content.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.members.push(Member::File {
            name: name.into(),
            body: body.into(),
        });
        self
    }

    /// Add a regular file whose lines are joined with `\n`.
    #[must_use]
    pub fn jsonl(self, name: impl Into<String>, lines: &[&str]) -> Self {
        let mut body = lines.join("\n");
        body.push('\n');
        self.file(name, body)
    }

    /// Add a regular file holding one compact JSON line per record.
    #[must_use]
    pub fn records(self, name: impl Into<String>, records: &[Record]) -> Self {
        let mut body = String::new();
        for r in records {
            body.push_str(&Value::Object(r.clone()).to_string());
            body.push('\n');
        }
        self.file(name, body)
    }

    /// Add a directory entry.
    #[must_use]
    pub fn dir(mut self, name: impl Into<String>) -> Self {
        self.members.push(Member::Dir { name: name.into() });
        self
    }

    /// Write the archive to `path` as `.tar.gz`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    #[cfg(feature = "compression-gzip")]
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let enc = self.write_tar(GzEncoder::new(f, Compression::default()))?;
        enc.finish()
            .with_context(|| format!("finish gzip stream {}", path.display()))?
            .flush()?;
        Ok(())
    }

    /// Write the archive to `path` as an uncompressed `.tar`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn write_uncompressed(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        self.write_tar(f)?.flush()?;
        Ok(())
    }

    fn write_tar<W: Write>(&self, sink: W) -> Result<W> {
        let mut b = tar::Builder::new(sink);
        for m in &self.members {
            match m {
                Member::File { name, body } => {
                    let mut h = Header::new_gnu();
                    h.set_size(body.len() as u64);
                    h.set_mode(0o644);
                    h.set_cksum();
                    b.append_data(&mut h, name, body.as_slice())
                        .with_context(|| format!("append {name}"))?;
                }
                Member::Dir { name } => {
                    let mut h = Header::new_gnu();
                    h.set_entry_type(EntryType::Directory);
                    h.set_size(0);
                    h.set_mode(0o755);
                    h.set_cksum();
                    b.append_data(&mut h, name, io::empty())
                        .with_context(|| format!("append directory {name}"))?;
                }
            }
        }
        b.into_inner().context("finish tar stream")
    }
}

fn record(v: Value) -> Record {
    match v {
        Value::Object(m) => m,
        _ => Record::new(),
    }
}

/// A small three-locale dataset.
///
/// `en-US` has ids `1` and `2`; `fr-FR` has `1`, `2` and an unpaired `3`;
/// `de-DE` has `2` and an unpaired `4`.
#[must_use]
pub fn sample_records() -> Vec<Record> {
    let row = |id: &str, locale: &str, utt: &str, annot: &str, intent: &str| {
        record(json!({
            "id": id,
            "locale": locale,
            "partition": "train",
            "scenario": intent.split('_').next().unwrap_or(intent),
            "intent": intent,
            "utt": utt,
            "annot_utt": annot,
            "worker_id": "8",
        }))
    };
    vec![
        row("1", "en-US", "wake me up at five am", "wake me up at [time : five am]", "alarm_set"),
        row("2", "en-US", "quiet", "quiet", "audio_volume_mute"),
        row("1", "fr-FR", "réveille-moi à cinq heures", "réveille-moi à [time : cinq heures]", "alarm_set"),
        row("2", "fr-FR", "silence", "silence", "audio_volume_mute"),
        row("3", "fr-FR", "quelle heure", "quelle heure", "datetime_query"),
        row("2", "de-DE", "ruhe", "ruhe", "audio_volume_mute"),
        row("4", "de-DE", "wie spät", "wie spät", "datetime_query"),
    ]
}

/// Records of `locale` from [`sample_records`].
#[must_use]
pub fn sample_records_for(locale: &str) -> Vec<Record> {
    sample_records()
        .into_iter()
        .filter(|r| r.get("locale").and_then(Value::as_str) == Some(locale))
        .collect()
}

/// Write [`sample_records`] as a dataset archive with one member per locale.
///
/// # Errors
/// Returns an error if the archive cannot be written.
#[cfg(feature = "compression-gzip")]
pub fn write_sample_archive(path: impl AsRef<Path>) -> Result<()> {
    ArchiveBuilder::new()
        .dir("1.0")
        .dir("1.0/data")
        .records("1.0/data/en-US.jsonl", &sample_records_for("en-US"))
        .records("1.0/data/fr-FR.jsonl", &sample_records_for("fr-FR"))
        .records("1.0/data/de-DE.jsonl", &sample_records_for("de-DE"))
        .file("1.0/LICENSE", "CC BY 4.0\n")
        .write(path)
}
