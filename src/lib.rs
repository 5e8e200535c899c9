//! # massive-wrangle
//!
//! Helpers for locale-parallel utterance datasets such as MASSIVE, where
//! every locale holds the same utterances under shared ids.
//!
//! ## Key Features
//!
//! - **Archive loading** - read a `.tar.gz` of per-locale JSONL members into one [`Table`]
//! - **Locale pairing** - inner-join each locale with the reference locale (`en-US`) on `id`
//! - **JSONL export** - all pairs in one `combined_translation.jsonl`
//! - **Spreadsheet export** - `en-en.xlsx` plus one `en-<locale>.xlsx` per locale
//! - **Filtered export** - spreadsheet rows matching `column == value` as JSONL
//!
//! ## Quick Start
//!
//! ```no_run
//! use massive_wrangle::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let table = load_dataset("amazon-massive-dataset-1.0.tar.gz")?;
//!
//! generate_translation_jsonl(&table, "out")?;
//! generate_language_excel_files(&table, "out")?;
//! filter_into_jsonl("out/en-fr-FR.xlsx", "out", "scenario", "alarm")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Pair rows
//!
//! Reference rows are projected onto `id, utt, annot_utt` before the join,
//! so a pair row carries the reference text as `utt_x` / `annot_utt_x` and
//! the locale's text as `utt_y` / `annot_utt_y`, followed by the locale's
//! other columns (`locale`, `intent`, ...). Ids present on only one side are
//! dropped.
//!
//! ## Feature Flags
//!
//! - `io-jsonl` - JSON Lines I/O and the exporters
//! - `io-xlsx` - spreadsheet I/O (calamine reader, rust_xlsxwriter writer)
//! - `compression-gzip` - gzip archives and `.gz` JSONL outputs
//!
//! ## Logging
//!
//! Writes are reported through the [`log`](https://docs.rs/log) facade at
//! `info`, skipped archive members and per-locale pair counts at `debug`.
//! Install any logger (e.g. `env_logger`) to see them.
//!
//! ## Module Overview
//!
//! - [`table`] - `Table` and `Record`, projection, filter and inner join
//! - [`value`] - type-sensitive cell equality
//! - [`config`] - `DatasetConfig` naming for locales, columns and files
//! - [`io`] - archive loader, JSONL, spreadsheets, gzip
//! - [`export`] - the pairing exporters and filtered export
//! - [`testing`] - archive fixtures for tests

pub mod config;
pub mod io;
pub mod table;
pub mod testing;
pub mod value;

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod export;

// General re-exports
pub use config::DatasetConfig;
pub use io::archive::{load_dataset, load_dataset_with};
pub use table::{Record, Table};
pub use value::{ValueKey, values_equal};

// Gated re-exports
#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{read_jsonl_records, write_jsonl_vec, write_table_jsonl};

#[cfg(feature = "io-jsonl")]
pub use export::{generate_translation_jsonl, generate_translation_jsonl_with, locale_pairs};

#[cfg(all(feature = "io-jsonl", feature = "io-xlsx"))]
pub use export::{
    filter_into_jsonl, generate_language_excel_files, generate_language_excel_files_with,
};

#[cfg(feature = "io-xlsx")]
pub use io::xlsx::{read_xlsx_table, write_xlsx_table};
