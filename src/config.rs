//! Dataset layout and export naming.
//!
//! [`DatasetConfig`] carries every name the loader and exporters rely on.
//! The defaults describe the MASSIVE layout: one `.jsonl` member per
//! locale, `en-US` as the reference locale, and reference utterances paired
//! through the `id` column.
//!
//! ```
//! use massive_wrangle::DatasetConfig;
//!
//! let cfg = DatasetConfig::default().with_reference_locale("en-GB");
//! assert_eq!(cfg.reference_locale, "en-GB");
//! assert_eq!(cfg.id_column, "id");
//! ```

use std::path::{Path, PathBuf};

/// Names used by the loader and the exporters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Locale every other locale is paired against.
    pub reference_locale: String,
    /// Join key shared by all locales.
    pub id_column: String,
    /// Column holding the locale tag.
    pub locale_column: String,
    /// Reference columns kept on the left side of a pair join.
    pub reference_projection: Vec<String>,
    /// Archive members are read only when their name ends with this suffix.
    pub member_suffix: String,
    /// File name of the combined translation-pairs export.
    pub combined_file_name: String,
    /// Spreadsheet prefix; the per-locale file is `<prefix><locale>.xlsx`.
    pub spreadsheet_prefix: String,
    /// Stem of the reference-only spreadsheet.
    pub reference_spreadsheet_stem: String,
    /// Suffixes appended to colliding column names (left, right) in joins.
    pub join_suffixes: (String, String),
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            reference_locale: "en-US".to_string(),
            id_column: "id".to_string(),
            locale_column: "locale".to_string(),
            reference_projection: vec!["id".into(), "utt".into(), "annot_utt".into()],
            member_suffix: ".jsonl".to_string(),
            combined_file_name: "combined_translation.jsonl".to_string(),
            spreadsheet_prefix: "en-".to_string(),
            reference_spreadsheet_stem: "en-en".to_string(),
            join_suffixes: ("_x".to_string(), "_y".to_string()),
        }
    }
}

impl DatasetConfig {
    #[must_use]
    pub fn with_reference_locale(mut self, locale: impl Into<String>) -> Self {
        self.reference_locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    #[must_use]
    pub fn with_locale_column(mut self, column: impl Into<String>) -> Self {
        self.locale_column = column.into();
        self
    }

    #[must_use]
    pub fn with_reference_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_projection = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_member_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.member_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_join_suffixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.join_suffixes = (left.into(), right.into());
        self
    }

    /// Path of the combined translation-pairs file inside `output_dir`.
    #[must_use]
    pub fn combined_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.combined_file_name)
    }

    /// Path of the reference-only spreadsheet inside `output_dir`.
    #[must_use]
    pub fn reference_spreadsheet_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.xlsx", self.reference_spreadsheet_stem))
    }

    /// Path of the spreadsheet pairing the reference with `locale`.
    #[must_use]
    pub fn locale_spreadsheet_path(&self, output_dir: &Path, locale: &str) -> PathBuf {
        output_dir.join(format!("{}{locale}.xlsx", self.spreadsheet_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let cfg = DatasetConfig::default();
        let dir = Path::new("out");
        assert_eq!(cfg.combined_path(dir), dir.join("combined_translation.jsonl"));
        assert_eq!(cfg.reference_spreadsheet_path(dir), dir.join("en-en.xlsx"));
        assert_eq!(cfg.locale_spreadsheet_path(dir, "fr-FR"), dir.join("en-fr-FR.xlsx"));
    }

    #[test]
    fn builders_override_fields() {
        let cfg = DatasetConfig::default()
            .with_id_column("uid")
            .with_locale_column("lang")
            .with_reference_projection(["uid", "text"])
            .with_member_suffix(".ndjson")
            .with_join_suffixes("_ref", "_tgt");
        assert_eq!(cfg.id_column, "uid");
        assert_eq!(cfg.locale_column, "lang");
        assert_eq!(cfg.reference_projection, vec!["uid", "text"]);
        assert_eq!(cfg.member_suffix, ".ndjson");
        assert_eq!(cfg.join_suffixes, ("_ref".to_string(), "_tgt".to_string()));
    }
}
