//! In-memory tables of JSON records.
//!
//! A [`Table`] is an ordered list of rows over a fixed column list. It is
//! built once (from parsed records or a spreadsheet) and never mutated:
//! [`filter_eq`](Table::filter_eq), [`select`](Table::select) and
//! [`inner_join`](Table::inner_join) all return new tables.
//!
//! ```
//! use massive_wrangle::{Record, Table};
//! use serde_json::json;
//!
//! let rows: Vec<Record> = vec![
//!     json!({"id": 1, "locale": "en-US", "utt": "hi"}),
//!     json!({"id": 1, "locale": "fr-FR", "utt": "salut"}),
//! ]
//! .into_iter()
//! .map(|v| v.as_object().cloned().unwrap())
//! .collect();
//!
//! let t = Table::from_records(rows);
//! let fr = t.filter_eq("locale", &json!("fr-FR")).unwrap();
//! assert_eq!(fr.len(), 1);
//! ```

use crate::value::ValueKey;
use anyhow::{Result, anyhow, bail};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// One record: field name to value, in field order.
pub type Record = Map<String, Value>;

/// Ordered rows sharing one column list. Missing fields are `null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given columns.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from positional rows.
    ///
    /// # Errors
    /// Returns an error if any row's width differs from `columns.len()`.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            bail!(
                "row #{} has {} cells, expected {} ({:?})",
                i + 1,
                row.len(),
                columns.len(),
                columns
            );
        }
        Ok(Self { columns, rows })
    }

    /// Build a table from records.
    ///
    /// Columns are the union of all keys in first-seen order; a record that
    /// lacks a column gets `null` there.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let records: Vec<Record> = records.into_iter().collect();
        let mut columns = Vec::<String>::new();
        let mut seen = HashSet::<&str>::new();
        for rec in &records {
            for k in rec.keys() {
                if seen.insert(k.as_str()) {
                    columns.push(k.clone());
                }
            }
        }
        let rows = records
            .iter()
            .map(|rec| {
                columns
                    .iter()
                    .map(|c| rec.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` in the column list.
    ///
    /// # Errors
    /// Returns a lookup error listing the available columns.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns.iter().position(|c| c == name).ok_or_else(|| {
            anyhow!(
                "column `{name}` not found; available columns: {:?}",
                self.columns
            )
        })
    }

    /// Values of one column in row order.
    ///
    /// # Errors
    /// Returns an error if the column does not exist.
    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Distinct values of one column in first-appearance order.
    ///
    /// # Errors
    /// Returns an error if the column does not exist.
    pub fn unique(&self, name: &str) -> Result<Vec<Value>> {
        let mut seen = HashSet::<ValueKey>::new();
        let mut out = Vec::new();
        for v in self.column_values(name)? {
            if seen.insert(ValueKey::from(v)) {
                out.push(v.clone());
            }
        }
        Ok(out)
    }

    /// Whether any row holds `value` in `column`.
    ///
    /// # Errors
    /// Returns an error if the column does not exist.
    pub fn contains_value(&self, column: &str, value: &Value) -> Result<bool> {
        let key = ValueKey::from(value);
        Ok(self.column_values(column)?.any(|v| ValueKey::from(v) == key))
    }

    /// Rows whose `column` equals `value`, in their original order.
    ///
    /// # Errors
    /// Returns an error if the column does not exist.
    pub fn filter_eq(&self, column: &str, value: &Value) -> Result<Table> {
        let idx = self.column_index(column)?;
        let key = ValueKey::from(value);
        Ok(self.filter(|row| ValueKey::from(&row[idx]) == key))
    }

    /// Rows satisfying `pred`, in their original order.
    #[must_use]
    pub fn filter<F>(&self, pred: F) -> Table
    where
        F: Fn(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| pred(r.as_slice())).cloned().collect(),
        }
    }

    /// Project onto `names`, in the order given.
    ///
    /// # Errors
    /// Returns an error if any requested column does not exist.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let idx = names
            .iter()
            .map(|n| self.column_index(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| idx.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }

    /// Inner join with `right` on the column `on`.
    ///
    /// Output columns are this table's columns followed by `right`'s columns
    /// minus the key. A non-key name present on both sides gets `suffixes.0`
    /// on the left copy and `suffixes.1` on the right copy. Rows come out in
    /// left order; each left row is followed by its matches in right order.
    /// Keys present on only one side are dropped.
    ///
    /// # Errors
    /// Returns an error if either side lacks the key column, or if the output
    /// would hold two columns of the same name (a suffixed name already used
    /// by another column).
    pub fn inner_join(&self, right: &Table, on: &str, suffixes: (&str, &str)) -> Result<Table> {
        let lkey = self.column_index(on)?;
        let rkey = right.column_index(on)?;

        let overlap: HashSet<&str> = self
            .columns
            .iter()
            .filter(|c| c.as_str() != on && right.has_column(c))
            .map(String::as_str)
            .collect();
        let rename = |c: &str, suffix: &str| {
            if overlap.contains(c) {
                format!("{c}{suffix}")
            } else {
                c.to_string()
            }
        };

        let right_cols: Vec<usize> = (0..right.columns.len()).filter(|&i| i != rkey).collect();
        let mut columns: Vec<String> = self.columns.iter().map(|c| rename(c.as_str(), suffixes.0)).collect();
        columns.extend(right_cols.iter().map(|&i| rename(right.columns[i].as_str(), suffixes.1)));
        let mut names = HashSet::<&str>::new();
        if let Some(dup) = columns.iter().find(|c| !names.insert(c.as_str())) {
            bail!("joining on `{on}` would produce duplicate column `{dup}`; columns: {columns:?}");
        }

        let mut index: HashMap<ValueKey, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            index.entry(ValueKey::from(&row[rkey])).or_default().push(i);
        }

        let mut rows = Vec::new();
        for lrow in &self.rows {
            if let Some(matches) = index.get(&ValueKey::from(&lrow[lkey])) {
                for &ri in matches {
                    let rrow = &right.rows[ri];
                    let mut row = Vec::with_capacity(columns.len());
                    row.extend(lrow.iter().cloned());
                    row.extend(right_cols.iter().map(|&c| rrow[c].clone()));
                    rows.push(row);
                }
            }
        }
        Ok(Table { columns, rows })
    }

    /// Row `i` as a record keyed by column name.
    #[must_use]
    pub fn record(&self, i: usize) -> Option<Record> {
        self.rows.get(i).map(|r| self.to_record(r))
    }

    /// All rows as records, in order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.rows.iter().map(|r| self.to_record(r))
    }

    fn to_record(&self, row: &[Value]) -> Record {
        self.columns
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect()
    }
}
