//! Column-oriented dataset and source metadata.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CrowdcheckError, Result};

use super::value::Value;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// An immutable table of named, positionally aligned columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Vec<Value>>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from `(name, values)` pairs.
    ///
    /// Every column must have the same length and names must be unique.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut map: IndexMap<String, Vec<Value>> = IndexMap::new();
        let mut row_count = None;

        for (name, values) in columns {
            let name = name.into();
            match row_count {
                None => row_count = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(CrowdcheckError::Config(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        values.len(),
                        expected
                    )));
                }
                Some(_) => {}
            }
            if map.contains_key(&name) {
                return Err(CrowdcheckError::Config(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
            map.insert(name, values);
        }

        Ok(Self {
            columns: map,
            row_count: row_count.unwrap_or(0),
        })
    }

    /// Build a dataset from a header and row-major values.
    ///
    /// Short rows are padded with nulls and long rows truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Vec<Value>> = headers
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or(Value::Null));
            }
        }

        Self::from_columns(headers.into_iter().zip(columns))
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get all values of a column by name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|values| values.get(row))
    }

    /// A copy of this dataset with one column removed.
    pub fn without_column(&self, name: &str) -> Self {
        let mut columns = self.columns.clone();
        columns.shift_remove(name);
        let row_count = if columns.is_empty() { 0 } else { self.row_count };
        Self { columns, row_count }
    }

    /// Write the dataset as comma-separated text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(self.columns.keys())?;

        for row in 0..self.row_count {
            out.write_record(self.columns.values().map(|values| values[row].to_string()))?;
        }

        out.flush().map_err(|e| CrowdcheckError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Write the dataset to a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| CrowdcheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pads_short_rows() {
        let dataset = Dataset::from_rows(
            vec!["id".to_string(), "country".to_string()],
            vec![vec![Value::text("1")], vec![Value::text("2"), Value::text("US")]],
        )
        .unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.get(0, "country"), Some(&Value::Null));
        assert_eq!(dataset.get(1, "country"), Some(&Value::text("US")));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = Dataset::from_columns(vec![
            ("a", vec![Value::Null]),
            ("b", vec![Value::Null, Value::Null]),
        ]);
        assert!(matches!(result, Err(CrowdcheckError::Config(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Dataset::from_columns(vec![("a", vec![]), ("a", vec![])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_without_column_keeps_order() {
        let dataset = Dataset::from_columns(vec![
            ("id", vec![Value::text("1")]),
            ("usd_pledged", vec![Value::Number(10.0)]),
            ("country", vec![Value::text("US")]),
        ])
        .unwrap();

        let trimmed = dataset.without_column("usd_pledged");
        assert_eq!(trimmed.column_names().collect::<Vec<_>>(), vec!["id", "country"]);
        assert_eq!(trimmed.row_count(), 1);
    }

    #[test]
    fn test_write_csv() {
        let dataset = Dataset::from_columns(vec![
            ("id", vec![Value::text("1"), Value::text("2")]),
            ("goal", vec![Value::Number(5.0), Value::Null]),
        ])
        .unwrap();

        let mut buf = Vec::new();
        dataset.write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "id,goal\n1,5\n2,\n");
    }
}
