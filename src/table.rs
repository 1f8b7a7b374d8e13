//! Delimited data-file reader for the contrast curve datasets
//!
//! Two layouts appear in `data/`:
//!
//! * whitespace-delimited text with a header row of column names, e.g.
//!   `Rho(as)  F160W_contr`, optionally preceded by `#` comment lines;
//! * comma-delimited `.csv` files without a header, addressed by column
//!   index.
//!
//! Comment lines may carry a `#short caption:` marker whose remainder is
//! used verbatim when assembling the figure caption.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while reading a data table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no data rows")]
    Empty { path: String },

    #[error("{path} row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        path: String,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("no column named '{name}' in {path}")]
    UnknownColumn { path: String, name: String },

    #[error("no column at index {index} in {path} ({width} columns)")]
    ColumnOutOfRange {
        path: String,
        index: usize,
        width: usize,
    },

    #[error("{path} column '{name}' row {row}: '{value}' is not a number")]
    NotANumber {
        path: String,
        name: String,
        row: usize,
        value: String,
    },
}

/// An in-memory data table with named or positional columns
#[derive(Debug, Clone)]
pub struct Table {
    path: String,
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    short_caption: Option<String>,
}

impl Table {
    /// Read a table from disk, dispatching on the file extension
    ///
    /// `.csv` files go through the csv reader without a header row; any
    /// other extension is treated as whitespace-delimited text whose first
    /// non-comment line names the columns.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            Self::from_csv(path)
        } else {
            Self::from_whitespace(path)
        }
    }

    fn from_whitespace(path: &Path) -> Result<Self, TableError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: display.clone(),
            source,
        })?;

        let short_caption = extract_short_caption(&text);

        let mut headers: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<String>> = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if headers.is_empty() {
                headers = fields.iter().map(|f| f.to_string()).collect();
                columns = vec![Vec::new(); headers.len()];
                continue;
            }

            if fields.len() != headers.len() {
                return Err(TableError::RaggedRow {
                    path: display,
                    row: line_no + 1,
                    found: fields.len(),
                    expected: headers.len(),
                });
            }
            for (column, field) in columns.iter_mut().zip(&fields) {
                column.push(field.to_string());
            }
        }

        if columns.is_empty() || columns[0].is_empty() {
            return Err(TableError::Empty { path: display });
        }

        Ok(Self {
            path: display,
            headers,
            columns,
            short_caption,
        })
    }

    fn from_csv(path: &Path) -> Result<Self, TableError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: display.clone(),
            source,
        })?;

        let short_caption = extract_short_caption(&text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(text.as_bytes());

        let mut headers: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<String>> = Vec::new();

        for (row_no, record) in reader.records().enumerate() {
            let record = record.map_err(|source| TableError::Csv {
                path: display.clone(),
                source,
            })?;

            if columns.is_empty() {
                headers = (0..record.len()).map(|i| format!("col{i}")).collect();
                columns = vec![Vec::new(); record.len()];
            }
            if record.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    path: display,
                    row: row_no + 1,
                    found: record.len(),
                    expected: columns.len(),
                });
            }
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        if columns.is_empty() || columns[0].is_empty() {
            return Err(TableError::Empty { path: display });
        }

        Ok(Self {
            path: display,
            headers,
            columns,
            short_caption,
        })
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `#short caption:` text, if the file carried one
    pub fn short_caption(&self) -> Option<&str> {
        self.short_caption.as_deref()
    }

    /// Path the table was read from
    pub fn path(&self) -> &str {
        &self.path
    }

    fn column_position(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| TableError::UnknownColumn {
                path: self.path.clone(),
                name: name.to_string(),
            })
    }

    /// Numeric column by header name
    pub fn column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let index = self.column_position(name)?;
        self.parse_column(index, name)
    }

    /// Numeric column by position, for headerless csv files
    pub fn column_by_index(&self, index: usize) -> Result<Vec<f64>, TableError> {
        if index >= self.columns.len() {
            return Err(TableError::ColumnOutOfRange {
                path: self.path.clone(),
                index,
                width: self.columns.len(),
            });
        }
        let name = self.headers[index].clone();
        self.parse_column(index, &name)
    }

    /// Raw text column by header name
    pub fn text_column(&self, name: &str) -> Result<&[String], TableError> {
        let index = self.column_position(name)?;
        Ok(&self.columns[index])
    }

    fn parse_column(&self, index: usize, name: &str) -> Result<Vec<f64>, TableError> {
        self.columns[index]
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.parse::<f64>().map_err(|_| TableError::NotANumber {
                    path: self.path.clone(),
                    name: name.to_string(),
                    row: row + 1,
                    value: value.clone(),
                })
            })
            .collect()
    }
}

/// Pull the short caption out of a file's comment lines
///
/// Looks for a comment containing `short caption:` (case-insensitive) and
/// returns the trimmed text after `caption:` verbatim.
pub fn extract_short_caption(text: &str) -> Option<String> {
    for line in text.lines() {
        if !line.trim_start().starts_with('#') {
            continue;
        }
        if find_ascii_ci(line, "short caption:").is_none() {
            continue;
        }
        if let Some(at) = find_ascii_ci(line, "caption:") {
            let caption = line[at + "caption:".len()..].trim();
            return Some(caption.to_string());
        }
    }
    None
}

/// Byte offset of an ASCII `needle` in `haystack`, ignoring ASCII case
///
/// Searches the original string directly so surrounding multibyte
/// characters cannot shift the offset.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.char_indices().find_map(|(at, _)| {
        haystack
            .get(at..at + needle.len())
            .filter(|candidate| candidate.eq_ignore_ascii_case(needle))
            .map(|_| at)
    })
}
