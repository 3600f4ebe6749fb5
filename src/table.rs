use std::io::{Read, Write};
#[cfg(test)]
use std::ops::Index;
use std::path::Path;

use crate::error::{Result, TallyError};

/// Columns of a table that was never saved.
pub const DEFAULT_COLUMNS: [&str; 4] = ["date", "category", "amount", "description"];

/// An ordered table of named text columns. Every row holds exactly one value
/// per column, positionally aligned with `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Borrowed view of one row, values aligned with the table's columns.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> RowRef<'a> {
    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// (column, value) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.columns
            .iter()
            .zip(self.values)
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

#[cfg(test)]
impl Index<&str> for RowRef<'_> {
    type Output = str;

    fn index(&self, column: &str) -> &str {
        match self.columns.iter().position(|c| c == column) {
            Some(i) => &self.values[i],
            None => panic!("no column named {column:?}"),
        }
    }
}

/// Give blank header cells an `Unnamed: N` name and suffix repeats with
/// `.1`, `.2`, ... so every file with a header row loads.
fn normalize_headers<'h>(headers: impl Iterator<Item = &'h str>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for (i, raw) in headers.enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            raw.to_string()
        };
        let mut name = base.clone();
        let mut n = 1;
        while columns.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        if name != raw {
            log::warn!("header {i} {raw:?} loaded as {name:?}");
        }
        columns.push(name);
    }
    columns
}

impl Table {
    /// Build a table from a header and rows, checking that names are unique
    /// and every row matches the header width.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(TallyError::Other("table has no columns".to_string()));
        }
        for (i, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(TallyError::EmptyColumnName);
            }
            if columns[..i].contains(name) {
                return Err(TallyError::DuplicateColumn(name.clone()));
            }
        }
        for row in &rows {
            if row.len() != columns.len() {
                return Err(TallyError::RowWidth {
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Resolve a user-typed column name: an exact match wins, otherwise the
    /// first case-insensitive match.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name).or_else(|| {
            let lower = name.to_lowercase();
            self.columns.iter().position(|c| c.to_lowercase() == lower)
        })
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append a row, returning its index.
    pub fn push_row(&mut self, values: Vec<String>) -> Result<usize> {
        if values.len() != self.columns.len() {
            return Err(TallyError::RowWidth {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(self.rows.len() - 1)
    }

    /// Append a column, filling existing rows with an empty value.
    pub fn push_column(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(TallyError::EmptyColumnName);
        }
        if self.columns.iter().any(|c| c == name) {
            return Err(TallyError::DuplicateColumn(name.to_string()));
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<Vec<String>> {
        if index >= self.rows.len() {
            return Err(TallyError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Remove a column by (case-insensitive) name, returning the stored name.
    pub fn remove_column(&mut self, name: &str) -> Result<String> {
        if self.columns.len() <= 1 {
            return Err(TallyError::LastColumn);
        }
        let idx = self
            .find_column(name)
            .ok_or_else(|| TallyError::UnknownColumn(name.to_string()))?;
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(self.columns.remove(idx))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let columns = normalize_headers(rdr.headers()?.iter());
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Self::from_parts(columns, rows)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TallyError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let table = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "loaded {} rows x {} columns from {}",
            table.len(),
            table.column_count(),
            path.display()
        );
        Ok(table)
    }

    /// Like `load`, but a missing file yields an empty default table.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(e) if e.is_not_found() => {
                log::info!("{} not found, starting with an empty table", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Overwrite `path` with the whole table, header first.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        log::info!("saved {} rows to {}", self.len(), path.display());
        Ok(())
    }
}
