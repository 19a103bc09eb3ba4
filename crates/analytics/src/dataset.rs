use crate::error::AnalyticsError;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An input table: the deserialized rows plus the header of the file they came from.
///
/// The header is kept so a column that is absent from the source can be told
/// apart from a column whose values are all missing.
#[derive(Debug, Clone)]
pub struct Table<R> {
    name: &'static str,
    columns: Vec<String>,
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(name: &'static str, columns: Vec<String>, rows: Vec<R>) -> Self {
        Self { name, columns, rows }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

impl<R: DeserializeOwned> Table<R> {
    /// Reads a comma-separated file with a header row.
    ///
    /// Fails if the file cannot be opened, has no header or contains a row that
    /// does not fit the header. Individual cells never fail the load.
    pub fn load(name: &'static str, path: &Path) -> Result<Self, AnalyticsError> {
        let file = File::open(path).map_err(|source| AnalyticsError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(name, file).map_err(|source| AnalyticsError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })?;

        if table.columns.is_empty() {
            return Err(AnalyticsError::EmptyInput(path.to_path_buf()));
        }

        tracing::debug!(
            "Loaded {} rows from '{}' into the {} table. Columns: {:?}",
            table.len(),
            path.display(),
            name,
            table.columns
        );

        Ok(table)
    }

    pub fn from_reader<Rd: Read>(name: &'static str, reader: Rd) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns = csv_reader
            .headers()?
            .iter()
            .filter(|h| !h.is_empty())
            .map(str::to_owned)
            .collect();

        let rows = csv_reader.deserialize().collect::<Result<Vec<R>, _>>()?;

        Ok(Self::new(name, columns, rows))
    }
}
