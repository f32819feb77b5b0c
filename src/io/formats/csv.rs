//! CSV format adapter.
//!
//! The first row must hold the column names. Empty cells read as null, the
//! same way dataframe libraries treat them. Cell values are kept verbatim;
//! only header names are trimmed.

use crate::io::traits::{Record, RecordSource};
use crate::{Error, Result};
use std::io::BufRead;

/// CSV record source.
///
/// Reads delimited text with a header row. Rows with fewer cells than the
/// header leave the trailing fields absent.
pub struct CsvRecordSource<R: BufRead> {
    /// CSV reader.
    reader: csv::Reader<R>,
    /// Column names from the header row.
    headers: Vec<String>,
}

impl<R: BufRead> CsvRecordSource<R> {
    /// Creates a comma-delimited record source.
    ///
    /// # Errors
    ///
    /// Returns an error if the header row cannot be read.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_delimiter(reader, b',')
    }

    /// Creates a record source with a custom delimiter (e.g. `b'\t'`).
    ///
    /// # Errors
    ///
    /// Returns an error if the header row cannot be read.
    pub fn with_delimiter(reader: R, delimiter: u8) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // Allow varying number of fields
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::OperationFailed {
                operation: "read_csv_headers".to_string(),
                cause: e.to_string(),
            })?
            .iter()
            .map(String::from)
            .collect();

        Ok(Self {
            reader: csv_reader,
            headers,
        })
    }

    /// Converts a CSV row into a record keyed by header name.
    fn parse_record(&self, row: &csv::StringRecord) -> Record {
        let mut record = Record::new();
        for (header, cell) in self.headers.iter().zip(row.iter()) {
            let value = Some(cell).filter(|s| !s.is_empty()).map(String::from);
            record.insert(header.clone(), value);
        }
        record
    }
}

impl<R: BufRead> RecordSource for CsvRecordSource<R> {
    fn next(&mut self) -> Result<Option<Record>> {
        let mut row = csv::StringRecord::new();

        let has_record = self
            .reader
            .read_record(&mut row)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse CSV row: {e}")))?;
        if !has_record {
            return Ok(None);
        }

        Ok(Some(self.parse_record(&row)))
    }
}
