//! Apache Parquet format adapter.
//!
//! Decodes record batches through Arrow and projects every column to its
//! display string. Requires the `parquet` feature.

use crate::io::traits::{Record, RecordSource};
use crate::{Error, Result};
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use std::collections::VecDeque;
use std::fs::File;

/// Parquet record source.
///
/// Reads one record batch at a time and hands out its rows in order.
pub struct ParquetRecordSource {
    reader: ParquetRecordBatchReader,
    /// Rows decoded from the current batch.
    pending: VecDeque<Record>,
    /// Row count from the file footer.
    total_rows: Option<usize>,
}

impl ParquetRecordSource {
    /// Opens a Parquet file.
    ///
    /// # Errors
    ///
    /// Returns an error if the footer or schema cannot be decoded.
    pub fn new(file: File) -> Result<Self> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::InvalidInput(format!("Failed to open Parquet file: {e}")))?;
        let total_rows = usize::try_from(builder.metadata().file_metadata().num_rows()).ok();
        let reader = builder
            .build()
            .map_err(|e| Error::InvalidInput(format!("Failed to create Parquet reader: {e}")))?;

        Ok(Self {
            reader,
            pending: VecDeque::new(),
            total_rows,
        })
    }
}

/// Converts a record batch to rows keyed by column name.
fn batch_to_records(batch: &RecordBatch) -> Result<Vec<Record>> {
    let schema = batch.schema();
    let options = FormatOptions::default();
    let formatters = batch
        .columns()
        .iter()
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::InvalidInput(format!("Unsupported Parquet column: {e}")))?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut record = Record::new();
        for ((field, column), formatter) in schema
            .fields()
            .iter()
            .zip(batch.columns())
            .zip(&formatters)
        {
            let value = if column.is_null(row) {
                None
            } else {
                Some(formatter.value(row).to_string())
            };
            record.insert(field.name().clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

impl RecordSource for ParquetRecordSource {
    fn next(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }

            let Some(batch) = self.reader.next() else {
                return Ok(None);
            };
            let batch = batch
                .map_err(|e| Error::InvalidInput(format!("Failed to read Parquet batch: {e}")))?;
            self.pending.extend(batch_to_records(&batch)?);
        }
    }

    fn size_hint(&self) -> Option<usize> {
        self.total_rows
    }
}
