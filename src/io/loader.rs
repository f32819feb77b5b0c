//! Record loader.
//!
//! Reads the entity and relationship tables into memory, in file order.

use crate::Result;
use crate::io::formats::{Format, open_record_source};
use crate::io::traits::Record;
use std::path::Path;
use tracing::instrument;

/// The two input tables, fully loaded.
#[derive(Debug, Clone, Default)]
pub struct RecordSets {
    /// Entity rows in file order.
    pub entities: Vec<Record>,
    /// Relationship rows in file order.
    pub relationships: Vec<Record>,
}

/// Loads every record from a file.
///
/// The format is taken from `format` when given, otherwise detected from the
/// file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row fails to parse.
/// No partial result is returned.
#[instrument(skip(format), fields(path = %path.display()))]
pub fn load_records(path: &Path, format: Option<Format>) -> Result<Vec<Record>> {
    let format = match format {
        Some(format) => format,
        None => Format::from_path(path)?,
    };

    let mut source = open_record_source(path, format)?;
    let mut records = Vec::with_capacity(source.size_hint().unwrap_or_default());
    while let Some(record) = source.next()? {
        records.push(record);
    }

    tracing::debug!(%format, rows = records.len(), "loaded records");
    metrics::counter!("graph_records_loaded_total", "format" => format.extension())
        .increment(records.len() as u64);

    Ok(records)
}

/// Loads the entity and relationship tables.
///
/// # Errors
///
/// Returns the first load error; the second table is not read if the first
/// fails.
pub fn load_record_sets(
    entities_path: &Path,
    relationships_path: &Path,
    format: Option<Format>,
) -> Result<RecordSets> {
    let entities = load_records(entities_path, format)?;
    let relationships = load_records(relationships_path, format)?;
    Ok(RecordSets {
        entities,
        relationships,
    })
}
