//! Format adapters for tabular input.
//!
//! Each format implements the [`RecordSource`] trait.

pub mod csv;
pub mod json;
#[cfg(feature = "parquet")]
pub mod parquet;
pub mod yaml;

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use super::traits::RecordSource;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Apache Parquet columnar format.
    Parquet,
    /// Comma-separated values with a header row.
    Csv,
    /// Tab-separated values with a header row.
    Tsv,
    /// JSON (newline-delimited or array).
    Json,
    /// YAML (sequence or document stream).
    Yaml,
}

impl Format {
    /// Returns all formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Parquet, Self::Csv, Self::Tsv, Self::Json, Self::Yaml]
    }

    /// Returns the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Returns whether this build can read the format.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        match self {
            Self::Parquet => cfg!(feature = "parquet"),
            Self::Csv | Self::Tsv | Self::Json | Self::Yaml => true,
        }
    }

    /// Detects format from file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some(ext) => ext.parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "Unsupported file extension: .{ext} ({})",
                    path.display()
                ))
            }),
            None => Err(Error::InvalidInput(format!(
                "Cannot determine format: {} has no extension",
                path.display()
            ))),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "parquet" | "pq" => Ok(Self::Parquet),
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "json" | "ndjson" | "jsonl" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::InvalidInput(format!("Unknown format: {s}"))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Creates a record source for a text format.
///
/// Parquet needs random access to the file footer, so it is only available
/// through [`open_record_source`].
///
/// # Errors
///
/// Returns an error if the format is Parquet or the header cannot be read.
pub fn create_record_source<R: BufRead + 'static>(
    reader: R,
    format: Format,
) -> Result<Box<dyn RecordSource>> {
    match format {
        Format::Csv => Ok(Box::new(csv::CsvRecordSource::new(reader)?)),
        Format::Tsv => Ok(Box::new(csv::CsvRecordSource::with_delimiter(
            reader, b'\t',
        )?)),
        Format::Json => Ok(Box::new(json::JsonRecordSource::new(reader))),
        Format::Yaml => Ok(Box::new(yaml::YamlRecordSource::new(reader)?)),
        Format::Parquet => Err(Error::InvalidInput(
            "Parquet input must be opened from a file".to_string(),
        )),
    }
}

/// Opens a record source for the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is not compiled
/// in, or the file header is malformed.
pub fn open_record_source(path: &Path, format: Format) -> Result<Box<dyn RecordSource>> {
    if !format.is_available() {
        return Err(Error::FeatureNotEnabled(format.extension().to_string()));
    }

    let file = File::open(path).map_err(|e| Error::OperationFailed {
        operation: "open_input".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;

    match format {
        #[cfg(feature = "parquet")]
        Format::Parquet => Ok(Box::new(parquet::ParquetRecordSource::new(file)?)),
        #[cfg(not(feature = "parquet"))]
        Format::Parquet => Err(Error::FeatureNotEnabled("parquet".to_string())),
        Format::Csv | Format::Tsv | Format::Json | Format::Yaml => {
            create_record_source(BufReader::new(file), format)
        },
    }
}
