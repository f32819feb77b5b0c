//! Tabular input subsystem.
//!
//! Reads the entity and relationship tables from files in several formats.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`RecordSource`]
//! - **Loader** drains a source into an ordered `Vec<Record>`
//!
//! # Supported Formats
//!
//! | Format | Extensions | Notes |
//! |--------|------------|-------|
//! | Parquet | `.parquet`, `.pq` | Requires `parquet` feature (default) |
//! | CSV | `.csv` | Header row required, empty cells are null |
//! | TSV | `.tsv` | As CSV, tab-delimited |
//! | JSON | `.json`, `.jsonl`, `.ndjson` | Newline-delimited (NDJSON) or array |
//! | YAML | `.yaml`, `.yml` | Sequence or document stream |
//!
//! # Example
//!
//! ```rust,ignore
//! use graphrag_viz::io::load_record_sets;
//! use std::path::Path;
//!
//! let sets = load_record_sets(
//!     Path::new("output/entities.parquet"),
//!     Path::new("output/relationships.parquet"),
//!     None,
//! )?;
//! println!("{} entities", sets.entities.len());
//! ```

pub mod formats;
pub mod loader;
pub mod traits;

pub use formats::Format;
pub use loader::{RecordSets, load_record_sets, load_records};
pub use traits::{Record, RecordSource};
