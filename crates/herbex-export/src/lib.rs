//! Specimen media CSV export pipeline.
//!
//! This crate turns a queryable record source into a CSV file: one row per
//! catalogued specimen, with the public URLs of its Original, Service, and
//! Thumbnail media resolved by controlled-vocabulary role.
//!
//! # Components
//!
//! - [`MediaRoleRegistry`] - role-name resolution against the media-use
//!   vocabulary, done once per run
//! - [`ExportPipeline`] - the linear extract-transform-write run
//! - [`RowWriter`] - CSV output with the fixed export header
//!
//! # Example
//!
//! ```ignore
//! use herbex_export::{ExportOptions, ExportPipeline};
//!
//! let pipeline = ExportPipeline::new(source);
//! let summary = pipeline.export(Some("Fungi"), &destination).await?;
//! println!("{} rows written", summary.rows_written);
//! ```

mod pipeline;
mod roles;
mod writer;

pub use pipeline::{ExportOptions, ExportPipeline, ExportSummary, export_filename};
pub use roles::{MediaRole, MediaRoleRegistry};
pub use writer::{CSV_CONTENT_TYPE, EXPORT_HEADER, ExportRow, RoleUrls, RowWriter, content_disposition};

use herbex_storage::SourceError;
use thiserror::Error;

/// Errors that can occur during an export run.
#[derive(Debug, Error)]
pub enum Error {
    /// A required vocabulary lookup failed or was ambiguous.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The destination could not be prepared or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be serialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record or medium had an unexpected shape.
    #[error("Data error: {0}")]
    Data(String),

    /// The record source failed.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
