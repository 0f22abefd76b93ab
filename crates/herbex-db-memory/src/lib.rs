//! In-memory record source for the herbex export pipeline.
//!
//! This crate provides an in-memory implementation of the `RecordSource`
//! trait from `herbex-storage`, plus a JSON dataset loader so a source can
//! be seeded from a plain file.
//!
//! # Example
//!
//! ```ignore
//! use herbex_db_memory::InMemorySource;
//! use herbex_storage::SpecimenRecord;
//!
//! let source = InMemorySource::new();
//! source
//!     .add_record("darwin_core_herbarium", SpecimenRecord::new("r1", "HUV-0001"))
//!     .await;
//! ```

mod dataset;
mod source;

// Re-export the RecordSource trait for convenience
pub use herbex_storage::{RecordSource, SourceError};

pub use dataset::{Dataset, DatasetError, FileEntry, MediumEntry, RecordEntry, TermEntry};
pub use source::InMemorySource;

/// Type alias for a shareable record source instance.
pub type DynRecordSource = herbex_storage::DynRecordSource;

/// Creates a new empty in-memory record source behind an `Arc`.
pub fn create_record_source() -> DynRecordSource {
    std::sync::Arc::new(InMemorySource::new())
}
