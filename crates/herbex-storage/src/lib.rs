//! # herbex-storage
//!
//! Record source abstraction layer for the herbex export pipeline.
//!
//! This crate defines the traits and types a specimen record backend must
//! provide. It does not contain any implementations - those live in
//! separate crates.
//!
//! ## Overview
//!
//! The main trait is [`RecordSource`], which defines the contract for:
//! - Controlled-vocabulary term resolution
//! - Paged record queries by classification and collection
//! - Media lookup per record
//! - File-to-URL resolution
//!
//! ## Example
//!
//! ```ignore
//! use herbex_storage::{RecordSource, RecordQuery, PageRequest, SourceError};
//!
//! async fn first_page(
//!     source: &dyn RecordSource,
//! ) -> Result<Vec<SpecimenRecord>, SourceError> {
//!     let query = RecordQuery::new("darwin_core_herbarium");
//!     let page = source.fetch_records(&query, &PageRequest::new(0, 50)).await?;
//!     Ok(page.records)
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, SourceError};
pub use traits::RecordSource;
pub use types::{
    FileId, Medium, PageRequest, RecordPage, RecordQuery, SpecimenRecord, TermId,
};

/// Type alias for a source result.
pub type SourceResult<T> = Result<T, SourceError>;

/// Type alias for a shared record source trait object.
pub type DynRecordSource = std::sync::Arc<dyn RecordSource>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use herbex_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, SourceError};
    pub use crate::traits::RecordSource;
    pub use crate::types::{
        FileId, Medium, PageRequest, RecordPage, RecordQuery, SpecimenRecord, TermId,
    };
    pub use crate::{DynRecordSource, SourceResult};
}
