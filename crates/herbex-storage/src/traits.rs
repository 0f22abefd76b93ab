//! The record source trait every backend must implement.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::{FileId, Medium, PageRequest, RecordPage, RecordQuery, TermId};

/// A queryable source of specimen records, media, and vocabulary terms.
///
/// The export pipeline treats the backing store as an external
/// collaborator behind this trait: it never creates or mutates entities,
/// only reads them for the duration of one run. Implementations must be
/// thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use herbex_storage::{RecordSource, RecordQuery, PageRequest};
///
/// async fn count_records(source: &dyn RecordSource) -> Result<usize, SourceError> {
///     let query = RecordQuery::new("darwin_core_herbarium");
///     let page = source.fetch_records(&query, &PageRequest::new(0, 50)).await?;
///     Ok(page.total.unwrap_or(page.len()))
/// }
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Resolves a term name within a controlled vocabulary.
    ///
    /// Returns every matching term so the caller can distinguish a
    /// missing name from an ambiguous one.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for a name
    /// with no matches.
    async fn resolve_terms(
        &self,
        vocabulary: &str,
        name: &str,
    ) -> Result<Vec<TermId>, SourceError>;

    /// Fetches one bounded page of records matching the query.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Backend` if the store cannot be queried.
    async fn fetch_records(
        &self,
        query: &RecordQuery,
        page: &PageRequest,
    ) -> Result<RecordPage, SourceError>;

    /// Returns the media attached to a record.
    ///
    /// A record with no media yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::NotFound` if the record does not exist.
    async fn media_for(&self, record_id: &str) -> Result<Vec<Medium>, SourceError>;

    /// Resolves a stored file to a durable public URL.
    ///
    /// Returns `None` if the file has no resolvable URL.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn file_url(&self, file: &FileId) -> Result<Option<String>, SourceError>;

    /// Returns the name of this source backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that RecordSource is object-safe
    fn _assert_source_object_safe(_: &dyn RecordSource) {}
}
