//! Data types for the record source abstraction layer.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Opaque identifier for a controlled-vocabulary term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub String);

impl TermId {
    /// Creates a new `TermId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TermId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque identifier for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    /// Creates a new `FileId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A catalogued specimen record as read from the source.
///
/// Records are read-only from the pipeline's point of view; the source
/// owns their lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecimenRecord {
    /// The record identifier.
    pub id: String,
    /// The human-assigned catalog number.
    pub catalog_number: String,
    /// The collection this record belongs to, if any.
    pub collection: Option<TermId>,
}

impl SpecimenRecord {
    /// Creates a new `SpecimenRecord` with no collection.
    #[must_use]
    pub fn new(id: impl Into<String>, catalog_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            catalog_number: catalog_number.into(),
            collection: None,
        }
    }

    /// Sets the collection term.
    #[must_use]
    pub fn with_collection(mut self, collection: TermId) -> Self {
        self.collection = Some(collection);
        self
    }
}

/// A file attachment belonging to a record, tagged with one media-use term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medium {
    /// The medium identifier.
    pub id: String,
    /// The media-use term this medium is tagged with.
    pub usage: TermId,
    /// The underlying stored file.
    pub file: FileId,
    /// When the medium was created. Later media of the same role
    /// override earlier ones during export.
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

impl Medium {
    /// Creates a new `Medium` created at the given time.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        usage: TermId,
        file: FileId,
        created: OffsetDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            usage,
            file,
            created,
        }
    }
}

/// A query for records of one content classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordQuery {
    /// The content classification to match (e.g. "darwin_core_herbarium").
    pub classification: String,
    /// Restrict results to records in this collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<TermId>,
}

impl RecordQuery {
    /// Creates a new query for the given classification.
    #[must_use]
    pub fn new(classification: impl Into<String>) -> Self {
        Self {
            classification: classification.into(),
            collection: None,
        }
    }

    /// Restricts the query to one collection.
    #[must_use]
    pub fn with_collection(mut self, collection: TermId) -> Self {
        self.collection = Some(collection);
        self
    }
}

/// A bounded page of a record query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of records to skip.
    pub offset: usize,
    /// Maximum number of records to return.
    pub limit: usize,
}

impl PageRequest {
    /// Creates a new `PageRequest`.
    #[must_use]
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Returns the request for the page after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}

/// One page of records returned by a source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPage {
    /// The records in this page.
    pub records: Vec<SpecimenRecord>,
    /// Whether more records are available beyond this page.
    pub has_more: bool,
    /// Total count of matching records, if the source knows it.
    pub total: Option<usize>,
}

impl RecordPage {
    /// Creates a new empty `RecordPage`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a new `RecordPage` with records.
    #[must_use]
    pub fn with_records(records: Vec<SpecimenRecord>) -> Self {
        Self {
            records,
            has_more: false,
            total: None,
        }
    }

    /// Sets the has_more flag.
    #[must_use]
    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    /// Sets the total count.
    #[must_use]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Returns the number of records in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if this page has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
