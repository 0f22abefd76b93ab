//! JSON dataset loading for the in-memory source.
//!
//! A dataset file seeds vocabularies, records, media, and file URLs in one
//! document, so the CLI can run the export pipeline against a plain file.

use std::path::Path;

use serde::Deserialize;
use time::OffsetDateTime;

use herbex_storage::{FileId, Medium, SpecimenRecord, TermId};

use crate::source::InMemorySource;

/// Errors that can occur while loading a dataset file.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset file is not valid JSON or has the wrong shape.
    #[error("Dataset parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset is well-formed JSON but internally inconsistent.
    #[error("Invalid dataset: {0}")]
    Invalid(String),
}

/// A parsed dataset document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    /// Controlled-vocabulary terms.
    #[serde(default)]
    pub terms: Vec<TermEntry>,
    /// Specimen records.
    #[serde(default)]
    pub records: Vec<RecordEntry>,
    /// Media attachments.
    #[serde(default)]
    pub media: Vec<MediumEntry>,
    /// Stored files and their public URLs.
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One vocabulary term in a dataset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermEntry {
    /// The vocabulary the term belongs to (e.g. "media_use").
    pub vocabulary: String,
    /// Explicit term identifier; generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// The human-readable term name.
    pub name: String,
}

/// One specimen record in a dataset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordEntry {
    /// Explicit record identifier; generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// Content classification; defaults to "darwin_core_herbarium".
    #[serde(default = "default_classification")]
    pub classification: String,
    /// The catalog number.
    pub catalog_number: String,
    /// Term identifier of the collection this record belongs to.
    #[serde(default)]
    pub collection: Option<String>,
}

/// One medium in a dataset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediumEntry {
    /// Explicit medium identifier; generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// Identifier of the record this medium belongs to.
    pub record: String,
    /// Term identifier of the media-use tag.
    pub usage: String,
    /// Identifier of the underlying stored file.
    pub file: String,
    /// Creation time; media without one sort before all dated media.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
}

/// One stored file in a dataset.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    /// The file identifier media refer to.
    pub id: String,
    /// The durable public URL.
    pub url: String,
}

fn default_classification() -> String {
    "darwin_core_herbarium".to_string()
}

impl InMemorySource {
    /// Builds an in-memory source from a parsed dataset.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Invalid` if a medium refers to a record id
    /// that does not appear in the dataset.
    pub async fn from_dataset(dataset: Dataset) -> Result<Self, DatasetError> {
        let source = Self::new();

        for term in dataset.terms {
            match term.id {
                Some(id) => {
                    source
                        .add_term_with_id(&term.vocabulary, TermId::new(id), &term.name)
                        .await;
                }
                None => {
                    source.add_term(&term.vocabulary, &term.name).await;
                }
            }
        }

        let mut record_ids = Vec::new();
        for entry in dataset.records {
            let id = entry
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            record_ids.push(id.clone());
            let mut record = SpecimenRecord::new(id, entry.catalog_number);
            if let Some(collection) = entry.collection {
                record = record.with_collection(TermId::new(collection));
            }
            source.add_record(&entry.classification, record).await;
        }

        for entry in dataset.media {
            if !record_ids.contains(&entry.record) {
                return Err(DatasetError::Invalid(format!(
                    "medium refers to unknown record: {}",
                    entry.record
                )));
            }
            let medium = Medium::new(
                entry
                    .id
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                TermId::new(entry.usage),
                FileId::new(entry.file),
                entry.created.unwrap_or(OffsetDateTime::UNIX_EPOCH),
            );
            source.attach_medium(&entry.record, medium).await;
        }

        for file in dataset.files {
            source.set_file_url(FileId::new(file.id), file.url).await;
        }

        Ok(source)
    }

    /// Reads and parses a dataset file, then builds a source from it.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` if the file cannot be read,
    /// `DatasetError::Json` if it cannot be parsed, or
    /// `DatasetError::Invalid` if it is internally inconsistent.
    pub async fn load_dataset_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        Self::from_dataset(dataset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herbex_storage::{PageRequest, RecordQuery, RecordSource};

    fn sample_dataset() -> Dataset {
        serde_json::from_value(serde_json::json!({
            "terms": [
                {"vocabulary": "media_use", "id": "t-original", "name": "Original File"},
                {"vocabulary": "media_use", "id": "t-service", "name": "Service File"},
                {"vocabulary": "media_use", "id": "t-thumb", "name": "Thumbnail Image"},
                {"vocabulary": "collection", "id": "t-fungi", "name": "Fungi"}
            ],
            "records": [
                {"id": "r1", "catalog_number": "HUV-0001", "collection": "t-fungi"},
                {"id": "r2", "catalog_number": "HUV-0002"}
            ],
            "media": [
                {
                    "id": "m1",
                    "record": "r1",
                    "usage": "t-service",
                    "file": "f1",
                    "created": "2023-04-01T12:00:00Z"
                }
            ],
            "files": [
                {"id": "f1", "url": "https://repo.example.edu/files/f1.jpg"}
            ]
        }))
        .expect("sample dataset should parse")
    }

    #[tokio::test]
    async fn test_from_dataset_seeds_everything() {
        let source = InMemorySource::from_dataset(sample_dataset())
            .await
            .expect("dataset should load");

        assert_eq!(source.record_count().await, 2);

        let terms = source
            .resolve_terms("media_use", "Service File")
            .await
            .expect("resolve failed");
        assert_eq!(terms, vec![TermId::new("t-service")]);

        let media = source.media_for("r1").await.expect("media lookup failed");
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].file, FileId::new("f1"));

        let page = source
            .fetch_records(
                &RecordQuery::new("darwin_core_herbarium"),
                &PageRequest::new(0, 50),
            )
            .await
            .expect("fetch failed");
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_from_dataset_rejects_dangling_medium() {
        let mut dataset = sample_dataset();
        dataset.media[0].record = "missing".to_string();

        let err = InMemorySource::from_dataset(dataset)
            .await
            .expect_err("should fail");
        assert!(matches!(err, DatasetError::Invalid(_)));
    }

    #[test]
    fn test_dataset_rejects_unknown_fields() {
        let result: Result<Dataset, _> = serde_json::from_value(serde_json::json!({
            "records": [{"catalog_number": "HUV-0001", "nodetype": "page"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_defaults() {
        let dataset: Dataset = serde_json::from_value(serde_json::json!({
            "records": [{"catalog_number": "HUV-0001"}]
        }))
        .expect("dataset should parse");
        assert_eq!(dataset.records[0].classification, "darwin_core_herbarium");
        assert!(dataset.terms.is_empty());
    }
}
