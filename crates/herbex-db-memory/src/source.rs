//! In-memory record source backed by plain maps.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use herbex_storage::{
    FileId, Medium, PageRequest, RecordPage, RecordQuery, RecordSource, SourceError,
    SpecimenRecord, TermId,
};

/// A vocabulary term held by the in-memory source.
#[derive(Debug, Clone)]
struct Term {
    id: TermId,
    name: String,
}

/// In-memory record source.
///
/// Holds vocabularies, records, media, and file URLs in plain maps behind
/// `tokio::sync::RwLock`. Insertion order of records is preserved, so
/// paging is deterministic across runs. Intended for tests and for
/// file-seeded CLI runs.
#[derive(Debug, Default)]
pub struct InMemorySource {
    /// vocabulary name -> terms in insertion order
    vocabularies: RwLock<HashMap<String, Vec<Term>>>,
    /// (classification, record) in insertion order
    records: RwLock<Vec<(String, SpecimenRecord)>>,
    /// record id -> attached media
    media: RwLock<HashMap<String, Vec<Medium>>>,
    /// file id -> public URL
    files: RwLock<HashMap<FileId, String>>,
    /// Counter for generated term identifiers
    term_counter: AtomicU64,
}

impl InMemorySource {
    /// Creates a new empty in-memory source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next term identifier.
    fn next_term_id(&self) -> TermId {
        let n = self.term_counter.fetch_add(1, Ordering::SeqCst);
        TermId::new(format!("term-{n}"))
    }

    /// Adds a term to a vocabulary, generating its identifier.
    pub async fn add_term(&self, vocabulary: &str, name: &str) -> TermId {
        let id = self.next_term_id();
        self.add_term_with_id(vocabulary, id.clone(), name).await;
        id
    }

    /// Adds a term with an explicit identifier.
    ///
    /// Duplicate names within a vocabulary are allowed here; the caller
    /// decides whether an ambiguous name is an error.
    pub async fn add_term_with_id(&self, vocabulary: &str, id: TermId, name: &str) {
        let mut vocabularies = self.vocabularies.write().await;
        vocabularies.entry(vocabulary.to_string()).or_default().push(Term {
            id,
            name: name.to_string(),
        });
    }

    /// Adds a record under a content classification.
    pub async fn add_record(&self, classification: &str, record: SpecimenRecord) {
        let mut records = self.records.write().await;
        records.push((classification.to_string(), record));
    }

    /// Attaches a medium to a record.
    pub async fn attach_medium(&self, record_id: &str, medium: Medium) {
        let mut media = self.media.write().await;
        media.entry(record_id.to_string()).or_default().push(medium);
    }

    /// Attaches a medium built from its parts, generating the medium id.
    pub async fn attach_media_file(
        &self,
        record_id: &str,
        usage: TermId,
        file: FileId,
        created: OffsetDateTime,
    ) {
        let medium = Medium::new(uuid::Uuid::new_v4().to_string(), usage, file, created);
        self.attach_medium(record_id, medium).await;
    }

    /// Registers the public URL of a stored file.
    pub async fn set_file_url(&self, file: FileId, url: impl Into<String>) {
        let mut files = self.files.write().await;
        files.insert(file, url.into());
    }

    /// Returns the number of records held, across all classifications.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    async fn record_exists(&self, record_id: &str) -> bool {
        let records = self.records.read().await;
        records.iter().any(|(_, r)| r.id == record_id)
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn resolve_terms(
        &self,
        vocabulary: &str,
        name: &str,
    ) -> Result<Vec<TermId>, SourceError> {
        let vocabularies = self.vocabularies.read().await;
        let matches = vocabularies
            .get(vocabulary)
            .map(|terms| {
                terms
                    .iter()
                    .filter(|t| t.name == name)
                    .map(|t| t.id.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn fetch_records(
        &self,
        query: &RecordQuery,
        page: &PageRequest,
    ) -> Result<RecordPage, SourceError> {
        let records = self.records.read().await;
        let matching: Vec<&SpecimenRecord> = records
            .iter()
            .filter(|(classification, _)| *classification == query.classification)
            .map(|(_, record)| record)
            .filter(|record| match &query.collection {
                Some(collection) => record.collection.as_ref() == Some(collection),
                None => true,
            })
            .collect();

        let total = matching.len();
        let slice: Vec<SpecimenRecord> = matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect();
        let has_more = page.offset + slice.len() < total;

        Ok(RecordPage::with_records(slice)
            .with_has_more(has_more)
            .with_total(total))
    }

    async fn media_for(&self, record_id: &str) -> Result<Vec<Medium>, SourceError> {
        if !self.record_exists(record_id).await {
            return Err(SourceError::not_found("record", record_id));
        }
        let media = self.media.read().await;
        Ok(media.get(record_id).cloned().unwrap_or_default())
    }

    async fn file_url(&self, file: &FileId) -> Result<Option<String>, SourceError> {
        let files = self.files.read().await;
        Ok(files.get(file).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[tokio::test]
    async fn test_resolve_terms_matches_by_name() {
        let source = InMemorySource::new();
        let original = source.add_term("media_use", "Original File").await;
        source.add_term("media_use", "Service File").await;

        let found = source
            .resolve_terms("media_use", "Original File")
            .await
            .expect("resolve failed");
        assert_eq!(found, vec![original]);

        let missing = source
            .resolve_terms("media_use", "No Such Term")
            .await
            .expect("resolve failed");
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_terms_reports_duplicates() {
        let source = InMemorySource::new();
        let a = source.add_term("media_use", "Service File").await;
        let b = source.add_term("media_use", "Service File").await;

        let found = source
            .resolve_terms("media_use", "Service File")
            .await
            .expect("resolve failed");
        assert_eq!(found, vec![a, b]);
    }

    #[tokio::test]
    async fn test_fetch_records_pages_deterministically() {
        let source = InMemorySource::new();
        for i in 0..5 {
            source
                .add_record(
                    "darwin_core_herbarium",
                    SpecimenRecord::new(format!("r{i}"), format!("HUV-{i:04}")),
                )
                .await;
        }

        let query = RecordQuery::new("darwin_core_herbarium");
        let first = source
            .fetch_records(&query, &PageRequest::new(0, 2))
            .await
            .expect("fetch failed");
        assert_eq!(first.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.total, Some(5));
        assert_eq!(first.records[0].id, "r0");

        let last = source
            .fetch_records(&query, &PageRequest::new(4, 2))
            .await
            .expect("fetch failed");
        assert_eq!(last.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_fetch_records_filters_by_collection() {
        let source = InMemorySource::new();
        let fungi = source.add_term("collection", "Fungi").await;
        source
            .add_record(
                "darwin_core_herbarium",
                SpecimenRecord::new("r1", "HUV-0001").with_collection(fungi.clone()),
            )
            .await;
        source
            .add_record("darwin_core_herbarium", SpecimenRecord::new("r2", "HUV-0002"))
            .await;

        let query = RecordQuery::new("darwin_core_herbarium").with_collection(fungi);
        let page = source
            .fetch_records(&query, &PageRequest::new(0, 50))
            .await
            .expect("fetch failed");
        assert_eq!(page.len(), 1);
        assert_eq!(page.records[0].id, "r1");
    }

    #[tokio::test]
    async fn test_fetch_records_ignores_other_classifications() {
        let source = InMemorySource::new();
        source
            .add_record("darwin_core_herbarium", SpecimenRecord::new("r1", "HUV-0001"))
            .await;
        source
            .add_record("audio_recording", SpecimenRecord::new("r2", "AUD-0001"))
            .await;

        let page = source
            .fetch_records(
                &RecordQuery::new("darwin_core_herbarium"),
                &PageRequest::new(0, 50),
            )
            .await
            .expect("fetch failed");
        assert_eq!(page.len(), 1);
        assert_eq!(page.records[0].id, "r1");
    }

    #[tokio::test]
    async fn test_media_for_unknown_record_is_not_found() {
        let source = InMemorySource::new();
        let err = source.media_for("missing").await.expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_media_and_file_lookup() {
        let source = InMemorySource::new();
        let usage = source.add_term("media_use", "Thumbnail Image").await;
        source
            .add_record("darwin_core_herbarium", SpecimenRecord::new("r1", "HUV-0001"))
            .await;
        source
            .attach_media_file(
                "r1",
                usage,
                FileId::new("f1"),
                datetime!(2023-04-01 12:00 UTC),
            )
            .await;
        source
            .set_file_url(FileId::new("f1"), "https://repo.example.edu/files/f1.jpg")
            .await;

        let media = source.media_for("r1").await.expect("media lookup failed");
        assert_eq!(media.len(), 1);

        let url = source
            .file_url(&media[0].file)
            .await
            .expect("url lookup failed");
        assert_eq!(url.as_deref(), Some("https://repo.example.edu/files/f1.jpg"));

        let unresolved = source
            .file_url(&FileId::new("f2"))
            .await
            .expect("url lookup failed");
        assert!(unresolved.is_none());
    }
}
