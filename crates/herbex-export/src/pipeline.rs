//! The export pipeline run.
//!
//! A run is a linear phase sequence: resolve roles, prepare the
//! destination, write the header, stream records in pages, close. There
//! are no retries and no backward transitions; any error aborts the run
//! and leaves a partial file in place.

use std::path::{Path, PathBuf};

use herbex_storage::{DynRecordSource, PageRequest, RecordQuery, TermId};

use crate::roles::MediaRoleRegistry;
use crate::writer::{RoleUrls, RowWriter};
use crate::{Error, Result};

/// Options governing an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Content classification of the records to export.
    pub classification: String,
    /// Vocabulary holding the media-use role terms.
    pub media_use_vocabulary: String,
    /// Vocabulary holding the collection terms.
    pub collection_vocabulary: String,
    /// Records fetched per page.
    pub page_size: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            classification: "darwin_core_herbarium".to_string(),
            media_use_vocabulary: "media_use".to_string(),
            collection_vocabulary: "collection".to_string(),
            page_size: 50,
        }
    }
}

impl ExportOptions {
    /// Creates options with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content classification.
    #[must_use]
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = classification.into();
        self
    }

    /// Sets the media-use vocabulary name.
    #[must_use]
    pub fn with_media_use_vocabulary(mut self, vocabulary: impl Into<String>) -> Self {
        self.media_use_vocabulary = vocabulary.into();
        self
    }

    /// Sets the collection vocabulary name.
    #[must_use]
    pub fn with_collection_vocabulary(mut self, vocabulary: impl Into<String>) -> Self {
        self.collection_vocabulary = vocabulary.into();
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Outcome of a completed export run.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of data rows written (records with at least one URL).
    pub rows_written: usize,
    /// Number of records examined, including skipped ones.
    pub records_seen: usize,
    /// Where the CSV was written.
    pub destination: PathBuf,
}

/// Returns the export filename for an optional collection filter.
///
/// Unfiltered exports use a fixed name; filtered ones embed the collection
/// name lowercased with spaces replaced by underscores.
#[must_use]
pub fn export_filename(collection: Option<&str>) -> String {
    match collection {
        Some(name) => format!(
            "{}_herbarium_export.csv",
            name.to_lowercase().replace(' ', "_")
        ),
        None => "herbarium_export.csv".to_string(),
    }
}

/// The export pipeline.
///
/// Holds a shared record source and the run options. One call to
/// [`export`](Self::export) performs one complete run.
pub struct ExportPipeline {
    source: DynRecordSource,
    options: ExportOptions,
}

impl ExportPipeline {
    /// Creates a pipeline over a source with default options.
    #[must_use]
    pub fn new(source: DynRecordSource) -> Self {
        Self {
            source,
            options: ExportOptions::default(),
        }
    }

    /// Creates a pipeline with explicit options.
    #[must_use]
    pub fn with_options(source: DynRecordSource, options: ExportOptions) -> Self {
        Self { source, options }
    }

    /// Returns the options this pipeline runs with.
    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Runs one export to `destination`, optionally filtered to the named
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if a role or collection name cannot
    /// be resolved to exactly one term, `Error::Io` if the destination
    /// cannot be prepared or written, `Error::Data` if a record with
    /// exportable media has no catalog number, and `Error::Source` if the
    /// backend fails. Any error aborts the run.
    pub async fn export(
        &self,
        collection: Option<&str>,
        destination: &Path,
    ) -> Result<ExportSummary> {
        tracing::info!(
            backend = self.source.backend_name(),
            classification = %self.options.classification,
            collection = collection.unwrap_or("<all>"),
            destination = %destination.display(),
            "Starting export"
        );

        let registry =
            MediaRoleRegistry::resolve(self.source.as_ref(), &self.options.media_use_vocabulary)
                .await?;

        let mut query = RecordQuery::new(&self.options.classification);
        if let Some(name) = collection {
            query = query.with_collection(self.resolve_collection(name).await?);
        }

        if let Some(dir) = destination.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let mut writer = RowWriter::create(destination)?;

        let mut rows_written = 0;
        let mut records_seen = 0;
        let mut page_request = PageRequest::new(0, self.options.page_size);
        loop {
            let page = self.source.fetch_records(&query, &page_request).await?;
            tracing::debug!(
                offset = page_request.offset,
                records = page.len(),
                has_more = page.has_more,
                "Fetched record page"
            );

            for record in &page.records {
                records_seen += 1;

                // Fresh accumulator per record; URLs must never carry over.
                let mut urls = RoleUrls::default();

                let mut media = self.source.media_for(&record.id).await?;
                media.sort_by_key(|m| m.created);
                for medium in media {
                    let Some(role) = registry.classify(&medium.usage) else {
                        continue;
                    };
                    if let Some(url) = self.source.file_url(&medium.file).await? {
                        urls.set(role, url);
                    }
                }

                if urls.is_empty() {
                    tracing::debug!(record = %record.id, "No qualifying media, skipping");
                    continue;
                }
                if record.catalog_number.trim().is_empty() {
                    return Err(Error::Data(format!(
                        "record {} has exportable media but no catalog number",
                        record.id
                    )));
                }

                writer.write_row(&urls.into_row(&record.catalog_number))?;
                rows_written += 1;
            }

            if !page.has_more {
                break;
            }
            page_request = page_request.next();
        }

        writer.finish()?;

        tracing::info!(rows_written, records_seen, "Export complete");
        Ok(ExportSummary {
            rows_written,
            records_seen,
            destination: destination.to_path_buf(),
        })
    }

    /// Maps a collection name to its term identifier, 1:1.
    async fn resolve_collection(&self, name: &str) -> Result<TermId> {
        let vocabulary = &self.options.collection_vocabulary;
        let mut matches = self.source.resolve_terms(vocabulary, name).await?;
        match matches.len() {
            0 => Err(Error::Configuration(format!(
                "collection \"{name}\" not found in vocabulary \"{vocabulary}\""
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(Error::Configuration(format!(
                "collection \"{name}\" is ambiguous in vocabulary \"{vocabulary}\": {n} matches"
            ))),
        }
    }
}
