//! CSV output for export rows.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{MediaRole, Result};

/// The fixed export header.
///
/// Column 3 is labeled "url" but carries the Service File URL; the label
/// is inherited from the upstream export format and consumers depend on
/// it, so it must not be corrected.
pub const EXPORT_HEADER: [&str; 4] = ["catalognumber", "originalurl", "url", "thumbnail"];

/// Content type a presentation layer should serve the file with.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Builds the Content-Disposition header value for a download.
#[must_use]
pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename={filename}")
}

/// One emitted export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// The record's catalog number.
    pub catalog_number: String,
    /// Resolved Original File URL, empty when unresolved.
    pub original_url: String,
    /// Resolved Service File URL, empty when unresolved.
    pub service_url: String,
    /// Resolved Thumbnail Image URL, empty when unresolved.
    pub thumbnail_url: String,
}

/// Per-record URL accumulator.
///
/// A fresh instance is created for every record so one record's resolved
/// URLs can never leak into the next.
#[derive(Debug, Clone, Default)]
pub struct RoleUrls {
    original: Option<String>,
    service: Option<String>,
    thumbnail: Option<String>,
}

impl RoleUrls {
    /// Stores a resolved URL for a role. A later call for the same role
    /// replaces the earlier URL.
    pub fn set(&mut self, role: MediaRole, url: String) {
        match role {
            MediaRole::Original => self.original = Some(url),
            MediaRole::Service => self.service = Some(url),
            MediaRole::Thumbnail => self.thumbnail = Some(url),
        }
    }

    /// Returns the URL resolved for a role, if any.
    #[must_use]
    pub fn get(&self, role: MediaRole) -> Option<&str> {
        match role {
            MediaRole::Original => self.original.as_deref(),
            MediaRole::Service => self.service.as_deref(),
            MediaRole::Thumbnail => self.thumbnail.as_deref(),
        }
    }

    /// Returns true if no role resolved to a URL.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original.is_none() && self.service.is_none() && self.thumbnail.is_none()
    }

    /// Builds the export row for a catalog number, with unresolved roles
    /// as empty cells.
    #[must_use]
    pub fn into_row(self, catalog_number: &str) -> ExportRow {
        ExportRow {
            catalog_number: catalog_number.to_string(),
            original_url: self.original.unwrap_or_default(),
            service_url: self.service.unwrap_or_default(),
            thumbnail_url: self.thumbnail.unwrap_or_default(),
        }
    }
}

/// CSV writer for export rows.
///
/// Writes the fixed header on construction, then one record per row.
pub struct RowWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl RowWriter<File> {
    /// Opens the destination file for writing and emits the header row.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created, or a CSV error
    /// if the header cannot be written.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> RowWriter<W> {
    /// Wraps an arbitrary writer and emits the header row.
    ///
    /// # Errors
    ///
    /// Returns a CSV error if the header cannot be written.
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        inner.write_record(EXPORT_HEADER)?;
        Ok(Self { inner })
    }

    /// Appends one export row.
    ///
    /// # Errors
    ///
    /// Returns a CSV error if the row cannot be written.
    pub fn write_row(&mut self, row: &ExportRow) -> Result<()> {
        self.inner.write_record([
            row.catalog_number.as_str(),
            row.original_url.as_str(),
            row.service_url.as_str(),
            row.thumbnail_url.as_str(),
        ])?;
        Ok(())
    }

    /// Flushes buffered rows and releases the writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the flush fails.
    pub fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(rows: &[ExportRow]) -> String {
        let mut buf = Vec::new();
        let mut writer = RowWriter::from_writer(&mut buf).expect("writer should open");
        for row in rows {
            writer.write_row(row).expect("row should write");
        }
        writer.finish().expect("flush should succeed");
        String::from_utf8(buf).expect("output should be utf-8")
    }

    #[test]
    fn test_header_only() {
        let csv = written(&[]);
        assert_eq!(csv, "catalognumber,originalurl,url,thumbnail\n");
    }

    #[test]
    fn test_full_row() {
        let csv = written(&[ExportRow {
            catalog_number: "HUV-0001".to_string(),
            original_url: "https://x/o.tif".to_string(),
            service_url: "https://x/s.jpg".to_string(),
            thumbnail_url: "https://x/t.jpg".to_string(),
        }]);
        assert!(csv.ends_with("HUV-0001,https://x/o.tif,https://x/s.jpg,https://x/t.jpg\n"));
    }

    #[test]
    fn test_partial_row_keeps_empty_cells() {
        let mut urls = RoleUrls::default();
        urls.set(MediaRole::Thumbnail, "https://x/t.jpg".to_string());
        let csv = written(&[urls.into_row("HUV-0002")]);
        assert!(csv.ends_with("HUV-0002,,,https://x/t.jpg\n"));
    }

    #[test]
    fn test_role_urls_last_write_wins() {
        let mut urls = RoleUrls::default();
        urls.set(MediaRole::Service, "https://x/old.jpg".to_string());
        urls.set(MediaRole::Service, "https://x/new.jpg".to_string());
        assert_eq!(urls.get(MediaRole::Service), Some("https://x/new.jpg"));
    }

    #[test]
    fn test_role_urls_is_empty() {
        let mut urls = RoleUrls::default();
        assert!(urls.is_empty());
        urls.set(MediaRole::Original, "https://x/o.tif".to_string());
        assert!(!urls.is_empty());
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let csv = written(&[ExportRow {
            catalog_number: "HUV,0003".to_string(),
            original_url: String::new(),
            service_url: String::new(),
            thumbnail_url: "https://x/t.jpg".to_string(),
        }]);
        assert!(csv.contains("\"HUV,0003\""));
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("herbarium_export.csv"),
            "attachment; filename=herbarium_export.csv"
        );
    }
}
