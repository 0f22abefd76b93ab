use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use herbex_db_memory::InMemorySource;
use herbex_export::{
    CSV_CONTENT_TYPE, ExportOptions, ExportPipeline, content_disposition, export_filename,
};

use crate::cli::ExportArgs;
use crate::output::{print_field, print_success};

pub async fn export(args: &ExportArgs, output_dir: PathBuf, page_size: Option<usize>) -> Result<()> {
    let source = InMemorySource::load_dataset_file(&args.data)
        .await
        .with_context(|| format!("Failed to load dataset {}", args.data.display()))?;

    let mut options = ExportOptions::new();
    if let Some(size) = page_size {
        options = options.with_page_size(size);
    }

    let collection = args.collection.as_deref();
    let filename = export_filename(collection);
    let destination = args
        .output
        .clone()
        .unwrap_or_else(|| output_dir.join(&filename));

    let pipeline = ExportPipeline::with_options(Arc::new(source), options);
    let summary = pipeline.export(collection, &destination).await?;

    print_success(&format!(
        "Wrote {} rows ({} records examined) to {}",
        summary.rows_written,
        summary.records_seen,
        summary.destination.display()
    ));
    print_field("Content-Type", CSV_CONTENT_TYPE);
    print_field("Content-Disposition", &content_disposition(&filename));
    Ok(())
}
