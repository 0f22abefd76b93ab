use anyhow::{Context, Result};

use herbex_db_memory::InMemorySource;
use herbex_export::{ExportOptions, MediaRole, MediaRoleRegistry};

use crate::cli::RolesArgs;
use crate::output::print_field;

pub async fn roles(args: &RolesArgs) -> Result<()> {
    let source = InMemorySource::load_dataset_file(&args.data)
        .await
        .with_context(|| format!("Failed to load dataset {}", args.data.display()))?;

    let options = ExportOptions::default();
    let registry = MediaRoleRegistry::resolve(&source, &options.media_use_vocabulary).await?;

    for role in MediaRole::ALL {
        print_field(
            role.term_name(),
            registry.term(role).as_str(),
        );
    }
    Ok(())
}
