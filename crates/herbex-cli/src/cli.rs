use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "herbex")]
#[command(about = "Herbex CLI — export herbarium specimen media to CSV")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Export directory (overrides config and HERBEX_EXPORT_DIR env var)
    #[arg(short, long, global = true, env = "HERBEX_EXPORT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config profile name
    #[arg(short, long, global = true, env = "HERBEX_PROFILE", default_value = "default")]
    pub profile: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the CSV export against a dataset
    Export(ExportArgs),
    /// Show the resolved media role registry for a dataset
    Roles(RolesArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct ExportArgs {
    /// Path to the JSON dataset to export from
    #[arg(long, env = "HERBEX_DATA")]
    pub data: PathBuf,

    /// Restrict the export to one named collection
    #[arg(long)]
    pub collection: Option<String>,

    /// Records fetched per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Destination file (defaults to the derived name under the export directory)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RolesArgs {
    /// Path to the JSON dataset to inspect
    #[arg(long, env = "HERBEX_DATA")]
    pub data: PathBuf,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the active profile's configuration
    Show,
    /// Set a configuration value
    Set(SetArgs),
}

#[derive(clap::Args)]
pub struct SetArgs {
    /// Config key (output_dir, page_size)
    pub key: String,
    /// New value
    pub value: String,
}
