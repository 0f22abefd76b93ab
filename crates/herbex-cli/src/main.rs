mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};
use output::{print_error, print_field, print_success};

#[tokio::main]
async fn main() {
    // Load .env file if present; missing files are fine for local runs.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Export(args) => {
            let output_dir = config::resolve_output_dir(&cli.output_dir, profile)?;
            let page_size = config::resolve_page_size(args.page_size, profile)?;
            commands::export::export(args, output_dir, page_size).await?;
        }
        Commands::Roles(args) => {
            commands::roles::roles(args).await?;
        }
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                print_field("Profile", profile);
                print_field(
                    "Output dir",
                    cfg.output_dir.as_deref().unwrap_or("(not set)"),
                );
                print_field(
                    "Page size",
                    &cfg.page_size
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "(not set)".to_string()),
                );
            }
            ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "output_dir" => cfg.output_dir = Some(set_args.value.clone()),
                    "page_size" => {
                        cfg.page_size = Some(set_args.value.parse().map_err(|_| {
                            anyhow::anyhow!("page_size must be a positive integer")
                        })?);
                    }
                    other => {
                        anyhow::bail!(
                            "Unknown config key: {other}. Valid keys: output_dir, page_size"
                        )
                    }
                }
                config::save_profile(profile, &cfg)?;
                print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}
