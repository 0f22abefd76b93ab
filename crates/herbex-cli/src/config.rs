use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default export directory when neither flag, env, nor config set one.
const DEFAULT_OUTPUT_DIR: &str = "export";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    pub output_dir: Option<String>,
    pub page_size: Option<usize>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".herbex");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all() -> Result<ConfigFile> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    let cfg: ConfigFile = toml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let all = load_all()?;
    Ok(all
        .into_iter()
        .find(|(k, _)| k == profile)
        .map(|(_, v)| v)
        .unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all()?;
    all.insert(
        profile.to_string(),
        ProfileConfig {
            output_dir: config.output_dir.clone(),
            page_size: config.page_size,
        },
    );
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path()?, content)?;
    Ok(())
}

pub fn resolve_output_dir(cli_dir: &Option<PathBuf>, profile: &str) -> Result<PathBuf> {
    // 1. --output-dir flag / HERBEX_EXPORT_DIR env
    if let Some(dir) = cli_dir {
        return Ok(dir.clone());
    }
    // 2. config.toml profile
    let cfg = load_profile(profile)?;
    if let Some(dir) = cfg.output_dir {
        return Ok(PathBuf::from(dir));
    }
    // 3. Fixed default, matching the upstream export location
    Ok(PathBuf::from(DEFAULT_OUTPUT_DIR))
}

pub fn resolve_page_size(cli_page_size: Option<usize>, profile: &str) -> Result<Option<usize>> {
    if cli_page_size.is_some() {
        return Ok(cli_page_size);
    }
    Ok(load_profile(profile)?.page_size)
}
