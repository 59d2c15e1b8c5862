use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::capability::DigestCapability;

/// Global configuration loaded from `~/.config/ftpv/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtpvConfig {
    /// Digest algorithm the CLI uses when `--algo` is not given.
    pub default_algorithm: DigestCapability,
    /// Optional checksum read-buffer size in bytes (None = built-in 64 KiB). Reserved.
    #[serde(default)]
    pub checksum_buffer_bytes: Option<usize>,
}

impl Default for FtpvConfig {
    fn default() -> Self {
        Self {
            default_algorithm: DigestCapability::Sha256,
            checksum_buffer_bytes: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ftpv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FtpvConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FtpvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FtpvConfig = toml::from_str(&data)?;
    Ok(cfg)
}
