//! Optional TOML configuration.
//!
//! Only read when `--config` is given:
//!
//! ```toml
//! [align]
//! alignment = 16384
//! ```

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use pagealign_elf::{DEFAULT_ALIGNMENT, validate_alignment};
use serde::Deserialize;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `[align]` table.
    #[serde(default)]
    pub align: AlignSection,
}

/// Settings for the realignment pass.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignSection {
    /// Target `p_align` for `PT_LOAD` segments.
    pub alignment: Option<u64>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Picks the alignment: command-line flag, then config file, then the default.
pub fn resolve_alignment(flag: Option<u64>, config: Option<&Config>) -> Result<u64> {
    if let Some(alignment) = flag {
        return Ok(alignment);
    }
    match config.and_then(|c| c.align.alignment) {
        Some(alignment) => validate_alignment(alignment).map_err(|e| anyhow!("config: {e}")),
        None => Ok(DEFAULT_ALIGNMENT),
    }
}
