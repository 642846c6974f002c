use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layout::DisplayMode;
use crate::quota::{DEFAULT_LIMIT_BYTES, Quota};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub quota: QuotaSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Row layout: `by-filename+source`, `by-fullpath+repo` or `two-line`.
    #[serde(default)]
    pub mode: DisplayMode,

    /// Row width in characters. Unset means the terminal width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,

    /// Average glyph width relative to one terminal cell, used by start truncation.
    #[serde(default = "default_char_width_factor")]
    pub char_width_factor: f64,

    /// For `truncate`: when even `first/.../file` is too wide, keep the file
    /// name (true) or the first folder (false).
    #[serde(default = "default_prioritize_end")]
    pub prioritize_end: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaSettings {
    /// Total bytes of attached references allowed per space.
    #[serde(default = "default_limit_bytes")]
    pub limit_bytes: u64,
}

fn default_char_width_factor() -> f64 {
    1.0
}

fn default_prioritize_end() -> bool {
    true
}

fn default_limit_bytes() -> u64 {
    DEFAULT_LIMIT_BYTES
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            width: None,
            char_width_factor: default_char_width_factor(),
            prioritize_end: default_prioritize_end(),
        }
    }
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            limit_bytes: default_limit_bytes(),
        }
    }
}

pub fn resolve_config_path(arg: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = arg {
        return Ok(p.to_path_buf());
    }
    let home = dirs::home_dir().context("failed to resolve home dir")?;
    Ok(home.join(".spaces-refs").join("config.toml"))
}

impl Config {
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let cfg: Config =
                toml::from_str(&s).with_context(|| format!("invalid TOML: {}", path.display()))?;
            cfg.validate()
                .with_context(|| format!("invalid config: {}", path.display()))?;
            return Ok(cfg);
        }

        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, s).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.quota.limit_bytes == 0 {
            anyhow::bail!("quota.limit_bytes must be greater than zero");
        }
        let factor = self.display.char_width_factor;
        if !factor.is_finite() || factor <= 0.0 {
            anyhow::bail!("display.char_width_factor must be a positive number, got {factor}");
        }
        if self.display.width == Some(0) {
            anyhow::bail!("display.width must be at least 1");
        }
        Ok(())
    }

    pub fn quota(&self) -> Quota {
        Quota::new(self.quota.limit_bytes)
    }
}
