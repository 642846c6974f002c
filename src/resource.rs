use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pathfmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    File,
    Folder,
    Repository,
    Link,
}

impl ResourceKind {
    pub fn icon(self) -> &'static str {
        match self {
            ResourceKind::File => "📄",
            ResourceKind::Folder => "📁",
            ResourceKind::Repository => "📦",
            ResourceKind::Link => "🔗",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::File => "file",
            ResourceKind::Folder => "folder",
            ResourceKind::Repository => "repository",
            ResourceKind::Link => "link",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reference attached to a space: a file pulled from a repository, a
/// folder, a whole repository, or a link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Display name, usually a repository-relative path (`src/lib/utils.ts`).
    pub name: String,

    /// Where the resource came from, e.g. `owner/repo` or `repo/branch`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    #[serde(default, rename = "type")]
    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }

    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn file_name(&self) -> &str {
        pathfmt::file_name(&self.name)
    }

    pub fn dir_name(&self) -> &str {
        pathfmt::dir_name(&self.name)
    }

    /// `source` with empty strings folded into `None`.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }

    /// Repository name: the first segment of `source`.
    pub fn repo(&self) -> Option<&str> {
        self.source()
            .and_then(|s| s.split('/').next())
            .filter(|s| !s.is_empty())
    }

    /// Two resources are the same reference when name and source match.
    pub fn same_reference(&self, other: &Resource) -> bool {
        self.name == other.name && self.source() == other.source()
    }
}

pub fn load_resources(path: &Path) -> Result<Vec<Resource>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let s =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<Resource> =
        serde_json::from_str(&s).with_context(|| format!("invalid JSON: {}", path.display()))?;
    Ok(items)
}

pub fn save_resources(path: &Path, resources: &[Resource]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let s = serde_json::to_string_pretty(resources).context("failed to serialize resources")?;
    fs::write(path, s).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
