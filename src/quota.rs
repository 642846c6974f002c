//! Byte accounting for attached references.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::Resource;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Quota used by the workspace UI unless configured otherwise.
pub const DEFAULT_LIMIT_BYTES: u64 = 3 * MIB;

/// Sum of every `file_size`, with a missing size counted as zero.
pub fn total_size(resources: &[Resource]) -> u64 {
    resources
        .iter()
        .map(|r| r.file_size.unwrap_or(0))
        .fold(0, u64::saturating_add)
}

/// Whether adding `additional` bytes would take the collection past `limit`.
/// A zero limit is always exceeded.
pub fn would_exceed(resources: &[Resource], additional: u64, limit: u64) -> bool {
    limit == 0 || total_size(resources).saturating_add(additional) > limit
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Share of `limit` in use, clamped to `0..=100`. A zero limit reads as full.
pub fn percentage_used(resources: &[Resource], limit: u64) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    (100.0 * total_size(resources) as f64 / limit as f64).clamp(0.0, 100.0)
}

pub fn format_percentage(pct: f64) -> String {
    if pct.is_nan() || pct <= 0.0 {
        "0%".to_string()
    } else if pct < 1.0 {
        "<1%".to_string()
    } else {
        format!("{:.0}%", pct.min(100.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub limit: u64,
}

impl Default for Quota {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT_BYTES,
        }
    }
}

impl Quota {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn would_exceed(&self, resources: &[Resource], additional: u64) -> bool {
        would_exceed(resources, additional, self.limit)
    }

    pub fn remaining(&self, resources: &[Resource]) -> u64 {
        self.limit.saturating_sub(total_size(resources))
    }

    pub fn usage(&self, resources: &[Resource]) -> Usage {
        let used = total_size(resources);
        Usage {
            used,
            limit: self.limit,
            percentage: percentage_used(resources, self.limit),
            exceeded: self.limit == 0 || used > self.limit,
        }
    }
}

/// Snapshot driving a usage bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub used: u64,
    pub limit: u64,
    pub percentage: f64,
    pub exceeded: bool,
}

impl Usage {
    /// `"1.5 MB / 3.0 MB (50%)"`
    pub fn summary(&self) -> String {
        format!(
            "{} / {} ({})",
            format_bytes(self.used),
            format_bytes(self.limit),
            format_percentage(self.percentage)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error(
        "adding {name} ({}) would exceed the {} limit; {} left",
        bytes(.size),
        bytes(.limit),
        bytes(.remaining)
    )]
    QuotaExceeded {
        name: String,
        size: u64,
        limit: u64,
        remaining: u64,
    },

    #[error("{0} is already attached")]
    Duplicate(String),

    #[error("no reference named {0}")]
    NotFound(String),
}

fn bytes(n: &u64) -> String {
    format_bytes(*n)
}

/// Ordered set of references kept within a [`Quota`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceList {
    resources: Vec<Resource>,
    quota: Quota,
}

impl ReferenceList {
    pub fn new(quota: Quota) -> Self {
        Self {
            resources: Vec::new(),
            quota,
        }
    }

    /// Wrap an existing collection as-is. It may already be over quota, in
    /// which case every further add is refused.
    pub fn from_resources(resources: Vec<Resource>, quota: Quota) -> Self {
        Self { resources, quota }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        total_size(&self.resources)
    }

    pub fn remaining(&self) -> u64 {
        self.quota.remaining(&self.resources)
    }

    pub fn usage(&self) -> Usage {
        self.quota.usage(&self.resources)
    }

    /// Append `resource` unless it is already attached or its size would
    /// take the list past the quota. The list is unchanged on error.
    pub fn try_add(&mut self, resource: Resource) -> Result<(), ReferenceError> {
        if self.resources.iter().any(|r| r.same_reference(&resource)) {
            return Err(ReferenceError::Duplicate(resource.name));
        }
        let size = resource.file_size.unwrap_or(0);
        if self.quota.would_exceed(&self.resources, size) {
            return Err(ReferenceError::QuotaExceeded {
                remaining: self.remaining(),
                limit: self.quota.limit,
                name: resource.name,
                size,
            });
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Remove the reference with this name and source, the same identity
    /// [`ReferenceList::try_add`] uses for duplicates.
    pub fn remove(&mut self, name: &str, source: Option<&str>) -> Result<Resource, ReferenceError> {
        let source = source.filter(|s| !s.is_empty());
        let idx = self
            .resources
            .iter()
            .position(|r| r.name == name && r.source() == source)
            .ok_or_else(|| ReferenceError::NotFound(name.to_string()))?;
        Ok(self.resources.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(sizes: &[Option<u64>]) -> Vec<Resource> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, s)| Resource {
                name: format!("file{i}.txt"),
                file_size: *s,
                ..Resource::default()
            })
            .collect()
    }

    #[test]
    fn total_counts_missing_sizes_as_zero() {
        assert_eq!(total_size(&sized(&[Some(1000), Some(2000), None])), 3000);
        assert_eq!(total_size(&[]), 0);
        assert_eq!(total_size(&sized(&[Some(u64::MAX), Some(1)])), u64::MAX);
    }

    #[test]
    fn exceed_check_at_the_boundary() {
        let items = sized(&[Some(DEFAULT_LIMIT_BYTES - 100)]);
        assert!(would_exceed(&items, 200, DEFAULT_LIMIT_BYTES));
        assert!(!would_exceed(&items, 100, DEFAULT_LIMIT_BYTES));
        assert!(!would_exceed(&items, 0, DEFAULT_LIMIT_BYTES));
    }

    #[test]
    fn exceed_is_monotonic_in_additional_bytes() {
        let items = sized(&[Some(700), None, Some(200)]);
        let mut seen_true = false;
        for additional in (0..=200).map(|n| n * 10) {
            let now = would_exceed(&items, additional, 1000);
            assert!(!seen_true || now, "flipped back at {additional}");
            seen_true |= now;
        }
        assert!(seen_true);
    }

    #[test]
    fn zero_limit_is_always_exceeded() {
        assert!(would_exceed(&[], 0, 0));
        assert_eq!(percentage_used(&[], 0), 100.0);
        assert!(Quota::new(0).usage(&[]).exceeded);
    }

    #[test]
    fn formats_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2 * MIB), "2.0 MB");
        assert_eq!(format_bytes(DEFAULT_LIMIT_BYTES), "3.0 MB");
    }

    #[test]
    fn percentage_is_clamped() {
        let limit = 1000;
        assert_eq!(percentage_used(&sized(&[Some(250)]), limit), 25.0);
        assert_eq!(percentage_used(&sized(&[Some(5000)]), limit), 100.0);
        assert_eq!(percentage_used(&[], limit), 0.0);
    }

    #[test]
    fn formats_percentage_with_single_threshold() {
        assert_eq!(format_percentage(0.0), "0%");
        assert_eq!(format_percentage(0.05), "<1%");
        assert_eq!(format_percentage(0.99), "<1%");
        assert_eq!(format_percentage(42.4), "42%");
        assert_eq!(format_percentage(100.0), "100%");
    }

    #[test]
    fn usage_summary() {
        let usage = Quota::default().usage(&sized(&[Some(MIB + MIB / 2)]));
        assert_eq!(usage.summary(), "1.5 MB / 3.0 MB (50%)");
        assert!(!usage.exceeded);
    }

    #[test]
    fn reference_list_enforces_quota() {
        let mut list = ReferenceList::new(Quota::new(1000));
        list.try_add(Resource::new("a.rs").with_size(600)).unwrap();
        let err = list
            .try_add(Resource::new("b.rs").with_size(500))
            .unwrap_err();
        assert_eq!(
            err,
            ReferenceError::QuotaExceeded {
                name: "b.rs".to_string(),
                size: 500,
                limit: 1000,
                remaining: 400,
            }
        );
        assert_eq!(list.len(), 1);
        list.try_add(Resource::new("c.rs").with_size(400)).unwrap();
        assert_eq!(list.remaining(), 0);
        // Sizeless references still fit a list sitting exactly at its limit.
        list.try_add(Resource::new("notes")).unwrap();
        assert_eq!(list.total_size(), 1000);
    }

    #[test]
    fn over_quota_list_refuses_every_add() {
        let mut list = ReferenceList::from_resources(
            vec![Resource::new("big.bin").with_size(2000)],
            Quota::new(1000),
        );
        assert_eq!(
            list.try_add(Resource::new("notes")),
            Err(ReferenceError::QuotaExceeded {
                name: "notes".to_string(),
                size: 0,
                limit: 1000,
                remaining: 0,
            })
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn reference_list_rejects_duplicates_and_removes() {
        let mut list = ReferenceList::default();
        list.try_add(Resource::new("a.rs").with_source("acme/web"))
            .unwrap();
        assert_eq!(
            list.try_add(Resource::new("a.rs").with_source("acme/web")),
            Err(ReferenceError::Duplicate("a.rs".to_string()))
        );
        list.try_add(Resource::new("a.rs").with_source("acme/api"))
            .unwrap();

        let removed = list.remove("a.rs", Some("acme/api")).unwrap();
        assert_eq!(removed.source.as_deref(), Some("acme/api"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.resources()[0].source.as_deref(), Some("acme/web"));

        assert_eq!(
            list.remove("a.rs", None),
            Err(ReferenceError::NotFound("a.rs".to_string()))
        );
        assert_eq!(
            list.remove("missing", Some("acme/web")),
            Err(ReferenceError::NotFound("missing".to_string()))
        );
        list.remove("a.rs", Some("acme/web")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn remove_matches_sourceless_references() {
        let mut list = ReferenceList::default();
        list.try_add(Resource::new("notes.md").with_source("acme/web"))
            .unwrap();
        list.try_add(Resource::new("notes.md")).unwrap();

        // An empty source means the same as none.
        let removed = list.remove("notes.md", Some("")).unwrap();
        assert_eq!(removed.source, None);
        assert_eq!(list.resources()[0].source(), Some("acme/web"));
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ReferenceError::QuotaExceeded {
            name: "big.bin".to_string(),
            size: 2 * MIB,
            limit: DEFAULT_LIMIT_BYTES,
            remaining: MIB,
        };
        assert_eq!(
            err.to_string(),
            "adding big.bin (2.0 MB) would exceed the 3.0 MB limit; 1.0 MB left"
        );
    }
}
