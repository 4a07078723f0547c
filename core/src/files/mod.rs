//! Directory entries produced by the listing parser.

use std::cmp::Ordering;

use serde::Serialize;

use crate::errors::ListingError;

/// A file or directory observed in one listing capture.
///
/// Entries are plain values: only the parser builds them, and callers read
/// them through accessors. Field names are serialized as camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    name: String,
    path: String,
    is_directory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    /// Date, time and zone tokens exactly as the device printed them.
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
}

impl DirEntry {
    pub(crate) fn new(
        base: &BasePath,
        name: String,
        is_directory: bool,
        size: Option<u64>,
        modified: Option<String>,
    ) -> Self {
        let path = base.join(&name);
        Self {
            name,
            path,
            is_directory,
            size,
            modified,
        }
    }

    /// Leaf name, without any symlink target.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the entry on the device.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Size in bytes, `None` when the listing carried no numeric size.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }
}

/// A validated absolute directory path that entry names are joined onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// Validate `path`: it must be non-empty and start with `/`.
    ///
    /// Trailing separators are dropped, so `/sdcard/` and `/sdcard` join
    /// identically. The root directory is kept as `/`.
    pub fn new(path: &str) -> Result<Self, ListingError> {
        let trimmed = path.trim();
        if !trimmed.starts_with('/') {
            return Err(ListingError::InvalidBasePath(path.to_string()));
        }
        let without_trailing = trimmed.trim_end_matches('/');
        Ok(Self(without_trailing.to_string()))
    }

    /// The normalized path, `/` for the root.
    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "/"
        } else {
            &self.0
        }
    }

    /// Join a leaf name onto this directory without doubling the separator.
    pub fn join(&self, name: &str) -> String {
        format!("{}/{name}", self.0)
    }
}

/// Canonical listing order: directories first, then case-insensitive name.
///
/// Names equal ignoring case fall back to a byte-wise comparison so the
/// order is total.
pub fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort entries in place with [`compare_entries`].
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(compare_entries);
}
