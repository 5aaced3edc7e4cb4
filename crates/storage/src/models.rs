//! Storage models.

use std::path::PathBuf;

/// A file listed from a [`Directory`](crate::Directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name, relative to the directory it was listed from
    pub name: PathBuf,
    /// File size in bytes
    pub size: u64,
}
impl FileInfo {
    pub fn new(name: impl Into<PathBuf>, size: u64) -> Self {
        Self { name: name.into(), size }
    }
}
