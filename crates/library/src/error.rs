//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Operation-level kinds (`Convert`,
//! `Archive`, ...) wrap dependency-level kinds (`Storage`, `Codec`, ...) so
//! the printed tree reads from "what were we doing" down to "what broke".

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a library failure.
///
/// ### Fatal (abort the run)
/// - [`ErrorKind::Source`]
/// - [`ErrorKind::ArchiveDir`]
/// - [`ErrorKind::Discover`]
/// - [`ErrorKind::Index`]
///
/// ### Per-file (reported, batch continues)
/// - [`ErrorKind::Convert`]
/// - [`ErrorKind::Archive`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::Codec`]
/// - [`ErrorKind::Conflict`]
/// - [`ErrorKind::Serialize`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The source directory does not exist or is not a readable directory.
    #[display("source directory unavailable: {}", _0.display())]
    Source(#[error(not(source))] PathBuf),
    /// The archive directory could not be created.
    #[display("archive directory unavailable: {}", _0.display())]
    ArchiveDir(#[error(not(source))] PathBuf),
    /// Listing candidate slides failed.
    #[display("could not discover slides")]
    Discover,
    /// A single slide could not be converted.
    #[display("could not convert {}", _0.display())]
    Convert(#[error(not(source))] PathBuf),
    /// A single original could not be moved into the archive.
    #[display("could not archive {}", _0.display())]
    Archive(#[error(not(source))] PathBuf),
    /// The index could not be rebuilt or written.
    #[display("could not rebuild index")]
    Index,
    /// A directory operation (list, read, write, move) failed.
    Storage,
    /// Decoding or encoding an image failed.
    Codec,
    /// Even the time-suffixed archive name was taken.
    #[display("archive name already taken: {}", _0.display())]
    Conflict(#[error(not(source))] PathBuf),
    /// The index could not be serialized.
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if the error only affects a single file and the batch
    /// can carry on.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Convert(_) | Self::Archive(_))
    }

    /// Returns `true` if a later run might succeed without the file being
    /// touched (a busy archive name, a transient filesystem error).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Archive(_) | Self::Storage)
    }
}
