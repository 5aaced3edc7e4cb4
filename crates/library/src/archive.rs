use crate::Context;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use slidearc_storage::FileInfo;
use slidearc_storage::error::ErrorKind as StorageErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use time::{OffsetDateTime, Time};

/// The outcome of (successfully) archiving a single original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archived {
    /// Moved into the archive under its own name.
    Moved(PathBuf),
    /// The name was taken, so the original was moved under a time-suffixed name.
    Renamed(PathBuf),
}

impl Archived {
    pub fn name(&self) -> &PathBuf {
        match self {
            Self::Moved(name) | Self::Renamed(name) => name,
        }
    }
}

/// Moves an original slide from the source directory into the archive.
///
/// The bytes are moved, never re-encoded. If the archive already holds a file
/// of that name the original is moved to `<stem>_HHMMSS.<ext>` instead, using
/// the local wall-clock time. Should that name be taken too (a second
/// collision within the same second) the move is refused and the original
/// stays where it is; nothing is ever overwritten.
///
/// Call this only after [`convert_file`](crate::convert::convert_file)
/// succeeded for the same file, so the original is never the only copy lost.
///
/// # Errors
/// Returns [`ErrorKind::Archive`] wrapping a [`Storage`](ErrorKind::Storage) or
/// [`Conflict`](ErrorKind::Conflict) failure.
pub fn archive_file(ctx: &Context, file: &FileInfo) -> Result<Archived> {
    archive_file_inner(ctx, file, now).or_raise(|| ErrorKind::Archive(file.name.clone()))
}

fn archive_file_inner(ctx: &Context, file: &FileInfo, clock: impl Fn() -> Time) -> Result<Archived> {
    match ctx.source.move_to(&file.name, &ctx.archive, &file.name) {
        Ok(_) => {
            tracing::info!(name = %file.name.display(), "Archived original");
            return Ok(Archived::Moved(file.name.clone()));
        },
        Err(e) if matches!(e.deref(), StorageErrorKind::AlreadyExists(_)) => {},
        Err(e) => return Err(e).or_raise(|| ErrorKind::Storage),
    }

    let renamed = collision_name(&file.name, clock());
    match ctx.source.move_to(&file.name, &ctx.archive, &renamed) {
        Ok(_) => {
            tracing::warn!(name = %file.name.display(), renamed = %renamed.display(), "Archive name taken; archived original under a new name");
            Ok(Archived::Renamed(renamed))
        },
        Err(e) if matches!(e.deref(), StorageErrorKind::AlreadyExists(_)) => {
            Err(e).or_raise(|| ErrorKind::Conflict(renamed))
        },
        Err(e) => Err(e).or_raise(|| ErrorKind::Storage),
    }
}

/// `260206_SM_01.png` at 14:30:05 becomes `260206_SM_01_143005.png`.
pub fn collision_name(name: &Path, time: Time) -> PathBuf {
    let suffix = format!("{:02}{:02}{:02}", time.hour(), time.minute(), time.second());
    let stem = name.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    match name.extension() {
        Some(ext) => PathBuf::from(format!("{stem}_{suffix}.{}", ext.to_string_lossy())),
        None => PathBuf::from(format!("{stem}_{suffix}")),
    }
}

fn now() -> Time {
    // The local offset can be unavailable (e.g. on some multi-threaded Unix
    // processes); UTC still gives a usable suffix.
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()).time()
}
