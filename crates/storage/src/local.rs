//! Local filesystem directory access.
//!
//! Slides live in flat directories: the source folder users drop images into
//! and the archive folder next to it. A [`Directory`] wraps one of those roots
//! and exposes just the operations the pipeline needs, all synchronous.

use crate::error::{ErrorKind, Result};
use crate::{FileInfo, path::validate as validate_name};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A flat directory on the local filesystem.
///
/// All names passed to its methods are plain file names relative to the root;
/// see [`validate_name`](crate::validate_name).
///
/// # Examples
///
/// ```no_run
/// use slidearc_storage::{Directory, error::Result};
///
/// # fn example() -> Result<()> {
/// let source = Directory::open("images")?;
/// let archive = Directory::create("images/archive")?;
/// for file in source.list()? {
///     println!("{}", file.name.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Directory {
    root: PathBuf,
}
impl Directory {
    /// Open an existing directory.
    ///
    /// # Errors
    ///
    /// [`NotFound`](ErrorKind::NotFound) if the root doesn't exist and
    /// [`InvalidPath`](ErrorKind::InvalidPath) if it isn't a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let metadata = fs::metadata(&root).map_err(|e| map_io_error(e, &root))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { root })
    }

    /// Open a directory, creating it (and any parents) first if needed.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| map_io_error(e, root))?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of `name` inside this directory.
    pub fn path(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_name(name)?;
        Ok(self.root.join(validated))
    }

    /// List the regular files directly inside the directory, sorted by name.
    ///
    /// Subdirectories are not descended into. Symlinks are followed; broken
    /// ones are silently dropped.
    pub fn list(&self) -> Result<Vec<FileInfo>> {
        let entries = fs::read_dir(&self.root).map_err(|e| map_io_error(e, &self.root))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(e, &self.root))?;
            let path = entry.path();
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Skipping dangling directory entry");
                    continue;
                },
                Err(e) => exn::bail!(map_io_error(e, &path)),
            };
            if !metadata.is_file() {
                continue;
            }
            files.push(FileInfo::new(entry.file_name(), metadata.len()));
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub fn exists(&self, name: impl AsRef<Path>) -> Result<bool> {
        let path = self.path(name)?;
        Ok(fs::exists(&path).map_err(|e| map_io_error(e, &path))?)
    }

    pub fn read(&self, name: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.path(name)?;
        Ok(fs::read(&path).map_err(|e| map_io_error(e, &path))?)
    }

    /// Write `data` to `name`, replacing any existing file.
    ///
    /// The data goes to a temporary file in the same directory which is synced
    /// and then renamed over the destination, so readers never observe a
    /// partially written file.
    pub fn write(&self, name: impl AsRef<Path>, data: &[u8]) -> Result<()> {
        let path = self.path(name)?;
        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| map_io_error(e, &self.root))?;
        temp.write_all(data).map_err(ErrorKind::Io)?;
        temp.as_file().sync_all().map_err(ErrorKind::Io)?;
        temp.persist(&path).map_err(|e| map_io_error(e.error, &path))?;
        Ok(())
    }

    /// Move `name` out of this directory into `destination` as `new_name`.
    ///
    /// Refuses with [`AlreadyExists`](ErrorKind::AlreadyExists) rather than
    /// overwriting. Moves across filesystems fall back to copy, sync, then
    /// removal of the source; the source is only removed once the copy is
    /// durable. Returns the full destination path.
    pub fn move_to(&self, name: impl AsRef<Path>, destination: &Directory, new_name: impl AsRef<Path>) -> Result<PathBuf> {
        let from = self.path(name)?;
        let to = destination.path(new_name)?;
        if fs::exists(&to).map_err(|e| map_io_error(e, &to))? {
            exn::bail!(ErrorKind::AlreadyExists(to));
        }
        match fs::rename(&from, &to) {
            Ok(()) => Ok(to),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::debug!(from = %from.display(), to = %to.display(), "Rename crosses devices; copying instead");
                copy_then_remove(&from, &to)?;
                Ok(to)
            },
            Err(e) => exn::bail!(map_io_error(e, &from)),
        }
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    let mut source = File::open(from).map_err(|e| map_io_error(e, from))?;
    let mut target = OpenOptions::new().write(true).create_new(true).open(to).map_err(|e| map_io_error(e, to))?;
    let copied = io::copy(&mut source, &mut target).and_then(|_| target.sync_all());
    if let Err(e) = copied {
        drop(target);
        // Partial copy; the original is still intact.
        _ = fs::remove_file(to);
        exn::bail!(ErrorKind::Io(e));
    }
    fs::remove_file(from).map_err(|e| map_io_error(e, from))?;
    Ok(())
}

fn map_io_error(e: io::Error, path: &Path) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
        io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.to_path_buf()),
        _ => ErrorKind::Io(e),
    }
}
