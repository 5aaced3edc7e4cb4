use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use slidearc_codec::Format;
use slidearc_config::Config;
use slidearc_storage::Directory;
use std::path::{Path, PathBuf};

/// Everything a run needs, resolved from a [`Config`].
///
/// Constructing a context performs the run's fatal checks up front: the source
/// directory must exist, and the archive directory (plus the directory holding
/// the index file) is created if missing.
#[derive(Clone, Debug)]
pub struct Context {
    pub(crate) source: Directory,
    pub(crate) archive: Directory,
    pub(crate) index_dir: Directory,
    pub(crate) index_name: PathBuf,
    pub(crate) source_format: Format,
    pub(crate) target_format: Format,
    pub(crate) quality: u8,
}

impl Context {
    pub fn new(config: &Config) -> Result<Self> {
        let source = Directory::open(&config.source_dir).or_raise(|| ErrorKind::Source(config.source_dir.clone()))?;
        let archive =
            Directory::create(&config.archive_dir).or_raise(|| ErrorKind::ArchiveDir(config.archive_dir.clone()))?;
        let (index_dir, index_name) = split_index_path(&config.index_file)?;
        let index_dir = Directory::create(index_dir).or_raise(|| ErrorKind::Index)?;
        Ok(Self {
            source,
            archive,
            index_dir,
            index_name,
            source_format: config.source_format,
            target_format: config.target_format,
            quality: config.quality,
        })
    }

    pub fn source(&self) -> &Directory {
        &self.source
    }

    pub fn archive(&self) -> &Directory {
        &self.archive
    }

    pub fn index_path(&self) -> PathBuf {
        self.index_dir.root().join(&self.index_name)
    }
}

fn split_index_path(path: &Path) -> Result<(&Path, PathBuf)> {
    let Some(name) = path.file_name() else {
        exn::bail!(ErrorKind::Index);
    };
    // A bare file name has an empty parent: the working directory.
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((parent, PathBuf::from(name)))
}
