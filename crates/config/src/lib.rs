//! Configuration for slidearc.
//!
//! Every setting has a default matching the layout the slide viewer expects
//! (`images/`, `images/archive/`, `images/list.json`), so running without any
//! configuration just works. Defaults can be overridden, in increasing order of
//! precedence, by:
//!
//! 1. a TOML file (`slidearc.toml` in the working directory unless another
//!    path is given), and
//! 2. environment variables prefixed with `SLIDEARC_`, e.g.
//!    `SLIDEARC_QUALITY=90` or `SLIDEARC_ARCHIVE_DIR=/srv/slides/archive`.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use slidearc_codec::{DEFAULT_QUALITY, Format};
use std::path::{Path, PathBuf};

/// Configuration file looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "slidearc.toml";
/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SLIDEARC_";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Folder users drop new slide images into. Default: `images`.
    pub source_dir: PathBuf,
    /// Folder receiving converted slides and moved originals. Default: `images/archive`.
    pub archive_dir: PathBuf,
    /// Index file read by the viewer. Default: `images/list.json`.
    pub index_file: PathBuf,
    /// Format of incoming slides. Default: `png`.
    pub source_format: Format,
    /// Format slides are converted to. Default: `webp`.
    pub target_format: Format,
    /// Encoder quality, `0..=100`. Default: `80`.
    pub quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("images"),
            archive_dir: PathBuf::from("images/archive"),
            index_file: PathBuf::from("images/list.json"),
            source_format: Format::Png,
            target_format: Format::Webp,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Config {
    /// Load defaults, then `file` (or [`DEFAULT_CONFIG_FILE`]) if it exists,
    /// then `SLIDEARC_*` environment variables.
    ///
    /// Values are not range-checked here: callers layer their own overrides on
    /// top and then call [`validate`](Self::validate).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(file))
    }

    /// The layered provider stack used by [`load`](Self::load).
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            exn::bail!(ErrorKind::Invalid {
                field: "quality",
                reason: format!("{} is outside 0..=100", self.quality),
            });
        }
        if self.source_format == self.target_format {
            // Converted files would share names with the originals they came from.
            exn::bail!(ErrorKind::Invalid {
                field: "target_format",
                reason: format!("must differ from source_format ({})", self.source_format),
            });
        }
        for (field, path) in [("source_dir", &self.source_dir), ("archive_dir", &self.archive_dir)] {
            if path.as_os_str().is_empty() {
                exn::bail!(ErrorKind::Invalid { field, reason: "must not be empty".to_string() });
            }
        }
        if self.index_file.file_name().is_none() {
            exn::bail!(ErrorKind::Invalid {
                field: "index_file",
                reason: format!("`{}` does not name a file", self.index_file.display()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Format as _;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.source_dir, Path::new("images"));
        assert_eq!(config.archive_dir, Path::new("images/archive"));
        assert_eq!(config.index_file, Path::new("images/list.json"));
        assert_eq!(config.source_format, Format::Png);
        assert_eq!(config.target_format, Format::Webp);
        assert_eq!(config.quality, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_survive_empty_figment() {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        assert_eq!(Config::from_figment(figment).unwrap(), Config::default());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("slidearc.toml");
        fs::write(&file, "quality = 95\narchive_dir = \"slides/old\"\ntarget_format = \"jpg\"\n").unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&file));
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.quality, 95);
        assert_eq!(config.archive_dir, Path::new("slides/old"));
        assert_eq!(config.target_format, Format::Jpeg);
        // Untouched values keep their defaults.
        assert_eq!(config.source_dir, Path::new("images"));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(dir.path().join("does-not-exist.toml")));
        assert_eq!(Config::from_figment(figment).unwrap(), Config::default());
    }

    #[test]
    fn malformed_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("slidearc.toml");
        fs::write(&file, "target_format = \"tiff\"\n").unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&file));
        assert_eq!(*Config::from_figment(figment).unwrap_err(), ErrorKind::Load);
    }

    #[test]
    fn out_of_range_value_loads_then_fails_validation() {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(("quality", 150));
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.quality, 150);
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field: "quality", .. }));
    }

    #[rstest]
    #[case(Config { quality: 101, ..Config::default() }, "quality")]
    #[case(Config { target_format: Format::Png, ..Config::default() }, "target_format")]
    #[case(Config { source_dir: PathBuf::new(), ..Config::default() }, "source_dir")]
    #[case(Config { archive_dir: PathBuf::new(), ..Config::default() }, "archive_dir")]
    #[case(Config { index_file: PathBuf::from(".."), ..Config::default() }, "index_file")]
    fn invalid(#[case] config: Config, #[case] expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field, .. } if *field == expected));
    }
}
