use clap::Parser;
use slidearc_config::Config;
use std::path::PathBuf;

/// Convert new slide images to WebP, archive the originals and rebuild the
/// viewer index.
///
/// With no arguments, reads slides from `images/`, archives into
/// `images/archive/` and writes `images/list.json`.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file (default: `slidearc.toml`, if present)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Folder to look for new slides in
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,
    /// Folder to archive converted slides and originals into
    #[arg(long, value_name = "DIR")]
    pub archive: Option<PathBuf>,
    /// Index file to (re)write
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
    /// Encoder quality, 0-100
    #[arg(long, short = 'q', value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,
    /// Log more (-v: debug, -vv: trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line flags win over every other configuration layer.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(archive) = &self.archive {
            config.archive_dir = archive.clone();
        }
        if let Some(index) = &self.index {
            config.index_file = index.clone();
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        config
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn no_arguments_keeps_config() {
        let cli = Cli::try_parse_from(["slidearc"]).unwrap();
        assert_eq!(cli.apply(Config::default()), Config::default());
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn flags_override() {
        let cli = Cli::try_parse_from(["slidearc", "--source", "in", "--archive", "out", "-q", "95", "-vv"]).unwrap();
        let config = cli.apply(Config::default());
        assert_eq!(config.source_dir, Path::new("in"));
        assert_eq!(config.archive_dir, Path::new("out"));
        assert_eq!(config.index_file, Path::new("images/list.json"));
        assert_eq!(config.quality, 95);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn quality_out_of_range() {
        assert!(Cli::try_parse_from(["slidearc", "--quality", "101"]).is_err());
    }
}
