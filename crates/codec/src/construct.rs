use crate::Format;
use crate::error::{Error, ErrorKind};
use std::{path::Path, str::FromStr};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const RIFF_MAGIC: [u8; 4] = *b"RIFF";
const WEBP_MAGIC: [u8; 4] = *b"WEBP";

impl FromStr for Format {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Format::Png),
            "jpg" | "jpeg" => Ok(Format::Jpeg),
            "webp" => Ok(Format::Webp),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Format {
    /// Detect the format from a file extension (case-insensitive).
    ///
    /// Returns `None` for files without an extension or with an extension
    /// that isn't a supported image format.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Detect the format from magic bytes.
    ///
    /// Returns `None` if no magic bytes match or if the input is too short to
    /// detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_MAGIC) {
            return Some(Format::Png);
        }
        if bytes.starts_with(&JPEG_MAGIC) {
            return Some(Format::Jpeg);
        }
        // RIFF container: 4 bytes magic, 4 bytes little-endian size, 4 bytes form type.
        if bytes.len() >= 12 && bytes.starts_with(&RIFF_MAGIC) && bytes[8..12] == WEBP_MAGIC {
            return Some(Format::Webp);
        }
        None
    }
}
