//! Image format detection and conversion.
//!
//! Wraps the [`image`] and [`webp`] crates behind a single [`Format`] enum,
//! providing:
//!
//! - **Format detection** from file extensions ([`Format::from_path`]) or
//!   magic bytes ([`Format::from_magic_bytes`])
//! - **Decoding** to an opaque 8-bit RGB buffer ([`Format::decode`]); any
//!   alpha channel is dropped
//! - **Encoding** at a 0–100 quality setting ([`Format::encode`]); WebP is
//!   encoded lossy through libwebp since [`image`] only writes lossless WebP
//!
//! [`Format::convert`] chains the two for the common "read one format, write
//! another" case.

mod construct;
pub mod error;
mod ops;
mod util;

pub use image::RgbImage;

/// Quality used when none is configured.
pub const DEFAULT_QUALITY: u8 = 80;

/// A supported image format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Format {
    /// Portable Network Graphics (.png)
    Png,
    /// JPEG (.jpg, .jpeg)
    #[cfg_attr(feature = "serde", serde(alias = "jpg"))]
    Jpeg,
    /// WebP (.webp)
    Webp,
}
