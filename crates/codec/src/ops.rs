//! Decode and Encode Operations

use crate::error::{ErrorKind, Result};
use crate::{Format, RgbImage};
use exn::ResultExt;
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;
use tracing::instrument;

const MAX_QUALITY: u8 = 100;

impl Format {
    /// Decode `input` into an opaque 8-bit RGB image.
    ///
    /// Transparency is dropped, not composited against a background: a fully
    /// transparent red pixel comes out red.
    #[instrument(skip(input), fields(format = %self, input_size = input.len()))]
    pub fn decode(&self, input: &[u8]) -> Result<RgbImage> {
        let image = image::load_from_memory_with_format(input, self.image_format()).or_raise(|| ErrorKind::InvalidData)?;
        Ok(image.to_rgb8())
    }

    /// Encode an RGB image at `quality` (`0..=100`).
    ///
    /// PNG is lossless and ignores the quality setting.
    #[instrument(skip(image), fields(
        format = %self,
        width = image.width(),
        height = image.height(),
        output_size
    ))]
    pub fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
        if quality > MAX_QUALITY {
            exn::bail!(ErrorKind::InvalidQuality(quality));
        }
        let mut output = Vec::new();
        match self {
            Format::Png => {
                image.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png).or_raise(|| ErrorKind::Io)?;
            },
            Format::Jpeg => {
                // JPEG quality starts at 1.
                let mut encoder = JpegEncoder::new_with_quality(&mut output, quality.max(1));
                encoder.encode_image(image).or_raise(|| ErrorKind::Io)?;
            },
            Format::Webp => {
                let (width, height) = image.dimensions();
                let encoder = webp::Encoder::from_rgb(image.as_raw(), width, height);
                let encoded = encoder
                    .encode_simple(false, f32::from(quality))
                    .map_err(|e| ErrorKind::Encoder(format!("{e:?}")))?;
                output.extend_from_slice(&encoded);
            },
        }
        tracing::Span::current().record("output_size", output.len());
        Ok(output)
    }

    /// Decode `input` as `self` and re-encode it as `target`.
    pub fn convert(&self, input: &[u8], target: Format, quality: u8) -> Result<Vec<u8>> {
        let image = self.decode(input)?;
        target.encode(&image, quality)
    }
}
