use crate::Context;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use slidearc_codec::Format;
use slidearc_storage::FileInfo;
use std::path::PathBuf;

/// The outcome of (successfully) converting a single slide.
///
/// Each variant carries the archive-relative name of the converted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// A new file was encoded and written to the archive.
    Converted(PathBuf),
    /// The archive already held a converted file of that name; nothing was done.
    Skipped(PathBuf),
}

impl Conversion {
    pub fn name(&self) -> &PathBuf {
        match self {
            Self::Converted(name) | Self::Skipped(name) => name,
        }
    }
}

/// Converts one source slide into the archive as `<stem>.<target-ext>`.
///
/// Existing archive files are never re-encoded, which keeps repeated runs
/// cheap. The source file is read but otherwise left untouched. The image
/// format is sniffed from the file contents, falling back to the configured
/// source format, so a mislabelled file still converts.
///
/// # Errors
/// Returns [`ErrorKind::Convert`] wrapping a [`Storage`](ErrorKind::Storage) or
/// [`Codec`](ErrorKind::Codec) failure. Nothing is written on failure.
pub fn convert_file(ctx: &Context, file: &FileInfo) -> Result<Conversion> {
    convert_file_inner(ctx, file).or_raise(|| ErrorKind::Convert(file.name.clone()))
}

fn convert_file_inner(ctx: &Context, file: &FileInfo) -> Result<Conversion> {
    let target = file.name.with_extension(ctx.target_format.extension());
    if ctx.archive.exists(&target).or_raise(|| ErrorKind::Storage)? {
        tracing::info!(name = %target.display(), "Already converted; skipping");
        return Ok(Conversion::Skipped(target));
    }

    let bytes = ctx.source.read(&file.name).or_raise(|| ErrorKind::Storage)?;
    let format = Format::from_magic_bytes(&bytes).unwrap_or(ctx.source_format);
    if format != ctx.source_format {
        tracing::warn!(name = %file.name.display(), detected = %format, "File contents don't match its extension");
    }
    let encoded = format.convert(&bytes, ctx.target_format, ctx.quality).or_raise(|| ErrorKind::Codec)?;
    ctx.archive.write(&target, &encoded).or_raise(|| ErrorKind::Storage)?;

    tracing::info!(
        from = %file.name.display(),
        to = %target.display(),
        input_size = bytes.len(),
        output_size = encoded.len(),
        "Converted"
    );
    Ok(Conversion::Converted(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, png, put};
    use slidearc_storage::FileInfo;

    fn info(name: &str) -> FileInfo {
        FileInfo::new(name, 0)
    }

    #[test]
    fn converts_into_archive() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_SM_01.png", &png());
        let result = convert_file(&ctx, &info("260206_SM_01.png")).unwrap();
        assert_eq!(result, Conversion::Converted(PathBuf::from("260206_SM_01.webp")));
        let written = ctx.archive().read("260206_SM_01.webp").unwrap();
        assert!(Format::Webp.check_magic_bytes(&written));
        // Original untouched.
        assert_eq!(ctx.source().read("260206_SM_01.png").unwrap(), png());
    }

    #[test]
    fn skips_existing() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_SM_01.png", &png());
        put(ctx.archive().root(), "260206_SM_01.webp", b"already here");
        let result = convert_file(&ctx, &info("260206_SM_01.png")).unwrap();
        assert_eq!(result, Conversion::Skipped(PathBuf::from("260206_SM_01.webp")));
        assert_eq!(ctx.archive().read("260206_SM_01.webp").unwrap(), b"already here");
    }

    #[test]
    fn keeps_dots_in_stem() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_v1.5_01.png", &png());
        let result = convert_file(&ctx, &info("260206_v1.5_01.png")).unwrap();
        assert_eq!(result.name(), &PathBuf::from("260206_v1.5_01.webp"));
    }

    #[test]
    fn corrupt_image_writes_nothing() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_SM_01.png", b"definitely not a png");
        let err = convert_file(&ctx, &info("260206_SM_01.png")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Convert(name) if name.as_os_str() == "260206_SM_01.png"));
        assert!(!ctx.archive().exists("260206_SM_01.webp").unwrap());
    }

    #[test]
    fn missing_source_file() {
        let (_temp, ctx) = context();
        let err = convert_file(&ctx, &info("260206_SM_01.png")).unwrap_err();
        assert!(err.is_per_file());
    }
}
