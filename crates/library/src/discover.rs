use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::slide::is_slide_file;
use exn::ResultExt;
use slidearc_storage::FileInfo;

/// Lists slide files waiting in the source directory, sorted by name.
///
/// A file qualifies when its extension matches the configured source format
/// and its stem has at least three segments. Standalone images, other file
/// types and subdirectories (including the archive) are left alone.
///
/// # Errors
/// [`ErrorKind::Discover`] if the source directory can't be listed. This is
/// fatal for the run.
pub fn discover(ctx: &Context) -> Result<Vec<FileInfo>> {
    let files = ctx.source.list().or_raise(|| ErrorKind::Discover)?;
    let slides: Vec<_> = files.into_iter().filter(|file| is_slide_file(&file.name, ctx.source_format)).collect();
    for slide in &slides {
        tracing::debug!(name = %slide.name.display(), size = slide.size, "Discovered slide");
    }
    Ok(slides)
}
