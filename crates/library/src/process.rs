use crate::Context;
use crate::archive::{Archived, archive_file};
use crate::convert::{Conversion, convert_file};
use crate::discover::discover;
use crate::error::{Error, Result};
use crate::index::{Index, rebuild_index};
use slidearc_storage::FileInfo;
use std::path::PathBuf;

/// A slide that was converted (or already had been) and then archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub file: PathBuf,
    pub conversion: Conversion,
    pub archived: Archived,
}

/// A slide that could not be processed. The rest of the batch carries on.
#[derive(Debug)]
pub struct Failure {
    pub file: PathBuf,
    pub error: Error,
}

/// Progress events emitted by [`process_each`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with the
///    number of slides found.
/// 3. [`Processed`](Self::Processed) or [`Failed`](Self::Failed): once per
///    slide, in name order.
/// 4. [`IndexRebuilt`](Self::IndexRebuilt): exactly once, even when no slides
///    were found.
/// 5. [`Complete`](Self::Complete): exactly once.
///
/// A fatal error ends the run early, in which case later events are never
/// emitted.
#[derive(Debug)]
pub enum ProcessEvent {
    Started,
    DiscoveryComplete(u64),
    Processed(Processed),
    Failed(Failure),
    IndexRebuilt(Index),
    Complete,
}

/// Runs the whole pipeline once, reporting each step to `on_event`.
///
/// Each slide is converted and then archived before the next one starts. If
/// conversion fails the original is left in the source directory, so it is
/// retried on the next run. The index is rebuilt from the archive at the end
/// regardless of what happened to individual slides.
///
/// # Errors
/// Only fatal errors are returned: failing to list the source directory or to
/// rebuild the index. Per-file problems arrive as [`ProcessEvent::Failed`].
pub fn process_each(ctx: &Context, mut on_event: impl FnMut(ProcessEvent)) -> Result<()> {
    on_event(ProcessEvent::Started);

    let files = discover(ctx)?;
    // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
    on_event(ProcessEvent::DiscoveryComplete(u64::try_from(files.len()).unwrap_or(0)));
    if files.is_empty() {
        tracing::info!(source = %ctx.source.root().display(), "No new slides");
    } else {
        tracing::info!(source = %ctx.source.root().display(), count = files.len(), "Found new slides");
    }

    for file in &files {
        match process_file(ctx, file) {
            Ok(processed) => on_event(ProcessEvent::Processed(processed)),
            Err(error) => {
                tracing::error!(
                    name = %file.name.display(),
                    retryable = error.is_retryable(),
                    error = ?error,
                    "Failed to process slide; continuing"
                );
                on_event(ProcessEvent::Failed(Failure { file: file.name.clone(), error }));
            },
        }
    }

    on_event(ProcessEvent::IndexRebuilt(rebuild_index(ctx)?));
    on_event(ProcessEvent::Complete);
    Ok(())
}

fn process_file(ctx: &Context, file: &FileInfo) -> Result<Processed> {
    // Order matters: the original must not leave the source directory until
    // its converted copy is safely on disk.
    let conversion = convert_file(ctx, file)?;
    let archived = archive_file(ctx, file)?;
    Ok(Processed { file: file.name.clone(), conversion, archived })
}

/// Summary of a whole run, collected by [`process`].
#[derive(Debug, Default)]
pub struct Report {
    pub discovered: u64,
    pub processed: Vec<Processed>,
    pub failures: Vec<Failure>,
    pub index: Index,
}

impl Report {
    /// Slides newly encoded this run.
    pub fn converted(&self) -> usize {
        self.processed.iter().filter(|p| matches!(p.conversion, Conversion::Converted(_))).count()
    }

    /// Slides whose converted file already existed.
    pub fn skipped(&self) -> usize {
        self.processed.iter().filter(|p| matches!(p.conversion, Conversion::Skipped(_))).count()
    }

    /// Originals archived under a time-suffixed name.
    pub fn renamed(&self) -> usize {
        self.processed.iter().filter(|p| matches!(p.archived, Archived::Renamed(_))).count()
    }
}

/// Runs the pipeline once and collects the outcome into a [`Report`].
pub fn process(ctx: &Context) -> Result<Report> {
    let mut report = Report::default();
    process_each(ctx, |event| match event {
        ProcessEvent::DiscoveryComplete(count) => report.discovered = count,
        ProcessEvent::Processed(processed) => report.processed.push(processed),
        ProcessEvent::Failed(failure) => report.failures.push(failure),
        ProcessEvent::IndexRebuilt(index) => report.index = index,
        ProcessEvent::Started | ProcessEvent::Complete => {},
    })?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, png, put};

    #[test]
    fn events_are_ordered() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_SM_01.png", &png());
        put(ctx.source().root(), "260206_SM_02.png", b"broken");
        let mut events = Vec::new();
        process_each(&ctx, |event| {
            events.push(match event {
                ProcessEvent::Started => "started",
                ProcessEvent::DiscoveryComplete(2) => "discovered",
                ProcessEvent::Processed(_) => "processed",
                ProcessEvent::Failed(_) => "failed",
                ProcessEvent::IndexRebuilt(_) => "indexed",
                ProcessEvent::Complete => "complete",
                other => panic!("unexpected event {other:?}"),
            })
        })
        .unwrap();
        assert_eq!(events, ["started", "discovered", "processed", "failed", "indexed", "complete"]);
    }

    #[test]
    fn failed_conversion_is_not_archived() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_SM_01.png", b"broken");
        let report = process(&ctx).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.is_per_file());
        assert!(ctx.source().exists("260206_SM_01.png").unwrap());
        assert!(!ctx.archive().exists("260206_SM_01.png").unwrap());
        assert!(report.index.is_empty());
    }

    #[test]
    fn empty_run_still_writes_index() {
        let (_temp, ctx) = context();
        let report = process(&ctx).unwrap();
        assert_eq!(report.discovered, 0);
        assert_eq!(std::fs::read_to_string(ctx.index_path()).unwrap(), "{}");
    }

    #[test]
    fn report_counts() {
        let (_temp, ctx) = context();
        put(ctx.source().root(), "260206_SM_01.png", &png());
        put(ctx.source().root(), "260206_SM_02.png", &png());
        put(ctx.archive().root(), "260206_SM_02.webp", b"converted earlier");
        put(ctx.archive().root(), "260206_SM_02.png", b"archived earlier");
        let report = process(&ctx).unwrap();
        assert_eq!(report.discovered, 2);
        assert_eq!(report.converted(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.renamed(), 1);
        assert!(report.failures.is_empty());
    }
}
