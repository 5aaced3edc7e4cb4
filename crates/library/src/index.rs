//! The viewer index.
//!
//! `list.json` describes the archive as `date → label → [files]`:
//!
//! ```json
//! {
//!   "260207": {
//!     "WTI": ["260207_WTI_01.webp", "260207_WTI_02.webp"]
//!   },
//!   "260206": {
//!     "SM": ["260206_SM_01.webp"]
//!   }
//! }
//! ```
//!
//! Dates are newest first, labels ascending, pages in numeric order. The index
//! owns no state of its own: it is rebuilt from the archive directory on every
//! run and the file is overwritten wholesale, so out-of-band edits to the
//! archive heal on the next run.

use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::slide::{Slide, is_slide_file};
use exn::ResultExt;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Reverse;
use std::collections::BTreeMap;

type Labels = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    dates: BTreeMap<Reverse<String>, Labels>,
}

impl Index {
    /// Group and order archive file names.
    ///
    /// Names that don't parse as a [`Slide`] are left out. Pages sharing a
    /// page number keep the order they were given in.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut grouped: BTreeMap<Reverse<String>, BTreeMap<String, Vec<((usize, String), String)>>> = BTreeMap::new();
        for name in names {
            let name = name.into();
            let Some(slide) = Slide::parse(&name) else {
                tracing::trace!(%name, "Not a slide name; leaving out of index");
                continue;
            };
            let (len, digits) = slide.page_key();
            let key = (len, digits.to_string());
            grouped.entry(Reverse(slide.date)).or_default().entry(slide.label).or_default().push((key, name));
        }
        let dates = grouped
            .into_iter()
            .map(|(date, labels)| {
                let labels = labels
                    .into_iter()
                    .map(|(label, mut pages)| {
                        // Stable: equal page numbers stay in input order.
                        pages.sort_by(|(a, _), (b, _)| a.cmp(b));
                        (label, pages.into_iter().map(|(_, name)| name).collect())
                    })
                    .collect();
                (date, labels)
            })
            .collect();
        Self { dates }
    }

    /// Number of dates recorded.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates, newest first.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.dates.keys().map(|Reverse(date)| date.as_str())
    }

    /// Labels recorded for `date`, ascending.
    pub fn labels(&self, date: &str) -> impl Iterator<Item = &str> {
        self.dates.get(&Reverse(date.to_string())).into_iter().flat_map(|labels| labels.keys().map(String::as_str))
    }

    /// File names for one series, in page order.
    pub fn pages(&self, date: &str, label: &str) -> Option<&[String]> {
        self.dates.get(&Reverse(date.to_string()))?.get(label).map(Vec::as_slice)
    }

    /// Pretty-printed JSON (two-space indent, non-ASCII kept verbatim).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).or_raise(|| ErrorKind::Serialize)
    }
}

impl Serialize for Index {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Written by hand: a derived map would put dates in ascending order.
        let mut map = serializer.serialize_map(Some(self.dates.len()))?;
        for (Reverse(date), labels) in &self.dates {
            map.serialize_entry(date, labels)?;
        }
        map.end()
    }
}

/// Scan the archive and build the index from the converted slides in it.
///
/// Originals, standalone images and anything else in the archive are
/// ignored, as are names that aren't valid UTF-8.
pub fn build_index(ctx: &Context) -> Result<Index> {
    let files = ctx.archive.list().or_raise(|| ErrorKind::Storage)?;
    let names = files
        .into_iter()
        .filter(|file| is_slide_file(&file.name, ctx.target_format))
        .filter_map(|file| file.name.into_os_string().into_string().ok());
    Ok(Index::from_names(names))
}

/// Replace the index file with `index`.
pub fn write_index(ctx: &Context, index: &Index) -> Result<()> {
    let json = index.to_json()?;
    ctx.index_dir.write(&ctx.index_name, json.as_bytes()).or_raise(|| ErrorKind::Storage)?;
    Ok(())
}

/// [`build_index`] then [`write_index`]; runs unconditionally at the end of
/// every pipeline run.
///
/// # Errors
/// [`ErrorKind::Index`]; fatal for the run.
pub fn rebuild_index(ctx: &Context) -> Result<Index> {
    let rebuild = || -> Result<Index> {
        let index = build_index(ctx)?;
        write_index(ctx, &index)?;
        Ok(index)
    };
    let index = rebuild().or_raise(|| ErrorKind::Index)?;
    tracing::info!(path = %ctx.index_path().display(), dates = index.len(), "Index rebuilt");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, put};

    #[test]
    fn orders_dates_labels_and_pages() {
        let index = Index::from_names([
            "260206_WTI_01.webp",
            "260207_SM_10.webp",
            "260207_SM_02.webp",
            "260206_SM_01.webp",
            "260207_SM_1.webp",
        ]);
        assert_eq!(index.dates().collect::<Vec<_>>(), ["260207", "260206"]);
        assert_eq!(index.labels("260206").collect::<Vec<_>>(), ["SM", "WTI"]);
        assert_eq!(
            index.pages("260207", "SM").unwrap(),
            ["260207_SM_1.webp", "260207_SM_02.webp", "260207_SM_10.webp"]
        );
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn labels_compare_bytewise() {
        let index = Index::from_names(["1_b_1.webp", "1_B_1.webp", "1_a_1.webp", "1_A_B_1.webp"]);
        assert_eq!(index.labels("1").collect::<Vec<_>>(), ["A_B", "B", "a", "b"]);
    }

    #[test]
    fn equal_pages_keep_input_order() {
        let index = Index::from_names(["1_S_x.webp", "1_S_01.webp", "1_S_y.webp", "1_S_1.webp"]);
        assert_eq!(index.pages("1", "S").unwrap(), ["1_S_x.webp", "1_S_y.webp", "1_S_01.webp", "1_S_1.webp"]);
    }

    #[test]
    fn pages_past_u64_sort_last() {
        let index = Index::from_names([
            "260206_SM_99999999999999999999999.webp",
            "260206_SM_18446744073709551616.webp",
            "260206_SM_01.webp",
            "260206_SM_x.webp",
        ]);
        assert_eq!(
            index.pages("260206", "SM").unwrap(),
            [
                "260206_SM_x.webp",
                "260206_SM_01.webp",
                "260206_SM_18446744073709551616.webp",
                "260206_SM_99999999999999999999999.webp",
            ]
        );
    }

    #[test]
    fn skips_unparseable_names() {
        let index = Index::from_names(["260206.webp", "260206_cover.webp", "_SM_01.webp", "260206_SM_01.webp"]);
        assert_eq!(index.dates().collect::<Vec<_>>(), ["260206"]);
        assert_eq!(index.pages("260206", "SM").unwrap(), ["260206_SM_01.webp"]);
        assert!(index.pages("260206", "cover").is_none());
    }

    #[test]
    fn json_shape() {
        let index = Index::from_names(["260207_WTI_02.webp", "260207_WTI_01.webp", "260206_SM_01.webp"]);
        let expected = r#"{
  "260207": {
    "WTI": [
      "260207_WTI_01.webp",
      "260207_WTI_02.webp"
    ]
  },
  "260206": {
    "SM": [
      "260206_SM_01.webp"
    ]
  }
}"#;
        assert_eq!(index.to_json().unwrap(), expected);
    }

    #[test]
    fn json_keeps_unicode() {
        let index = Index::from_names(["260206_환율_01.webp"]);
        assert!(index.to_json().unwrap().contains("\"환율\""));
    }

    #[test]
    fn empty_index_is_empty_object() {
        let index = Index::default();
        assert!(index.is_empty());
        assert_eq!(index.to_json().unwrap(), "{}");
    }

    #[test]
    fn build_reads_only_converted_slides() {
        let (_temp, ctx) = context();
        let archive = ctx.archive().root().to_path_buf();
        for name in [
            "260206_SM_01.webp",
            "260206_SM_01.png",
            "260206_SM_01_143005.png",
            "260206.webp",
            "260206_SM.webp",
            "stray.txt",
        ] {
            put(&archive, name, b"");
        }
        let index = build_index(&ctx).unwrap();
        assert_eq!(index, Index::from_names(["260206_SM_01.webp"]));
    }

    #[test]
    fn rebuild_overwrites_file() {
        let (_temp, ctx) = context();
        std::fs::write(ctx.index_path(), r#"{"stale": {"entry": ["gone.webp"]}}"#).unwrap();
        put(ctx.archive().root(), "260206_SM_01.webp", b"");
        rebuild_index(&ctx).unwrap();
        let written = std::fs::read_to_string(ctx.index_path()).unwrap();
        assert_eq!(written, Index::from_names(["260206_SM_01.webp"]).to_json().unwrap());
    }
}
