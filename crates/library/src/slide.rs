//! Slide file names.
//!
//! Slides are named `<date>_<label>_<page>.<ext>`, e.g. `260206_SM_01.png`.
//! The label may itself contain underscores (`260206_US_CPI_03.png` has the
//! label `US_CPI`): the first segment is always the date and the last is always
//! the page, everything in between is the label.
//!
//! Names with fewer than three segments (`260206.png`, `260206_cover.png`) are
//! standalone images and are never treated as slides.

use slidearc_codec::Format;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

/// Separator between date, label and page.
pub const DELIMITER: char = '_';
/// Minimum number of segments for a name to count as a slide.
pub const MIN_SEGMENTS: usize = 3;

/// Whether a file stem (name without extension) has the slide shape.
#[must_use]
pub fn is_slide_stem(stem: &str) -> bool {
    stem.split(DELIMITER).count() >= MIN_SEGMENTS
}

/// Whether `name` is a slide encoded as `format`, judged by extension and stem.
#[must_use]
pub fn is_slide_file(name: impl AsRef<Path>, format: Format) -> bool {
    let name = name.as_ref();
    Format::from_path(name) == Some(format) && name.file_stem().and_then(|s| s.to_str()).is_some_and(is_slide_stem)
}

/// A parsed slide file name.
///
/// Several files may parse to the same slide (e.g. a re-uploaded duplicate),
/// the identifier is not unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Date token, conventionally `YYMMDD`. Only used for grouping.
    pub date: String,
    /// Series label, delimiters included.
    pub label: String,
    /// Numeric page; `0` when the page token isn't numeric, [`u64::MAX`] when
    /// it has more digits than fit. Ordering goes through [`page_key`](Self::page_key).
    pub page: u64,
    page_token: String,
}

impl Slide {
    /// Parse a file name (extension optional).
    ///
    /// Returns `None` for names that don't decompose into a non-empty date, a
    /// non-empty label and a page token.
    ///
    /// ```
    /// use slidearc_library::Slide;
    ///
    /// let slide = Slide::parse("260206_US_CPI_03.webp").unwrap();
    /// assert_eq!(slide.date, "260206");
    /// assert_eq!(slide.label, "US_CPI");
    /// assert_eq!(slide.page, 3);
    /// assert_eq!(slide.to_string(), "260206_US_CPI_03");
    /// assert!(Slide::parse("260206.webp").is_none());
    /// ```
    #[must_use]
    pub fn parse(name: impl AsRef<Path>) -> Option<Self> {
        name.as_ref().file_stem().and_then(|s| s.to_str()).and_then(Self::parse_stem)
    }

    /// Parse a file stem (no extension).
    #[must_use]
    pub fn parse_stem(stem: &str) -> Option<Self> {
        let segments: Vec<&str> = stem.split(DELIMITER).collect();
        let [date, label @ .., page] = segments.as_slice() else {
            return None;
        };
        if date.is_empty() || label.is_empty() {
            return None;
        }
        let label = label.join(DELIMITER.to_string().as_str());
        if label.is_empty() {
            return None;
        }
        Some(Self {
            date: date.to_string(),
            label,
            page: parse_page(page),
            page_token: page.to_string(),
        })
    }

    /// The page segment exactly as it appeared (e.g. `"01"`).
    pub fn page_token(&self) -> &str {
        &self.page_token
    }

    /// Sort key ordering pages numerically whatever their length: the count of
    /// significant digits, then the digits themselves. Non-numeric pages sort
    /// as zero.
    ///
    /// ```
    /// use slidearc_library::Slide;
    ///
    /// let long = Slide::parse_stem("260206_SM_99999999999999999999999").unwrap();
    /// let short = Slide::parse_stem("260206_SM_01").unwrap();
    /// assert!(short.page_key() < long.page_key());
    /// ```
    #[must_use]
    pub fn page_key(&self) -> (usize, &str) {
        let digits = significant_digits(&self.page_token).unwrap_or("");
        (digits.len(), digits)
    }
}

/// Reconstructs the stem the slide was parsed from.
impl Display for Slide {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{DELIMITER}{}{DELIMITER}{}", self.date, self.label, self.page_token)
    }
}

/// The token without leading zeros, if it is all ASCII digits.
fn significant_digits(token: &str) -> Option<&str> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.trim_start_matches('0'))
}

fn parse_page(token: &str) -> u64 {
    match significant_digits(token) {
        None | Some("") => 0,
        Some(digits) => digits.parse().unwrap_or(u64::MAX),
    }
}
