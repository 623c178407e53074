use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, warn};

/// Literal token emitted once per linked video in a playlist page
pub const ITEM_MARKER: &str = "watch?v=";

/// Matches accessibility labels such as `"label":"1 hour, 2 minutes, 3 seconds"`.
///
/// Groups come in (value, unit) pairs; only the first pair is mandatory.
pub static DURATION_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#""label"\s*:\s*""#,
        r"(\d+)\s*(hours?|hrs?|minutes?|mins?|seconds?|secs?)",
        r"(?:,?\s*(\d+)\s*(minutes?|mins?|seconds?|secs?))?",
        r"(?:,?\s*(\d+)\s*(seconds?|secs?))?",
        r#"""#,
    ))
    .unwrap()
});

/// Pulls playlist items and their durations out of raw page text
///
/// Implementations must be pure: the same page always yields the same output.
pub trait Extractor {
    /// Number of playlist items referenced by the page
    fn count_items(&self, page: &str) -> u64;

    /// Per-item durations in seconds, in order of appearance
    fn extract_durations(&self, page: &str) -> Vec<u64>;
}

/// Regex based [`Extractor`] for server-rendered playlist pages
#[derive(Debug, Default, Clone, Copy)]
pub struct PageScraper;

impl Extractor for PageScraper {
    fn count_items(&self, page: &str) -> u64 {
        count_items(page)
    }

    fn extract_durations(&self, page: &str) -> Vec<u64> {
        extract_durations(page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    /// Every accepted unit word starts with a distinct letter
    fn from_word(word: &str) -> Option<Self> {
        match word.as_bytes().first()? {
            b'h' => Some(Self::Hour),
            b'm' => Some(Self::Minute),
            b's' => Some(Self::Second),
            _ => None,
        }
    }

    const fn seconds(self) -> u64 {
        match self {
            Self::Hour => 3600,
            Self::Minute => 60,
            Self::Second => 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
enum LabelError {
    #[error("`{0}` is not a valid number")]
    Malformed(String),
    #[error("duration overflows")]
    Overflow,
    #[error("units are not in descending order")]
    Unordered,
}

/// Counts non-overlapping occurrences of [`ITEM_MARKER`]
#[must_use]
pub fn count_items(page: &str) -> u64 {
    page.matches(ITEM_MARKER).count() as u64
}

/// Converts every duration label found in `page` into seconds
///
/// A label with an unparseable number still counts, contributing `0`. Labels whose
/// units are out of order are not durations and are skipped.
#[must_use]
pub fn extract_durations(page: &str) -> Vec<u64> {
    DURATION_LABEL_REGEX
        .captures_iter(page)
        .filter_map(|caps| match label_seconds(&caps) {
            Ok(seconds) => Some(seconds),
            Err(LabelError::Unordered) => {
                debug!("Skipping out-of-order label {}", &caps[0]);
                None
            }
            Err(e) => {
                warn!("Counting malformed duration label {} as 0s: {e}", &caps[0]);
                Some(0)
            }
        })
        .collect()
}

fn label_seconds(caps: &Captures<'_>) -> Result<u64, LabelError> {
    let mut total: u64 = 0;
    let mut previous: Option<TimeUnit> = None;

    for pair in [(1, 2), (3, 4), (5, 6)] {
        let (Some(value), Some(unit)) = (caps.get(pair.0), caps.get(pair.1)) else {
            continue;
        };
        // The regex only admits known unit words
        let Some(unit) = TimeUnit::from_word(unit.as_str()) else {
            continue;
        };
        if previous.is_some_and(|p| p <= unit) {
            return Err(LabelError::Unordered);
        }
        previous = Some(unit);

        // `\d` is unicode aware, so non-ASCII digits get this far
        let value = value
            .as_str()
            .parse::<u64>()
            .map_err(|_| LabelError::Malformed(value.as_str().to_string()))?;
        total = value
            .checked_mul(unit.seconds())
            .and_then(|s| total.checked_add(s))
            .ok_or(LabelError::Overflow)?;
    }

    Ok(total)
}
