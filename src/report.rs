use std::fmt;

use indoc::writedoc;
use serde::Serialize;

const SECONDS_PER_DAY: u64 = 86_400;

/// Playback speeds the report projects the total length at, in hundredths
pub const SPEEDS: [Speed; 4] = [Speed(125), Speed(150), Speed(175), Speed(200)];

/// A playback-speed multiplier stored as hundredths (`Speed(150)` is 1.50x)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(pub u64);

impl Speed {
    /// `floor(seconds / multiplier)`, without going through floats
    #[must_use]
    pub const fn apply(self, seconds: u64) -> u64 {
        let (quotient, remainder) = (seconds / self.0, seconds % self.0);
        quotient * 100 + remainder * 100 / self.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Speed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A length of time, kept both raw and human-formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Length {
    pub seconds: u64,
    pub formatted: String,
}

impl From<u64> for Length {
    fn from(seconds: u64) -> Self {
        Self {
            seconds,
            formatted: format_duration(seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeedLength {
    pub speed: Speed,
    #[serde(flatten)]
    pub length: Length,
}

/// Summary statistics of a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub item_count: u64,
    pub total: Length,
    /// Absent when the playlist has no items
    pub average: Option<Length>,
    pub speeds: Vec<SpeedLength>,
}

/// Aggregates extracted durations into a [`Report`]
///
/// `item_count` and `durations.len()` are derived separately and need not agree;
/// the average divides by the former.
#[must_use]
pub fn summarize(item_count: u64, durations: &[u64]) -> Report {
    let total = durations
        .iter()
        .fold(0u64, |acc, &seconds| acc.saturating_add(seconds));

    let average = total.checked_div(item_count).map(Length::from);

    let speeds = SPEEDS
        .iter()
        .map(|&speed| SpeedLength {
            speed,
            length: speed.apply(total).into(),
        })
        .collect();

    Report {
        item_count,
        total: total.into(),
        average,
        speeds,
    }
}

/// Formats seconds as `HH:MM:SS`, prefixed by `<days> days, ` once it spans a day
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds / 3600) % 24;
    let minutes = (seconds / 60) % 60;
    let seconds = seconds % 60;

    if days > 0 {
        format!("{days} days, {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writedoc!(
            f,
            "


                      Playlist Analysis Results

                Number of videos: {count}
                Total playlist length: {total}
            ",
            count = self.item_count,
            total = self.total.formatted,
        )?;

        if let Some(average) = &self.average {
            writeln!(f, "Average video length: {}", average.formatted)?;
        }

        writeln!(f, "\n Playlist Length at Different Speeds")?;
        for SpeedLength { speed, length } in &self.speeds {
            writeln!(f, "{speed} Speed: {}", length.formatted)?;
        }
        writeln!(f)
    }
}
