//! Climatological seasons and the fixed month → season mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A three-month climatological season, labelled by the initials of its months.
///
/// The derived ordering is alphabetical by label (`DJF < JJA < MAM < SON`), which is
/// also the level order used when season enters a model as a categorical effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// December, January, February.
    #[serde(rename = "DJF")]
    Djf,
    /// June, July, August.
    #[serde(rename = "JJA")]
    Jja,
    /// March, April, May.
    #[serde(rename = "MAM")]
    Mam,
    /// September, October, November.
    #[serde(rename = "SON")]
    Son,
}

impl Season {
    /// All seasons in calendar order, starting with the season containing January.
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// The label written to CSV files and model summaries.
    pub fn label(self) -> &'static str {
        match self {
            Season::Djf => "DJF",
            Season::Mam => "MAM",
            Season::Jja => "JJA",
            Season::Son => "SON",
        }
    }

    /// The three month numbers (1-12) belonging to this season.
    pub fn months(self) -> [u32; 3] {
        match self {
            Season::Djf => [12, 1, 2],
            Season::Mam => [3, 4, 5],
            Season::Jja => [6, 7, 8],
            Season::Son => [9, 10, 11],
        }
    }
}

/// Maps a month number (1-12) to its climatological season.
///
/// Any value outside `1..=12` falls through to [`Season::Son`].
pub fn month_to_season(month: u32) -> Season {
    match month {
        12 | 1 | 2 => Season::Djf,
        3..=5 => Season::Mam,
        6..=8 => Season::Jja,
        _ => Season::Son,
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown season label '{0}'")]
pub struct ParseSeasonError(pub String);

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.label() == s)
            .ok_or_else(|| ParseSeasonError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_to_season_groups() {
        assert_eq!(month_to_season(12), Season::Djf);
        assert_eq!(month_to_season(1), Season::Djf);
        assert_eq!(month_to_season(2), Season::Djf);
        assert_eq!(month_to_season(3), Season::Mam);
        assert_eq!(month_to_season(5), Season::Mam);
        assert_eq!(month_to_season(6), Season::Jja);
        assert_eq!(month_to_season(8), Season::Jja);
        assert_eq!(month_to_season(9), Season::Son);
        assert_eq!(month_to_season(11), Season::Son);
    }

    #[test]
    fn test_months_table_agrees_with_mapping() {
        for season in Season::ALL {
            for month in season.months() {
                assert_eq!(month_to_season(month), season, "month {}", month);
            }
        }
        let covered: usize = Season::ALL.iter().map(|s| s.months().len()).sum();
        assert_eq!(covered, 12);
    }

    #[test]
    fn test_label_round_trip_and_order() {
        for season in Season::ALL {
            assert_eq!(season.label().parse::<Season>(), Ok(season));
        }
        assert!("Winter".parse::<Season>().is_err());

        let mut sorted = Season::ALL.to_vec();
        sorted.sort();
        let labels: Vec<_> = sorted.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, ["DJF", "JJA", "MAM", "SON"]);
    }
}
