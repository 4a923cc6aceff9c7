//! Plots, seasons, and the 112-day game calendar.

use crate::CropId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days per season and per year in the game calendar.
pub const DAYS_PER_SEASON: u32 = 28;
pub const DAYS_PER_YEAR: u32 = 112;

/// Bucket key meaning "any crop may use these tiles".
pub const ALL_CROPS: &str = "all";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season for a 1-based day-of-year; wraps across years.
pub fn season_for_day_of_year(day_of_year: u32) -> Season {
    debug_assert!(day_of_year >= 1);
    let idx = (day_of_year.saturating_sub(1) / DAYS_PER_SEASON) % 4;
    Season::ALL[idx as usize]
}

/// Convert a season/day pair (day in 1..=28) to a day-of-year in 1..=112.
pub fn day_of_year_from_season_day(season: Season, day: u32) -> Option<u32> {
    if !(1..=DAYS_PER_SEASON).contains(&day) {
        return None;
    }
    let offset = match season {
        Season::Spring => 0,
        Season::Summer => 28,
        Season::Fall => 56,
        Season::Winter => 84,
    };
    Some(offset + day)
}

/// Locations where crops grow in any season (greenhouse, Ginger Island).
pub fn is_year_round_location(location: &str) -> bool {
    let name = location.to_ascii_lowercase();
    name == "greenhouse" || name.starts_with("island")
}

/// When a plot's tiles can hold a live crop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlotCalendar {
    /// Greenhouse, Ginger Island: active every day of the year.
    Always,
    /// Outdoor plot: active only during the listed seasons.
    Seasons { seasons: Vec<Season> },
}

impl PlotCalendar {
    pub fn is_active(&self, day_of_year: u32) -> bool {
        match self {
            PlotCalendar::Always => true,
            PlotCalendar::Seasons { seasons } => {
                seasons.contains(&season_for_day_of_year(day_of_year))
            }
        }
    }

    /// Number of distinct seasons in which the plot is active.
    pub fn active_season_count(&self) -> u32 {
        match self {
            PlotCalendar::Always => 4,
            PlotCalendar::Seasons { seasons } => {
                let mut distinct: Vec<Season> = seasons.clone();
                distinct.sort();
                distinct.dedup();
                distinct.len() as u32
            }
        }
    }
}

/// A named group of tiles with a calendar and per-crop tile allocations.
///
/// Tile counts are keyed by crop id, with an optional shared `"all"` bucket
/// any crop may draw from when it has no dedicated entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    pub name: String,
    pub tiles_by_crop: BTreeMap<String, u32>,
    pub calendar: PlotCalendar,
}

impl Plot {
    /// Tile count for a crop, falling back to the shared `"all"` bucket.
    pub fn tiles_for_crop(&self, crop_id: &CropId) -> u32 {
        if let Some(tiles) = self.tiles_by_crop.get(crop_id.as_str()) {
            return *tiles;
        }
        self.tiles_by_crop.get(ALL_CROPS).copied().unwrap_or(0)
    }

    /// Total tiles across all configured crops.
    pub fn tiles_total(&self) -> u32 {
        if self.tiles_by_crop.len() == 1 {
            if let Some(all) = self.tiles_by_crop.get(ALL_CROPS) {
                return *all;
            }
        }
        self.tiles_by_crop.values().sum()
    }
}
