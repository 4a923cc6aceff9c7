//! Typed snapshot of a farm as read from a save file.
//!
//! Parsing the save's XML is the loader's job; these records carry only what
//! the simulator needs, already resolved against the crop catalog.

use crate::catalog::{CropDef, ShopAccess};
use crate::config::{AnimalsConfig, FruitTreesConfig, ProfessionsConfig};
use crate::growth::Fertilizer;
use crate::machines::MachineCounts;
use crate::plots::Season;
use crate::CropId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fertilizer tiers by the game item ids a save file stores.
pub fn fertilizer_from_item_id(item_id: &str) -> Fertilizer {
    match item_id {
        "465" => Fertilizer::SpeedGro,
        "466" => Fertilizer::DeluxeSpeedGro,
        "918" => Fertilizer::HyperSpeedGro,
        _ => Fertilizer::None,
    }
}

/// A live crop on one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct CropInstance {
    pub crop: CropDef,
    pub days_until_harvest: u32,
    pub is_regrowing: bool,
    /// Fractional extra-harvest carryover, accumulated across harvests.
    pub extra_buffer: f64,
}

impl CropInstance {
    pub fn new(crop: CropDef, days_until_harvest: u32, is_regrowing: bool) -> Self {
        CropInstance {
            crop,
            days_until_harvest,
            is_regrowing,
            extra_buffer: 0.0,
        }
    }

    pub fn crop_id(&self) -> CropId {
        CropId::new(self.crop.harvest_item_id.clone())
    }
}

/// One tillable tile and whatever is on it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileState {
    pub location: String,
    pub x: i32,
    pub y: i32,
    pub fertilizer: Fertilizer,
    pub watered: bool,
    pub crop: Option<CropInstance>,
}

/// Everything the save-driven simulator needs about a farm.
#[derive(Clone, Debug, PartialEq)]
pub struct FarmState {
    pub start_day_of_year: u32,
    pub season: Season,
    pub day_of_month: u32,
    pub year: u32,
    pub farming_level: u32,
    pub professions: ProfessionsConfig,
    pub machines: MachineCounts,
    pub shop_access: ShopAccess,
    pub tiles: Vec<TileState>,
    /// Seed item id -> stack count, across player inventory and chests.
    pub seed_inventory: BTreeMap<String, u32>,
    pub animals: AnimalsConfig,
    pub fruit_trees: FruitTreesConfig,
}

/// Sprinkler-watered tile coordinates per location name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprinklerCoverage {
    pub by_location: BTreeMap<String, Vec<(i32, i32)>>,
}

impl SprinklerCoverage {
    pub fn is_watered(&self, location: &str, x: i32, y: i32) -> bool {
        self.by_location
            .get(location)
            .map(|tiles| tiles.contains(&(x, y)))
            .unwrap_or(false)
    }
}

/// Days until a mid-growth crop next produces, from its save-file phase data.
///
/// `phase_days` excludes the terminal sentinel. A fully grown regrowing crop
/// counts down from its regrow interval instead of its phases.
pub fn days_until_next_harvest(
    phase_days: &[u32],
    current_phase: usize,
    day_of_current_phase: u32,
    regrow_days: Option<u32>,
    fully_grown: bool,
) -> u32 {
    if fully_grown {
        if let Some(regrow) = regrow_days {
            return regrow.saturating_sub(day_of_current_phase);
        }
    }
    if current_phase >= phase_days.len() {
        return 0;
    }
    let remaining: u32 = phase_days[current_phase..].iter().sum();
    remaining.saturating_sub(day_of_current_phase)
}
