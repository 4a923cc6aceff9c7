//! Simulation result records shared by the run loops and the profit layer.

use crate::CropId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-crop totals for one simulated year.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropYearResult {
    pub crop_id: CropId,
    pub fruit_harvested: u32,
    pub fruit_unprocessed: u32,
    pub fruit_sold: u32,
    pub base_wine_produced: u32,
    pub base_wine_sold: u32,
    pub aged_wine_produced: u32,
    pub wine_in_kegs_end: u32,
    pub seed_units_used: u32,
    pub fertilizer_units_used: u32,
    #[serde(default)]
    pub jelly_produced: u32,
    #[serde(default)]
    pub dried_fruit_produced: u32,
    #[serde(default)]
    pub jelly_in_jars_end: u32,
    #[serde(default)]
    pub dried_fruit_in_dehydrators_end: u32,
}

/// Whole-year pipeline output across all crops.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSimulationResult {
    pub per_crop: BTreeMap<CropId, CropYearResult>,
    /// True when every harvested fruit was converted and no wine is mid-keg.
    pub kegs_sufficient: bool,
    pub cask_uses_per_cask: f64,
    pub casks_effective: u32,
    pub full_cask_batch_met: bool,
    pub total_base_wine_sold: u32,
    pub total_aged_wine: u32,
    pub total_fruit_unprocessed: u32,
    pub total_wine_in_kegs_end: u32,
    pub total_jelly: u32,
    pub total_dried_fruit: u32,
    pub total_jelly_in_jars_end: u32,
    pub total_dried_fruit_in_dehydrators_end: u32,
}

/// Yearly animal product totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalYearResult {
    pub eggs: u32,
    pub large_eggs: u32,
    pub void_eggs: u32,
    pub duck_eggs: u32,
    pub milk: u32,
    pub large_milk: u32,
    pub goat_milk: u32,
    pub large_goat_milk: u32,
    pub wool: u32,
    pub rabbit_feet: u32,
    pub mayo: u32,
    pub gold_mayo: u32,
    pub void_mayo: u32,
    pub duck_mayo: u32,
    pub cheese: u32,
    pub gold_cheese: u32,
    pub goat_cheese: u32,
    pub gold_goat_cheese: u32,
    pub cloth: u32,
    pub truffles: u32,
    pub truffle_oil: u32,
    pub raw_truffles: u32,
}

/// Yearly honey output, bucketed by the flower base price active at
/// harvest time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeYearResult {
    pub honey_by_flower_price: BTreeMap<i64, u32>,
    pub honey_total: u32,
}
