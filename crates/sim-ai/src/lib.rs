#![deny(warnings)]

//! Replanting decisions for the save-driven simulator.
//!
//! When a tile opens up mid-window, the simulator asks this crate which crop
//! to plant. Candidates are scored by projected gold per remaining day:
//! estimated harvests times expected yield, valued at a blend of the best
//! processed price and the raw price weighted by how much machine capacity
//! is left, minus seed cost.

use sim_core::catalog::{seed_availability, CropCatalog, CropDef, ShopAccess};
use sim_core::config::EconomyConfig;
use sim_core::growth::{days_to_first_harvest_from_phases, GrowthModifiers};
use sim_core::machines::{
    DEHYDRATOR_DAYS, DEHYDRATOR_INPUT, KEG_DAYS, PRESERVES_JAR_DAYS,
};
use sim_core::plots::{is_year_round_location, season_for_day_of_year, Season};
use sim_core::save_state::{FarmState, TileState};
use sim_core::CropId;
use sim_econ::processed_prices;
use std::collections::BTreeMap;
use tracing::debug;

/// Whether a crop can grow at a location in a season.
pub fn crop_active(location: &str, crop: &CropDef, season: Season) -> bool {
    if is_year_round_location(location) {
        return true;
    }
    crop.grows_in(season)
}

/// Expected units per harvest from stack bounds and the extra-harvest chance.
pub fn expected_yield_per_harvest(crop: &CropDef, farming_level: u32) -> f64 {
    let base = crop.harvest_min_stack as f64
        + crop.harvest_max_increase_per_level * f64::from(farming_level);
    let extra_unit = if crop.extra_harvest_chance > 0.0 {
        crop.harvest_max_stack as f64
    } else {
        0.0
    };
    base + crop.extra_harvest_chance * extra_unit
}

/// Expected units per day: yield over the regrow interval, or over the
/// modifier-adjusted time to first harvest for single-harvest crops.
pub fn expected_daily_yield(
    crop: &CropDef,
    farming_level: u32,
    mods: Option<&GrowthModifiers>,
) -> f64 {
    let expected = expected_yield_per_harvest(crop, farming_level);
    if let Some(regrow) = crop.regrow_days {
        return expected / f64::from(regrow.max(1));
    }
    let days = match mods {
        Some(mods) => days_to_first_harvest_from_phases(
            &crop.days_in_phase,
            mods,
            &CropId::new(crop.harvest_item_id.clone()),
        ),
        None => crop.days_in_phase.iter().sum(),
    };
    expected / f64::from(days.max(1))
}

/// Fruit per day the farm's machines can absorb.
pub fn processing_capacity(kegs: u32, preserves_jars: u32, dehydrators: u32) -> f64 {
    f64::from(kegs) / f64::from(KEG_DAYS)
        + f64::from(preserves_jars) / f64::from(PRESERVES_JAR_DAYS)
        + f64::from(dehydrators * DEHYDRATOR_INPUT) / f64::from(DEHYDRATOR_DAYS)
}

/// Expected daily yield already committed by live crops on the farm.
pub fn current_expected_daily_yield(farm: &FarmState, season: Season, sprinkler_only: bool) -> f64 {
    let mut expected = 0.0;
    for tile in &farm.tiles {
        let Some(crop_inst) = &tile.crop else {
            continue;
        };
        let crop = &crop_inst.crop;
        if !crop_active(&tile.location, crop, season) {
            continue;
        }
        if sprinkler_only && crop.needs_watering && !tile.watered {
            continue;
        }
        let mods = GrowthModifiers {
            fertilizer: tile.fertilizer,
            agriculturist: farm.professions.farming.agriculturist,
            paddy_bonus: false,
        };
        expected += expected_daily_yield(crop, farm.farming_level, Some(&mods));
    }
    expected
}

/// Count harvests within a window, walking day by day and stopping at the
/// first out-of-season day.
///
/// A single-harvest crop reuses its modifier-adjusted time-to-first-harvest
/// as the replant interval. That slightly undercounts crops whose fertilizer
/// is consumed at replant, and is kept as a deliberate approximation.
pub fn estimate_harvests(
    crop: &CropDef,
    day_of_year: u32,
    window_days: u32,
    days_to_first: u32,
    location: &str,
) -> u32 {
    if window_days == 0 {
        return 0;
    }
    if !crop_active(location, crop, season_for_day_of_year(day_of_year)) {
        return 0;
    }
    let mut days_remaining = days_to_first;
    let mut harvests = 0;
    for day in 0..window_days {
        let season = season_for_day_of_year((day_of_year - 1 + day) % 112 + 1);
        if !crop_active(location, crop, season) {
            break;
        }
        if days_remaining > 0 {
            days_remaining -= 1;
        }
        if days_remaining == 0 {
            harvests += 1;
            days_remaining = crop.regrow_days.unwrap_or(days_to_first);
        }
    }
    harvests
}

/// Everything a replant decision needs to know about the farm and the day.
pub struct PlantingQuery<'a> {
    pub tile: &'a TileState,
    pub day_of_year: u32,
    pub season: Season,
    /// Days left in the window after today.
    pub window_days: u32,
    pub catalog: &'a CropCatalog,
    pub economy: &'a EconomyConfig,
    pub shop_access: &'a ShopAccess,
    pub seed_inventory: &'a BTreeMap<String, u32>,
    pub allow_purchases: bool,
    pub farming_level: u32,
    pub agriculturist: bool,
    /// Fruit per day the machines can absorb.
    pub processing_capacity: f64,
    /// Expected daily yield already committed by live crops.
    pub current_expected: f64,
}

/// Projected gold per remaining window day for planting this crop now.
pub fn crop_score(crop: &CropDef, query: &PlantingQuery<'_>) -> f64 {
    let Some(_) = crop.base_price else {
        return 0.0;
    };
    let mods = GrowthModifiers {
        fertilizer: query.tile.fertilizer,
        agriculturist: query.agriculturist,
        paddy_bonus: false,
    };
    let days_to_first = days_to_first_harvest_from_phases(
        &crop.days_in_phase,
        &mods,
        &CropId::new(crop.harvest_item_id.clone()),
    );

    let harvests = estimate_harvests(
        crop,
        query.day_of_year,
        query.window_days,
        days_to_first,
        &query.tile.location,
    );
    if harvests == 0 {
        return 0.0;
    }
    let yield_per = expected_yield_per_harvest(crop, query.farming_level);
    let total_yield = f64::from(harvests) * yield_per;

    let prices = processed_prices(crop, query.economy);
    let mut per_fruit_best = prices.raw as f64;
    if let Some(keg) = prices.keg {
        per_fruit_best = per_fruit_best.max(keg as f64);
    }
    if let Some(jar) = prices.jar {
        per_fruit_best = per_fruit_best.max(jar as f64);
    }
    if let Some(dried_batch) = prices.dried_batch {
        per_fruit_best = per_fruit_best.max(dried_batch as f64 / f64::from(DEHYDRATOR_INPUT));
    }

    // Only the fraction of yield that fits through the machines earns the
    // processed price; the rest sells raw.
    let expected_total =
        query.current_expected + expected_daily_yield(crop, query.farming_level, Some(&mods));
    let processing_fraction = if query.processing_capacity <= 0.0 {
        0.0
    } else if expected_total <= 0.0 {
        1.0
    } else {
        (query.processing_capacity / expected_total).min(1.0)
    };
    let per_fruit_value = processing_fraction * per_fruit_best
        + (1.0 - processing_fraction) * prices.raw as f64;

    let revenue = total_yield * per_fruit_value;
    let seed_cost = match crop.seed_price {
        Some(price) if crop.regrow_days.is_some() => price as f64,
        Some(price) => price as f64 * f64::from(harvests),
        None => 0.0,
    };
    (revenue - seed_cost) / f64::from(query.window_days.max(1))
}

/// Pick the highest-scoring plantable crop for an empty tile.
///
/// Candidates iterate in harvest-id order and a strict improvement is
/// required to displace the best, so ties resolve to the lowest id.
pub fn select_crop_for_tile<'a>(query: &PlantingQuery<'a>) -> Option<&'a CropDef> {
    let mut best_crop: Option<&CropDef> = None;
    let mut best_score = 0.0;

    for crop in query.catalog.by_harvest_id.values() {
        if !crop_active(&query.tile.location, crop, query.season) {
            continue;
        }
        if crop.needs_watering && !query.tile.watered {
            continue;
        }
        let availability = seed_availability(crop, query.shop_access);
        let has_seed = query
            .seed_inventory
            .get(&crop.seed_item_id)
            .copied()
            .unwrap_or(0)
            > 0;
        if !has_seed && !(query.allow_purchases && availability.purchasable) {
            continue;
        }
        let score = crop_score(crop, query);
        if score > best_score {
            best_score = score;
            best_crop = Some(crop);
        }
    }

    if let Some(crop) = best_crop {
        debug!(
            crop = %crop.harvest_item_id,
            score = best_score,
            day_of_year = query.day_of_year,
            "selected crop for replant"
        );
    }
    best_crop
}
