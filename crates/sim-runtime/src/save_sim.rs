//! Save-driven whole-farm simulator.
//!
//! Starts from a farm snapshot and steps day by day: machines advance,
//! tiles grow and harvest, ancient fruit goes through seed makers, empty
//! watered tiles are replanted by the scoring heuristic, and fresh produce
//! fills machines by margin over the raw price. At the end of the window,
//! everything left over is valued and rolled into a profit total.

use serde::{Deserialize, Serialize};
use sim_core::catalog::{seed_availability, CropCatalog, CropCategory, CropDef, ShopAccess};
use sim_core::config::EconomyConfig;
use sim_core::growth::{days_to_first_harvest_from_phases, GrowthModifiers};
use sim_core::machines::{
    MachineSlot, CASK_DAYS, DEHYDRATOR_DAYS, DEHYDRATOR_INPUT, KEG_DAYS, PRESERVES_JAR_DAYS,
};
use sim_core::plots::{season_for_day_of_year, Season, DAYS_PER_YEAR};
use sim_core::save_state::{CropInstance, FarmState, TileState};
use sim_core::CropId;
use sim_ai::{
    crop_active, current_expected_daily_yield, expected_daily_yield, processing_capacity,
    select_crop_for_tile, PlantingQuery,
};
use sim_econ::{dried_batch_price, jar_price, keg_price, raw_price};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Harvest item id of Ancient Fruit, the only crop fed to seed makers.
const ANCIENT_FRUIT_ID: &str = "454";

/// Knobs for a save-driven run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub window_days: u32,
    /// Only tiles under sprinkler coverage count as watered.
    pub sprinkler_only: bool,
    pub allow_seed_purchases: bool,
    /// Seed makers yield one ancient seed per fruit instead of two.
    pub ancient_seed_conservative: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            window_days: DAYS_PER_YEAR + 1,
            sprinkler_only: true,
            allow_seed_purchases: true,
            ancient_seed_conservative: true,
        }
    }
}

/// Per-crop production and seed spend over the window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropResult {
    pub crop_id: CropId,
    pub name: Option<String>,
    pub harvested: u32,
    pub raw_sold: u32,
    pub base_wine: u32,
    pub aged_wine: u32,
    pub juice: u32,
    pub jelly: u32,
    pub pickles: u32,
    pub dried: u32,
    pub seed_used: u32,
    pub seed_purchased: u32,
    pub seed_cost: i64,
    pub wine_in_kegs_end: u32,
    pub wine_in_casks_end: u32,
    pub jelly_in_jars_end: u32,
    pub dried_in_dehydrators_end: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub per_crop: BTreeMap<CropId, CropResult>,
    pub total_revenue: i64,
    pub total_profit: i64,
    pub total_seed_cost: i64,
    pub total_raw_sold: u32,
    pub total_base_wine: u32,
    pub total_aged_wine: u32,
    pub total_juice: u32,
    pub total_jelly: u32,
    pub total_pickles: u32,
    pub total_dried: u32,
}

enum MachineKind {
    Keg,
    Jar,
    Dehydrator,
}

/// Run the farm forward from its snapshot. Tiles in `farm` are mutated as
/// crops grow, die off out of season, and get replanted.
pub fn simulate_save(
    farm: &mut FarmState,
    catalog: &CropCatalog,
    economy: &EconomyConfig,
    options: &SimulationOptions,
) -> SimulationResult {
    let window_days = options.window_days.max(1);
    let farming_level = farm.farming_level;
    let agriculturist = farm.professions.farming.agriculturist;
    let capacity = processing_capacity(
        farm.machines.kegs,
        farm.machines.preserves_jars,
        farm.machines.dehydrators,
    );

    let mut fruit_inventory: BTreeMap<CropId, u32> = BTreeMap::new();
    let mut base_wine_inventory: BTreeMap<CropId, u32> = BTreeMap::new();
    let mut seed_inventory = farm.seed_inventory.clone();
    let mut results: BTreeMap<CropId, CropResult> = BTreeMap::new();

    let mut kegs = MachineSlot::idle_bank(farm.machines.kegs);
    let mut jars = MachineSlot::idle_bank(farm.machines.preserves_jars);
    let mut dehydrators = MachineSlot::idle_bank(farm.machines.dehydrators);
    let mut casks = MachineSlot::idle_bank(farm.machines.casks);

    for day in 0..window_days {
        let day_of_year = (farm.start_day_of_year.max(1) - 1 + day) % DAYS_PER_YEAR + 1;
        let season = season_for_day_of_year(day_of_year);

        advance_kegs(&mut kegs, catalog, &mut results, &mut base_wine_inventory);
        advance_jars(&mut jars, catalog, &mut results);
        advance_finishers(&mut dehydrators, catalog, &mut results, |r| &mut r.dried);
        advance_finishers(&mut casks, catalog, &mut results, |r| &mut r.aged_wine);

        fill_casks(&mut casks, &mut base_wine_inventory, catalog, economy);

        grow_and_harvest(
            &mut farm.tiles,
            season,
            farming_level,
            options.sprinkler_only,
            &mut fruit_inventory,
            &mut results,
        );

        if farm.machines.seed_makers > 0 {
            run_ancient_seed_makers(
                &mut fruit_inventory,
                &mut seed_inventory,
                catalog,
                farm.machines.seed_makers,
                options.ancient_seed_conservative,
            );
        }

        let mut current_expected =
            current_expected_daily_yield(farm, season, options.sprinkler_only);
        for idx in 0..farm.tiles.len() {
            if farm.tiles[idx].crop.is_some() {
                continue;
            }
            if options.sprinkler_only && !farm.tiles[idx].watered {
                continue;
            }
            let selected = {
                let query = PlantingQuery {
                    tile: &farm.tiles[idx],
                    day_of_year,
                    season,
                    window_days: window_days - day - 1,
                    catalog,
                    economy,
                    shop_access: &farm.shop_access,
                    seed_inventory: &seed_inventory,
                    allow_purchases: options.allow_seed_purchases,
                    farming_level,
                    agriculturist,
                    processing_capacity: capacity,
                    current_expected,
                };
                select_crop_for_tile(&query).cloned()
            };
            let Some(crop_def) = selected else {
                continue;
            };
            let planted = plant_crop(
                &mut farm.tiles[idx],
                &crop_def,
                agriculturist,
                &mut seed_inventory,
                &farm.shop_access,
                options.allow_seed_purchases,
                &mut results,
            );
            if planted {
                let mods = GrowthModifiers {
                    fertilizer: farm.tiles[idx].fertilizer,
                    agriculturist,
                    paddy_bonus: false,
                };
                current_expected += expected_daily_yield(&crop_def, farming_level, Some(&mods));
            }
        }

        let keg_priority =
            inventory_priority(&fruit_inventory, catalog, economy, MachineKind::Keg);
        fill_machines(&mut kegs, &mut fruit_inventory, &keg_priority, 1, KEG_DAYS);
        let jar_priority =
            inventory_priority(&fruit_inventory, catalog, economy, MachineKind::Jar);
        fill_machines(
            &mut jars,
            &mut fruit_inventory,
            &jar_priority,
            1,
            PRESERVES_JAR_DAYS,
        );
        let dried_priority =
            inventory_priority(&fruit_inventory, catalog, economy, MachineKind::Dehydrator);
        fill_machines(
            &mut dehydrators,
            &mut fruit_inventory,
            &dried_priority,
            DEHYDRATOR_INPUT,
            DEHYDRATOR_DAYS,
        );
        debug!(day, day_of_year, %season, "save simulation day complete");
    }

    // Window over: leftover produce sells raw, mid-machine loads are counted
    // but not valued.
    for (crop_id, count) in &fruit_inventory {
        if *count == 0 {
            continue;
        }
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        if crop.base_price.is_none() {
            continue;
        }
        ensure_result(&mut results, crop).raw_sold += count;
    }
    for (crop_id, count) in &base_wine_inventory {
        if *count == 0 {
            continue;
        }
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        ensure_result(&mut results, crop).base_wine += count;
    }
    count_in_flight(&kegs, catalog, &mut results, |r| &mut r.wine_in_kegs_end);
    count_in_flight(&casks, catalog, &mut results, |r| &mut r.wine_in_casks_end);
    count_in_flight(&jars, catalog, &mut results, |r| &mut r.jelly_in_jars_end);
    count_in_flight(&dehydrators, catalog, &mut results, |r| {
        &mut r.dried_in_dehydrators_end
    });

    let mut summary = SimulationResult::default();
    for (crop_id, result) in &results {
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        let Some(base) = crop.base_price else {
            continue;
        };
        summary.total_seed_cost += result.seed_cost;
        summary.total_raw_sold += result.raw_sold;
        summary.total_base_wine += result.base_wine;
        summary.total_aged_wine += result.aged_wine;
        summary.total_juice += result.juice;
        summary.total_jelly += result.jelly;
        summary.total_pickles += result.pickles;
        summary.total_dried += result.dried;

        let mut revenue = result.raw_sold as i64 * raw_price(base, economy);
        match crop.category {
            CropCategory::Fruit => {
                let wine = keg_price(crop, economy).unwrap_or(0);
                revenue += result.base_wine as i64 * wine;
                revenue += (f64::from(result.aged_wine)
                    * wine as f64
                    * economy.aged_wine_multiplier) as i64;
                revenue += result.jelly as i64 * jar_price(crop, economy).unwrap_or(0);
                revenue += result.dried as i64 * dried_batch_price(crop, economy).unwrap_or(0);
            }
            CropCategory::Vegetable => {
                revenue += result.juice as i64 * keg_price(crop, economy).unwrap_or(0);
                revenue += result.pickles as i64 * jar_price(crop, economy).unwrap_or(0);
            }
            // Flowers and everything else only sell raw.
            _ => {}
        }
        summary.total_revenue += revenue;
    }
    summary.total_profit = summary.total_revenue - summary.total_seed_cost;
    summary.per_crop = results;
    info!(
        revenue = summary.total_revenue,
        profit = summary.total_profit,
        seed_cost = summary.total_seed_cost,
        "save simulation finished"
    );
    summary
}

fn ensure_result<'a>(
    results: &'a mut BTreeMap<CropId, CropResult>,
    crop: &CropDef,
) -> &'a mut CropResult {
    let crop_id = CropId::new(crop.harvest_item_id.clone());
    results.entry(crop_id.clone()).or_insert_with(|| CropResult {
        crop_id,
        name: crop.name.clone(),
        ..CropResult::default()
    })
}

fn advance_kegs(
    kegs: &mut [MachineSlot],
    catalog: &CropCatalog,
    results: &mut BTreeMap<CropId, CropResult>,
    base_wine_inventory: &mut BTreeMap<CropId, u32>,
) {
    for slot in kegs {
        let Some(crop_id) = slot.advance() else {
            continue;
        };
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        match crop.category {
            CropCategory::Fruit => {
                *base_wine_inventory.entry(crop_id).or_insert(0) += 1;
            }
            CropCategory::Vegetable => {
                ensure_result(results, crop).juice += 1;
            }
            _ => {}
        }
    }
}

fn advance_jars(
    jars: &mut [MachineSlot],
    catalog: &CropCatalog,
    results: &mut BTreeMap<CropId, CropResult>,
) {
    for slot in jars {
        let Some(crop_id) = slot.advance() else {
            continue;
        };
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        match crop.category {
            CropCategory::Fruit => ensure_result(results, crop).jelly += 1,
            CropCategory::Vegetable => ensure_result(results, crop).pickles += 1,
            _ => {}
        }
    }
}

/// Advance slots whose output is a single counter (dehydrators, casks).
fn advance_finishers(
    slots: &mut [MachineSlot],
    catalog: &CropCatalog,
    results: &mut BTreeMap<CropId, CropResult>,
    counter: fn(&mut CropResult) -> &mut u32,
) {
    for slot in slots {
        let Some(crop_id) = slot.advance() else {
            continue;
        };
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        *counter(ensure_result(results, crop)) += 1;
    }
}

fn count_in_flight(
    slots: &[MachineSlot],
    catalog: &CropCatalog,
    results: &mut BTreeMap<CropId, CropResult>,
    counter: fn(&mut CropResult) -> &mut u32,
) {
    for slot in slots {
        if slot.days_remaining == 0 {
            continue;
        }
        let Some(crop_id) = &slot.contents else {
            continue;
        };
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        *counter(ensure_result(results, crop)) += 1;
    }
}

/// Casks age the most valuable wine first.
fn fill_casks(
    casks: &mut [MachineSlot],
    base_wine_inventory: &mut BTreeMap<CropId, u32>,
    catalog: &CropCatalog,
    economy: &EconomyConfig,
) {
    let mut priority: Vec<(CropId, i64)> = base_wine_inventory
        .iter()
        .filter(|(_, count)| **count > 0)
        .filter_map(|(crop_id, _)| {
            let crop = catalog.by_harvest_id.get(crop_id.as_str())?;
            Some((crop_id.clone(), keg_price(crop, economy).unwrap_or(0)))
        })
        .collect();
    priority.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let priority: Vec<CropId> = priority.into_iter().map(|(id, _)| id).collect();
    fill_machines(casks, base_wine_inventory, &priority, 1, CASK_DAYS);
}

fn fill_machines(
    slots: &mut [MachineSlot],
    inventory: &mut BTreeMap<CropId, u32>,
    priority: &[CropId],
    input: u32,
    days: u32,
) {
    for slot in slots {
        if !slot.is_idle() {
            continue;
        }
        let Some(crop_id) = priority
            .iter()
            .find(|id| inventory.get(*id).copied().unwrap_or(0) >= input)
        else {
            break;
        };
        if let Some(count) = inventory.get_mut(crop_id) {
            *count -= input;
        }
        slot.start(crop_id.clone(), days);
    }
}

/// Machine feed order by margin over the raw price, best first. Crops whose
/// processed form is worth no more than raw stay out of the machines.
fn inventory_priority(
    inventory: &BTreeMap<CropId, u32>,
    catalog: &CropCatalog,
    economy: &EconomyConfig,
    kind: MachineKind,
) -> Vec<CropId> {
    let mut scored: Vec<(CropId, f64)> = Vec::new();
    for (crop_id, count) in inventory {
        if *count == 0 {
            continue;
        }
        let Some(crop) = catalog.by_harvest_id.get(crop_id.as_str()) else {
            continue;
        };
        let Some(base) = crop.base_price else {
            continue;
        };
        let raw = raw_price(base, economy) as f64;
        let value = match kind {
            MachineKind::Keg => keg_price(crop, economy).map(|v| v as f64),
            MachineKind::Jar => jar_price(crop, economy).map(|v| v as f64),
            MachineKind::Dehydrator => {
                dried_batch_price(crop, economy).map(|v| v as f64 / f64::from(DEHYDRATOR_INPUT))
            }
        };
        let Some(value) = value else {
            continue;
        };
        if value <= raw {
            continue;
        }
        scored.push((crop_id.clone(), value - raw));
    }
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.into_iter().map(|(crop_id, _)| crop_id).collect()
}

fn grow_and_harvest(
    tiles: &mut [TileState],
    season: Season,
    farming_level: u32,
    sprinkler_only: bool,
    fruit_inventory: &mut BTreeMap<CropId, u32>,
    results: &mut BTreeMap<CropId, CropResult>,
) {
    for tile in tiles {
        let Some(crop_inst) = tile.crop.as_mut() else {
            continue;
        };
        if !crop_active(&tile.location, &crop_inst.crop, season) {
            tile.crop = None;
            continue;
        }
        if crop_inst.crop.needs_watering && sprinkler_only && !tile.watered {
            continue;
        }
        crop_inst.days_until_harvest = crop_inst.days_until_harvest.saturating_sub(1);
        if crop_inst.days_until_harvest > 0 {
            continue;
        }

        let amount = harvest_yield(crop_inst, farming_level);
        if amount > 0 {
            *fruit_inventory
                .entry(crop_inst.crop_id())
                .or_insert(0) += amount;
            ensure_result(results, &crop_inst.crop).harvested += amount;
        }

        match crop_inst.crop.regrow_days {
            Some(regrow) if regrow > 0 => {
                crop_inst.days_until_harvest = regrow;
                crop_inst.is_regrowing = true;
            }
            _ => {
                tile.crop = None;
            }
        }
    }
}

/// Units from one harvest: the level-scaled base stack plus accumulated
/// fractional extra-harvest units, carried over in the instance buffer.
fn harvest_yield(crop_inst: &mut CropInstance, farming_level: u32) -> u32 {
    let crop = &crop_inst.crop;
    let base = crop.harvest_min_stack
        + (crop.harvest_max_increase_per_level * f64::from(farming_level)) as u32;
    let extra_unit = if crop.extra_harvest_chance > 0.0 {
        crop.harvest_max_stack
    } else {
        0
    };
    crop_inst.extra_buffer += crop.extra_harvest_chance * f64::from(extra_unit);
    let extra = crop_inst.extra_buffer as u32;
    crop_inst.extra_buffer -= f64::from(extra);
    base + extra
}

fn plant_crop(
    tile: &mut TileState,
    crop: &CropDef,
    agriculturist: bool,
    seed_inventory: &mut BTreeMap<String, u32>,
    shop_access: &ShopAccess,
    allow_purchases: bool,
    results: &mut BTreeMap<CropId, CropResult>,
) -> bool {
    if !crop.seed_item_id.is_empty() {
        let on_hand = seed_inventory
            .get(&crop.seed_item_id)
            .copied()
            .unwrap_or(0);
        if on_hand > 0 {
            seed_inventory.insert(crop.seed_item_id.clone(), on_hand - 1);
            ensure_result(results, crop).seed_used += 1;
        } else {
            let availability = seed_availability(crop, shop_access);
            if !allow_purchases || !availability.purchasable {
                return false;
            }
            let Some(price) = availability.price else {
                return false;
            };
            let result = ensure_result(results, crop);
            result.seed_used += 1;
            result.seed_purchased += 1;
            result.seed_cost += price;
        }
    }

    let mods = GrowthModifiers {
        fertilizer: tile.fertilizer,
        agriculturist,
        paddy_bonus: false,
    };
    let days_to_first = days_to_first_harvest_from_phases(
        &crop.days_in_phase,
        &mods,
        &CropId::new(crop.harvest_item_id.clone()),
    );
    tile.crop = Some(CropInstance::new(crop.clone(), days_to_first.max(1), false));
    true
}

/// Turn today's ancient fruit into seeds, one fruit per seed maker.
fn run_ancient_seed_makers(
    fruit_inventory: &mut BTreeMap<CropId, u32>,
    seed_inventory: &mut BTreeMap<String, u32>,
    catalog: &CropCatalog,
    seed_makers: u32,
    conservative: bool,
) {
    let Some(ancient) = catalog.by_harvest_id.get(ANCIENT_FRUIT_ID) else {
        return;
    };
    let ancient_id = CropId::from(ANCIENT_FRUIT_ID);
    let available = fruit_inventory.get(&ancient_id).copied().unwrap_or(0);
    if available == 0 {
        return;
    }
    let to_process = seed_makers.min(available);
    fruit_inventory.insert(ancient_id, available - to_process);
    let seeds_per = if conservative { 1 } else { 2 };
    *seed_inventory
        .entry(ancient.seed_item_id.clone())
        .or_insert(0) += to_process * seeds_per;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::config::ProfessionsConfig;
    use sim_core::growth::Fertilizer;
    use sim_core::machines::MachineCounts;

    fn crop_def(
        harvest: &str,
        seed: &str,
        phases: &[u32],
        regrow: Option<u32>,
        seasons: &[Season],
        base_price: i64,
        seed_price: Option<i64>,
        category: CropCategory,
    ) -> CropDef {
        let mut seed_sources = BTreeMap::new();
        if seed_price.is_some() {
            seed_sources.insert("pierre".to_string(), seed_price);
        }
        CropDef {
            harvest_item_id: harvest.to_string(),
            seed_item_id: seed.to_string(),
            name: None,
            seasons: seasons.to_vec(),
            days_in_phase: phases.to_vec(),
            regrow_days: regrow,
            harvest_min_stack: 1,
            harvest_max_stack: 1,
            harvest_max_increase_per_level: 0.0,
            extra_harvest_chance: 0.0,
            needs_watering: true,
            is_paddy: false,
            is_raised: false,
            base_price: Some(base_price),
            seed_price,
            seed_sources,
            category,
        }
    }

    fn starfruit() -> CropDef {
        crop_def(
            "268",
            "486",
            &[2, 3, 2, 3, 3],
            None,
            &[Season::Summer],
            750,
            Some(400),
            CropCategory::Fruit,
        )
    }

    fn ancient() -> CropDef {
        crop_def(
            "454",
            "499",
            &[2, 7, 7, 7, 5],
            Some(7),
            &[Season::Spring, Season::Summer, Season::Fall],
            550,
            None,
            CropCategory::Fruit,
        )
    }

    fn tile(location: &str, watered: bool, crop: Option<CropInstance>) -> TileState {
        TileState {
            location: location.to_string(),
            x: 0,
            y: 0,
            fertilizer: Fertilizer::None,
            watered,
            crop,
        }
    }

    fn farm(tiles: Vec<TileState>, machines: MachineCounts) -> FarmState {
        FarmState {
            start_day_of_year: 1,
            season: Season::Spring,
            day_of_month: 1,
            year: 1,
            farming_level: 0,
            professions: ProfessionsConfig::default(),
            machines,
            shop_access: ShopAccess::default(),
            tiles,
            seed_inventory: BTreeMap::new(),
            animals: Default::default(),
            fruit_trees: Default::default(),
        }
    }

    fn no_replant() -> SimulationOptions {
        SimulationOptions {
            allow_seed_purchases: false,
            ..SimulationOptions::default()
        }
    }

    #[test]
    fn ripe_crop_harvests_and_sells_raw() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                true,
                Some(CropInstance::new(starfruit(), 1, false)),
            )],
            MachineCounts::default(),
        );
        let options = SimulationOptions {
            window_days: 2,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let r = &result.per_crop[&CropId::from("268")];
        assert_eq!(r.harvested, 1);
        assert_eq!(r.raw_sold, 1);
        assert_eq!(result.total_revenue, 750);
        assert_eq!(result.total_profit, 750);
        assert!(farm.tiles[0].crop.is_none());
    }

    #[test]
    fn zero_start_day_runs_as_day_one() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let options = SimulationOptions {
            window_days: 2,
            ..no_replant()
        };
        let make = |start: u32| {
            let mut f = farm(
                vec![tile(
                    "Greenhouse",
                    true,
                    Some(CropInstance::new(starfruit(), 1, false)),
                )],
                MachineCounts::default(),
            );
            f.start_day_of_year = start;
            f
        };
        let from_zero =
            simulate_save(&mut make(0), &catalog, &EconomyConfig::default(), &options);
        let from_one =
            simulate_save(&mut make(1), &catalog, &EconomyConfig::default(), &options);
        assert_eq!(from_zero, from_one);
        assert_eq!(from_zero.total_revenue, 750);
    }

    #[test]
    fn result_round_trips_through_json() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                true,
                Some(CropInstance::new(starfruit(), 1, false)),
            )],
            MachineCounts::default(),
        );
        let options = SimulationOptions {
            window_days: 2,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let json = serde_json::to_string(&result).expect("serialize");
        let back: SimulationResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, result);
    }

    #[test]
    fn keg_turns_fruit_into_base_wine() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                true,
                Some(CropInstance::new(starfruit(), 1, false)),
            )],
            MachineCounts {
                kegs: 1,
                ..MachineCounts::default()
            },
        );
        let options = SimulationOptions {
            window_days: 8,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let r = &result.per_crop[&CropId::from("268")];
        assert_eq!(r.base_wine, 1);
        assert_eq!(r.raw_sold, 0);
        // 750 * 3
        assert_eq!(result.total_revenue, 2250);
    }

    #[test]
    fn cask_picks_up_finished_wine() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                true,
                Some(CropInstance::new(starfruit(), 1, false)),
            )],
            MachineCounts {
                kegs: 1,
                casks: 1,
                ..MachineCounts::default()
            },
        );
        let options = SimulationOptions {
            window_days: 9,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let r = &result.per_crop[&CropId::from("268")];
        assert_eq!(r.wine_in_casks_end, 1);
        assert_eq!(r.base_wine, 0);
    }

    #[test]
    fn vegetables_become_juice_and_pickles() {
        let veg = crop_def(
            "24",
            "472",
            &[1],
            None,
            &[Season::Spring],
            100,
            None,
            CropCategory::Vegetable,
        );
        let catalog = CropCatalog::from_defs(vec![veg.clone()]);
        let mut farm = farm(
            vec![
                tile("Greenhouse", true, Some(CropInstance::new(veg.clone(), 1, false))),
                tile("Greenhouse", true, Some(CropInstance::new(veg, 1, false))),
            ],
            MachineCounts {
                kegs: 1,
                preserves_jars: 1,
                ..MachineCounts::default()
            },
        );
        let options = SimulationOptions {
            window_days: 8,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let r = &result.per_crop[&CropId::from("24")];
        assert_eq!(r.juice, 1);
        assert_eq!(r.pickles, 1);
        // juice 225 + pickles 250
        assert_eq!(result.total_revenue, 475);
    }

    #[test]
    fn out_of_season_outdoor_crop_is_cleared() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        // Spring day 1: a summer crop outdoors dies immediately.
        let mut farm = farm(
            vec![tile(
                "Farm",
                true,
                Some(CropInstance::new(starfruit(), 1, false)),
            )],
            MachineCounts::default(),
        );
        let options = SimulationOptions {
            window_days: 2,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        assert!(result.per_crop.is_empty());
        assert!(farm.tiles[0].crop.is_none());
    }

    #[test]
    fn unwatered_tiles_do_not_grow_under_sprinkler_only() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                false,
                Some(CropInstance::new(starfruit(), 1, false)),
            )],
            MachineCounts::default(),
        );
        let options = SimulationOptions {
            window_days: 5,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        assert!(result.per_crop.is_empty());
        assert_eq!(
            farm.tiles[0].crop.as_ref().map(|c| c.days_until_harvest),
            Some(1)
        );
    }

    #[test]
    fn regrowing_crop_harvests_on_its_interval() {
        let catalog = CropCatalog::from_defs(vec![ancient()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                true,
                Some(CropInstance::new(ancient(), 1, false)),
            )],
            MachineCounts::default(),
        );
        let options = SimulationOptions {
            window_days: 8,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        // Ready on day 0, then again 7 days later.
        assert_eq!(result.per_crop[&CropId::from("454")].harvested, 2);
        assert!(farm.tiles[0].crop.as_ref().is_some_and(|c| c.is_regrowing));
    }

    #[test]
    fn seed_makers_convert_ancient_fruit() {
        let catalog = CropCatalog::from_defs(vec![ancient()]);
        let mut farm = farm(
            vec![tile(
                "Greenhouse",
                true,
                Some(CropInstance::new(ancient(), 1, false)),
            )],
            MachineCounts {
                seed_makers: 2,
                ..MachineCounts::default()
            },
        );
        let options = SimulationOptions {
            window_days: 2,
            ..no_replant()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        // The one harvested fruit went to the seed maker, not the shipping bin.
        assert_eq!(result.per_crop[&CropId::from("454")].raw_sold, 0);
        assert_eq!(result.total_revenue, 0);
    }

    #[test]
    fn replanting_purchases_seeds_and_charges_them() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile("Greenhouse", true, None)],
            MachineCounts::default(),
        );
        farm.farming_level = 10;
        let options = SimulationOptions {
            window_days: 30,
            ..SimulationOptions::default()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let r = &result.per_crop[&CropId::from("268")];
        assert!(r.seed_purchased >= 1);
        assert_eq!(r.seed_cost, 400 * r.seed_purchased as i64);
        assert_eq!(result.total_profit, result.total_revenue - result.total_seed_cost);
    }

    #[test]
    fn seeds_on_hand_are_used_before_purchases() {
        let catalog = CropCatalog::from_defs(vec![starfruit()]);
        let mut farm = farm(
            vec![tile("Greenhouse", true, None)],
            MachineCounts::default(),
        );
        farm.seed_inventory.insert("486".to_string(), 5);
        let options = SimulationOptions {
            window_days: 20,
            ..SimulationOptions::default()
        };
        let result = simulate_save(&mut farm, &catalog, &EconomyConfig::default(), &options);
        let r = &result.per_crop[&CropId::from("268")];
        assert_eq!(r.seed_used, 1);
        assert_eq!(r.seed_purchased, 0);
        assert_eq!(r.seed_cost, 0);
    }

    #[test]
    fn harvest_yield_accumulates_extra_chance() {
        let mut crop = starfruit();
        crop.harvest_min_stack = 1;
        crop.harvest_max_stack = 2;
        crop.extra_harvest_chance = 0.25;
        let mut inst = CropInstance::new(crop, 1, false);
        // 0.5 extra per harvest: every second harvest yields one more.
        assert_eq!(harvest_yield(&mut inst, 0), 1);
        assert_eq!(harvest_yield(&mut inst, 0), 2);
        assert_eq!(harvest_yield(&mut inst, 0), 1);
        assert_eq!(harvest_yield(&mut inst, 0), 2);
    }

    #[test]
    fn harvest_yield_scales_with_farming_level() {
        let mut crop = starfruit();
        crop.harvest_max_increase_per_level = 0.2;
        let mut inst = CropInstance::new(crop, 1, false);
        assert_eq!(harvest_yield(&mut inst, 10), 3);
    }

    #[test]
    fn machine_priority_skips_unprofitable_processing() {
        let flower = crop_def(
            "591",
            "427",
            &[1],
            None,
            &[Season::Spring],
            30,
            None,
            CropCategory::Flower,
        );
        let mut inventory = BTreeMap::new();
        inventory.insert(CropId::from("591"), 5);
        inventory.insert(CropId::from("268"), 5);
        let catalog = CropCatalog::from_defs(vec![flower, starfruit()]);
        let priority = inventory_priority(
            &inventory,
            &catalog,
            &EconomyConfig::default(),
            MachineKind::Keg,
        );
        // Flowers have no keg output; only starfruit qualifies.
        assert_eq!(priority, vec![CropId::from("268")]);
    }
}
