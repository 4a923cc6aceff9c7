//! Config-driven year pipeline: grow, harvest, and push produce through
//! kegs, preserves jars, dehydrators, and casks, one day at a time.
//!
//! Cask aging is modeled as batch fills on a fixed schedule (two uses per
//! year), replayed against the recorded daily wine series after the day
//! loop finishes.

use serde::{Deserialize, Serialize};
use sim_core::crops::CropSpec;
use sim_core::growth::{days_to_first_harvest, GrowthModifiers};
use sim_core::machines::{
    MachineSlot, CASK_USES_PER_YEAR, DEHYDRATOR_DAYS, DEHYDRATOR_INPUT, KEG_DAYS,
    PRESERVES_JAR_DAYS,
};
use sim_core::plots::{Plot, PlotCalendar, DAYS_PER_YEAR};
use sim_core::results::{CropYearResult, YearSimulationResult};
use sim_core::CropId;
use std::collections::BTreeMap;
use tracing::debug;

/// Inputs to a year simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineInput {
    pub crops: Vec<CropSpec>,
    pub mods: GrowthModifiers,
    pub plots: Vec<Plot>,
    pub kegs: u32,
    pub casks: u32,
    pub preserves_jars: u32,
    pub dehydrators: u32,
    pub max_days: u32,
    pub start_day_of_year: u32,
    pub starting_fruit: BTreeMap<CropId, u32>,
    pub starting_base_wine: BTreeMap<CropId, u32>,
    /// When set, casks only age wine in years where every batch fills
    /// completely; otherwise capacity falls back to `casks_with_walkways`.
    pub cask_full_batch_required: bool,
    pub casks_with_walkways: Option<u32>,
    /// Exogenous fruit arriving per day (fruit trees, truffle-like streams).
    pub external_daily_fruit: BTreeMap<CropId, Vec<u32>>,
    pub external_priority: Vec<CropId>,
    /// Crop fed to machines first. Remaining crops follow in `crops` order.
    pub priority_crop: Option<CropId>,
}

impl Default for PipelineInput {
    fn default() -> Self {
        PipelineInput {
            crops: Vec::new(),
            mods: GrowthModifiers::default(),
            plots: Vec::new(),
            kegs: 0,
            casks: 0,
            preserves_jars: 0,
            dehydrators: 0,
            max_days: DAYS_PER_YEAR,
            start_day_of_year: 1,
            starting_fruit: BTreeMap::new(),
            starting_base_wine: BTreeMap::new(),
            cask_full_batch_required: false,
            casks_with_walkways: None,
            external_daily_fruit: BTreeMap::new(),
            external_priority: Vec::new(),
            priority_crop: None,
        }
    }
}

/// Convert a 0-based day index into a 1-based day-of-year, wrapping years.
/// A zero start day is treated as day 1.
pub fn day_of_year(start_day_of_year: u32, day_index: u32) -> u32 {
    (start_day_of_year.max(1) - 1 + day_index) % DAYS_PER_YEAR + 1
}

/// 0-based day indexes when cask batches are filled within the window.
pub fn cask_fill_days(max_days: u32) -> Vec<u32> {
    if max_days == 0 {
        return Vec::new();
    }
    if CASK_USES_PER_YEAR <= 1 {
        return vec![0];
    }
    let spacing = max_days / CASK_USES_PER_YEAR;
    if spacing == 0 {
        return vec![0];
    }
    (0..CASK_USES_PER_YEAR)
        .map(|i| i * spacing)
        .filter(|day| *day < max_days)
        .collect()
}

/// Machine feed order: the priority crop first when present, then the
/// remaining crops in declaration order, then any extra ids.
pub fn crop_priority(
    crops: &[CropSpec],
    extra_ids: &[CropId],
    priority_crop: Option<&CropId>,
) -> Vec<CropId> {
    let mut priority: Vec<CropId> = Vec::new();
    if let Some(first) = priority_crop {
        if crops.iter().any(|c| &c.crop_id == first) {
            priority.push(first.clone());
        }
    }
    for crop in crops {
        if !priority.contains(&crop.crop_id) {
            priority.push(crop.crop_id.clone());
        }
    }
    for extra in extra_ids {
        if !priority.contains(extra) {
            priority.push(extra.clone());
        }
    }
    priority
}

/// First crop in priority order with at least `minimum` inventory.
pub fn pick_crop_with_min(
    inventory: &BTreeMap<CropId, u32>,
    priority: &[CropId],
    minimum: u32,
) -> Option<CropId> {
    priority
        .iter()
        .find(|crop_id| inventory.get(crop_id).copied().unwrap_or(0) >= minimum)
        .cloned()
}

/// Take up to `capacity` items from the inventory in priority order.
pub fn allocate_from_inventory(
    inventory: &BTreeMap<CropId, u32>,
    capacity: u32,
    priority: &[CropId],
) -> (BTreeMap<CropId, u32>, BTreeMap<CropId, u32>) {
    let mut remaining = inventory.clone();
    let mut taken: BTreeMap<CropId, u32> =
        inventory.keys().map(|id| (id.clone(), 0)).collect();
    let mut capacity = capacity;
    for crop_id in priority {
        if capacity == 0 {
            break;
        }
        let available = remaining.get(crop_id).copied().unwrap_or(0);
        if available == 0 {
            continue;
        }
        let take = available.min(capacity);
        taken.insert(crop_id.clone(), take);
        remaining.insert(crop_id.clone(), available - take);
        capacity -= take;
    }
    (taken, remaining)
}

/// Replay batch cask fills against the daily wine series; returns
/// (aged, remaining, per-batch fill counts).
pub fn simulate_cask_batches(
    daily_base_wine: &BTreeMap<CropId, Vec<u32>>,
    starting_base_wine: &BTreeMap<CropId, u32>,
    casks: u32,
    batch_days: &[u32],
    priority: &[CropId],
    max_days: u32,
) -> (BTreeMap<CropId, u32>, BTreeMap<CropId, u32>, Vec<u32>) {
    let mut inventory: BTreeMap<CropId, u32> = daily_base_wine
        .keys()
        .map(|id| (id.clone(), starting_base_wine.get(id).copied().unwrap_or(0)))
        .collect();
    let mut aged: BTreeMap<CropId, u32> =
        daily_base_wine.keys().map(|id| (id.clone(), 0)).collect();
    let mut batch_fills = Vec::new();

    for day in 0..max_days {
        for (crop_id, daily) in daily_base_wine {
            if let Some(amount) = daily.get(day as usize) {
                *inventory.entry(crop_id.clone()).or_insert(0) += amount;
            }
        }
        if batch_days.contains(&day) && casks > 0 {
            let (taken, rest) = allocate_from_inventory(&inventory, casks, priority);
            batch_fills.push(taken.values().sum());
            for (crop_id, amount) in taken {
                *aged.entry(crop_id).or_insert(0) += amount;
            }
            inventory = rest;
        }
    }
    (aged, inventory, batch_fills)
}

struct TileGroup {
    tiles: u32,
    active_day: u32,
    seeded: bool,
}

/// Simulate a full window for multiple crops with shared machine capacity.
pub fn simulate_year(input: &PipelineInput) -> YearSimulationResult {
    let mut crop_ids: Vec<CropId> = input.crops.iter().map(|c| c.crop_id.clone()).collect();
    let extra_ids: Vec<CropId> = input
        .external_daily_fruit
        .keys()
        .filter(|id| !crop_ids.contains(id))
        .cloned()
        .collect();
    crop_ids.extend(extra_ids.iter().cloned());

    let mut extra_priority = input.external_priority.clone();
    for extra in &extra_ids {
        if !extra_priority.contains(extra) {
            extra_priority.push(extra.clone());
        }
    }
    let priority = crop_priority(&input.crops, &extra_priority, input.priority_crop.as_ref());
    let crop_by_id: BTreeMap<&CropId, &CropSpec> =
        input.crops.iter().map(|c| (&c.crop_id, c)).collect();
    let first_by_crop: BTreeMap<CropId, u32> = input
        .crops
        .iter()
        .map(|c| (c.crop_id.clone(), days_to_first_harvest(c, &input.mods)))
        .collect();

    let max_days = input.max_days;
    let zeros = || -> BTreeMap<CropId, u32> {
        crop_ids.iter().map(|id| (id.clone(), 0)).collect()
    };
    let mut fruit_inv: BTreeMap<CropId, u32> = crop_ids
        .iter()
        .map(|id| (id.clone(), input.starting_fruit.get(id).copied().unwrap_or(0)))
        .collect();
    let mut fruit_total = zeros();
    let mut base_wine_from_kegs = zeros();
    let mut jelly_total = zeros();
    let mut dried_total = zeros();
    let mut seed_units = zeros();
    let mut fertilizer_units = zeros();
    let mut daily_base_wine: BTreeMap<CropId, Vec<u32>> = crop_ids
        .iter()
        .map(|id| (id.clone(), vec![0; max_days as usize]))
        .collect();

    // Per-plot, per-crop growth state; regrow crops pay fertilizer up front,
    // once per tile per season the plot is active.
    let mut plot_states: Vec<(usize, BTreeMap<CropId, TileGroup>)> = Vec::new();
    for (plot_idx, plot) in input.plots.iter().enumerate() {
        let mut groups = BTreeMap::new();
        for crop in &input.crops {
            let tiles = plot.tiles_for_crop(&crop.crop_id);
            if tiles == 0 {
                continue;
            }
            groups.insert(
                crop.crop_id.clone(),
                TileGroup {
                    tiles,
                    active_day: 0,
                    seeded: false,
                },
            );
            if crop.regrow_days.is_some() && input.mods.fertilizer.is_applied() {
                let seasons_count = match &plot.calendar {
                    PlotCalendar::Always => 1,
                    PlotCalendar::Seasons { seasons } => seasons.len() as u32,
                };
                *fertilizer_units.entry(crop.crop_id.clone()).or_insert(0) +=
                    tiles * seasons_count;
            }
        }
        plot_states.push((plot_idx, groups));
    }

    let mut keg_slots = MachineSlot::idle_bank(input.kegs);
    let mut jar_slots = MachineSlot::idle_bank(input.preserves_jars);
    let mut dehydrator_slots = MachineSlot::idle_bank(input.dehydrators);

    for day in 0..max_days {
        for slot in &mut keg_slots {
            if let Some(crop_id) = slot.advance() {
                *base_wine_from_kegs.entry(crop_id.clone()).or_insert(0) += 1;
                if let Some(series) = daily_base_wine.get_mut(&crop_id) {
                    series[day as usize] += 1;
                }
            }
        }
        for slot in &mut jar_slots {
            if let Some(crop_id) = slot.advance() {
                *jelly_total.entry(crop_id).or_insert(0) += 1;
            }
        }
        for slot in &mut dehydrator_slots {
            if let Some(crop_id) = slot.advance() {
                *dried_total.entry(crop_id).or_insert(0) += 1;
            }
        }

        let today = day_of_year(input.start_day_of_year, day);
        for (plot_idx, groups) in &mut plot_states {
            let plot = &input.plots[*plot_idx];
            if !plot.calendar.is_active(today) {
                continue;
            }
            for (crop_id, group) in groups.iter_mut() {
                let Some(crop) = crop_by_id.get(crop_id) else {
                    continue;
                };
                let first = first_by_crop.get(crop_id).copied().unwrap_or(0);
                let active_day = group.active_day;
                match crop.regrow_days {
                    None => {
                        if first > 0 && active_day >= first && (active_day - first) % first == 0 {
                            *fruit_inv.entry(crop_id.clone()).or_insert(0) += group.tiles;
                            *fruit_total.entry(crop_id.clone()).or_insert(0) += group.tiles;
                            *seed_units.entry(crop_id.clone()).or_insert(0) += group.tiles;
                            if input.mods.fertilizer.is_applied() {
                                *fertilizer_units.entry(crop_id.clone()).or_insert(0) +=
                                    group.tiles;
                            }
                        }
                    }
                    Some(regrow) => {
                        if !group.seeded {
                            *seed_units.entry(crop_id.clone()).or_insert(0) += group.tiles;
                            group.seeded = true;
                        }
                        let harvest = active_day == first
                            || (regrow > 0
                                && active_day > first
                                && (active_day - first) % regrow == 0);
                        if harvest && first > 0 {
                            *fruit_inv.entry(crop_id.clone()).or_insert(0) += group.tiles;
                            *fruit_total.entry(crop_id.clone()).or_insert(0) += group.tiles;
                        }
                    }
                }
                group.active_day = active_day + 1;
            }
        }

        for (crop_id, daily) in &input.external_daily_fruit {
            let Some(amount) = daily.get(day as usize) else {
                continue;
            };
            if *amount == 0 {
                continue;
            }
            *fruit_inv.entry(crop_id.clone()).or_insert(0) += amount;
            *fruit_total.entry(crop_id.clone()).or_insert(0) += amount;
        }

        // Machines refill after harvesting; a slot that finished this
        // morning starts a new load the same day.
        for slot in &mut keg_slots {
            if !slot.is_idle() {
                continue;
            }
            let Some(crop_id) = pick_crop_with_min(&fruit_inv, &priority, 1) else {
                continue;
            };
            *fruit_inv.entry(crop_id.clone()).or_insert(1) -= 1;
            slot.start(crop_id, KEG_DAYS);
        }
        for slot in &mut jar_slots {
            if !slot.is_idle() {
                continue;
            }
            let Some(crop_id) = pick_crop_with_min(&fruit_inv, &priority, 1) else {
                continue;
            };
            *fruit_inv.entry(crop_id.clone()).or_insert(1) -= 1;
            slot.start(crop_id, PRESERVES_JAR_DAYS);
        }
        for slot in &mut dehydrator_slots {
            if !slot.is_idle() {
                continue;
            }
            let Some(crop_id) = pick_crop_with_min(&fruit_inv, &priority, DEHYDRATOR_INPUT)
            else {
                continue;
            };
            *fruit_inv.entry(crop_id.clone()).or_insert(DEHYDRATOR_INPUT) -= DEHYDRATOR_INPUT;
            slot.start(crop_id, DEHYDRATOR_DAYS);
        }
    }

    let count_loads = |slots: &[MachineSlot]| -> BTreeMap<CropId, u32> {
        let mut counts = zeros();
        for slot in slots {
            if slot.days_remaining > 0 {
                if let Some(crop_id) = &slot.contents {
                    *counts.entry(crop_id.clone()).or_insert(0) += 1;
                }
            }
        }
        counts
    };
    let wine_in_kegs_end = count_loads(&keg_slots);
    let jelly_in_jars_end = count_loads(&jar_slots);
    let dried_in_dehydrators_end = count_loads(&dehydrator_slots);

    let batch_days = cask_fill_days(max_days);
    let mut casks_effective = input.casks;
    let mut full_batch_met = true;

    let run_batches = |casks: u32| {
        simulate_cask_batches(
            &daily_base_wine,
            &input.starting_base_wine,
            casks,
            &batch_days,
            &priority,
            max_days,
        )
    };
    let (aged_wine, base_wine_sold) = if input.cask_full_batch_required && casks_effective > 0 {
        let (aged_full, sold_full, batch_fills) = run_batches(casks_effective);
        full_batch_met = batch_fills.iter().all(|fill| *fill == casks_effective);
        if full_batch_met {
            (aged_full, sold_full)
        } else {
            casks_effective = input.casks_with_walkways.unwrap_or(0).min(casks_effective);
            let (aged, sold, _) = run_batches(casks_effective);
            (aged, sold)
        }
    } else {
        let (aged, sold, _) = run_batches(casks_effective);
        (aged, sold)
    };

    let mut per_crop = BTreeMap::new();
    for crop_id in &crop_ids {
        let get = |map: &BTreeMap<CropId, u32>| map.get(crop_id).copied().unwrap_or(0);
        let fruit_unprocessed = get(&fruit_inv);
        per_crop.insert(
            crop_id.clone(),
            CropYearResult {
                crop_id: crop_id.clone(),
                fruit_harvested: get(&fruit_total),
                fruit_unprocessed,
                fruit_sold: fruit_unprocessed,
                base_wine_produced: get(&base_wine_from_kegs),
                base_wine_sold: get(&base_wine_sold),
                aged_wine_produced: get(&aged_wine),
                wine_in_kegs_end: get(&wine_in_kegs_end),
                seed_units_used: get(&seed_units),
                fertilizer_units_used: get(&fertilizer_units),
                jelly_produced: get(&jelly_total),
                dried_fruit_produced: get(&dried_total),
                jelly_in_jars_end: get(&jelly_in_jars_end),
                dried_fruit_in_dehydrators_end: get(&dried_in_dehydrators_end),
            },
        );
    }

    let total_fruit_unprocessed: u32 = fruit_inv.values().sum();
    let total_wine_in_kegs_end: u32 = wine_in_kegs_end.values().sum();
    let total_aged_wine: u32 = aged_wine.values().sum();
    let total_base_wine_sold: u32 = base_wine_sold.values().sum();
    let result = YearSimulationResult {
        per_crop,
        kegs_sufficient: total_fruit_unprocessed == 0 && total_wine_in_kegs_end == 0,
        cask_uses_per_cask: if casks_effective > 0 {
            f64::from(total_aged_wine) / f64::from(casks_effective)
        } else {
            0.0
        },
        casks_effective,
        full_cask_batch_met: full_batch_met,
        total_base_wine_sold,
        total_aged_wine,
        total_fruit_unprocessed,
        total_wine_in_kegs_end,
        total_jelly: jelly_total.values().sum(),
        total_dried_fruit: dried_total.values().sum(),
        total_jelly_in_jars_end: jelly_in_jars_end.values().sum(),
        total_dried_fruit_in_dehydrators_end: dried_in_dehydrators_end.values().sum(),
    };
    debug!(
        aged = result.total_aged_wine,
        base_sold = result.total_base_wine_sold,
        unprocessed = result.total_fruit_unprocessed,
        "year pipeline finished"
    );
    result
}

/// Single-crop convenience wrapper over [`simulate_year`].
pub fn simulate_single_crop(
    crop: &CropSpec,
    mods: GrowthModifiers,
    tiles: u32,
    kegs: u32,
    casks: u32,
    max_days: u32,
    start_day_of_year: u32,
    calendar: PlotCalendar,
) -> CropYearResult {
    let mut tiles_by_crop = BTreeMap::new();
    tiles_by_crop.insert(crop.crop_id.as_str().to_string(), tiles);
    let input = PipelineInput {
        crops: vec![crop.clone()],
        mods,
        plots: vec![Plot {
            name: "plot".to_string(),
            tiles_by_crop,
            calendar,
        }],
        kegs,
        casks,
        max_days,
        start_day_of_year,
        ..PipelineInput::default()
    };
    let mut result = simulate_year(&input);
    result.per_crop.remove(&crop.crop_id).unwrap_or_default()
}
