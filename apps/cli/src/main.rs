#![deny(warnings)]

//! Headless CLI: run a config-described farm through one year and report
//! production, revenue, and bottleneck tips.

use anyhow::{bail, Context, Result};
use sim_core::config::AppConfig;
use sim_core::plots::{Plot, PlotCalendar, ALL_CROPS};
use sim_core::validation::validate_app_config;
use sim_core::CropId;
use sim_econ::{
    build_category_totals, compute_animal_profit, compute_honey_profit, compute_profit,
    per_fruit_processing_values, wine_price_for_crop, PerFruitValues,
};
use sim_runtime::fruit_trees::build_daily_fruit;
use sim_runtime::{simulate_animals, simulate_bees, simulate_year, PipelineInput};
use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_args() -> Option<String> {
    let mut config: Option<String> = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = it.next(),
            other if config.is_none() && !other.starts_with('-') => {
                config = Some(other.to_string());
            }
            _ => {}
        }
    }
    config
}

/// Processed forms ranked by per-fruit value, best first.
fn ranked_uses(values: &PerFruitValues) -> Vec<(&'static str, i64)> {
    let mut uses = vec![
        ("wine", values.wine),
        ("jelly", values.jelly),
        ("dried", values.dried),
        ("raw", values.raw),
    ];
    uses.sort_by(|a, b| b.1.cmp(&a.1));
    uses
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(config_path) = parse_args() else {
        bail!("usage: cli path/to/config.json");
    };
    let cfg = AppConfig::from_json_file(&config_path)
        .with_context(|| format!("loading {config_path}"))?;
    validate_app_config(&cfg)?;
    info!(config = %config_path, "starting year simulation");

    let mods = cfg.growth;

    // The year pipeline always starts on Spring 1 so cask batch days line
    // up with the season boundaries.
    let start_day_of_year = 1;
    if cfg.simulation.resolved_start_day() != 1 {
        println!("note: start_day_of_year overridden to 1 (spring 1)");
    }

    let mut plots = cfg.plots.clone();
    if plots.is_empty() {
        let mut tiles_by_crop = BTreeMap::new();
        tiles_by_crop.insert(ALL_CROPS.to_string(), cfg.total_tiles());
        plots.push(Plot {
            name: "plot".to_string(),
            tiles_by_crop,
            calendar: PlotCalendar::Always,
        });
    }

    println!(
        "tiles={} kegs={} casks={} preserves_jars={} dehydrators={} oil_makers={} \
         mayo_machines={} cheese_presses={} looms={} fertilizer={:?} agriculturist={}",
        cfg.total_tiles(),
        cfg.kegs,
        cfg.casks,
        cfg.preserves_jars,
        cfg.dehydrators,
        cfg.oil_makers,
        cfg.mayo_machines,
        cfg.cheese_presses,
        cfg.looms,
        mods.fertilizer,
        mods.agriculturist,
    );
    println!(
        "year_days={} start_day_of_year={} (year-round assumed={})",
        cfg.simulation.max_days, start_day_of_year, cfg.simulation.assume_year_round
    );
    match &cfg.priority_crop {
        Some(crop) => println!("machine priority: {crop} first (two cask batch fills per year)\n"),
        None => println!("machine priority: config order (two cask batch fills per year)\n"),
    }

    if !cfg.starting_inventory.fruit.is_empty() || !cfg.starting_inventory.base_wine.is_empty() {
        let join = |items: &BTreeMap<CropId, u32>| -> String {
            let parts: Vec<String> =
                items.iter().map(|(k, v)| format!("{k}={v}")).collect();
            if parts.is_empty() {
                "none".to_string()
            } else {
                parts.join(", ")
            }
        };
        println!("starting fruit: {}", join(&cfg.starting_inventory.fruit));
        println!(
            "starting base wine: {}\n",
            join(&cfg.starting_inventory.base_wine)
        );
    }

    let fruit_tree_daily =
        build_daily_fruit(&cfg.fruit_trees, start_day_of_year, cfg.simulation.max_days);
    let tree_totals = cfg.fruit_trees.total_counts();
    let mut fruit_tree_priority: Vec<CropId> = tree_totals
        .keys()
        .map(|fruit_id| CropId::new(fruit_id.clone()))
        .collect();
    fruit_tree_priority.sort_by(|a, b| {
        wine_price_for_crop(b, &cfg.economy)
            .cmp(&wine_price_for_crop(a, &cfg.economy))
            .then_with(|| a.cmp(b))
    });

    let input = PipelineInput {
        crops: cfg.crop_specs(),
        mods,
        plots,
        kegs: cfg.kegs,
        casks: cfg.casks,
        preserves_jars: cfg.preserves_jars,
        dehydrators: cfg.dehydrators,
        max_days: cfg.simulation.max_days,
        start_day_of_year,
        starting_fruit: cfg.starting_inventory.fruit.clone(),
        starting_base_wine: cfg.starting_inventory.base_wine.clone(),
        cask_full_batch_required: cfg.economy.cask_full_batch_required,
        casks_with_walkways: cfg.economy.casks_with_walkways,
        external_daily_fruit: fruit_tree_daily,
        external_priority: fruit_tree_priority,
        priority_crop: cfg.priority_crop.clone(),
    };
    let result = simulate_year(&input);
    let crop_profit = compute_profit(&result.per_crop, &cfg.economy, mods.fertilizer);

    let animal_result = simulate_animals(
        &cfg.animals,
        cfg.simulation.max_days,
        cfg.oil_makers,
        cfg.mayo_machines,
        cfg.cheese_presses,
        cfg.looms,
        cfg.professions.foraging.gatherer,
        cfg.professions.farming.shepherd,
    );
    let animal_profit = compute_animal_profit(
        &animal_result,
        &cfg.economy,
        cfg.professions.foraging.botanist,
        cfg.professions.farming.rancher,
    );
    let honey_result = simulate_bees(&cfg.bees);
    let honey_profit =
        compute_honey_profit(&honey_result, &cfg.economy, cfg.bees.flower_base_price);

    let total_revenue =
        crop_profit.total_revenue + animal_profit.total_revenue + honey_profit.total_revenue;
    let total_profit =
        crop_profit.total_profit + animal_profit.total_revenue + honey_profit.total_revenue;

    for crop in &cfg.crops {
        let Some(r) = result.per_crop.get(&crop.id) else {
            continue;
        };
        let Some(p) = crop_profit.per_crop.get(&crop.id) else {
            continue;
        };
        println!("{}:", crop.id);
        println!("  fruit harvested (year): {}", r.fruit_harvested);
        println!("  base wine produced (year): {}", r.base_wine_produced);
        println!("  aged wine produced (year): {}", r.aged_wine_produced);
        println!("  base wine sold (year): {}", r.base_wine_sold);
        println!("  unprocessed fruit (year end): {}", r.fruit_unprocessed);
        println!("  wine in kegs (year end): {}", r.wine_in_kegs_end);
        println!("  jelly produced (year): {}", r.jelly_produced);
        println!("  dried fruit produced (year): {}", r.dried_fruit_produced);
        println!("  jelly in jars (year end): {}", r.jelly_in_jars_end);
        println!(
            "  dried fruit in dehydrators (year end): {}",
            r.dried_fruit_in_dehydrators_end
        );
        println!("  seed units used: {}", r.seed_units_used);
        println!("  fertilizer units used: {}", r.fertilizer_units_used);
        println!("  fruit revenue: {}", p.fruit_revenue);
        println!("  base wine revenue: {}", p.base_wine_revenue);
        println!("  aged wine revenue: {}", p.aged_wine_revenue);
        println!("  jelly revenue: {}", p.jelly_revenue);
        println!("  dried fruit revenue: {}", p.dried_fruit_revenue);
        println!("  seed cost: {}", p.seed_cost);
        println!("  fertilizer cost: {}", p.fertilizer_cost);
        println!("  net profit: {}\n", p.net_profit);
    }

    if !cfg.animals.coops.is_empty() || !cfg.animals.barns.is_empty() {
        println!("animals:");
        println!("  cheese revenue: {}", animal_profit.cheese_revenue);
        println!("  mayo revenue: {}", animal_profit.mayo_revenue);
        println!("  cloth revenue: {}", animal_profit.cloth_revenue);
        println!("  truffle oil revenue: {}", animal_profit.truffle_oil_revenue);
        println!("  raw truffles revenue: {}", animal_profit.raw_truffle_revenue);
        println!(
            "  raw animal products revenue: {}\n",
            animal_profit.raw_animal_revenue
        );
    }

    if cfg.bees.bee_houses > 0 {
        println!("bees:");
        println!("  honey revenue: {}\n", honey_profit.honey_revenue);
    }

    if !tree_totals.is_empty() {
        println!("fruit trees:");
        let scopes = [
            ("greenhouse", &cfg.fruit_trees.greenhouse),
            ("outdoors", &cfg.fruit_trees.outdoors),
            ("always", &cfg.fruit_trees.always),
        ];
        for (scope, counts) in scopes {
            if counts.is_empty() {
                continue;
            }
            let summary: Vec<String> =
                counts.iter().map(|(fruit, count)| format!("{fruit}={count}")).collect();
            println!("  {scope}: {}", summary.join(", "));
        }
        println!("  per-fruit best use (per fruit, using current prices):");
        for (fruit_id, count) in &tree_totals {
            let crop_id = CropId::new(fruit_id.clone());
            let fruit_price = cfg.economy.fruit_price.get(&crop_id).copied().unwrap_or(0);
            let wine_price = wine_price_for_crop(&crop_id, &cfg.economy);
            let values = per_fruit_processing_values(fruit_price, wine_price, &cfg.economy);
            let ranked = ranked_uses(&values);
            let (best, best_value) = ranked[0];
            let (next, next_value) = ranked[1];
            println!(
                "    {fruit_id} ({count} trees): best={best} ({best_value}), \
                 next={next} ({next_value}), raw={}",
                values.raw
            );
        }
        println!();
    }

    println!("kegs sufficient for full conversion: {}", result.kegs_sufficient);
    if cfg.economy.cask_full_batch_required {
        println!(
            "full cask batch met (need {} on each batch day): {}",
            cfg.casks, result.full_cask_batch_met
        );
        if !result.full_cask_batch_met && cfg.economy.casks_with_walkways.is_none() {
            println!("note: set economy.casks_with_walkways to model walkway losses");
        }
    }
    println!("casks used for aging: {}", result.casks_effective);
    println!("cask uses per cask (max 2.00): {:.2}", result.cask_uses_per_cask);
    println!("total base wine sold: {}", result.total_base_wine_sold);
    println!("total aged wine produced: {}", result.total_aged_wine);
    println!("total jelly produced: {}", result.total_jelly);
    println!("total dried fruit produced: {}", result.total_dried_fruit);
    println!(
        "total fruit unprocessed (year end): {}",
        result.total_fruit_unprocessed
    );
    println!("total wine in kegs (year end): {}", result.total_wine_in_kegs_end);
    println!(
        "total jelly in jars (year end): {}",
        result.total_jelly_in_jars_end
    );
    println!(
        "total dried fruit in dehydrators (year end): {}",
        result.total_dried_fruit_in_dehydrators_end
    );
    println!("total revenue (year): {total_revenue}");
    println!("total seed cost (year): {}", crop_profit.total_seed_cost);
    println!(
        "total fertilizer cost (year): {}",
        crop_profit.total_fertilizer_cost
    );
    println!("TOTAL PROFIT (year): {total_profit}");

    let categories = build_category_totals(&crop_profit, &animal_profit, &honey_profit);
    println!("\nrevenue by category:");
    for (category, revenue) in &categories {
        if *revenue != 0 {
            println!("  {category}: {revenue}");
        }
    }

    let mut tips: Vec<&str> = Vec::new();
    if !result.kegs_sufficient {
        tips.push("Kegs are a bottleneck (fruit or wine left unprocessed). Add kegs or reduce tiles.");
    }
    if result.cask_uses_per_cask < 2.0 {
        tips.push("Casks are underused. Stockpile base wine for Spring 1/Fall 1 or lower cask count.");
    }
    if result.total_jelly_in_jars_end > 0 {
        tips.push("Preserves jars are still running at year end. Add jars or reduce jar input.");
    }
    if result.total_dried_fruit_in_dehydrators_end > 0 {
        tips.push("Dehydrators are still running at year end. Add dehydrators or reduce dehydrator input.");
    }
    if animal_profit.raw_animal_revenue > 0 {
        tips.push("Raw animal products sold. Add mayo machines/cheese presses/looms to increase value.");
    }
    if animal_result.raw_truffles > 0 && cfg.oil_makers > 0 {
        tips.push("Truffles exceeded oil maker capacity. Add oil makers if you prefer truffle oil.");
    }
    if cfg.bees.bee_houses > 0
        && cfg.bees.flower_plan.is_empty()
        && cfg.bees.flower_base_price <= 0
    {
        tips.push("Bee houses set to wild honey. Plant flowers or set a flower_plan for higher honey value.");
    }
    if !tips.is_empty() {
        println!("\nquick wins:");
        for tip in tips {
            println!("  - {tip}");
        }
    }

    Ok(())
}
