#![deny(warnings)]

//! Pricing and profit roll-ups for the farm production simulator.
//!
//! This crate turns production results into gold:
//! - Artisan-good prices from the game's formulas (wine 3x, jelly 2x+50,
//!   dried batches 7.5x+25), with Artisan and Tiller multipliers
//! - Per-crop and whole-farm profit summaries
//! - Animal product and honey revenue
//!
//! All prices are integer gold, truncated the way the game truncates.

use serde::{Deserialize, Serialize};
use sim_core::catalog::{CropCategory, CropDef};
use sim_core::config::EconomyConfig;
use sim_core::growth::Fertilizer;
use sim_core::results::{AnimalYearResult, BeeYearResult, CropYearResult};
use sim_core::CropId;
use std::collections::BTreeMap;

pub const EGG_PRICE: i64 = 50;
pub const LARGE_EGG_PRICE: i64 = 95;
pub const DUCK_EGG_PRICE: i64 = 95;
pub const VOID_EGG_PRICE: i64 = 65;
pub const MILK_PRICE: i64 = 125;
pub const LARGE_MILK_PRICE: i64 = 190;
pub const GOAT_MILK_PRICE: i64 = 225;
pub const LARGE_GOAT_MILK_PRICE: i64 = 345;
pub const WOOL_PRICE: i64 = 340;
pub const RABBIT_FOOT_PRICE: i64 = 565;

pub const MAYO_PRICE: i64 = 190;
pub const GOLD_MAYO_PRICE: i64 = 285;
pub const DUCK_MAYO_PRICE: i64 = 375;
pub const VOID_MAYO_PRICE: i64 = 275;
pub const CHEESE_PRICE: i64 = 230;
pub const GOLD_CHEESE_PRICE: i64 = 345;
pub const GOAT_CHEESE_PRICE: i64 = 400;
pub const GOLD_GOAT_CHEESE_PRICE: i64 = 600;
pub const CLOTH_PRICE: i64 = 470;

pub const TRUFFLE_PRICE: i64 = 625;
pub const TRUFFLE_IRIDIUM_PRICE: i64 = 1250;
pub const TRUFFLE_OIL_PRICE: i64 = 1065;

const ARTISAN_MULTIPLIER: f64 = 1.4;
const TILLER_MULTIPLIER: f64 = 1.1;
const RANCHER_MULTIPLIER: f64 = 1.2;

/// Sale prices for one crop in each processed form. `None` means the
/// machine does not accept this crop category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedPrices {
    pub raw: i64,
    pub keg: Option<i64>,
    pub jar: Option<i64>,
    pub dried_batch: Option<i64>,
}

/// Raw crop sale price with quality and Tiller applied.
pub fn raw_price(base_price: i64, economy: &EconomyConfig) -> i64 {
    let mut price = base_price as f64 * economy.fruit_quality_multiplier;
    if economy.tiller {
        price *= TILLER_MULTIPLIER;
    }
    price as i64
}

/// Keg output price: fruit wine at 3x, vegetable juice at 2.25x.
pub fn keg_price(crop: &CropDef, economy: &EconomyConfig) -> Option<i64> {
    let base = crop.base_price?;
    let mut price = match crop.category {
        CropCategory::Fruit => base as f64 * 3.0,
        CropCategory::Vegetable => base as f64 * 2.25,
        _ => return None,
    };
    price *= economy.wine_quality_multiplier;
    if economy.artisan {
        price *= ARTISAN_MULTIPLIER;
    }
    Some(price as i64)
}

/// Preserves jar output price: 2x base + 50.
pub fn jar_price(crop: &CropDef, economy: &EconomyConfig) -> Option<i64> {
    let base = crop.base_price?;
    if !matches!(crop.category, CropCategory::Fruit | CropCategory::Vegetable) {
        return None;
    }
    let mut price = (base * 2 + 50) as f64;
    if economy.artisan {
        price *= ARTISAN_MULTIPLIER;
    }
    Some(price as i64)
}

/// Dehydrator batch price (five fruit in): 7.5x base + 25, fruit only.
pub fn dried_batch_price(crop: &CropDef, economy: &EconomyConfig) -> Option<i64> {
    let base = crop.base_price?;
    if crop.category != CropCategory::Fruit {
        return None;
    }
    let mut price = base as f64 * 7.5 + 25.0;
    if economy.artisan {
        price *= ARTISAN_MULTIPLIER;
    }
    Some(price as i64)
}

pub fn processed_prices(crop: &CropDef, economy: &EconomyConfig) -> ProcessedPrices {
    let Some(base) = crop.base_price else {
        return ProcessedPrices {
            raw: 0,
            keg: None,
            jar: None,
            dried_batch: None,
        };
    };
    ProcessedPrices {
        raw: raw_price(base, economy),
        keg: keg_price(crop, economy),
        jar: jar_price(crop, economy),
        dried_batch: dried_batch_price(crop, economy),
    }
}

/// Per-crop profit lines for one simulated year.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub crop_id: CropId,
    pub base_wine_revenue: i64,
    pub aged_wine_revenue: i64,
    pub jelly_revenue: i64,
    pub dried_fruit_revenue: i64,
    pub fruit_revenue: i64,
    pub seed_cost: i64,
    pub fertilizer_cost: i64,
    pub net_profit: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub per_crop: BTreeMap<CropId, ProfitBreakdown>,
    pub total_revenue: i64,
    pub total_seed_cost: i64,
    pub total_fertilizer_cost: i64,
    pub total_profit: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalProfit {
    pub cheese_revenue: i64,
    pub mayo_revenue: i64,
    pub cloth_revenue: i64,
    pub truffle_oil_revenue: i64,
    pub raw_truffle_revenue: i64,
    pub raw_animal_revenue: i64,
    pub total_revenue: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoneyProfit {
    pub honey_revenue: i64,
    pub total_revenue: i64,
}

/// Wine price for a crop, falling back to three times its fruit price.
pub fn wine_price_for_crop(crop_id: &CropId, economy: &EconomyConfig) -> i64 {
    let fruit_price = economy.fruit_price.get(crop_id).copied().unwrap_or(0);
    match economy.wine_price.get(crop_id) {
        Some(price) => *price,
        None if fruit_price > 0 => fruit_price * 3,
        None => 0,
    }
}

/// Per-fruit revenue in each processed form, used by the planting heuristic
/// to blend a crop's expected value across machine capacity.
///
/// Dried value here is per fruit (batch price over five inputs), unlike
/// [`dried_batch_price`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerFruitValues {
    pub raw: i64,
    pub wine: i64,
    pub jelly: i64,
    pub dried: i64,
}

pub fn per_fruit_processing_values(
    fruit_price: i64,
    wine_price: i64,
    economy: &EconomyConfig,
) -> PerFruitValues {
    let mut fruit_unit = fruit_price as f64 * economy.fruit_quality_multiplier;
    if economy.tiller {
        fruit_unit *= TILLER_MULTIPLIER;
    }
    let mut wine_unit = wine_price as f64 * economy.wine_quality_multiplier;
    let mut jelly_unit = if fruit_price > 0 {
        (fruit_price * 2 + 50) as f64
    } else {
        0.0
    };
    let mut dried_unit = if fruit_price > 0 {
        fruit_price as f64 * 1.5 + 5.0
    } else {
        0.0
    };
    if economy.artisan {
        wine_unit *= ARTISAN_MULTIPLIER;
        jelly_unit *= ARTISAN_MULTIPLIER;
        dried_unit *= ARTISAN_MULTIPLIER;
    }
    PerFruitValues {
        raw: fruit_unit as i64,
        wine: wine_unit as i64,
        jelly: jelly_unit as i64,
        dried: dried_unit as i64,
    }
}

/// Profit totals from per-crop production results.
pub fn compute_profit(
    per_crop: &BTreeMap<CropId, CropYearResult>,
    economy: &EconomyConfig,
    fertilizer: Fertilizer,
) -> ProfitSummary {
    let mut summary = ProfitSummary::default();
    for (crop_id, result) in per_crop {
        let fruit_price = economy.fruit_price.get(crop_id).copied().unwrap_or(0);
        let wine_price = wine_price_for_crop(crop_id, economy);
        let mut wine_unit = wine_price as f64 * economy.wine_quality_multiplier;
        let mut fruit_unit = fruit_price as f64 * economy.fruit_quality_multiplier;
        let (mut jelly_unit, mut dried_unit) = if fruit_price > 0 {
            (
                (fruit_price * 2 + 50) as f64,
                (fruit_price as f64 * 7.5 + 25.0).trunc(),
            )
        } else {
            (0.0, 0.0)
        };
        if economy.artisan {
            wine_unit *= ARTISAN_MULTIPLIER;
            jelly_unit *= ARTISAN_MULTIPLIER;
            dried_unit *= ARTISAN_MULTIPLIER;
        }
        if economy.tiller {
            fruit_unit *= TILLER_MULTIPLIER;
        }
        let wine_unit = wine_unit as i64;
        let fruit_unit = fruit_unit as i64;
        let jelly_unit = jelly_unit as i64;
        let dried_unit = dried_unit as i64;

        let base_revenue = result.base_wine_sold as i64 * wine_unit;
        let aged_revenue = (result.aged_wine_produced as i64 * wine_unit) as f64
            * economy.aged_wine_multiplier;
        let aged_revenue = aged_revenue as i64;
        let fruit_revenue = result.fruit_sold as i64 * fruit_unit;
        let jelly_revenue = result.jelly_produced as i64 * jelly_unit;
        let dried_revenue = result.dried_fruit_produced as i64 * dried_unit;
        let seed_cost =
            result.seed_units_used as i64 * economy.seed_cost.get(crop_id).copied().unwrap_or(0);
        let fertilizer_cost = result.fertilizer_units_used as i64
            * economy.fertilizer_cost.get(&fertilizer).copied().unwrap_or(0);
        let net = base_revenue + aged_revenue + fruit_revenue + jelly_revenue + dried_revenue
            - seed_cost
            - fertilizer_cost;

        summary.per_crop.insert(
            crop_id.clone(),
            ProfitBreakdown {
                crop_id: crop_id.clone(),
                base_wine_revenue: base_revenue,
                aged_wine_revenue: aged_revenue,
                jelly_revenue,
                dried_fruit_revenue: dried_revenue,
                fruit_revenue,
                seed_cost,
                fertilizer_cost,
                net_profit: net,
            },
        );
        summary.total_revenue +=
            base_revenue + aged_revenue + fruit_revenue + jelly_revenue + dried_revenue;
        summary.total_seed_cost += seed_cost;
        summary.total_fertilizer_cost += fertilizer_cost;
    }
    summary.total_profit =
        summary.total_revenue - summary.total_seed_cost - summary.total_fertilizer_cost;
    summary
}

/// Revenue from animal products, accounting for Artisan, Rancher, and
/// Botanist (iridium truffles).
pub fn compute_animal_profit(
    result: &AnimalYearResult,
    economy: &EconomyConfig,
    botanist: bool,
    rancher: bool,
) -> AnimalProfit {
    let mut cheese_revenue = result.cheese as i64 * CHEESE_PRICE
        + result.gold_cheese as i64 * GOLD_CHEESE_PRICE
        + result.goat_cheese as i64 * GOAT_CHEESE_PRICE
        + result.gold_goat_cheese as i64 * GOLD_GOAT_CHEESE_PRICE;
    let mut mayo_revenue = result.mayo as i64 * MAYO_PRICE
        + result.gold_mayo as i64 * GOLD_MAYO_PRICE
        + result.duck_mayo as i64 * DUCK_MAYO_PRICE
        + result.void_mayo as i64 * VOID_MAYO_PRICE;
    let mut cloth_revenue = result.cloth as i64 * CLOTH_PRICE;
    let mut truffle_oil_revenue = result.truffle_oil as i64 * TRUFFLE_OIL_PRICE;
    let raw_truffle_unit = if botanist {
        TRUFFLE_IRIDIUM_PRICE
    } else {
        TRUFFLE_PRICE
    };
    let raw_truffle_revenue = result.raw_truffles as i64 * raw_truffle_unit;

    let leftover = |total: u32, used: u32| total.saturating_sub(used) as i64;
    let mut raw_animal_revenue = leftover(result.eggs, result.mayo) * EGG_PRICE
        + leftover(result.large_eggs, result.gold_mayo) * LARGE_EGG_PRICE
        + leftover(result.duck_eggs, result.duck_mayo) * DUCK_EGG_PRICE
        + leftover(result.void_eggs, result.void_mayo) * VOID_EGG_PRICE
        + leftover(result.milk, result.cheese) * MILK_PRICE
        + leftover(result.large_milk, result.gold_cheese) * LARGE_MILK_PRICE
        + leftover(result.goat_milk, result.goat_cheese) * GOAT_MILK_PRICE
        + leftover(result.large_goat_milk, result.gold_goat_cheese) * LARGE_GOAT_MILK_PRICE
        + leftover(result.wool, result.cloth) * WOOL_PRICE
        + result.rabbit_feet as i64 * RABBIT_FOOT_PRICE;

    if economy.artisan {
        cheese_revenue = (cheese_revenue as f64 * ARTISAN_MULTIPLIER) as i64;
        mayo_revenue = (mayo_revenue as f64 * ARTISAN_MULTIPLIER) as i64;
        cloth_revenue = (cloth_revenue as f64 * ARTISAN_MULTIPLIER) as i64;
        truffle_oil_revenue = (truffle_oil_revenue as f64 * ARTISAN_MULTIPLIER) as i64;
    }
    if rancher {
        raw_animal_revenue = (raw_animal_revenue as f64 * RANCHER_MULTIPLIER) as i64;
    }

    let total_revenue = cheese_revenue
        + mayo_revenue
        + cloth_revenue
        + truffle_oil_revenue
        + raw_truffle_revenue
        + raw_animal_revenue;
    AnimalProfit {
        cheese_revenue,
        mayo_revenue,
        cloth_revenue,
        truffle_oil_revenue,
        raw_truffle_revenue,
        raw_animal_revenue,
        total_revenue,
    }
}

/// Honey revenue: 100 + 2x flower base price per jar, per price bucket.
pub fn compute_honey_profit(
    result: &BeeYearResult,
    economy: &EconomyConfig,
    flower_base_price: i64,
) -> HoneyProfit {
    let unit = |flower_price: i64| -> i64 {
        let base = 100 + 2 * flower_price.max(0);
        if economy.artisan {
            (base as f64 * ARTISAN_MULTIPLIER) as i64
        } else {
            base
        }
    };
    let honey_revenue = if result.honey_by_flower_price.is_empty() {
        result.honey_total as i64 * unit(flower_base_price)
    } else {
        result
            .honey_by_flower_price
            .iter()
            .map(|(flower_price, count)| unit(*flower_price) * *count as i64)
            .sum()
    };
    HoneyProfit {
        honey_revenue,
        total_revenue: honey_revenue,
    }
}

/// Revenue totals grouped by category, for report breakdowns.
pub fn build_category_totals(
    crop_profit: &ProfitSummary,
    animal_profit: &AnimalProfit,
    honey_profit: &HoneyProfit,
) -> BTreeMap<String, i64> {
    let sum_over = |f: fn(&ProfitBreakdown) -> i64| -> i64 {
        crop_profit.per_crop.values().map(f).sum()
    };
    let mut totals = BTreeMap::new();
    totals.insert("cheese".to_string(), animal_profit.cheese_revenue);
    totals.insert("mayo".to_string(), animal_profit.mayo_revenue);
    totals.insert("cloth".to_string(), animal_profit.cloth_revenue);
    totals.insert("truffle_oil".to_string(), animal_profit.truffle_oil_revenue);
    totals.insert("raw_truffles".to_string(), animal_profit.raw_truffle_revenue);
    totals.insert(
        "raw_animal_products".to_string(),
        animal_profit.raw_animal_revenue,
    );
    totals.insert("aged_wine".to_string(), sum_over(|p| p.aged_wine_revenue));
    totals.insert("non_aged_wine".to_string(), sum_over(|p| p.base_wine_revenue));
    totals.insert("jarred_fruit".to_string(), sum_over(|p| p.jelly_revenue));
    totals.insert("honey".to_string(), honey_profit.honey_revenue);
    totals.insert("dehydrators".to_string(), sum_over(|p| p.dried_fruit_revenue));
    totals.insert("raw_fruit".to_string(), sum_over(|p| p.fruit_revenue));
    totals
}
