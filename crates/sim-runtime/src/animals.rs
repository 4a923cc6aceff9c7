//! Yearly animal product totals, assuming animals are fed every day.
//!
//! Rates follow the in-game production schedules. Machines process one
//! item per machine per day, so yearly machine capacity is count times
//! days; product priority favors the most valuable inputs.

use sim_core::config::AnimalsConfig;
use sim_core::plots::DAYS_PER_YEAR;
use sim_core::results::AnimalYearResult;
use std::collections::BTreeMap;
use tracing::debug;

pub const DUCK_EGG_DAYS: u32 = 2;
pub const GOAT_MILK_DAYS: u32 = 2;
pub const RABBIT_WOOL_DAYS: u32 = 4;
pub const SHEEP_WOOL_DAYS: u32 = 3;

const NON_WINTER_DAYS_PER_YEAR: u32 = 84;

/// Split a total into (normal, large) counts using a floor-based rate.
fn split_with_rate(total: u32, rate: f64) -> (u32, u32) {
    let rate = rate.clamp(0.0, 1.0);
    let large = (f64::from(total) * rate) as u32;
    (total.saturating_sub(large), large)
}

/// Non-winter days in a span; pigs idle for the last season of each year.
fn non_winter_days(days: u32) -> u32 {
    let full_years = days / DAYS_PER_YEAR;
    let remainder = days % DAYS_PER_YEAR;
    full_years * NON_WINTER_DAYS_PER_YEAR + remainder.min(NON_WINTER_DAYS_PER_YEAR)
}

fn allocate_by_priority(
    inventory: &BTreeMap<&'static str, u32>,
    capacity: u32,
    priority: &[&'static str],
) -> BTreeMap<&'static str, u32> {
    let mut remaining = inventory.clone();
    let mut taken: BTreeMap<&'static str, u32> =
        inventory.keys().map(|key| (*key, 0)).collect();
    let mut capacity = capacity;
    for key in priority {
        if capacity == 0 {
            break;
        }
        let available = remaining.get(key).copied().unwrap_or(0);
        if available == 0 {
            continue;
        }
        let use_count = available.min(capacity);
        taken.insert(key, use_count);
        remaining.insert(key, available - use_count);
        capacity -= use_count;
    }
    taken
}

/// Simulate yearly animal product totals.
///
/// Chickens and cows produce daily; ducks and goats every 2 days; rabbits
/// every 4; sheep every 3 (daily with Shepherd). Pigs find one truffle per
/// non-winter day, with Gatherer adding an expected 20% on top.
#[allow(clippy::too_many_arguments)]
pub fn simulate_animals(
    config: &AnimalsConfig,
    days: u32,
    oil_makers: u32,
    mayo_machines: u32,
    cheese_presses: u32,
    looms: u32,
    gatherer: bool,
    shepherd: bool,
) -> AnimalYearResult {
    let total_chickens: u32 = config.coops.iter().map(|c| c.chickens).sum();
    let total_void_chickens: u32 = config.coops.iter().map(|c| c.void_chickens).sum();
    let total_ducks: u32 = config.coops.iter().map(|c| c.ducks).sum();
    let total_rabbits: u32 = config.coops.iter().map(|c| c.rabbits).sum();
    let total_cows: u32 = config.barns.iter().map(|b| b.cows).sum();
    let total_goats: u32 = config.barns.iter().map(|b| b.goats).sum();
    let total_pigs: u32 = config.barns.iter().map(|b| b.pigs).sum();
    let total_sheep: u32 = config.barns.iter().map(|b| b.sheep).sum();

    let (eggs, large_eggs) = split_with_rate(total_chickens * days, config.large_egg_rate);
    let void_eggs = total_void_chickens * days;
    let duck_eggs = total_ducks * (days / DUCK_EGG_DAYS);

    let (milk, large_milk) = split_with_rate(total_cows * days, config.large_milk_rate);
    let (goat_milk, large_goat_milk) = split_with_rate(
        total_goats * (days / GOAT_MILK_DAYS),
        config.large_goat_milk_rate,
    );

    let rabbit_products = total_rabbits * (days / RABBIT_WOOL_DAYS);
    let rabbit_feet =
        (f64::from(rabbit_products) * config.rabbit_foot_rate.clamp(0.0, 1.0)) as u32;
    let rabbit_wool = rabbit_products.saturating_sub(rabbit_feet);

    let sheep_interval = if shepherd { 1 } else { SHEEP_WOOL_DAYS };
    let sheep_wool = total_sheep * (days / sheep_interval);
    let wool = rabbit_wool + sheep_wool;

    let mut truffles = total_pigs * non_winter_days(days);
    if gatherer && truffles > 0 {
        truffles += (f64::from(truffles) * 0.2) as u32;
    }
    let truffle_oil = truffles.min(oil_makers * days);
    let raw_truffles = truffles - truffle_oil;

    let egg_inventory: BTreeMap<&'static str, u32> = BTreeMap::from([
        ("duck_eggs", duck_eggs),
        ("void_eggs", void_eggs),
        ("large_eggs", large_eggs),
        ("eggs", eggs),
    ]);
    let eggs_used = allocate_by_priority(
        &egg_inventory,
        mayo_machines * days,
        &["duck_eggs", "void_eggs", "large_eggs", "eggs"],
    );

    let milk_inventory: BTreeMap<&'static str, u32> = BTreeMap::from([
        ("large_goat_milk", large_goat_milk),
        ("goat_milk", goat_milk),
        ("large_milk", large_milk),
        ("milk", milk),
    ]);
    let milk_used = allocate_by_priority(
        &milk_inventory,
        cheese_presses * days,
        &["large_goat_milk", "goat_milk", "large_milk", "milk"],
    );

    let cloth = wool.min(looms * days);

    debug!(truffles, wool, eggs, milk, "animal year simulated");
    AnimalYearResult {
        eggs,
        large_eggs,
        void_eggs,
        duck_eggs,
        milk,
        large_milk,
        goat_milk,
        large_goat_milk,
        wool,
        rabbit_feet,
        mayo: eggs_used["eggs"],
        gold_mayo: eggs_used["large_eggs"],
        void_mayo: eggs_used["void_eggs"],
        duck_mayo: eggs_used["duck_eggs"],
        cheese: milk_used["milk"],
        gold_cheese: milk_used["large_milk"],
        goat_cheese: milk_used["goat_milk"],
        gold_goat_cheese: milk_used["large_goat_milk"],
        cloth,
        truffles,
        truffle_oil,
        raw_truffles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::config::{BarnConfig, CoopConfig};

    fn coop(chickens: u32, ducks: u32, rabbits: u32, void_chickens: u32) -> CoopConfig {
        CoopConfig {
            name: "coop".to_string(),
            chickens,
            ducks,
            rabbits,
            void_chickens,
        }
    }

    fn barn(cows: u32, goats: u32, pigs: u32, sheep: u32) -> BarnConfig {
        BarnConfig {
            name: "barn".to_string(),
            cows,
            goats,
            pigs,
            sheep,
        }
    }

    #[test]
    fn pigs_skip_winter() {
        assert_eq!(non_winter_days(112), 84);
        assert_eq!(non_winter_days(84), 84);
        assert_eq!(non_winter_days(90), 84);
        assert_eq!(non_winter_days(224), 168);
        assert_eq!(non_winter_days(0), 0);

        let config = AnimalsConfig {
            barns: vec![barn(0, 0, 2, 0)],
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 0, 0, false, false);
        assert_eq!(result.truffles, 168);
        assert_eq!(result.raw_truffles, 168);
        assert_eq!(result.truffle_oil, 0);
    }

    #[test]
    fn gatherer_adds_twenty_percent_truffles() {
        let config = AnimalsConfig {
            barns: vec![barn(0, 0, 1, 0)],
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 0, 0, true, false);
        assert_eq!(result.truffles, 100); // 84 + floor(84 * 0.2)
    }

    #[test]
    fn oil_makers_cap_at_one_truffle_per_day() {
        let config = AnimalsConfig {
            barns: vec![barn(0, 0, 4, 0)],
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 1, 0, 0, 0, false, false);
        assert_eq!(result.truffle_oil, 112);
        assert_eq!(result.raw_truffles, 4 * 84 - 112);
    }

    #[test]
    fn production_intervals_per_species() {
        let config = AnimalsConfig {
            coops: vec![coop(1, 1, 1, 1)],
            barns: vec![barn(1, 1, 0, 1)],
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 0, 0, false, false);
        assert_eq!(result.eggs, 112);
        assert_eq!(result.void_eggs, 112);
        assert_eq!(result.duck_eggs, 56);
        assert_eq!(result.milk, 112);
        assert_eq!(result.goat_milk, 56);
        // 28 rabbit wool + 37 sheep wool
        assert_eq!(result.wool, 28 + 37);
    }

    #[test]
    fn shepherd_makes_sheep_daily() {
        let config = AnimalsConfig {
            barns: vec![barn(0, 0, 0, 1)],
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 0, 0, false, true);
        assert_eq!(result.wool, 112);
    }

    #[test]
    fn large_rates_split_with_floor() {
        let config = AnimalsConfig {
            coops: vec![coop(1, 0, 0, 0)],
            large_egg_rate: 0.25,
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 0, 0, false, false);
        assert_eq!(result.large_eggs, 28);
        assert_eq!(result.eggs, 84);
    }

    #[test]
    fn mayo_machines_prefer_duck_and_void_eggs() {
        let config = AnimalsConfig {
            coops: vec![coop(4, 1, 0, 1)],
            ..AnimalsConfig::default()
        };
        // 1 machine, 112 days: 56 duck + 56 void, leaving regular eggs raw.
        let result = simulate_animals(&config, 112, 0, 1, 0, 0, false, false);
        assert_eq!(result.duck_mayo, 56);
        assert_eq!(result.void_mayo, 56);
        assert_eq!(result.mayo, 0);
        assert_eq!(result.gold_mayo, 0);
    }

    #[test]
    fn cheese_presses_prefer_goat_milk() {
        let config = AnimalsConfig {
            barns: vec![barn(2, 2, 0, 0)],
            large_goat_milk_rate: 0.5,
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 1, 0, false, false);
        // 112 goat milk products split 56/56; press takes large goat first.
        assert_eq!(result.gold_goat_cheese, 56);
        assert_eq!(result.goat_cheese, 56);
        assert_eq!(result.cheese, 0);
    }

    #[test]
    fn looms_cap_cloth() {
        let config = AnimalsConfig {
            barns: vec![barn(0, 0, 0, 6)],
            ..AnimalsConfig::default()
        };
        let result = simulate_animals(&config, 112, 0, 0, 0, 1, false, false);
        assert_eq!(result.wool, 6 * 37);
        assert_eq!(result.cloth, 112);
    }
}
