//! Yearly honey output from bee houses.
//!
//! A bee house yields one honey every fourth in-season day. Honey value
//! tracks the nearest flower, so output is bucketed by the base price of
//! whichever planned flower has bloomed by each harvest day.

use sim_core::config::BeeConfig;
use sim_core::plots::DAYS_PER_SEASON;
use sim_core::results::BeeYearResult;

const HONEY_INTERVAL_DAYS: u32 = 4;

pub fn simulate_bees(config: &BeeConfig) -> BeeYearResult {
    simulate_bees_with_season_length(config, DAYS_PER_SEASON)
}

pub fn simulate_bees_with_season_length(
    config: &BeeConfig,
    days_per_season: u32,
) -> BeeYearResult {
    let mut result = BeeYearResult::default();
    if config.bee_houses == 0 || config.seasons.is_empty() || days_per_season == 0 {
        return result;
    }

    for season in &config.seasons {
        let plan = config.flower_plan.get(season);
        let mut day = HONEY_INTERVAL_DAYS;
        while day <= days_per_season {
            let flower_price = match plan {
                None => config.flower_base_price,
                Some(plan) => {
                    // A flower boosts honey starting the day after it blooms.
                    let fast_ready = plan.fast.growth_days + 1;
                    let expensive_ready = plan.expensive.growth_days + 1;
                    if day >= expensive_ready {
                        plan.expensive.base_price
                    } else if day >= fast_ready {
                        plan.fast.base_price
                    } else {
                        0
                    }
                }
            };
            *result.honey_by_flower_price.entry(flower_price).or_insert(0) +=
                config.bee_houses;
            day += HONEY_INTERVAL_DAYS;
        }
    }
    result.honey_total = result.honey_by_flower_price.values().sum();
    result
}
