//! Daily fruit from mature fruit trees.
//!
//! Greenhouse and island trees fruit every day; outdoor trees only during
//! their fruit's season. The output feeds the pipeline as an exogenous
//! daily fruit stream.

use sim_core::config::FruitTreesConfig;
use sim_core::plots::{season_for_day_of_year, Season, DAYS_PER_YEAR};
use sim_core::CropId;
use std::collections::BTreeMap;

/// Season each outdoor fruit tree bears fruit in.
pub fn fruit_tree_season(fruit_id: &str) -> Option<Season> {
    match fruit_id {
        "apricot" | "cherry" => Some(Season::Spring),
        "orange" | "peach" | "banana" | "mango" => Some(Season::Summer),
        "apple" | "pomegranate" => Some(Season::Fall),
        _ => None,
    }
}

/// Canonical fruit id for a raw tree name, if recognized.
pub fn normalize_fruit_tree_name(raw: &str) -> Option<&'static str> {
    let key: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect();
    match key.as_str() {
        "apple" => Some("apple"),
        "apricot" => Some("apricot"),
        "cherry" => Some("cherry"),
        "orange" => Some("orange"),
        "peach" => Some("peach"),
        "pomegranate" => Some("pomegranate"),
        "banana" => Some("banana"),
        "mango" => Some("mango"),
        _ => None,
    }
}

/// Fruit id for a game tree item id, if it is a fruit tree.
pub fn fruit_for_tree_item_id(item_id: &str) -> Option<&'static str> {
    match item_id {
        "628" => Some("cherry"),
        "629" => Some("apricot"),
        "630" => Some("orange"),
        "631" => Some("peach"),
        "632" => Some("pomegranate"),
        "633" => Some("apple"),
        "69" => Some("banana"),
        "835" => Some("mango"),
        _ => None,
    }
}

/// Daily fruit totals per fruit over the simulation window.
pub fn build_daily_fruit(
    config: &FruitTreesConfig,
    start_day_of_year: u32,
    max_days: u32,
) -> BTreeMap<CropId, Vec<u32>> {
    let start_day_of_year = start_day_of_year.max(1);
    let totals = config.total_counts();
    if totals.is_empty() || max_days == 0 {
        return BTreeMap::new();
    }

    let mut always_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for scope in [&config.greenhouse, &config.always] {
        for (fruit_id, count) in scope {
            if *count > 0 {
                *always_counts.entry(fruit_id.as_str()).or_insert(0) += count;
            }
        }
    }

    let mut daily: BTreeMap<CropId, Vec<u32>> = totals
        .keys()
        .map(|fruit_id| (CropId::new(fruit_id.clone()), vec![0; max_days as usize]))
        .collect();

    for day_index in 0..max_days {
        let day_of_year = (start_day_of_year - 1 + day_index) % DAYS_PER_YEAR + 1;
        let season = season_for_day_of_year(day_of_year);
        for (fruit_id, count) in &always_counts {
            if let Some(series) = daily.get_mut(&CropId::from(*fruit_id)) {
                series[day_index as usize] += count;
            }
        }
        for (fruit_id, count) in &config.outdoors {
            if *count == 0 {
                continue;
            }
            if fruit_tree_season(fruit_id) != Some(season) {
                continue;
            }
            if let Some(series) = daily.get_mut(&CropId::from(fruit_id.as_str())) {
                series[day_index as usize] += count;
            }
        }
    }
    daily
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_names_normalize_to_canonical_ids() {
        assert_eq!(normalize_fruit_tree_name("Apple"), Some("apple"));
        assert_eq!(normalize_fruit_tree_name("fairy rose"), None);
        assert_eq!(normalize_fruit_tree_name("pome-granate"), Some("pomegranate"));
        assert_eq!(fruit_for_tree_item_id("633"), Some("apple"));
        assert_eq!(fruit_for_tree_item_id("999"), None);
    }

    #[test]
    fn greenhouse_trees_fruit_every_day() {
        let mut config = FruitTreesConfig::default();
        config.greenhouse.insert("banana".to_string(), 2);
        let daily = build_daily_fruit(&config, 1, 5);
        assert_eq!(daily[&CropId::from("banana")], vec![2; 5]);
    }

    #[test]
    fn outdoor_trees_only_fruit_in_season() {
        let mut config = FruitTreesConfig::default();
        config.outdoors.insert("apple".to_string(), 3);
        // Fall starts on day 57.
        let daily = build_daily_fruit(&config, 55, 4);
        assert_eq!(daily[&CropId::from("apple")], vec![0, 0, 3, 3]);
    }

    #[test]
    fn scopes_stack_for_the_same_fruit() {
        let mut config = FruitTreesConfig::default();
        config.greenhouse.insert("peach".to_string(), 1);
        config.outdoors.insert("peach".to_string(), 2);
        // Summer starts on day 29.
        let daily = build_daily_fruit(&config, 28, 3);
        assert_eq!(daily[&CropId::from("peach")], vec![1, 3, 3]);
    }

    #[test]
    fn window_wraps_across_the_year_boundary() {
        let mut config = FruitTreesConfig::default();
        config.outdoors.insert("cherry".to_string(), 1);
        // Day 112 is winter; day 113 wraps to spring 1.
        let daily = build_daily_fruit(&config, 112, 3);
        assert_eq!(daily[&CropId::from("cherry")], vec![0, 1, 1]);
    }

    #[test]
    fn empty_config_produces_nothing() {
        assert!(build_daily_fruit(&FruitTreesConfig::default(), 1, 112).is_empty());
    }
}
