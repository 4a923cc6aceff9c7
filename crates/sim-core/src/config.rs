//! Application configuration: crops, plots, machines, professions, economy.
//!
//! Everything deserializes from a single JSON document with serde defaults,
//! so a minimal config only needs crops, tiles, and machine counts.

use crate::crops::CropSpec;
use crate::growth::{Fertilizer, GrowthModifiers};
use crate::plots::{day_of_year_from_season_day, Plot, Season};
use crate::CropId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Config load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Level-5 and level-10 farming professions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmingProfessions {
    #[serde(default)]
    pub rancher: bool,
    #[serde(default)]
    pub tiller: bool,
    #[serde(default)]
    pub coopmaster: bool,
    #[serde(default)]
    pub shepherd: bool,
    #[serde(default)]
    pub artisan: bool,
    #[serde(default)]
    pub agriculturist: bool,
}

/// Foraging professions; only `gatherer` feeds a formula here (truffles).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForagingProfessions {
    #[serde(default)]
    pub forester: bool,
    #[serde(default)]
    pub gatherer: bool,
    #[serde(default)]
    pub lumberjack: bool,
    #[serde(default)]
    pub tapper: bool,
    #[serde(default)]
    pub botanist: bool,
    #[serde(default)]
    pub tracker: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionsConfig {
    #[serde(default)]
    pub farming: FarmingProfessions,
    #[serde(default)]
    pub foraging: ForagingProfessions,
}

/// Alternate start expressed as a season/day pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarStart {
    pub current_season: Season,
    pub day: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    #[serde(default = "yes")]
    pub assume_year_round: bool,
    #[serde(default)]
    pub start_day_of_year: Option<u32>,
    #[serde(default)]
    pub calendar: Option<CalendarStart>,
}

impl SimulationConfig {
    /// Resolve the 1-based start day, preferring the explicit field over the
    /// season/day pair, defaulting to Spring 1.
    pub fn resolved_start_day(&self) -> u32 {
        if let Some(day) = self.start_day_of_year {
            return day.max(1);
        }
        if let Some(cal) = &self.calendar {
            if let Some(day) = day_of_year_from_season_day(cal.current_season, cal.day) {
                return day;
            }
        }
        1
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_days: default_max_days(),
            assume_year_round: true,
            start_day_of_year: None,
            calendar: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default)]
    pub wine_price: BTreeMap<CropId, i64>,
    #[serde(default)]
    pub fruit_price: BTreeMap<CropId, i64>,
    #[serde(default)]
    pub seed_cost: BTreeMap<CropId, i64>,
    #[serde(default)]
    pub fertilizer_cost: BTreeMap<Fertilizer, i64>,
    #[serde(default = "default_aged_wine_multiplier")]
    pub aged_wine_multiplier: f64,
    #[serde(default = "default_quality_multiplier")]
    pub wine_quality_multiplier: f64,
    #[serde(default = "default_quality_multiplier")]
    pub fruit_quality_multiplier: f64,
    #[serde(default)]
    pub artisan: bool,
    #[serde(default)]
    pub tiller: bool,
    #[serde(default)]
    pub cask_full_batch_required: bool,
    #[serde(default)]
    pub casks_with_walkways: Option<u32>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            wine_price: BTreeMap::new(),
            fruit_price: BTreeMap::new(),
            seed_cost: BTreeMap::new(),
            fertilizer_cost: BTreeMap::new(),
            aged_wine_multiplier: default_aged_wine_multiplier(),
            wine_quality_multiplier: default_quality_multiplier(),
            fruit_quality_multiplier: default_quality_multiplier(),
            artisan: false,
            tiller: false,
            cask_full_batch_required: false,
            casks_with_walkways: None,
        }
    }
}

/// Inventories on hand at the start of the window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingInventory {
    #[serde(default)]
    pub fruit: BTreeMap<CropId, u32>,
    #[serde(default)]
    pub base_wine: BTreeMap<CropId, u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoopConfig {
    #[serde(default = "default_coop_name")]
    pub name: String,
    #[serde(default)]
    pub chickens: u32,
    #[serde(default)]
    pub ducks: u32,
    #[serde(default)]
    pub rabbits: u32,
    #[serde(default)]
    pub void_chickens: u32,
}

impl CoopConfig {
    pub fn total_animals(&self) -> u32 {
        self.chickens + self.ducks + self.rabbits + self.void_chickens
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarnConfig {
    #[serde(default = "default_barn_name")]
    pub name: String,
    #[serde(default)]
    pub cows: u32,
    #[serde(default)]
    pub goats: u32,
    #[serde(default)]
    pub pigs: u32,
    #[serde(default)]
    pub sheep: u32,
}

impl BarnConfig {
    pub fn total_animals(&self) -> u32 {
        self.cows + self.goats + self.pigs + self.sheep
    }
}

/// Animal buildings and large-product rates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalsConfig {
    #[serde(default)]
    pub coops: Vec<CoopConfig>,
    #[serde(default)]
    pub barns: Vec<BarnConfig>,
    #[serde(default)]
    pub large_egg_rate: f64,
    #[serde(default)]
    pub large_milk_rate: f64,
    #[serde(default)]
    pub large_goat_milk_rate: f64,
    #[serde(default)]
    pub rabbit_foot_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowerSpec {
    pub name: String,
    pub growth_days: u32,
    pub base_price: i64,
}

/// The two flowers planted for bees each season: one that blooms early and
/// one worth more once it does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowerPlan {
    pub fast: FlowerSpec,
    pub expensive: FlowerSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeConfig {
    #[serde(default)]
    pub bee_houses: u32,
    #[serde(default)]
    pub flower_base_price: i64,
    #[serde(default = "default_bee_seasons")]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub flower_plan: BTreeMap<Season, FlowerPlan>,
}

impl Default for BeeConfig {
    fn default() -> Self {
        BeeConfig {
            bee_houses: 0,
            flower_base_price: 0,
            seasons: default_bee_seasons(),
            flower_plan: BTreeMap::new(),
        }
    }
}

/// Fruit tree counts by fruit id, split by where the trees stand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitTreesConfig {
    #[serde(default)]
    pub greenhouse: BTreeMap<String, u32>,
    #[serde(default)]
    pub outdoors: BTreeMap<String, u32>,
    #[serde(default)]
    pub always: BTreeMap<String, u32>,
}

impl FruitTreesConfig {
    /// Total tree counts per fruit across all scopes.
    pub fn total_counts(&self) -> BTreeMap<String, u32> {
        let mut totals: BTreeMap<String, u32> = BTreeMap::new();
        for scope in [&self.greenhouse, &self.outdoors, &self.always] {
            for (fruit_id, count) in scope {
                if *count > 0 {
                    *totals.entry(fruit_id.clone()).or_insert(0) += count;
                }
            }
        }
        totals
    }
}

/// One crop entry in the config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropConfig {
    pub id: CropId,
    pub phase_days: Vec<u32>,
    #[serde(default)]
    pub regrow_days: Option<u32>,
    /// Seasons the crop can grow outdoors; `None` means no season check.
    #[serde(default)]
    pub seasons: Option<Vec<Season>>,
}

impl CropConfig {
    pub fn to_spec(&self) -> CropSpec {
        CropSpec::new(self.id.clone(), self.phase_days.clone(), self.regrow_days)
    }
}

/// Top-level configuration for a config-driven run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub crops: Vec<CropConfig>,
    /// Crop fed to machines first; remaining crops follow in config order.
    #[serde(default)]
    pub priority_crop: Option<CropId>,
    #[serde(default)]
    pub plots: Vec<Plot>,
    /// Total tiles; defaults to the sum over plots.
    #[serde(default)]
    pub tiles: Option<u32>,
    pub kegs: u32,
    pub casks: u32,
    #[serde(default)]
    pub preserves_jars: u32,
    #[serde(default)]
    pub dehydrators: u32,
    #[serde(default)]
    pub oil_makers: u32,
    #[serde(default)]
    pub mayo_machines: u32,
    #[serde(default)]
    pub cheese_presses: u32,
    #[serde(default)]
    pub looms: u32,
    #[serde(default)]
    pub animals: AnimalsConfig,
    #[serde(default)]
    pub bees: BeeConfig,
    #[serde(default)]
    pub fruit_trees: FruitTreesConfig,
    #[serde(default)]
    pub professions: ProfessionsConfig,
    #[serde(default)]
    pub growth: GrowthModifiers,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub starting_inventory: StartingInventory,
}

impl AppConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        AppConfig::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<AppConfig, ConfigError> {
        let mut cfg: AppConfig = serde_json::from_str(raw)?;
        cfg.apply_profession_shorthands();
        Ok(cfg)
    }

    /// Professions drive growth and pricing flags; the nested sections are
    /// kept in sync so callers can read either.
    fn apply_profession_shorthands(&mut self) {
        if self.professions.farming.agriculturist {
            self.growth.agriculturist = true;
        }
        if self.professions.farming.artisan {
            self.economy.artisan = true;
        }
        if self.professions.farming.tiller {
            self.economy.tiller = true;
        }
    }

    /// Total tiles: the explicit count, or the sum across plots.
    pub fn total_tiles(&self) -> u32 {
        self.tiles
            .unwrap_or_else(|| self.plots.iter().map(Plot::tiles_total).sum())
    }

    pub fn crop_specs(&self) -> Vec<CropSpec> {
        self.crops.iter().map(CropConfig::to_spec).collect()
    }

    pub fn find_crop(&self, id: &CropId) -> Option<&CropConfig> {
        self.crops.iter().find(|c| &c.id == id)
    }
}

fn default_max_days() -> u32 {
    112
}

fn default_aged_wine_multiplier() -> f64 {
    2.0
}

fn default_quality_multiplier() -> f64 {
    1.0
}

fn default_bee_seasons() -> Vec<Season> {
    vec![Season::Spring, Season::Summer, Season::Fall]
}

fn default_coop_name() -> String {
    "coop".to_string()
}

fn default_barn_name() -> String {
    "barn".to_string()
}

fn yes() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "crops": [
            {"id": "starfruit", "phase_days": [2, 3, 2, 3, 3], "seasons": ["summer"]},
            {"id": "ancient", "phase_days": [2, 7, 7, 7, 5], "regrow_days": 7,
             "seasons": ["spring", "summer", "fall"]}
        ],
        "kegs": 10,
        "casks": 33,
        "plots": [
            {"name": "greenhouse", "tiles_by_crop": {"all": 116},
             "calendar": {"type": "always"}}
        ]
    }"#;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = AppConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(cfg.crops.len(), 2);
        assert_eq!(cfg.kegs, 10);
        assert_eq!(cfg.preserves_jars, 0);
        assert_eq!(cfg.total_tiles(), 116);
        assert_eq!(cfg.simulation.max_days, 112);
        assert_eq!(cfg.simulation.resolved_start_day(), 1);
        assert_eq!(cfg.economy.aged_wine_multiplier, 2.0);
        assert!(!cfg.growth.fertilizer.is_applied());
        assert_eq!(cfg.priority_crop, None);
    }

    #[test]
    fn explicit_tiles_win_over_plot_sum() {
        let raw = MINIMAL.replacen("\"kegs\"", "\"tiles\": 200, \"kegs\"", 1);
        let cfg = AppConfig::from_json_str(&raw).unwrap();
        assert_eq!(cfg.total_tiles(), 200);
    }

    #[test]
    fn profession_flags_propagate_to_growth_and_economy() {
        let raw = r#"{
            "crops": [{"id": "starfruit", "phase_days": [2, 3, 2, 3, 3]}],
            "kegs": 1,
            "casks": 0,
            "tiles": 1,
            "professions": {"farming": {"agriculturist": true, "artisan": true, "tiller": true}}
        }"#;
        let cfg = AppConfig::from_json_str(raw).unwrap();
        assert!(cfg.growth.agriculturist);
        assert!(cfg.economy.artisan);
        assert!(cfg.economy.tiller);
    }

    #[test]
    fn calendar_start_resolves_to_day_of_year() {
        let sim = SimulationConfig {
            calendar: Some(CalendarStart {
                current_season: Season::Fall,
                day: 3,
            }),
            ..SimulationConfig::default()
        };
        assert_eq!(sim.resolved_start_day(), 59);
        let explicit = SimulationConfig {
            start_day_of_year: Some(30),
            ..sim
        };
        assert_eq!(explicit.resolved_start_day(), 30);
    }

    #[test]
    fn fruit_tree_totals_merge_scopes() {
        let mut trees = FruitTreesConfig::default();
        trees.greenhouse.insert("banana".to_string(), 2);
        trees.outdoors.insert("banana".to_string(), 3);
        trees.always.insert("peach".to_string(), 1);
        let totals = trees.total_counts();
        assert_eq!(totals.get("banana"), Some(&5));
        assert_eq!(totals.get("peach"), Some(&1));
    }
}
