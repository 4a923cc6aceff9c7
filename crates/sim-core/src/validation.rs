//! Configuration invariants checked before any simulation runs.

use crate::config::AppConfig;
use crate::plots::{PlotCalendar, ALL_CROPS};
use thiserror::Error;

const COOP_CAPACITY: u32 = 12;
const BARN_CAPACITY: u32 = 12;

/// Validation errors for configuration invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("crop '{0}' is defined more than once")]
    DuplicateCrop(String),
    #[error("crop '{0}' has no growth phases")]
    CropWithoutPhases(String),
    #[error("coop '{name}' has {count} animals, exceeds capacity {capacity}")]
    CoopOverCapacity {
        name: String,
        count: u32,
        capacity: u32,
    },
    #[error("barn '{name}' has {count} animals, exceeds capacity {capacity}")]
    BarnOverCapacity {
        name: String,
        count: u32,
        capacity: u32,
    },
    #[error("plot '{0}' uses a seasons calendar with no seasons")]
    EmptySeasonCalendar(String),
    #[error("plot '{plot}' allocates tiles to unknown crop '{crop}'")]
    UnknownPlotCrop { plot: String, crop: String },
    #[error("plot '{plot}' seasons are not growable for crop '{crop}'")]
    PlotSeasonMismatch { plot: String, crop: String },
    #[error("{name} must be between 0 and 1 (got {value})")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be > 0 (got {value})")]
    MultiplierNotPositive { name: &'static str, value: f64 },
    #[error("casks_with_walkways ({walkways}) cannot exceed casks ({casks})")]
    WalkwaysExceedCasks { walkways: u32, casks: u32 },
    #[error("{label}.{key} must be >= 0 (got {value})")]
    NegativePrice {
        label: &'static str,
        key: String,
        value: i64,
    },
    #[error("priority_crop '{0}' is not in the crop list")]
    UnknownPriorityCrop(String),
    #[error("bees.seasons must include at least one season when bee_houses > 0")]
    BeeSeasonsEmpty,
    #[error("bees.flower_plan contains season '{0}' outside bees.seasons")]
    FlowerPlanSeasonNotActive(String),
}

/// Validate configuration invariants for both save and JSON inputs.
pub fn validate_app_config(cfg: &AppConfig) -> Result<(), ValidationError> {
    validate_crops(cfg)?;
    validate_animals(cfg)?;
    validate_plots(cfg)?;
    validate_rates(cfg)?;
    validate_economy(cfg)?;
    validate_bees(cfg)?;
    Ok(())
}

fn validate_crops(cfg: &AppConfig) -> Result<(), ValidationError> {
    let mut seen = std::collections::BTreeSet::new();
    for crop in &cfg.crops {
        if !seen.insert(crop.id.clone()) {
            return Err(ValidationError::DuplicateCrop(crop.id.to_string()));
        }
        if crop.phase_days.is_empty() || crop.phase_days.iter().sum::<u32>() == 0 {
            return Err(ValidationError::CropWithoutPhases(crop.id.to_string()));
        }
    }
    if let Some(priority) = &cfg.priority_crop {
        if cfg.find_crop(priority).is_none() {
            return Err(ValidationError::UnknownPriorityCrop(priority.to_string()));
        }
    }
    Ok(())
}

fn validate_animals(cfg: &AppConfig) -> Result<(), ValidationError> {
    for coop in &cfg.animals.coops {
        let count = coop.total_animals();
        if count > COOP_CAPACITY {
            return Err(ValidationError::CoopOverCapacity {
                name: coop.name.clone(),
                count,
                capacity: COOP_CAPACITY,
            });
        }
    }
    for barn in &cfg.animals.barns {
        let count = barn.total_animals();
        if count > BARN_CAPACITY {
            return Err(ValidationError::BarnOverCapacity {
                name: barn.name.clone(),
                count,
                capacity: BARN_CAPACITY,
            });
        }
    }
    Ok(())
}

fn validate_plots(cfg: &AppConfig) -> Result<(), ValidationError> {
    for plot in &cfg.plots {
        let plot_seasons = match &plot.calendar {
            PlotCalendar::Always => None,
            PlotCalendar::Seasons { seasons } => {
                if seasons.is_empty() {
                    return Err(ValidationError::EmptySeasonCalendar(plot.name.clone()));
                }
                Some(seasons)
            }
        };
        for (crop_key, tiles) in &plot.tiles_by_crop {
            if *tiles == 0 || crop_key == ALL_CROPS {
                continue;
            }
            let Some(crop) = cfg.crops.iter().find(|c| c.id.as_str() == crop_key) else {
                return Err(ValidationError::UnknownPlotCrop {
                    plot: plot.name.clone(),
                    crop: crop_key.clone(),
                });
            };
            if let (Some(plot_seasons), Some(crop_seasons)) = (plot_seasons, &crop.seasons) {
                if !plot_seasons.iter().all(|s| crop_seasons.contains(s)) {
                    return Err(ValidationError::PlotSeasonMismatch {
                        plot: plot.name.clone(),
                        crop: crop_key.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_rates(cfg: &AppConfig) -> Result<(), ValidationError> {
    let rates = [
        ("large_egg_rate", cfg.animals.large_egg_rate),
        ("large_milk_rate", cfg.animals.large_milk_rate),
        ("large_goat_milk_rate", cfg.animals.large_goat_milk_rate),
        ("rabbit_foot_rate", cfg.animals.rabbit_foot_rate),
    ];
    for (name, value) in rates {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::RateOutOfRange { name, value });
        }
    }
    Ok(())
}

fn validate_economy(cfg: &AppConfig) -> Result<(), ValidationError> {
    let economy = &cfg.economy;
    let multipliers = [
        ("aged_wine_multiplier", economy.aged_wine_multiplier),
        ("wine_quality_multiplier", economy.wine_quality_multiplier),
        ("fruit_quality_multiplier", economy.fruit_quality_multiplier),
    ];
    for (name, value) in multipliers {
        if value <= 0.0 {
            return Err(ValidationError::MultiplierNotPositive { name, value });
        }
    }
    if let Some(walkways) = economy.casks_with_walkways {
        if walkways > cfg.casks {
            return Err(ValidationError::WalkwaysExceedCasks {
                walkways,
                casks: cfg.casks,
            });
        }
    }
    for (label, map) in [
        ("wine_price", &economy.wine_price),
        ("fruit_price", &economy.fruit_price),
        ("seed_cost", &economy.seed_cost),
    ] {
        for (key, value) in map {
            if *value < 0 {
                return Err(ValidationError::NegativePrice {
                    label,
                    key: key.to_string(),
                    value: *value,
                });
            }
        }
    }
    for (fert, value) in &economy.fertilizer_cost {
        if *value < 0 {
            return Err(ValidationError::NegativePrice {
                label: "fertilizer_cost",
                key: format!("{fert:?}"),
                value: *value,
            });
        }
    }
    Ok(())
}

fn validate_bees(cfg: &AppConfig) -> Result<(), ValidationError> {
    let bees = &cfg.bees;
    if bees.bee_houses == 0 {
        return Ok(());
    }
    if bees.seasons.is_empty() {
        return Err(ValidationError::BeeSeasonsEmpty);
    }
    for season in bees.flower_plan.keys() {
        if !bees.seasons.contains(season) {
            return Err(ValidationError::FlowerPlanSeasonNotActive(
                season.to_string(),
            ));
        }
    }
    Ok(())
}
