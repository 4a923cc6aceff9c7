//! Crop growth specifications.

use crate::CropId;
use serde::{Deserialize, Serialize};

/// Immutable growth data for one crop.
///
/// `phase_days` excludes the terminal "never grows" sentinel the game data
/// carries; `regrow_days` is `None` for single-harvest crops that must be
/// replanted after every harvest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSpec {
    pub crop_id: CropId,
    pub phase_days: Vec<u32>,
    #[serde(default)]
    pub regrow_days: Option<u32>,
}

impl CropSpec {
    pub fn new(crop_id: impl Into<CropId>, phase_days: Vec<u32>, regrow_days: Option<u32>) -> Self {
        CropSpec {
            crop_id: crop_id.into(),
            phase_days,
            regrow_days,
        }
    }

    /// Days to first harvest without any speed modifiers.
    pub fn base_days_to_first_harvest(&self) -> u32 {
        self.phase_days.iter().sum()
    }

    /// Starfruit: 2,3,2,3,3 = 13 days, single harvest.
    pub fn starfruit() -> Self {
        CropSpec::new(CropId::from("starfruit"), vec![2, 3, 2, 3, 3], None)
    }

    /// Ancient Fruit: 2,7,7,7,5 = 28 days, regrows every 7.
    pub fn ancient_fruit() -> Self {
        CropSpec::new(CropId::from("ancient"), vec![2, 7, 7, 7, 5], Some(7))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_growth_days_match_crop_specs() {
        assert_eq!(CropSpec::starfruit().base_days_to_first_harvest(), 13);
        assert_eq!(CropSpec::ancient_fruit().base_days_to_first_harvest(), 28);
        assert_eq!(CropSpec::ancient_fruit().regrow_days, Some(7));
    }
}
