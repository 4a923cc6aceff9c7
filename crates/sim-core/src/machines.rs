//! Processing machine constants, slot state, and machine inventories.

use crate::CropId;
use serde::{Deserialize, Serialize};

/// Days a keg takes to turn one fruit into base wine.
pub const KEG_DAYS: u32 = 7;
/// Days a preserves jar takes to turn one fruit into jelly.
pub const PRESERVES_JAR_DAYS: u32 = 3;
/// Days a dehydrator takes to turn one batch into dried fruit.
pub const DEHYDRATOR_DAYS: u32 = 1;
/// Fruit consumed per dehydrator batch.
pub const DEHYDRATOR_INPUT: u32 = 5;
/// Days a cask takes to age base wine to iridium quality.
pub const CASK_DAYS: u32 = 56;
/// Cask fills per 112-day year at 56 days per batch.
pub const CASK_USES_PER_YEAR: u32 = 2;

/// One machine slot: empty, or holding a load with days left to finish.
///
/// A slot that finishes on a given day is refilled the same day, so a keg
/// chain never idles while input exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MachineSlot {
    pub contents: Option<CropId>,
    pub days_remaining: u32,
}

impl MachineSlot {
    pub fn idle_bank(count: u32) -> Vec<MachineSlot> {
        vec![MachineSlot::default(); count as usize]
    }

    pub fn is_idle(&self) -> bool {
        self.days_remaining == 0
    }

    /// Advance one day; returns the finished load's crop id, if any.
    pub fn advance(&mut self) -> Option<CropId> {
        if self.days_remaining == 0 {
            return None;
        }
        self.days_remaining -= 1;
        if self.days_remaining == 0 {
            return self.contents.take();
        }
        None
    }

    pub fn start(&mut self, crop_id: CropId, days: u32) {
        self.contents = Some(crop_id);
        self.days_remaining = days;
    }
}

/// Counts of every processing machine on the farm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineCounts {
    #[serde(default)]
    pub kegs: u32,
    #[serde(default)]
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
    pub bee_houses: u32,
    #[serde(default)]
    pub seed_makers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_finishes_and_empties_after_its_cycle() {
        let mut slot = MachineSlot::default();
        assert!(slot.is_idle());
        slot.start(CropId::from("starfruit"), KEG_DAYS);
        for _ in 0..KEG_DAYS - 1 {
            assert_eq!(slot.advance(), None);
        }
        assert_eq!(slot.advance(), Some(CropId::from("starfruit")));
        assert!(slot.is_idle());
        assert_eq!(slot.contents, None);
    }

    #[test]
    fn idle_slot_does_not_produce() {
        let mut slot = MachineSlot::default();
        assert_eq!(slot.advance(), None);
    }
}
