#![deny(warnings)]

//! Core domain models and invariants for the farm production simulator.
//!
//! This crate defines the serializable types shared across the simulation
//! (crops, plots, calendars, machines, save state, configuration) together
//! with the growth-modifier engine and validation helpers that guarantee
//! basic invariants before a simulation runs.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod catalog;
pub mod config;
pub mod crops;
pub mod growth;
pub mod machines;
pub mod plots;
pub mod results;
pub mod save_state;
pub mod validation;

/// Unique identifier for a harvestable good or its seed, e.g. "starfruit",
/// "ancient", or a raw game item id like "454".
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CropId(pub String);

impl CropId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        CropId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CropId {
    fn from(value: &str) -> Self {
        CropId(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_id_orders_lexicographically() {
        let mut ids = vec![CropId::from("starfruit"), CropId::from("ancient")];
        ids.sort();
        assert_eq!(ids[0], CropId::from("ancient"));
    }

    #[test]
    fn crop_id_serde_is_a_plain_string() {
        let id = CropId::from("starfruit");
        let s = serde_json::to_string(&id).unwrap();
        assert_eq!(s, "\"starfruit\"");
        let back: CropId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }
}
