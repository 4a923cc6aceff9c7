//! Crop catalog: per-crop game data indexed by harvest item, seed item,
//! and normalized display name.
//!
//! The catalog is built once from prepared JSON and passed by reference into
//! every simulation call; nothing here reads game files at query time.

use crate::plots::Season;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sale category of a harvested item.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Fruit,
    Vegetable,
    Flower,
    #[default]
    Other,
}

impl CropCategory {
    /// Map the game's numeric object category codes.
    pub fn from_code(code: i32) -> CropCategory {
        match code {
            -79 => CropCategory::Fruit,
            -75 => CropCategory::Vegetable,
            -80 => CropCategory::Flower,
            _ => CropCategory::Other,
        }
    }
}

/// Full game data for one plantable crop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropDef {
    pub harvest_item_id: String,
    pub seed_item_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    pub days_in_phase: Vec<u32>,
    #[serde(default)]
    pub regrow_days: Option<u32>,
    #[serde(default = "one")]
    pub harvest_min_stack: u32,
    #[serde(default = "one")]
    pub harvest_max_stack: u32,
    #[serde(default)]
    pub harvest_max_increase_per_level: f64,
    #[serde(default)]
    pub extra_harvest_chance: f64,
    #[serde(default = "yes")]
    pub needs_watering: bool,
    #[serde(default)]
    pub is_paddy: bool,
    #[serde(default)]
    pub is_raised: bool,
    #[serde(default)]
    pub base_price: Option<i64>,
    #[serde(default)]
    pub seed_price: Option<i64>,
    #[serde(default)]
    pub seed_sources: BTreeMap<String, Option<i64>>,
    #[serde(default)]
    pub category: CropCategory,
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

impl CropDef {
    pub fn grows_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}

/// Immutable crop index. Later entries win on id collisions, matching the
/// game data's own override order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CropCatalog {
    pub by_harvest_id: BTreeMap<String, CropDef>,
    pub by_seed_id: BTreeMap<String, CropDef>,
    pub by_name: BTreeMap<String, CropDef>,
}

impl CropCatalog {
    pub fn from_defs(defs: Vec<CropDef>) -> CropCatalog {
        let mut catalog = CropCatalog::default();
        for def in defs {
            catalog.by_harvest_id.insert(def.harvest_item_id.clone(), def.clone());
            catalog.by_seed_id.insert(def.seed_item_id.clone(), def.clone());
            if let Some(name) = &def.name {
                catalog.by_name.insert(normalize_name(name), def.clone());
            }
        }
        catalog
    }

    /// Parse a prepared JSON array of crop definitions.
    pub fn from_json_str(json: &str) -> Result<CropCatalog, serde_json::Error> {
        let defs: Vec<CropDef> = serde_json::from_str(json)?;
        Ok(CropCatalog::from_defs(defs))
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&CropDef> {
        self.by_name.get(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.by_harvest_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_harvest_id.is_empty()
    }
}

/// Lowercase and strip non-alphanumerics, so "Ancient Fruit" and
/// "ancient_fruit" index the same entry.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Which seed shops the player can buy from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopAccess {
    #[serde(default = "yes")]
    pub pierre: bool,
    #[serde(default = "yes")]
    pub joja: bool,
    #[serde(default)]
    pub oasis: bool,
    #[serde(default)]
    pub traveling_cart: bool,
}

impl Default for ShopAccess {
    fn default() -> Self {
        ShopAccess {
            pierre: true,
            joja: true,
            oasis: false,
            traveling_cart: false,
        }
    }
}

/// Whether a crop's seed can be bought, and where.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAvailability {
    pub purchasable: bool,
    pub price: Option<i64>,
    pub sources: BTreeMap<String, Option<i64>>,
}

/// Resolve seed purchasability against the player's shop access.
pub fn seed_availability(crop: &CropDef, access: &ShopAccess) -> SeedAvailability {
    let sources = crop.seed_sources.clone();
    let Some(price) = crop.seed_price else {
        return SeedAvailability {
            purchasable: false,
            price: None,
            sources,
        };
    };

    let open = |shop: &str, allowed: bool| {
        allowed && sources.get(shop).map(|p| p.is_some()).unwrap_or(false)
    };
    let purchasable = open("pierre", access.pierre)
        || open("joja", access.joja)
        || open("oasis", access.oasis)
        || open("traveling_cart", access.traveling_cart);

    SeedAvailability {
        purchasable,
        price: Some(price),
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(harvest: &str, seed: &str, name: &str) -> CropDef {
        CropDef {
            harvest_item_id: harvest.to_string(),
            seed_item_id: seed.to_string(),
            name: Some(name.to_string()),
            seasons: vec![Season::Summer],
            days_in_phase: vec![2, 3, 2, 3, 3],
            regrow_days: None,
            harvest_min_stack: 1,
            harvest_max_stack: 1,
            harvest_max_increase_per_level: 0.0,
            extra_harvest_chance: 0.0,
            needs_watering: true,
            is_paddy: false,
            is_raised: false,
            base_price: Some(750),
            seed_price: Some(400),
            seed_sources: BTreeMap::new(),
            category: CropCategory::Fruit,
        }
    }

    #[test]
    fn catalog_indexes_by_all_three_keys() {
        let catalog = CropCatalog::from_defs(vec![def("268", "486", "Starfruit")]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_harvest_id.contains_key("268"));
        assert!(catalog.by_seed_id.contains_key("486"));
        assert!(catalog.lookup_by_name("star fruit").is_some());
        assert!(catalog.lookup_by_name("STARFRUIT").is_some());
    }

    #[test]
    fn category_codes() {
        assert_eq!(CropCategory::from_code(-79), CropCategory::Fruit);
        assert_eq!(CropCategory::from_code(-75), CropCategory::Vegetable);
        assert_eq!(CropCategory::from_code(-80), CropCategory::Flower);
        assert_eq!(CropCategory::from_code(-74), CropCategory::Other);
    }

    #[test]
    fn seed_availability_respects_shop_access() {
        let mut crop = def("268", "486", "Starfruit");
        crop.seed_sources.insert("oasis".to_string(), Some(400));
        let closed = seed_availability(&crop, &ShopAccess::default());
        assert!(!closed.purchasable);
        assert_eq!(closed.price, Some(400));

        let open = seed_availability(
            &crop,
            &ShopAccess {
                oasis: true,
                ..ShopAccess::default()
            },
        );
        assert!(open.purchasable);
    }

    #[test]
    fn seed_without_price_is_never_purchasable() {
        let mut crop = def("268", "486", "Starfruit");
        crop.seed_price = None;
        crop.seed_sources.insert("pierre".to_string(), Some(100));
        let availability = seed_availability(&crop, &ShopAccess::default());
        assert!(!availability.purchasable);
        assert_eq!(availability.price, None);
    }
}
