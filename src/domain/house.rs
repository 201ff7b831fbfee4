// ============================================================
// Layer 3 — House Features
// ============================================================
// The named view of one housing sample. The model only ever
// sees the flat vector produced by `to_vector()`, so the order
// of FEATURE_NAMES is the contract between data generation,
// standardisation, feature importance and prediction.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Number of input features per house
pub const FEATURE_COUNT: usize = 7;

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "area",
    "rooms",
    "floor",
    "age",
    "metro_distance",
    "school_district",
    "decoration",
];

/// Decoration levels: basic, fine, luxury
pub const DECORATION_LABELS: [&str; 3] = ["basic", "fine", "luxury"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseFeatures {
    /// Floor area in square metres
    pub area: f32,

    /// Number of rooms
    pub rooms: u32,

    /// Floor the flat is on (1 = ground)
    pub floor: u32,

    /// Building age in years
    pub age: u32,

    /// Distance to the nearest metro station in km
    pub metro_distance: f32,

    /// Inside a sought-after school district
    pub school_district: bool,

    /// 0 = basic, 1 = fine, 2 = luxury
    pub decoration: u32,
}

impl HouseFeatures {
    /// Flatten into the model's input order (see FEATURE_NAMES).
    pub fn to_vector(&self) -> Vec<f32> {
        vec![
            self.area,
            self.rooms as f32,
            self.floor as f32,
            self.age as f32,
            self.metro_distance,
            if self.school_district { 1.0 } else { 0.0 },
            self.decoration as f32,
        ]
    }

    /// Reject values the model was never trained on in a meaningful way.
    pub fn validate(&self) -> Result<()> {
        if !self.area.is_finite() || self.area <= 0.0 {
            bail!("area must be a positive number, got {}", self.area);
        }
        if !self.metro_distance.is_finite() || self.metro_distance < 0.0 {
            bail!("metro distance must be non-negative, got {}", self.metro_distance);
        }
        if self.decoration as usize >= DECORATION_LABELS.len() {
            bail!("decoration must be 0, 1 or 2, got {}", self.decoration);
        }
        Ok(())
    }

    pub fn decoration_label(&self) -> &'static str {
        DECORATION_LABELS
            .get(self.decoration as usize)
            .copied()
            .unwrap_or("unknown")
    }

    /// Three reference houses used to demo predictions after training.
    pub fn examples() -> Vec<HouseFeatures> {
        vec![
            HouseFeatures {
                area: 90.0, rooms: 2, floor: 15, age: 5,
                metro_distance: 0.8, school_district: true, decoration: 2,
            },
            HouseFeatures {
                area: 130.0, rooms: 3, floor: 8, age: 15,
                metro_distance: 2.5, school_district: false, decoration: 1,
            },
            HouseFeatures {
                area: 200.0, rooms: 4, floor: 3, age: 2,
                metro_distance: 1.2, school_district: true, decoration: 2,
            },
        ]
    }
}
