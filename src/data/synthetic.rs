// ============================================================
// Layer 4 — Synthetic Housing Data
// ============================================================
// Generates a seeded housing-price dataset. Each house gets
// seven features drawn from simple distributions, and the
// price is a fixed linear combination of them plus Gaussian
// noise:
//
//   price = area·500 + rooms·15000 + (31 − floor)·2000
//         + (30 − age)·3000 + (10 − metro)·8000
//         + school·200000 + decoration·50000 + N(0, 50000)
//
// clipped to [100 000, 2 000 000]. Same seed, same dataset.

use anyhow::{anyhow, Result};
use rand::{distributions::WeightedIndex, rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use crate::domain::{
    house::HouseFeatures,
    sample::Sample,
    traits::DatasetSource,
};

pub const MIN_PRICE: f64 = 100_000.0;
pub const MAX_PRICE: f64 = 2_000_000.0;

/// Seeded generator for the synthetic housing dataset.
#[derive(Debug, Clone)]
pub struct SyntheticHousing {
    num_samples: usize,
    seed:        u64,
}

impl SyntheticHousing {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self { num_samples, seed }
    }

    /// Generate (features, price) pairs in their named form.
    pub fn generate(&self) -> Result<Vec<(HouseFeatures, f64)>> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let area_dist  = Normal::new(120.0_f64, 40.0).map_err(|e| anyhow!("area distribution: {e}"))?;
        let metro_dist = Exp::new(0.5_f64).map_err(|e| anyhow!("metro distribution: {e}"))?;
        let noise_dist = Normal::new(0.0_f64, 50_000.0).map_err(|e| anyhow!("noise distribution: {e}"))?;
        let decoration_dist = WeightedIndex::new([0.3_f64, 0.5, 0.2])
            .map_err(|e| anyhow!("decoration distribution: {e}"))?;

        let houses = (0..self.num_samples)
            .map(|_| {
                let house = HouseFeatures {
                    area:            area_dist.sample(&mut rng).clamp(30.0, 300.0) as f32,
                    rooms:           rng.gen_range(1..=5),
                    floor:           rng.gen_range(1..=30),
                    age:             rng.gen_range(0..30),
                    metro_distance:  metro_dist.sample(&mut rng).clamp(0.1, 10.0) as f32,
                    school_district: rng.gen_bool(0.3),
                    decoration:      decoration_dist.sample(&mut rng) as u32,
                };
                let price = (base_price(&house) + noise_dist.sample(&mut rng))
                    .clamp(MIN_PRICE, MAX_PRICE);
                (house, price)
            })
            .collect();

        Ok(houses)
    }
}

impl DatasetSource for SyntheticHousing {
    fn load_all(&self) -> Result<Vec<Sample>> {
        let samples: Vec<Sample> = self
            .generate()?
            .into_iter()
            .map(|(house, price)| Sample::new(house.to_vector(), price as f32))
            .collect();
        tracing::debug!("Generated {} synthetic houses (seed={})", samples.len(), self.seed);
        Ok(samples)
    }
}

/// Noise-free price of a house.
pub fn base_price(h: &HouseFeatures) -> f64 {
    h.area as f64 * 500.0
        + h.rooms as f64 * 15_000.0
        + (31.0 - h.floor as f64) * 2_000.0
        + (30.0 - h.age as f64) * 3_000.0
        + (10.0 - h.metro_distance as f64) * 8_000.0
        + if h.school_district { 200_000.0 } else { 0.0 }
        + h.decoration as f64 * 50_000.0
}
