use crate::hex::Axial;
use crate::plant::{PlantField, PlantStage};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::collections::BTreeMap;

/// Seconds a cell burns once ignited.
pub const BURN_DURATION: f32 = 5.0;
/// Cadence of the neighbor-ignition wavefront.
const SPREAD_INTERVAL: f32 = 2.0;
/// Background ignition only starts once this many mature plants exist.
const IGNITION_MIN_MATURE: usize = 15;
const IGNITION_RATE_PER_SEC: f64 = 0.01;

/// Active fire marks, keyed by coordinate with remaining burn time.
#[derive(Clone, Debug, Default)]
pub struct FireField {
    fires: BTreeMap<Axial, f32>,
    spread_accum: f32,
}

impl FireField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_burning(&self, coord: Axial) -> bool {
        self.fires.contains_key(&coord)
    }

    /// Remaining burn time as a fraction of the full duration, 0 if not burning.
    pub fn burn_fraction(&self, coord: Axial) -> f32 {
        self.fires
            .get(&coord)
            .map_or(0.0, |t| (t / BURN_DURATION).clamp(0.0, 1.0))
    }

    pub fn len(&self) -> usize {
        self.fires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fires.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Axial, &f32)> {
        self.fires.iter()
    }

    pub fn ignite(&mut self, coord: Axial) {
        self.fires.entry(coord).or_insert(BURN_DURATION);
    }

    /// Advance burn timers, char burnt-out cells, run the spread wavefront,
    /// and roll for background ignition.
    pub fn tick(&mut self, dt: f32, plants: &mut PlantField, rng: &mut ChaCha12Rng) {
        let mut expired: Vec<Axial> = Vec::new();
        for (coord, remaining) in self.fires.iter_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                expired.push(*coord);
            }
        }
        for coord in expired {
            self.fires.remove(&coord);
            plants.char_at(coord);
        }

        self.spread_accum += dt;
        while self.spread_accum >= SPREAD_INTERVAL {
            self.spread_accum -= SPREAD_INTERVAL;
            self.spread(plants);
        }

        if plants.mature_count() >= IGNITION_MIN_MATURE
            && rng.random::<f64>() < IGNITION_RATE_PER_SEC * dt as f64
        {
            self.ignite_random_plant(plants, rng);
        }
    }

    /// Ignite a random existing plant cell. Returns the chosen coordinate.
    pub fn ignite_random_plant(
        &mut self,
        plants: &PlantField,
        rng: &mut ChaCha12Rng,
    ) -> Option<Axial> {
        if plants.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..plants.len());
        let coord = *plants.coords().nth(idx)?;
        log::debug!("fire ignited at ({}, {})", coord.q, coord.r);
        self.ignite(coord);
        Some(coord)
    }

    /// One wavefront step: every burning cell ignites neighbors holding a
    /// non-charred plant that is not already burning.
    fn spread(&mut self, plants: &PlantField) {
        let burning: Vec<Axial> = self.fires.keys().copied().collect();
        for coord in burning {
            for n in coord.neighbors() {
                if self.fires.contains_key(&n) {
                    continue;
                }
                if let Some(plant) = plants.get(n) {
                    if plant.stage != PlantStage::Charred {
                        self.fires.insert(n, BURN_DURATION);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn isolated_fire_burns_out_and_chars_once() {
        let mut fire = FireField::new();
        let mut plants = PlantField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let origin = Axial::new(0, 0);
        plants.spawn_seed(origin, 0.9);
        fire.ignite(origin);

        let mut elapsed = 0.0;
        while fire.is_burning(origin) {
            fire.tick(0.25, &mut plants, &mut rng);
            elapsed += 0.25;
            assert!(elapsed <= BURN_DURATION + 0.5, "fire never expired");
        }
        assert_eq!(plants.get(origin).unwrap().stage, PlantStage::Charred);
        assert!(fire.is_empty());

        // A later tick must not re-char or re-ignite the cell.
        fire.tick(0.25, &mut plants, &mut rng);
        assert!(!fire.is_burning(origin));
        assert_eq!(plants.get(origin).unwrap().stage, PlantStage::Charred);
    }

    #[test]
    fn wavefront_ignites_adjacent_plants() {
        let mut fire = FireField::new();
        let mut plants = PlantField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let origin = Axial::new(0, 0);
        let neighbor = Axial::new(1, 0);
        let far = Axial::new(3, 0);
        plants.spawn_seed(origin, 0.9);
        plants.spawn_seed(neighbor, 0.9);
        plants.spawn_seed(far, 0.9);

        fire.ignite(origin);
        fire.tick(2.0, &mut plants, &mut rng);
        assert!(fire.is_burning(neighbor));
        assert!(!fire.is_burning(far));
    }

    #[test]
    fn charred_plants_do_not_reignite() {
        let mut fire = FireField::new();
        let mut plants = PlantField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let origin = Axial::new(0, 0);
        let neighbor = Axial::new(1, 0);
        plants.spawn_seed(origin, 0.9);
        plants.spawn_seed(neighbor, 0.9);
        plants.char_at(neighbor);

        fire.ignite(origin);
        fire.tick(2.0, &mut plants, &mut rng);
        assert!(!fire.is_burning(neighbor));
    }

    #[test]
    fn burn_fraction_reflects_remaining_time() {
        let mut fire = FireField::new();
        let mut plants = PlantField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let origin = Axial::new(0, 0);
        fire.ignite(origin);
        assert!((fire.burn_fraction(origin) - 1.0).abs() < 1e-6);
        fire.tick(2.5, &mut plants, &mut rng);
        assert!((fire.burn_fraction(origin) - 0.5).abs() < 1e-6);
        assert_eq!(fire.burn_fraction(Axial::new(5, 5)), 0.0);
    }
}
