use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Declared bounds of a heritable trait. Mutation clamps back into these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraitRange {
    pub min: f32,
    pub max: f32,
}

impl TraitRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Standard deviation of the per-trait Gaussian mutation step.
const MUTATION_SIGMA: f32 = 0.1;
/// Chance for a boolean trait to flip during mutation.
const FLIP_CHANCE: f64 = 0.01;

fn perturb<R: Rng + ?Sized>(value: f32, range: TraitRange, rng: &mut R) -> f32 {
    let noise: f32 = rng.sample(StandardNormal);
    range.clamp(value + noise * MUTATION_SIGMA)
}

/// Herbivore genome. The display color is derived from fear and weight, so
/// these traits feed back into the camouflage model.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HareGenome {
    pub reproduction_threshold: f32,
    pub fear: f32,
    pub weight: f32,
    pub movement_efficiency: f32,
    pub can_hide: bool,
}

impl HareGenome {
    pub const REPRODUCTION_THRESHOLD: TraitRange = TraitRange::new(1.0, 2.0);
    pub const FEAR: TraitRange = TraitRange::new(0.0, 1.0);
    pub const WEIGHT: TraitRange = TraitRange::new(0.5, 1.5);
    pub const MOVEMENT_EFFICIENCY: TraitRange = TraitRange::new(0.5, 1.5);

    pub fn speed(&self) -> f32 {
        2.0 - self.weight
    }

    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reproduction_threshold =
            perturb(self.reproduction_threshold, Self::REPRODUCTION_THRESHOLD, rng);
        self.fear = perturb(self.fear, Self::FEAR, rng);
        self.weight = perturb(self.weight, Self::WEIGHT, rng);
        self.movement_efficiency =
            perturb(self.movement_efficiency, Self::MOVEMENT_EFFICIENCY, rng);
        if rng.random::<f64>() < FLIP_CHANCE {
            self.can_hide = !self.can_hide;
        }
    }

    /// Two-parent blend for evolutionary tuning outside the simulation loop.
    pub fn average(a: &Self, b: &Self) -> Self {
        Self {
            reproduction_threshold: (a.reproduction_threshold + b.reproduction_threshold) / 2.0,
            fear: (a.fear + b.fear) / 2.0,
            weight: (a.weight + b.weight) / 2.0,
            movement_efficiency: (a.movement_efficiency + b.movement_efficiency) / 2.0,
            can_hide: a.can_hide,
        }
    }

    pub fn in_bounds(&self) -> bool {
        Self::REPRODUCTION_THRESHOLD.contains(self.reproduction_threshold)
            && Self::FEAR.contains(self.fear)
            && Self::WEIGHT.contains(self.weight)
            && Self::MOVEMENT_EFFICIENCY.contains(self.movement_efficiency)
    }
}

impl Default for HareGenome {
    fn default() -> Self {
        Self {
            reproduction_threshold: 1.5,
            fear: 0.7,
            weight: 1.0,
            movement_efficiency: 1.0,
            can_hide: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FoxGenome {
    pub reproduction_threshold: f32,
    pub hunting_aggression: f32,
    pub weight: f32,
    pub movement_efficiency: f32,
}

impl FoxGenome {
    pub const REPRODUCTION_THRESHOLD: TraitRange = TraitRange::new(2.0, 4.0);
    pub const HUNTING_AGGRESSION: TraitRange = TraitRange::new(0.0, 1.0);
    pub const WEIGHT: TraitRange = TraitRange::new(0.5, 1.5);
    pub const MOVEMENT_EFFICIENCY: TraitRange = TraitRange::new(0.5, 1.5);

    pub fn speed(&self) -> f32 {
        3.0 - self.weight
    }

    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reproduction_threshold =
            perturb(self.reproduction_threshold, Self::REPRODUCTION_THRESHOLD, rng);
        self.hunting_aggression =
            perturb(self.hunting_aggression, Self::HUNTING_AGGRESSION, rng);
        self.weight = perturb(self.weight, Self::WEIGHT, rng);
        self.movement_efficiency =
            perturb(self.movement_efficiency, Self::MOVEMENT_EFFICIENCY, rng);
    }

    pub fn average(a: &Self, b: &Self) -> Self {
        Self {
            reproduction_threshold: (a.reproduction_threshold + b.reproduction_threshold) / 2.0,
            hunting_aggression: (a.hunting_aggression + b.hunting_aggression) / 2.0,
            weight: (a.weight + b.weight) / 2.0,
            movement_efficiency: (a.movement_efficiency + b.movement_efficiency) / 2.0,
        }
    }

    pub fn in_bounds(&self) -> bool {
        Self::REPRODUCTION_THRESHOLD.contains(self.reproduction_threshold)
            && Self::HUNTING_AGGRESSION.contains(self.hunting_aggression)
            && Self::WEIGHT.contains(self.weight)
            && Self::MOVEMENT_EFFICIENCY.contains(self.movement_efficiency)
    }
}

impl Default for FoxGenome {
    fn default() -> Self {
        Self {
            reproduction_threshold: 3.0,
            hunting_aggression: 0.7,
            weight: 0.5,
            movement_efficiency: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WolfGenome {
    pub reproduction_threshold: f32,
    pub hunting_aggression: f32,
    pub weight: f32,
    pub movement_efficiency: f32,
}

impl WolfGenome {
    pub const REPRODUCTION_THRESHOLD: TraitRange = TraitRange::new(4.5, 6.5);
    pub const HUNTING_AGGRESSION: TraitRange = TraitRange::new(0.0, 1.0);
    pub const WEIGHT: TraitRange = TraitRange::new(0.0, 0.8);
    pub const MOVEMENT_EFFICIENCY: TraitRange = TraitRange::new(0.5, 1.5);

    pub fn speed(&self) -> f32 {
        1.5 - self.weight
    }

    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reproduction_threshold =
            perturb(self.reproduction_threshold, Self::REPRODUCTION_THRESHOLD, rng);
        self.hunting_aggression =
            perturb(self.hunting_aggression, Self::HUNTING_AGGRESSION, rng);
        self.weight = perturb(self.weight, Self::WEIGHT, rng);
        self.movement_efficiency =
            perturb(self.movement_efficiency, Self::MOVEMENT_EFFICIENCY, rng);
    }

    pub fn average(a: &Self, b: &Self) -> Self {
        Self {
            reproduction_threshold: (a.reproduction_threshold + b.reproduction_threshold) / 2.0,
            hunting_aggression: (a.hunting_aggression + b.hunting_aggression) / 2.0,
            weight: (a.weight + b.weight) / 2.0,
            movement_efficiency: (a.movement_efficiency + b.movement_efficiency) / 2.0,
        }
    }

    pub fn in_bounds(&self) -> bool {
        Self::REPRODUCTION_THRESHOLD.contains(self.reproduction_threshold)
            && Self::HUNTING_AGGRESSION.contains(self.hunting_aggression)
            && Self::WEIGHT.contains(self.weight)
            && Self::MOVEMENT_EFFICIENCY.contains(self.movement_efficiency)
    }
}

impl Default for WolfGenome {
    fn default() -> Self {
        Self {
            reproduction_threshold: 5.5,
            hunting_aggression: 0.8,
            weight: 0.0,
            movement_efficiency: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SalmonGenome {
    pub reproduction_threshold: f32,
}

impl SalmonGenome {
    pub const REPRODUCTION_THRESHOLD: TraitRange = TraitRange::new(1.5, 2.5);

    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reproduction_threshold =
            perturb(self.reproduction_threshold, Self::REPRODUCTION_THRESHOLD, rng);
    }

    pub fn average(a: &Self, b: &Self) -> Self {
        Self {
            reproduction_threshold: (a.reproduction_threshold + b.reproduction_threshold) / 2.0,
        }
    }

    pub fn in_bounds(&self) -> bool {
        Self::REPRODUCTION_THRESHOLD.contains(self.reproduction_threshold)
    }
}

impl Default for SalmonGenome {
    fn default() -> Self {
        Self {
            reproduction_threshold: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn mutation_respects_trait_bounds() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        let mut hare = HareGenome::default();
        let mut fox = FoxGenome::default();
        let mut wolf = WolfGenome::default();
        let mut salmon = SalmonGenome::default();
        for _ in 0..10_000 {
            hare.mutate(&mut rng);
            fox.mutate(&mut rng);
            wolf.mutate(&mut rng);
            salmon.mutate(&mut rng);
            assert!(hare.in_bounds());
            assert!(fox.in_bounds());
            assert!(wolf.in_bounds());
            assert!(salmon.in_bounds());
        }
    }

    #[test]
    fn mutation_is_deterministic_for_fixed_seed() {
        let mut a = HareGenome::default();
        let mut b = HareGenome::default();
        let mut rng_a = ChaCha12Rng::seed_from_u64(123);
        let mut rng_b = ChaCha12Rng::seed_from_u64(123);
        for _ in 0..50 {
            a.mutate(&mut rng_a);
            b.mutate(&mut rng_b);
        }
        assert_eq!(a.reproduction_threshold, b.reproduction_threshold);
        assert_eq!(a.fear, b.fear);
        assert_eq!(a.weight, b.weight);
        assert_eq!(a.movement_efficiency, b.movement_efficiency);
        assert_eq!(a.can_hide, b.can_hide);
    }

    #[test]
    fn mutation_actually_moves_traits() {
        let mut g = FoxGenome::default();
        let before = g;
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        for _ in 0..10 {
            g.mutate(&mut rng);
        }
        assert!(g.reproduction_threshold != before.reproduction_threshold);
    }

    #[test]
    fn average_is_the_midpoint() {
        let a = WolfGenome {
            reproduction_threshold: 5.0,
            hunting_aggression: 0.2,
            weight: 0.0,
            movement_efficiency: 0.8,
        };
        let b = WolfGenome {
            reproduction_threshold: 6.0,
            hunting_aggression: 0.8,
            weight: 0.4,
            movement_efficiency: 1.2,
        };
        let c = WolfGenome::average(&a, &b);
        assert_eq!(c.reproduction_threshold, 5.5);
        assert_eq!(c.hunting_aggression, 0.5);
        assert_eq!(c.weight, 0.2);
        assert_eq!(c.movement_efficiency, 1.0);
    }

    #[test]
    fn derived_speeds_cover_expected_spans() {
        let heavy = HareGenome {
            weight: HareGenome::WEIGHT.max,
            ..HareGenome::default()
        };
        let light = HareGenome {
            weight: HareGenome::WEIGHT.min,
            ..HareGenome::default()
        };
        assert_eq!(heavy.speed(), 0.5);
        assert_eq!(light.speed(), 1.5);
        // Default fox outruns every possible hare.
        assert!(FoxGenome::default().speed() > light.speed());
    }
}
