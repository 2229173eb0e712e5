pub mod fox;
pub mod hare;
pub mod salmon;
pub mod wolf;

pub use fox::Fox;
pub use hare::Hare;
pub use salmon::Salmon;
pub use wolf::Wolf;

use crate::fire::FireField;
use crate::hex::Axial;
use crate::terrain::{Terrain, TerrainField};
use crate::visibility::Rgb;
use rand::Rng;
use rand_chacha::ChaCha12Rng;

/// Shared capability surface of every species.
///
/// Species live in separate homogeneous collections and their update
/// functions stay monomorphic; this trait only carries the uniform pieces
/// the world layer needs (fire kill, compaction, snapshots).
pub trait Creature {
    /// Nutrients returned to the soil when this creature dies.
    const NUTRIENT_DEPOSIT: f32;

    fn coord(&self) -> Axial;
    fn is_alive(&self) -> bool;
    fn mark_dead(&mut self);
    fn display_position(&self) -> [f32; 2];
}

/// Kill a creature and feed its nutrients back into the soil, capped at 1.0.
pub(crate) fn die<C: Creature>(creature: &mut C, terrain: &mut TerrainField) {
    if creature.is_alive() {
        creature.mark_dead();
        terrain.deposit(creature.coord(), C::NUTRIENT_DEPOSIT);
    }
}

/// Below this thirst level a species starts collecting water directions and
/// (hare only) gains water as walkable terrain.
pub(crate) const THIRST_SEEK_WATER: f32 = 0.3;
/// Below this level water-seeking overrides chase and flee preferences.
pub(crate) const THIRST_CRITICAL: f32 = 0.2;

/// Position and display color of a predator as seen by prey this tick.
#[derive(Clone, Copy, Debug)]
pub struct PredatorSighting {
    pub coord: Axial,
    pub color: Rgb,
}

/// Pregnancy flags and timer, uniform across species.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reproduction {
    pub is_pregnant: bool,
    pub timer: f32,
    pub birth_ready: bool,
}

impl Reproduction {
    pub(crate) fn conceive(&mut self, duration: f32) {
        self.is_pregnant = true;
        self.timer = duration;
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        if self.is_pregnant {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.is_pregnant = false;
                self.birth_ready = true;
            }
        }
    }

    /// Consume the birth-ready flag, returning whether it was set.
    pub(crate) fn take_birth(&mut self) -> bool {
        std::mem::take(&mut self.birth_ready)
    }
}

/// Slide an interpolated display position toward `target` by at most `step`.
pub(crate) fn approach(current: &mut [f32; 2], target: [f32; 2], step: f32) {
    let dx = target[0] - current[0];
    let dy = target[1] - current[1];
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= step || dist < 1e-4 {
        *current = target;
    } else {
        current[0] += dx / dist * step;
        current[1] += dy / dist * step;
    }
}

/// Directions whose destination cell exists and has an allowed terrain.
pub(crate) fn candidate_directions(
    coord: Axial,
    allowed: &[Terrain],
    terrain: &TerrainField,
) -> Vec<usize> {
    (0..6)
        .filter(|&dir| {
            let dest = coord.neighbor(dir);
            terrain.contains(dest) && allowed.contains(&terrain.terrain_at(dest))
        })
        .collect()
}

/// Drop burning destinations, unless that would leave nothing.
pub(crate) fn retain_unburning(coord: Axial, dirs: &mut Vec<usize>, fire: &FireField) {
    let safe: Vec<usize> = dirs
        .iter()
        .copied()
        .filter(|&dir| !fire.is_burning(coord.neighbor(dir)))
        .collect();
    if !safe.is_empty() {
        *dirs = safe;
    }
}

/// Directions whose destination is a water cell (submerging species).
pub(crate) fn water_directions(
    coord: Axial,
    dirs: &[usize],
    terrain: &TerrainField,
) -> Vec<usize> {
    dirs.iter()
        .copied()
        .filter(|&dir| terrain.terrain_at(coord.neighbor(dir)) == Terrain::Water)
        .collect()
}

/// Directions whose destination touches water (edge-drinking species).
pub(crate) fn water_adjacent_directions(
    coord: Axial,
    dirs: &[usize],
    terrain: &TerrainField,
) -> Vec<usize> {
    dirs.iter()
        .copied()
        .filter(|&dir| {
            coord
                .neighbor(dir)
                .neighbors()
                .iter()
                .any(|n| terrain.terrain_at(*n) == Terrain::Water)
        })
        .collect()
}

/// Directions that strictly reduce hex distance to `target`.
pub(crate) fn directions_toward(coord: Axial, dirs: &[usize], target: Axial) -> Vec<usize> {
    let current = coord.distance(target);
    dirs.iter()
        .copied()
        .filter(|&dir| coord.neighbor(dir).distance(target) < current)
        .collect()
}

/// Directions that strictly increase hex distance to `target`.
pub(crate) fn directions_away(coord: Axial, dirs: &[usize], target: Axial) -> Vec<usize> {
    let current = coord.distance(target);
    dirs.iter()
        .copied()
        .filter(|&dir| coord.neighbor(dir).distance(target) > current)
        .collect()
}

/// Uniform tie-break among remaining candidates, from the shared stream.
pub(crate) fn choose_direction(dirs: &[usize], rng: &mut ChaCha12Rng) -> usize {
    dirs[rng.random_range(0..dirs.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn reproduction_raises_birth_flag_once() {
        let mut r = Reproduction::default();
        r.conceive(2.0);
        assert!(r.is_pregnant);
        r.advance(1.0);
        assert!(r.is_pregnant && !r.birth_ready);
        r.advance(1.0);
        assert!(!r.is_pregnant && r.birth_ready);
        assert!(r.take_birth());
        assert!(!r.take_birth());
    }

    #[test]
    fn approach_snaps_at_the_target() {
        let mut pos = [0.0, 0.0];
        approach(&mut pos, [3.0, 4.0], 10.0);
        assert_eq!(pos, [3.0, 4.0]);

        let mut pos = [0.0, 0.0];
        approach(&mut pos, [3.0, 4.0], 1.0);
        assert!((pos[0] - 0.6).abs() < 1e-5);
        assert!((pos[1] - 0.8).abs() < 1e-5);
    }

    #[test]
    fn candidate_directions_respect_terrain() {
        let mut terrain = TerrainField::new();
        let origin = Axial::new(0, 0);
        terrain.insert_tile(origin, Terrain::Soil, 0.8);
        terrain.insert_tile(origin.neighbor(0), Terrain::Soil, 0.8);
        terrain.insert_tile(origin.neighbor(1), Terrain::Water, 0.5);
        terrain.insert_tile(origin.neighbor(2), Terrain::Rock, 0.2);
        // Directions 3..6 are ungenerated and must not be offered.

        let dirs = candidate_directions(origin, &[Terrain::Soil, Terrain::Rock], &terrain);
        assert_eq!(dirs, vec![0, 2]);
        let dirs = candidate_directions(origin, &[Terrain::Water], &terrain);
        assert_eq!(dirs, vec![1]);
    }

    #[test]
    fn fire_filter_never_empties_the_set() {
        let origin = Axial::new(0, 0);
        let mut fire = FireField::new();
        fire.ignite(origin.neighbor(0));

        let mut dirs: Vec<usize> = (0..6).collect();
        retain_unburning(origin, &mut dirs, &fire);
        assert_eq!(dirs, vec![1, 2, 3, 4, 5]);

        // All destinations burning: the set is left untouched.
        for n in origin.neighbors() {
            fire.ignite(n);
        }
        let mut dirs: Vec<usize> = (0..6).collect();
        retain_unburning(origin, &mut dirs, &fire);
        assert_eq!(dirs.len(), 6);
    }

    #[test]
    fn toward_and_away_partition_by_distance() {
        let origin = Axial::new(0, 0);
        let target = Axial::new(3, 0);
        let dirs: Vec<usize> = (0..6).collect();
        let toward = directions_toward(origin, &dirs, target);
        let away = directions_away(origin, &dirs, target);
        for &dir in &toward {
            assert!(origin.neighbor(dir).distance(target) < 3);
        }
        for &dir in &away {
            assert!(origin.neighbor(dir).distance(target) > 3);
        }
        assert!(!toward.is_empty());
        assert!(!away.is_empty());
        for &dir in &toward {
            assert!(!away.contains(&dir));
        }
    }

    #[test]
    fn choose_direction_is_deterministic_per_seed() {
        let dirs = vec![0, 2, 4, 5];
        let mut a = ChaCha12Rng::seed_from_u64(9);
        let mut b = ChaCha12Rng::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(choose_direction(&dirs, &mut a), choose_direction(&dirs, &mut b));
        }
    }
}
