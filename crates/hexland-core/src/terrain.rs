use crate::hex::Axial;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terrain {
    Soil,
    Water,
    Rock,
}

impl Terrain {
    fn base_nutrients(self) -> f32 {
        match self {
            Terrain::Soil => 0.8,
            Terrain::Water => 0.5,
            Terrain::Rock => 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    /// Soil fertility in [0, 1]; drives plant growth speed and quality.
    pub nutrients: f32,
}

/// Sparse terrain map, grown outward on demand from the origin.
///
/// Keyed by a sorted map so iteration (and therefore RNG consumption during
/// layer growth) is identical across runs with the same seed.
#[derive(Clone, Debug, Default)]
pub struct TerrainField {
    tiles: BTreeMap<Axial, Tile>,
}

/// Weighted fresh-cell roll: 20% rock, 40% soil, 40% water.
fn roll_terrain(rng: &mut ChaCha12Rng) -> Terrain {
    match rng.random_range(0..10) {
        0 | 1 => Terrain::Rock,
        2..=5 => Terrain::Soil,
        _ => Terrain::Water,
    }
}

impl TerrainField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coord: Axial) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn tile(&self, coord: Axial) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Terrain at `coord`, defaulting to `Soil` for ungenerated cells.
    pub fn terrain_at(&self, coord: Axial) -> Terrain {
        self.tiles.get(&coord).map_or(Terrain::Soil, |t| t.terrain)
    }

    pub fn nutrients_at(&self, coord: Axial) -> f32 {
        self.tiles.get(&coord).map_or(0.0, |t| t.nutrients)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Axial, &Tile)> {
        self.tiles.iter()
    }

    /// Generate the cell at `coord` if it does not exist yet.
    ///
    /// Terrain adopts the plurality type among already-generated neighbors
    /// (ties broken by enumeration order), with a 30% chance of an
    /// independent weighted roll instead; cells with no generated neighbors
    /// always take the weighted roll. Returns true if a cell was created.
    pub fn generate(&mut self, coord: Axial, rng: &mut ChaCha12Rng) -> bool {
        if self.contains(coord) {
            return false;
        }

        let mut neighbor_counts = [0usize; 3];
        let mut has_neighbors = false;
        for n in coord.neighbors() {
            if let Some(tile) = self.tiles.get(&n) {
                neighbor_counts[tile.terrain as usize] += 1;
                has_neighbors = true;
            }
        }

        let terrain = if !has_neighbors || rng.random::<f64>() < 0.3 {
            roll_terrain(rng)
        } else {
            let mut most_common = Terrain::Soil;
            let mut max_count = 0;
            for (idx, &count) in neighbor_counts.iter().enumerate() {
                if count > max_count {
                    max_count = count;
                    most_common = match idx {
                        0 => Terrain::Soil,
                        1 => Terrain::Water,
                        _ => Terrain::Rock,
                    };
                }
            }
            most_common
        };

        let noise: f32 = rng.random_range(-0.2..0.2);
        let nutrients = (terrain.base_nutrients() + noise).clamp(0.0, 1.0);
        self.tiles.insert(coord, Tile { terrain, nutrients });
        true
    }

    /// Generate every missing neighbor of every known cell, returning the
    /// newly created coordinates in sorted order.
    pub fn grow_layer(&mut self, rng: &mut ChaCha12Rng) -> Vec<Axial> {
        let frontier: BTreeSet<Axial> = self
            .tiles
            .keys()
            .flat_map(|c| c.neighbors())
            .filter(|n| !self.tiles.contains_key(n))
            .collect();

        let mut created = Vec::with_capacity(frontier.len());
        for coord in frontier {
            if self.generate(coord, rng) {
                created.push(coord);
            }
        }
        created
    }

    /// World-setup pass: remove water tiles with no water neighbor, so the
    /// map has no unusable single-cell ponds. Returns the pruned coordinates.
    pub fn prune_isolated_water(&mut self) -> Vec<Axial> {
        let isolated: Vec<Axial> = self
            .tiles
            .iter()
            .filter(|(coord, tile)| {
                tile.terrain == Terrain::Water
                    && !coord
                        .neighbors()
                        .iter()
                        .any(|n| self.terrain_at(*n) == Terrain::Water)
            })
            .map(|(coord, _)| *coord)
            .collect();
        for coord in &isolated {
            self.tiles.remove(coord);
        }
        isolated
    }

    /// Return nutrients to a soil cell, capped at 1.0. No-op elsewhere.
    pub fn deposit(&mut self, coord: Axial, amount: f32) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            if tile.terrain == Terrain::Soil {
                tile.nutrients = (tile.nutrients + amount).min(1.0);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_tile(&mut self, coord: Axial, terrain: Terrain, nutrients: f32) {
        self.tiles.insert(coord, Tile { terrain, nutrients });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn generate_is_idempotent() {
        let mut field = TerrainField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        assert!(field.generate(Axial::new(0, 0), &mut rng));
        let before = *field.tile(Axial::new(0, 0)).unwrap();
        assert!(!field.generate(Axial::new(0, 0), &mut rng));
        let after = *field.tile(Axial::new(0, 0)).unwrap();
        assert_eq!(before.terrain, after.terrain);
        assert_eq!(before.nutrients, after.nutrients);
    }

    #[test]
    fn nutrients_stay_in_bounds() {
        let mut field = TerrainField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(99);
        field.generate(Axial::new(0, 0), &mut rng);
        for _ in 0..6 {
            field.grow_layer(&mut rng);
        }
        assert!(field.len() > 100);
        for (_, tile) in field.iter() {
            assert!((0.0..=1.0).contains(&tile.nutrients));
        }
    }

    #[test]
    fn missing_cells_default_to_soil() {
        let field = TerrainField::new();
        assert_eq!(field.terrain_at(Axial::new(40, -12)), Terrain::Soil);
        assert!(!field.contains(Axial::new(40, -12)));
    }

    #[test]
    fn grow_layer_adds_the_full_ring() {
        let mut field = TerrainField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        field.generate(Axial::new(0, 0), &mut rng);
        let created = field.grow_layer(&mut rng);
        assert_eq!(created.len(), 6);
        for n in Axial::new(0, 0).neighbors() {
            assert!(field.contains(n));
        }
    }

    #[test]
    fn isolated_water_is_pruned() {
        let mut field = TerrainField::new();
        field.insert_tile(Axial::new(0, 0), Terrain::Water, 0.5);
        for n in Axial::new(0, 0).neighbors() {
            field.insert_tile(n, Terrain::Soil, 0.8);
        }
        // A two-cell pond elsewhere survives.
        field.insert_tile(Axial::new(10, 0), Terrain::Water, 0.5);
        field.insert_tile(Axial::new(10, 1), Terrain::Water, 0.5);

        let pruned = field.prune_isolated_water();
        assert_eq!(pruned, vec![Axial::new(0, 0)]);
        assert!(!field.contains(Axial::new(0, 0)));
        assert!(field.contains(Axial::new(10, 0)));
        assert!(field.contains(Axial::new(10, 1)));
    }

    #[test]
    fn deposit_caps_at_one_and_skips_non_soil() {
        let mut field = TerrainField::new();
        field.insert_tile(Axial::new(0, 0), Terrain::Soil, 0.9);
        field.insert_tile(Axial::new(1, 0), Terrain::Rock, 0.2);
        field.deposit(Axial::new(0, 0), 0.3);
        field.deposit(Axial::new(1, 0), 0.3);
        assert_eq!(field.nutrients_at(Axial::new(0, 0)), 1.0);
        assert_eq!(field.nutrients_at(Axial::new(1, 0)), 0.2);
    }
}
