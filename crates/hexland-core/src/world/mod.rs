pub mod lifecycle;
pub mod metrics;

pub use metrics::*;

use crate::config::{ConfigError, WorldConfig};
use crate::fire::FireField;
use crate::genome::{FoxGenome, HareGenome, SalmonGenome, WolfGenome};
use crate::hex::Axial;
use crate::plant::PlantField;
use crate::species::{Creature, Fox, Hare, PredatorSighting, Salmon, Wolf};
use crate::terrain::{Terrain, TerrainField};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::collections::BTreeSet;

/// Chance for a freshly generated soil cell to start with a seed plant.
const INITIAL_PLANT_PERCENT: u32 = 10;

/// The whole ecosystem: terrain, plants, fire, and the four populations,
/// advanced by an externally clocked tick.
///
/// All randomness flows through the single seeded `rng`, so identical
/// configs fed identical tick deltas reproduce identical trajectories.
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) terrain: TerrainField,
    pub(crate) plants: PlantField,
    pub(crate) fire: FireField,
    pub(crate) hares: Vec<Hare>,
    pub(crate) foxes: Vec<Fox>,
    pub(crate) wolves: Vec<Wolf>,
    pub(crate) salmon: Vec<Salmon>,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) tick_index: u64,
    pub(crate) births_last_tick: usize,
    pub(crate) deaths_last_tick: usize,
    pub(crate) total_births: usize,
    pub(crate) total_deaths: usize,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = Self {
            terrain: TerrainField::new(),
            plants: PlantField::new(),
            fire: FireField::new(),
            hares: Vec::new(),
            foxes: Vec::new(),
            wolves: Vec::new(),
            salmon: Vec::new(),
            rng: ChaCha12Rng::seed_from_u64(config.seed),
            tick_index: 0,
            births_last_tick: 0,
            deaths_last_tick: 0,
            total_births: 0,
            total_deaths: 0,
            config,
        };

        let origin = Axial::new(0, 0);
        world.terrain.generate(origin, &mut world.rng);
        world.maybe_seed_plant(origin);
        world.expand(world.config.world_radius);
        world.terrain.prune_isolated_water();
        world.spawn_populations();
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn plants(&self) -> &PlantField {
        &self.plants
    }

    pub fn fire(&self) -> &FireField {
        &self.fire
    }

    pub fn hares(&self) -> &[Hare] {
        &self.hares
    }

    pub fn foxes(&self) -> &[Fox] {
        &self.foxes
    }

    pub fn wolves(&self) -> &[Wolf] {
        &self.wolves
    }

    pub fn salmon(&self) -> &[Salmon] {
        &self.salmon
    }

    fn maybe_seed_plant(&mut self, coord: Axial) {
        if self.terrain.terrain_at(coord) == Terrain::Soil
            && self.rng.random_range(0..100) < INITIAL_PLANT_PERCENT
        {
            self.plants
                .spawn_seed(coord, self.terrain.nutrients_at(coord));
        }
    }

    /// Grow the world outward by `layers` rings, seeding plants on fresh soil.
    pub fn expand(&mut self, layers: u32) {
        for _ in 0..layers {
            let fresh = self.terrain.grow_layer(&mut self.rng);
            for coord in fresh {
                self.maybe_seed_plant(coord);
            }
        }
    }

    /// Explicit ignition event: set fire to a random existing plant cell.
    pub fn ignite_random_plant(&mut self) -> Option<Axial> {
        self.fire.ignite_random_plant(&self.plants, &mut self.rng)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Passes run in a fixed order (plants, fire, hares, foxes, wolves,
    /// salmon, fire kills, births, compaction); within a pass, iteration
    /// order decides contested resources: the first agent to reach a plant
    /// or prey takes it, and later agents in the same tick find it gone.
    pub fn tick(&mut self, dt: f32) {
        self.births_last_tick = 0;
        self.deaths_last_tick = 0;
        let hex_size = self.config.hex_size;

        self.plants.tick(dt, &self.terrain, &mut self.rng);
        self.fire.tick(dt, &mut self.plants, &mut self.rng);

        let predators: Vec<PredatorSighting> = self
            .foxes
            .iter()
            .filter(|f| f.is_alive())
            .map(|f| PredatorSighting {
                coord: f.coord,
                color: f.color(),
            })
            .chain(self.wolves.iter().filter(|w| w.is_alive()).map(|w| {
                PredatorSighting {
                    coord: w.coord,
                    color: w.color(),
                }
            }))
            .collect();
        let mut occupied: BTreeSet<Axial> = self
            .hares
            .iter()
            .filter(|h| h.is_alive())
            .map(|h| h.coord)
            .collect();
        for hare in &mut self.hares {
            hare.tick(
                dt,
                hex_size,
                &mut self.terrain,
                &mut self.plants,
                &self.fire,
                &predators,
                &mut occupied,
                &mut self.rng,
            );
        }

        let allies: Vec<Axial> = self
            .foxes
            .iter()
            .filter(|f| f.is_alive())
            .map(|f| f.coord)
            .collect();
        for fox in &mut self.foxes {
            fox.tick(
                dt,
                hex_size,
                &mut self.terrain,
                &self.fire,
                &mut self.hares,
                &allies,
                &mut self.rng,
            );
        }

        for wolf in &mut self.wolves {
            wolf.tick(
                dt,
                hex_size,
                &mut self.terrain,
                &self.fire,
                &mut self.hares,
                &mut self.foxes,
                &mut self.rng,
            );
        }

        for salmon in &mut self.salmon {
            salmon.tick(dt, hex_size, &mut self.terrain, &self.fire, &mut self.rng);
        }

        self.apply_fire_kills();
        self.process_births(hex_size);
        self.compact_dead();
        self.tick_index += 1;
    }

    fn spawn_populations(&mut self) {
        let hex_size = self.config.hex_size;
        let soil: Vec<Axial> = self
            .terrain
            .iter()
            .filter(|(_, tile)| tile.terrain == Terrain::Soil)
            .map(|(coord, _)| *coord)
            .collect();
        let water: Vec<Axial> = self
            .terrain
            .iter()
            .filter(|(_, tile)| tile.terrain == Terrain::Water)
            .map(|(coord, _)| *coord)
            .collect();

        // Hares claim distinct cells; the other species may co-locate.
        let mut free = soil.clone();
        for _ in 0..self.config.initial_hares {
            if free.is_empty() {
                log::warn!("ran out of soil cells while spawning hares");
                break;
            }
            let coord = free.swap_remove(self.rng.random_range(0..free.len()));
            let mut genome = HareGenome::default();
            genome.mutate(&mut self.rng);
            self.hares.push(Hare::new(coord, genome, hex_size));
        }

        for _ in 0..self.config.initial_foxes {
            if soil.is_empty() {
                log::warn!("no soil cells for foxes");
                break;
            }
            let coord = soil[self.rng.random_range(0..soil.len())];
            let mut genome = FoxGenome::default();
            genome.mutate(&mut self.rng);
            self.foxes.push(Fox::new(coord, genome, hex_size));
        }

        for _ in 0..self.config.initial_wolves {
            if soil.is_empty() {
                log::warn!("no soil cells for wolves");
                break;
            }
            let coord = soil[self.rng.random_range(0..soil.len())];
            let mut genome = WolfGenome::default();
            genome.mutate(&mut self.rng);
            self.wolves.push(Wolf::new(coord, genome, hex_size));
        }

        for _ in 0..self.config.initial_salmon {
            if water.is_empty() {
                log::warn!("no water cells for salmon");
                break;
            }
            let coord = water[self.rng.random_range(0..water.len())];
            let mut genome = SalmonGenome::default();
            genome.mutate(&mut self.rng);
            self.salmon.push(Salmon::new(coord, genome, hex_size));
        }

        log::info!(
            "world seeded: {} cells, {} plants, {} hares, {} foxes, {} wolves, {} salmon",
            self.terrain.len(),
            self.plants.len(),
            self.hares.len(),
            self.foxes.len(),
            self.wolves.len(),
            self.salmon.len(),
        );
    }
}
