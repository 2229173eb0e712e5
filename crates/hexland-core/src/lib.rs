//! Deterministic predator–prey ecosystem on a sparse, unbounded hex grid.
//!
//! Terrain carries nutrients, plants grow and disperse seeds, fire spreads
//! and regenerates, and four species (hare, fox, wolf, salmon) run
//! genome-driven behavior state machines every tick. A single seeded RNG
//! stream threads through every decision, so equal seeds and tick deltas
//! reproduce equal worlds.

pub mod config;
pub mod fire;
pub mod genome;
pub mod hex;
pub mod plant;
pub mod species;
pub mod terrain;
pub mod visibility;
pub mod world;
