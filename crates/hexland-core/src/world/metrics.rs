use super::World;
use crate::hex::Axial;
use crate::plant::PlantStage;
use crate::species::Creature;
use crate::terrain::Terrain;
use crate::visibility::Rgb;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub hares: usize,
    pub foxes: usize,
    pub wolves: usize,
    pub salmon: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantStageCounts {
    pub seeds: usize,
    pub sprouts: usize,
    pub mature: usize,
    pub charred: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepMetrics {
    pub tick: u64,
    pub populations: PopulationCounts,
    pub plants: PlantStageCounts,
    pub fires: usize,
    pub births: usize,
    pub deaths: usize,
    pub mean_hare_energy: f32,
    pub mean_fox_energy: f32,
    pub mean_wolf_energy: f32,
    pub mean_salmon_energy: f32,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub dt: f32,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    pub final_counts: PopulationCounts,
    pub total_births: usize,
    pub total_deaths: usize,
}

// Read-only render views handed to the presentation layer.

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TileView {
    pub coord: Axial,
    pub terrain: Terrain,
    pub nutrients: f32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlantView {
    pub coord: Axial,
    pub stage: PlantStage,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FireView {
    pub coord: Axial,
    /// Remaining burn time as a fraction of the full duration.
    pub remaining: f32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CreatureView {
    pub coord: Axial,
    /// Interpolated pixel-space position for smooth rendering.
    pub position: [f32; 2],
    pub color: Rgb,
    pub alive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub tiles: Vec<TileView>,
    pub plants: Vec<PlantView>,
    pub fires: Vec<FireView>,
    pub hares: Vec<CreatureView>,
    pub foxes: Vec<CreatureView>,
    pub wolves: Vec<CreatureView>,
    pub salmon: Vec<CreatureView>,
}

fn mean_energy(energies: impl Iterator<Item = f32>) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for e in energies {
        sum += e;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

impl World {
    pub fn population_counts(&self) -> PopulationCounts {
        PopulationCounts {
            hares: self.hares.iter().filter(|h| h.is_alive()).count(),
            foxes: self.foxes.iter().filter(|f| f.is_alive()).count(),
            wolves: self.wolves.iter().filter(|w| w.is_alive()).count(),
            salmon: self.salmon.iter().filter(|s| s.is_alive()).count(),
        }
    }

    pub fn plant_stage_counts(&self) -> PlantStageCounts {
        let [seeds, sprouts, mature, charred] = self.plants.stage_counts();
        PlantStageCounts {
            seeds,
            sprouts,
            mature,
            charred,
        }
    }

    pub fn collect_step_metrics(&self) -> StepMetrics {
        StepMetrics {
            tick: self.tick_index,
            populations: self.population_counts(),
            plants: self.plant_stage_counts(),
            fires: self.fire.len(),
            births: self.births_last_tick,
            deaths: self.deaths_last_tick,
            mean_hare_energy: mean_energy(
                self.hares.iter().filter(|h| h.is_alive()).map(|h| h.energy),
            ),
            mean_fox_energy: mean_energy(
                self.foxes.iter().filter(|f| f.is_alive()).map(|f| f.energy),
            ),
            mean_wolf_energy: mean_energy(
                self.wolves.iter().filter(|w| w.is_alive()).map(|w| w.energy),
            ),
            mean_salmon_energy: mean_energy(
                self.salmon.iter().filter(|s| s.is_alive()).map(|s| s.energy),
            ),
        }
    }

    /// Everything the presentation layer needs to draw one frame.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick_index,
            tiles: self
                .terrain
                .iter()
                .map(|(coord, tile)| TileView {
                    coord: *coord,
                    terrain: tile.terrain,
                    nutrients: tile.nutrients,
                })
                .collect(),
            plants: self
                .plants
                .iter()
                .map(|(coord, plant)| PlantView {
                    coord: *coord,
                    stage: plant.stage,
                })
                .collect(),
            fires: self
                .fire
                .iter()
                .map(|(coord, _)| FireView {
                    coord: *coord,
                    remaining: self.fire.burn_fraction(*coord),
                })
                .collect(),
            hares: self
                .hares
                .iter()
                .map(|h| CreatureView {
                    coord: h.coord,
                    position: h.display_position(),
                    color: h.color(),
                    alive: h.is_alive(),
                })
                .collect(),
            foxes: self
                .foxes
                .iter()
                .map(|f| CreatureView {
                    coord: f.coord,
                    position: f.display_position(),
                    color: f.color(),
                    alive: f.is_alive(),
                })
                .collect(),
            wolves: self
                .wolves
                .iter()
                .map(|w| CreatureView {
                    coord: w.coord,
                    position: w.display_position(),
                    color: w.color(),
                    alive: w.is_alive(),
                })
                .collect(),
            salmon: self
                .salmon
                .iter()
                .map(|s| CreatureView {
                    coord: s.coord,
                    position: s.display_position(),
                    color: s.color(),
                    alive: s.is_alive(),
                })
                .collect(),
        }
    }

    /// Drive the simulation for `steps` fixed-size ticks, sampling metrics
    /// every `sample_every` ticks (clamped to at least 1) and always on the
    /// final tick.
    pub fn run(&mut self, steps: usize, dt: f32, sample_every: usize) -> RunSummary {
        let sample_every = sample_every.max(1);
        let mut samples = Vec::with_capacity(steps / sample_every + 1);
        for step in 1..=steps {
            self.tick(dt);
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics());
            }
        }
        RunSummary {
            schema_version: 1,
            steps,
            dt,
            sample_every,
            samples,
            final_counts: self.population_counts(),
            total_births: self.total_births,
            total_deaths: self.total_deaths,
        }
    }
}
