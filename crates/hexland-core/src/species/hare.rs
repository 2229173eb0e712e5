use super::{
    approach, candidate_directions, choose_direction, die, directions_away, retain_unburning,
    water_directions, Creature, PredatorSighting, Reproduction, THIRST_CRITICAL,
    THIRST_SEEK_WATER,
};
use crate::fire::FireField;
use crate::genome::HareGenome;
use crate::hex::Axial;
use crate::plant::PlantField;
use crate::terrain::{Terrain, TerrainField};
use crate::visibility::{visibility, Rgb};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::collections::BTreeSet;

pub const INITIAL_ENERGY: f32 = 1.0;
pub const ENERGY_CAP: f32 = 2.0;
const ENERGY_DECAY: f32 = 0.004;
const THIRST_DECAY: f32 = 0.008;
const DRINK_RATE: f32 = 0.5;
const DIGESTION_LOCK: f32 = 2.0;
const EAT_LOCK: f32 = 2.0;
const MOVE_COOLDOWN: f32 = 0.4;
const MOVE_COST: f32 = 0.05;
const PREGNANCY_DURATION: f32 = 20.0;
const POST_REPRODUCTION_ENERGY: f32 = 0.9;
pub const VISION_RANGE: i32 = 3;
const SIGHT_THRESHOLD: f32 = 0.1;
const ANIM_SPEED: f32 = 50.0;

const BASE_COLOR: Rgb = Rgb::new(210, 180, 140);
const BURROW_COLOR: Rgb = Rgb::new(128, 128, 128);

/// Herbivore. Eats plants, flees (or hides from) predators, and is the prey
/// of both predator species.
#[derive(Clone, Debug)]
pub struct Hare {
    pub coord: Axial,
    pub energy: f32,
    pub thirst: f32,
    pub genome: HareGenome,
    pub reproduction: Reproduction,
    /// A hiding hare stays put and is invisible to adjacency hunts.
    pub burrowed: bool,
    digestion: f32,
    eat_lock: f32,
    /// One-shot: set when eating, discharged the first time digestion
    /// reaches zero by planting a seed on the cell below.
    seed_armed: bool,
    move_timer: f32,
    alive: bool,
    display_pos: [f32; 2],
}

impl Hare {
    pub fn new(coord: Axial, genome: HareGenome, hex_size: f32) -> Self {
        Self {
            coord,
            energy: INITIAL_ENERGY,
            thirst: 1.0,
            genome,
            reproduction: Reproduction::default(),
            burrowed: false,
            digestion: 0.0,
            eat_lock: 0.0,
            seed_armed: false,
            move_timer: 0.0,
            alive: true,
            display_pos: coord.to_pixel(hex_size),
        }
    }

    /// Display color derived from the genome: fear pales, weight darkens.
    pub fn color(&self) -> Rgb {
        if self.burrowed {
            return BURROW_COLOR;
        }
        let shift = (1.0 - self.genome.fear) * 50.0 - (self.genome.weight - 1.0) * 50.0;
        let channel = |c: u8| (c as f32 + shift).clamp(0.0, 255.0) as u8;
        Rgb::new(channel(BASE_COLOR.r), channel(BASE_COLOR.g), channel(BASE_COLOR.b))
    }

    pub fn speed(&self) -> f32 {
        self.genome.speed()
    }

    /// Nearest predator within vision range whose color stands out against
    /// the terrain it occupies.
    fn nearest_visible_predator(
        &self,
        predators: &[PredatorSighting],
        terrain: &TerrainField,
    ) -> Option<Axial> {
        let mut closest: Option<(i32, Axial)> = None;
        for sighting in predators {
            let dist = self.coord.distance(sighting.coord);
            if dist == 0 || dist > VISION_RANGE {
                continue;
            }
            if visibility(sighting.color, terrain.terrain_at(sighting.coord)) <= SIGHT_THRESHOLD {
                continue;
            }
            if closest.map_or(true, |(best, _)| dist < best) {
                closest = Some((dist, sighting.coord));
            }
        }
        closest.map(|(_, coord)| coord)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn tick(
        &mut self,
        dt: f32,
        hex_size: f32,
        terrain: &mut TerrainField,
        plants: &mut PlantField,
        fire: &FireField,
        predators: &[PredatorSighting],
        occupied: &mut BTreeSet<Axial>,
        rng: &mut ChaCha12Rng,
    ) {
        if !self.alive {
            return;
        }
        approach(&mut self.display_pos, self.coord.to_pixel(hex_size), ANIM_SPEED * dt);

        self.energy = (self.energy - ENERGY_DECAY * dt).max(0.0);
        self.thirst = (self.thirst - THIRST_DECAY * dt).max(0.0);

        if terrain.terrain_at(self.coord) == Terrain::Water {
            self.thirst = (self.thirst + DRINK_RATE * dt).min(1.0);
        }

        if self.digestion > 0.0 {
            self.digestion -= dt;
            if self.digestion <= 0.0 && self.seed_armed {
                self.seed_armed = false;
                if terrain.contains(self.coord)
                    && terrain.terrain_at(self.coord) == Terrain::Soil
                    && !plants.contains(self.coord)
                {
                    plants.spawn_seed(self.coord, terrain.nutrients_at(self.coord));
                }
            }
        }
        if self.eat_lock > 0.0 {
            self.eat_lock -= dt;
        }

        if self.digestion <= 0.0 {
            if let Some(plant) = plants.get(self.coord) {
                if plant.stage.is_edible() {
                    let gained = plant.stage.energy_value();
                    plants.remove(self.coord);
                    self.energy = (self.energy + gained).min(ENERGY_CAP);
                    self.digestion = DIGESTION_LOCK;
                    self.eat_lock = EAT_LOCK;
                    self.seed_armed = true;
                }
            }
        }

        if self.energy >= self.genome.reproduction_threshold && !self.reproduction.is_pregnant {
            self.reproduction.conceive(PREGNANCY_DURATION);
            self.energy = POST_REPRODUCTION_ENERGY;
        }
        self.reproduction.advance(dt);

        let threat = self.nearest_visible_predator(predators, terrain);
        if self.genome.can_hide {
            self.burrowed = threat.is_some();
        }

        self.move_timer += dt;
        if self.eat_lock <= 0.0
            && !self.burrowed
            && self.move_timer >= MOVE_COOLDOWN
            && self.energy > 0.0
        {
            let mut allowed = vec![Terrain::Soil, Terrain::Rock];
            if self.thirst < THIRST_SEEK_WATER {
                allowed.push(Terrain::Water);
            }
            let mut dirs = candidate_directions(self.coord, &allowed, terrain);
            // One hare per cell.
            dirs.retain(|&dir| !occupied.contains(&self.coord.neighbor(dir)));

            if !dirs.is_empty() {
                retain_unburning(self.coord, &mut dirs, fire);

                let water = if self.thirst < THIRST_SEEK_WATER {
                    water_directions(self.coord, &dirs, terrain)
                } else {
                    Vec::new()
                };
                if self.thirst < THIRST_CRITICAL && !water.is_empty() {
                    dirs = water;
                } else if let Some(threat_coord) = threat {
                    if rng.random::<f32>() < self.genome.fear {
                        let away = directions_away(self.coord, &dirs, threat_coord);
                        if !away.is_empty() {
                            dirs = away;
                        }
                    }
                }

                let dir = choose_direction(&dirs, rng);
                occupied.remove(&self.coord);
                self.coord = self.coord.neighbor(dir);
                occupied.insert(self.coord);
                self.energy =
                    (self.energy - MOVE_COST / self.genome.movement_efficiency).max(0.0);
                self.move_timer = 0.0;
            }
        }

        if self.energy <= 0.0 {
            log::debug!("hare starved at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        } else if self.thirst <= 0.0 {
            log::debug!("hare dehydrated at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        }
    }
}

impl Creature for Hare {
    const NUTRIENT_DEPOSIT: f32 = 0.3;

    fn coord(&self) -> Axial {
        self.coord
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn mark_dead(&mut self) {
        self.alive = false;
    }

    fn display_position(&self) -> [f32; 2] {
        self.display_pos
    }
}
