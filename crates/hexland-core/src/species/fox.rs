use super::{
    approach, candidate_directions, choose_direction, die, directions_toward, retain_unburning,
    water_adjacent_directions, Creature, Hare, Reproduction, THIRST_CRITICAL, THIRST_SEEK_WATER,
};
use crate::fire::FireField;
use crate::genome::FoxGenome;
use crate::hex::Axial;
use crate::terrain::{Terrain, TerrainField};
use crate::visibility::{visibility, Rgb};
use rand::Rng;
use rand_chacha::ChaCha12Rng;

pub const INITIAL_ENERGY: f32 = 3.5;
pub const ENERGY_CAP: f32 = 6.0;
const ENERGY_DECAY: f32 = 0.008;
const THIRST_DECAY: f32 = 0.008;
const DRINK_RATE: f32 = 0.5;
const DIGESTION_LOCK: f32 = 10.0;
const MOVE_COOLDOWN: f32 = 0.4;
const MOVE_COST: f32 = 0.05;
const PREGNANCY_DURATION: f32 = 20.0;
const POST_REPRODUCTION_ENERGY: f32 = 1.5;
pub const VISION_RANGE: i32 = 3;
const SIGHT_THRESHOLD: f32 = 0.1;
/// Adjacency catches need visibility (with pack bonus) above this.
const CATCH_THRESHOLD: f32 = 0.3;
/// Multiplicative hunting boost per packmate adjacent to the hunter.
const PACK_BONUS_PER_ALLY: f32 = 0.2;
const ANIM_SPEED: f32 = 50.0;

pub const COLOR: Rgb = Rgb::new(255, 140, 0);

const ALLOWED_TERRAIN: [Terrain; 2] = [Terrain::Soil, Terrain::Rock];

/// Mid-tier predator. Hunts hares, with a pack bonus for adjacent foxes;
/// prey of the wolf.
#[derive(Clone, Debug)]
pub struct Fox {
    pub coord: Axial,
    pub energy: f32,
    pub thirst: f32,
    pub genome: FoxGenome,
    pub reproduction: Reproduction,
    digestion: f32,
    move_timer: f32,
    alive: bool,
    display_pos: [f32; 2],
}

impl Fox {
    pub fn new(coord: Axial, genome: FoxGenome, hex_size: f32) -> Self {
        Self {
            coord,
            energy: INITIAL_ENERGY,
            thirst: 1.0,
            genome,
            reproduction: Reproduction::default(),
            digestion: 0.0,
            move_timer: 0.0,
            alive: true,
            display_pos: coord.to_pixel(hex_size),
        }
    }

    pub fn color(&self) -> Rgb {
        COLOR
    }

    pub fn speed(&self) -> f32 {
        self.genome.speed()
    }

    /// Same-cell prey is an automatic catch; adjacent prey is caught when its
    /// visibility, scaled by the pack bonus, clears the threshold and the fox
    /// is faster. Returns whether prey was taken.
    fn hunt(&mut self, terrain: &TerrainField, hares: &mut [Hare], allies: &[Axial]) -> bool {
        if let Some(prey) = hares
            .iter_mut()
            .find(|h| h.is_alive() && h.coord == self.coord)
        {
            let gained = prey.energy;
            prey.mark_dead();
            self.energy = (self.energy + gained).min(ENERGY_CAP);
            log::debug!("fox caught hare at ({}, {})", self.coord.q, self.coord.r);
            return true;
        }

        let packmates = allies
            .iter()
            .filter(|a| a.distance(self.coord) == 1)
            .count();
        let pack_bonus = 1.0 + PACK_BONUS_PER_ALLY * packmates as f32;

        for dir in 0..6 {
            let cell = self.coord.neighbor(dir);
            if let Some(prey) = hares.iter_mut().find(|h| h.is_alive() && h.coord == cell) {
                let vis = if prey.burrowed {
                    0.0
                } else {
                    visibility(prey.color(), terrain.terrain_at(cell))
                };
                if vis * pack_bonus > CATCH_THRESHOLD && self.speed() > prey.speed() {
                    let gained = prey.energy;
                    prey.mark_dead();
                    self.energy = (self.energy + gained).min(ENERGY_CAP);
                    log::debug!("fox caught hare at ({}, {})", cell.q, cell.r);
                    return true;
                }
            }
        }
        false
    }

    fn nearest_visible_hare(&self, hares: &[Hare], terrain: &TerrainField) -> Option<Axial> {
        let mut closest: Option<(i32, Axial)> = None;
        for hare in hares.iter().filter(|h| h.is_alive() && !h.burrowed) {
            let dist = self.coord.distance(hare.coord);
            if dist == 0 || dist > VISION_RANGE {
                continue;
            }
            if visibility(hare.color(), terrain.terrain_at(hare.coord)) <= SIGHT_THRESHOLD {
                continue;
            }
            if closest.map_or(true, |(best, _)| dist < best) {
                closest = Some((dist, hare.coord));
            }
        }
        closest.map(|(_, coord)| coord)
    }

    pub(crate) fn tick(
        &mut self,
        dt: f32,
        hex_size: f32,
        terrain: &mut TerrainField,
        fire: &FireField,
        hares: &mut [Hare],
        allies: &[Axial],
        rng: &mut ChaCha12Rng,
    ) {
        if !self.alive {
            return;
        }
        approach(&mut self.display_pos, self.coord.to_pixel(hex_size), ANIM_SPEED * dt);

        self.energy = (self.energy - ENERGY_DECAY * dt).max(0.0);
        self.thirst = (self.thirst - THIRST_DECAY * dt).max(0.0);

        // Drinks at the water's edge; never enters water itself.
        if self
            .coord
            .neighbors()
            .iter()
            .any(|n| terrain.terrain_at(*n) == Terrain::Water)
        {
            self.thirst = (self.thirst + DRINK_RATE * dt).min(1.0);
        }

        self.digestion -= dt;
        if self.digestion <= 0.0 && self.hunt(terrain, hares, allies) {
            self.digestion = DIGESTION_LOCK;
        }

        if self.energy >= self.genome.reproduction_threshold && !self.reproduction.is_pregnant {
            self.reproduction.conceive(PREGNANCY_DURATION);
            self.energy = POST_REPRODUCTION_ENERGY;
        }
        self.reproduction.advance(dt);

        self.move_timer += dt;
        if self.move_timer >= MOVE_COOLDOWN && self.energy > 0.0 {
            let mut dirs = candidate_directions(self.coord, &ALLOWED_TERRAIN, terrain);
            if !dirs.is_empty() {
                retain_unburning(self.coord, &mut dirs, fire);

                let water = if self.thirst < THIRST_SEEK_WATER {
                    water_adjacent_directions(self.coord, &dirs, terrain)
                } else {
                    Vec::new()
                };
                if self.thirst < THIRST_CRITICAL && !water.is_empty() {
                    dirs = water;
                } else if let Some(prey) = self.nearest_visible_hare(hares, terrain) {
                    if rng.random::<f32>() < self.genome.hunting_aggression {
                        let toward = directions_toward(self.coord, &dirs, prey);
                        if !toward.is_empty() {
                            dirs = toward;
                        }
                    }
                }

                let dir = choose_direction(&dirs, rng);
                self.coord = self.coord.neighbor(dir);
                self.energy =
                    (self.energy - MOVE_COST / self.genome.movement_efficiency).max(0.0);
                self.move_timer = 0.0;
            }
        }

        if self.energy <= 0.0 {
            log::debug!("fox starved at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        } else if self.thirst <= 0.0 {
            log::debug!("fox dehydrated at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        }
    }
}

impl Creature for Fox {
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
