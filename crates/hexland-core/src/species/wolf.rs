use super::{
    approach, candidate_directions, choose_direction, die, directions_toward, retain_unburning,
    water_adjacent_directions, Creature, Fox, Hare, Reproduction, THIRST_CRITICAL,
    THIRST_SEEK_WATER,
};
use crate::fire::FireField;
use crate::genome::WolfGenome;
use crate::hex::Axial;
use crate::terrain::{Terrain, TerrainField};
use crate::visibility::{visibility, Rgb};
use rand::Rng;
use rand_chacha::ChaCha12Rng;

pub const INITIAL_ENERGY: f32 = 5.0;
pub const ENERGY_CAP: f32 = 8.0;
const ENERGY_DECAY: f32 = 0.01;
const THIRST_DECAY: f32 = 0.009;
const DRINK_RATE: f32 = 0.5;
const DIGESTION_LOCK: f32 = 15.0;
const MOVE_COOLDOWN: f32 = 0.6;
const MOVE_MIN_ENERGY: f32 = 2.0;
const MOVE_COST: f32 = 0.08;
const PREGNANCY_DURATION: f32 = 25.0;
const POST_REPRODUCTION_ENERGY: f32 = 4.0;
pub const VISION_RANGE: i32 = 4;
/// Wolves both sight and catch at this visibility; they have no pack bonus.
const CATCH_THRESHOLD: f32 = 0.2;
const ANIM_SPEED: f32 = 200.0;

pub const COLOR: Rgb = Rgb::new(64, 64, 64);

const ALLOWED_TERRAIN: [Terrain; 2] = [Terrain::Soil, Terrain::Rock];

/// Apex predator. Hunts hares and foxes; nothing hunts it.
#[derive(Clone, Debug)]
pub struct Wolf {
    pub coord: Axial,
    pub energy: f32,
    pub thirst: f32,
    pub genome: WolfGenome,
    pub reproduction: Reproduction,
    digestion: f32,
    move_timer: f32,
    alive: bool,
    display_pos: [f32; 2],
}

impl Wolf {
    pub fn new(coord: Axial, genome: WolfGenome, hex_size: f32) -> Self {
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

    /// Same-cell prey (hare first, then fox) is automatic; adjacent prey
    /// needs visibility above the threshold and a speed advantage. Burrowed
    /// hares escape the adjacency scan but not a same-cell catch.
    fn hunt(&mut self, terrain: &TerrainField, hares: &mut [Hare], foxes: &mut [Fox]) -> bool {
        if let Some(prey) = hares
            .iter_mut()
            .find(|h| h.is_alive() && h.coord == self.coord)
        {
            let gained = prey.energy;
            prey.mark_dead();
            self.energy = (self.energy + gained).min(ENERGY_CAP);
            log::debug!("wolf caught hare at ({}, {})", self.coord.q, self.coord.r);
            return true;
        }
        if let Some(prey) = foxes
            .iter_mut()
            .find(|f| f.is_alive() && f.coord == self.coord)
        {
            let gained = prey.energy;
            prey.mark_dead();
            self.energy = (self.energy + gained).min(ENERGY_CAP);
            log::debug!("wolf caught fox at ({}, {})", self.coord.q, self.coord.r);
            return true;
        }

        for dir in 0..6 {
            let cell = self.coord.neighbor(dir);
            if let Some(prey) = hares
                .iter_mut()
                .find(|h| h.is_alive() && !h.burrowed && h.coord == cell)
            {
                let vis = visibility(prey.color(), terrain.terrain_at(cell));
                if vis > CATCH_THRESHOLD && self.speed() > prey.speed() {
                    let gained = prey.energy;
                    prey.mark_dead();
                    self.energy = (self.energy + gained).min(ENERGY_CAP);
                    log::debug!("wolf caught hare at ({}, {})", cell.q, cell.r);
                    return true;
                }
            }
            if let Some(prey) = foxes.iter_mut().find(|f| f.is_alive() && f.coord == cell) {
                let vis = visibility(prey.color(), terrain.terrain_at(cell));
                if vis > CATCH_THRESHOLD && self.speed() > prey.speed() {
                    let gained = prey.energy;
                    prey.mark_dead();
                    self.energy = (self.energy + gained).min(ENERGY_CAP);
                    log::debug!("wolf caught fox at ({}, {})", cell.q, cell.r);
                    return true;
                }
            }
        }
        false
    }

    fn nearest_visible_prey(
        &self,
        hares: &[Hare],
        foxes: &[Fox],
        terrain: &TerrainField,
    ) -> Option<Axial> {
        let mut closest: Option<(i32, Axial)> = None;
        let mut consider = |coord: Axial, color: Rgb| {
            let dist = self.coord.distance(coord);
            if dist == 0 || dist > VISION_RANGE {
                return;
            }
            if visibility(color, terrain.terrain_at(coord)) <= CATCH_THRESHOLD {
                return;
            }
            if closest.map_or(true, |(best, _)| dist < best) {
                closest = Some((dist, coord));
            }
        };
        for hare in hares.iter().filter(|h| h.is_alive() && !h.burrowed) {
            consider(hare.coord, hare.color());
        }
        for fox in foxes.iter().filter(|f| f.is_alive()) {
            consider(fox.coord, fox.color());
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
        foxes: &mut [Fox],
        rng: &mut ChaCha12Rng,
    ) {
        if !self.alive {
            return;
        }
        approach(&mut self.display_pos, self.coord.to_pixel(hex_size), ANIM_SPEED * dt);

        self.energy = (self.energy - ENERGY_DECAY * dt).max(0.0);
        self.thirst = (self.thirst - THIRST_DECAY * dt).max(0.0);

        if self
            .coord
            .neighbors()
            .iter()
            .any(|n| terrain.terrain_at(*n) == Terrain::Water)
        {
            self.thirst = (self.thirst + DRINK_RATE * dt).min(1.0);
        }

        self.digestion -= dt;
        if self.digestion <= 0.0 && self.hunt(terrain, hares, foxes) {
            self.digestion = DIGESTION_LOCK;
        }

        if self.energy >= self.genome.reproduction_threshold && !self.reproduction.is_pregnant {
            self.reproduction.conceive(PREGNANCY_DURATION);
            self.energy = POST_REPRODUCTION_ENERGY;
        }
        self.reproduction.advance(dt);

        self.move_timer += dt;
        if self.move_timer >= MOVE_COOLDOWN && self.energy > MOVE_MIN_ENERGY {
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
                } else if let Some(prey) = self.nearest_visible_prey(hares, foxes, terrain) {
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
            log::debug!("wolf starved at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        } else if self.thirst <= 0.0 {
            log::debug!("wolf dehydrated at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        }
    }
}

impl Creature for Wolf {
    const NUTRIENT_DEPOSIT: f32 = 0.4;

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{FoxGenome, HareGenome};

    fn soil_field() -> TerrainField {
        let mut terrain = TerrainField::new();
        for q in -3..=3 {
            for r in -3..=3 {
                terrain.insert_tile(Axial::new(q, r), Terrain::Soil, 0.8);
            }
        }
        terrain
    }

    #[test]
    fn same_cell_fox_is_taken_when_no_hare_shares_the_cell() {
        let terrain = soil_field();
        let origin = Axial::new(0, 0);
        let mut wolf = Wolf::new(origin, WolfGenome::default(), 18.0);
        let mut hares: Vec<Hare> = Vec::new();
        let mut foxes = vec![Fox::new(origin, FoxGenome::default(), 18.0)];
        foxes[0].energy = 2.0;

        assert!(wolf.hunt(&terrain, &mut hares, &mut foxes));
        assert!(!foxes[0].is_alive());
        assert!((wolf.energy - 7.0).abs() < 1e-5);
    }

    #[test]
    fn hares_are_preferred_over_foxes_on_the_same_cell() {
        let terrain = soil_field();
        let origin = Axial::new(0, 0);
        let mut wolf = Wolf::new(origin, WolfGenome::default(), 18.0);
        let mut hares = vec![Hare::new(origin, HareGenome::default(), 18.0)];
        let mut foxes = vec![Fox::new(origin, FoxGenome::default(), 18.0)];

        assert!(wolf.hunt(&terrain, &mut hares, &mut foxes));
        assert!(!hares[0].is_alive());
        assert!(foxes[0].is_alive());
    }

    #[test]
    fn adjacent_fox_outruns_the_wolf() {
        // Fox speed (≥ 1.5) always beats wolf speed (≤ 1.5): foxes are only
        // ever taken on the wolf's own cell.
        let terrain = soil_field();
        let origin = Axial::new(0, 0);
        let mut wolf = Wolf::new(origin, WolfGenome::default(), 18.0);
        let mut hares: Vec<Hare> = Vec::new();
        let mut foxes = vec![Fox::new(origin.neighbor(0), FoxGenome::default(), 18.0)];

        assert!(!wolf.hunt(&terrain, &mut hares, &mut foxes));
        assert!(foxes[0].is_alive());
    }

    #[test]
    fn adjacent_hare_is_caught_at_wolf_threshold() {
        let terrain = soil_field();
        let origin = Axial::new(0, 0);
        let mut wolf = Wolf::new(origin, WolfGenome::default(), 18.0);
        // Default wolf speed 1.5 > default hare speed 1.0; khaki on soil is
        // well above the 0.2 threshold.
        let mut hares = vec![Hare::new(origin.neighbor(0), HareGenome::default(), 18.0)];
        let mut foxes: Vec<Fox> = Vec::new();

        assert!(wolf.hunt(&terrain, &mut hares, &mut foxes));
        assert!(!hares[0].is_alive());
    }

    #[test]
    fn burrowed_hare_escapes_the_adjacency_scan() {
        let terrain = soil_field();
        let origin = Axial::new(0, 0);
        let mut wolf = Wolf::new(origin, WolfGenome::default(), 18.0);
        let mut hares = vec![Hare::new(origin.neighbor(0), HareGenome::default(), 18.0)];
        hares[0].burrowed = true;
        let mut foxes: Vec<Fox> = Vec::new();

        assert!(!wolf.hunt(&terrain, &mut hares, &mut foxes));
        assert!(hares[0].is_alive());
    }
}
