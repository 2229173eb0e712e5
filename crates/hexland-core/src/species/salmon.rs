use super::{
    approach, candidate_directions, choose_direction, die, retain_unburning, Creature,
    Reproduction,
};
use crate::fire::FireField;
use crate::genome::SalmonGenome;
use crate::hex::Axial;
use crate::terrain::{Terrain, TerrainField};
use crate::visibility::Rgb;
use rand_chacha::ChaCha12Rng;

pub const INITIAL_ENERGY: f32 = 1.0;
pub const ENERGY_CAP: f32 = 3.0;
const ENERGY_DECAY: f32 = 0.005;
/// Filter-feeding intake per second, scaled by the water cell's nutrients.
const FEED_RATE: f32 = 0.02;
const MOVE_COOLDOWN: f32 = 1.0;
const MOVE_COST: f32 = 0.01;
const PREGNANCY_DURATION: f32 = 15.0;
const POST_REPRODUCTION_ENERGY: f32 = 1.0;
const ANIM_SPEED: f32 = 50.0;

pub const COLOR: Rgb = Rgb::new(255, 100, 100);

const ALLOWED_TERRAIN: [Terrain; 1] = [Terrain::Water];

/// Water-bound filter feeder. Nothing in the food web hunts it; it simply
/// drifts, feeds, and spawns.
#[derive(Clone, Debug)]
pub struct Salmon {
    pub coord: Axial,
    pub energy: f32,
    pub genome: SalmonGenome,
    pub reproduction: Reproduction,
    move_timer: f32,
    alive: bool,
    display_pos: [f32; 2],
}

impl Salmon {
    pub fn new(coord: Axial, genome: SalmonGenome, hex_size: f32) -> Self {
        Self {
            coord,
            energy: INITIAL_ENERGY,
            genome,
            reproduction: Reproduction::default(),
            move_timer: 0.0,
            alive: true,
            display_pos: coord.to_pixel(hex_size),
        }
    }

    pub fn color(&self) -> Rgb {
        COLOR
    }

    pub(crate) fn tick(
        &mut self,
        dt: f32,
        hex_size: f32,
        terrain: &mut TerrainField,
        fire: &FireField,
        rng: &mut ChaCha12Rng,
    ) {
        if !self.alive {
            return;
        }
        approach(&mut self.display_pos, self.coord.to_pixel(hex_size), ANIM_SPEED * dt);

        self.energy = (self.energy - ENERGY_DECAY * dt).max(0.0);

        if terrain.terrain_at(self.coord) == Terrain::Water {
            let nutrients = terrain.nutrients_at(self.coord);
            self.energy = (self.energy + FEED_RATE * nutrients * dt).min(ENERGY_CAP);
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
                let dir = choose_direction(&dirs, rng);
                self.coord = self.coord.neighbor(dir);
                self.energy = (self.energy - MOVE_COST).max(0.0);
                self.move_timer = 0.0;
            }
        }

        if self.energy <= 0.0 {
            log::debug!("salmon starved at ({}, {})", self.coord.q, self.coord.r);
            die(self, terrain);
        }
    }
}

impl Creature for Salmon {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pond() -> TerrainField {
        let mut terrain = TerrainField::new();
        for q in -2..=2 {
            for r in -2..=2 {
                terrain.insert_tile(Axial::new(q, r), Terrain::Water, 0.5);
            }
        }
        terrain
    }

    #[test]
    fn salmon_stays_in_water() {
        let mut terrain = pond();
        // A soil shore the salmon must never enter.
        for q in -2..=2 {
            terrain.insert_tile(Axial::new(q, 3), Terrain::Soil, 0.8);
            terrain.insert_tile(Axial::new(q, -3), Terrain::Soil, 0.8);
        }
        let fire = FireField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let mut salmon = Salmon::new(Axial::new(0, 0), SalmonGenome::default(), 18.0);

        for _ in 0..300 {
            salmon.tick(0.1, 18.0, &mut terrain, &fire, &mut rng);
            assert_eq!(terrain.terrain_at(salmon.coord), Terrain::Water);
        }
        assert!(salmon.is_alive());
    }

    #[test]
    fn filter_feeding_outpaces_decay() {
        let mut terrain = TerrainField::new();
        terrain.insert_tile(Axial::new(0, 0), Terrain::Water, 1.0);
        let fire = FireField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let mut salmon = Salmon::new(Axial::new(0, 0), SalmonGenome::default(), 18.0);
        let start = salmon.energy;

        // A lone water cell offers no move targets, so the only flows are
        // decay (0.005/s) and feeding (0.02/s at full nutrients).
        for _ in 0..100 {
            salmon.tick(0.1, 18.0, &mut terrain, &fire, &mut rng);
        }
        assert!(salmon.energy > start);
    }

    #[test]
    fn spawning_resets_energy_and_raises_the_flag() {
        let mut terrain = TerrainField::new();
        terrain.insert_tile(Axial::new(0, 0), Terrain::Water, 1.0);
        let fire = FireField::new();
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let mut salmon = Salmon::new(Axial::new(0, 0), SalmonGenome::default(), 18.0);
        salmon.energy = 2.1; // past the default 2.0 threshold

        salmon.tick(0.1, 18.0, &mut terrain, &fire, &mut rng);
        assert!(salmon.reproduction.is_pregnant);
        assert!((salmon.energy - POST_REPRODUCTION_ENERGY).abs() < 1e-5);

        for _ in 0..160 {
            salmon.tick(0.1, 18.0, &mut terrain, &fire, &mut rng);
        }
        assert!(salmon.reproduction.birth_ready);
    }
}
