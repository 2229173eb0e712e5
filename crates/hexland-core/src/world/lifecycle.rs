use super::World;
use crate::fire::FireField;
use crate::species::{die, Creature, Fox, Hare, Salmon, Wolf};
use crate::terrain::TerrainField;

/// Kill every live creature standing on a burning cell, regardless of its
/// energy or thirst. Returns the number killed.
fn kill_burning<C: Creature>(
    creatures: &mut [C],
    fire: &FireField,
    terrain: &mut TerrainField,
) -> usize {
    let mut killed = 0;
    for creature in creatures.iter_mut() {
        if creature.is_alive() && fire.is_burning(creature.coord()) {
            die(creature, terrain);
            killed += 1;
        }
    }
    killed
}

fn compact<C: Creature>(creatures: &mut Vec<C>) -> usize {
    let before = creatures.len();
    creatures.retain(|c| c.is_alive());
    before - creatures.len()
}

impl World {
    /// Hard kill rule layered over the normal death checks: fire spares no
    /// one (see the fire engine for how cells come to burn).
    pub(crate) fn apply_fire_kills(&mut self) {
        if self.fire.is_empty() {
            return;
        }
        let mut killed = 0;
        killed += kill_burning(&mut self.hares, &self.fire, &mut self.terrain);
        killed += kill_burning(&mut self.foxes, &self.fire, &mut self.terrain);
        killed += kill_burning(&mut self.wolves, &self.fire, &mut self.terrain);
        killed += kill_burning(&mut self.salmon, &self.fire, &mut self.terrain);
        if killed > 0 {
            log::debug!("fire killed {killed} creatures this tick");
        }
    }

    /// Deliver every buffered birth: offspring appear on the parent's cell
    /// with a mutated copy of the parent's genome. Buffering keeps the
    /// species vectors stable while their update passes iterate.
    pub(crate) fn process_births(&mut self, hex_size: f32) {
        let mut newborn_hares = Vec::new();
        for hare in &mut self.hares {
            if hare.is_alive() && hare.reproduction.take_birth() {
                let mut genome = hare.genome;
                genome.mutate(&mut self.rng);
                newborn_hares.push(Hare::new(hare.coord, genome, hex_size));
            }
        }

        let mut newborn_foxes = Vec::new();
        for fox in &mut self.foxes {
            if fox.is_alive() && fox.reproduction.take_birth() {
                let mut genome = fox.genome;
                genome.mutate(&mut self.rng);
                newborn_foxes.push(Fox::new(fox.coord, genome, hex_size));
            }
        }

        let mut newborn_wolves = Vec::new();
        for wolf in &mut self.wolves {
            if wolf.is_alive() && wolf.reproduction.take_birth() {
                let mut genome = wolf.genome;
                genome.mutate(&mut self.rng);
                newborn_wolves.push(Wolf::new(wolf.coord, genome, hex_size));
            }
        }

        let mut newborn_salmon = Vec::new();
        for salmon in &mut self.salmon {
            if salmon.is_alive() && salmon.reproduction.take_birth() {
                let mut genome = salmon.genome;
                genome.mutate(&mut self.rng);
                newborn_salmon.push(Salmon::new(salmon.coord, genome, hex_size));
            }
        }

        let births = newborn_hares.len()
            + newborn_foxes.len()
            + newborn_wolves.len()
            + newborn_salmon.len();
        if births > 0 {
            log::debug!(
                "{} births ({} hares, {} foxes, {} wolves, {} salmon)",
                births,
                newborn_hares.len(),
                newborn_foxes.len(),
                newborn_wolves.len(),
                newborn_salmon.len(),
            );
        }
        self.hares.append(&mut newborn_hares);
        self.foxes.append(&mut newborn_foxes);
        self.wolves.append(&mut newborn_wolves);
        self.salmon.append(&mut newborn_salmon);
        self.births_last_tick += births;
        self.total_births += births;
    }

    /// Physically remove everything that died during this tick.
    pub(crate) fn compact_dead(&mut self) {
        let mut deaths = 0;
        deaths += compact(&mut self.hares);
        deaths += compact(&mut self.foxes);
        deaths += compact(&mut self.wolves);
        deaths += compact(&mut self.salmon);
        self.deaths_last_tick += deaths;
        self.total_deaths += deaths;
    }
}
