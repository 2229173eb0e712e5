use crate::terrain::Terrain;
use serde::{Deserialize, Serialize};

/// Display color of an agent or terrain, in 8-bit RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const SOIL_COLOR: Rgb = Rgb::new(139, 69, 19);
pub const WATER_COLOR: Rgb = Rgb::new(0, 150, 255);
pub const ROCK_COLOR: Rgb = Rgb::new(128, 128, 128);

const GREY: Rgb = Rgb::new(128, 128, 128);

pub fn terrain_base_color(terrain: Terrain) -> Rgb {
    match terrain {
        Terrain::Soil => SOIL_COLOR,
        Terrain::Water => WATER_COLOR,
        Terrain::Rock => ROCK_COLOR,
    }
}

fn rgb_distance(a: Rgb, b: Rgb) -> f32 {
    let dr = a.r as f32 - b.r as f32;
    let dg = a.g as f32 - b.g as f32;
    let db = a.b as f32 - b.b as f32;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// How detectable `color` is against `terrain`, in [0, 1].
///
/// Normalized RGB distance to the terrain base color; on rock, additionally
/// scaled down the closer the color is to neutral grey (camouflage bonus).
pub fn visibility(color: Rgb, terrain: Terrain) -> f32 {
    let max_distance = (3.0f32 * 255.0 * 255.0).sqrt();
    let ground = terrain_base_color(terrain);
    let mut visibility = rgb_distance(color, ground) / max_distance;

    if terrain == Terrain::Rock {
        let grey_distance = rgb_distance(color, GREY) / max_distance;
        visibility *= 0.5 + grey_distance * 0.5;
    }

    visibility.clamp(0.0, 1.0)
}
