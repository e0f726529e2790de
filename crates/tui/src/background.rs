//! Procedural forest backdrop for the main menu.
//!
//! The backdrop is generated once at startup and owned by the app; screens
//! borrow it for rendering. A fixed seed keeps the menu looking the same
//! from launch to launch.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;

const SEED: u64 = 0x4c45_534e_59;
const WIDTH: usize = 96;
const HEIGHT: usize = 48;

/// One pre-rendered backdrop tile.
#[derive(Debug, Clone, Copy)]
pub struct BackdropCell {
    /// Glyph drawn at this cell.
    pub glyph: char,
    /// Foreground color of the glyph.
    pub color: Color,
}

/// A tileable field of dimmed forest glyphs drawn behind the menu.
#[derive(Debug, Clone)]
pub struct MenuBackground {
    cells: Vec<BackdropCell>,
}

impl MenuBackground {
    /// Generate the backdrop with the fixed menu seed.
    pub fn generate() -> Self {
        Self::generate_with(SEED)
    }

    /// Generate the backdrop from an explicit seed.
    pub fn generate_with(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cells = (0..WIDTH * HEIGHT)
            .map(|_| random_cell(&mut rng))
            .collect();
        Self { cells }
    }

    /// Cell for a screen coordinate; the pattern tiles in both directions.
    pub fn cell(&self, x: u16, y: u16) -> BackdropCell {
        let col = x as usize % WIDTH;
        let row = y as usize % HEIGHT;
        self.cells[row * WIDTH + col]
    }
}

fn random_cell(rng: &mut StdRng) -> BackdropCell {
    // Mostly empty space with scattered undergrowth and the odd tree.
    let roll = rng.gen_range(0..100);
    let (glyph, color) = match roll {
        0..=69 => (' ', Color::Reset),
        70..=84 => ('.', Color::DarkGray),
        85..=92 => (',', Color::Green),
        93..=97 => ('"', Color::Green),
        _ => ('♠', Color::DarkGray),
    };
    BackdropCell { glyph, color }
}
