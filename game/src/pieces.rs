use crate::board::Rgb;
use crate::geometry::{Cell, Piece};
use crate::rng::Rng;

pub const SHAPE_COUNT: usize = 7;

/// The seven tetromino templates, as spawned (before centering). Fixed data;
/// there is no alternate piece set.
const TEMPLATES: [[(i32, i32); 4]; SHAPE_COUNT] = [
    // J
    [(0, 0), (1, 0), (2, 0), (2, 1)],
    // L
    [(0, 0), (1, 0), (2, 0), (0, 1)],
    // I
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    // O
    [(0, 0), (1, 0), (0, 1), (1, 1)],
    // S
    [(0, 1), (1, 1), (1, 0), (2, 0)],
    // Z
    [(0, 0), (1, 1), (1, 0), (2, 1)],
    // T
    [(0, 0), (1, 0), (2, 0), (1, 1)],
];

/// Any color whose channels sum past this reads as washed-out against the
/// light background and gets resampled.
const MAX_CHANNEL_SUM: u32 = 600;

pub fn template(index: usize) -> Piece {
    let cells = TEMPLATES[index % SHAPE_COUNT]
        .map(|(col, row)| Cell::new(col, row));
    Piece::new(cells)
}

pub fn random_piece(rng: &mut Rng) -> Piece {
    template(rng.next_below(SHAPE_COUNT as u32) as usize)
}

/// Uniform random color, rejection-sampling overly pale triples so pieces
/// stay visually distinct from the background.
pub fn random_color(rng: &mut Rng) -> Rgb {
    loop {
        let rgb = [
            rng.next_below(256) as u8,
            rng.next_below(256) as u8,
            rng.next_below(256) as u8,
        ];
        if rgb.iter().map(|&c| c as u32).sum::<u32>() <= MAX_CHANNEL_SUM {
            return rgb;
        }
    }
}
