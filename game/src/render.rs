use engine::graphics::{Color, Rect, Renderer2d};

use crate::board::{COLS, ROWS, Rgb};
use crate::game_core::{GameCore, RunState};

const BACKGROUND_COLOR: Color = [244, 244, 244, 255];
const GRID_LINE_COLOR: Color = [208, 208, 208, 255];
const TEXT_COLOR: Color = [40, 40, 40, 255];

fn opaque(rgb: Rgb) -> Color {
    [rgb[0], rgb[1], rgb[2], 255]
}

/// Pixel rect for a board cell, with an optional fractional row offset for
/// the falling piece. Cells with negative coordinates draw nothing.
pub(crate) fn cell_rect(
    col: i32,
    row: i32,
    cell_w: u32,
    cell_h: u32,
    row_offset: f64,
) -> Option<Rect> {
    if col < 0 || row < 0 {
        return None;
    }
    let x = col as u32 * cell_w;
    let y = ((row as f64 + row_offset) * cell_h as f64).floor() as u32;
    // One extra pixel of height hides the seam left by the floored offset.
    let h = if row_offset > 0.0 { cell_h + 1 } else { cell_h };
    Some(Rect::new(x, y, cell_w, h))
}

/// Clears and redraws the whole surface from the current game state: grid
/// lines (when enabled), settled cells, the active piece, and the score line.
pub fn draw_game(gfx: &mut dyn Renderer2d, core: &GameCore, show_grid: bool) {
    let size = gfx.size();
    let cell_w = (size.width / COLS as u32).max(1);
    let cell_h = (size.height / ROWS as u32).max(1);

    gfx.clear(BACKGROUND_COLOR);

    if show_grid {
        draw_grid_lines(gfx, cell_w, cell_h);
    }

    for (row, cells) in core.board().rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(rgb) = cell {
                if let Some(rect) = cell_rect(col as i32, row as i32, cell_w, cell_h, 0.0) {
                    gfx.fill_rect(rect, opaque(*rgb));
                }
            }
        }
    }

    if let Some(active) = core.active_piece() {
        // Interpolate only while the next descent is valid, so the piece
        // never draws into occupied cells on its final frame before fusion.
        let row_offset = if core.descent_valid() {
            core.gravity_progress()
        } else {
            0.0
        };
        for cell in active.piece.cells() {
            if let Some(rect) = cell_rect(cell.col, cell.row, cell_w, cell_h, row_offset) {
                gfx.fill_rect(rect, opaque(active.color));
            }
        }
    }

    gfx.draw_text(
        4,
        4,
        &format!("SCORE {}  BEST {}", core.score(), core.high_score()),
        TEXT_COLOR,
    );

    if core.is_paused() {
        gfx.draw_text(4, size.height / 2, "PAUSED", TEXT_COLOR);
    } else if core.run_state() == RunState::Stopped {
        gfx.draw_text(4, size.height / 2, "GAME OVER", TEXT_COLOR);
    }
}

fn draw_grid_lines(gfx: &mut dyn Renderer2d, cell_w: u32, cell_h: u32) {
    for row in 0..=ROWS as u32 {
        gfx.fill_rect(
            Rect::new(0, row * cell_h, COLS as u32 * cell_w, 1),
            GRID_LINE_COLOR,
        );
    }
    for col in 0..=COLS as u32 {
        gfx.fill_rect(
            Rect::new(col * cell_w, 0, 1, ROWS as u32 * cell_h),
            GRID_LINE_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rect_scales_by_cell_size() {
        let rect = cell_rect(3, 5, 24, 24, 0.0).expect("in-board cell");
        assert_eq!(rect, Rect::new(72, 120, 24, 24));
    }

    #[test]
    fn cell_rect_applies_fractional_row_offset() {
        let rect = cell_rect(0, 2, 10, 10, 0.5).expect("in-board cell");
        assert_eq!(rect.y, 25);
        assert_eq!(rect.h, 11);
    }

    #[test]
    fn cell_rect_floors_the_offset_pixel() {
        let rect = cell_rect(0, 0, 24, 24, 0.99).expect("in-board cell");
        assert_eq!(rect.y, 23);
    }

    #[test]
    fn negative_coordinates_draw_nothing() {
        assert_eq!(cell_rect(-1, 0, 24, 24, 0.0), None);
        assert_eq!(cell_rect(0, -1, 24, 24, 0.0), None);
    }
}
