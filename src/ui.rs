#![cfg(feature = "std")]
//! Text rendering of board snapshots for the console.

use std::fmt::Write;

use crate::board::BoardSnapshot;
use crate::common::Cell;
use crate::config::BOARD_SIZE;

/// Glyph for one cell. Unattacked ships are hidden unless `reveal` is set.
pub fn cell_glyph(cell: Cell, reveal: bool) -> &'static str {
    match cell {
        Cell::Water => "🌊",
        Cell::Ship if reveal => "⛵",
        Cell::Ship => "🌊",
        Cell::Hit => "💥",
        Cell::Miss => "💦",
    }
}

/// Render a grid with 1-based X (rows) and Y (columns) labels, matching the
/// numbers the operator types at the prompt.
pub fn render_board(title: &str, grid: &BoardSnapshot, reveal: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    out.push_str("    ");
    for y in 0..BOARD_SIZE as usize {
        let _ = write!(out, "{:>2} ", y + 1);
    }
    out.push('\n');
    for (x, row) in grid.iter().enumerate() {
        let _ = write!(out, "{:>2}  ", x + 1);
        for cell in row {
            let _ = write!(out, "{} ", cell_glyph(*cell, reveal));
        }
        out.push('\n');
    }
    out
}

/// Own board (ships revealed) above the opponent tracking grid.
pub fn render_player_view(own: &BoardSnapshot, opponent: &BoardSnapshot) -> String {
    let mut out = render_board("Opponent board:", opponent, false);
    out.push('\n');
    out.push_str(&render_board("Your board:", own, true));
    out.push_str("Legend: ⛵ ship  💥 hit  💦 miss  🌊 water\n");
    out
}
