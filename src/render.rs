//! Plain-text board renderer.
//!
//! Columns are drawn on two text lines per map row so odd columns sit half
//! a row lower than even ones, matching the grid's offset layout.

use std::fmt::Write;

use crate::board::{Coord, Side, UnitStatus};
use crate::engine::GameView;

const EMPTY: char = '.';
const EXIT: char = 'E';

fn side_glyph(side: Side) -> char {
    match side {
        Side::Red => 'R',
        Side::Blue => 'B',
    }
}

fn cell_glyph(view: &GameView, cell: Coord) -> char {
    match view.unit_at(cell) {
        Some(unit) => side_glyph(unit.side),
        None if cell == view.evacuation => EXIT,
        None => EMPTY,
    }
}

/// Renders the map, a legend and the unit roster.
///
/// ```text
/// Turn 3
///  E     .     .
///     .     .
/// ```
#[must_use]
pub fn render_board(view: &GameView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Turn {}", view.turn);

    for y in 0..view.grid.height {
        for parity in [0, 1] {
            let mut line = String::new();
            for x in 0..view.grid.width {
                if x % 2 == parity {
                    let _ = write!(line, " {} ", cell_glyph(view, Coord::new(x, y)));
                } else {
                    line.push_str("   ");
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    let _ = writeln!(
        out,
        "\nLegend: R={}  B={}  E=evacuation  .=empty",
        view.player_names[0], view.player_names[1]
    );
    out.push_str(&render_roster(view));
    out
}

/// One line per unit: name, side, position and status.
pub fn render_roster(view: &GameView) -> String {
    let mut out = String::new();
    for unit in &view.units {
        let status = match unit.status {
            UnitStatus::Active => format!("at {}", unit.pos),
            UnitStatus::OffBoard => "evacuated".to_string(),
            UnitStatus::Destroyed => "destroyed".to_string(),
        };
        let _ = writeln!(
            out,
            "  [{}] {} (str {}) {}",
            side_glyph(unit.side),
            unit.name,
            unit.strength,
            status
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Battalion, GameState, HexGrid, Player, Strategy, Unit};

    fn view() -> GameView {
        let red = Player::new(Side::Red, "Red").with_battalion(
            Battalion::new("Rommel", Strategy::Evacuate)
                .with_unit(Unit::new("R1", Coord::new(1, 0), 2)),
        );
        let blue = Player::new(Side::Blue, "Blu").with_battalion(
            Battalion::new("EZ Company", Strategy::Circle)
                .with_unit(Unit::new("B1", Coord::new(2, 1), 1)),
        );
        GameView::from_state(&GameState::new(
            HexGrid::new(3, 2),
            Coord::new(0, 0),
            [red, blue],
        ))
    }

    #[test]
    fn draws_offset_columns() {
        let out = render_board(&view());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Turn 1");
        // Row 0: even columns, then the odd column half a row lower.
        assert_eq!(lines[1], " E     .");
        assert_eq!(lines[2], "    R");
        // Row 1.
        assert_eq!(lines[3], " .     B");
        assert_eq!(lines[4], "    .");
    }

    #[test]
    fn lists_units_and_legend() {
        let mut v = view();
        v.units[1].status = UnitStatus::Destroyed;
        v.units[1].pos = Coord::OFF_BOARD;
        let out = render_board(&v);
        assert!(out.contains("Legend: R=Red  B=Blu"));
        assert!(out.contains("[R] R1 (str 2) at (1, 0)"));
        assert!(out.contains("[B] B1 (str 1) destroyed"));
        // The destroyed unit no longer shows on the map.
        assert!(!out.lines().nth(3).unwrap_or("").contains('B'));
    }
}
