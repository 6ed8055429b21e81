//! Units and their owning side.
//!
//! A unit stays in its battalion for the whole game. Destroyed and evacuated
//! units keep their slot but sit on the off-board sentinel.

use serde::{Deserialize, Serialize};

use super::hex::Coord;

/// One of the two sides in a game. Side index 0 moves first in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Blue,
}

/// Both sides in roster order.
pub const ALL_SIDES: [Side; 2] = [Side::Red, Side::Blue];

impl Side {
    pub const fn index(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Blue => 1,
        }
    }

    /// The opposing side.
    pub const fn other(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
}

/// Lifecycle of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Active,
    OffBoard,
    Destroyed,
}

/// A single unit on (or formerly on) the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub side: Side,
    pub pos: Coord,
    pub strength: i32,
    pub status: UnitStatus,
}

impl Unit {
    /// Creates an active unit. The side is stamped when its battalion joins a player.
    pub fn new(name: impl Into<String>, pos: Coord, strength: i32) -> Self {
        Unit {
            name: name.into(),
            side: Side::Red,
            pos,
            strength,
            status: UnitStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UnitStatus::Active
    }

    /// Takes the unit off the board with the given terminal status.
    pub fn remove(&mut self, status: UnitStatus) {
        self.pos = Coord::OFF_BOARD;
        self.status = status;
    }
}

/// Stable address of a unit: side, battalion index, unit index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId {
    pub side: Side,
    pub battalion: usize,
    pub unit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_other_is_involution() {
        for side in ALL_SIDES {
            assert_ne!(side.other(), side);
            assert_eq!(side.other().other(), side);
        }
    }

    #[test]
    fn side_index_follows_roster_order() {
        for (i, side) in ALL_SIDES.into_iter().enumerate() {
            assert_eq!(side.index(), i);
        }
    }

    #[test]
    fn remove_moves_to_sentinel() {
        let mut unit = Unit::new("U1", Coord::new(3, 2), 2);
        assert!(unit.is_active());
        unit.remove(UnitStatus::Destroyed);
        assert_eq!(unit.pos, Coord::OFF_BOARD);
        assert_eq!(unit.status, UnitStatus::Destroyed);
        assert!(!unit.is_active());
    }
}
