//! Game state representation.
//!
//! Holds the two players with their battalions and units, the fixed phase
//! set, the turn counter, and the event log written as the game advances.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::hex::{Coord, HexGrid};
use super::unit::{Side, Unit, UnitId, UnitStatus, ALL_SIDES};

/// The scripted behavior shared by every unit in a battalion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Circle,
    Evacuate,
    /// No strategy assigned; units hold position.
    #[default]
    Uninitialized,
}

/// A named group of units that moves in a single phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battalion {
    pub index: usize,
    pub name: String,
    pub units: Vec<Unit>,
    pub strategy: Strategy,
}

impl Battalion {
    /// Creates an empty battalion. The index is assigned by `Player::with_battalion`.
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Battalion {
            index: 0,
            name: name.into(),
            units: Vec::new(),
            strategy,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }
}

/// Identifies a battalion by side and index within that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BattalionId {
    pub side: Side,
    pub index: usize,
}

/// One of the two players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub side: Side,
    pub name: String,
    pub battalions: Vec<Battalion>,
}

impl Player {
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Player {
            side,
            name: name.into(),
            battalions: Vec::new(),
        }
    }

    /// Adds a battalion, assigning its index and stamping this side on its units.
    pub fn with_battalion(mut self, mut battalion: Battalion) -> Self {
        battalion.index = self.battalions.len();
        for unit in &mut battalion.units {
            unit.side = self.side;
        }
        self.battalions.push(battalion);
        self
    }
}

/// What a phase does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Units of this side attack or retreat from adjacent enemies.
    Combat(Side),
    /// The battalion's strategy moves each of its units.
    Movement(BattalionId),
}

/// A unit of per-turn work. Runs exactly once per turn, in random order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub label: String,
    pub kind: PhaseKind,
    pub performed: bool,
}

/// Observable game history, in the order things happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TurnStarted { turn: u32 },
    PhaseExecuted { label: String },
    CommandIssued { text: String },
    UnitDestroyed { unit: String },
    UnitEvacuated { unit: String },
    GameOver { turns: u32 },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::TurnStarted { turn } => write!(f, "Turn {}", turn),
            GameEvent::PhaseExecuted { label } => write!(f, "Executing {}", label),
            GameEvent::CommandIssued { text } => write!(f, "\t{}", text),
            GameEvent::UnitDestroyed { unit } => write!(f, "{} destroyed!", unit),
            GameEvent::UnitEvacuated { unit } => write!(f, "{} evacuated", unit),
            GameEvent::GameOver { turns } => write!(f, "GAME OVER: MAX TURNS {} reached.", turns),
        }
    }
}

/// Unit counts for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideTally {
    pub name: String,
    pub active: usize,
    pub evacuated: usize,
    pub destroyed: usize,
}

/// Complete game state. The single aggregate every component reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub grid: HexGrid,
    pub evacuation: Coord,
    pub players: [Player; 2],
    pub phases: Vec<Phase>,
    /// Current turn, starting at 1.
    pub turn: u32,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Creates a game at turn 1 and derives the phase set from the roster:
    /// one combat phase per side, then one movement phase per battalion.
    pub fn new(grid: HexGrid, evacuation: Coord, players: [Player; 2]) -> Self {
        let mut phases = Vec::new();
        for player in &players {
            phases.push(Phase {
                label: format!("{} Combat", player.name),
                kind: PhaseKind::Combat(player.side),
                performed: false,
            });
        }
        for player in &players {
            for battalion in &player.battalions {
                phases.push(Phase {
                    label: format!("{} Movement", battalion.name),
                    kind: PhaseKind::Movement(BattalionId {
                        side: player.side,
                        index: battalion.index,
                    }),
                    performed: false,
                });
            }
        }

        GameState {
            grid,
            evacuation,
            players,
            phases,
            turn: 1,
            events: Vec::new(),
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn battalion(&self, id: BattalionId) -> Option<&Battalion> {
        self.player(id.side).battalions.get(id.index)
    }

    /// Looks up a unit by id. Ids are only minted by this state, so they stay valid.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.players[id.side.index()].battalions[id.battalion].units[id.unit]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.players[id.side.index()].battalions[id.battalion].units[id.unit]
    }

    /// Ids of every unit of `side`, battalions then units, in stored order.
    pub fn side_unit_ids(&self, side: Side) -> Vec<UnitId> {
        let mut ids = Vec::new();
        for battalion in &self.player(side).battalions {
            for unit in 0..battalion.units.len() {
                ids.push(UnitId {
                    side,
                    battalion: battalion.index,
                    unit,
                });
            }
        }
        ids
    }

    /// Ids of every unit in the game, Red first.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        ALL_SIDES
            .iter()
            .flat_map(|&side| self.side_unit_ids(side))
            .collect()
    }

    /// Iterates over all units regardless of status.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.players
            .iter()
            .flat_map(|p| p.battalions.iter())
            .flat_map(|b| b.units.iter())
    }

    /// Finds a unit by its unique name across both players.
    pub fn find_unit(&self, name: &str) -> Option<UnitId> {
        self.unit_ids()
            .into_iter()
            .find(|&id| self.unit(id).name == name)
    }

    /// True iff an active unit stands on `cell`.
    pub fn is_occupied(&self, cell: Coord) -> bool {
        if !self.grid.contains(cell) {
            return false;
        }
        self.units().any(|u| u.is_active() && u.pos == cell)
    }

    /// True iff an active unit of the side opposing `friendly` is exactly
    /// `distance` hex steps from `cell`.
    pub fn adjacent_to_enemy(&self, cell: Coord, friendly: Side, distance: u32) -> bool {
        if !self.grid.contains(cell) {
            return false;
        }
        self.player(friendly.other())
            .battalions
            .iter()
            .flat_map(|b| b.units.iter())
            .filter(|u| u.is_active())
            .any(|u| HexGrid::distance(cell, u.pos) == distance)
    }

    /// Per-side unit counts.
    pub fn tally(&self, side: Side) -> SideTally {
        let player = self.player(side);
        let mut tally = SideTally {
            name: player.name.clone(),
            ..SideTally::default()
        };
        for unit in player.battalions.iter().flat_map(|b| b.units.iter()) {
            match unit.status {
                UnitStatus::Active => tally.active += 1,
                UnitStatus::OffBoard => tally.evacuated += 1,
                UnitStatus::Destroyed => tally.destroyed += 1,
            }
        }
        tally
    }

    /// Appends to the event log and mirrors it to the tracing output.
    pub fn record(&mut self, event: GameEvent) {
        info!(turn = self.turn, "{}", event);
        self.events.push(event);
    }
}
