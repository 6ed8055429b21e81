//! Scenario rosters.
//!
//! A scenario describes the map, the evacuation cell and both players'
//! battalions. It is loaded from JSON and validated into a `GameState`.
//! The first player is Red, the second Blue.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::board::{Battalion, Coord, GameState, HexGrid, Player, Side, Strategy, Unit};

/// Errors raised while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a scenario needs exactly 2 players, found {0}")]
    PlayerCount(usize),

    #[error("map must be at least 1x1, got {width}x{height}")]
    EmptyMap { width: i32, height: i32 },

    #[error("evacuation cell {0} is off the map")]
    EvacuationOffMap(Coord),

    #[error("unit '{unit}' starts off the map at {at}")]
    UnitOffMap { unit: String, at: Coord },

    #[error("units '{first}' and '{second}' both start at {at}")]
    Stacked {
        first: String,
        second: String,
        at: Coord,
    },

    #[error("name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("name '{0}' is not usable in command notation")]
    InvalidName(String),
}

/// Top-level scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub map_width: i32,
    pub map_height: i32,
    pub evacuation_hex: Coord,
    pub players: Vec<PlayerSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub battalions: Vec<BattalionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattalionSpec {
    pub name: String,
    #[serde(default)]
    pub strategy: Strategy,
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_strength")]
    pub strength: i32,
}

fn default_strength() -> i32 {
    1
}

impl UnitSpec {
    fn pos(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

impl Scenario {
    /// The stock game: Rommel's column heads for the corner while EZ Company
    /// patrols.
    pub fn classic() -> Self {
        Scenario {
            map_width: 11,
            map_height: 8,
            evacuation_hex: Coord::new(0, 0),
            players: vec![
                PlayerSpec {
                    name: "Red".to_string(),
                    battalions: vec![BattalionSpec {
                        name: "Rommel".to_string(),
                        strategy: Strategy::Evacuate,
                        units: vec![UnitSpec {
                            name: "Red infantry".to_string(),
                            x: 4,
                            y: 2,
                            strength: 1,
                        }],
                    }],
                },
                PlayerSpec {
                    name: "Blu".to_string(),
                    battalions: vec![BattalionSpec {
                        name: "EZ Company".to_string(),
                        strategy: Strategy::Circle,
                        units: vec![UnitSpec {
                            name: "Blu infantry".to_string(),
                            x: 7,
                            y: 5,
                            strength: 1,
                        }],
                    }],
                },
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn grid(&self) -> HexGrid {
        HexGrid::new(self.map_width, self.map_height)
    }

    /// Checks the roster and builds the initial game state.
    pub fn build(&self) -> Result<GameState, ScenarioError> {
        self.validate()?;

        let mut players = self.players.iter().enumerate().map(|(i, roster)| {
            let side = if i == 0 { Side::Red } else { Side::Blue };
            roster.battalions
                .iter()
                .fold(Player::new(side, roster.name.clone()), |player, b| {
                    let battalion = b.units.iter().fold(
                        Battalion::new(b.name.clone(), b.strategy),
                        |battalion, u| {
                            battalion.with_unit(Unit::new(u.name.clone(), u.pos(), u.strength))
                        },
                    );
                    player.with_battalion(battalion)
                })
        });
        let (Some(red), Some(blue)) = (players.next(), players.next()) else {
            return Err(ScenarioError::PlayerCount(self.players.len()));
        };

        let state = GameState::new(self.grid(), self.evacuation_hex, [red, blue]);
        debug!(
            phases = state.phases.len(),
            units = state.units().count(),
            "scenario built"
        );
        Ok(state)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.players.len() != 2 {
            return Err(ScenarioError::PlayerCount(self.players.len()));
        }
        if self.map_width < 1 || self.map_height < 1 {
            return Err(ScenarioError::EmptyMap {
                width: self.map_width,
                height: self.map_height,
            });
        }
        let grid = self.grid();
        if !grid.contains(self.evacuation_hex) {
            return Err(ScenarioError::EvacuationOffMap(self.evacuation_hex));
        }

        // Player and battalion names label phases; unit names key commands.
        let mut labels = HashSet::new();
        for player in &self.players {
            check_name(&player.name)?;
            if !labels.insert(player.name.as_str()) {
                return Err(ScenarioError::DuplicateName(player.name.clone()));
            }
        }
        for battalion in self.players.iter().flat_map(|p| &p.battalions) {
            check_name(&battalion.name)?;
            if !labels.insert(battalion.name.as_str()) {
                return Err(ScenarioError::DuplicateName(battalion.name.clone()));
            }
        }

        let mut unit_names = HashSet::new();
        let mut placed: Vec<(&str, Coord)> = Vec::new();
        let units = self
            .players
            .iter()
            .flat_map(|p| &p.battalions)
            .flat_map(|b| &b.units);
        for unit in units {
            check_name(&unit.name)?;
            if !unit_names.insert(unit.name.as_str()) {
                return Err(ScenarioError::DuplicateName(unit.name.clone()));
            }
            let at = unit.pos();
            if !grid.contains(at) {
                return Err(ScenarioError::UnitOffMap {
                    unit: unit.name.clone(),
                    at,
                });
            }
            if let Some(&(first, _)) = placed.iter().find(|(_, p)| *p == at) {
                return Err(ScenarioError::Stacked {
                    first: first.to_string(),
                    second: unit.name.clone(),
                    at,
                });
            }
            placed.push((unit.name.as_str(), at));
        }
        Ok(())
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::classic()
    }
}

/// Names must round-trip through `"<name>: <command>"`.
fn check_name(name: &str) -> Result<(), ScenarioError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed != name || name.contains(": ") || name.contains('\n') {
        return Err(ScenarioError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Loads a scenario from a JSON file.
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let data = fs::read_to_string(path)?;
    Scenario::from_json(&data)
}
