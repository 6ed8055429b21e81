//! Turn resolution.
//!
//! Applies unit commands, resolves combat between adjacent units, and
//! schedules the randomly ordered phases that make up a turn.

pub mod combat;
pub mod interpret;
pub mod phase;

pub use combat::{combat_command, evaluate_combat};
pub use interpret::{process_command, process_line, Effect};
pub use phase::{
    active_phases, advance_turn, begin_turn, execute_phase, move_battalion, next_phase,
    play_turn, reset_phases, PhaseStep,
};
