//! End-to-end tests: scenario setup, phase flow, the game loop, and the
//! two binaries.

use std::process::{Command, Stdio};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use battalion::board::{Coord, GameEvent, GameState, HexGrid, PhaseKind, Side, UnitStatus};
use battalion::engine::{run_game, Finish, LoopConfig, SharedGame};
use battalion::movegen::DistanceField;
use battalion::resolve::{
    active_phases, advance_turn, begin_turn, execute_phase, next_phase, process_line,
};
use battalion::scenario::Scenario;

const SKIRMISH: &str = r#"{
  "map_width": 8,
  "map_height": 6,
  "evacuation_hex": { "x": 0, "y": 0 },
  "players": [
    { "name": "Red", "battalions": [
      { "name": "Rommel", "strategy": "evacuate",
        "units": [ { "name": "U1", "x": 3, "y": 2, "strength": 2 } ] } ] },
    { "name": "Blu", "battalions": [
      { "name": "Garrison",
        "units": [ { "name": "E1", "x": 4, "y": 2, "strength": 1 } ] } ] }
  ]
}"#;

fn skirmish() -> GameState {
    Scenario::from_json(SKIRMISH).unwrap().build().unwrap()
}

fn commands(state: &GameState) -> Vec<String> {
    state
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CommandIssued { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Inactive units sit on the sentinel; active units sit inside the grid.
fn assert_sentinel_exclusive(state: &GameState) {
    for unit in state.units() {
        if unit.is_active() {
            assert!(state.grid.contains(unit.pos), "{} off grid at {}", unit.name, unit.pos);
        } else {
            assert_eq!(unit.pos, Coord::OFF_BOARD, "{} is {:?}", unit.name, unit.status);
        }
    }
}

#[test]
fn stronger_unit_destroys_adjacent_enemy() {
    let mut state = skirmish();
    let mut rng = SmallRng::seed_from_u64(1);
    let redraw = execute_phase(PhaseKind::Combat(Side::Red), &mut state, &mut rng).unwrap();

    assert!(redraw);
    assert_eq!(commands(&state), vec!["U1: ATTACK E1"]);
    let e1 = state.unit(state.find_unit("E1").unwrap());
    assert_eq!(e1.status, UnitStatus::Destroyed);
    assert_eq!(e1.pos, Coord::OFF_BOARD);
    assert_sentinel_exclusive(&state);
}

#[test]
fn evacuating_battalion_steps_toward_exit() {
    let battalion = skirmish()
        .phases
        .iter()
        .find(|p| p.label == "Rommel Movement")
        .map(|p| p.kind)
        .unwrap();

    for seed in 0..10 {
        let mut state = skirmish();
        let u1 = state.find_unit("U1").unwrap();
        let before = HexGrid::distance(state.unit(u1).pos, state.evacuation);
        let mut rng = SmallRng::seed_from_u64(seed);
        execute_phase(battalion, &mut state, &mut rng).unwrap();
        let after = HexGrid::distance(state.unit(u1).pos, state.evacuation);
        assert_eq!(before, 4);
        assert_eq!(after, 3);
    }
}

#[test]
fn combat_then_movement_on_one_board() {
    let rommel = skirmish()
        .phases
        .iter()
        .find(|p| p.label == "Rommel Movement")
        .map(|p| p.kind)
        .unwrap();

    for seed in 0..10 {
        let mut state = skirmish();
        let mut rng = SmallRng::seed_from_u64(seed);
        let field = DistanceField::build(state.grid, state.evacuation);
        let u1 = state.find_unit("U1").unwrap();
        let e1 = state.find_unit("E1").unwrap();

        execute_phase(PhaseKind::Combat(Side::Red), &mut state, &mut rng).unwrap();
        assert_eq!(commands(&state), vec!["U1: ATTACK E1"]);
        assert_eq!(state.unit(e1).pos, Coord::OFF_BOARD);
        assert_eq!(state.unit(e1).status, UnitStatus::Destroyed);

        let start = state.unit(u1).pos;
        execute_phase(rommel, &mut state, &mut rng).unwrap();
        let end = state.unit(u1).pos;
        assert_eq!(HexGrid::distance(start, end), 1);
        assert_eq!(field.get(end), field.get(start).map(|d| d - 1));
        assert_eq!(field.get(end), Some(3));
        assert_eq!(commands(&state).len(), 2);
        assert_sentinel_exclusive(&state);
    }
}

#[test]
fn pass_is_idempotent() {
    let mut state = skirmish();
    let mut rng = SmallRng::seed_from_u64(2);
    let units: Vec<_> = state.units().cloned().collect();
    process_line("U1: PASS", &mut state, &mut rng).unwrap();
    process_line("U1: PASS", &mut state, &mut rng).unwrap();
    let after: Vec<_> = state.units().cloned().collect();
    assert_eq!(units, after);
}

#[test]
fn sentinel_holds_after_every_phase() {
    for seed in 0..25 {
        for mut state in [skirmish(), Scenario::classic().build().unwrap()] {
            let mut rng = SmallRng::seed_from_u64(seed);
            for _ in 0..12 {
                begin_turn(&mut state);
                while active_phases(&state) {
                    next_phase(&mut state, &mut rng).unwrap();
                    assert_sentinel_exclusive(&state);
                }
                advance_turn(&mut state);
            }
        }
    }
}

#[test]
fn unit_evacuates_and_stays_off_board() {
    let mut state = skirmish();
    let mut rng = SmallRng::seed_from_u64(11);
    // Four steps to the exit plus the evacuation itself, with room for a
    // turn blocked by the garrison.
    for _ in 0..10 {
        begin_turn(&mut state);
        while active_phases(&state) {
            next_phase(&mut state, &mut rng).unwrap();
        }
        advance_turn(&mut state);
    }
    let u1 = state.unit(state.find_unit("U1").unwrap());
    assert_eq!(u1.status, UnitStatus::OffBoard);
    assert_eq!(u1.pos, Coord::OFF_BOARD);
    assert!(state
        .events
        .contains(&GameEvent::UnitEvacuated { unit: "U1".to_string() }));
}

#[test]
fn loop_halts_at_turn_limit() {
    let shared = SharedGame::new(skirmish());
    let config = LoopConfig {
        max_turns: 1,
        pacing: Duration::ZERO,
    };
    let mut rng = SmallRng::seed_from_u64(3);
    let summary = run_game(&shared, &config, &mut rng).unwrap();

    assert_eq!(summary.finish, Finish::TurnLimit);
    assert_eq!(summary.turns_played, 1);
    assert!(!shared.is_running());

    let state = shared.into_state();
    let executed: Vec<&str> = state
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PhaseExecuted { label } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(executed.len(), state.phases.len());
    for phase in &state.phases {
        assert_eq!(executed.iter().filter(|l| **l == phase.label).count(), 1);
    }
    assert_eq!(
        state.events.last().map(|e| e.to_string()),
        Some("GAME OVER: MAX TURNS 1 reached.".to_string())
    );
}

fn run_binary(exe: &str, args: &[&str]) -> (bool, String) {
    let output = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .expect("failed to start binary");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn binary_plays_one_turn() {
    let (ok, stdout) = run_binary(
        env!("CARGO_BIN_EXE_battalion"),
        &["--turns", "1", "--delay-ms", "0", "--seed", "4", "--quiet"],
    );
    assert!(ok);
    assert!(stdout.contains("GAME OVER: MAX TURNS 1 reached."), "{}", stdout);
    assert!(stdout.contains("Red:"));
    assert!(stdout.contains("Blu:"));
}

#[test]
fn binary_draws_board_when_not_quiet() {
    let (ok, stdout) = run_binary(
        env!("CARGO_BIN_EXE_battalion"),
        &["--turns", "1", "--delay-ms", "0", "--seed", "4"],
    );
    assert!(ok);
    assert!(stdout.contains("Legend:"), "{}", stdout);
}

#[test]
fn binary_loads_scenario_file() {
    let path = std::env::temp_dir().join(format!("battalion-skirmish-{}.json", std::process::id()));
    std::fs::write(&path, SKIRMISH).unwrap();
    let (ok, stdout) = run_binary(
        env!("CARGO_BIN_EXE_battalion"),
        &["--scenario", path.to_str().unwrap(), "--turns", "2", "--delay-ms", "0", "--quiet"],
    );
    let _ = std::fs::remove_file(&path);
    assert!(ok);
    assert!(stdout.contains("GAME OVER: MAX TURNS 2 reached."));
}

#[test]
fn binary_rejects_bad_input() {
    let (ok, _) = run_binary(env!("CARGO_BIN_EXE_battalion"), &["--turns", "lots"]);
    assert!(!ok);
    let (ok, _) = run_binary(
        env!("CARGO_BIN_EXE_battalion"),
        &["--scenario", "/nonexistent/battalion.json", "--quiet"],
    );
    assert!(!ok);
}

#[test]
fn selfplay_binary_writes_jsonl() {
    let (ok, stdout) = run_binary(
        env!("CARGO_BIN_EXE_selfplay"),
        &["--games", "3", "--turns", "2", "--threads", "2", "--seed", "9", "--quiet"],
    );
    assert!(ok);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["turns_played"], 2);
    }
}
