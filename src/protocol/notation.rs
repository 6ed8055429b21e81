//! Text notation for unit commands.
//!
//! Every command line is `<unit-name>: <KEYWORD> [args]`:
//!
//! ```text
//! U1: MV (3, 2) -> (2, 2)
//! U1: ATTACK E1
//! U1: RETREAT
//! U1: EVACUATE
//! U1: PASS
//! ```
//!
//! Keywords are matched exactly and case-sensitively.

use thiserror::Error;

use crate::board::command::{Command, UnitCommand};
use crate::board::hex::Coord;

/// Errors that can occur when parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    EmptyInput,

    #[error("missing ': ' after unit name in '{0}'")]
    MissingSeparator(String),

    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),

    #[error("malformed coordinate '{0}'")]
    MalformedCoord(String),

    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(String),
}

/// Parses a single command line into a `UnitCommand`.
pub fn parse_command(s: &str) -> Result<UnitCommand, CommandError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CommandError::EmptyInput);
    }

    let (unit, body) = s
        .split_once(": ")
        .ok_or_else(|| CommandError::MissingSeparator(s.to_string()))?;
    if unit.is_empty() {
        return Err(CommandError::UnexpectedEnd("unit name".to_string()));
    }

    let (keyword, rest) = match body.split_once(' ') {
        Some((k, r)) => (k, r),
        None => (body, ""),
    };

    let command = match keyword {
        "MV" => parse_move(rest)?,
        "ATTACK" => {
            let target = rest.trim();
            if target.is_empty() {
                return Err(CommandError::UnexpectedEnd("attack target".to_string()));
            }
            Command::Attack {
                target: target.to_string(),
            }
        }
        "RETREAT" => bare(Command::Retreat, rest)?,
        "EVACUATE" => bare(Command::Evacuate, rest)?,
        "PASS" => bare(Command::Pass, rest)?,
        "" => return Err(CommandError::UnexpectedEnd("keyword".to_string())),
        other => return Err(CommandError::UnknownKeyword(other.to_string())),
    };

    Ok(UnitCommand::new(unit, command))
}

/// Formats a command as its canonical text line.
pub fn format_command(cmd: &UnitCommand) -> String {
    let body = match &cmd.command {
        Command::Move { from, to } => format!("MV {} -> {}", from, to),
        Command::Attack { target } => format!("ATTACK {}", target),
        Command::Retreat => "RETREAT".to_string(),
        Command::Evacuate => "EVACUATE".to_string(),
        Command::Pass => "PASS".to_string(),
    };
    format!("{}: {}", cmd.unit, body)
}

impl std::fmt::Display for UnitCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_command(self))
    }
}

/// Keywords without arguments must not carry trailing tokens.
fn bare(command: Command, rest: &str) -> Result<Command, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::UnexpectedToken {
            expected: "end of command".to_string(),
            found: rest.to_string(),
        })
    }
}

/// Parses `(x1, y1) -> (x2, y2)`.
fn parse_move(rest: &str) -> Result<Command, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::UnexpectedEnd("source coordinate".to_string()));
    }
    let (from, to) = rest
        .split_once(" -> ")
        .ok_or_else(|| CommandError::UnexpectedToken {
            expected: "'->' between coordinates".to_string(),
            found: rest.to_string(),
        })?;
    Ok(Command::Move {
        from: parse_coord(from)?,
        to: parse_coord(to)?,
    })
}

/// Parses `(x, y)` with exactly one comma-space between the integers.
fn parse_coord(s: &str) -> Result<Coord, CommandError> {
    let malformed = || CommandError::MalformedCoord(s.to_string());
    let inner = s
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let (x, y) = inner.split_once(", ").ok_or_else(malformed)?;
    let x = x.parse::<i32>().map_err(|_| malformed())?;
    let y = y.parse::<i32>().map_err(|_| malformed())?;
    Ok(Coord::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(unit: &str, command: Command) -> UnitCommand {
        UnitCommand::new(unit, command)
    }

    #[test]
    fn parse_move() {
        let parsed = parse_command("U1: MV (3, 2) -> (2, 2)").unwrap();
        assert_eq!(
            parsed,
            cmd(
                "U1",
                Command::Move {
                    from: Coord::new(3, 2),
                    to: Coord::new(2, 2),
                }
            )
        );
    }

    #[test]
    fn parse_move_negative_coords() {
        let parsed = parse_command("U1: MV (-1, -1) -> (0, 10)").unwrap();
        assert_eq!(
            parsed.command,
            Command::Move {
                from: Coord::OFF_BOARD,
                to: Coord::new(0, 10),
            }
        );
    }

    #[test]
    fn parse_attack_multi_word_target() {
        let parsed = parse_command("Red infantry: ATTACK Blu infantry").unwrap();
        assert_eq!(parsed.unit, "Red infantry");
        assert_eq!(
            parsed.command,
            Command::Attack {
                target: "Blu infantry".to_string()
            }
        );
    }

    #[test]
    fn parse_bare_keywords() {
        assert_eq!(parse_command("U1: RETREAT").unwrap().command, Command::Retreat);
        assert_eq!(parse_command("U1: EVACUATE").unwrap().command, Command::Evacuate);
        assert_eq!(parse_command("U1: PASS").unwrap().command, Command::Pass);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            parse_command("U1: pass"),
            Err(CommandError::UnknownKeyword("pass".to_string()))
        );
        assert_eq!(
            parse_command("U1: ATTACKS E1"),
            Err(CommandError::UnknownKeyword("ATTACKS".to_string()))
        );
    }

    #[test]
    fn missing_separator_is_error() {
        assert!(matches!(
            parse_command("U1 PASS"),
            Err(CommandError::MissingSeparator(_))
        ));
        assert_eq!(parse_command("   "), Err(CommandError::EmptyInput));
    }

    #[test]
    fn malformed_move_is_error() {
        assert!(matches!(
            parse_command("U1: MV (3,2) -> (2, 2)"),
            Err(CommandError::MalformedCoord(_))
        ));
        assert!(matches!(
            parse_command("U1: MV (3, 2) => (2, 2)"),
            Err(CommandError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_command("U1: MV (3, x) -> (2, 2)"),
            Err(CommandError::MalformedCoord(_))
        ));
        assert!(matches!(
            parse_command("U1: MV"),
            Err(CommandError::UnexpectedEnd(_))
        ));
    }

    #[test]
    fn attack_without_target_is_error() {
        assert!(matches!(
            parse_command("U1: ATTACK"),
            Err(CommandError::UnexpectedEnd(_))
        ));
    }

    #[test]
    fn trailing_tokens_after_bare_keyword() {
        assert!(matches!(
            parse_command("U1: PASS now"),
            Err(CommandError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn format_matches_wire_grammar() {
        let mv = cmd(
            "U1",
            Command::Move {
                from: Coord::new(3, 2),
                to: Coord::new(2, 2),
            },
        );
        assert_eq!(format_command(&mv), "U1: MV (3, 2) -> (2, 2)");
        assert_eq!(
            cmd("U1", Command::Attack { target: "E1".to_string() }).to_string(),
            "U1: ATTACK E1"
        );
        assert_eq!(cmd("U1", Command::Retreat).to_string(), "U1: RETREAT");
    }

    #[test]
    fn formatted_move_parses_back() {
        let mv = cmd(
            "U1",
            Command::Move {
                from: Coord::new(7, 5),
                to: Coord::new(7, 4),
            },
        );
        assert_eq!(parse_command(&format_command(&mv)).unwrap(), mv);
    }
}
