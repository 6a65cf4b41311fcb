//! Keyboard line parsing.

use thiserror::Error;
use tile_merge_core::{Command, Direction};

/// Action requested by one line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Forward a command to the session.
    Command(Command),
    /// Leave the game loop.
    Quit,
}

/// Input that does not map to any action.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputError {
    /// The line held only whitespace.
    #[error("no input given")]
    Empty,
    /// The line held an unrecognised key.
    #[error("unrecognised input `{0}`")]
    Unknown(String),
}

/// Maps one line of terminal input onto an action.
///
/// Letters, direction names, and raw arrow-key escape sequences are accepted.
pub(crate) fn parse(line: &str) -> Result<Input, InputError> {
    let key = line.trim().to_ascii_lowercase();
    let input = match key.as_str() {
        "" => return Err(InputError::Empty),
        "w" | "up" | "\u{1b}[a" => Input::Command(Command::Move {
            direction: Direction::Up,
        }),
        "s" | "down" | "\u{1b}[b" => Input::Command(Command::Move {
            direction: Direction::Down,
        }),
        "d" | "right" | "\u{1b}[c" => Input::Command(Command::Move {
            direction: Direction::Right,
        }),
        "a" | "left" | "\u{1b}[d" => Input::Command(Command::Move {
            direction: Direction::Left,
        }),
        "u" | "undo" => Input::Command(Command::Undo),
        "n" | "new" => Input::Command(Command::NewGame),
        "c" | "continue" => Input::Command(Command::DismissMessage),
        "q" | "quit" => Input::Quit,
        _ => return Err(InputError::Unknown(line.trim().to_owned())),
    };
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(direction: Direction) -> Result<Input, InputError> {
        Ok(Input::Command(Command::Move { direction }))
    }

    #[test]
    fn letters_and_names_map_to_directions() {
        assert_eq!(parse("w"), moves(Direction::Up));
        assert_eq!(parse("  Left \n"), moves(Direction::Left));
        assert_eq!(parse("S"), moves(Direction::Down));
        assert_eq!(parse("right"), moves(Direction::Right));
    }

    #[test]
    fn arrow_escape_sequences_map_to_directions() {
        assert_eq!(parse("\u{1b}[A"), moves(Direction::Up));
        assert_eq!(parse("\u{1b}[B"), moves(Direction::Down));
        assert_eq!(parse("\u{1b}[C"), moves(Direction::Right));
        assert_eq!(parse("\u{1b}[D"), moves(Direction::Left));
    }

    #[test]
    fn session_keys_map_to_commands() {
        assert_eq!(parse("u"), Ok(Input::Command(Command::Undo)));
        assert_eq!(parse("n"), Ok(Input::Command(Command::NewGame)));
        assert_eq!(parse("c"), Ok(Input::Command(Command::DismissMessage)));
        assert_eq!(parse("q"), Ok(Input::Quit));
    }

    #[test]
    fn unknown_and_blank_lines_are_rejected() {
        assert_eq!(parse("   "), Err(InputError::Empty));
        assert_eq!(parse(" x "), Err(InputError::Unknown("x".to_owned())));
    }
}
