//! Textual command surface
//!
//! The toolbar never touches game state directly. It sends human-readable
//! command strings to a `CommandSink` and never looks at the result.

use super::controls::Answer;
use super::state::MatchState;

pub const SAVE_SETTINGS: &str = "save settings";

/// Anything that executes textual game commands
pub trait CommandSink {
    fn execute(&mut self, command: &str);
}

/// Command sink that also exposes the game hooks edit mode needs
pub trait GameHost: CommandSink {
    fn match_state(&self) -> &MatchState;

    /// A game is currently open
    fn game_in_progress(&self) -> bool;

    /// Open a fresh position to edit
    fn new_edit_game(&mut self, match_length: u32);

    /// Throw away a partially entered move
    fn discard_partial_move(&mut self);
}

/// `set clockwise on|off`
pub fn set_clockwise(clockwise: bool) -> String {
    format!("set clockwise {}", on_off(clockwise))
}

pub fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Parse `on`/`off` style arguments
pub fn parse_on_off(word: &str) -> Option<bool> {
    match word.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Command for a yes/no button given what is on the table. A pending
/// resignation takes precedence over a pending double; with neither there is
/// nothing to answer.
pub fn answer_command(answer: Answer, state: &MatchState) -> Option<&'static str> {
    if state.resigned.is_some() {
        return Some(match answer {
            Answer::Yes => "accept",
            Answer::No => "decline",
        });
    }

    if state.doubled {
        return Some(match answer {
            Answer::Yes => "take",
            Answer::No => "drop",
        });
    }

    None
}

/// Records every command it receives
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub commands: Vec<String>,
    pub state: MatchState,
    pub game_open: bool,
    pub edit_games: Vec<u32>,
    pub discarded_moves: usize,
}

#[cfg(test)]
impl RecordingSink {
    pub fn count(&self, command: &str) -> usize {
        self.commands.iter().filter(|c| c.as_str() == command).count()
    }
}

#[cfg(test)]
impl CommandSink for RecordingSink {
    fn execute(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }
}

#[cfg(test)]
impl GameHost for RecordingSink {
    fn match_state(&self) -> &MatchState {
        &self.state
    }

    fn game_in_progress(&self) -> bool {
        self.game_open
    }

    fn new_edit_game(&mut self, match_length: u32) {
        self.commands.push(format!("<new edit game {}>", match_length));
        self.edit_games.push(match_length);
        self.game_open = true;
    }

    fn discard_partial_move(&mut self) {
        self.commands.push("<discard partial move>".to_string());
        self.discarded_moves += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ResignLevel;

    #[test]
    fn test_answer_prefers_resignation() {
        let mut state = MatchState::new();
        assert_eq!(answer_command(Answer::Yes, &state), None);

        state.doubled = true;
        assert_eq!(answer_command(Answer::Yes, &state), Some("take"));
        assert_eq!(answer_command(Answer::No, &state), Some("drop"));

        state.resigned = Some(ResignLevel::Gammon);
        assert_eq!(answer_command(Answer::Yes, &state), Some("accept"));
        assert_eq!(answer_command(Answer::No, &state), Some("decline"));
    }

    #[test]
    fn test_on_off() {
        assert_eq!(set_clockwise(true), "set clockwise on");
        assert_eq!(set_clockwise(false), "set clockwise off");
        assert_eq!(parse_on_off("ON"), Some(true));
        assert_eq!(parse_on_off("off"), Some(false));
        assert_eq!(parse_on_off("maybe"), None);
    }
}
