//! Command session
//!
//! Executes the textual commands the toolbar and the command line send. This
//! is not a backgammon engine: it only moves the flags the toolbar reads and
//! keeps the settings that commands change. Every command and its outcome is
//! appended to a timestamped transcript.

use super::commands::{self, CommandSink, GameHost};
use super::host::ToolbarStyle;
use super::state::{DiceShown, MatchState, ResignLevel};
use crate::config::Config;
use crate::priority::PriorityLevel;
use chrono::{DateTime, Local};

/// Kind of transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Command,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub at: DateTime<Local>,
    pub kind: LineKind,
    pub text: String,
}

impl TranscriptLine {
    pub fn timestamp(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Setting changes the toolbar has to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ClockwiseChanged(bool),
    StyleChanged(ToolbarStyle),
}

pub struct Session {
    state: MatchState,
    config: Config,
    transcript: Vec<TranscriptLine>,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            state: MatchState::new(),
            config,
            transcript: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// Setting changes since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_line(&mut self, kind: LineKind, text: String) {
        match kind {
            LineKind::Command => tracing::debug!("Command: {}", text),
            LineKind::Info => tracing::debug!("{}", text),
            LineKind::Warning => tracing::warn!("{}", text),
        }
        self.transcript.push(TranscriptLine {
            at: Local::now(),
            kind,
            text,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push_line(LineKind::Info, text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push_line(LineKind::Warning, text.into());
    }

    fn require_game(&mut self) -> bool {
        if self.state.playing() {
            true
        } else {
            self.warn("No game in progress");
            false
        }
    }

    fn start_game(&mut self, match_to: u32) {
        self.state.start_game(match_to);
        self.state.computer_turn = self.config.game.computer_player;
        if match_to == 0 {
            self.info(format!("New money session, game {}", self.state.games));
        } else {
            self.info(format!(
                "New {}-point match, game {}",
                match_to, self.state.games
            ));
        }
    }

    fn end_game(&mut self, reason: &str) {
        self.state.finish_game();
        self.state.computer_turn = false;
        self.info(format!("Game over ({})", reason));
    }

    fn handle_new(&mut self, args: &[&str]) {
        match args {
            ["session"] => self.start_game(0),
            ["match"] => {
                let length = self.config.game.default_match_length;
                self.start_game(length);
            }
            ["match", length] => match length.parse::<u32>() {
                Ok(length) => self.start_game(length),
                Err(_) => self.warn(format!("Invalid match length '{}'", length)),
            },
            ["game"] => {
                if self.state.game_exists() {
                    let length = self.state.match_to;
                    self.start_game(length);
                } else {
                    self.warn("No match in progress; use 'new match <n>'");
                }
            }
            _ => self.warn("Usage: new match <length> | new session | new game"),
        }
    }

    fn handle_set(&mut self, args: &[&str]) {
        match args {
            ["clockwise", value] => match commands::parse_on_off(value) {
                Some(clockwise) => {
                    if self.config.toolbar.clockwise != clockwise {
                        self.config.toolbar.clockwise = clockwise;
                        self.events.push(SessionEvent::ClockwiseChanged(clockwise));
                    }
                    self.info(format!(
                        "Play {}",
                        if clockwise { "clockwise" } else { "anticlockwise" }
                    ));
                }
                None => self.warn(format!("Expected on or off, got '{}'", value)),
            },
            ["toolbar", value] => match value.parse::<ToolbarStyle>() {
                Ok(style) => {
                    if self.config.toolbar.style != style {
                        self.config.toolbar.style = style;
                        self.events.push(SessionEvent::StyleChanged(style));
                    }
                    self.info(format!("Toolbar style: {}", style.menu_label()));
                }
                Err(e) => self.warn(e.to_string()),
            },
            ["priority", value] => match value.parse::<PriorityLevel>() {
                Ok(level) => {
                    self.config.system.priority = level;
                    self.info(format!("Priority: {}", level.display_name()));
                }
                Err(e) => self.warn(e.to_string()),
            },
            ["computer", value] => match commands::parse_on_off(value) {
                Some(on) => {
                    self.config.game.computer_player = on;
                    self.state.computer_turn = on && self.state.playing();
                    self.info(format!("Computer player {}", commands::on_off(on)));
                }
                None => self.warn(format!("Expected on or off, got '{}'", value)),
            },
            _ => self.warn(format!("Unknown setting: set {}", args.join(" "))),
        }
    }

    fn save_settings(&mut self) {
        match self.config.save() {
            Ok(()) => self.info("Settings saved"),
            Err(e) => self.warn(format!("Failed to save settings: {:#}", e)),
        }
    }

    /// Analysis keeps running, with the toolbar masked, until `analyse stop`
    fn analyse(&mut self, what: &str) {
        if self.state.analysis_running {
            self.warn("Analysis already running; use 'analyse stop'");
            return;
        }
        self.state.analysis_running = true;
        self.info(format!("Analysing {}...", what));
    }

    fn stop_analysis(&mut self) {
        if self.state.analysis_running {
            self.state.analysis_running = false;
            self.info("Analysis complete");
        } else {
            self.warn("No analysis running");
        }
    }

    fn help(&mut self) {
        for line in [
            "Available commands:",
            "  new match <n> | new session | new game",
            "  roll, double, take, drop, accept, decline",
            "  resign [normal|gammon|backgammon], end game, undo, hint",
            "  previous|next [roll|game|marked|cmarked]",
            "  analyse match | analyse file | analyse stop",
            "  set clockwise on|off, set toolbar icons|text|both",
            "  set priority <level>, set computer on|off",
            "  save settings, load match, save match",
        ] {
            self.info(line);
        }
    }

    fn dispatch(&mut self, command: &str) {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((&verb, args)) = parts.split_first() else {
            return;
        };

        match (verb, args) {
            ("new", args) => self.handle_new(args),
            ("roll", []) => {
                if self.require_game() {
                    if self.state.doubled || self.state.resigned.is_some() {
                        self.warn("Answer the pending offer first");
                    } else if !self.state.dice_shown.before_roll() {
                        self.warn("Dice already rolled");
                    } else {
                        self.state.dice_shown = DiceShown::OnBoard;
                    }
                }
            }
            ("double", []) => {
                if self.require_game() {
                    self.state.doubled = true;
                    self.info("Double offered");
                }
            }
            ("take" | "drop", []) => {
                if !self.state.doubled {
                    self.warn("No double to answer");
                } else if verb == "take" {
                    self.state.doubled = false;
                    self.info("Double accepted");
                } else {
                    self.end_game("double dropped");
                }
            }
            ("resign", args) => {
                if self.require_game() {
                    let word = args.first().copied().unwrap_or("");
                    match ResignLevel::from_word(word) {
                        Some(level) => {
                            self.state.resigned = Some(level);
                            self.info(format!("Resignation offered ({:?})", level));
                        }
                        None => self.warn(format!("Unknown resignation '{}'", word)),
                    }
                }
            }
            ("accept" | "decline", []) => {
                if self.state.resigned.is_none() {
                    self.warn("No resignation to answer");
                } else if verb == "accept" {
                    self.end_game("resignation accepted");
                } else {
                    self.state.resigned = None;
                    self.info("Resignation declined");
                }
            }
            ("end", ["game"]) => {
                if self.require_game() {
                    self.end_game("played out");
                }
            }
            ("undo", []) => {
                if self.require_game() {
                    self.state.dice_shown = DiceShown::BelowBoard;
                }
            }
            ("hint", []) | ("previous" | "next", _) => {}
            ("analyse" | "analyze", [what @ ("match" | "file")]) => self.analyse(what),
            ("analyse" | "analyze", ["stop"]) => self.stop_analysis(),
            ("set", args) => self.handle_set(args),
            ("save", ["settings"]) => self.save_settings(),
            ("load" | "save", ["match"]) => {
                self.info("Match files are not supported in this session")
            }
            ("help", []) => self.help(),
            _ => self.warn(format!("Unknown command: {} (try help)", command)),
        }
    }
}

impl CommandSink for Session {
    fn execute(&mut self, command: &str) {
        let command = command.trim();
        if command.is_empty() {
            return;
        }
        self.push_line(LineKind::Command, command.to_string());
        self.dispatch(command);
    }
}

impl GameHost for Session {
    fn match_state(&self) -> &MatchState {
        &self.state
    }

    fn game_in_progress(&self) -> bool {
        self.state.game_exists()
    }

    fn new_edit_game(&mut self, match_length: u32) {
        if match_length == 0 {
            self.execute("new session");
        } else {
            self.execute(&format!("new match {}", match_length));
        }
    }

    fn discard_partial_move(&mut self) {
        if self.state.playing() {
            self.info("Partial move discarded");
        }
    }
}
