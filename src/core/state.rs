//! Match state read by the toolbar
//!
//! Only the flags the toolbar needs: whether a double or resignation is on
//! the table, the match length, where the dice are, and whether a game exists.

/// Where the dice currently sit. Ordered: everything up to `BelowBoard`
/// means the player to move has not rolled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DiceShown {
    #[default]
    None,
    BelowBoard,
    Rolling,
    OnBoard,
}

impl DiceShown {
    pub const ALL: [DiceShown; 4] = [
        DiceShown::None,
        DiceShown::BelowBoard,
        DiceShown::Rolling,
        DiceShown::OnBoard,
    ];

    /// True while the player to move may still roll or double
    pub fn before_roll(self) -> bool {
        self <= DiceShown::BelowBoard
    }
}

/// Phase of the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    None,
    Playing,
    Over,
}

/// Size of an offered resignation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResignLevel {
    Normal,
    Gammon,
    Backgammon,
}

impl ResignLevel {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "" | "normal" | "single" => Some(Self::Normal),
            "gammon" => Some(Self::Gammon),
            "backgammon" => Some(Self::Backgammon),
            _ => None,
        }
    }
}

/// Match state snapshot
#[derive(Clone, Debug, Default)]
pub struct MatchState {
    pub phase: GamePhase,

    /// Match length in points, 0 for a money session
    pub match_to: u32,

    /// A double has been offered and not yet answered
    pub doubled: bool,

    /// An offered resignation awaiting an answer
    pub resigned: Option<ResignLevel>,

    pub dice_shown: DiceShown,

    /// The computer plays the side to move
    pub computer_turn: bool,

    /// A background analysis is in progress
    pub analysis_running: bool,

    /// Number of games recorded in the current match
    pub games: u32,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A game record exists (it may already be finished)
    pub fn game_exists(&self) -> bool {
        self.games > 0
    }

    /// A game is being played right now
    pub fn playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_money_session(&self) -> bool {
        self.match_to == 0
    }

    /// Start a fresh game of a match (or session when `match_to` is 0)
    pub fn start_game(&mut self, match_to: u32) {
        self.phase = GamePhase::Playing;
        self.match_to = match_to;
        self.doubled = false;
        self.resigned = None;
        self.dice_shown = DiceShown::BelowBoard;
        self.games += 1;
    }

    pub fn finish_game(&mut self) {
        self.phase = GamePhase::Over;
        self.doubled = false;
        self.resigned = None;
        self.dice_shown = DiceShown::None;
    }
}
