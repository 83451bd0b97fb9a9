//! Toolbar control catalogue
//!
//! Every control the toolbar shows, what it looks like and what it does when
//! activated, plus the fixed order they are laid out in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical name of a toolbar control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ControlId {
    New,
    Open,
    Save,
    Double,
    Take,
    Drop,
    Resign,
    EndGame,
    Hint,
    PrevMarked,
    PrevCMarked,
    Prev,
    PrevGame,
    NextGame,
    Next,
    NextCMarked,
    NextMarked,
    Reset,
    AnalyzeCurrent,
    AnalyzeFile,
    Edit,
    ButtonClockwise,
}

impl ControlId {
    pub const ALL: [ControlId; 22] = [
        ControlId::New,
        ControlId::Open,
        ControlId::Save,
        ControlId::Double,
        ControlId::Take,
        ControlId::Drop,
        ControlId::Resign,
        ControlId::EndGame,
        ControlId::Hint,
        ControlId::PrevMarked,
        ControlId::PrevCMarked,
        ControlId::Prev,
        ControlId::PrevGame,
        ControlId::NextGame,
        ControlId::Next,
        ControlId::NextCMarked,
        ControlId::NextMarked,
        ControlId::Reset,
        ControlId::AnalyzeCurrent,
        ControlId::AnalyzeFile,
        ControlId::Edit,
        ControlId::ButtonClockwise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Open => "Open",
            Self::Save => "Save",
            Self::Double => "Double",
            Self::Take => "Take",
            Self::Drop => "Drop",
            Self::Resign => "Resign",
            Self::EndGame => "EndGame",
            Self::Hint => "Hint",
            Self::PrevMarked => "PrevMarked",
            Self::PrevCMarked => "PrevCMarked",
            Self::Prev => "Prev",
            Self::PrevGame => "PrevGame",
            Self::NextGame => "NextGame",
            Self::Next => "Next",
            Self::NextCMarked => "NextCMarked",
            Self::NextMarked => "NextMarked",
            Self::Reset => "Reset",
            Self::AnalyzeCurrent => "AnalyzeCurrent",
            Self::AnalyzeFile => "AnalyzeFile",
            Self::Edit => "Edit",
            Self::ButtonClockwise => "ButtonClockwise",
        }
    }

    pub fn spec(self) -> &'static ControlSpec {
        CONTROLS
            .iter()
            .find(|spec| spec.id == self)
            .unwrap_or(&CONTROLS[0])
    }

    pub fn toggle_kind(self) -> Option<ToggleKind> {
        match self.spec().action {
            ControlAction::Toggle(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown toolbar control '{}'", s))
    }
}

/// Two-state toolbar toggles mirrored by a menu checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleKind {
    /// Position editing
    Edit,
    /// Direction of play (active = clockwise)
    Direction,
}

impl ToggleKind {
    pub fn control(self) -> ControlId {
        match self {
            Self::Edit => ControlId::Edit,
            Self::Direction => ControlId::ButtonClockwise,
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Self::Edit => "Edit Position",
            Self::Direction => "Play Clockwise",
        }
    }
}

/// Which side of an offer a yes/no button answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

/// Actions that open dialogs in a desktop build; the application decides
/// what they do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    New,
    Open,
    Save,
    Resign,
    Undo,
    AnalyzeCurrent,
    AnalyzeFile,
}

/// What activating a control does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Send one fixed command
    Command(&'static str),
    /// Answer the pending double or resignation
    YesNo(Answer),
    Toggle(ToggleKind),
    Host(HostAction),
}

/// Static description of a control
#[derive(Debug)]
pub struct ControlSpec {
    pub id: ControlId,
    /// Single-cell icon
    pub glyph: &'static str,
    /// Empty for the navigation arrows
    pub label: &'static str,
    pub tooltip: &'static str,
    pub action: ControlAction,
    /// Same width as its neighbours
    pub homogeneous: bool,
}

impl ControlSpec {
    /// Label used when icons are hidden; navigation arrows have no label so
    /// fall back to the glyph
    pub fn text_label(&self) -> &'static str {
        if self.label.is_empty() {
            self.glyph
        } else {
            self.label
        }
    }
}

pub static CONTROLS: [ControlSpec; 22] = [
    ControlSpec {
        id: ControlId::New,
        glyph: "✚",
        label: "New",
        tooltip: "Start new game, match, session or position",
        action: ControlAction::Host(HostAction::New),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Open,
        glyph: "▤",
        label: "Open",
        tooltip: "Open game, match, session or position",
        action: ControlAction::Host(HostAction::Open),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Save,
        glyph: "▣",
        label: "Save",
        tooltip: "Save match, session, game or position",
        action: ControlAction::Host(HostAction::Save),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Take,
        glyph: "✔",
        label: "Accept",
        tooltip: "Take the offered cube or accept the offered resignation",
        action: ControlAction::YesNo(Answer::Yes),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Drop,
        glyph: "✘",
        label: "Reject",
        tooltip: "Drop the offered cube or decline the offered resignation",
        action: ControlAction::YesNo(Answer::No),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Double,
        glyph: "②",
        label: "Double",
        tooltip: "Double or redouble(beaver)",
        action: ControlAction::Command("double"),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Resign,
        glyph: "⚑",
        label: "Resign",
        tooltip: "Resign the current game",
        action: ControlAction::Host(HostAction::Resign),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::EndGame,
        glyph: "⇉",
        label: "End Game",
        tooltip: "Let the computer end the game",
        action: ControlAction::Command("end game"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::Reset,
        glyph: "↶",
        label: "Undo",
        tooltip: "Undo moves",
        action: ControlAction::Host(HostAction::Undo),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Hint,
        glyph: "?",
        label: "Hint",
        tooltip: "Show the best moves or cube action",
        action: ControlAction::Command("hint"),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::Edit,
        glyph: "✎",
        label: "Edit",
        tooltip: "Toggle Edit Mode",
        action: ControlAction::Toggle(ToggleKind::Edit),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::ButtonClockwise,
        glyph: "↺",
        label: "Direction",
        tooltip: "Reverse direction of play",
        action: ControlAction::Toggle(ToggleKind::Direction),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::AnalyzeCurrent,
        glyph: "⚙",
        label: "Analyse",
        tooltip: "Analyse current match (set default behaviour in Settings -> Analysis)",
        action: ControlAction::Host(HostAction::AnalyzeCurrent),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::AnalyzeFile,
        glyph: "▦",
        label: "Analyse File",
        tooltip: "Analyze match from file (set default behaviour in Settings -> Analysis -> Analysis Buttons)",
        action: ControlAction::Host(HostAction::AnalyzeFile),
        homogeneous: true,
    },
    ControlSpec {
        id: ControlId::PrevMarked,
        glyph: "⇤",
        label: "",
        tooltip: "Go to Previous Marked",
        action: ControlAction::Command("previous marked"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::PrevCMarked,
        glyph: "↞",
        label: "",
        tooltip: "Go to Previous CMarked",
        action: ControlAction::Command("previous cmarked"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::Prev,
        glyph: "◀",
        label: "",
        tooltip: "Go to Previous Roll",
        action: ControlAction::Command("previous roll"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::PrevGame,
        glyph: "«",
        label: "",
        tooltip: "Go to Previous Game",
        action: ControlAction::Command("previous game"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::NextGame,
        glyph: "»",
        label: "",
        tooltip: "Go to Next Game",
        action: ControlAction::Command("next game"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::Next,
        glyph: "▶",
        label: "",
        tooltip: "Go to Next Roll",
        action: ControlAction::Command("next roll"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::NextCMarked,
        glyph: "↠",
        label: "",
        tooltip: "Go to Next CMarked",
        action: ControlAction::Command("next cmarked"),
        homogeneous: false,
    },
    ControlSpec {
        id: ControlId::NextMarked,
        glyph: "⇥",
        label: "",
        tooltip: "Go to Next Marked",
        action: ControlAction::Command("next marked"),
        homogeneous: false,
    },
];

/// One slot in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Control(ControlId),
    /// Drawn divider
    Separator,
    /// Invisible separator that takes up the remaining width
    Spacer,
}

pub const LAYOUT: [ToolbarItem; 26] = [
    ToolbarItem::Control(ControlId::New),
    ToolbarItem::Control(ControlId::Open),
    ToolbarItem::Control(ControlId::Save),
    ToolbarItem::Separator,
    ToolbarItem::Control(ControlId::Take),
    ToolbarItem::Control(ControlId::Drop),
    ToolbarItem::Control(ControlId::Double),
    ToolbarItem::Control(ControlId::Resign),
    ToolbarItem::Control(ControlId::EndGame),
    ToolbarItem::Separator,
    ToolbarItem::Control(ControlId::Reset),
    ToolbarItem::Control(ControlId::Hint),
    ToolbarItem::Control(ControlId::Edit),
    ToolbarItem::Control(ControlId::ButtonClockwise),
    ToolbarItem::Separator,
    ToolbarItem::Control(ControlId::AnalyzeCurrent),
    ToolbarItem::Control(ControlId::AnalyzeFile),
    ToolbarItem::Spacer,
    ToolbarItem::Control(ControlId::PrevMarked),
    ToolbarItem::Control(ControlId::PrevCMarked),
    ToolbarItem::Control(ControlId::Prev),
    ToolbarItem::Control(ControlId::PrevGame),
    ToolbarItem::Control(ControlId::NextGame),
    ToolbarItem::Control(ControlId::Next),
    ToolbarItem::Control(ControlId::NextCMarked),
    ToolbarItem::Control(ControlId::NextMarked),
];
