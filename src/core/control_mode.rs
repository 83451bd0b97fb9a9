//! Control mode resolution
//!
//! The mode says which dice/cube action the toolbar currently permits. It is
//! derived from a handful of flags by an ordered rule list: rules are checked
//! top to bottom and the last one that matches wins, so a rule further down
//! always overrides the ones above it.

use super::state::DiceShown;

/// Which dice/cube action is currently permitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolbarControlMode {
    #[default]
    None,
    RollOrDouble,
    TakeOrDrop,
    AgreeOrDecline,
    Play,
}

impl ToolbarControlMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::RollOrDouble => "roll or double",
            Self::TakeOrDrop => "take or drop",
            Self::AgreeOrDecline => "agree or decline",
            Self::Play => "computer to play",
        }
    }

    /// Take/Drop answer something in this mode
    pub fn expects_answer(self) -> bool {
        matches!(self, Self::TakeOrDrop | Self::AgreeOrDecline)
    }
}

/// Flags the mode is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeInputs {
    pub dice_shown: DiceShown,
    pub doubled: bool,
    pub resigned: bool,
    pub computer_turn: bool,
    pub editing: bool,
    pub playing: bool,
}

/// One precedence rule
pub struct ModeRule {
    pub name: &'static str,
    pub applies: fn(&ModeInputs) -> bool,
    pub mode: ToolbarControlMode,
}

/// Rules in precedence order, lowest first
pub const RULES: [ModeRule; 5] = [
    ModeRule {
        name: "dice not rolled",
        applies: |i| i.dice_shown.before_roll(),
        mode: ToolbarControlMode::RollOrDouble,
    },
    ModeRule {
        name: "double offered",
        applies: |i| i.doubled,
        mode: ToolbarControlMode::TakeOrDrop,
    },
    ModeRule {
        name: "resignation offered",
        applies: |i| i.resigned,
        mode: ToolbarControlMode::AgreeOrDecline,
    },
    ModeRule {
        name: "computer's turn",
        applies: |i| i.computer_turn,
        mode: ToolbarControlMode::Play,
    },
    ModeRule {
        name: "editing or not playing",
        applies: |i| i.editing || !i.playing,
        mode: ToolbarControlMode::None,
    },
];

/// The rule that decides the mode, if any applies
pub fn deciding_rule(inputs: &ModeInputs) -> Option<&'static ModeRule> {
    RULES.iter().rev().find(|rule| (rule.applies)(inputs))
}

pub fn resolve(inputs: &ModeInputs) -> ToolbarControlMode {
    deciding_rule(inputs)
        .map(|rule| rule.mode)
        .unwrap_or(ToolbarControlMode::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_inputs() -> Vec<ModeInputs> {
        let mut out = Vec::new();
        for dice_shown in DiceShown::ALL {
            for bits in 0u8..32 {
                out.push(ModeInputs {
                    dice_shown,
                    doubled: bits & 1 != 0,
                    resigned: bits & 2 != 0,
                    computer_turn: bits & 4 != 0,
                    editing: bits & 8 != 0,
                    playing: bits & 16 != 0,
                });
            }
        }
        out
    }

    /// Reference: sequential overrides in the documented order
    fn reference(i: &ModeInputs) -> ToolbarControlMode {
        let mut c = ToolbarControlMode::None;
        if i.dice_shown <= DiceShown::BelowBoard {
            c = ToolbarControlMode::RollOrDouble;
        }
        if i.doubled {
            c = ToolbarControlMode::TakeOrDrop;
        }
        if i.resigned {
            c = ToolbarControlMode::AgreeOrDecline;
        }
        if i.computer_turn {
            c = ToolbarControlMode::Play;
        }
        if i.editing || !i.playing {
            c = ToolbarControlMode::None;
        }
        c
    }

    #[test]
    fn test_every_combination_matches_reference() {
        let inputs = all_inputs();
        assert_eq!(inputs.len(), 128);
        for i in inputs {
            assert_eq!(resolve(&i), reference(&i), "inputs: {:?}", i);
        }
    }

    #[test]
    fn test_roll_or_double_scenario() {
        let inputs = ModeInputs {
            dice_shown: DiceShown::BelowBoard,
            playing: true,
            ..Default::default()
        };
        assert_eq!(resolve(&inputs), ToolbarControlMode::RollOrDouble);
        assert_eq!(deciding_rule(&inputs).unwrap().name, "dice not rolled");
    }

    #[test]
    fn test_editing_always_wins() {
        let inputs = ModeInputs {
            dice_shown: DiceShown::None,
            doubled: true,
            resigned: true,
            computer_turn: true,
            editing: true,
            playing: true,
        };
        assert_eq!(resolve(&inputs), ToolbarControlMode::None);
    }

    #[test]
    fn test_resignation_beats_double() {
        let inputs = ModeInputs {
            dice_shown: DiceShown::OnBoard,
            doubled: true,
            resigned: true,
            playing: true,
            ..Default::default()
        };
        assert_eq!(resolve(&inputs), ToolbarControlMode::AgreeOrDecline);
    }

    #[test]
    fn test_nothing_applies() {
        let inputs = ModeInputs {
            dice_shown: DiceShown::OnBoard,
            playing: true,
            ..Default::default()
        };
        assert!(deciding_rule(&inputs).is_none());
        assert_eq!(resolve(&inputs), ToolbarControlMode::None);
    }
}
