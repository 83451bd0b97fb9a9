//! Which controls are enabled for a given mode and match state
//!
//! A running background analysis disables the controls that would change the
//! match under it, whatever the mode says.

use super::control_mode::ToolbarControlMode;
use super::controls::ControlId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensitivityInputs {
    pub mode: ToolbarControlMode,
    /// Match length, 0 for a money session
    pub match_to: u32,
    pub game_exists: bool,
    pub playing: bool,
    pub editing: bool,
    pub analysis_running: bool,
}

/// Enabled flag for every control the update touches. New, AnalyzeFile and
/// ButtonClockwise are left out and keep whatever state they had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sensitivity(BTreeMap<ControlId, bool>);

impl Sensitivity {
    pub fn compute(i: &SensitivityInputs) -> Self {
        use ControlId::*;

        let idle = !i.analysis_running;
        let in_game = i.playing && !i.editing;
        let answering = i.mode.expects_answer();
        // Money play allows a beaver while the double is being answered
        let may_double = (i.mode == ToolbarControlMode::TakeOrDrop && i.match_to == 0)
            || i.mode == ToolbarControlMode::RollOrDouble;

        let mut map = BTreeMap::new();
        map.insert(Take, answering && idle);
        map.insert(Drop, answering && idle);
        map.insert(Double, may_double && idle);
        map.insert(Save, i.game_exists && idle);
        map.insert(Resign, in_game && idle);
        map.insert(Hint, in_game && idle);
        for id in [
            PrevMarked,
            PrevCMarked,
            Prev,
            PrevGame,
            NextGame,
            Next,
            NextCMarked,
            NextMarked,
            EndGame,
        ] {
            map.insert(id, in_game);
        }
        map.insert(Edit, idle);
        map.insert(Open, idle);
        map.insert(Reset, idle);
        map.insert(AnalyzeCurrent, i.game_exists && idle);

        Self(map)
    }

    pub fn get(&self, id: ControlId) -> Option<bool> {
        self.0.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlId, bool)> + '_ {
        self.0.iter().map(|(id, enabled)| (*id, *enabled))
    }
}
