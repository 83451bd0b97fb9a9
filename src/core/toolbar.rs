//! Toolbar state and behaviour
//!
//! `ToolbarState` is the single owner of everything the toolbar remembers:
//! which controls are enabled, whether a position is being edited, the
//! direction of play and the presentation style. Every handler receives it by
//! reference; there are no process-wide flags.
//!
//! Toggle changes go through `notify_toggle`, which runs the side effects once
//! and then pushes the new state to the peer observers. A peer that reports
//! the same change back does so with `suppress_echo` set, which only refreshes
//! the stored mirror.

use super::commands::{self, CommandSink, GameHost, SAVE_SETTINGS};
use super::control_mode::{self, ModeInputs, ToolbarControlMode};
use super::controls::{ControlAction, ControlId, HostAction, ToggleKind, ToolbarItem, LAYOUT};
use super::host::{ToggleImage, ToggleObserver, ToggleOrigin, ToolbarHost, ToolbarStyle};
use super::sensitivity::{Sensitivity, SensitivityInputs};
use super::state::MatchState;
use std::collections::BTreeMap;

/// Everything a toggle change may need to touch
pub struct ToolbarContext<'a> {
    pub host: &'a mut dyn ToolbarHost,
    pub menu: &'a mut dyn ToggleObserver,
    pub game: &'a mut dyn GameHost,
}

/// Outcome of activating a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A command was sent
    Sent(&'static str),
    /// Yes/No pressed with nothing on the table
    NothingToAnswer,
    Toggled(ToggleKind, bool),
    /// The application handles this one
    Host(HostAction),
    Disabled,
}

pub struct ToolbarState {
    enabled: BTreeMap<ControlId, bool>,
    editing: bool,
    clockwise: bool,
    style: ToolbarStyle,
    /// Match length used when edit mode has to open a game
    default_match_length: u32,
    last_mode: ToolbarControlMode,
}

impl ToolbarState {
    /// Lay out every control on the host and bring it to the saved style and
    /// direction. Nothing is persisted here.
    pub fn build(
        host: &mut dyn ToolbarHost,
        style: ToolbarStyle,
        clockwise: bool,
        default_match_length: u32,
    ) -> Self {
        for item in LAYOUT.iter() {
            match item {
                ToolbarItem::Control(id) => {
                    let spec = id.spec();
                    match spec.action {
                        ControlAction::Toggle(kind) => host.add_toggle(spec, kind),
                        _ => host.add_command_button(spec),
                    }
                }
                ToolbarItem::Separator => host.add_separator(false),
                ToolbarItem::Spacer => host.add_separator(true),
            }
        }

        let state = Self {
            enabled: ControlId::ALL.iter().map(|id| (*id, true)).collect(),
            editing: false,
            clockwise,
            style,
            default_match_length,
            last_mode: ToolbarControlMode::None,
        };

        state.apply_style(host);
        warn_on_err(
            host.set_toggle_active(ControlId::ButtonClockwise, clockwise),
            "set direction toggle",
        );

        tracing::debug!(
            "Toolbar built: {} controls, style={}, clockwise={}",
            ControlId::ALL.len(),
            style,
            clockwise
        );
        state
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    pub fn style(&self) -> ToolbarStyle {
        self.style
    }

    pub fn last_mode(&self) -> ToolbarControlMode {
        self.last_mode
    }

    pub fn is_enabled(&self, id: ControlId) -> bool {
        self.enabled.get(&id).copied().unwrap_or(false)
    }

    pub fn set_default_match_length(&mut self, length: u32) {
        self.default_match_length = length;
    }

    pub fn toggle_active(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::Edit => self.editing,
            ToggleKind::Direction => self.clockwise,
        }
    }

    fn set_enabled(&mut self, host: &mut dyn ToolbarHost, id: ControlId, enabled: bool) {
        self.enabled.insert(id, enabled);
        host.set_enabled(id, enabled);
    }

    /// Recompute the control mode and every control's enabled state from the
    /// match. Returns the mode.
    pub fn update(
        &mut self,
        host: &mut dyn ToolbarHost,
        state: &MatchState,
        playing: bool,
    ) -> ToolbarControlMode {
        let mode = control_mode::resolve(&ModeInputs {
            dice_shown: state.dice_shown,
            doubled: state.doubled,
            resigned: state.resigned.is_some(),
            computer_turn: state.computer_turn,
            editing: self.editing,
            playing,
        });

        let sensitivity = Sensitivity::compute(&SensitivityInputs {
            mode,
            match_to: state.match_to,
            game_exists: state.game_exists(),
            playing,
            editing: self.editing,
            analysis_running: state.analysis_running,
        });

        for (id, enabled) in sensitivity.iter() {
            self.set_enabled(host, id, enabled);
        }

        if mode != self.last_mode {
            tracing::debug!("Toolbar mode {} -> {}", self.last_mode.label(), mode.label());
        }
        self.last_mode = mode;
        mode
    }

    /// Only the undo button follows this flag
    pub fn set_playing(&mut self, host: &mut dyn ToolbarHost, playing: bool) {
        self.set_enabled(host, ControlId::Reset, playing);
    }

    /// Run the control's action. Disabled controls do nothing.
    pub fn activate(&mut self, id: ControlId, cx: &mut ToolbarContext<'_>) -> Activation {
        if !self.is_enabled(id) {
            tracing::debug!("Ignoring click on disabled control {}", id);
            return Activation::Disabled;
        }

        match id.spec().action {
            ControlAction::Command(command) => {
                tracing::debug!("Toolbar {} -> '{}'", id, command);
                cx.game.execute(command);
                Activation::Sent(command)
            }
            ControlAction::YesNo(answer) => {
                match commands::answer_command(answer, cx.game.match_state()) {
                    Some(command) => {
                        tracing::debug!("Toolbar {} -> '{}'", id, command);
                        cx.game.execute(command);
                        Activation::Sent(command)
                    }
                    None => Activation::NothingToAnswer,
                }
            }
            ControlAction::Toggle(kind) => {
                let active = !self.toggle_active(kind);
                self.notify_toggle(kind, active, ToggleOrigin::Toolbar, false, cx);
                Activation::Toggled(kind, active)
            }
            ControlAction::Host(action) => Activation::Host(action),
        }
    }

    /// A toggle changed on one of its observers.
    ///
    /// With `suppress_echo` the call is the echo of a sync already in
    /// progress: only the mirror is updated. Otherwise the side effects run
    /// once and every observer except `origin` is brought in line.
    pub fn notify_toggle(
        &mut self,
        kind: ToggleKind,
        active: bool,
        origin: ToggleOrigin,
        suppress_echo: bool,
        cx: &mut ToolbarContext<'_>,
    ) {
        if suppress_echo {
            match kind {
                ToggleKind::Edit => self.editing = active,
                ToggleKind::Direction => self.clockwise = active,
            }
            return;
        }

        match kind {
            ToggleKind::Edit => self.apply_edit(active, cx.game),
            ToggleKind::Direction => self.apply_direction(active, cx.game),
        }

        let control = kind.control();
        if origin != ToggleOrigin::Toolbar {
            warn_on_err(cx.host.set_toggle_active(control, active), "sync toolbar toggle");
        }
        warn_on_err(
            cx.host.set_toggle_image(control, ToggleImage::from(active)),
            "swap toggle image",
        );
        if origin != ToggleOrigin::Menu {
            cx.menu.sync_toggle(kind, active);
        }
    }

    fn apply_edit(&mut self, active: bool, game: &mut dyn GameHost) {
        if active {
            if !game.game_in_progress() {
                tracing::info!(
                    "No game open; starting a {}-point game to edit",
                    self.default_match_length
                );
                game.new_edit_game(self.default_match_length);
            }
            // Must happen before editing is set
            game.discard_partial_move();
        }
        self.editing = active;
    }

    fn apply_direction(&mut self, clockwise: bool, sink: &mut dyn GameHost) {
        if self.clockwise != clockwise {
            sink.execute(&commands::set_clockwise(clockwise));
            sink.execute(SAVE_SETTINGS);
        }
        self.clockwise = clockwise;
    }

    /// Menu accelerator for edit mode: flips the toggle as if its checkbox
    /// had been clicked
    pub fn click_edit(&mut self, cx: &mut ToolbarContext<'_>) {
        let active = !self.editing;
        self.notify_toggle(ToggleKind::Edit, active, ToggleOrigin::Menu, false, cx);
        cx.menu.sync_toggle(ToggleKind::Edit, active);
    }

    /// Menu accelerator for the direction of play
    pub fn click_swap_direction(&mut self, cx: &mut ToolbarContext<'_>) {
        let active = !self.clockwise;
        self.notify_toggle(ToggleKind::Direction, active, ToggleOrigin::Menu, false, cx);
        cx.menu.sync_toggle(ToggleKind::Direction, active);
    }

    /// The direction was changed elsewhere (e.g. by `set clockwise`). Moves
    /// the toggle, image and menu without persisting anything.
    pub fn set_clockwise(
        &mut self,
        host: &mut dyn ToolbarHost,
        menu: &mut dyn ToggleObserver,
        clockwise: bool,
    ) {
        self.clockwise = clockwise;
        let control = ToggleKind::Direction.control();
        warn_on_err(host.set_toggle_active(control, clockwise), "set direction toggle");
        warn_on_err(
            host.set_toggle_image(control, ToggleImage::from(clockwise)),
            "swap direction image",
        );
        menu.sync_toggle(ToggleKind::Direction, clockwise);
    }

    /// Switch presentation style on every control. Persists only when the
    /// style actually changes.
    pub fn set_style(
        &mut self,
        host: &mut dyn ToolbarHost,
        sink: &mut dyn CommandSink,
        style: ToolbarStyle,
    ) {
        let changed = style != self.style;
        self.style = style;
        self.apply_style(host);

        if changed {
            tracing::info!("Toolbar style changed to {}", style);
            sink.execute(&format!("set toolbar {}", style.token()));
            sink.execute(SAVE_SETTINGS);
        }
    }

    /// The style was changed elsewhere (e.g. by `set toolbar`); redraw only
    pub fn adopt_style(&mut self, host: &mut dyn ToolbarHost, style: ToolbarStyle) {
        self.style = style;
        self.apply_style(host);
    }

    fn apply_style(&self, host: &mut dyn ToolbarHost) {
        for id in ControlId::ALL {
            let result = if id.toggle_kind().is_some() {
                host.set_toggle_style(id, self.style)
            } else {
                host.set_button_style(id, self.style)
            };
            warn_on_err(result, "apply toolbar style");
        }

        // The direction toggle shows one of two images
        warn_on_err(
            host.set_toggle_image(ControlId::ButtonClockwise, ToggleImage::from(self.clockwise)),
            "refresh direction image",
        );
    }
}

/// Narrowing failures are local: warn and carry on with the next control
fn warn_on_err(result: anyhow::Result<()>, what: &str) {
    if let Err(e) = result {
        tracing::warn!("Failed to {}: {}", what, e);
    }
}
