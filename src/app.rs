//! Application state and event loop.
//!
//! `App` owns the toolbar state, the command session and the terminal widgets
//! that stand in for the toolbar and menu. Input events are turned into
//! toolbar activations, menu choices or command lines; after each one the
//! toolbar is brought back in line with the match.

use crate::config::Config;
use crate::core::commands::CommandSink;
use crate::core::controls::{ControlId, HostAction};
use crate::core::host::{ToggleOrigin, ToolbarStyle};
use crate::core::menu_actions::{KeyAction, KeyMap, MenuId};
use crate::core::session::SessionEvent;
use crate::core::{Activation, Session, ToolbarContext, ToolbarState};
use crate::frontend::tui::command_input::CommandInput;
use crate::frontend::tui::menu_bar::{MenuBar, MenuClick, MenuCommand};
use crate::frontend::tui::toolbar::ToolbarWidget;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEventKind};
use std::path::PathBuf;

pub struct App {
    pub session: Session,
    pub toolbar: ToolbarState,
    pub widget: ToolbarWidget,
    pub menu: MenuBar,
    pub keymap: KeyMap,
    pub command_input: CommandInput,
    /// Tooltip of the control under the pointer
    pub status_hint: Option<&'static str>,
    pub running: bool,
    /// Where command history is loaded from and saved to
    history_path: Option<PathBuf>,
}

impl App {
    /// App with command history kept in the data directory
    pub fn new(config: Config) -> Self {
        let history_path = match Config::history_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("No history path: {:#}", e);
                None
            }
        };
        Self::with_history(config, history_path)
    }

    pub fn with_history(config: Config, history_path: Option<PathBuf>) -> Self {
        let mut widget = ToolbarWidget::new();
        let toolbar = ToolbarState::build(
            &mut widget,
            config.toolbar.style,
            config.toolbar.clockwise,
            config.game.default_match_length,
        );
        let menu = MenuBar::new(config.toolbar.style, config.toolbar.clockwise);
        let keymap = KeyMap::from_config(&config.keybinds);
        if keymap.is_empty() {
            tracing::warn!("No usable keybinds; toolbar is mouse and command line only");
        } else {
            tracing::info!("{} keybinds active", keymap.len());
        }

        let mut command_input = CommandInput::new(100);
        if let Some(path) = &history_path {
            if let Err(e) = command_input.load_history(path) {
                tracing::warn!("Failed to load command history: {:#}", e);
            }
        }

        let mut app = Self {
            session: Session::new(config),
            toolbar,
            widget,
            menu,
            keymap,
            command_input,
            status_hint: None,
            running: true,
            history_path,
        };
        app.session.info("Type 'help' for commands, Ctrl+C to quit");
        app.refresh_toolbar();
        app
    }

    /// Main loop: draw, wait for input, handle it
    pub fn run(&mut self, frontend: &mut dyn Frontend) -> Result<()> {
        let (width, height) = frontend.size();
        tracing::info!("Entering main loop ({}x{})", width, height);
        while self.running {
            frontend.render(self)?;
            for event in frontend.poll_events()? {
                self.handle_event(event);
                if !self.running {
                    break;
                }
            }
        }
        self.shutdown();
        frontend.cleanup()
    }

    fn shutdown(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.command_input.save_history(path) {
                tracing::warn!("Failed to save command history: {:#}", e);
            }
        }
        tracing::info!("Exiting");
    }

    pub fn handle_event(&mut self, event: FrontendEvent) {
        match event {
            FrontendEvent::Key { code, modifiers } => {
                self.handle_key(KeyEvent::new(code, modifiers));
            }
            FrontendEvent::Mouse {
                kind: MouseEventKind::Moved,
                x,
                y,
                ..
            } => {
                self.status_hint = self.widget.hover(x, y);
            }
            mouse @ FrontendEvent::Mouse { .. } => {
                if let Some((x, y)) = mouse.left_click() {
                    self.handle_click(x, y);
                }
            }
            FrontendEvent::Paste { text } => self.command_input.insert_str(&text),
            FrontendEvent::Resize { width, height } => {
                tracing::debug!("Resized to {}x{}", width, height);
            }
            FrontendEvent::Quit => self.running = false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.menu.is_open() {
            self.handle_menu_key(key);
            return;
        }

        if let Some(action) = self.keymap.lookup(key) {
            self.run_key_action(action);
            return;
        }

        match key.code {
            KeyCode::Enter => {
                if let Some(line) = self.command_input.submit() {
                    self.run_command_line(&line);
                }
            }
            KeyCode::Esc => self.command_input.clear(),
            KeyCode::Backspace => self.command_input.delete_char(),
            KeyCode::Delete => self.command_input.delete_forward(),
            KeyCode::Left => self.command_input.move_cursor_left(),
            KeyCode::Right => self.command_input.move_cursor_right(),
            KeyCode::Home => self.command_input.move_cursor_home(),
            KeyCode::End => self.command_input.move_cursor_end(),
            KeyCode::Up => self.command_input.history_previous(),
            KeyCode::Down => self.command_input.history_next(),
            KeyCode::Char(c) => self.command_input.insert_char(c),
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.menu.close(),
            KeyCode::Up => self.menu.select_previous(),
            KeyCode::Down | KeyCode::Tab => self.menu.select_next(),
            KeyCode::Left | KeyCode::Right => self.menu.switch_menu(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(command) = self.menu.activate_selected() {
                    self.run_menu_command(command);
                }
            }
            _ => {
                // Menu accelerators still work while a menu is open
                if let Some(action) = self.keymap.lookup(key) {
                    self.menu.close();
                    self.run_key_action(action);
                }
            }
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        if self.menu.is_open() {
            if let MenuClick::Command(command) = self.menu.click(x, y) {
                self.run_menu_command(command);
            }
            return;
        }

        if let Some(menu) = self.menu.title_at(x, y) {
            self.menu.open(menu);
            return;
        }

        if let Some(id) = self.widget.control_at(x, y) {
            self.activate_control(id);
        }
    }

    fn run_key_action(&mut self, action: KeyAction) {
        tracing::debug!("Key action: {}", action);
        match action {
            KeyAction::Control(id) => self.activate_control(id),
            KeyAction::EditPosition => {
                let mut cx = ToolbarContext {
                    host: &mut self.widget,
                    menu: &mut self.menu,
                    game: &mut self.session,
                };
                self.toolbar.click_edit(&mut cx);
                self.refresh_toolbar();
            }
            KeyAction::SwapDirection => {
                let mut cx = ToolbarContext {
                    host: &mut self.widget,
                    menu: &mut self.menu,
                    game: &mut self.session,
                };
                self.toolbar.click_swap_direction(&mut cx);
                self.refresh_toolbar();
            }
            KeyAction::OpenMenu(menu) => self.menu.open(menu),
            KeyAction::Quit => self.running = false,
        }
    }

    /// Same path as a click on the control
    pub fn activate_control(&mut self, id: ControlId) {
        if !self.widget.press(id) {
            return;
        }

        let activation = {
            let mut cx = ToolbarContext {
                host: &mut self.widget,
                menu: &mut self.menu,
                game: &mut self.session,
            };
            self.toolbar.activate(id, &mut cx)
        };

        match activation {
            Activation::Host(action) => self.run_host_action(action),
            Activation::NothingToAnswer => self.session.info("Nothing to answer"),
            Activation::Disabled | Activation::Sent(_) | Activation::Toggled(..) => {}
        }
        self.refresh_toolbar();
    }

    /// Controls that would open a dialog in a desktop build map to plain
    /// commands here
    fn run_host_action(&mut self, action: HostAction) {
        let command = match action {
            HostAction::New => {
                let length = self.session.config().game.default_match_length;
                if length == 0 {
                    "new session".to_string()
                } else {
                    format!("new match {}", length)
                }
            }
            HostAction::Open => "load match".to_string(),
            HostAction::Save => "save match".to_string(),
            HostAction::Resign => "resign normal".to_string(),
            HostAction::Undo => "undo".to_string(),
            HostAction::AnalyzeCurrent => "analyse match".to_string(),
            HostAction::AnalyzeFile => "analyse file".to_string(),
        };
        self.session.execute(&command);
    }

    pub fn run_menu_command(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Toggle(kind, active) => {
                let mut cx = ToolbarContext {
                    host: &mut self.widget,
                    menu: &mut self.menu,
                    game: &mut self.session,
                };
                self.toolbar
                    .notify_toggle(kind, active, ToggleOrigin::Menu, false, &mut cx);
            }
            MenuCommand::Style(style) => {
                self.toolbar.set_style(&mut self.widget, &mut self.session, style);
                self.menu.set_style(style);
            }
        }
        self.refresh_toolbar();
    }

    fn run_command_line(&mut self, line: &str) {
        match line {
            "quit" | "exit" => self.running = false,
            _ => {
                self.session.execute(line);
                self.refresh_toolbar();
            }
        }
    }

    /// Follow setting changes made by commands, settle menu echoes, then
    /// recompute every control from the match state
    pub fn refresh_toolbar(&mut self) {
        for event in self.session.take_events() {
            match event {
                SessionEvent::ClockwiseChanged(clockwise) => {
                    if self.toolbar.clockwise() != clockwise {
                        self.toolbar
                            .set_clockwise(&mut self.widget, &mut self.menu, clockwise);
                    }
                }
                SessionEvent::StyleChanged(style) => {
                    if self.toolbar.style() != style {
                        self.toolbar.adopt_style(&mut self.widget, style);
                    }
                    self.menu.set_style(style);
                }
            }
        }

        for (kind, active) in self.menu.take_echoes() {
            let mut cx = ToolbarContext {
                host: &mut self.widget,
                menu: &mut self.menu,
                game: &mut self.session,
            };
            self.toolbar
                .notify_toggle(kind, active, ToggleOrigin::Menu, true, &mut cx);
        }

        self.toolbar
            .set_default_match_length(self.session.config().game.default_match_length);
        let state = self.session.state();
        let playing = state.playing();
        self.toolbar.update(&mut self.widget, state, playing);
        if !state.analysis_running {
            self.toolbar.set_playing(&mut self.widget, playing);
        }
    }

    /// Key hints for the menu bar
    pub fn menu_hint(&self) -> String {
        let mut hints = Vec::new();
        for menu in MenuId::ALL {
            if let Some(key) = self.keymap.key_for(KeyAction::OpenMenu(menu)) {
                hints.push(format!("{} {}", key, menu.title()));
            }
        }
        if let Some(key) = self.keymap.key_for(KeyAction::Quit) {
            hints.push(format!("{} Quit", key));
        }
        hints.join("  ")
    }

    pub fn style(&self) -> ToolbarStyle {
        self.toolbar.style()
    }
}
