use crate::app::App;
use crate::core::session::{LineKind, TranscriptLine};
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Terminal,
};
use std::io;
use std::time::Duration;

/// Width of the status panel on the left
const STATUS_WIDTH: u16 = 34;

/// TUI Frontend using ratatui
///
/// Renders the application with ratatui and handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables mouse capture, and enters alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(50),
            restored: false,
        })
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
                if key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Some(FrontendEvent::quit());
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
                mouse_event.modifiers,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            Event::Paste(text) => Some(FrontendEvent::paste(text)),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Block for the first event, then drain whatever else is queued
        let mut timeout = self.poll_timeout;
        while event::poll(timeout)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn render(&mut self, app: &mut dyn std::any::Any) -> Result<()> {
        let app = app
            .downcast_mut::<App>()
            .context("render() called with wrong type - expected App")?;

        self.terminal.draw(|f| draw_app(app, f.area(), f.buffer_mut()))?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}

/// Lay out and draw every part of the screen
pub fn draw_app(app: &mut App, area: Rect, buf: &mut Buffer) {
    if area.height < 4 || area.width < 10 {
        buf.set_string(area.x, area.y, "Too small", Style::default().fg(Color::Red));
        return;
    }

    let toolbar_height = app.widget.required_height(area.width);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(toolbar_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let hint = app.menu_hint();
    app.menu.render_bar(rows[0], buf, &hint);
    app.widget.render(rows[1], buf);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(STATUS_WIDTH), Constraint::Min(10)])
        .split(rows[2]);
    draw_status(app, body[0], buf);
    draw_transcript(app.session.transcript(), body[1], buf);

    app.command_input.render(rows[3], buf);

    // Drop-downs go over everything else
    app.menu.render_popup(area, buf);
}

fn status_lines(app: &App) -> Vec<Line<'static>> {
    let state = app.session.state();
    let config = app.session.config();
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let row = |name: &str, text: String| {
        Line::from(vec![
            Span::styled(format!("{:<11}", name), label),
            Span::styled(text, value),
        ])
    };

    let match_text = if !state.game_exists() {
        "none".to_string()
    } else if state.is_money_session() {
        format!("money, game {}", state.games)
    } else {
        format!("{} pts, game {}", state.match_to, state.games)
    };
    let offer = match (state.resigned, state.doubled) {
        (Some(level), _) => format!("resign {:?}", level).to_lowercase(),
        (None, true) => "double".to_string(),
        (None, false) => "-".to_string(),
    };

    let mut lines = vec![
        row("Match", match_text),
        row("Phase", format!("{:?}", state.phase).to_lowercase()),
        row("Dice", format!("{:?}", state.dice_shown)),
        row("Offer", offer),
        row("Mode", app.toolbar.last_mode().label().to_string()),
        row(
            "Editing",
            if app.toolbar.is_editing() { "yes" } else { "no" }.to_string(),
        ),
        Line::default(),
        row(
            "Direction",
            if app.toolbar.clockwise() {
                "clockwise"
            } else {
                "anticlockwise"
            }
            .to_string(),
        ),
        row("Toolbar", app.style().menu_label().to_string()),
        row("Priority", config.system.priority.display_name().to_string()),
        row(
            "Computer",
            if config.game.computer_player { "on" } else { "off" }.to_string(),
        ),
    ];

    if let Some(tip) = app.status_hint {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            tip.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

fn draw_status(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Status ")
        .border_style(Style::default().fg(Color::DarkGray));
    Paragraph::new(status_lines(app))
        .block(block)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn transcript_line(line: &TranscriptLine) -> Line<'static> {
    let time = Span::styled(
        format!("{} ", line.timestamp()),
        Style::default().fg(Color::DarkGray),
    );
    let body = match line.kind {
        LineKind::Command => Span::styled(
            format!("> {}", line.text),
            Style::default().fg(Color::Cyan),
        ),
        LineKind::Info => Span::raw(line.text.clone()),
        LineKind::Warning => Span::styled(line.text.clone(), Style::default().fg(Color::Yellow)),
    };
    Line::from(vec![time, body])
}

fn draw_transcript(transcript: &[TranscriptLine], area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Transcript ")
        .border_style(Style::default().fg(Color::DarkGray));

    // Newest lines at the bottom
    let visible = area.height.saturating_sub(2) as usize;
    let start = transcript.len().saturating_sub(visible);
    let lines: Vec<Line> = transcript[start..].iter().map(transcript_line).collect();

    Paragraph::new(lines).block(block).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::commands::CommandSink;

    fn screen_text(buf: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_draw_full_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.path = Some(dir.path().join("config.toml"));
        let mut app = App::with_history(config, None);
        app.session.execute("new match 5");
        app.refresh_toolbar();

        let area = Rect::new(0, 0, 300, 30);
        let mut buf = Buffer::empty(area);
        draw_app(&mut app, area, &mut buf);

        let text = screen_text(&buf);
        assert!(text.contains("Edit"));
        assert!(text.contains("View"));
        assert!(text.contains("Status"));
        assert!(text.contains("roll or double"));
        assert!(text.contains("> new match 5"));
        assert!(app.widget.control_at(0, 1).is_some());
    }

    #[test]
    fn test_convert_event() {
        use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(TuiFrontend::convert_event(ctrl_c), Some(FrontendEvent::Quit));

        let f2 = Event::Key(KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE));
        assert_eq!(
            TuiFrontend::convert_event(f2),
            Some(FrontendEvent::key(KeyCode::F(2), KeyModifiers::NONE))
        );

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        let converted = TuiFrontend::convert_event(click).unwrap();
        assert_eq!(converted.left_click(), Some((3, 1)));

        assert_eq!(
            TuiFrontend::convert_event(Event::Paste("roll".to_string())),
            Some(FrontendEvent::Paste {
                text: "roll".to_string()
            })
        );
        assert_eq!(TuiFrontend::convert_event(Event::FocusGained), None);
    }

    #[test]
    fn test_tiny_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.path = Some(dir.path().join("config.toml"));
        let mut app = App::with_history(config, None);

        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        draw_app(&mut app, area, &mut buf);
        assert!(screen_text(&buf).contains("Too"));
    }
}
