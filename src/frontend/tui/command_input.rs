//! Single-line command input with history.
//!
//! Cursor positions are in characters, not bytes. History is newest-first and
//! persisted to `history.txt` in the data directory between runs.

use anyhow::{Context, Result};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

pub struct CommandInput {
    input: String,
    cursor_pos: usize,
    history: VecDeque<String>,
    history_index: Option<usize>,
    max_history: usize,
    /// True if current text was typed by the user (not recalled from history)
    is_user_typed: bool,
}

impl CommandInput {
    pub fn new(max_history: usize) -> Self {
        Self {
            input: String::new(),
            cursor_pos: 0,
            history: VecDeque::with_capacity(max_history),
            history_index: None,
            max_history,
            is_user_typed: false,
        }
    }

    fn char_pos_to_byte_idx(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_pos_to_byte_idx(self.cursor_pos);
        self.input.insert(byte_idx, c);
        self.cursor_pos += 1;
        self.is_user_typed = true;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(c);
        }
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            let byte_idx = self.char_pos_to_byte_idx(self.cursor_pos - 1);
            self.input.remove(byte_idx);
            self.cursor_pos -= 1;
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            let byte_idx = self.char_pos_to_byte_idx(self.cursor_pos);
            self.input.remove(byte_idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor_pos < char_count {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input.chars().count();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
        self.history_index = None;
        self.is_user_typed = false;
    }

    /// Take the current line, recording it in history unless it repeats the
    /// previous entry
    pub fn submit(&mut self) -> Option<String> {
        let command = self.input.trim().to_string();
        if command.is_empty() {
            self.clear();
            return None;
        }

        let should_add = self
            .history
            .front()
            .map(|last_cmd| last_cmd != &command)
            .unwrap_or(true);
        if should_add {
            self.history.push_front(command.clone());
            if self.history.len() > self.max_history {
                self.history.pop_back();
            }
        }

        self.clear();
        Some(command)
    }

    pub fn history_previous(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let new_index = match self.history_index {
            None => 0,
            Some(idx) if idx < self.history.len() - 1 => idx + 1,
            Some(idx) => idx,
        };

        if let Some(cmd) = self.history.get(new_index) {
            self.input = cmd.clone();
            self.cursor_pos = self.input.chars().count();
            self.history_index = Some(new_index);
            self.is_user_typed = false;
        }
    }

    pub fn history_next(&mut self) {
        match self.history_index {
            None => {
                if self.is_user_typed && !self.input.is_empty() {
                    self.clear();
                }
            }
            Some(0) => {
                self.input.clear();
                self.cursor_pos = 0;
                self.history_index = None;
                self.is_user_typed = false;
            }
            Some(idx) => {
                let new_index = idx - 1;
                if let Some(cmd) = self.history.get(new_index) {
                    self.input = cmd.clone();
                    self.cursor_pos = self.input.chars().count();
                    self.history_index = Some(new_index);
                    self.is_user_typed = false;
                }
            }
        }
    }

    /// Load history written by `save_history`; a missing file is not an error
    pub fn load_history(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {:?}", path))?;
        self.history = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(self.max_history)
            .map(str::to_string)
            .collect();
        tracing::debug!("Loaded {} history entries", self.history.len());
        Ok(())
    }

    pub fn save_history(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents: Vec<&str> = self.history.iter().map(String::as_str).collect();
        fs::write(path, contents.join("\n"))
            .with_context(|| format!("Failed to write history file: {:?}", path))?;
        Ok(())
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled("> ", Style::default().fg(Color::Green))];

        let before: String = self.input.chars().take(self.cursor_pos).collect();
        let cursor_char: String = self
            .input
            .chars()
            .nth(self.cursor_pos)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = self.input.chars().skip(self.cursor_pos + 1).collect();

        if !before.is_empty() {
            spans.push(Span::raw(before));
        }
        spans.push(Span::styled(
            cursor_char,
            Style::default().fg(Color::Black).bg(Color::White),
        ));
        if !after.is_empty() {
            spans.push(Span::raw(after));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
