//! Menu bar with Edit and View drop-downs.
//!
//! The check items mirror the toolbar toggles (`ToggleObserver`), and the View
//! menu carries the toolbar style as a radio group. Provides keyboard
//! navigation, click hit-testing and rendering.

use crate::core::controls::ToggleKind;
use crate::core::host::{ToggleObserver, ToolbarStyle};
use crate::core::menu_actions::MenuId;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// What choosing a menu item asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// A check item was flipped to the given state
    Toggle(ToggleKind, bool),
    Style(ToolbarStyle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Check(ToggleKind),
    Radio(ToolbarStyle),
}

/// Result of a click while a menu is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuClick {
    Command(MenuCommand),
    /// Switched to (or re-clicked) a title
    Title(MenuId),
    /// Clicked elsewhere; the menu closed
    Dismissed,
}

#[derive(Debug)]
pub struct MenuBar {
    open: Option<MenuId>,
    selected: usize,
    editing: bool,
    clockwise: bool,
    style: ToolbarStyle,
    /// Check item changes pushed by `sync_toggle`, reported back as echoes
    echoes: Vec<(ToggleKind, bool)>,
    /// Title positions from the last render: (menu, x, width)
    titles: Vec<(MenuId, u16, u16)>,
    bar_row: u16,
    popup: Option<Rect>,
}

impl MenuBar {
    pub fn new(style: ToolbarStyle, clockwise: bool) -> Self {
        Self {
            open: None,
            selected: 0,
            editing: false,
            clockwise,
            style,
            echoes: Vec::new(),
            titles: Vec::new(),
            bar_row: 0,
            popup: None,
        }
    }

    fn entries(menu: MenuId) -> Vec<MenuEntry> {
        match menu {
            MenuId::Edit => vec![MenuEntry::Check(ToggleKind::Edit)],
            MenuId::View => {
                let mut entries = vec![MenuEntry::Check(ToggleKind::Direction)];
                entries.extend(ToolbarStyle::ALL.iter().map(|s| MenuEntry::Radio(*s)));
                entries
            }
        }
    }

    fn checked(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::Edit => self.editing,
            ToggleKind::Direction => self.clockwise,
        }
    }

    fn entry_text(&self, entry: MenuEntry) -> String {
        match entry {
            MenuEntry::Check(kind) => format!(
                "[{}] {}",
                if self.checked(kind) { "x" } else { " " },
                kind.menu_label()
            ),
            MenuEntry::Radio(style) => format!(
                "({}) Toolbar: {}",
                if style == self.style { "*" } else { " " },
                style.menu_label()
            ),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open(&mut self, menu: MenuId) {
        self.open = Some(menu);
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = None;
        self.popup = None;
    }

    /// Radio group follows the toolbar style
    pub fn set_style(&mut self, style: ToolbarStyle) {
        self.style = style;
    }

    pub fn is_checked(&self, kind: ToggleKind) -> bool {
        self.checked(kind)
    }

    /// Changes made by `sync_toggle` since the last call. Each one is the
    /// menu reporting back a state it was just given.
    pub fn take_echoes(&mut self) -> Vec<(ToggleKind, bool)> {
        std::mem::take(&mut self.echoes)
    }

    /// Navigate down - wraps around
    pub fn select_next(&mut self) {
        if let Some(menu) = self.open {
            let len = Self::entries(menu).len();
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Navigate up - wraps around
    pub fn select_previous(&mut self) {
        if let Some(menu) = self.open {
            let len = Self::entries(menu).len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Move to the neighbouring menu
    pub fn switch_menu(&mut self) {
        if let Some(menu) = self.open {
            let next = match menu {
                MenuId::Edit => MenuId::View,
                MenuId::View => MenuId::Edit,
            };
            self.open(next);
        }
    }

    /// Choose the highlighted item and close the menu
    pub fn activate_selected(&mut self) -> Option<MenuCommand> {
        let menu = self.open?;
        let entry = *Self::entries(menu).get(self.selected)?;
        self.close();
        Some(self.choose(entry))
    }

    fn choose(&mut self, entry: MenuEntry) -> MenuCommand {
        match entry {
            MenuEntry::Check(kind) => {
                // The check item flips itself, then reports
                let active = !self.checked(kind);
                self.set_checked(kind, active);
                MenuCommand::Toggle(kind, active)
            }
            MenuEntry::Radio(style) => MenuCommand::Style(style),
        }
    }

    fn set_checked(&mut self, kind: ToggleKind, active: bool) {
        match kind {
            ToggleKind::Edit => self.editing = active,
            ToggleKind::Direction => self.clockwise = active,
        }
    }

    /// Title under a position on the menu bar row
    pub fn title_at(&self, x: u16, y: u16) -> Option<MenuId> {
        if y != self.bar_row {
            return None;
        }
        self.titles
            .iter()
            .find(|(_, start, width)| x >= *start && x < start + width)
            .map(|(menu, _, _)| *menu)
    }

    /// Resolve a click while a menu is open
    pub fn click(&mut self, x: u16, y: u16) -> MenuClick {
        if let Some(menu) = self.title_at(x, y) {
            self.open(menu);
            return MenuClick::Title(menu);
        }

        if let (Some(menu), Some(rect)) = (self.open, self.popup) {
            let inside = x >= rect.x
                && x < rect.x + rect.width
                && y > rect.y
                && y < rect.y + rect.height.saturating_sub(1);
            if inside {
                let index = (y - rect.y - 1) as usize;
                if let Some(entry) = Self::entries(menu).get(index).copied() {
                    self.close();
                    return MenuClick::Command(self.choose(entry));
                }
            }
        }

        self.close();
        MenuClick::Dismissed
    }

    /// Draw the bar row into `area` (one row high)
    pub fn render_bar(&mut self, area: Rect, buf: &mut Buffer, hint: &str) {
        self.bar_row = area.y;
        self.titles.clear();

        let base = Style::default().fg(Color::Black).bg(Color::Gray);
        buf.set_style(area, base);

        let mut x = area.x + 1;
        for menu in MenuId::ALL {
            let title = format!(" {} ", menu.title());
            let width = title.chars().count() as u16;
            let style = if self.open == Some(menu) {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else {
                base.add_modifier(Modifier::BOLD)
            };
            buf.set_string(x, area.y, &title, style);
            self.titles.push((menu, x, width));
            x += width + 1;
        }

        let hint_width = hint.chars().count() as u16;
        if x + hint_width < area.x + area.width {
            buf.set_string(area.x + area.width - hint_width - 1, area.y, hint, base);
        }
    }

    /// Draw the open drop-down, if any, over whatever is below the bar
    pub fn render_popup(&mut self, screen: Rect, buf: &mut Buffer) {
        let Some(menu) = self.open else {
            self.popup = None;
            return;
        };
        let anchor = self
            .titles
            .iter()
            .find(|(m, _, _)| *m == menu)
            .map(|(_, x, _)| *x)
            .unwrap_or(screen.x);

        let entries = Self::entries(menu);
        let texts: Vec<String> = entries.iter().map(|e| self.entry_text(*e)).collect();
        let max_width = texts.iter().map(|t| t.chars().count()).max().unwrap_or(20);

        let width = (max_width as u16 + 4).min(screen.width);
        let height = (entries.len() as u16 + 2).min(screen.height.saturating_sub(1));
        let x = anchor.min(screen.x + screen.width.saturating_sub(width));
        let rect = Rect::new(x, self.bar_row + 1, width, height);

        Clear.render(rect, buf);

        let lines: Vec<Line> = texts
            .into_iter()
            .enumerate()
            .map(|(idx, text)| {
                let style = if idx == self.selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![Span::raw(" "), Span::styled(text, style), Span::raw(" ")])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .style(Style::default().bg(Color::Black));
        Paragraph::new(lines).block(block).render(rect, buf);

        self.popup = Some(rect);
    }
}

impl ToggleObserver for MenuBar {
    fn sync_toggle(&mut self, kind: ToggleKind, active: bool) {
        if self.checked(kind) != active {
            self.set_checked(kind, active);
            self.echoes.push((kind, active));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_bar(menu: &mut MenuBar) -> Buffer {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        menu.render_bar(Rect::new(0, 0, 60, 1), &mut buf, "");
        menu.render_popup(area, &mut buf);
        buf
    }

    #[test]
    fn test_sync_only_echoes_real_changes() {
        let mut menu = MenuBar::new(ToolbarStyle::Both, false);
        menu.sync_toggle(ToggleKind::Direction, false);
        assert!(menu.take_echoes().is_empty());

        menu.sync_toggle(ToggleKind::Direction, true);
        assert!(menu.is_checked(ToggleKind::Direction));
        assert_eq!(menu.take_echoes(), vec![(ToggleKind::Direction, true)]);
        assert!(menu.take_echoes().is_empty());
    }

    #[test]
    fn test_keyboard_navigation_wraps() {
        let mut menu = MenuBar::new(ToolbarStyle::Both, false);
        menu.open(MenuId::View);
        menu.select_previous();
        assert_eq!(
            menu.activate_selected(),
            Some(MenuCommand::Style(ToolbarStyle::Both))
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_check_item_flips_itself() {
        let mut menu = MenuBar::new(ToolbarStyle::Both, false);
        menu.open(MenuId::Edit);
        assert_eq!(
            menu.activate_selected(),
            Some(MenuCommand::Toggle(ToggleKind::Edit, true))
        );
        assert!(menu.is_checked(ToggleKind::Edit));
        // Not an echo: the menu itself was the origin
        assert!(menu.take_echoes().is_empty());
    }

    #[test]
    fn test_click_titles_and_items() {
        let mut menu = MenuBar::new(ToolbarStyle::Both, false);
        rendered_bar(&mut menu);
        let (_, view_x, _) = menu.titles[1];
        assert_eq!(menu.title_at(view_x, 0), Some(MenuId::View));

        assert_eq!(menu.click(view_x, 0), MenuClick::Title(MenuId::View));
        rendered_bar(&mut menu);
        let popup = menu.popup.unwrap();
        // Second entry: first style radio
        assert_eq!(
            menu.click(popup.x + 2, popup.y + 2),
            MenuClick::Command(MenuCommand::Style(ToolbarStyle::IconsOnly))
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_click_outside_dismisses() {
        let mut menu = MenuBar::new(ToolbarStyle::Both, false);
        menu.open(MenuId::Edit);
        rendered_bar(&mut menu);
        assert_eq!(menu.click(59, 9), MenuClick::Dismissed);
        assert!(!menu.is_open());
    }
}
