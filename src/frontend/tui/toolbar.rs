//! Toolbar widget - one or more rows of clickable controls
//!
//! Implements `ToolbarHost` for the terminal. Controls are laid out in a
//! single row when they fit, with everything after the spacer pushed to the
//! right edge; otherwise they wrap onto further rows and the spacer is
//! dropped. Every cell a control occupies is recorded in a hit map so mouse
//! clicks can be resolved back to a control.

use crate::core::controls::{ControlId, ControlSpec, ToggleKind};
use crate::core::host::{ToggleImage, ToolbarHost, ToolbarStyle};
use anyhow::{bail, Result};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use std::collections::HashMap;

/// Glyph the direction toggle shows when play is clockwise
const CLOCKWISE_GLYPH: &str = "↻";

/// Runtime state of one control
#[derive(Debug)]
struct ControlCell {
    spec: &'static ControlSpec,
    toggle: Option<ToggleKind>,
    enabled: bool,
    style: ToolbarStyle,
    active: bool,
    image: ToggleImage,
}

impl ControlCell {
    fn glyph(&self) -> &'static str {
        if self.toggle == Some(ToggleKind::Direction) && self.image == ToggleImage::On {
            CLOCKWISE_GLYPH
        } else {
            self.spec.glyph
        }
    }

    /// Text drawn between the padding spaces
    fn caption(&self) -> String {
        let label = self.spec.label;
        match (self.style.shows_icon(), self.style.shows_label()) {
            (true, true) if !label.is_empty() => format!("{} {}", self.glyph(), label),
            (false, true) => self.spec.text_label().to_string(),
            _ => self.glyph().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Control(usize),
    Separator,
    Spacer,
}

/// Where a slot landed on screen, relative to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placed {
    slot: Slot,
    row: u16,
    col: u16,
    width: u16,
}

const SEPARATOR_WIDTH: u16 = 3;

#[derive(Debug, Default)]
pub struct ToolbarWidget {
    slots: Vec<Slot>,
    cells: Vec<ControlCell>,
    /// Hit map for click handling: absolute (row, col) -> control
    hit_map: HashMap<(u16, u16), ControlId>,
    hovered: Option<ControlId>,
}

impl ToolbarWidget {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, id: ControlId) -> Option<&ControlCell> {
        self.cells.iter().find(|c| c.spec.id == id)
    }

    fn cell_mut(&mut self, id: ControlId) -> Option<&mut ControlCell> {
        self.cells.iter_mut().find(|c| c.spec.id == id)
    }

    fn toggle_mut(&mut self, id: ControlId) -> Result<&mut ControlCell> {
        match self.cell_mut(id) {
            Some(cell) if cell.toggle.is_some() => Ok(cell),
            Some(_) => bail!("{} is not a toggle", id),
            None => bail!("{} is not on the toolbar", id),
        }
    }

    fn push_control(&mut self, spec: &'static ControlSpec, toggle: Option<ToggleKind>) {
        self.cells.push(ControlCell {
            spec,
            toggle,
            enabled: true,
            style: ToolbarStyle::Both,
            active: false,
            image: ToggleImage::Off,
        });
        self.slots.push(Slot::Control(self.cells.len() - 1));
    }

    pub fn is_enabled(&self, id: ControlId) -> bool {
        self.cell(id).is_some_and(|c| c.enabled)
    }

    pub fn is_active(&self, id: ControlId) -> bool {
        self.cell(id).is_some_and(|c| c.active)
    }

    /// Width of homogeneous controls: the widest of them
    fn homogeneous_width(&self) -> u16 {
        self.cells
            .iter()
            .filter(|c| c.spec.homogeneous)
            .map(|c| c.caption().chars().count() as u16)
            .max()
            .unwrap_or(0)
    }

    fn slot_width(&self, slot: Slot, homogeneous: u16) -> u16 {
        match slot {
            Slot::Control(index) => {
                let cell = &self.cells[index];
                let caption = cell.caption().chars().count() as u16;
                let inner = if cell.spec.homogeneous {
                    homogeneous.max(caption)
                } else {
                    caption
                };
                inner + 2
            }
            Slot::Separator => SEPARATOR_WIDTH,
            Slot::Spacer => 0,
        }
    }

    /// Position every slot for a widget `width` cells wide
    fn layout(&self, width: u16) -> Vec<Placed> {
        let homogeneous = self.homogeneous_width();
        let widths: Vec<u16> = self
            .slots
            .iter()
            .map(|slot| self.slot_width(*slot, homogeneous))
            .collect();
        let total: u16 = widths.iter().sum();

        let mut placed = Vec::with_capacity(self.slots.len());
        if total <= width {
            // Single row; the spacer soaks up the slack
            let slack = width - total;
            let mut col = 0;
            for (slot, w) in self.slots.iter().zip(&widths) {
                let w = if *slot == Slot::Spacer { slack } else { *w };
                placed.push(Placed {
                    slot: *slot,
                    row: 0,
                    col,
                    width: w,
                });
                col += w;
            }
            return placed;
        }

        let mut row = 0;
        let mut col = 0;
        for (slot, w) in self.slots.iter().zip(&widths) {
            if *slot == Slot::Spacer {
                continue;
            }
            if col > 0 && col + w > width {
                row += 1;
                col = 0;
            }
            // A separator at the start of a row is just noise
            if col == 0 && *slot == Slot::Separator {
                continue;
            }
            placed.push(Placed {
                slot: *slot,
                row,
                col,
                width: *w,
            });
            col += w;
        }
        placed
    }

    /// Rows needed to show every control at `width`
    pub fn required_height(&self, width: u16) -> u16 {
        self.layout(width)
            .iter()
            .map(|p| p.row + 1)
            .max()
            .unwrap_or(1)
    }

    /// Control under an absolute screen position, as recorded by the last
    /// render
    pub fn control_at(&self, x: u16, y: u16) -> Option<ControlId> {
        self.hit_map.get(&(y, x)).copied()
    }

    /// Press a control, by click or key. Disabled controls swallow the
    /// press; a toggle flips its own pressed state, the way a toggle button
    /// does before reporting. Returns whether the press went through.
    pub fn press(&mut self, id: ControlId) -> bool {
        let Some(cell) = self.cell_mut(id) else {
            return false;
        };
        if !cell.enabled {
            tracing::debug!("Press on disabled control {}", id);
            return false;
        }
        if cell.toggle.is_some() {
            cell.active = !cell.active;
        }
        true
    }

    /// Track the pointer; returns the tooltip of the control under it
    pub fn hover(&mut self, x: u16, y: u16) -> Option<&'static str> {
        self.hovered = self.control_at(x, y);
        self.tooltip()
    }

    pub fn tooltip(&self) -> Option<&'static str> {
        self.hovered
            .and_then(|id| self.cell(id))
            .map(|cell| cell.spec.tooltip)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.hit_map.clear();
        let placed = self.layout(area.width);

        for p in placed {
            if p.row >= area.height {
                continue;
            }
            let y = area.y + p.row;
            let x = area.x + p.col;
            let max_width = (area.x + area.width).saturating_sub(x);
            if max_width == 0 {
                continue;
            }

            match p.slot {
                Slot::Separator => {
                    buf.set_string(x + 1, y, "│", Style::default().fg(Color::DarkGray));
                }
                Slot::Spacer => {}
                Slot::Control(index) => {
                    let cell = &self.cells[index];
                    let style = Self::cell_style(cell, self.hovered == Some(cell.spec.id));
                    let text = format!(
                        " {:^width$} ",
                        cell.caption(),
                        width = p.width.saturating_sub(2) as usize
                    );
                    let shown: String = text.chars().take(max_width as usize).collect();
                    buf.set_string(x, y, &shown, style);

                    for i in 0..p.width.min(max_width) {
                        self.hit_map.insert((y, x + i), cell.spec.id);
                    }
                }
            }
        }
    }

    fn cell_style(cell: &ControlCell, hovered: bool) -> Style {
        let mut style = if cell.enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        if cell.active {
            style = style.bg(Color::Blue).add_modifier(Modifier::BOLD);
        }
        if hovered && cell.enabled {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

impl ToolbarHost for ToolbarWidget {
    fn add_command_button(&mut self, spec: &'static ControlSpec) {
        self.push_control(spec, None);
    }

    fn add_toggle(&mut self, spec: &'static ControlSpec, kind: ToggleKind) {
        self.push_control(spec, Some(kind));
    }

    fn add_separator(&mut self, expand: bool) {
        self.slots.push(if expand { Slot::Spacer } else { Slot::Separator });
    }

    fn set_enabled(&mut self, id: ControlId, enabled: bool) {
        if let Some(cell) = self.cell_mut(id) {
            cell.enabled = enabled;
        }
    }

    fn set_button_style(&mut self, id: ControlId, style: ToolbarStyle) -> Result<()> {
        match self.cell_mut(id) {
            Some(cell) if cell.toggle.is_none() => {
                cell.style = style;
                Ok(())
            }
            Some(_) => bail!("{} is a toggle, not a button", id),
            None => bail!("{} is not on the toolbar", id),
        }
    }

    fn set_toggle_style(&mut self, id: ControlId, style: ToolbarStyle) -> Result<()> {
        self.toggle_mut(id)?.style = style;
        Ok(())
    }

    fn set_toggle_active(&mut self, id: ControlId, active: bool) -> Result<()> {
        self.toggle_mut(id)?.active = active;
        Ok(())
    }

    fn set_toggle_image(&mut self, id: ControlId, image: ToggleImage) -> Result<()> {
        self.toggle_mut(id)?.image = image;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolbarState;

    fn built(style: ToolbarStyle) -> (ToolbarWidget, ToolbarState) {
        let mut widget = ToolbarWidget::new();
        let state = ToolbarState::build(&mut widget, style, false, 7);
        (widget, state)
    }

    fn rendered(widget: &mut ToolbarWidget, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, row: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_wide_terminal_uses_one_row() {
        let (widget, _) = built(ToolbarStyle::IconsOnly);
        assert_eq!(widget.required_height(200), 1);
    }

    #[test]
    fn test_narrow_terminal_wraps() {
        let (widget, _) = built(ToolbarStyle::Both);
        assert!(widget.required_height(40) > 1);
    }

    #[test]
    fn test_spacer_pushes_navigation_right() {
        let (mut widget, _) = built(ToolbarStyle::IconsOnly);
        rendered(&mut widget, 200, 1);
        // Last control ends flush with the right edge
        assert_eq!(widget.control_at(199, 0), Some(ControlId::NextMarked));
        assert_eq!(widget.control_at(0, 0), Some(ControlId::New));
    }

    #[test]
    fn test_styles_change_captions() {
        let (mut widget, _) = built(ToolbarStyle::TextOnly);
        let buf = rendered(&mut widget, 300, 1);
        let text = row_text(&buf, 0);
        assert!(text.contains("Hint"));
        assert!(!text.contains('✚'));

        let (mut widget, _) = built(ToolbarStyle::IconsOnly);
        let buf = rendered(&mut widget, 300, 1);
        let text = row_text(&buf, 0);
        assert!(text.contains('✚'));
        assert!(!text.contains("Hint"));
    }

    #[test]
    fn test_click_position_resolves_and_toggle_flips() {
        let (mut widget, _) = built(ToolbarStyle::Both);
        rendered(&mut widget, 300, 1);

        let (y, x) = widget
            .hit_map
            .iter()
            .find(|(_, id)| **id == ControlId::Edit)
            .map(|(pos, _)| *pos)
            .unwrap();
        assert_eq!(widget.control_at(x, y), Some(ControlId::Edit));
        assert!(widget.press(ControlId::Edit));
        assert!(widget.is_active(ControlId::Edit));
        assert_eq!(widget.hover(x, y), Some("Toggle Edit Mode"));
    }

    #[test]
    fn test_disabled_press_is_swallowed() {
        let (mut widget, _) = built(ToolbarStyle::Both);
        widget.set_enabled(ControlId::Hint, false);
        assert!(!widget.press(ControlId::Hint));
        assert!(widget.press(ControlId::Double));
        // Plain buttons have no pressed state
        assert!(!widget.is_active(ControlId::Double));
    }

    #[test]
    fn test_narrowing_rejects_wrong_kind() {
        let (mut widget, _) = built(ToolbarStyle::Both);
        assert!(widget.set_toggle_active(ControlId::Hint, true).is_err());
        assert!(widget
            .set_button_style(ControlId::Edit, ToolbarStyle::TextOnly)
            .is_err());
        assert!(widget
            .set_toggle_image(ControlId::ButtonClockwise, ToggleImage::On)
            .is_ok());
    }

    #[test]
    fn test_direction_image_swaps_glyph() {
        let (mut widget, _) = built(ToolbarStyle::IconsOnly);
        widget
            .set_toggle_image(ControlId::ButtonClockwise, ToggleImage::On)
            .unwrap();
        let buf = rendered(&mut widget, 300, 1);
        assert!(row_text(&buf, 0).contains(CLOCKWISE_GLYPH));
    }
}
