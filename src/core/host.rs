//! Seams between the toolbar core and whatever draws it
//!
//! The core decides what every control should look like; a `ToolbarHost`
//! applies that to real widgets. Operations that only make sense for one kind
//! of control return an error when handed the wrong id, and the core skips
//! that control with a warning.

use super::controls::{ControlId, ControlSpec, ToggleKind};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How toolbar controls are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarStyle {
    #[serde(rename = "icons")]
    IconsOnly,
    #[serde(rename = "text")]
    TextOnly,
    #[default]
    Both,
}

impl ToolbarStyle {
    pub const ALL: [ToolbarStyle; 3] = [Self::IconsOnly, Self::TextOnly, Self::Both];

    pub fn token(self) -> &'static str {
        match self {
            Self::IconsOnly => "icons",
            Self::TextOnly => "text",
            Self::Both => "both",
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Self::IconsOnly => "Icons Only",
            Self::TextOnly => "Text Only",
            Self::Both => "Both",
        }
    }

    pub fn shows_icon(self) -> bool {
        matches!(self, Self::IconsOnly | Self::Both)
    }

    pub fn shows_label(self) -> bool {
        matches!(self, Self::TextOnly | Self::Both)
    }
}

impl fmt::Display for ToolbarStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ToolbarStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icons" | "icons-only" | "0" => Ok(Self::IconsOnly),
            "text" | "text-only" | "1" => Ok(Self::TextOnly),
            "both" | "2" => Ok(Self::Both),
            other => anyhow::bail!("Unknown toolbar style '{}' (expected icons, text or both)", other),
        }
    }
}

/// Which image a two-state toggle shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleImage {
    Off,
    On,
}

impl From<bool> for ToggleImage {
    fn from(active: bool) -> Self {
        if active {
            ToggleImage::On
        } else {
            ToggleImage::Off
        }
    }
}

/// Where a toggle change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOrigin {
    /// The toolbar control was clicked
    Toolbar,
    /// The menu checkbox (or its accelerator) was used
    Menu,
}

/// Widget layer the toolbar is drawn with
pub trait ToolbarHost {
    fn add_command_button(&mut self, spec: &'static ControlSpec);

    fn add_toggle(&mut self, spec: &'static ControlSpec, kind: ToggleKind);

    /// `expand` separators are invisible and push the rest to the far end
    fn add_separator(&mut self, expand: bool);

    fn set_enabled(&mut self, id: ControlId, enabled: bool);

    /// Show icon and/or label on a plain button
    fn set_button_style(&mut self, id: ControlId, style: ToolbarStyle) -> Result<()>;

    /// Show image and/or label on a composite toggle
    fn set_toggle_style(&mut self, id: ControlId, style: ToolbarStyle) -> Result<()>;

    fn set_toggle_active(&mut self, id: ControlId, active: bool) -> Result<()>;

    fn set_toggle_image(&mut self, id: ControlId, image: ToggleImage) -> Result<()>;
}

/// A menu checkbox mirroring a toolbar toggle
pub trait ToggleObserver {
    /// Reflect the new state without reporting it back as a user change
    fn sync_toggle(&mut self, kind: ToggleKind, active: bool);
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    /// Host that records what it was told
    #[derive(Default)]
    pub struct RecordingHost {
        pub added: Vec<String>,
        pub toggles: BTreeSet<ControlId>,
        pub enabled: BTreeMap<ControlId, bool>,
        pub styles: BTreeMap<ControlId, ToolbarStyle>,
        pub active: BTreeMap<ControlId, bool>,
        pub images: BTreeMap<ControlId, ToggleImage>,
    }

    impl RecordingHost {
        fn require_toggle(&self, id: ControlId) -> Result<()> {
            if self.toggles.contains(&id) {
                Ok(())
            } else {
                anyhow::bail!("{} is not a toggle", id)
            }
        }
    }

    impl ToolbarHost for RecordingHost {
        fn add_command_button(&mut self, spec: &'static ControlSpec) {
            self.added.push(spec.id.name().to_string());
        }

        fn add_toggle(&mut self, spec: &'static ControlSpec, _kind: ToggleKind) {
            self.added.push(format!("{}*", spec.id));
            self.toggles.insert(spec.id);
        }

        fn add_separator(&mut self, expand: bool) {
            self.added.push(if expand { "<->" } else { "|" }.to_string());
        }

        fn set_enabled(&mut self, id: ControlId, enabled: bool) {
            self.enabled.insert(id, enabled);
        }

        fn set_button_style(&mut self, id: ControlId, style: ToolbarStyle) -> Result<()> {
            if self.toggles.contains(&id) {
                anyhow::bail!("{} is a toggle", id);
            }
            self.styles.insert(id, style);
            Ok(())
        }

        fn set_toggle_style(&mut self, id: ControlId, style: ToolbarStyle) -> Result<()> {
            self.require_toggle(id)?;
            self.styles.insert(id, style);
            Ok(())
        }

        fn set_toggle_active(&mut self, id: ControlId, active: bool) -> Result<()> {
            self.require_toggle(id)?;
            self.active.insert(id, active);
            Ok(())
        }

        fn set_toggle_image(&mut self, id: ControlId, image: ToggleImage) -> Result<()> {
            self.require_toggle(id)?;
            self.images.insert(id, image);
            Ok(())
        }
    }

    /// Menu that records every sync it receives
    #[derive(Default)]
    pub struct RecordingMenu {
        pub synced: Vec<(ToggleKind, bool)>,
    }

    impl ToggleObserver for RecordingMenu {
        fn sync_toggle(&mut self, kind: ToggleKind, active: bool) {
            self.synced.push((kind, active));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse_and_tokens() {
        assert_eq!("icons".parse::<ToolbarStyle>().unwrap(), ToolbarStyle::IconsOnly);
        assert_eq!("TEXT".parse::<ToolbarStyle>().unwrap(), ToolbarStyle::TextOnly);
        assert_eq!("2".parse::<ToolbarStyle>().unwrap(), ToolbarStyle::Both);
        assert!("large".parse::<ToolbarStyle>().is_err());
        for style in ToolbarStyle::ALL {
            assert_eq!(style.token().parse::<ToolbarStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_style_visibility() {
        assert!(ToolbarStyle::IconsOnly.shows_icon());
        assert!(!ToolbarStyle::IconsOnly.shows_label());
        assert!(!ToolbarStyle::TextOnly.shows_icon());
        assert!(ToolbarStyle::Both.shows_icon() && ToolbarStyle::Both.shows_label());
    }
}
