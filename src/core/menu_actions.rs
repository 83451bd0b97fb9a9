//! Keyboard action vocabulary.
//!
//! Translates raw `KeyEvent`s and the textual keybinds from `config.toml`
//! into semantic `KeyAction`s, so the event loop never matches on key codes.

use super::controls::ControlId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Drop-down menus in the menu bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuId {
    Edit,
    View,
}

impl MenuId {
    pub const ALL: [MenuId; 2] = [MenuId::Edit, MenuId::View];

    pub fn title(self) -> &'static str {
        match self {
            MenuId::Edit => "Edit",
            MenuId::View => "View",
        }
    }
}

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Same as clicking the toolbar control
    Control(ControlId),
    /// Edit > Edit Position accelerator
    EditPosition,
    /// View > Play Clockwise accelerator
    SwapDirection,
    OpenMenu(MenuId),
    Quit,
}

impl KeyAction {
    /// Names accepted in `[keybinds]` besides the control names
    pub const SPECIAL: [(&'static str, KeyAction); 5] = [
        ("edit-position", KeyAction::EditPosition),
        ("swap-direction", KeyAction::SwapDirection),
        ("menu-edit", KeyAction::OpenMenu(MenuId::Edit)),
        ("menu-view", KeyAction::OpenMenu(MenuId::View)),
        ("quit", KeyAction::Quit),
    ];
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let KeyAction::Control(id) = self {
            return f.write_str(id.name());
        }
        let name = Self::SPECIAL
            .iter()
            .find(|(_, action)| action == self)
            .map(|(name, _)| *name)
            .unwrap_or("?");
        f.write_str(name)
    }
}

impl FromStr for KeyAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, action)) = Self::SPECIAL
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*action);
        }
        s.parse::<ControlId>()
            .map(KeyAction::Control)
            .map_err(|_| anyhow::anyhow!("Unknown key action '{}'", s))
    }
}

/// Convert KeyEvent to string representation for matching against keybinds
pub fn key_event_to_string(key: KeyEvent) -> String {
    let mut parts = Vec::new();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }

    let key_str = match key.code {
        KeyCode::Char(c) => {
            // For letter keys with Shift+Ctrl/Alt, use uppercase
            if key.modifiers.contains(KeyModifiers::SHIFT) && c.is_ascii_lowercase() {
                c.to_ascii_uppercase().to_string()
            } else {
                c.to_string()
            }
        }
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            // BackTab is usually Shift+Tab, so remove Shift from parts if present
            parts.retain(|p| *p != "Shift");
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return String::new(), // Unrecognized key
    };

    parts.push(&key_str);
    parts.join("+")
}

/// Canonical form of a keybind string: modifiers deduplicated and sorted,
/// key last. With Shift held a letter is upper case, matching what
/// `key_event_to_string` produces.
pub fn normalize_keybind(s: &str) -> String {
    let mut modifiers = Vec::new();
    let mut key = "";

    for part in s.split('+') {
        match part.trim() {
            "Ctrl" | "Control" | "ctrl" => modifiers.push("Ctrl"),
            "Shift" | "shift" => modifiers.push("Shift"),
            "Alt" | "alt" => modifiers.push("Alt"),
            k => key = k,
        }
    }

    modifiers.sort();
    modifiers.dedup();

    let key = if modifiers.contains(&"Shift") && key.chars().count() == 1 {
        key.to_ascii_uppercase()
    } else {
        key.to_string()
    };
    let mut parts: Vec<&str> = modifiers;
    parts.push(&key);
    parts.join("+")
}

const NAMED_KEYS: [&str; 14] = [
    "Up",
    "Down",
    "Left",
    "Right",
    "Enter",
    "Esc",
    "Tab",
    "Backspace",
    "Delete",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "Insert",
];

/// Whether `s` names a key `key_event_to_string` can produce
pub fn is_valid_keybind(s: &str) -> bool {
    let keys: Vec<&str> = s
        .split('+')
        .map(str::trim)
        .filter(|part| {
            !matches!(
                *part,
                "Ctrl" | "Control" | "ctrl" | "Shift" | "shift" | "Alt" | "alt"
            )
        })
        .collect();
    let [key] = keys.as_slice() else {
        return false;
    };

    if key.chars().count() == 1 {
        return true;
    }
    if NAMED_KEYS.contains(key) {
        return true;
    }
    key.strip_prefix('F')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=12).contains(&n))
}

/// Lookup table from normalized key combo to action
#[derive(Debug, Default)]
pub struct KeyMap {
    bindings: HashMap<String, KeyAction>,
}

impl KeyMap {
    /// Build from the `[keybinds]` table; entries that do not parse are
    /// skipped with a warning
    pub fn from_config(keybinds: &BTreeMap<String, String>) -> Self {
        let mut bindings = HashMap::new();
        for (key, action) in keybinds {
            if !is_valid_keybind(key) {
                tracing::warn!("Ignoring keybind with unknown key '{}'", key);
                continue;
            }
            match action.parse::<KeyAction>() {
                Ok(parsed) => {
                    bindings.insert(normalize_keybind(key), parsed);
                }
                Err(e) => tracing::warn!("Ignoring keybind '{}': {}", key, e),
            }
        }
        tracing::debug!("Loaded {} keybinds", bindings.len());
        Self { bindings }
    }

    pub fn lookup(&self, key: KeyEvent) -> Option<KeyAction> {
        let combo = key_event_to_string(key);
        if combo.is_empty() {
            return None;
        }
        self.bindings.get(&normalize_keybind(&combo)).copied()
    }

    /// First key bound to `action`, for hints in the UI
    pub fn key_for(&self, action: KeyAction) -> Option<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort();
        keys.first().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_to_string() {
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(key_event_to_string(key), "Ctrl+s");

        let key = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        assert_eq!(key_event_to_string(key), "Shift+Up");

        let key = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(key_event_to_string(key), "F5");
    }

    #[test]
    fn test_normalize_keybind() {
        assert_eq!(normalize_keybind("Ctrl+s"), "Ctrl+s");
        assert_eq!(normalize_keybind("Control+A"), "Ctrl+A");
        assert_eq!(normalize_keybind("Shift+Ctrl+Left"), normalize_keybind("Ctrl+Shift+Left"));
        assert_eq!(normalize_keybind("Ctrl+Alt+x"), "Alt+Ctrl+x");
    }

    #[test]
    fn test_valid_keybinds() {
        assert!(is_valid_keybind("F12"));
        assert!(is_valid_keybind("Ctrl+z"));
        assert!(is_valid_keybind("Alt+PageUp"));
        assert!(!is_valid_keybind("F13"));
        assert!(!is_valid_keybind("Ctrl+Banana"));
        assert!(!is_valid_keybind("Ctrl+"));
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("Hint".parse::<KeyAction>().unwrap(), KeyAction::Control(ControlId::Hint));
        assert_eq!("quit".parse::<KeyAction>().unwrap(), KeyAction::Quit);
        assert_eq!(
            "Menu-View".parse::<KeyAction>().unwrap(),
            KeyAction::OpenMenu(MenuId::View)
        );
        assert!("fly".parse::<KeyAction>().is_err());
        assert_eq!(KeyAction::SwapDirection.to_string(), "swap-direction");
    }

    #[test]
    fn test_keymap_lookup() {
        let mut binds = BTreeMap::new();
        binds.insert("F2".to_string(), "Double".to_string());
        binds.insert("Ctrl+Shift+Left".to_string(), "PrevGame".to_string());
        binds.insert("F9".to_string(), "nonsense".to_string());
        binds.insert("Hyper+q".to_string(), "quit".to_string());

        let map = KeyMap::from_config(&binds);
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.lookup(KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE)),
            Some(KeyAction::Control(ControlId::Double))
        );
        assert_eq!(
            map.lookup(KeyEvent::new(
                KeyCode::Left,
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            )),
            Some(KeyAction::Control(ControlId::PrevGame))
        );
        assert_eq!(map.lookup(KeyEvent::new(KeyCode::F(9), KeyModifiers::NONE)), None);
        assert_eq!(map.key_for(KeyAction::Control(ControlId::Double)), Some("F2"));
    }

    #[test]
    fn test_shifted_letter_binding_fires() {
        assert_eq!(normalize_keybind("Ctrl+Shift+x"), "Ctrl+Shift+X");
        assert_eq!(normalize_keybind("shift+a"), "Shift+A");
        assert_eq!(normalize_keybind("Ctrl+x"), "Ctrl+x");

        let mut binds = BTreeMap::new();
        binds.insert("Ctrl+Shift+x".to_string(), "Hint".to_string());
        let map = KeyMap::from_config(&binds);

        let shifted = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert_eq!(
            map.lookup(KeyEvent::new(KeyCode::Char('X'), shifted)),
            Some(KeyAction::Control(ControlId::Hint))
        );
        assert_eq!(
            map.lookup(KeyEvent::new(KeyCode::Char('x'), shifted)),
            Some(KeyAction::Control(ControlId::Hint))
        );
        assert_eq!(
            map.lookup(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }
}
