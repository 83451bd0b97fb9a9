//! Keybind validator
//!
//! Checks the `[keybinds]` table: every key must be one the terminal can
//! report, every action must name a toolbar control or a known accelerator,
//! and there must always be a way to quit.

use crate::core::menu_actions::{is_valid_keybind, normalize_keybind, KeyAction};
use std::collections::{BTreeMap, HashMap};

/// Actions that must stay reachable from the keyboard, with their default key
const CRITICAL_BINDINGS: [(&str, &str); 1] = [("quit", "Ctrl+q")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    InvalidKey {
        keybind: String,
        action: String,
    },
    UnknownAction {
        keybind: String,
        action: String,
    },
    MissingCriticalBinding {
        action: String,
        default: String,
    },
    DuplicateBinding {
        keybind: String,
        keys: Vec<String>,
    },
}

impl ValidationIssue {
    pub fn severity(&self) -> ValidationSeverity {
        match self {
            ValidationIssue::InvalidKey { .. }
            | ValidationIssue::UnknownAction { .. }
            | ValidationIssue::MissingCriticalBinding { .. } => ValidationSeverity::Error,
            ValidationIssue::DuplicateBinding { .. } => ValidationSeverity::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::InvalidKey { keybind, action } => {
                format!("Key '{}' (bound to '{}') is not a recognized key", keybind, action)
            }
            ValidationIssue::UnknownAction { keybind, action } => {
                format!("Key '{}' is bound to unknown action '{}'", keybind, action)
            }
            ValidationIssue::MissingCriticalBinding { action, default } => {
                format!(
                    "Critical action '{}' has no keybind! Default: {}",
                    action, default
                )
            }
            ValidationIssue::DuplicateBinding { keybind, keys } => {
                format!(
                    "Keybind '{}' is written more than once: {}",
                    keybind,
                    keys.join(", ")
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn by_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.by_severity(ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.by_severity(ValidationSeverity::Warning)
    }
}

/// Validate the `[keybinds]` table
pub fn validate_keybinds(keybinds: &BTreeMap<String, String>) -> ValidationResult {
    let mut issues = Vec::new();

    for (keybind, action) in keybinds {
        if !is_valid_keybind(keybind) {
            issues.push(ValidationIssue::InvalidKey {
                keybind: keybind.clone(),
                action: action.clone(),
            });
        } else if action.parse::<KeyAction>().is_err() {
            issues.push(ValidationIssue::UnknownAction {
                keybind: keybind.clone(),
                action: action.clone(),
            });
        }
    }

    for (action, default) in CRITICAL_BINDINGS {
        let bound = keybinds
            .iter()
            .any(|(keybind, bound)| is_valid_keybind(keybind) && bound.eq_ignore_ascii_case(action));
        if !bound {
            issues.push(ValidationIssue::MissingCriticalBinding {
                action: action.to_string(),
                default: default.to_string(),
            });
        }
    }

    check_duplicates(&mut issues, keybinds);

    ValidationResult { issues }
}

/// Keys that are spelled differently but mean the same combo
fn check_duplicates(issues: &mut Vec<ValidationIssue>, keybinds: &BTreeMap<String, String>) {
    let mut by_combo: HashMap<String, Vec<String>> = HashMap::new();
    for keybind in keybinds.keys() {
        by_combo
            .entry(normalize_keybind(keybind))
            .or_default()
            .push(keybind.clone());
    }

    let mut duplicates: Vec<(String, Vec<String>)> = by_combo
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .collect();
    duplicates.sort();

    for (keybind, keys) in duplicates {
        issues.push(ValidationIssue::DuplicateBinding { keybind, keys });
    }
}

/// Drop entries that can never fire and restore missing critical bindings.
/// Returns the number of issues fixed.
pub fn auto_fix_keybinds(
    keybinds: &mut BTreeMap<String, String>,
    issues: &[ValidationIssue],
) -> usize {
    let mut fixed = 0;

    for issue in issues {
        match issue {
            ValidationIssue::InvalidKey { keybind, .. }
            | ValidationIssue::UnknownAction { keybind, .. } => {
                if keybinds.remove(keybind).is_some() {
                    fixed += 1;
                }
            }
            ValidationIssue::MissingCriticalBinding { action, default } => {
                let taken = keybinds
                    .keys()
                    .any(|k| normalize_keybind(k) == normalize_keybind(default));
                if taken {
                    tracing::warn!(
                        "Cannot restore '{}' for '{}': key already in use",
                        default,
                        action
                    );
                } else {
                    keybinds.insert(default.clone(), action.clone());
                    fixed += 1;
                }
            }
            ValidationIssue::DuplicateBinding { .. } => {}
        }
    }

    fixed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binds(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = crate::config::Config::embedded_defaults().unwrap();
        let result = validate_keybinds(&config.keybinds);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
    }

    #[test]
    fn test_reports_each_kind() {
        let keybinds = binds(&[
            ("F2", "Double"),
            ("Ctrl+Shift+x", "Hint"),
            ("Shift+Ctrl+x", "Hint"),
            ("Hyper+h", "Hint"),
            ("F3", "Teleport"),
        ]);
        let result = validate_keybinds(&keybinds);

        assert!(result.has_errors());
        assert_eq!(result.warnings().len(), 1);
        assert!(result.issues.contains(&ValidationIssue::InvalidKey {
            keybind: "Hyper+h".to_string(),
            action: "Hint".to_string(),
        }));
        assert!(result.issues.contains(&ValidationIssue::UnknownAction {
            keybind: "F3".to_string(),
            action: "Teleport".to_string(),
        }));
        assert!(result
            .errors()
            .iter()
            .any(|i| matches!(i, ValidationIssue::MissingCriticalBinding { .. })));
    }

    #[test]
    fn test_shift_letter_case_is_one_combo() {
        let keybinds = binds(&[
            ("Ctrl+q", "quit"),
            ("Ctrl+Shift+x", "Hint"),
            ("Ctrl+Shift+X", "Next"),
        ]);
        let result = validate_keybinds(&keybinds);
        assert!(!result.has_errors());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_auto_fix() {
        let mut keybinds = binds(&[("F2", "Double"), ("F3", "Teleport")]);
        let result = validate_keybinds(&keybinds);
        let fixed = auto_fix_keybinds(&mut keybinds, &result.issues);

        assert_eq!(fixed, 2);
        assert!(!keybinds.contains_key("F3"));
        assert_eq!(keybinds.get("Ctrl+q").map(String::as_str), Some("quit"));
        assert!(!validate_keybinds(&keybinds).has_errors());
    }

    #[test]
    fn test_auto_fix_does_not_steal_key() {
        let mut keybinds = binds(&[("Ctrl+q", "Hint")]);
        let result = validate_keybinds(&keybinds);
        assert_eq!(auto_fix_keybinds(&mut keybinds, &result.issues), 0);
        assert_eq!(keybinds.get("Ctrl+q").map(String::as_str), Some("Hint"));
    }
}
