//! Process scheduling priority levels.
//!
//! The level is chosen in settings (or on the command line) and carried in
//! `Config.system.priority`. Names and command tokens live in one table so the
//! variant order, the display strings and the tokens cannot drift apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// OS scheduling priority for the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PriorityLevel {
    Idle,
    BelowNormal,
    #[default]
    Normal,
    AboveNormal,
    High,
    Realtime,
}

/// (level, display name, command token), in enum order
const PRIORITY_TABLE: [(PriorityLevel, &str, &str); 6] = [
    (PriorityLevel::Idle, "Idle", "idle"),
    (PriorityLevel::BelowNormal, "Below normal", "belownormal"),
    (PriorityLevel::Normal, "Normal", "normal"),
    (PriorityLevel::AboveNormal, "Above normal", "abovenormal"),
    (PriorityLevel::High, "High", "high"),
    (PriorityLevel::Realtime, "Realtime", "realtime"),
];

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 6] = [
        PriorityLevel::Idle,
        PriorityLevel::BelowNormal,
        PriorityLevel::Normal,
        PriorityLevel::AboveNormal,
        PriorityLevel::High,
        PriorityLevel::Realtime,
    ];

    fn entry(self) -> &'static (PriorityLevel, &'static str, &'static str) {
        &PRIORITY_TABLE[self as usize]
    }

    /// Human-readable name shown in settings
    pub fn display_name(self) -> &'static str {
        self.entry().1
    }

    /// Token used by `set priority <token>` and `--priority`
    pub fn command_token(self) -> &'static str {
        self.entry().2
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        PRIORITY_TABLE
            .iter()
            .find(|(_, _, t)| t.eq_ignore_ascii_case(token))
            .map(|(level, _, _)| *level)
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PriorityLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|p| p.command_token()).collect();
            anyhow::anyhow!("Unknown priority '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

impl Serialize for PriorityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.command_token())
    }
}

impl<'de> Deserialize<'de> for PriorityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for (idx, level) in PriorityLevel::ALL.iter().enumerate() {
            assert_eq!(*level as usize, idx);
            assert_eq!(PRIORITY_TABLE[idx].0, *level);
        }
    }

    #[test]
    fn test_names_and_tokens() {
        assert_eq!(PriorityLevel::BelowNormal.display_name(), "Below normal");
        assert_eq!(PriorityLevel::Realtime.command_token(), "realtime");
        assert_eq!(PriorityLevel::default(), PriorityLevel::Normal);
    }

    #[test]
    fn test_tokens_are_distinct() {
        let mut tokens: Vec<&str> = PriorityLevel::ALL.iter().map(|p| p.command_token()).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), PriorityLevel::ALL.len());
    }

    #[test]
    fn test_parse() {
        assert_eq!("High".parse::<PriorityLevel>().unwrap(), PriorityLevel::High);
        assert_eq!(" abovenormal ".parse::<PriorityLevel>().unwrap(), PriorityLevel::AboveNormal);
        assert!("turbo".parse::<PriorityLevel>().is_err());
    }
}
