//! Output target selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the supported output syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Lua,
    #[serde(alias = "js")]
    JavaScript,
    C,
    Hare,
}

impl Target {
    pub const ALL: [Target; 4] = [Target::Lua, Target::JavaScript, Target::C, Target::Hare];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Target::Lua => "lua",
            Target::JavaScript => "javascript",
            Target::C => "c",
            Target::Hare => "hare",
        }
    }

    /// True for targets whose arrays are indexed from 1.
    pub fn one_indexed(self) -> bool {
        matches!(self, Target::Lua)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised target name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target '{0}' (expected one of: lua, javascript, c, hare)")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lua" => Ok(Target::Lua),
            "js" | "javascript" => Ok(Target::JavaScript),
            "c" => Ok(Target::C),
            "hare" | "ha" => Ok(Target::Hare),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("lua".parse::<Target>().unwrap(), Target::Lua);
        assert_eq!("JS".parse::<Target>().unwrap(), Target::JavaScript);
        assert_eq!("javascript".parse::<Target>().unwrap(), Target::JavaScript);
        assert_eq!("c".parse::<Target>().unwrap(), Target::C);
        assert_eq!("ha".parse::<Target>().unwrap(), Target::Hare);
        assert!("cobol".parse::<Target>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for target in Target::ALL {
            assert_eq!(target.to_string().parse::<Target>().unwrap(), target);
        }
    }
}
