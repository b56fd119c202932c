//! Activity type codes and the focus categories derived from them.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Single-letter activity classifier used in time blocks (`T:`, `M:`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeCode {
    Task,
    Meeting,
    Comms,
    Admin,
    Learning,
    Break,
}

impl TypeCode {
    /// Every code, in table order.
    pub const ALL: [Self; 6] = [
        Self::Task,
        Self::Meeting,
        Self::Comms,
        Self::Admin,
        Self::Learning,
        Self::Break,
    ];

    /// Looks up the code for a block letter. Letters are case-sensitive.
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'T' => Some(Self::Task),
            'M' => Some(Self::Meeting),
            'C' => Some(Self::Comms),
            'A' => Some(Self::Admin),
            'L' => Some(Self::Learning),
            'B' => Some(Self::Break),
            _ => None,
        }
    }

    /// Display name used as the aggregation key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Meeting => "Meeting",
            Self::Comms => "Comms",
            Self::Admin => "Admin",
            Self::Learning => "Learning",
            Self::Break => "Break",
        }
    }

    /// Focus category for this code. Breaks have none.
    pub const fn focus(self) -> Option<Focus> {
        match self {
            Self::Task | Self::Learning => Some(Focus::Deep),
            Self::Meeting => Some(Focus::Meeting),
            Self::Comms | Self::Admin => Some(Focus::Shallow),
            Self::Break => None,
        }
    }

    /// Resolves a display name (`"Task"`, `"Break"`, ...) back to its code.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.name() == name)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeCode {
    type Err = UnknownTypeCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::from_letter(letter),
            _ => Self::from_name(s),
        };
        code.ok_or_else(|| UnknownTypeCode(s.to_string()))
    }
}

impl TryFrom<char> for TypeCode {
    type Error = UnknownTypeCode;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        Self::from_letter(letter).ok_or_else(|| UnknownTypeCode(letter.to_string()))
    }
}

impl Serialize for TypeCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Error type for unknown type code strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type code: {0}")]
pub struct UnknownTypeCode(String);

/// Productivity focus bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Focus {
    Deep,
    Meeting,
    Shallow,
}

impl Focus {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Deep => "Deep",
            Self::Meeting => "Meeting",
            Self::Shallow => "Shallow",
        }
    }

    /// Focus bucket for a type display name; `None` for `Break` and unknown names.
    pub fn for_type_name(type_name: &str) -> Option<Self> {
        TypeCode::from_name(type_name).and_then(TypeCode::focus)
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_match_table() {
        let codes: Vec<_> = "TMCALB".chars().filter_map(TypeCode::from_letter).collect();
        assert_eq!(codes, TypeCode::ALL);
    }

    #[test]
    fn names_match_table() {
        let names: Vec<_> = TypeCode::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["Task", "Meeting", "Comms", "Admin", "Learning", "Break"]
        );
    }

    #[test]
    fn unknown_letter_rejected() {
        assert_eq!(TypeCode::from_letter('X'), None);
        assert_eq!(TypeCode::from_letter('t'), None);
        let err = "X".parse::<TypeCode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown type code: X");
    }

    #[test]
    fn parses_letters_and_names() {
        assert_eq!("M".parse::<TypeCode>().unwrap(), TypeCode::Meeting);
        assert_eq!("Learning".parse::<TypeCode>().unwrap(), TypeCode::Learning);
        assert_eq!(TypeCode::try_from('A').unwrap(), TypeCode::Admin);
    }

    #[test]
    fn focus_mapping() {
        assert_eq!(TypeCode::Task.focus(), Some(Focus::Deep));
        assert_eq!(TypeCode::Learning.focus(), Some(Focus::Deep));
        assert_eq!(TypeCode::Meeting.focus(), Some(Focus::Meeting));
        assert_eq!(TypeCode::Comms.focus(), Some(Focus::Shallow));
        assert_eq!(TypeCode::Admin.focus(), Some(Focus::Shallow));
        assert_eq!(TypeCode::Break.focus(), None);
        assert_eq!(Focus::for_type_name("UnknownType"), None);
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&TypeCode::Comms).unwrap();
        assert_eq!(json, "\"Comms\"");
    }
}
