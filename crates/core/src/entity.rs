//! The four managed record kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Entity kinds managed through the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Student,
    Teacher,
    Material,
    Lecture,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Student,
        EntityType::Teacher,
        EntityType::Material,
        EntityType::Lecture,
    ];

    /// Collection name used in remote paths and list responses.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Teacher => "teachers",
            Self::Material => "materials",
            Self::Lecture => "lectures",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "학생",
            Self::Teacher => "강사",
            Self::Material => "교재",
            Self::Lecture => "강의",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    /// Accepts either the collection name (`students`) or the singular
    /// (`student`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "students" => Ok(Self::Student),
            "teacher" | "teachers" => Ok(Self::Teacher),
            "material" | "materials" => Ok(Self::Material),
            "lecture" | "lectures" => Ok(Self::Lecture),
            _ => Err(CoreError::UnknownEntityType(s.to_string())),
        }
    }
}
