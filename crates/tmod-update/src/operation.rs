//! Modify update operations

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Arithmetic applied to every cell of one update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Overwrite the cell
    Replace,
    /// Add to the cell (absent counts as 0)
    Add,
    /// Multiply the cell (absent counts as 0)
    Multiply,
}

impl Operation {
    /// All operations
    pub const ALL: [Self; 3] = [Self::Replace, Self::Add, Self::Multiply];

    /// Operation for its payload literal, case-sensitive
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "replace" => Some(Self::Replace),
            "add" => Some(Self::Add),
            "multiply" => Some(Self::Multiply),
            _ => None,
        }
    }

    /// Payload literal
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Add => "add",
            Self::Multiply => "multiply",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
