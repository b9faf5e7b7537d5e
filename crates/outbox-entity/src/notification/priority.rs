//! Notification priority enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority rank of a notification, stored as a small integer.
///
/// Lower rank is more urgent. The rank only influences dispatch ordering
/// in queries; the core performs no scheduling itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Dispatched before everything else.
    Urgent = 1,
    /// Above normal traffic.
    High = 2,
    /// Default rank.
    Normal = 3,
    /// Below normal traffic.
    Low = 4,
    /// Mass mailings, dispatched last.
    Bulk = 5,
}

impl Priority {
    /// Return the stored integer rank (lower = more urgent).
    pub fn rank(&self) -> i16 {
        *self as i16
    }

    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
            Self::Bulk => "bulk",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for Priority {
    type Error = outbox_core::AppError;

    fn try_from(rank: i16) -> Result<Self, Self::Error> {
        match rank {
            1 => Ok(Self::Urgent),
            2 => Ok(Self::High),
            3 => Ok(Self::Normal),
            4 => Ok(Self::Low),
            5 => Ok(Self::Bulk),
            _ => Err(outbox_core::AppError::validation(format!(
                "Invalid priority rank: {rank}. Expected 1 (urgent) through 5 (bulk)"
            ))),
        }
    }
}
