//! Industry job status and its string vocabulary.
//!
//! The same canonical strings are used by the upstream provider and by the
//! `status` column of the job tables. `Undefined` maps to the empty string
//! and is what any unmapped input decodes to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of an industry job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum IndustryJobStatus {
    /// No mapping found for the upstream value.
    #[default]
    Undefined,
    Active,
    Cancelled,
    Delivered,
    Paused,
    Ready,
    Reverted,
    /// Terminal state reported upstream, or assigned to jobs that vanished
    /// from the upstream listing while still running.
    Unknown,
}

/// Every status with its canonical string. `encode` and `decode` are both
/// derived from this table, so the two directions cannot drift apart.
pub const STATUS_VALUES: [(IndustryJobStatus, &str); 8] = [
    (IndustryJobStatus::Undefined, ""),
    (IndustryJobStatus::Active, "active"),
    (IndustryJobStatus::Cancelled, "cancelled"),
    (IndustryJobStatus::Delivered, "delivered"),
    (IndustryJobStatus::Paused, "paused"),
    (IndustryJobStatus::Ready, "ready"),
    (IndustryJobStatus::Reverted, "reverted"),
    (IndustryJobStatus::Unknown, "unknown"),
];

impl IndustryJobStatus {
    /// Returns the canonical string of this status.
    pub fn as_str(self) -> &'static str {
        // Index into the table through an exhaustive match, so adding a
        // variant fails to compile until the table is extended.
        let index = match self {
            Self::Undefined => 0,
            Self::Active => 1,
            Self::Cancelled => 2,
            Self::Delivered => 3,
            Self::Paused => 4,
            Self::Ready => 5,
            Self::Reverted => 6,
            Self::Unknown => 7,
        };
        STATUS_VALUES[index].1
    }

    /// Decodes a canonical string. Never fails: unmapped and empty input
    /// yields `Undefined`.
    pub fn decode(raw: &str) -> Self {
        STATUS_VALUES
            .iter()
            .find(|(_, s)| *s == raw)
            .map(|(status, _)| *status)
            .unwrap_or(Self::Undefined)
    }

    /// Whether the job still occupies an industry slot.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Paused | Self::Ready)
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Active => "in progress",
            Self::Cancelled => "cancelled",
            Self::Delivered => "delivered",
            Self::Paused => "halted",
            Self::Ready => "ready",
            Self::Reverted => "reverted",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IndustryJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for IndustryJobStatus {
    fn from(raw: &str) -> Self {
        Self::decode(raw)
    }
}

impl From<String> for IndustryJobStatus {
    fn from(raw: String) -> Self {
        Self::decode(&raw)
    }
}

impl From<IndustryJobStatus> for String {
    fn from(status: IndustryJobStatus) -> Self {
        status.as_str().to_string()
    }
}
