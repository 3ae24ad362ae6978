use std::fmt;

use serde::{Deserialize, Serialize};

/// Activity type of an industry job, keyed by the upstream activity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum IndustryActivity {
    None = 0,
    Manufacturing = 1,
    TimeEfficiencyResearch = 3,
    MaterialEfficiencyResearch = 4,
    Copying = 5,
    Invention = 8,
    Reactions = 11,
}

/// Returned for activity ids outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown industry activity id {0}")]
pub struct UnknownActivity(pub i32);

impl IndustryActivity {
    pub fn id(self) -> i32 {
        self as i32
    }

    /// The kind of industry slot this activity occupies.
    pub fn job_type(self) -> IndustryJobType {
        match self {
            Self::None => IndustryJobType::Undefined,
            Self::Manufacturing => IndustryJobType::Manufacturing,
            Self::TimeEfficiencyResearch
            | Self::MaterialEfficiencyResearch
            | Self::Copying
            | Self::Invention => IndustryJobType::Science,
            Self::Reactions => IndustryJobType::Reaction,
        }
    }
}

impl TryFrom<i32> for IndustryActivity {
    type Error = UnknownActivity;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::None),
            1 => Ok(Self::Manufacturing),
            3 => Ok(Self::TimeEfficiencyResearch),
            4 => Ok(Self::MaterialEfficiencyResearch),
            5 => Ok(Self::Copying),
            8 => Ok(Self::Invention),
            11 => Ok(Self::Reactions),
            other => Err(UnknownActivity(other)),
        }
    }
}

impl From<IndustryActivity> for i32 {
    fn from(activity: IndustryActivity) -> Self {
        activity.id()
    }
}

impl fmt::Display for IndustryActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Manufacturing => "manufacturing",
            Self::TimeEfficiencyResearch => "time efficiency research",
            Self::MaterialEfficiencyResearch => "material efficiency research",
            Self::Copying => "copying",
            Self::Invention => "invention",
            Self::Reactions => "reactions",
        };
        f.write_str(s)
    }
}

/// Kind of industry slot used by a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryJobType {
    Undefined,
    Manufacturing,
    Science,
    Reaction,
}
