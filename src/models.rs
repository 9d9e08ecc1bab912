use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatus {
    #[serde(rename = "ended")]
    Ended,
    #[serde(rename = "not_started")]
    NotStarted,
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "unknown")]
    Unknown,
    /// Only used by the sentinel record.
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Ended => "ended",
            MatchStatus::NotStarted => "not_started",
            MatchStatus::Live => "live",
            MatchStatus::Unknown => "unknown",
            MatchStatus::Unset => "",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchRecord {
    pub league: String,
    pub home: String,
    pub away: String,
    pub time: String,
    pub status: MatchStatus,
    pub logohome: String,
    pub logoaway: String,
}

impl MatchRecord {
    /// The all-empty placeholder served when nothing was extracted.
    pub fn sentinel() -> MatchRecord {
        MatchRecord::default()
    }

    pub fn key(&self) -> MatchKey {
        MatchKey(self.league.clone(), self.home.clone(), self.away.clone(), self.time.clone())
    }
}

impl Display for MatchRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} - {} {} ({})", self.league, self.home, self.away, self.time, self.status)
    }
}

/// Identifies a fixture within one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey(pub String, pub String, pub String, pub String);
