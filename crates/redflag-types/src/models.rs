use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three verdicts a voter can cast. Order of declaration is the
/// tie-break precedence used when picking a majority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoteCategory {
    RedFlag,
    GreenFlag,
    Neutral,
}

impl VoteCategory {
    pub const ALL: [VoteCategory; 3] = [Self::RedFlag, Self::GreenFlag, Self::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RedFlag => "redFlag",
            Self::GreenFlag => "greenFlag",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for VoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vote category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for VoteCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redFlag" => Ok(Self::RedFlag),
            "greenFlag" => Ok(Self::GreenFlag),
            "neutral" => Ok(Self::Neutral),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Vote tallies for one behavior. Counters only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Votes {
    pub red_flag: u64,
    pub green_flag: u64,
    pub neutral: u64,
}

impl Votes {
    pub fn new(red_flag: u64, green_flag: u64, neutral: u64) -> Self {
        Self { red_flag, green_flag, neutral }
    }

    pub fn total(&self) -> u64 {
        self.red_flag + self.green_flag + self.neutral
    }

    pub fn get(&self, category: VoteCategory) -> u64 {
        match category {
            VoteCategory::RedFlag => self.red_flag,
            VoteCategory::GreenFlag => self.green_flag,
            VoteCategory::Neutral => self.neutral,
        }
    }

    /// Local increment used for optimistic display; the stored counter is
    /// bumped separately by the store.
    pub fn bump(&mut self, category: VoteCategory) {
        let slot = match category {
            VoteCategory::RedFlag => &mut self.red_flag,
            VoteCategory::GreenFlag => &mut self.green_flag,
            VoteCategory::Neutral => &mut self.neutral,
        };
        *slot = slot.saturating_add(1);
    }
}

/// A submitted dating behavior and its community tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    pub id: Uuid,
    pub text: String,
    pub is_approved: bool,
    pub votes: Votes,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Percentages {
    pub red_flag: f64,
    pub green_flag: f64,
    pub neutral: f64,
}

impl Percentages {
    pub fn get(&self, category: VoteCategory) -> f64 {
        match category {
            VoteCategory::RedFlag => self.red_flag,
            VoteCategory::GreenFlag => self.green_flag,
            VoteCategory::Neutral => self.neutral,
        }
    }

    /// Whole-number percentage for display. Never stored.
    pub fn rounded(&self, category: VoteCategory) -> u32 {
        self.get(category).round() as u32
    }
}

/// The "Community Verdict": winning category and its share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub category: VoteCategory,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub total: u64,
    pub percentages: Percentages,
    pub majority: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names() {
        for category in VoteCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(category.as_str().parse::<VoteCategory>().unwrap(), category);
        }
        assert!("red_flag".parse::<VoteCategory>().is_err());
    }

    #[test]
    fn bump_touches_one_counter() {
        let mut votes = Votes::new(1, 2, 3);
        votes.bump(VoteCategory::GreenFlag);
        assert_eq!(votes, Votes::new(1, 3, 3));
        assert_eq!(votes.total(), 7);
    }

    #[test]
    fn behavior_serializes_camel_case() {
        let behavior = Behavior {
            id: Uuid::nil(),
            text: "Texts back within a minute".into(),
            is_approved: true,
            votes: Votes::new(0, 4, 1),
            created_at: DateTime::default(),
        };
        let value = serde_json::to_value(&behavior).unwrap();
        assert_eq!(value["isApproved"], true);
        assert_eq!(value["votes"]["greenFlag"], 4);
        assert!(value.get("createdAt").is_some());
    }
}
