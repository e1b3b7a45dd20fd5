use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use redflag_types::{Behavior, VoteCategory, Votes};
use serde::{Deserialize, Serialize};

/// How a behavior is assigned to a red/green/neutral listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictRule {
    /// The category's count beats each of the other two outright.
    #[default]
    Plurality,
    /// The category holds more than half of all votes.
    StrictMajority,
}

impl VerdictRule {
    /// Listing a behavior belongs to, if any. Neutral wins ties with the
    /// top count, so unvoted behaviors are neutral; a red/green tie is in
    /// no listing.
    pub fn classify(self, votes: &Votes) -> Option<VoteCategory> {
        VoteCategory::ALL.into_iter().find(|c| self.matches(votes, *c))
    }

    pub fn matches(self, votes: &Votes, category: VoteCategory) -> bool {
        let count = votes.get(category);
        match self {
            Self::Plurality => VoteCategory::ALL
                .into_iter()
                .filter(|other| *other != category)
                .all(|other| match category {
                    VoteCategory::Neutral => count >= votes.get(other),
                    _ => count > votes.get(other),
                }),
            Self::StrictMajority => count * 2 > votes.total(),
        }
    }
}

impl fmt::Display for VerdictRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plurality => f.write_str("plurality"),
            Self::StrictMajority => f.write_str("majority"),
        }
    }
}

impl FromStr for VerdictRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plurality" => Ok(Self::Plurality),
            "majority" | "strict_majority" => Ok(Self::StrictMajority),
            other => Err(format!("unknown verdict rule '{other}' (expected plurality or majority)")),
        }
    }
}

/// Most-voted first. The sort is stable, so equal totals keep retrieval order.
pub fn rank_popular(mut items: Vec<Behavior>) -> Vec<Behavior> {
    items.sort_by_key(|b| Reverse(b.votes.total()));
    items
}

pub fn filter_by_verdict(items: Vec<Behavior>, category: VoteCategory, rule: VerdictRule) -> Vec<Behavior> {
    items
        .into_iter()
        .filter(|b| rule.matches(&b.votes, category))
        .collect()
}
