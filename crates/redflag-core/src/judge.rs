//! One-at-a-time judging flow.
//!
//! The session remembers what the voter has already judged, shows one
//! unseen behavior at a time and refuses new votes while the next behavior
//! is loading. Tallies shown after a vote are bumped locally before the
//! store confirms; a failed increment is reported but not rolled back.

use redflag_types::{Behavior, VoteCategory};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::selector::Selection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JudgePhase {
    #[default]
    Idle,
    Loading,
    Showing,
    /// Nothing unseen is left; offer a fresh start.
    AllSeen,
}

/// The behavior just voted on, with the voter's vote already counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judged {
    pub behavior: Behavior,
    pub category: VoteCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JudgeAction {
    Start,
    Vote(VoteCategory),
    NextLoaded { generation: u64, selection: Selection },
    NextFailed { generation: u64, message: String },
    VoteFailed { id: Uuid, message: String },
    StartOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeEffect {
    Increment { id: Uuid, category: VoteCategory },
    FetchNext { generation: u64, exclude: Vec<Uuid> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeSession {
    phase: JudgePhase,
    generation: u64,
    current: Option<Behavior>,
    last_judged: Option<Judged>,
    voted: Vec<Uuid>,
    error: Option<String>,
}

impl JudgeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JudgePhase {
        self.phase
    }

    pub fn current(&self) -> Option<&Behavior> {
        self.current.as_ref()
    }

    pub fn last_judged(&self) -> Option<&Judged> {
        self.last_judged.as_ref()
    }

    pub fn voted(&self) -> &[Uuid] {
        &self.voted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Vote buttons are live only while a behavior is showing.
    pub fn can_vote(&self) -> bool {
        self.phase == JudgePhase::Showing && self.current.is_some()
    }

    pub fn apply(&mut self, action: JudgeAction) -> Vec<JudgeEffect> {
        match action {
            JudgeAction::Start => {
                if self.phase == JudgePhase::Loading {
                    return Vec::new();
                }
                vec![self.fetch_next()]
            }
            JudgeAction::Vote(category) => {
                if !self.can_vote() {
                    return Vec::new();
                }
                let Some(mut behavior) = self.current.take() else {
                    return Vec::new();
                };
                let id = behavior.id;
                if !self.voted.contains(&id) {
                    self.voted.push(id);
                }
                behavior.votes.bump(category);
                self.last_judged = Some(Judged { behavior, category });

                // Next behavior loads while the increment is still in flight.
                vec![JudgeEffect::Increment { id, category }, self.fetch_next()]
            }
            JudgeAction::NextLoaded { generation, selection } => {
                if generation != self.generation || self.phase != JudgePhase::Loading {
                    return Vec::new();
                }
                match selection {
                    Selection::Next(behavior) => {
                        self.current = Some(behavior);
                        self.phase = JudgePhase::Showing;
                    }
                    Selection::Exhausted => {
                        self.current = None;
                        self.phase = JudgePhase::AllSeen;
                    }
                }
                Vec::new()
            }
            JudgeAction::NextFailed { generation, message } => {
                if generation != self.generation || self.phase != JudgePhase::Loading {
                    return Vec::new();
                }
                self.phase = JudgePhase::Idle;
                self.error = Some(message);
                Vec::new()
            }
            JudgeAction::VoteFailed { id, message } => {
                // No rollback: the optimistic tally stays as shown.
                warn!("Vote on {} was not saved: {}", id, message);
                self.error = Some(message);
                Vec::new()
            }
            JudgeAction::StartOver => {
                self.voted.clear();
                self.last_judged = None;
                vec![self.fetch_next()]
            }
        }
    }

    fn fetch_next(&mut self) -> JudgeEffect {
        self.generation += 1;
        self.phase = JudgePhase::Loading;
        self.error = None;
        JudgeEffect::FetchNext {
            generation: self.generation,
            exclude: self.voted.clone(),
        }
    }
}
