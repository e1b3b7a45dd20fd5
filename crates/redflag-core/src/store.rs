use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use redflag_db::Database;
use redflag_db::models::TraitRow;
use redflag_types::{Behavior, VoteCategory, Votes};
use uuid::Uuid;

use crate::cursor::PageKey;

/// The persistence seam the catalog is written against: insert, point
/// lookup, approved listings, atomic increments and the moderation flag.
pub trait BehaviorStore: Send + Sync {
    fn insert(&self, id: Uuid, text: &str) -> Result<()>;

    fn get(&self, id: Uuid) -> Result<Option<Behavior>>;

    /// Approved behaviors, newest first, strictly after `after`.
    fn approved_page(&self, limit: u32, after: Option<&PageKey>) -> Result<Vec<Behavior>>;

    /// Must be a single atomic increment. Returns false when no approved
    /// behavior has this id.
    fn increment(&self, id: Uuid, category: VoteCategory) -> Result<bool>;

    /// Returns false when the id does not exist.
    fn approve(&self, id: Uuid) -> Result<bool>;
}

impl<S: BehaviorStore + ?Sized> BehaviorStore for Arc<S> {
    fn insert(&self, id: Uuid, text: &str) -> Result<()> {
        (**self).insert(id, text)
    }

    fn get(&self, id: Uuid) -> Result<Option<Behavior>> {
        (**self).get(id)
    }

    fn approved_page(&self, limit: u32, after: Option<&PageKey>) -> Result<Vec<Behavior>> {
        (**self).approved_page(limit, after)
    }

    fn increment(&self, id: Uuid, category: VoteCategory) -> Result<bool> {
        (**self).increment(id, category)
    }

    fn approve(&self, id: Uuid) -> Result<bool> {
        (**self).approve(id)
    }
}

impl BehaviorStore for Database {
    fn insert(&self, id: Uuid, text: &str) -> Result<()> {
        self.insert_trait(&id.to_string(), text)
    }

    fn get(&self, id: Uuid) -> Result<Option<Behavior>> {
        self.get_trait(&id.to_string())?.map(row_to_behavior).transpose()
    }

    fn approved_page(&self, limit: u32, after: Option<&PageKey>) -> Result<Vec<Behavior>> {
        let key = after.map(|k| (redflag_db::format_timestamp(&k.created_at), k.id.to_string()));
        let rows = self.list_approved_page(limit, key.as_ref().map(|(c, i)| (c.as_str(), i.as_str())))?;
        rows.into_iter().map(row_to_behavior).collect()
    }

    fn increment(&self, id: Uuid, category: VoteCategory) -> Result<bool> {
        self.increment_vote(&id.to_string(), category)
    }

    fn approve(&self, id: Uuid) -> Result<bool> {
        self.approve_trait(&id.to_string())
    }
}

fn row_to_behavior(row: TraitRow) -> Result<Behavior> {
    let id: Uuid = row.id.parse().with_context(|| format!("corrupt trait id '{}'", row.id))?;
    let created_at = row
        .created_at
        .parse::<DateTime<Utc>>()
        .with_context(|| format!("corrupt created_at '{}' on trait {}", row.created_at, id))?;

    Ok(Behavior {
        id,
        text: row.text,
        is_approved: row.is_approved,
        votes: Votes::new(count(row.red_flag), count(row.green_flag), count(row.neutral)),
        created_at,
    })
}

// The schema forbids negative tallies; clamp rather than wrap if one slips in.
fn count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}
