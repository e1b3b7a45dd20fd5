use std::collections::HashSet;

use redflag_types::{Behavior, VoteCategory};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cursor::PageKey;
use crate::error::{Error, Result};
use crate::ranking::{self, VerdictRule};
use crate::selector::{self, Selection};
use crate::store::BehaviorStore;

pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_TEXT_CHARS: usize = 280;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Cap on how many approved behaviors batch views (popular, verdict
    /// listings, judging) ever look at.
    pub ranking_window: u32,
    pub verdict_rule: VerdictRule,
    /// Random batches read `count * oversample_factor` rows before shuffling.
    pub oversample_factor: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ranking_window: 100,
            verdict_rule: VerdictRule::Plurality,
            oversample_factor: 3,
        }
    }
}

/// One recency page. `next_cursor` is `None` once the page came back short.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Behavior>,
    pub next_cursor: Option<String>,
}

/// Read and write operations over the behavior store. Only approved
/// behaviors are ever listed, looked up or voted on.
pub struct Catalog<S> {
    store: S,
    config: CatalogConfig,
}

impl<S: BehaviorStore> Catalog<S> {
    pub fn new(store: S, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_recent(&self, page_size: u32, cursor: Option<&str>) -> Result<Page> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let after = cursor.map(PageKey::decode).transpose()?;

        let items = self.store.approved_page(page_size, after.as_ref())?;
        let next_cursor = if items.len() == page_size as usize {
            items.last().map(|b| PageKey::after(b).encode())
        } else {
            None
        };

        debug!("Recent page: {} items, more={}", items.len(), next_cursor.is_some());
        Ok(Page { items, next_cursor })
    }

    /// The approved set, newest first, capped at the ranking window.
    pub fn list_all_approved(&self) -> Result<Vec<Behavior>> {
        Ok(self.store.approved_page(self.config.ranking_window, None)?)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Behavior> {
        self.store
            .get(id)?
            .filter(|b| b.is_approved)
            .ok_or_else(|| Error::NotFound(format!("behavior {id}")))
    }

    /// Store a new behavior pending moderation.
    pub fn submit(&self, text: &str) -> Result<Uuid> {
        let text = validate_text(text)?;
        let id = Uuid::new_v4();

        self.store.insert(id, text)?;

        info!("Behavior {} submitted, awaiting approval", id);
        Ok(id)
    }

    pub fn increment_vote(&self, id: Uuid, category: VoteCategory) -> Result<()> {
        if self.store.increment(id, category)? {
            debug!("Vote {} on {}", category, id);
            Ok(())
        } else {
            Err(Error::NotFound(format!("behavior {id}")))
        }
    }

    /// Most-voted behaviors within the ranking window.
    pub fn popular(&self, limit: usize) -> Result<Vec<Behavior>> {
        let mut ranked = ranking::rank_popular(self.list_all_approved()?);
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Popular-ordered behaviors whose verdict, under the configured rule,
    /// is `category`.
    pub fn by_verdict(&self, category: VoteCategory) -> Result<Vec<Behavior>> {
        let ranked = ranking::rank_popular(self.list_all_approved()?);
        Ok(ranking::filter_by_verdict(ranked, category, self.config.verdict_rule))
    }

    pub fn random_batch(&self, count: usize) -> Result<Vec<Behavior>> {
        let count = count.min(MAX_PAGE_SIZE as usize);
        let fetch = (count as u32).saturating_mul(self.config.oversample_factor.max(1));
        let pool = self.store.approved_page(fetch, None)?;
        Ok(selector::sample(pool, count, &mut rand::rng()))
    }

    pub fn next_unseen(&self, exclude: &HashSet<Uuid>) -> Result<Selection> {
        let pool = self.list_all_approved()?;
        Ok(selector::select_unseen(pool, exclude, &mut rand::rng()))
    }

    /// Manual moderation: make a behavior visible. One-way.
    pub fn approve(&self, id: Uuid) -> Result<()> {
        if self.store.approve(id)? {
            info!("Behavior {} approved", id);
            Ok(())
        } else {
            Err(Error::NotFound(format!("behavior {id}")))
        }
    }
}

/// Trim and bounds-check submission text, counting characters rather than
/// bytes.
pub fn validate_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();

    if len < MIN_TEXT_CHARS {
        return Err(Error::Validation(format!(
            "The behavior description is too short. Please provide at least {MIN_TEXT_CHARS} characters."
        )));
    }
    if len > MAX_TEXT_CHARS {
        return Err(Error::Validation(format!(
            "The behavior description is too long. Please keep it under {MAX_TEXT_CHARS} characters."
        )));
    }

    Ok(trimmed)
}
