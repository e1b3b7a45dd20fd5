//! Browse state for the explore view.
//!
//! All state lives in [`ExploreState`]; every user action and every fetch
//! result goes through [`ExploreState::apply`], which may ask the caller to
//! run a [`Fetch`]. Fetch results carry the generation they were issued
//! under, and results from an older generation are dropped.
//!
//! The recent view pages through the server with a cursor. Every other view
//! fetches one batch up front and reveals it a page at a time.

use redflag_types::{Behavior, VoteCategory};
use serde::{Deserialize, Deserializer, Serialize, de};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    #[default]
    Popular,
    Recent,
    RedFlags,
    GreenFlags,
    Neutral,
}

impl FilterMode {
    pub fn is_cursor_paged(self) -> bool {
        matches!(self, Self::Recent)
    }

    /// Verdict listing this filter maps to, if it is one.
    pub fn verdict(self) -> Option<VoteCategory> {
        match self {
            Self::RedFlags => Some(VoteCategory::RedFlag),
            Self::GreenFlags => Some(VoteCategory::GreenFlag),
            Self::Neutral => Some(VoteCategory::Neutral),
            Self::Popular | Self::Recent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    LoadingMore,
    /// Loaded, and nothing more to reveal or fetch.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExploreAction {
    SetFilter(FilterMode),
    /// Reload the current filter from scratch.
    Refresh,
    LoadMore,
    SetSearch(String),
    BatchLoaded {
        generation: u64,
        items: Vec<Behavior>,
    },
    PageLoaded {
        generation: u64,
        items: Vec<Behavior>,
        next_cursor: Option<String>,
    },
    FetchFailed {
        generation: u64,
        message: String,
    },
}

/// Work the caller must perform and feed back as an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    /// Whole batch for a non-recent filter.
    Batch { generation: u64, filter: FilterMode },
    /// One recency page.
    Page {
        generation: u64,
        page_size: usize,
        cursor: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreState {
    filter: FilterMode,
    phase: Phase,
    #[serde(deserialize_with = "nonzero_page_size")]
    page_size: usize,
    generation: u64,
    /// Everything revealed so far, before search narrowing.
    items: Vec<Behavior>,
    /// Prefetched batch for non-recent filters.
    batch: Vec<Behavior>,
    pages_shown: usize,
    cursor: Option<String>,
    has_more: bool,
    search: String,
    error: Option<String>,
}

fn nonzero_page_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match usize::deserialize(deserializer)? {
        0 => Err(de::Error::custom("pageSize must be at least 1")),
        n => Ok(n),
    }
}

impl Default for ExploreState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ExploreState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: FilterMode::default(),
            phase: Phase::Idle,
            page_size: page_size.max(1),
            generation: 0,
            items: Vec::new(),
            batch: Vec::new(),
            pages_shown: 0,
            cursor: None,
            has_more: false,
            search: String::new(),
            error: None,
        }
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::LoadingMore)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Revealed items, ignoring the search term.
    pub fn loaded(&self) -> &[Behavior] {
        &self.items
    }

    /// Revealed items narrowed by the search term (case-insensitive
    /// substring).
    pub fn visible(&self) -> Vec<&Behavior> {
        let needle = self.search.to_lowercase();
        self.items
            .iter()
            .filter(|b| needle.is_empty() || b.text.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn apply(&mut self, action: ExploreAction) -> Option<Fetch> {
        match action {
            ExploreAction::SetFilter(filter) => {
                if filter == self.filter && self.phase != Phase::Idle {
                    return None;
                }
                self.filter = filter;
                Some(self.restart())
            }
            ExploreAction::Refresh => Some(self.restart()),
            ExploreAction::LoadMore => self.load_more(),
            ExploreAction::SetSearch(term) => {
                self.search = term;
                None
            }
            ExploreAction::BatchLoaded { generation, items } => {
                if generation != self.generation || self.phase != Phase::Loading {
                    return None;
                }
                self.batch = items;
                self.pages_shown = 0;
                self.reveal_next_slice();
                None
            }
            ExploreAction::PageLoaded {
                generation,
                items,
                next_cursor,
            } => {
                if generation != self.generation || !self.is_loading() {
                    return None;
                }
                self.has_more = next_cursor.is_some() && items.len() == self.page_size;
                self.cursor = next_cursor;
                self.items.extend(items);
                self.pages_shown += 1;
                self.error = None;
                self.settle();
                None
            }
            ExploreAction::FetchFailed { generation, message } => {
                if generation != self.generation || !self.is_loading() {
                    return None;
                }
                self.error = Some(message);
                // Back to where the user was before the fetch, so they can retry.
                self.phase = match self.phase {
                    Phase::LoadingMore => Phase::Ready,
                    _ => Phase::Idle,
                };
                None
            }
        }
    }

    fn restart(&mut self) -> Fetch {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.items.clear();
        self.batch.clear();
        self.pages_shown = 0;
        self.cursor = None;
        self.has_more = false;
        self.error = None;

        if self.filter.is_cursor_paged() {
            Fetch::Page {
                generation: self.generation,
                page_size: self.page_size,
                cursor: None,
            }
        } else {
            Fetch::Batch {
                generation: self.generation,
                filter: self.filter,
            }
        }
    }

    fn load_more(&mut self) -> Option<Fetch> {
        if self.phase != Phase::Ready || !self.has_more {
            return None;
        }

        if self.filter.is_cursor_paged() {
            self.phase = Phase::LoadingMore;
            Some(Fetch::Page {
                generation: self.generation,
                page_size: self.page_size,
                cursor: self.cursor.clone(),
            })
        } else {
            self.reveal_next_slice();
            None
        }
    }

    fn reveal_next_slice(&mut self) {
        self.pages_shown += 1;
        let end = (self.pages_shown * self.page_size).min(self.batch.len());
        self.items = self.batch[..end].to_vec();
        self.has_more = self.batch.len() > self.pages_shown * self.page_size;
        self.error = None;
        self.settle();
    }

    fn settle(&mut self) {
        self.phase = if self.has_more { Phase::Ready } else { Phase::Exhausted };
    }
}
