use redflag_core::explore::{ExploreAction, ExploreState, Fetch, FilterMode};
use redflag_types::api::BehaviorResponse;
use tracing::warn;

use crate::Client;

/// Batch views ask for this many and let the server's ranking window cap it.
const BATCH_LIMIT: usize = 100;

/// Runs [`ExploreState`] against the HTTP API: applies an action, performs
/// the fetch it asks for, and feeds the result back in.
pub struct ExploreDriver {
    client: Client,
    state: ExploreState,
}

impl ExploreDriver {
    pub fn new(client: Client, page_size: usize) -> Self {
        Self {
            client,
            state: ExploreState::new(page_size),
        }
    }

    pub fn state(&self) -> &ExploreState {
        &self.state
    }

    pub async fn dispatch(&mut self, action: ExploreAction) {
        if let Some(fetch) = self.state.apply(action) {
            let outcome = self.run(fetch).await;
            self.state.apply(outcome);
        }
    }

    async fn run(&self, fetch: Fetch) -> ExploreAction {
        match fetch {
            Fetch::Batch { generation, filter } => {
                let result = match filter.verdict() {
                    Some(category) => self.client.by_verdict(category).await,
                    None => self.client.popular(BATCH_LIMIT).await,
                };
                match result {
                    Ok(items) => ExploreAction::BatchLoaded {
                        generation,
                        items: unwrap_all(items),
                    },
                    Err(e) => {
                        warn!("Loading {:?} failed: {}", filter, e);
                        ExploreAction::FetchFailed {
                            generation,
                            message: e.user_message(),
                        }
                    }
                }
            }
            Fetch::Page {
                generation,
                page_size,
                cursor,
            } => match self.client.recent(page_size, cursor.as_deref()).await {
                Ok(page) => ExploreAction::PageLoaded {
                    generation,
                    items: unwrap_all(page.items),
                    next_cursor: page.next_cursor,
                },
                Err(e) => {
                    warn!("Loading {:?} page failed: {}", FilterMode::Recent, e);
                    ExploreAction::FetchFailed {
                        generation,
                        message: e.user_message(),
                    }
                }
            },
        }
    }
}

fn unwrap_all(items: Vec<BehaviorResponse>) -> Vec<redflag_types::Behavior> {
    items.into_iter().map(|r| r.behavior).collect()
}
