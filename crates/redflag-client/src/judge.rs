use redflag_core::Selection;
use redflag_core::judge::{JudgeAction, JudgeEffect, JudgeSession};
use redflag_types::api::NextUnseenResponse;
use tracing::warn;

use crate::Client;

/// Runs a [`JudgeSession`] against the HTTP API. A vote's increment and the
/// fetch of the next behavior go out together.
pub struct JudgeDriver {
    client: Client,
    session: JudgeSession,
}

impl JudgeDriver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            session: JudgeSession::new(),
        }
    }

    pub fn session(&self) -> &JudgeSession {
        &self.session
    }

    pub async fn dispatch(&mut self, action: JudgeAction) {
        let mut increment = None;
        let mut fetch = None;
        for effect in self.session.apply(action) {
            match effect {
                JudgeEffect::Increment { id, category } => increment = Some((id, category)),
                JudgeEffect::FetchNext { generation, exclude } => fetch = Some((generation, exclude)),
            }
        }

        let client = &self.client;
        let vote = async {
            match increment {
                Some((id, category)) => Some((id, client.vote(id, category).await)),
                None => None,
            }
        };
        let next = async {
            match fetch {
                Some((generation, exclude)) => Some((generation, client.next_unseen(&exclude).await)),
                None => None,
            }
        };
        let (vote, next) = tokio::join!(vote, next);

        if let Some((id, Err(e))) = vote {
            self.session.apply(JudgeAction::VoteFailed {
                id,
                message: e.user_message(),
            });
        }

        if let Some((generation, result)) = next {
            let action = match result {
                Ok(NextUnseenResponse::Next { behavior }) => JudgeAction::NextLoaded {
                    generation,
                    selection: Selection::Next(behavior.behavior),
                },
                Ok(NextUnseenResponse::Exhausted) => JudgeAction::NextLoaded {
                    generation,
                    selection: Selection::Exhausted,
                },
                Err(e) => {
                    warn!("Fetching the next behavior failed: {}", e);
                    JudgeAction::NextFailed {
                        generation,
                        message: e.user_message(),
                    }
                }
            };
            self.session.apply(action);
        }
    }
}
