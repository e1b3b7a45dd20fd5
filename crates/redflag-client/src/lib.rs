//! HTTP client for the red flag service, plus drivers that run the explore
//! and judge state machines against it.

pub mod error;
pub mod explore;
pub mod judge;

use reqwest::Response;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use redflag_types::VoteCategory;
use redflag_types::api::{
    BehaviorResponse, CastVoteRequest, ErrorResponse, NextUnseenRequest, NextUnseenResponse, PageResponse,
    SubmitBehaviorRequest, SubmitBehaviorResponse,
};

pub use error::{Error, Result};
pub use explore::ExploreDriver;
pub use judge::JudgeDriver;

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn recent(&self, limit: usize, cursor: Option<&str>) -> Result<PageResponse> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        let resp = self.http.get(self.url("/traits/recent")).query(&query).send().await?;
        json(resp).await
    }

    pub async fn popular(&self, limit: usize) -> Result<Vec<BehaviorResponse>> {
        let resp = self
            .http
            .get(self.url("/traits/popular"))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        json(resp).await
    }

    pub async fn approved(&self) -> Result<Vec<BehaviorResponse>> {
        let resp = self.http.get(self.url("/traits/approved")).send().await?;
        json(resp).await
    }

    pub async fn by_verdict(&self, category: VoteCategory) -> Result<Vec<BehaviorResponse>> {
        let resp = self.http.get(self.url(&format!("/traits/verdict/{category}"))).send().await?;
        json(resp).await
    }

    pub async fn random(&self, count: usize) -> Result<Vec<BehaviorResponse>> {
        let resp = self
            .http
            .get(self.url("/traits/random"))
            .query(&[("count", count.to_string())])
            .send()
            .await?;
        json(resp).await
    }

    pub async fn get(&self, id: Uuid) -> Result<BehaviorResponse> {
        let resp = self.http.get(self.url(&format!("/traits/{id}"))).send().await?;
        json(resp).await
    }

    pub async fn submit(&self, text: &str) -> Result<Uuid> {
        let resp = self
            .http
            .post(self.url("/traits"))
            .json(&SubmitBehaviorRequest { text: text.to_string() })
            .send()
            .await?;
        let created: SubmitBehaviorResponse = json(resp).await?;
        Ok(created.id)
    }

    pub async fn vote(&self, id: Uuid, category: VoteCategory) -> Result<()> {
        let resp = self
            .http
            .post(self.url(&format!("/traits/{id}/votes")))
            .json(&CastVoteRequest { category })
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn next_unseen(&self, exclude: &[Uuid]) -> Result<NextUnseenResponse> {
        let resp = self
            .http
            .post(self.url("/judge/next"))
            .json(&NextUnseenRequest { exclude: exclude.to_vec() })
            .send()
            .await?;
        json(resp).await
    }

    pub async fn approve(&self, id: Uuid, moderator_key: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url(&format!("/moderation/traits/{id}/approve")))
            .bearer_auth(moderator_key)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(Error::Api { status, message })
}

async fn json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    Ok(check(resp).await?.json().await?)
}
