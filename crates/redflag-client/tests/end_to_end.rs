use std::sync::Arc;

use redflag_api::{AppState, AppStateInner, router};
use redflag_client::{Client, ExploreDriver, JudgeDriver};
use redflag_core::explore::{ExploreAction, FilterMode, Phase};
use redflag_core::judge::{JudgeAction, JudgePhase};
use redflag_core::{Catalog, CatalogConfig};
use redflag_db::Database;
use redflag_types::VoteCategory;
use tokio::net::TcpListener;
use uuid::Uuid;

const KEY: &str = "end-to-end-moderator-key";

/// Serve a fresh in-memory instance on an ephemeral port.
async fn spawn_server() -> (Client, AppState) {
    let state: AppState = Arc::new(AppStateInner {
        catalog: Catalog::new(Database::open_in_memory().unwrap(), CatalogConfig::default()),
        moderator_key: KEY.to_string(),
    });
    let app = router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Client::new(format!("http://{addr}")), state)
}

async fn seed(client: &Client, count: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let id = client.submit(&format!("Seeded behavior number {i}")).await.unwrap();
        client.approve(id, KEY).await.unwrap();
        ids.push(id);
    }
    ids
}

#[tokio::test]
async fn popular_batch_reveals_twenty_at_a_time() {
    let (client, _state) = spawn_server().await;
    seed(&client, 45).await;

    let mut explore = ExploreDriver::new(client, 20);
    explore.dispatch(ExploreAction::SetFilter(FilterMode::Popular)).await;
    assert_eq!(explore.state().phase(), Phase::Ready);
    assert_eq!(explore.state().loaded().len(), 20);

    explore.dispatch(ExploreAction::LoadMore).await;
    assert_eq!(explore.state().loaded().len(), 40);

    explore.dispatch(ExploreAction::LoadMore).await;
    assert_eq!(explore.state().loaded().len(), 45);
    assert!(!explore.state().has_more());
    assert_eq!(explore.state().phase(), Phase::Exhausted);
}

#[tokio::test]
async fn recent_view_follows_the_cursor() {
    let (client, _state) = spawn_server().await;
    let ids = seed(&client, 5).await;

    let mut explore = ExploreDriver::new(client, 2);
    explore.dispatch(ExploreAction::SetFilter(FilterMode::Recent)).await;
    assert_eq!(explore.state().loaded().len(), 2);
    assert!(explore.state().has_more());

    explore.dispatch(ExploreAction::LoadMore).await;
    explore.dispatch(ExploreAction::LoadMore).await;
    assert_eq!(explore.state().loaded().len(), 5);
    assert!(!explore.state().has_more());

    let mut seen: Vec<Uuid> = explore.state().loaded().iter().map(|b| b.id).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), ids.len());

    // Newest first.
    let loaded = explore.state().loaded();
    assert!(loaded.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn verdict_view_lists_matching_behaviors() {
    let (client, _state) = spawn_server().await;
    let ids = seed(&client, 3).await;
    client.vote(ids[0], VoteCategory::RedFlag).await.unwrap();
    client.vote(ids[1], VoteCategory::GreenFlag).await.unwrap();

    let mut explore = ExploreDriver::new(client, 20);
    explore.dispatch(ExploreAction::SetFilter(FilterMode::RedFlags)).await;
    let loaded: Vec<Uuid> = explore.state().loaded().iter().map(|b| b.id).collect();
    assert_eq!(loaded, vec![ids[0]]);

    // Unvoted behaviors read as neutral.
    explore.dispatch(ExploreAction::SetFilter(FilterMode::Neutral)).await;
    let loaded: Vec<Uuid> = explore.state().loaded().iter().map(|b| b.id).collect();
    assert_eq!(loaded, vec![ids[2]]);
}

#[tokio::test]
async fn approved_and_random_hide_pending_behaviors() {
    let (client, _state) = spawn_server().await;
    let ids = seed(&client, 4).await;
    let pending = client.submit("Never learned your middle name").await.unwrap();

    let approved: Vec<Uuid> = client.approved().await.unwrap().iter().map(|r| r.behavior.id).collect();
    assert_eq!(approved.len(), 4);
    assert!(!approved.contains(&pending));

    let picked = client.random(3).await.unwrap();
    assert_eq!(picked.len(), 3);
    assert!(picked.iter().all(|r| ids.contains(&r.behavior.id)));
}

#[tokio::test]
async fn judging_runs_to_exhaustion_and_starts_over() {
    let (client, _state) = spawn_server().await;
    let ids = seed(&client, 3).await;

    let mut judge = JudgeDriver::new(client.clone());
    judge.dispatch(JudgeAction::Start).await;
    assert_eq!(judge.session().phase(), JudgePhase::Showing);

    for _ in 0..ids.len() {
        assert!(judge.session().can_vote());
        judge.dispatch(JudgeAction::Vote(VoteCategory::GreenFlag)).await;
    }
    assert_eq!(judge.session().phase(), JudgePhase::AllSeen);
    assert_eq!(judge.session().voted().len(), 3);
    assert!(judge.session().error().is_none());

    for id in &ids {
        let behavior = client.get(*id).await.unwrap();
        assert_eq!(behavior.behavior.votes.green_flag, 1);
        assert_eq!(behavior.aggregate.majority.category, VoteCategory::GreenFlag);
    }

    judge.dispatch(JudgeAction::StartOver).await;
    assert_eq!(judge.session().phase(), JudgePhase::Showing);
    assert!(judge.session().voted().is_empty());
}

#[tokio::test]
async fn errors_carry_status_and_message() {
    let (client, _state) = spawn_server().await;

    let err = client.submit("short").await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(err.user_message().contains("10"));

    let err = client.get(Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());

    let pending = client.submit("Leaves every group chat on read").await.unwrap();
    assert!(client.get(pending).await.unwrap_err().is_not_found());
    assert!(client.approve(pending, "wrong-key").await.is_err());
}

#[tokio::test]
async fn unreachable_server_leaves_explore_retryable() {
    let mut explore = ExploreDriver::new(Client::new("http://127.0.0.1:1"), 20);
    explore.dispatch(ExploreAction::SetFilter(FilterMode::Popular)).await;

    assert_eq!(explore.state().phase(), Phase::Idle);
    assert!(explore.state().error().is_some());
    assert!(explore.state().loaded().is_empty());

    let mut judge = JudgeDriver::new(Client::new("http://127.0.0.1:1"));
    judge.dispatch(JudgeAction::Start).await;
    assert_eq!(judge.session().phase(), JudgePhase::Idle);
    assert!(judge.session().error().is_some());
}
