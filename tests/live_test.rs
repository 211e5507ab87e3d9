mod common;

use common::*;
use incubator_watch::config::Config;
use incubator_watch::domain::feed::{EventFeed, FeedConfig};
use incubator_watch::domain::health::HealthBoard;
use incubator_watch::domain::id::EventId;
use incubator_watch::domain::source::Table;
use incubator_watch::services::dashboard::{Dashboard, EMPTY_ACTIVITY, EMPTY_HEALTH_EVENTS};
use incubator_watch::services::live::subscribe;
use std::sync::Arc;
use tokio::sync::RwLock;

fn row(e: &incubator_watch::domain::event::ActivityEvent) -> serde_json::Value {
    serde_json::to_value(e).unwrap()
}

#[tokio::test]
async fn live_rows_reach_the_feed() {
    let notifier = ChannelNotifier::default();
    let feed = Arc::new(RwLock::new(EventFeed::seeded(
        FeedConfig::activity(50),
        vec![event("e5", "idea_created", 5), event("e4", "idea_created", 4)],
    )));

    let sub = subscribe(&notifier, Table::Activity, feed.clone()).await.unwrap();
    assert_eq!(sub.table(), Table::Activity);

    notifier.publish(Table::Activity, row(&event("e6", "idea_created", 6))).await;
    notifier.publish(Table::Activity, row(&event("e7", "idea_created", 7))).await;

    assert!(eventually(|| async { feed.read().await.len() == 4 }).await);
    assert_eq!(ids(feed.read().await.events()), ["e7", "e6", "e5", "e4"]);
    sub.close().await;
}

#[tokio::test]
async fn redelivered_row_is_not_shown_twice() {
    let notifier = ChannelNotifier::default();
    let feed = Arc::new(RwLock::new(EventFeed::new(FeedConfig::activity(50))));
    let sub = subscribe(&notifier, Table::Activity, feed.clone()).await.unwrap();

    let e = event("e1", "idea_created", 1);
    notifier.publish(Table::Activity, row(&e)).await;
    notifier.publish(Table::Activity, row(&e)).await;
    notifier.publish(Table::Activity, row(&event("e2", "idea_created", 2))).await;

    assert!(eventually(|| async { feed.read().await.contains(&EventId::new("e2")) }).await);
    assert_eq!(ids(feed.read().await.events()), ["e2", "e1"]);
    sub.close().await;
}

#[tokio::test]
async fn malformed_payload_is_skipped() {
    let notifier = ChannelNotifier::default();
    let feed = Arc::new(RwLock::new(EventFeed::new(FeedConfig::activity(50))));
    let sub = subscribe(&notifier, Table::Activity, feed.clone()).await.unwrap();

    notifier
        .publish(Table::Activity, serde_json::json!({"id": "bad", "timestamp": "yesterday"}))
        .await;
    notifier.publish(Table::Activity, row(&event("ok", "idea_created", 1))).await;

    assert!(eventually(|| async { feed.read().await.len() == 1 }).await);
    assert!(!feed.read().await.contains(&EventId::new("bad")));
    sub.close().await;
}

#[tokio::test]
async fn closed_subscription_never_mutates_again() {
    let notifier = ChannelNotifier::default();
    let feed = Arc::new(RwLock::new(EventFeed::new(FeedConfig::activity(50))));
    let sub = subscribe(&notifier, Table::Activity, feed.clone()).await.unwrap();

    sub.close().await;

    let delivered = notifier
        .publish(Table::Activity, row(&event("late", "idea_created", 1)))
        .await;
    assert_eq!(delivered, 0);
    assert!(feed.read().await.is_empty());
}

#[tokio::test]
async fn dropped_subscription_releases_its_listener() {
    let notifier = ChannelNotifier::default();
    let board = Arc::new(RwLock::new(HealthBoard::default()));
    let sub = subscribe(&notifier, Table::Health, board.clone()).await.unwrap();
    assert_eq!(notifier.listeners(Table::Health), 1);

    drop(sub);

    assert!(eventually(|| async { notifier.listeners(Table::Health) == 0 }).await);
}

#[tokio::test]
async fn health_board_follows_live_snapshots() {
    let notifier = ChannelNotifier::default();
    let board = Arc::new(RwLock::new(HealthBoard::new(Some(snapshot("h1", 0, 1)))));
    let sub = subscribe(&notifier, Table::Health, board.clone()).await.unwrap();

    notifier
        .publish(Table::Health, serde_json::to_value(snapshot("h0", -10, 0)).unwrap())
        .await;
    notifier
        .publish(Table::Health, serde_json::to_value(snapshot("h2", 10, 2)).unwrap())
        .await;

    assert!(
        eventually(|| async {
            board.read().await.current().map(|s| s.id.clone()) == Some("h2".to_string())
        })
        .await
    );
    sub.close().await;
}

// ── dashboard wiring ───────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_routes_live_events_to_matching_feeds() {
    let source = MemorySource {
        events: vec![
            event("e1", "idea_created", 1),
            event("e2", "health_check", 2),
        ],
        ..MemorySource::default()
    };
    let notifier = ChannelNotifier::default();
    let (dashboard, subs) = Dashboard::start(Arc::new(source), &notifier, Config::default()).await;
    assert_eq!(subs.0.len(), 3);

    notifier
        .publish(Table::Activity, row(&event("e3", "idea_advanced", 3)))
        .await;
    notifier
        .publish(Table::Activity, row(&event("e4", "circuit_breaker_change", 4)))
        .await;

    assert!(
        eventually(|| async { dashboard.activity(at(10)).await.entries.len() == 4 }).await
    );
    assert!(
        eventually(|| async { dashboard.health(at(10)).await.events.entries.len() == 2 }).await
    );

    let health_ids: Vec<_> = dashboard
        .health(at(10))
        .await
        .events
        .entries
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(health_ids, ["e4", "e2"]);

    let activity = dashboard.activity(at(10)).await;
    let ids: Vec<_> = activity.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["e4", "e3", "e2", "e1"]);
    assert_eq!(activity.entries[0].when, "6m ago");

    subs.close().await;
}

#[tokio::test]
async fn dashboard_survives_missing_notifier() {
    let source = MemorySource {
        events: vec![event("e1", "idea_created", 1)],
        ..MemorySource::default()
    };
    let notifier = ChannelNotifier {
        broken: true,
        ..ChannelNotifier::default()
    };
    let (dashboard, subs) = Dashboard::start(Arc::new(source), &notifier, Config::default()).await;

    assert!(subs.0.is_empty());
    assert_eq!(dashboard.activity(at(1)).await.entries.len(), 1);
}

#[tokio::test]
async fn broken_source_renders_empty_states() {
    let source = MemorySource {
        broken: true,
        ..MemorySource::default()
    };
    let dashboard = Dashboard::seed(Arc::new(source), Config::default()).await;

    let activity = dashboard.activity(base()).await;
    assert!(activity.entries.is_empty());
    assert_eq!(activity.empty_message, Some(EMPTY_ACTIVITY));

    let health = dashboard.health(base()).await;
    assert_eq!(health.events.empty_message, Some(EMPTY_HEALTH_EVENTS));
    assert!(health.chart.is_empty());
}
