//! Checklist service integration tests: local-first writes, best-effort
//! push, and remote pull reconciliation against a mock gateway.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rehoboam_core::AdoptionStatus;
use rehoboam_node::{ChecklistService, GatewayHandle, MemoryNotifier, Severity};
use rehoboam_store::{KvStore, StateStore};
use rehoboam_sync::{GatewayClient, GatewayConfig};

fn kv() -> Arc<KvStore> {
    Arc::new(KvStore::open_in_memory().unwrap())
}

fn gateway_for(server: &MockServer) -> GatewayHandle {
    GatewayHandle {
        client: GatewayClient::new(GatewayConfig::new(server.uri(), "anon")).unwrap(),
        user_id: "local-test".to_string(),
    }
}

#[tokio::test]
async fn set_status_writes_locally_and_flushes_the_outbox() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tech_tree_states"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let kv = kv();
    let notifier = Arc::new(MemoryNotifier::new());
    let service = ChecklistService::new(
        StateStore::new(Arc::clone(&kv)),
        Some(gateway_for(&server)),
        notifier.clone(),
    );

    service
        .set_status("IND-AI-01", AdoptionStatus::Pilot, 2027, 0)
        .await
        .unwrap();

    // Write resolved locally and the outbox drained.
    assert_eq!(
        service.status_of("IND-AI-01", 2027, 0).unwrap(),
        AdoptionStatus::Pilot
    );
    assert!(StateStore::new(kv).pending().unwrap().is_empty());
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn failed_push_keeps_the_write_and_queues_the_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tech_tree_states"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let kv = kv();
    let notifier = Arc::new(MemoryNotifier::new());
    let service = ChecklistService::new(
        StateStore::new(Arc::clone(&kv)),
        Some(gateway_for(&server)),
        notifier.clone(),
    );

    service
        .set_status("IND-AI-01", AdoptionStatus::Pilot, 2027, 0)
        .await
        .unwrap();

    // The local write never rolls back.
    assert_eq!(
        service.status_of("IND-AI-01", 2027, 0).unwrap(),
        AdoptionStatus::Pilot
    );

    // The record stays queued and the failure surfaced once.
    assert_eq!(StateStore::new(Arc::clone(&kv)).pending().unwrap().len(), 1);
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
    assert_eq!(notices[0].summary, "Failed to store selection");
}

#[tokio::test]
async fn queued_records_flush_on_the_next_healthy_push() {
    // First session: gateway down, write stays queued.
    let down = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tech_tree_states"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&down)
        .await;

    let kv = kv();
    let service = ChecklistService::new(
        StateStore::new(Arc::clone(&kv)),
        Some(gateway_for(&down)),
        Arc::new(MemoryNotifier::new()),
    );
    service
        .set_status("IND-AI-01", AdoptionStatus::Pilot, 2027, 0)
        .await
        .unwrap();

    // Second session: gateway healthy, flush drains the queue.
    let up = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tech_tree_states"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&up)
        .await;

    let service = ChecklistService::new(
        StateStore::new(Arc::clone(&kv)),
        Some(gateway_for(&up)),
        Arc::new(MemoryNotifier::new()),
    );
    service.flush_pending().await.unwrap();

    assert!(StateStore::new(kv).pending().unwrap().is_empty());
}

#[tokio::test]
async fn pull_merges_remote_records_by_recency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tech_tree_states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "node_id": "IND-AI-01",
                "status": "mass-market",
                "effective_year": 2030,
                "effective_month": 0,
                "updated_at": "2026-05-01T00:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let service = ChecklistService::new(
        StateStore::new(kv()),
        Some(gateway_for(&server)),
        Arc::new(MemoryNotifier::new()),
    );

    service.pull_remote().await.unwrap();

    assert_eq!(
        service.status_of("IND-AI-01", 2031, 0).unwrap(),
        AdoptionStatus::MassMarket
    );
    // Before the remote record's effective month nothing applies.
    assert_eq!(
        service.status_of("IND-AI-01", 2029, 0).unwrap(),
        AdoptionStatus::NotStarted
    );
}

#[tokio::test]
async fn pull_failure_leaves_local_state_and_surfaces_a_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tech_tree_states"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PGRST205",
            "message": "table missing"
        })))
        .mount(&server)
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let service = ChecklistService::new(
        StateStore::new(kv()),
        Some(gateway_for(&server)),
        notifier.clone(),
    );

    service.pull_remote().await.unwrap();

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    // The missing-table code maps to its actionable setup hint.
    assert!(notices[0]
        .detail
        .as_deref()
        .unwrap()
        .contains("tech_tree_states table"));
}

#[tokio::test]
async fn local_only_mode_warns_once_and_keeps_the_queue() {
    let kv = kv();
    let notifier = Arc::new(MemoryNotifier::new());
    let service = ChecklistService::new(
        StateStore::new(Arc::clone(&kv)),
        None,
        notifier.clone(),
    );

    service
        .set_status("IND-AI-01", AdoptionStatus::Pilot, 2027, 0)
        .await
        .unwrap();
    service
        .set_status("IND-AI-02", AdoptionStatus::RAndD, 2027, 0)
        .await
        .unwrap();

    // One info notice for the first write only.
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);

    // Both writes wait in the outbox for a future gateway.
    assert_eq!(StateStore::new(kv).pending().unwrap().len(), 2);
}

#[tokio::test]
async fn completion_stats_track_resolved_statuses() {
    let service = ChecklistService::new(
        StateStore::new(kv()),
        None,
        Arc::new(MemoryNotifier::new()),
    );

    let before = service.stats(2027, 0).unwrap();
    assert_eq!(before.completed, 0);
    assert_eq!(before.percentage, 0);
    assert!(before.total > 0);

    service
        .set_status("IND-AI-01", AdoptionStatus::Pilot, 2027, 0)
        .await
        .unwrap();

    let after = service.stats(2027, 0).unwrap();
    assert_eq!(after.completed, 1);
    assert_eq!(after.total, before.total);
}
