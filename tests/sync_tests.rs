//! End-to-end behavior of the offline queue: immediate execution, queueing
//! on failure and ordered replay.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{bill, memory_store, product, ScriptedBackend};
use frontline::config::SyncConfig;
use frontline::features::reset_local_state;
use frontline::features::session::{AuthSession, Role};
use frontline::features::sync::{
    ActionQueue, ActionType, DrainReport, NewAction, OfflineExecutor, QueuedAction, SkipReason,
    SyncMonitor,
};
use frontline::storage::{CacheKey, Database, EntityCache, PersistentStore, SqliteKv};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::{oneshot, watch};

fn monitor_for(store: &PersistentStore, backend: &Arc<ScriptedBackend>) -> SyncMonitor {
    let monitor = SyncMonitor::new(
        ActionQueue::new(store.clone()),
        EntityCache::new(store.clone()),
        SyncConfig::default(),
    );
    monitor.attach_backend(backend.clone());
    monitor
}

#[tokio::test]
async fn replay_is_in_order_and_stops_at_first_failure() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    let monitor = monitor_for(&store, &backend);
    monitor.set_online(true);

    queue.enqueue(NewAction::create_product(&product(1)));
    queue.enqueue(NewAction::delete_customer(42));
    queue.enqueue(NewAction::create_bill(&bill(501, 42)));
    backend.reject("deleteCustomer");

    let report = monitor.process_queue().await;

    assert!(!report.is_clean());
    assert_eq!(backend.applied(), vec!["createProduct:1"]);
    let remaining: Vec<ActionType> = queue.get_queue().into_iter().map(|q| q.action_type).collect();
    assert_eq!(remaining, vec![ActionType::DeleteCustomer, ActionType::CreateBill]);
    assert_eq!(queue.oldest().unwrap().retry_count, 1);

    backend.accept("deleteCustomer");
    let report = monitor.retry().await;

    assert_eq!(
        report,
        DrainReport::Completed {
            synced: 2,
            skipped_unknown: 0,
            failed: None
        }
    );
    assert_eq!(
        backend.applied(),
        vec!["createProduct:1", "deleteCustomer:42", "createBill:501"]
    );
    assert!(queue.is_empty());
}

#[tokio::test]
async fn failed_delete_leaves_only_that_action_queued() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let cache = EntityCache::new(store.clone());
    let backend = ScriptedBackend::new();
    let monitor = monitor_for(&store, &backend);
    monitor.set_online(true);

    queue.enqueue(NewAction::create_product(&product(1)));
    queue.enqueue(NewAction::delete_customer(42));
    cache.put(CacheKey::Customers, vec![42]);
    backend.reject("deleteCustomer");

    monitor.process_queue().await;

    let remaining = queue.get_queue();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].action_type, ActionType::DeleteCustomer);
    assert_eq!(remaining[0].payload, Value::from(42));

    let status = monitor.status();
    assert_eq!(status.last_error.as_deref(), Some("Failed to sync deleteCustomer"));
    assert_eq!(status.pending_count, 1);
    assert!(cache.get::<Vec<u64>>(CacheKey::Customers).is_none());
}

#[tokio::test(start_paused = true)]
async fn concurrent_drains_apply_each_action_once() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    backend.set_delay(Duration::from_millis(50));
    let monitor = monitor_for(&store, &backend);
    monitor.set_online(true);

    for id in 1..=3 {
        queue.enqueue(NewAction::delete_product(id));
    }

    let (first, second) = tokio::join!(monitor.process_queue(), monitor.process_queue());

    assert_eq!(
        first,
        DrainReport::Completed {
            synced: 3,
            skipped_unknown: 0,
            failed: None
        }
    );
    assert_eq!(second, DrainReport::Skipped(SkipReason::AlreadyRunning));
    assert_eq!(backend.attempts(), 3);
    assert!(queue.is_empty());
    assert!(!monitor.status().is_syncing);
}

#[tokio::test]
async fn immediate_success_is_never_replayed() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    let executor = OfflineExecutor::new(queue.clone());
    let monitor = monitor_for(&store, &backend);
    monitor.set_online(true);

    executor
        .submit(backend.as_ref(), NewAction::create_bill(&bill(7, 1)))
        .await
        .unwrap();

    assert!(queue.is_empty());
    assert_eq!(monitor.process_queue().await, DrainReport::Empty);
    assert_eq!(backend.applied(), vec!["createBill:7"]);
}

#[tokio::test]
async fn unknown_types_are_dropped_without_halting() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    let monitor = monitor_for(&store, &backend);
    monitor.set_online(true);

    let first = queue.enqueue(NewAction::delete_bill(1));
    let mut actions = queue.get_queue();
    actions.push(QueuedAction {
        id: format!("{}_zzzzzzzzz", first.timestamp),
        action_type: ActionType::Unknown("archiveBill".to_string()),
        payload: Value::from(2),
        timestamp: first.timestamp,
        retry_count: 0,
    });
    queue.set_queue(&actions);
    queue.enqueue(NewAction::delete_bill(3));

    let report = monitor.process_queue().await;

    assert_eq!(
        report,
        DrainReport::Completed {
            synced: 2,
            skipped_unknown: 1,
            failed: None
        }
    );
    assert_eq!(backend.applied(), vec!["deleteBill:1", "deleteBill:3"]);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn undecodable_payload_halts_the_drain() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    let monitor = monitor_for(&store, &backend);
    monitor.set_online(true);

    queue.enqueue(NewAction::new(ActionType::CreateBill, serde_json::json!({"id": "x"})));
    queue.enqueue(NewAction::delete_bill(3));

    let report = monitor.process_queue().await;

    let DrainReport::Completed { synced, failed, .. } = report else {
        panic!("expected a completed drain, got {report:?}");
    };
    assert_eq!(synced, 0);
    assert_eq!(failed.unwrap().action_type, ActionType::CreateBill);
    assert_eq!(backend.attempts(), 0);
    assert_eq!(queue.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn offline_bill_is_replayed_after_reconnect() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    let executor = OfflineExecutor::new(queue.clone());

    backend.set_offline(true);
    let err = executor
        .submit(backend.as_ref(), NewAction::create_bill(&bill(501, 42)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "network error: network error");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.oldest().unwrap().payload["customerId"], 42);

    backend.set_offline(false);
    let monitor = Arc::new(monitor_for(&store, &backend));
    let (online_tx, online_rx) = watch::channel(false);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let running = monitor.clone();
    let handle = tokio::spawn(async move {
        running
            .run(online_rx, async {
                let _ = stop_rx.await;
            })
            .await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(backend.applied().is_empty());
    assert_eq!(monitor.status().pending_count, 1);

    online_tx.send(true).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(backend.applied(), vec!["createBill:501"]);
    assert!(queue.is_empty());
    let status = monitor.status();
    assert!(status.is_online);
    assert_eq!(status.pending_count, 0);
    assert!(status.last_error.is_none());

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn attaching_a_backend_while_online_drains() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    queue.enqueue(NewAction::delete_expense(9));

    let monitor = Arc::new(SyncMonitor::new(
        queue.clone(),
        EntityCache::new(store.clone()),
        SyncConfig::default(),
    ));
    let (_online_tx, online_rx) = watch::channel(true);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let running = monitor.clone();
    let handle = tokio::spawn(async move {
        running
            .run(online_rx, async {
                let _ = stop_rx.await;
            })
            .await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.len(), 1);

    monitor.attach_backend(backend.clone());
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(backend.applied(), vec!["deleteExpense:9"]);
    assert!(queue.is_empty());

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reconnect_waits_out_the_debounce_and_ignores_flaps() {
    let store = memory_store();
    let queue = ActionQueue::new(store.clone());
    let backend = ScriptedBackend::new();
    queue.enqueue(NewAction::delete_customer(42));

    let monitor = Arc::new(monitor_for(&store, &backend));
    let (online_tx, online_rx) = watch::channel(false);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let running = monitor.clone();
    let handle = tokio::spawn(async move {
        running
            .run(online_rx, async {
                let _ = stop_rx.await;
            })
            .await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Back offline before the debounce elapses: nothing is replayed.
    online_tx.send(true).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    online_tx.send(false).unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    assert!(backend.applied().is_empty());
    assert_eq!(queue.len(), 1);
    assert!(!monitor.status().is_online);

    // A stable reconnect drains only once the debounce has passed.
    online_tx.send(true).unwrap();
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(backend.applied().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(backend.applied(), vec!["deleteCustomer:42"]);
    assert!(queue.is_empty());

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn poll_tick_picks_up_actions_queued_elsewhere() {
    let store = memory_store();
    let monitor = Arc::new(SyncMonitor::new(
        ActionQueue::new(store.clone()),
        EntityCache::new(store.clone()),
        SyncConfig::default(),
    ));
    let (_online_tx, online_rx) = watch::channel(false);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let running = monitor.clone();
    let handle = tokio::spawn(async move {
        running
            .run(online_rx, async {
                let _ = stop_rx.await;
            })
            .await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    ActionQueue::new(store.clone()).enqueue(NewAction::delete_bill(5));
    tokio::time::sleep(Duration::from_millis(90)).await;
    assert_eq!(monitor.status().pending_count, 0);

    tokio::time::sleep(SyncConfig::default().pending_poll_interval()).await;
    assert_eq!(monitor.status().pending_count, 1);

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}

#[test]
fn queue_and_reset_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frontline.db");
    let open = || {
        PersistentStore::new(Arc::new(SqliteKv::new(Database::open_at(&path).unwrap())))
    };

    let store = open();
    ActionQueue::new(store.clone()).enqueue(NewAction::delete_bill(1));
    AuthSession::restore(store.clone()).login(Role::Salesman);
    drop(store);

    let store = open();
    assert_eq!(ActionQueue::new(store.clone()).len(), 1);
    assert_eq!(AuthSession::restore(store.clone()).role(), Some(Role::Salesman));

    reset_local_state(&store);
    reset_local_state(&store);
    drop(store);

    let store = open();
    assert!(ActionQueue::new(store.clone()).is_empty());
    assert!(!AuthSession::restore(store.clone()).is_authenticated());
    assert!(store.keys().is_empty());
}
