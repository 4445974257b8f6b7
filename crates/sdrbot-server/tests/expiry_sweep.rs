//! Tests for the background session-expiry sweep.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, Utc};
use sdrbot_server::spawn_expiry_sweep;
use sdrbot_session::{MemorySessionStore, Session, SessionLocks, SessionStore};
use std::sync::Arc;

#[tokio::test]
async fn test_sweep_expires_stale_sessions_and_reclaims_orphaned_locks() {
    let store = Arc::new(MemorySessionStore::new());
    let locks = Arc::new(SessionLocks::new());

    let mut stale = Session::new("stale");
    stale.updated_at = Utc::now() - Duration::hours(2);
    store.create(stale).await.unwrap();
    store.create(Session::new("fresh")).await.unwrap();

    // Lock entries as the handlers would leave them: one per stored session,
    // plus one for an id that never became a session (a 404 lookup).
    drop(locks.acquire("stale").await);
    drop(locks.acquire("fresh").await);
    drop(locks.acquire("ghost").await);
    assert_eq!(locks.len().await, 3);

    let handle = spawn_expiry_sweep(
        store.clone() as Arc<dyn SessionStore>,
        locks.clone(),
        Duration::hours(1),
        std::time::Duration::from_millis(10),
    );

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    handle.abort();

    // The stale session is gone, the fresh one survives.
    assert!(store.get("stale").await.unwrap().is_none());
    assert!(store.get("fresh").await.unwrap().is_some());

    // The lock table only keeps entries for live sessions.
    assert_eq!(locks.len().await, 1);
}
