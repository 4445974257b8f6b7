use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async locks, one per session id.
///
/// A handler acquires the session's lock before its read-LLM-write sequence
/// and holds it (across the await on the provider) until the write-back is
/// done. Overlapping requests against the same id are serialized; requests
/// against different ids proceed independently.
#[derive(Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `id`, creating it on first use.
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops every entry whose id is not in `live` and has no holder.
    ///
    /// `acquire` creates an entry for any id it is asked about, including ids
    /// that never become sessions (unknown-session lookups, failed starts),
    /// so the table must be reconciled against the set of stored sessions or
    /// it grows for the life of the process. An in-flight holder keeps its
    /// guard alive through the Arc and its entry is skipped.
    pub async fn prune_orphans(&self, live: &HashSet<String>) {
        self.locks
            .lock()
            .await
            .retain(|id, lock| live.contains(id) || Arc::strong_count(lock) > 1);
    }

    /// Number of entries currently in the table.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Returns `true` if the table holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_exclusive() {
        let locks = Arc::new(SessionLocks::new());
        let counter = Arc::new(Mutex::new(0u32));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("s1").await;
                // A racing task would observe the intermediate value.
                let value = *counter.lock().await;
                tokio::time::sleep(Duration::from_millis(2)).await;
                *counter.lock().await = value + 1;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*counter.lock().await, 8);
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block_each_other() {
        let locks = SessionLocks::new();
        let _a = locks.acquire("a").await;
        // Must not deadlock.
        let _b = locks.acquire("b").await;
    }

    #[tokio::test]
    async fn test_prune_reclaims_entries_for_ids_without_sessions() {
        let locks = SessionLocks::new();
        for i in 0..1000 {
            drop(locks.acquire(&format!("ghost-{i}")).await);
        }
        assert_eq!(locks.len().await, 1000);

        locks.prune_orphans(&HashSet::new()).await;
        assert!(locks.is_empty().await);
    }

    #[tokio::test]
    async fn test_prune_keeps_live_and_held_entries() {
        let locks = SessionLocks::new();
        drop(locks.acquire("stored").await);
        drop(locks.acquire("ghost").await);
        let _held = locks.acquire("in-flight").await;

        let live = HashSet::from(["stored".to_string()]);
        locks.prune_orphans(&live).await;

        assert_eq!(locks.len().await, 2); // "stored" and "in-flight" survive
    }
}
