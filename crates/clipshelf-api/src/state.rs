//! Application state.
//!
//! All collaborators are behind traits (`VideoRepository`, `ObjectStorage`,
//! `MediaProbe`, `Remuxer`) so the state can be assembled with in-memory
//! fakes in tests.

use clipshelf_core::Config;
use clipshelf_db::VideoRepository;
use clipshelf_processing::{MediaProbe, Remuxer};
use clipshelf_storage::{LocalAssetStore, ObjectStorage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub assets: Arc<LocalAssetStore>,
    pub prober: Arc<dyn MediaProbe>,
    pub remuxer: Arc<dyn Remuxer>,
    pub update_locks: UpdateLocks,
}

impl AppState {
    pub fn signed_url_expiry(&self) -> Duration {
        Duration::from_secs(self.config.signed_url_expiry_secs)
    }
}

/// Per-video serialization of media updates.
///
/// Two concurrent uploads against the same record would otherwise race on the
/// URL columns and orphan one of the stored objects. Locks are keyed by video
/// id; the map entry persists for the life of the process, which is bounded
/// by the number of distinct videos touched.
#[derive(Clone, Default)]
pub struct UpdateLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl UpdateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `id`, waiting if another update holds it.
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serializes_same_video_updates() {
        let locks = UpdateLocks::new();
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        let contended = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        // The second acquire must block until the first guard drops.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contended.is_finished());

        drop(guard);
        contended.await.expect("contended task");
    }

    #[tokio::test]
    async fn distinct_videos_do_not_contend() {
        let locks = UpdateLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        // Acquiring a different id must not block.
        let _b = locks.acquire(Uuid::new_v4()).await;
    }
}
