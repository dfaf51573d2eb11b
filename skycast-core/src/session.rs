//! Session-scoped location state.
//!
//! One slot, many readers: the resolved location is shared behind an
//! `Arc` and only ever replaced wholesale, so consumers observe either
//! the previous snapshot or the new one, never a half-written value.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::LocationError;
use crate::location::LocationResolver;
use crate::model::UserLocationInfo;

pub struct LocationSession {
    resolver: LocationResolver,
    slot: RwLock<Option<Arc<UserLocationInfo>>>,
}

impl LocationSession {
    pub fn new(resolver: LocationResolver) -> Self {
        Self { resolver, slot: RwLock::new(None) }
    }

    /// The current snapshot, if one has been resolved this session.
    pub fn current(&self) -> Option<Arc<UserLocationInfo>> {
        self.slot.read().clone()
    }

    /// The cached snapshot, resolving on first use.
    pub async fn get_or_resolve(&self) -> Result<Arc<UserLocationInfo>, LocationError> {
        if let Some(current) = self.current() {
            return Ok(current);
        }
        self.refresh().await
    }

    /// Run the resolver again and replace the slot with the new
    /// snapshot.
    pub async fn refresh(&self) -> Result<Arc<UserLocationInfo>, LocationError> {
        let info = Arc::new(self.resolver.resolve().await?);
        *self.slot.write() = Some(Arc::clone(&info));
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::location::LocationStrategy;
    use crate::model::{Coordinates, LocationSource};

    struct CountingStrategy {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LocationStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn locate(&self) -> Result<UserLocationInfo, LocationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserLocationInfo {
                coordinates: Coordinates::new(0.0, call as f64).expect("coords"),
                city: format!("City {call}"),
                country: "Testland".to_string(),
                source: LocationSource::Default,
            })
        }
    }

    fn session(calls: Arc<AtomicUsize>) -> LocationSession {
        LocationSession::new(LocationResolver::from_strategies(vec![Box::new(
            CountingStrategy { calls },
        )]))
    }

    #[tokio::test]
    async fn starts_empty() {
        let session = session(Arc::new(AtomicUsize::new(0)));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn get_or_resolve_caches_the_first_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session(Arc::clone(&calls));

        let first = session.get_or_resolve().await.expect("resolved");
        let second = session.get_or_resolve().await.expect("resolved");

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_replaces_the_snapshot_wholesale() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session(Arc::clone(&calls));

        let first = session.get_or_resolve().await.expect("resolved");
        let refreshed = session.refresh().await.expect("refreshed");

        assert_ne!(first, refreshed);
        assert_eq!(refreshed.city, "City 1");
        assert_eq!(session.current().as_deref(), Some(refreshed.as_ref()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn old_readers_keep_their_snapshot_across_a_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session(Arc::clone(&calls));

        let before = session.get_or_resolve().await.expect("resolved");
        session.refresh().await.expect("refreshed");

        // The earlier Arc still points at the complete old value.
        assert_eq!(before.city, "City 0");
    }
}
