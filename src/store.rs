//! Last-known-good render state shared between refreshes and readers.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::analyzers::analyzer::refresh;
use crate::analyzers::types::RenderState;
use crate::services::dataset_source::DatasetSource;

/// Holds the most recent successfully computed [`RenderState`].
///
/// A refresh builds a complete new state before swapping it in, so readers
/// never see a partially built result and a failed refresh leaves the
/// previous state in place.
#[derive(Default)]
pub struct RenderStore {
    current: RwLock<Option<Arc<RenderState>>>,
}

impl RenderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state, if any refresh has succeeded yet.
    pub async fn current(&self) -> Option<Arc<RenderState>> {
        self.current.read().await.clone()
    }

    pub async fn refresh(
        &self,
        routes: &dyn DatasetSource,
        delays: &dyn DatasetSource,
    ) -> Result<Arc<RenderState>> {
        match refresh(routes, delays).await {
            Ok(state) => {
                let state = Arc::new(state);
                *self.current.write().await = Some(Arc::clone(&state));
                info!(segments = state.segments.len(), "Render state replaced");
                Ok(state)
            }
            Err(e) => {
                let kept = self.current.read().await.is_some();
                warn!(error = %e, kept_previous = kept, "Refresh failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dataset_source::memory::MemorySource;

    const ROUTE: &str = r#"{"data": {"route": {"id": "r1", "patterns": [
        {"id": "p1", "stops": [
            {"id": "1:1_0", "lat": 1.0, "lon": 1.0, "name": "One"},
            {"id": "1:2_0", "lat": 2.0, "lon": 2.0, "name": "Two"}
        ]}
    ]}}}"#;

    const DELAYS: &str = r#"{"route_info": {"start_station": "1", "end_station": "2"},
        "routes": [{"route_segments": [{"departure_delay": 7}]}]}"#;

    #[tokio::test]
    async fn test_empty_until_first_refresh() {
        let store = RenderStore::new();
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_state() {
        let store = RenderStore::new();
        let routes = MemorySource::new(&[("r.json", ROUTE)]);
        let delays = MemorySource::new(&[("d.json", DELAYS)]);

        let state = store.refresh(&routes, &delays).await.unwrap();

        assert_eq!(state.segments.len(), 1);
        assert_eq!(store.current().await.unwrap().segments.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_known_good() {
        let store = RenderStore::new();
        let routes = MemorySource::new(&[("r.json", ROUTE)]);
        let delays = MemorySource::new(&[("d.json", DELAYS)]);
        store.refresh(&routes, &delays).await.unwrap();

        let result = store.refresh(&routes, &MemorySource::failing()).await;

        assert!(result.is_err());
        let kept = store.current().await.unwrap();
        assert_eq!(kept.segments.len(), 1);
        assert_eq!(kept.segments[0].max_delay, 7);
    }
}
