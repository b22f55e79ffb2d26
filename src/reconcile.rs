//! One reconciliation pass against a single connector.
//!
//! The pass runs `get_proxies`, `create_proxies`, `start_proxies` and then
//! `remove_proxies`, in that order. It keeps nothing between runs: a pass
//! interrupted half-way is recovered by running a fresh one with the
//! caller's tracked keys.

use crate::connector::Connector;
use crate::error::Result;
use crate::proxy::{ProxyKeyToRemove, ProxyRefreshed};

use log::{debug, info};
use std::collections::HashSet;

/// What the caller wants from one pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    /// Every key the caller tracks for this connector, alive or not.
    pub tracked_keys: HashSet<String>,
    /// Number of live proxies wanted once the pass completes.
    pub target: usize,
    /// Keys to drop, forced ones also get their IP rotated.
    pub remove: Vec<ProxyKeyToRemove>,
}

/// Result of one pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Tracked proxies still alive and not removed.
    pub alive: Vec<ProxyRefreshed>,
    /// Proxies added to reach the target.
    pub created: Vec<ProxyRefreshed>,
    /// Keys acknowledged as removed.
    pub removed: Vec<String>,
}

impl ReconcileOutcome {
    /// Keys the caller should track after this pass.
    pub fn keys(&self) -> HashSet<String> {
        self.alive
            .iter()
            .chain(self.created.iter())
            .map(|p| p.key.clone())
            .collect()
    }
}

/// Drive `connector` toward `plan.target` live proxies.
///
/// Errors from any step are returned unchanged; later steps are skipped.
pub async fn reconcile(connector: &dyn Connector, plan: &ReconcilePlan) -> Result<ReconcileOutcome> {
    let kind = connector.connector_type();
    let removing: HashSet<&str> = plan.remove.iter().map(|k| k.key.as_str()).collect();

    let mut alive = connector.get_proxies(&plan.tracked_keys).await?;
    alive.retain(|p| !removing.contains(p.key.as_str()));
    debug!(
        "{}: {} of {} tracked proxies alive",
        kind,
        alive.len(),
        plan.tracked_keys.len()
    );

    let deficit = plan.target.saturating_sub(alive.len());
    let created = if deficit > 0 {
        let mut known = plan.tracked_keys.clone();
        known.extend(removing.iter().map(|k| k.to_string()));
        connector.create_proxies(deficit, &known).await?
    } else {
        Vec::new()
    };

    if !created.is_empty() {
        let new_keys: Vec<String> = created.iter().map(|p| p.key.clone()).collect();
        connector.start_proxies(&new_keys).await?;
    }

    let removed = if plan.remove.is_empty() {
        Vec::new()
    } else {
        connector.remove_proxies(&plan.remove).await?
    };

    info!(
        "{}: reconciled {} alive, {} created, {} removed (target {})",
        kind,
        alive.len(),
        created.len(),
        removed.len(),
        plan.target
    );

    Ok(ReconcileOutcome {
        alive,
        created,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::{ConnectorDescriptor, ConnectorGroup};
    use crate::error::ConnectorError;
    use crate::proxy::ProxyTransport;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Fixed pool that records every call it receives.
    struct RecordingPool {
        pool: Vec<&'static str>,
        fail_remove: bool,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingPool {
        fn new(pool: Vec<&'static str>) -> Self {
            Self {
                pool,
                fail_remove: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, proxy: &str) -> ProxyRefreshed {
            ProxyRefreshed::started("recording", proxy, proxy, ProxyTransport::Empty)
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Connector for RecordingPool {
        fn connector_type(&self) -> &'static str {
            "recording"
        }

        fn descriptor(&self) -> ConnectorDescriptor {
            ConnectorDescriptor {
                name: "Recording",
                description: "test pool",
                url: "https://example.com",
                group: ConnectorGroup::Other,
                can_install: false,
                can_uninstall: false,
                can_replace_proxy: true,
                use_certificate: false,
            }
        }

        async fn get_proxies(&self, keys: &HashSet<String>) -> Result<Vec<ProxyRefreshed>> {
            self.calls.lock().push("get".into());
            Ok(self
                .pool
                .iter()
                .filter(|p| keys.contains(**p))
                .map(|p| self.record(p))
                .collect())
        }

        async fn create_proxies(
            &self,
            count: usize,
            exclude_keys: &HashSet<String>,
        ) -> Result<Vec<ProxyRefreshed>> {
            self.calls.lock().push(format!("create {}", count));
            Ok(self
                .pool
                .iter()
                .filter(|p| !exclude_keys.contains(**p))
                .take(count)
                .map(|p| self.record(p))
                .collect())
        }

        async fn start_proxies(&self, keys: &[String]) -> Result<()> {
            self.calls.lock().push(format!("start {}", keys.join(",")));
            Ok(())
        }

        async fn remove_proxies(&self, keys: &[ProxyKeyToRemove]) -> Result<Vec<String>> {
            self.calls.lock().push("remove".into());
            if self.fail_remove {
                return Err(ConnectorError::ProviderUnreachable("timeout".into()));
            }
            Ok(keys.iter().map(|k| k.key.clone()).collect())
        }
    }

    fn tracked(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[tokio::test]
    async fn test_tops_up_missing_proxies() {
        let pool = RecordingPool::new(vec!["a", "b", "c", "d"]);
        let plan = ReconcilePlan {
            tracked_keys: tracked(&["a", "gone"]),
            target: 3,
            remove: Vec::new(),
        };

        let outcome = reconcile(&pool, &plan).await.unwrap();

        assert_eq!(outcome.alive.len(), 1);
        let created: Vec<&str> = outcome.created.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(created, vec!["b", "c"]);
        assert_eq!(outcome.keys(), tracked(&["a", "b", "c"]));
        assert_eq!(pool.calls(), vec!["get", "create 2", "start b,c"]);
    }

    #[tokio::test]
    async fn test_nothing_to_do_when_target_met() {
        let pool = RecordingPool::new(vec!["a", "b"]);
        let plan = ReconcilePlan {
            tracked_keys: tracked(&["a", "b"]),
            target: 2,
            remove: Vec::new(),
        };

        let outcome = reconcile(&pool, &plan).await.unwrap();

        assert!(outcome.created.is_empty());
        assert!(outcome.removed.is_empty());
        assert_eq!(pool.calls(), vec!["get"]);
    }

    #[tokio::test]
    async fn test_forced_removal_is_replaced_with_fresh_key() {
        let pool = RecordingPool::new(vec!["a", "b", "c"]);
        let plan = ReconcilePlan {
            tracked_keys: tracked(&["a", "b"]),
            target: 2,
            remove: vec![ProxyKeyToRemove::forced("a")],
        };

        let outcome = reconcile(&pool, &plan).await.unwrap();

        let alive: Vec<&str> = outcome.alive.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(alive, vec!["b"]);
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].key, "c");
        assert_eq!(outcome.removed, vec!["a".to_string()]);
        assert_eq!(pool.calls(), vec!["get", "create 1", "start c", "remove"]);
    }

    #[tokio::test]
    async fn test_shrink_only_removes() {
        let pool = RecordingPool::new(vec!["a", "b", "c"]);
        let plan = ReconcilePlan {
            tracked_keys: tracked(&["a", "b", "c"]),
            target: 2,
            remove: vec![ProxyKeyToRemove::released("c")],
        };

        let outcome = reconcile(&pool, &plan).await.unwrap();

        assert_eq!(outcome.alive.len(), 2);
        assert!(outcome.created.is_empty());
        assert_eq!(outcome.keys(), tracked(&["a", "b"]));
        assert_eq!(pool.calls(), vec!["get", "remove"]);
    }

    #[tokio::test]
    async fn test_remove_error_propagates() {
        let mut pool = RecordingPool::new(vec!["a"]);
        pool.fail_remove = true;
        let plan = ReconcilePlan {
            tracked_keys: tracked(&["a"]),
            target: 0,
            remove: vec![ProxyKeyToRemove::forced("a")],
        };

        let err = reconcile(&pool, &plan).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
