//! Simple example of running one reconciliation pass per connector.

use proxy_connectors::{
    reconcile, ConnectorRegistry, HypeproxyConfig, HypeproxyConnector,
    ProxyCheapResidentialConnector, ReconcilePlan,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // one shared connection pool for every provider
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(8)
        .build()?;

    let registry = ConnectorRegistry::new();
    registry.register(Arc::new(ProxyCheapResidentialConnector::default()));

    if let Ok(token) = std::env::var("HYPEPROXY_TOKEN") {
        let config = HypeproxyConfig::builder()
            .token(token)
            .timeout(Duration::from_secs(15))
            .max_requests_per_second(2.0)
            .build()?;
        registry.register(Arc::new(HypeproxyConnector::new(&config, client.clone())));
    } else {
        println!("HYPEPROXY_TOKEN not set, skipping hypeproxy");
    }

    for kind in registry.types() {
        let connector = registry.get(kind)?;
        let plan = ReconcilePlan {
            target: 3,
            ..Default::default()
        };

        let outcome = reconcile(connector.as_ref(), &plan).await?;
        println!("{}: now tracking {:?}", kind, outcome.keys());
        for proxy in &outcome.created {
            println!("  {} ({}) {}", proxy.key, proxy.name, proxy.status);
        }
    }

    Ok(())
}
