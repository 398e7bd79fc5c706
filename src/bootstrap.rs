use std::sync::Arc;
use tracing::info;
use crate::{
    coins::{enable_electrums, CoinPair},
    config::Config,
    connectivity::{wait_for_node, RetryPolicy},
    error::AppResult,
    rpc::{MmProxy, NodeRegistry},
};

/// Connect to every configured node and enable the coin pair when set
pub async fn initialize_nodes(config: &Config) -> AppResult<NodeRegistry> {
    info!("Initializing node connections ...");

    let mut registry = NodeRegistry::new();
    for host in &config.nodes {
        let proxy = MmProxy::new(host, config.rpc_port, &config.userpass, config.rpc_timeout())?;
        info!("⚙️  Proxy for {} at {}", host, proxy.url());
        registry.register_node(host.clone(), Arc::new(proxy));
    }

    probe_nodes(&registry, &config.connect_policy()).await?;

    if let Some(pair) = config.coin_pair() {
        enable_coins(&registry, &pair, &config.electrum_policy()).await?;
    }

    Ok(registry)
}

/// Wait until every registered node answers `version`
pub async fn probe_nodes(registry: &NodeRegistry, policy: &RetryPolicy) -> AppResult<()> {
    for host in registry.hosts() {
        let node = registry.get_node(host)?;
        wait_for_node(node.as_ref(), policy).await?;
    }

    info!("✅ {} nodes connected", registry.len());
    Ok(())
}

pub async fn enable_coins(
    registry: &NodeRegistry,
    pair: &CoinPair,
    policy: &RetryPolicy,
) -> AppResult<()> {
    for host in registry.hosts() {
        let node = registry.get_node(host)?;
        enable_electrums(node.as_ref(), pair, policy).await?;
    }

    info!("✅ {}/{} enabled on {} nodes", pair.base, pair.rel, registry.len());
    Ok(())
}
