use tracing::{info, warn};
use crate::error::AppResult;
use crate::rpc::models::OrderbookDepth;
use crate::rpc::registry::NodeRegistry;
use crate::rpc::traits::NodeRpc;
use crate::swap_status::aggregator::saturation_ratio;

/// Current order counts for `base/rel` on one node
pub async fn get_orders_amount(rpc: &dyn NodeRpc, base: &str, rel: &str) -> AppResult<OrderbookDepth> {
    let depth = rpc.orderbook(base, rel).await?;
    info!(
        "📊 {} {}/{}: {} asks, {} bids",
        rpc.endpoint(),
        base,
        rel,
        depth.numasks,
        depth.numbids
    );
    Ok(depth)
}

/// Whether `observed` carries (nearly) as many orders as `expected`
pub fn compare_depth(expected: &OrderbookDepth, observed: &OrderbookDepth) -> bool {
    saturation_ratio(expected.amount(), observed.amount())
}

/// Sample every node and compare its depth with the first registered node
pub async fn check_registry_saturation(
    registry: &NodeRegistry,
    base: &str,
    rel: &str,
) -> AppResult<bool> {
    let mut depths = Vec::with_capacity(registry.len());
    for host in registry.hosts() {
        let node = registry.get_node(host)?;
        depths.push((host.clone(), get_orders_amount(node.as_ref(), base, rel).await?));
    }

    let Some((reference_host, reference)) = depths.first().cloned() else {
        return Ok(false);
    };

    let mut saturated = true;
    for (host, depth) in depths.iter().skip(1) {
        if !compare_depth(&reference, depth) {
            warn!(
                "⚠️ {} sees {} orders, {} sees {}",
                host,
                depth.amount(),
                reference_host,
                reference.amount()
            );
            saturated = false;
        }
    }

    Ok(saturated)
}
