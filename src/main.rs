mod error;
mod config;
mod rpc;
mod connectivity;
mod coins;
mod orderbook;
mod swap_status;
mod bootstrap;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::Config;
use crate::swap_status::SwapStatusReconciler;

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,swap_qa=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it applies
    dotenv::dotenv().ok();
    init_tracing();

    info!("🚀 Starting swap QA harness");

    let config = Config::from_env().context("failed to read SWAP_QA_* settings")?;
    config.validate()?;

    let registry = bootstrap::initialize_nodes(&config).await?;

    let status_host = config
        .status_node()
        .context("no node available for status queries")?;
    let node = registry.get_node(status_host)?;

    // Ctrl-C stops the loop at its next pause
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping swap status checks");
            let _ = cancel_tx.send(true);
        }
    });

    let swap_ids = config.swap_ids();
    if swap_ids.is_empty() {
        warn!("No swap uuids configured (SWAP_QA_SWAP_UUIDS)");
    }

    let outcome = SwapStatusReconciler::new(node, config.poll_policy())
        .with_cancellation(cancel_rx)
        .reconcile(swap_ids)
        .await;

    if config.check_orderbook {
        match config.coin_pair() {
            Some(pair) => {
                let saturated =
                    orderbook::check_registry_saturation(&registry, &pair.base, &pair.rel).await?;
                info!("📊 Orderbook saturated across nodes: {}", saturated);
            }
            None => warn!("Orderbook check requested without base_coin/rel_coin"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.is_converged() {
        anyhow::bail!(
            "swap status checks stopped early ({:?}), {} swaps unresolved",
            outcome.status,
            outcome.summary.unresolved
        );
    }

    info!(
        "✓ {} of {} swaps succeeded",
        outcome.summary.successes, outcome.summary.total
    );

    Ok(())
}
