// Electrum coin activation
//
// Both coins of the pair are enabled on every attempt; the pair counts as
// active once neither reply carries an `error`.

use tracing::{info, warn};
use crate::connectivity::RetryPolicy;
use crate::error::{AppError, AppResult};
use crate::rpc::models::{application_error, ElectrumServer};
use crate::rpc::traits::NodeRpc;

/// Base/rel coins with their electrum servers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinPair {
    pub base: String,
    pub rel: String,
    pub base_electrums: Vec<String>,
    pub rel_electrums: Vec<String>,
}

impl CoinPair {
    pub fn base_servers(&self) -> Vec<ElectrumServer> {
        self.base_electrums.iter().map(|url| ElectrumServer::tcp(url)).collect()
    }

    pub fn rel_servers(&self) -> Vec<ElectrumServer> {
        self.rel_electrums.iter().map(|url| ElectrumServer::tcp(url)).collect()
    }
}

pub async fn enable_electrums(
    rpc: &dyn NodeRpc,
    pair: &CoinPair,
    policy: &RetryPolicy,
) -> AppResult<()> {
    let base_servers = pair.base_servers();
    let rel_servers = pair.rel_servers();
    let mut attempt = 0u32;
    let mut last_error = String::from("no attempt made");

    while attempt < policy.max_attempts {
        attempt += 1;

        let mut failures = Vec::new();
        for (coin, servers) in [(&pair.base, &base_servers), (&pair.rel, &rel_servers)] {
            match rpc.electrum(coin, servers).await {
                Ok(reply) => {
                    if let Some(message) = application_error(&reply) {
                        failures.push(format!("{}: {}", coin, message));
                    }
                }
                Err(e) => failures.push(format!("{}: {}", coin, e)),
            }
        }

        if failures.is_empty() {
            info!(
                "✅ {} and {} enabled on {} (attempt {})",
                pair.base,
                pair.rel,
                rpc.endpoint(),
                attempt
            );
            return Ok(());
        }

        last_error = failures.join("; ");
        warn!(
            "Electrum activation on {} failed (attempt {}/{}): {}",
            rpc.endpoint(),
            attempt,
            policy.max_attempts,
            last_error
        );

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    Err(AppError::CoinActivation {
        coin: format!("{}/{}", pair.base, pair.rel),
        attempts: attempt,
        message: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use crate::rpc::mock::ScriptedNode;
    use serde_json::json;
    use std::time::Duration;

    fn pair() -> CoinPair {
        CoinPair {
            base: "WSG".to_string(),
            rel: "BSG".to_string(),
            base_electrums: vec!["node.example.org:15001".into(), "node.example.org:25001".into()],
            rel_electrums: vec!["node.example.org:35001".into()],
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn test_servers_are_tcp_without_cert_checks() {
        let servers = pair().base_servers();
        assert_eq!(servers.len(), 2);
        assert_eq!(
            serde_json::to_value(&servers[0]).unwrap(),
            json!({"url": "node.example.org:15001", "protocol": "TCP", "disable_cert_verification": true})
        );
    }

    #[tokio::test]
    async fn test_enables_pair() {
        let node = ScriptedNode::new("node-a");
        node.push("electrum", Ok(json!({"result": "success", "balance": "0"})));

        enable_electrums(&node, &pair(), &policy(40)).await.unwrap();

        let calls = node.params("electrum");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0]["coin"], "WSG");
        assert_eq!(calls[1]["coin"], "BSG");
        assert_eq!(calls[1]["servers"][0]["url"], "node.example.org:35001");
    }

    #[tokio::test]
    async fn test_retries_until_clean_reply() {
        let node = ScriptedNode::new("node-a");
        node.push("electrum", Ok(json!({"error": "electrum servers unreachable"})))
            .push("electrum", Ok(json!({"error": "electrum servers unreachable"})))
            .push("electrum", Ok(json!({"result": "success"})));

        enable_electrums(&node, &pair(), &policy(5)).await.unwrap();
        assert_eq!(node.calls("electrum"), 4);
    }

    #[tokio::test]
    async fn test_fails_after_ceiling() {
        let node = ScriptedNode::new("node-a");
        node.push("electrum", Err(RpcError::transport("electrum", "connection refused")));

        let err = enable_electrums(&node, &pair(), &policy(2)).await.unwrap_err();

        assert_eq!(node.calls("electrum"), 4);
        assert!(matches!(
            err,
            AppError::CoinActivation { attempts: 2, ref coin, .. } if coin == "WSG/BSG"
        ));
    }
}
