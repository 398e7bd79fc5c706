use serde_json::Value;
use tracing::{info, warn};
use crate::connectivity::RetryPolicy;
use crate::error::{AppError, AppResult};
use crate::rpc::traits::NodeRpc;

/// Call `version` until the node answers or the attempt ceiling is reached.
/// Returns the version payload of the first answer.
pub async fn wait_for_node(rpc: &dyn NodeRpc, policy: &RetryPolicy) -> AppResult<Value> {
    let mut attempt = 0u32;
    let mut last_error = String::from("no attempt made");

    while attempt < policy.max_attempts {
        attempt += 1;

        match rpc.version().await {
            Ok(version) => {
                info!(
                    "✓ Node {} responded (attempt {}/{}): {}",
                    rpc.endpoint(),
                    attempt,
                    policy.max_attempts,
                    version
                );
                return Ok(version);
            }
            Err(e) => {
                warn!(
                    "Node {} does not respond (attempt {}/{}): {}",
                    rpc.endpoint(),
                    attempt,
                    policy.max_attempts,
                    e
                );
                last_error = e.to_string();
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    Err(AppError::ConnectionSetup {
        node: rpc.endpoint().to_string(),
        attempts: attempt,
        last_error,
    })
}
