use async_trait::async_trait;
use serde_json::{json, Value};
use crate::error::RpcError;
use crate::rpc::models::{application_error, ElectrumServer, OrderbookDepth, RawStatusResponse};

/// RPC surface of a swap daemon node
///
/// Implementors only provide `call`; the typed helpers build the legacy
/// request bodies and decode the replies.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Host the proxy talks to (used in logs and registry keys)
    fn endpoint(&self) -> &str;

    /// Issue one call. `params` must be a JSON object; its fields are sent
    /// next to `method` at the top level of the request body.
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    /// Liveness probe
    async fn version(&self) -> Result<Value, RpcError> {
        self.call("version", json!({})).await
    }

    async fn my_swap_status(&self, uuid: &str) -> Result<RawStatusResponse, RpcError> {
        let reply = self
            .call("my_swap_status", json!({ "params": { "uuid": uuid } }))
            .await?;
        Ok(RawStatusResponse::decode(reply))
    }

    async fn orderbook(&self, base: &str, rel: &str) -> Result<OrderbookDepth, RpcError> {
        let reply = self
            .call("orderbook", json!({ "base": base, "rel": rel }))
            .await?;

        if let Some(message) = application_error(&reply) {
            return Err(RpcError::application("orderbook", message));
        }

        serde_json::from_value(reply).map_err(|e| RpcError::decode("orderbook", e.to_string()))
    }

    /// Returns the raw reply; callers inspect its `error` field
    async fn electrum(&self, coin: &str, servers: &[ElectrumServer]) -> Result<Value, RpcError> {
        self.call("electrum", json!({ "coin": coin, "servers": servers }))
            .await
    }
}
