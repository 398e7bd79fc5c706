use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use crate::error::{AppError, AppResult, RpcError};
use crate::rpc::traits::NodeRpc;

/// HTTP proxy for the legacy swap daemon RPC
pub struct MmProxy {
    client: Client,
    host: String,
    url: String,
    userpass: String,
}

impl MmProxy {
    pub fn new(host: &str, port: u16, userpass: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::ConnectionSetup {
                node: host.to_string(),
                attempts: 0,
                last_error: format!("failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            client,
            host: host.to_string(),
            url: format!("http://{}:{}", host, port),
            userpass: userpass.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(&self, method: &str, params: Value) -> Value {
        let mut body = json!({
            "userpass": self.userpass,
            "method": method,
        });

        if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), params) {
            for (key, value) in fields {
                body.insert(key, value);
            }
        }

        body
    }
}

#[async_trait]
impl NodeRpc for MmProxy {
    fn endpoint(&self) -> &str {
        &self.host
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = self.request_body(method, params);
        debug!("→ {} {}", self.host, method);

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout {
                        method: method.to_string(),
                    }
                } else {
                    RpcError::transport(method, e.to_string())
                }
            })?;

        // Error replies come back with a non-2xx status but a JSON body
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RpcError::transport(method, e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            RpcError::decode(method, format!("HTTP {}: {} ({})", status, e, text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_flattens_params() {
        let proxy = MmProxy::new("127.0.0.1", 7783, "secret", Duration::from_secs(5)).unwrap();
        let body = proxy.request_body("orderbook", json!({"base": "WSG", "rel": "BSG"}));

        assert_eq!(
            body,
            json!({
                "userpass": "secret",
                "method": "orderbook",
                "base": "WSG",
                "rel": "BSG",
            })
        );
        assert_eq!(proxy.url(), "http://127.0.0.1:7783");
        assert_eq!(proxy.endpoint(), "127.0.0.1");
    }

    #[test]
    fn test_request_body_keeps_nested_params() {
        let proxy = MmProxy::new("node-a", 7783, "secret", Duration::from_secs(5)).unwrap();
        let body = proxy.request_body("my_swap_status", json!({"params": {"uuid": "abc"}}));

        assert_eq!(body["params"]["uuid"], "abc");
        assert_eq!(body["method"], "my_swap_status");
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_fault() {
        // Port 9 (discard) is not expected to host an HTTP server locally
        let proxy = MmProxy::new("127.0.0.1", 9, "secret", Duration::from_millis(500)).unwrap();
        let err = proxy.version().await.unwrap_err();
        assert!(matches!(
            err,
            RpcError::Transport { .. } | RpcError::Timeout { .. }
        ));
    }
}
