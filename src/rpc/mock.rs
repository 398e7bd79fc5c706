//! Scripted in-memory node used by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use crate::error::RpcError;
use crate::rpc::traits::NodeRpc;

/// Replays queued replies per method (and per uuid for `my_swap_status`).
/// The last queued reply of a key is repeated once the queue drains to it.
pub struct ScriptedNode {
    host: String,
    replies: Mutex<HashMap<String, VecDeque<Result<Value, RpcError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedNode {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, method: &str, reply: Result<Value, RpcError>) -> &Self {
        self.replies
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn push_status(&self, uuid: &str, reply: Result<Value, RpcError>) -> &Self {
        self.push(&status_key(uuid), reply)
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|(m, _)| m == method).count()
    }

    pub fn status_polls(&self, uuid: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(m, p)| m == "my_swap_status" && p["params"]["uuid"] == uuid)
            .count()
    }

    pub fn params(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

fn status_key(uuid: &str) -> String {
    format!("my_swap_status:{}", uuid)
}

#[async_trait]
impl NodeRpc for ScriptedNode {
    fn endpoint(&self) -> &str {
        &self.host
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls.lock().push((method.to_string(), params.clone()));

        let key = match params["params"]["uuid"].as_str() {
            Some(uuid) if method == "my_swap_status" => status_key(uuid),
            _ => method.to_string(),
        };

        let mut replies = self.replies.lock();
        match replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(RpcError::transport(method, format!("no scripted reply for {}", key))),
        }
    }
}
