use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use crate::error::{AppError, AppResult};
use crate::rpc::traits::NodeRpc;

/// Connected node proxies keyed by host
pub struct NodeRegistry {
    nodes: HashMap<String, Arc<dyn NodeRpc>>,
    order: Vec<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register_node(&mut self, host: String, node: Arc<dyn NodeRpc>) {
        info!("Registering node proxy: {}", host);
        if self.nodes.insert(host.clone(), node).is_none() {
            self.order.push(host);
        }
    }

    pub fn get_node(&self, host: &str) -> AppResult<Arc<dyn NodeRpc>> {
        self.nodes
            .get(host)
            .cloned()
            .ok_or_else(|| AppError::NodeNotFound(host.to_string()))
    }

    /// Hosts in registration order
    pub fn hosts(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::ScriptedNode;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = NodeRegistry::new();
        registry.register_node("node-a".into(), Arc::new(ScriptedNode::new("node-a")));
        registry.register_node("node-b".into(), Arc::new(ScriptedNode::new("node-b")));
        registry.register_node("node-a".into(), Arc::new(ScriptedNode::new("node-a")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.hosts(), &["node-a".to_string(), "node-b".to_string()]);
        assert_eq!(registry.get_node("node-a").unwrap().endpoint(), "node-a");
        assert_eq!(registry.get_node("node-b").unwrap().endpoint(), "node-b");
        assert!(matches!(
            registry.get_node("node-c"),
            Err(AppError::NodeNotFound(host)) if host == "node-c"
        ));
    }
}
