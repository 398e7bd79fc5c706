use thiserror::Error;

/// Top-level error type for the harness
#[derive(Error, Debug)]
pub enum AppError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Connection setup failed for {node} after {attempts} attempts: {last_error}")]
    ConnectionSetup {
        node: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Coin activation failed for {coin} after {attempts} attempts: {message}")]
    CoinActivation {
        coin: String,
        attempts: u32,
        message: String,
    },

    #[error("Node not registered: {0}")]
    NodeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while talking to a swap daemon
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("Transport failure calling {method}: {message}")]
    Transport { method: String, message: String },

    #[error("Request {method} timed out")]
    Timeout { method: String },

    #[error("Undecodable response from {method}: {message}")]
    Decode { method: String, message: String },

    #[error("Node rejected {method}: {message}")]
    Application { method: String, message: String },
}

impl RpcError {
    pub fn transport(method: &str, message: impl Into<String>) -> Self {
        RpcError::Transport {
            method: method.to_string(),
            message: message.into(),
        }
    }

    pub fn decode(method: &str, message: impl Into<String>) -> Self {
        RpcError::Decode {
            method: method.to_string(),
            message: message.into(),
        }
    }

    pub fn application(method: &str, message: impl Into<String>) -> Self {
        RpcError::Application {
            method: method.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for the harness
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_app_error() {
        let err: AppError = config::ConfigError::Message("missing nodes".into()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: missing nodes");
    }

    #[test]
    fn test_rpc_error_wraps_into_app_error() {
        let err: AppError = RpcError::application("electrum", "coin not found").into();
        assert_eq!(
            err.to_string(),
            "RPC error: Node rejected electrum: coin not found"
        );
    }
}
