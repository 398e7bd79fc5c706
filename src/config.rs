use serde::Deserialize;
use std::time::Duration;
use crate::coins::CoinPair;
use crate::connectivity::RetryPolicy;
use crate::error::{AppError, AppResult};
use crate::swap_status::{PollPolicy, SwapId};

/// Harness settings, read from `SWAP_QA_*` environment variables.
/// List values are comma separated.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub userpass: String,
    pub nodes: Vec<String>,
    pub rpc_port: u16,
    pub rpc_timeout_secs: u64,
    /// Node queried for swap status; first node when unset
    pub status_node: Option<String>,
    pub swap_uuids: Vec<String>,

    pub round_interval_secs: u64,
    pub error_cooldown_secs: u64,
    pub max_rounds: Option<u32>,
    pub deadline_secs: Option<u64>,
    pub poll_concurrency: usize,

    pub connect_attempts: u32,
    pub connect_delay_secs: u64,
    pub electrum_attempts: u32,
    pub electrum_delay_secs: u64,

    pub base_coin: Option<String>,
    pub rel_coin: Option<String>,
    pub base_electrums: Vec<String>,
    pub rel_electrums: Vec<String>,
    /// Compare order book depth across nodes after reconciliation
    pub check_orderbook: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            userpass: String::new(),
            nodes: vec!["127.0.0.1".to_string()],
            rpc_port: 7783,
            rpc_timeout_secs: 120,
            status_node: None,
            swap_uuids: Vec::new(),
            round_interval_secs: 20,
            error_cooldown_secs: 5,
            max_rounds: None,
            deadline_secs: None,
            poll_concurrency: 1,
            connect_attempts: 15,
            connect_delay_secs: 5,
            electrum_attempts: 40,
            electrum_delay_secs: 10,
            base_coin: None,
            rel_coin: None,
            base_electrums: Vec::new(),
            rel_electrums: Vec::new(),
            check_orderbook: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    fn from_vars(vars: config::Map<String, String>) -> Result<Self, config::ConfigError> {
        // userpass is an opaque credential: "0123" must not become 123
        let userpass = vars.get("SWAP_QA_USERPASS").cloned();

        Self::from_source(
            config::Environment::with_prefix("SWAP_QA")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("nodes")
                .with_list_parse_key("swap_uuids")
                .with_list_parse_key("base_electrums")
                .with_list_parse_key("rel_electrums")
                .source(Some(vars)),
            userpass,
        )
    }

    fn from_source<S>(source: S, userpass: Option<String>) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .set_override_option("userpass", userpass)?
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.nodes.is_empty() {
            return Err(AppError::InvalidInput("at least one node is required".into()));
        }
        if let Some(node) = &self.status_node {
            if !self.nodes.contains(node) {
                return Err(AppError::InvalidInput(format!(
                    "status node {} is not in the node list",
                    node
                )));
            }
        }
        if self.base_coin.is_some() != self.rel_coin.is_some() {
            return Err(AppError::InvalidInput(
                "base_coin and rel_coin must be set together".into(),
            ));
        }
        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn status_node(&self) -> Option<&str> {
        self.status_node
            .as_deref()
            .or_else(|| self.nodes.first().map(String::as_str))
    }

    pub fn swap_ids(&self) -> Vec<SwapId> {
        self.swap_uuids
            .iter()
            .map(|uuid| uuid.trim())
            .filter(|uuid| !uuid.is_empty())
            .map(SwapId::from)
            .collect()
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let mut policy = PollPolicy::default()
            .with_round_interval(Duration::from_secs(self.round_interval_secs))
            .with_error_cooldown(Duration::from_secs(self.error_cooldown_secs))
            .with_concurrency(self.poll_concurrency);
        if let Some(max_rounds) = self.max_rounds {
            policy = policy.with_max_rounds(max_rounds);
        }
        if let Some(deadline) = self.deadline_secs {
            policy = policy.with_deadline(Duration::from_secs(deadline));
        }
        policy
    }

    pub fn connect_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.connect_attempts,
            Duration::from_secs(self.connect_delay_secs),
        )
    }

    pub fn electrum_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.electrum_attempts,
            Duration::from_secs(self.electrum_delay_secs),
        )
    }

    pub fn coin_pair(&self) -> Option<CoinPair> {
        Some(CoinPair {
            base: self.base_coin.clone()?,
            rel: self.rel_coin.clone()?,
            base_electrums: self.base_electrums.clone(),
            rel_electrums: self.rel_electrums.clone(),
        })
    }
}
