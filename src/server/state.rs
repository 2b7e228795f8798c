use crate::config::{EnvSnapshot, GatewayConfig};
use crate::model::ModelRegistry;

/// Shared per-process state. Everything in here is immutable after
/// startup; the reqwest client is internally reference-counted.
pub(crate) struct AppState {
    pub(crate) config: GatewayConfig,
    pub(crate) env: EnvSnapshot,
    pub(crate) registry: ModelRegistry,
    pub(crate) http: reqwest::Client,
}

impl AppState {
    pub(crate) fn new(config: GatewayConfig, env: EnvSnapshot, registry: ModelRegistry) -> Self {
        Self {
            config,
            env,
            registry,
            http: reqwest::Client::new(),
        }
    }
}
