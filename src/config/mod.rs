//! Process configuration
//!
//! Everything the gateway reads from the environment is captured once at
//! startup. Routing never touches `std::env` directly: per-request
//! credential variables are looked up through the same [`EnvSnapshot`],
//! which keeps target resolution deterministic under test.

use std::collections::HashMap;
use std::env;

use tracing::warn;

/// Environment variable holding the Gemini credential.
pub const GEMINI_KEY_VAR: &str = "G_API_KEY";
/// Environment variable holding the global fallback credential for
/// OpenAI-compatible providers.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the global fallback base URL.
pub const OPENAI_URL_VAR: &str = "OPENAI_API_URL";
/// Environment variable holding the gateway base path.
pub const CF_GATEWAY_VAR: &str = "CF_GATEWAY";

/// Immutable snapshot of the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable, treating empty values as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Startup configuration for both provider families.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Credential for the native Gemini provider.
    pub gemini_api_key: String,
    /// Global fallback credential for OpenAI-compatible providers. May be
    /// empty, never absent.
    pub openai_api_key: String,
    /// Global fallback base URL for OpenAI-compatible providers.
    pub openai_base_url: Option<String>,
    /// Gateway base path used when no other base URL applies.
    pub gateway_base_url: Option<String>,
}

impl GatewayConfig {
    pub fn from_env(env: &EnvSnapshot) -> Self {
        let gemini_api_key = env.get(GEMINI_KEY_VAR).unwrap_or_default().to_string();
        if gemini_api_key.is_empty() {
            warn!(
                env_var = GEMINI_KEY_VAR,
                "Gemini credential is not set; multimodal requests will be rejected upstream"
            );
        }

        Self {
            gemini_api_key,
            openai_api_key: env.get(OPENAI_KEY_VAR).unwrap_or_default().to_string(),
            openai_base_url: env.get(OPENAI_URL_VAR).map(str::to_string),
            gateway_base_url: env.get(CF_GATEWAY_VAR).map(str::to_string),
        }
    }
}
