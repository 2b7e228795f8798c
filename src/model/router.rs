//! Provider routing
//!
//! Resolves the final upstream URL and credential for an OpenAI-compatible
//! request. Pure over its inputs (command, registry entry, configuration,
//! environment snapshot); precedence is fixed and the function never reads
//! the process environment itself.

use crate::config::{EnvSnapshot, GatewayConfig};
use crate::constants::DEFAULT_CHAT_ENDPOINT;
use crate::domain::types::ChatCommand;
use crate::model::registry::ModelEntry;
use crate::model::types::ChatError;

/// Fully resolved upstream call target. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub url: String,
    pub authorization: String,
}

/// Resolve the upstream target for an OpenAI-compatible request.
///
/// Base URL precedence: request override, registry entry, global fallback,
/// gateway path. Credential precedence: explicit request key, named
/// environment variable (request override ahead of the registry entry's),
/// global fallback key. The global fallback credential may be empty but is
/// never absent.
pub fn resolve_target(
    command: &ChatCommand,
    entry: Option<&ModelEntry>,
    config: &GatewayConfig,
    env: &EnvSnapshot,
) -> Result<ResolvedTarget, ChatError> {
    let endpoint = non_empty(command.endpoint.as_deref())
        .or(entry.and_then(|entry| entry.endpoint))
        .unwrap_or(DEFAULT_CHAT_ENDPOINT);

    let base = non_empty(command.base_url.as_deref())
        .map(str::to_string)
        .or_else(|| entry.and_then(|entry| entry.base_url).map(str::to_string))
        .or_else(|| config.openai_base_url.clone())
        .or_else(|| {
            config
                .gateway_base_url
                .as_deref()
                .map(|gateway| format!("{}/openai", gateway.trim_end_matches('/')))
        })
        .ok_or_else(|| ChatError::unroutable(command.model.clone()))?;

    let url = join_url(&base, endpoint);

    let api_key = non_empty(command.api_key.as_deref())
        .map(str::to_string)
        .or_else(|| {
            non_empty(command.api_key_env.as_deref())
                .or(entry.and_then(|entry| entry.api_key_env))
                .and_then(|name| env.get(name))
                .map(str::to_string)
        })
        .unwrap_or_else(|| config.openai_api_key.clone());

    Ok(ResolvedTarget {
        url,
        authorization: format!("Bearer {api_key}"),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::ModelRegistry;

    fn config() -> GatewayConfig {
        GatewayConfig {
            gemini_api_key: String::new(),
            openai_api_key: "Z".to_string(),
            openai_base_url: Some("https://fallback.example/v1".to_string()),
            gateway_base_url: Some("https://gateway.example/v1/acct/ai".to_string()),
        }
    }

    fn registry() -> ModelRegistry {
        ModelRegistry::builtin().unwrap()
    }

    #[test]
    fn explicit_key_wins_over_env_and_fallback() {
        let registry = registry();
        let entry = registry.lookup("mistral-large-2512");
        let env = EnvSnapshot::from_pairs([("MISTRAL_API_KEY", "Y")]);

        let mut command = ChatCommand::new("mistral-large-2512", Vec::new());
        command.api_key = Some("X".to_string());

        let target = resolve_target(&command, entry, &config(), &env).unwrap();
        assert_eq!(target.authorization, "Bearer X");
    }

    #[test]
    fn env_key_wins_over_fallback() {
        let registry = registry();
        let entry = registry.lookup("mistral-large-2512");
        let env = EnvSnapshot::from_pairs([("MISTRAL_API_KEY", "Y")]);

        let command = ChatCommand::new("mistral-large-2512", Vec::new());
        let target = resolve_target(&command, entry, &config(), &env).unwrap();
        assert_eq!(target.authorization, "Bearer Y");
    }

    #[test]
    fn fallback_key_is_used_last() {
        let registry = registry();
        let entry = registry.lookup("mistral-large-2512");

        let command = ChatCommand::new("mistral-large-2512", Vec::new());
        let target = resolve_target(&command, entry, &config(), &EnvSnapshot::default()).unwrap();
        assert_eq!(target.authorization, "Bearer Z");
    }

    #[test]
    fn request_env_name_overrides_entry_env_name() {
        let registry = registry();
        let entry = registry.lookup("mistral-large-2512");
        let env = EnvSnapshot::from_pairs([("MISTRAL_API_KEY", "Y"), ("CUSTOM_KEY", "C")]);

        let mut command = ChatCommand::new("mistral-large-2512", Vec::new());
        command.api_key_env = Some("CUSTOM_KEY".to_string());

        let target = resolve_target(&command, entry, &config(), &env).unwrap();
        assert_eq!(target.authorization, "Bearer C");
    }

    #[test]
    fn base_url_precedence_chain() {
        let registry = registry();
        let entry = registry.lookup("mistral-large-2512");
        let env = EnvSnapshot::default();

        let mut command = ChatCommand::new("mistral-large-2512", Vec::new());
        command.base_url = Some("https://override.example/v2/".to_string());
        let target = resolve_target(&command, entry, &config(), &env).unwrap();
        assert_eq!(target.url, "https://override.example/v2/chat/completions");

        command.base_url = None;
        let target = resolve_target(&command, entry, &config(), &env).unwrap();
        assert_eq!(target.url, "https://api.mistral.ai/v1/chat/completions");

        let target = resolve_target(&command, None, &config(), &env).unwrap();
        assert_eq!(target.url, "https://fallback.example/v1/chat/completions");

        let mut bare = config();
        bare.openai_base_url = None;
        let target = resolve_target(&command, None, &bare, &env).unwrap();
        assert_eq!(
            target.url,
            "https://gateway.example/v1/acct/ai/openai/chat/completions"
        );
    }

    #[test]
    fn endpoint_defaults_to_chat_completions() {
        let mut command = ChatCommand::new("anything", Vec::new());
        command.base_url = Some("https://override.example".to_string());
        let target =
            resolve_target(&command, None, &config(), &EnvSnapshot::default()).unwrap();
        assert_eq!(target.url, "https://override.example/chat/completions");

        command.endpoint = Some("v1/responses".to_string());
        let target =
            resolve_target(&command, None, &config(), &EnvSnapshot::default()).unwrap();
        assert_eq!(target.url, "https://override.example/v1/responses");
    }

    #[test]
    fn no_base_url_anywhere_is_unroutable() {
        let command = ChatCommand::new("mystery-model", Vec::new());
        let bare = GatewayConfig {
            gemini_api_key: String::new(),
            openai_api_key: String::new(),
            openai_base_url: None,
            gateway_base_url: None,
        };
        assert!(matches!(
            resolve_target(&command, None, &bare, &EnvSnapshot::default()),
            Err(ChatError::Unroutable { model }) if model == "mystery-model"
        ));
    }
}
