//! Model registry
//!
//! Static table mapping a model id to its provider metadata. Built once at
//! startup, immutable afterwards. Lookup feeds the router with the
//! override-eligible defaults (base URL, credential env name, endpoint).

use std::collections::HashSet;

use thiserror::Error;

/// Upstream integration style for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Native Gemini API with inline multimodal parts.
    Multimodal,
    /// Generic OpenAI-compatible chat-completions protocol.
    OpenAiCompatible,
}

/// Static metadata describing how to reach and authenticate one model.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ProviderKind,
    pub base_url: Option<&'static str>,
    pub api_key_env: Option<&'static str>,
    pub endpoint: Option<&'static str>,
}

impl ModelEntry {
    const fn multimodal(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            kind: ProviderKind::Multimodal,
            base_url: None,
            api_key_env: None,
            endpoint: None,
        }
    }

    const fn openai_compatible(
        id: &'static str,
        name: &'static str,
        base_url: &'static str,
        api_key_env: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            kind: ProviderKind::OpenAiCompatible,
            base_url: Some(base_url),
            api_key_env: Some(api_key_env),
            endpoint: Some("chat/completions"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate model id '{0}' in registry")]
    DuplicateId(String),
}

/// Ordered, read-only model table.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Build a registry, rejecting duplicate ids.
    pub fn new(entries: Vec<ModelEntry>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(RegistryError::DuplicateId(entry.id.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// The models served by this deployment.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(vec![
            ModelEntry::multimodal("gemini-2.5-flash", "Gemini 2.5 Flash"),
            ModelEntry::multimodal("gemini-2.5-pro", "Gemini 2.5 Pro"),
            ModelEntry::multimodal("gemini-flash-lite-latest", "Gemini Flash Lite Latest"),
            ModelEntry::multimodal("gemini-flash-latest", "Gemini Flash Latest"),
            ModelEntry::openai_compatible(
                "x-ai/grok-4.1-fast:free",
                "Grok 4.1 Fast",
                "https://openrouter.ai/api/v1",
                "OPENROUTER_API_KEY",
            ),
            ModelEntry::openai_compatible(
                "zai-org/GLM-4.6",
                "GLM 4.6",
                "https://api.siliconflow.cn/v1",
                "SILICONFLOW_API_KEY",
            ),
            ModelEntry::openai_compatible(
                "GLM-4.5-Flash",
                "GLM 4.5 Flash",
                "https://open.bigmodel.cn/api/paas/v4",
                "ZHIPU_API_KEY",
            ),
            ModelEntry::openai_compatible(
                "mistral-large-2512",
                "Mistral Large",
                "https://api.mistral.ai/v1",
                "MISTRAL_API_KEY",
            ),
            ModelEntry::openai_compatible(
                "mistral-medium-2508",
                "Mistral Medium",
                "https://api.mistral.ai/v1",
                "MISTRAL_API_KEY",
            ),
        ])
    }

    /// Get the entry for a model id, if configured.
    pub fn lookup(&self, model_id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.id == model_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_matching_entry() {
        let registry = ModelRegistry::builtin().unwrap();
        let entry = registry.lookup("gemini-2.5-flash").unwrap();
        assert_eq!(entry.id, "gemini-2.5-flash");
        assert_eq!(entry.kind, ProviderKind::Multimodal);

        let entry = registry.lookup("zai-org/GLM-4.6").unwrap();
        assert_eq!(entry.kind, ProviderKind::OpenAiCompatible);
        assert_eq!(entry.base_url, Some("https://api.siliconflow.cn/v1"));
        assert_eq!(entry.api_key_env, Some("SILICONFLOW_API_KEY"));
    }

    #[test]
    fn lookup_misses_unknown_ids() {
        let registry = ModelRegistry::builtin().unwrap();
        assert!(registry.lookup("gpt-unknown").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let entries = vec![
            ModelEntry::multimodal("m", "one"),
            ModelEntry::multimodal("m", "two"),
        ];
        assert!(matches!(
            ModelRegistry::new(entries),
            Err(RegistryError::DuplicateId(id)) if id == "m"
        ));
    }

    #[test]
    fn builtin_table_is_well_formed() {
        let registry = ModelRegistry::builtin().unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 9);
    }
}
