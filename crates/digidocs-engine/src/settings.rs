use std::collections::HashMap;

/// Base URL of the chat completion endpoint.
pub const OPENROUTER_BASE: &str = "OPENROUTER_BASE";
/// Model used when a request does not name one.
pub const OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";
/// Page template new documents are exported through; see
/// [`RichDocument::from_template`](crate::render::RichDocument::from_template).
pub const TEMPLATE_ID: &str = "TEMPLATE_ID";
/// Credential for the completion provider.
pub const OPENROUTER_KEY: &str = "OPENROUTER_KEY";
/// Credential for the uniqueness checker.
pub const TEXT_RU_KEY: &str = "TEXT_RU_KEY";

pub const DEFAULT_BASE: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// A string key-value property store.
///
/// Components that need defaults or credentials receive a store explicitly;
/// nothing in the markup pipeline reads settings.
pub trait SettingsStore {
    /// Returns `None` for unset or empty values.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// The configured default model, falling back to [`DEFAULT_MODEL`].
pub fn default_model(store: &dyn SettingsStore) -> String {
    store
        .get(OPENROUTER_MODEL)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// The configured completion endpoint, falling back to [`DEFAULT_BASE`].
pub fn completion_endpoint(store: &dyn SettingsStore) -> String {
    store
        .get(OPENROUTER_BASE)
        .unwrap_or_else(|| DEFAULT_BASE.to_string())
}

/// Process-local settings, mainly for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
