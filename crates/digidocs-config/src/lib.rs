use digidocs_engine::settings::{
    DEFAULT_BASE, DEFAULT_MODEL, OPENROUTER_BASE, OPENROUTER_KEY, OPENROUTER_MODEL,
    SettingsStore, TEMPLATE_ID, TEXT_RU_KEY,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MASK: &str = "••••";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Persisted digidocs settings.
///
/// Every value is optional; consumers fall back to the engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_ru_key: Option<String>,
    /// Where rendered documents are written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// A settings change as submitted by a settings form.
///
/// Credentials, base and model are only replaced by non-empty values; the
/// template id is replaced whenever it is present, even by an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SettingsUpdate {
    pub openrouter_key: Option<String>,
    pub text_ru_key: Option<String>,
    pub template_id: Option<String>,
    pub openrouter_base: Option<String>,
    pub openrouter_model: Option<String>,
}

/// Settings safe to display: defaults filled in, credentials masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MaskedSettings {
    pub openrouter_base: String,
    pub openrouter_model: String,
    pub template_id: String,
    pub openrouter_key_masked: String,
    pub text_ru_key_masked: String,
}

/// Shows the first and last four characters of a credential.
///
/// Unset keys mask to an empty string and keys of up to eight characters are
/// hidden completely.
pub fn mask_key(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return String::new();
    };
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return MASK.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{MASK}{tail}")
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the output directory
        config.output_dir = config
            .output_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        log::info!("Saved settings to {}", config_path.display());
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/digidocs");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    fn slot(&self, key: &str) -> Option<&Option<String>> {
        match key {
            OPENROUTER_BASE => Some(&self.openrouter_base),
            OPENROUTER_MODEL => Some(&self.openrouter_model),
            TEMPLATE_ID => Some(&self.template_id),
            OPENROUTER_KEY => Some(&self.openrouter_key),
            TEXT_RU_KEY => Some(&self.text_ru_key),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            OPENROUTER_BASE => Some(&mut self.openrouter_base),
            OPENROUTER_MODEL => Some(&mut self.openrouter_model),
            TEMPLATE_ID => Some(&mut self.template_id),
            OPENROUTER_KEY => Some(&mut self.openrouter_key),
            TEXT_RU_KEY => Some(&mut self.text_ru_key),
            _ => None,
        }
    }

    /// Applies a settings form submission and returns the masked result.
    pub fn apply_update(&mut self, update: SettingsUpdate) -> MaskedSettings {
        let replacements = [
            (OPENROUTER_KEY, update.openrouter_key),
            (TEXT_RU_KEY, update.text_ru_key),
            (OPENROUTER_BASE, update.openrouter_base),
            (OPENROUTER_MODEL, update.openrouter_model),
        ];
        for (key, value) in replacements {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                self.set(key, value.trim());
            }
        }
        if let Some(template_id) = update.template_id {
            self.set(TEMPLATE_ID, template_id.trim());
        }

        self.masked()
    }

    pub fn masked(&self) -> MaskedSettings {
        MaskedSettings {
            openrouter_base: self
                .get(OPENROUTER_BASE)
                .unwrap_or_else(|| DEFAULT_BASE.to_string()),
            openrouter_model: self
                .get(OPENROUTER_MODEL)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            template_id: self.get(TEMPLATE_ID).unwrap_or_default(),
            openrouter_key_masked: mask_key(self.openrouter_key.as_deref()),
            text_ru_key_masked: mask_key(self.text_ru_key.as_deref()),
        }
    }
}

impl SettingsStore for Config {
    fn get(&self, key: &str) -> Option<String> {
        self.slot(key)?.as_ref().filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.slot_mut(key) {
            Some(slot) => *slot = Some(value.to_string()),
            None => log::warn!("Ignoring unknown setting {key}"),
        }
    }
}
