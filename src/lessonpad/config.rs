use crate::error::{LessonError, Result};
use crate::repository::DEFAULT_KEY_PREFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Keys accepted by `get`/`set`, in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "key-prefix",
    "ai-model",
    "ai-base-url",
    "ai-api-key-env",
    "ai-timeout",
];

/// Settings for the AI completion endpoint.
///
/// The API key itself is never stored here, only the name of the environment
/// variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AiConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Configuration for lessonpad, stored in `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonpadConfig {
    /// Namespace prefix for lesson keys in the store
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default)]
    pub ai: AiConfig,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

impl Default for LessonpadConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            ai: AiConfig::default(),
        }
    }
}

impl LessonpadConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(LessonError::Io)?;
        let config: LessonpadConfig =
            serde_json::from_str(&content).map_err(LessonError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(LessonError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(LessonError::Serialization)?;
        fs::write(config_path, content).map_err(LessonError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "key-prefix" => Some(self.key_prefix.clone()),
            "ai-model" => Some(self.ai.model.clone()),
            "ai-base-url" => Some(self.ai.base_url.clone()),
            "ai-api-key-env" => Some(self.ai.api_key_env.clone()),
            "ai-timeout" => Some(self.ai.timeout_secs.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Value for {} cannot be empty", key));
        }
        match key {
            "key-prefix" => {
                if value.contains(char::is_whitespace) {
                    return Err("key-prefix cannot contain whitespace".to_string());
                }
                self.key_prefix = value.to_string();
            }
            "ai-model" => self.ai.model = value.to_string(),
            "ai-base-url" => self.ai.base_url = value.to_string(),
            "ai-api-key-env" => self.ai.api_key_env = value.to_string(),
            "ai-timeout" => {
                self.ai.timeout_secs = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| format!("Invalid timeout: {} (expected seconds)", value))?;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// All `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = LessonpadConfig::default();
        assert_eq!(config.key_prefix, "lessonPlan");
        assert_eq!(config.ai.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = LessonpadConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, LessonpadConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = LessonpadConfig::default();
        config.set("ai-model", "gemini-1.5-pro").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = LessonpadConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.ai.model, "gemini-1.5-pro");
        assert_eq!(loaded.key_prefix, "lessonPlan");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"ai":{"model":"custom"}}"#,
        )
        .unwrap();

        let loaded = LessonpadConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.ai.model, "custom");
        assert_eq!(loaded.ai.timeout_secs, 60);
        assert_eq!(loaded.key_prefix, "lessonPlan");
    }

    #[test]
    fn test_set_timeout_validates() {
        let mut config = LessonpadConfig::default();
        assert!(config.set("ai-timeout", "abc").is_err());
        assert!(config.set("ai-timeout", "0").is_err());
        config.set("ai-timeout", "15").unwrap();
        assert_eq!(config.get("ai-timeout").as_deref(), Some("15"));
    }

    #[test]
    fn test_set_rejects_unknown_and_empty() {
        let mut config = LessonpadConfig::default();
        assert!(config.set("color", "blue").is_err());
        assert!(config.set("ai-model", "  ").is_err());
        assert!(config.set("key-prefix", "lesson plan").is_err());
    }

    #[test]
    fn test_entries_cover_all_keys() {
        let entries = LessonpadConfig::default().entries();
        assert_eq!(entries.len(), CONFIG_KEYS.len());
        assert_eq!(entries[0], ("key-prefix", "lessonPlan".to_string()));
    }
}
