//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.parley/config.json`) and environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::chat::HISTORY_RENDER_LIMIT;
use crate::i18n::Language;
use crate::tokens::DEFAULT_CHARS_PER_TOKEN;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Chat transcript settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// UI settings (language).
    #[serde(default)]
    pub ui: UiConfig,

    /// Token estimator tuning.
    #[serde(default)]
    pub tokens: TokensConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    /// History messages rendered before older ones are hidden behind a notice (default 200).
    #[serde(default = "default_history_render_limit")]
    pub history_render_limit: usize,

    /// Show tool results and tool output in the transcript.
    #[serde(default)]
    pub show_thinking: bool,

    /// Session used when none is given (default "main").
    #[serde(default = "default_session_key")]
    pub default_session_key: String,
}

fn default_history_render_limit() -> usize {
    HISTORY_RENDER_LIMIT
}

fn default_session_key() -> String {
    "main".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_render_limit: default_history_render_limit(),
            show_thinking: false,
            default_session_key: default_session_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// "en" or "zh". Overridden by PARLEY_LANGUAGE env.
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensConfig {
    /// Latin characters per estimated token (default 4).
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: u32,
}

fn default_chars_per_token() -> u32 {
    DEFAULT_CHARS_PER_TOKEN
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            chars_per_token: default_chars_per_token(),
        }
    }
}

/// Resolve the UI language: env PARLEY_LANGUAGE overrides config. Unknown values are ignored.
pub fn resolve_language(config: &Config) -> Language {
    std::env::var("PARLEY_LANGUAGE")
        .ok()
        .and_then(|s| {
            let parsed = Language::parse(&s);
            if parsed.is_none() && !s.trim().is_empty() {
                log::warn!("ignoring unknown PARLEY_LANGUAGE {:?}", s);
            }
            parsed
        })
        .unwrap_or(config.ui.language)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("PARLEY_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".parley").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path (or PARLEY_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let mut config: Config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    if config.chat.history_render_limit == 0 {
        log::warn!("chat.historyRenderLimit must be at least 1, using 1");
        config.chat.history_render_limit = 1;
    }
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.chat.history_render_limit, 200);
        assert!(!c.chat.show_thinking);
        assert_eq!(c.chat.default_session_key, "main");
        assert_eq!(c.ui.language, Language::En);
        assert_eq!(c.tokens.chars_per_token, 4);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: Config =
            serde_json::from_str(r#"{ "chat": { "showThinking": true }, "ui": { "language": "zh" } }"#)
                .unwrap();
        assert!(c.chat.show_thinking);
        assert_eq!(c.chat.history_render_limit, 200);
        assert_eq!(c.ui.language, Language::Zh);
        assert_eq!(c.tokens.chars_per_token, 4);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("parley-missing-{}.json", uuid::Uuid::new_v4()));
        let (c, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(c.chat.history_render_limit, 200);
    }

    #[test]
    fn zero_history_limit_is_clamped() {
        let path = std::env::temp_dir().join(format!("parley-zero-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "chat": { "historyRenderLimit": 0 } }"#).unwrap();
        let (c, _) = load_config(Some(path.clone())).unwrap();
        assert_eq!(c.chat.history_render_limit, 1);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("parley-bad-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
        let _ = std::fs::remove_file(path);
    }
}
