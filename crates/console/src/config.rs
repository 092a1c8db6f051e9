use anyhow::Context;
use llm_client::LlmConfig;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MAX_SESSIONS: usize = 256;
const API_KEY_ENV_VARS: [&str; 2] = ["GOVLENS_API_KEY", "GROQ_API_KEY"];

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConsoleConfig {
    #[serde(default)]
    pub(crate) server: ServerConfig,
    #[serde(default)]
    pub(crate) llm: LlmSection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerConfig {
    #[serde(default = "default_max_sessions")]
    pub(crate) max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LlmSection {
    #[serde(flatten)]
    pub(crate) client: LlmConfig,
    pub(crate) api_key: Option<String>,
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

/// A missing file means defaults; a file that exists must parse.
pub(crate) fn load_console_config(path: &Path) -> anyhow::Result<ConsoleConfig> {
    if !path.exists() {
        tracing::info!(config = %path.display(), "config file not found, using defaults");
        return Ok(ConsoleConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_console_config(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

pub(crate) fn parse_console_config(raw: &str) -> anyhow::Result<ConsoleConfig> {
    let config: ConsoleConfig = toml::from_str(raw)?;
    if config.server.max_sessions == 0 {
        anyhow::bail!("server.max_sessions must be at least 1");
    }
    if config.llm.client.base_url.trim().is_empty() {
        anyhow::bail!("llm.base_url cannot be empty");
    }
    Ok(config)
}

/// Environment wins over the config file. Blank values count as unset.
pub(crate) fn resolve_api_key(
    config: &ConsoleConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| env(name))
        .chain(config.llm.api_key.clone())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_console_config("").expect("config");
        assert_eq!(config.server.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.llm.client, LlmConfig::default());
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn reads_llm_section() {
        let config = parse_console_config(
            r#"
            [server]
            max_sessions = 8

            [llm]
            base_url = "http://127.0.0.1:9999"
            model = "llama-3.3-70b-versatile"
            max_tokens = 1500
            api_key = "gsk_file"
            "#,
        )
        .expect("config");
        assert_eq!(config.server.max_sessions, 8);
        assert_eq!(config.llm.client.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.llm.client.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.client.max_tokens, 1500);
        assert_eq!(config.llm.client.chat_path, "/v1/chat/completions");
        assert_eq!(config.llm.api_key.as_deref(), Some("gsk_file"));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(parse_console_config("[server]\nmax_sessions = 0").is_err());
        assert!(parse_console_config("[llm]\nbase_url = \" \"").is_err());
        assert!(parse_console_config("[llm]\ntemperature = \"hot\"").is_err());
    }

    #[test]
    fn environment_key_overrides_file() {
        let config = parse_console_config("[llm]\napi_key = \"gsk_file\"").expect("config");
        let key = resolve_api_key(&config, |name| {
            (name == "GROQ_API_KEY").then(|| "gsk_env".to_string())
        });
        assert_eq!(key.as_deref(), Some("gsk_env"));

        let key = resolve_api_key(&config, |_| Some("   ".to_string()));
        assert_eq!(key.as_deref(), Some("gsk_file"));

        let empty = ConsoleConfig::default();
        assert_eq!(resolve_api_key(&empty, |_| None), None);
    }
}
