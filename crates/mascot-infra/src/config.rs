//! Configuration loader and environment credentials.
//!
//! Reads `mascot.toml` and deserializes it into [`AppConfig`]. Falls back
//! to defaults when the file is missing or malformed. API keys never live
//! in the config file; they are read from the environment into
//! [`secrecy::SecretString`]s.

use std::path::Path;

use secrecy::SecretString;

use mascot_types::config::AppConfig;

/// Environment variable holding the chat-model API key (required).
pub const ENV_CHAT_API_KEY: &str = "MASCOT_GEMINI_API_KEY";
/// Environment variable holding the utility-model API key (optional).
pub const ENV_UTILITY_API_KEY: &str = "MASCOT_OPENAI_API_KEY";
/// Environment variable holding the search API key (optional).
pub const ENV_SEARCH_API_KEY: &str = "MASCOT_SEARCH_API_KEY";
/// Environment variable holding the search engine id (optional).
pub const ENV_SEARCH_ENGINE_ID: &str = "MASCOT_SEARCH_ENGINE_ID";

/// Load application configuration from a TOML file.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - Otherwise returns the parsed config.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// API credentials resolved from the environment.
#[derive(Debug)]
pub struct ApiCredentials {
    /// Key for the chat (function-calling) model. Required.
    pub chat_api_key: SecretString,
    /// Key for the utility model. Absence disables seasonal/narrative
    /// generation.
    pub utility_api_key: Option<SecretString>,
    /// Key for the search API. Absence (of either part) disables the tool.
    pub search_api_key: Option<SecretString>,
    pub search_engine_id: Option<String>,
}

impl ApiCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through a lookup function (tests inject one).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let chat_api_key = get(ENV_CHAT_API_KEY)
            .map(SecretString::from)
            .ok_or_else(|| anyhow::anyhow!("{ENV_CHAT_API_KEY} is not set"))?;

        Ok(Self {
            chat_api_key,
            utility_api_key: get(ENV_UTILITY_API_KEY).map(SecretString::from),
            search_api_key: get(ENV_SEARCH_API_KEY).map(SecretString::from),
            search_engine_id: get(ENV_SEARCH_ENGINE_ID),
        })
    }

    /// Whether both halves of the search credentials are present.
    pub fn search_enabled(&self) -> bool {
        self.search_api_key.is_some() && self.search_engine_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_config_missing_file_returns_default() {
        let config = load_config(Path::new("/nonexistent/mascot.toml")).await;
        assert_eq!(config.server.port, 8787);
    }

    #[tokio::test]
    async fn test_load_config_valid_toml_returns_parsed() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = 9100\n\n[news]\nrecurring_interval = 4\n")
            .unwrap();
        let config = load_config(file.path()).await;
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.news.recurring_interval, 4);
        assert_eq!(config.llm.chat_model, "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml_returns_default() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not { valid toml !!!").unwrap();
        let config = load_config(file.path()).await;
        assert_eq!(config.server.port, 8787);
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credentials_require_chat_key() {
        let vars = env(&[]);
        let err = ApiCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_CHAT_API_KEY));
    }

    #[test]
    fn test_credentials_optional_parts() {
        let vars = env(&[(ENV_CHAT_API_KEY, "g-key")]);
        let creds = ApiCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert!(creds.utility_api_key.is_none());
        assert!(!creds.search_enabled());
    }

    #[test]
    fn test_search_needs_both_halves() {
        let vars = env(&[(ENV_CHAT_API_KEY, "g-key"), (ENV_SEARCH_API_KEY, "s-key")]);
        let creds = ApiCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert!(!creds.search_enabled());

        let vars = env(&[
            (ENV_CHAT_API_KEY, "g-key"),
            (ENV_SEARCH_API_KEY, "s-key"),
            (ENV_SEARCH_ENGINE_ID, "cx"),
        ]);
        let creds = ApiCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert!(creds.search_enabled());
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let vars = env(&[(ENV_CHAT_API_KEY, "   ")]);
        assert!(ApiCredentials::from_lookup(|name| vars.get(name).cloned()).is_err());
    }
}
