use std::collections::HashMap;
use std::path::Path;

use crate::error::{Context, Result};

/// Environment variable holding the market-data API key.
pub const API_KEY_ENV: &str = "MASSIVE_API_KEY";
/// Optional override for the API host, mostly useful against a staging server.
pub const BASE_URL_ENV: &str = "MASSIVE_API_BASE_URL";
/// Value shipped in `.env.example`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";
pub const DEFAULT_BASE_URL: &str = "https://api.massive.com";
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    /// Build configuration from the process environment, after loading `.env` when present.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => log::debug!("No {} file found", DEFAULT_ENV_FILE),
            Err(err) => return Err(err.into()),
        }
        Ok(Self::from_lookup(|name| std::env::var(name).ok()))
    }

    /// Read an env file without touching the process environment.
    ///
    /// Process variables still take precedence over values from the file.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file_vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to open env file {}", path.display()))?
        {
            let (key, value) =
                item.with_context(|| format!("Failed to parse env file {}", path.display()))?;
            file_vars.insert(key, value);
        }

        Ok(Self::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        }))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let base_url = lookup(BASE_URL_ENV)
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self { api_key, base_url }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn is_placeholder_key(&self) -> bool {
        is_placeholder_key(&self.api_key)
    }

    /// Short, log-safe rendering of the key: first 8 and last 4 characters.
    pub fn key_preview(&self) -> String {
        crate::utils::key_preview(&self.api_key)
    }
}

/// True when the key is absent or still the template value.
pub fn is_placeholder_key(api_key: &str) -> bool {
    api_key.is_empty() || api_key == PLACEHOLDER_API_KEY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_key_defaults_to_empty_and_default_host() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.api_key, "");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.has_api_key());
        assert!(config.is_placeholder_key());
    }

    #[test]
    fn placeholder_key_is_detected() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_ENV, PLACEHOLDER_API_KEY)]));

        assert!(config.has_api_key());
        assert!(config.is_placeholder_key());
        assert!(!is_placeholder_key("real-key"));
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_ENV, " abc "),
            (BASE_URL_ENV, "http://127.0.0.1:9000/"),
        ]));

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn blank_base_url_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[(BASE_URL_ENV, "   ")]));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn reads_values_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp env file");
        writeln!(file, "# local settings").unwrap();
        writeln!(file, "{BASE_URL_ENV}=https://staging.example.test").unwrap();
        file.flush().unwrap();

        let config = Config::from_env_file(file.path()).expect("env file should parse");

        if std::env::var(BASE_URL_ENV).is_err() {
            assert_eq!(config.base_url, "https://staging.example.test");
        }
    }

    #[test]
    fn missing_env_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = Config::from_env_file(dir.path().join("absent.env"))
            .expect_err("missing file should fail");
        assert!(err.to_string().contains("Failed to open env file"));
    }

    #[test]
    fn shipped_env_example_holds_the_placeholder() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let config = Config::from_env_file(root.join(".env.example")).expect("load .env.example");

        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(config.api_key, PLACEHOLDER_API_KEY);
        }
        if std::env::var(BASE_URL_ENV).is_err() {
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn key_preview_masks_the_middle() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_ENV, "abcdefgh12345678wxyz")]));
        assert_eq!(config.key_preview(), "abcdefgh...wxyz");
    }
}
