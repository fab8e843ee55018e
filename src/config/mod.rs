use anyhow::{anyhow, Context, Result};
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Process-wide settings, read once before the listener starts.
///
/// Values come from the environment (and a `.env` file when `main` loaded one):
/// `GOOGLE_API_KEY` is required, everything else has a default.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub provider: ProviderConfig,
    /// `None` lets a provider call run for as long as the host allows.
    pub provider_timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: Option<f32>,
}

// Keeps the key out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("GOOGLE_API_KEY must be set"))?;

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = lookup("GEMINI_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let temperature = lookup("GEMINI_TEMPERATURE")
            .map(|raw| {
                raw.trim()
                    .parse::<f32>()
                    .with_context(|| format!("GEMINI_TEMPERATURE is not a number: {raw}"))
            })
            .transpose()?;

        let bind_addr = lookup("QUIZ_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let timeout_secs = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("PROVIDER_TIMEOUT_SECS is not a whole number of seconds: {raw}")
            })?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };
        let provider_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            bind_addr,
            provider: ProviderConfig {
                api_key,
                model,
                api_base,
                temperature,
            },
            provider_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = load(&[("GOOGLE_API_KEY", "k")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.provider.model, "gemini-1.5-flash");
        assert_eq!(config.provider.api_base, DEFAULT_API_BASE);
        assert_eq!(config.provider.temperature, None);
        assert_eq!(config.provider_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));

        assert!(load(&[("GOOGLE_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = load(&[("GOOGLE_API_KEY", "k"), ("PROVIDER_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(config.provider_timeout, None);
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert!(load(&[("GOOGLE_API_KEY", "k"), ("PROVIDER_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("GOOGLE_API_KEY", "k"), ("GEMINI_TEMPERATURE", "warm")]).is_err());
    }

    #[test]
    fn overrides_and_trims_base_url() {
        let config = load(&[
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_API_BASE", "http://localhost:9000/"),
            ("GEMINI_TEMPERATURE", "0.4"),
            ("QUIZ_BIND_ADDR", "127.0.0.1:3000"),
        ])
        .unwrap();
        assert_eq!(config.provider.model, "gemini-2.0-flash");
        assert_eq!(config.provider.api_base, "http://localhost:9000");
        assert_eq!(config.provider.temperature, Some(0.4));
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = load(&[("GOOGLE_API_KEY", "super-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
