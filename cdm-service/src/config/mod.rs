use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default Gemini model; must support the Google Search tool.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Gemini REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct CdmConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Empty when `GEMINI_API_KEY` is unset; calls then fail at the remote.
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
}

impl GeminiSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl CdmConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let api_key = match env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!("GEMINI_API_KEY is not set; model calls will fail until it is provided");
                String::new()
            }
        };

        Ok(CdmConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
                api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_uses_default_for_unset_key() {
        assert_eq!(
            env_or("CDM_SERVICE_TEST_SURELY_UNSET_KEY", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn empty_api_key_is_reported_as_missing() {
        let settings = GeminiSettings {
            api_key: Secret::new(String::new()),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        };
        assert!(!settings.has_api_key());
    }
}
