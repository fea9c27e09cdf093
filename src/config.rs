use std::env;
use std::time::Duration;

/// Environment variables checked for the provider key, in order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for the image generation provider.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Provider key; `None` makes every generation fail without a request.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL of the REST API, without a trailing slash.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl GeneratorConfig {
    /// Defaults with the API key taken from the environment.
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| env::var(var).ok())
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_joins_endpoint_and_model() {
        let cfg = GeneratorConfig {
            endpoint: "http://localhost:9000/v1/".into(),
            model: "m1".into(),
            ..GeneratorConfig::default()
        };
        assert_eq!(cfg.generate_url(), "http://localhost:9000/v1/models/m1:generateContent");
    }
}
