use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-flash";
pub const DEFAULT_DAILY_LIMIT: i32 = 5;

/// Application configuration loaded from environment variables.
///
/// Authentication is out of scope for this service, so all requests run as
/// `default_user_id` unless the deployment overrides it.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_title_tokens: u32,
    pub request_timeout: Duration,
    pub max_daily_generations: i32,
    pub default_user_id: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut values = HashMap::new();
        for (key, default) in Self::tracked_keys() {
            let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
            values.insert(key.to_string(), value);
        }
        Self::from_map(&values)
    }

    /// Build a config from explicit values, falling back to the environment
    /// and then to defaults. Tests use this to avoid touching process env.
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        fn prioritized_value(values: &HashMap<String, String>, key: &str) -> Option<String> {
            values
                .get(key)
                .cloned()
                .filter(|value| !value.is_empty())
                .or_else(|| std::env::var(key).ok().filter(|value| !value.is_empty()))
        }

        fn read(values: &HashMap<String, String>, key: &str, default: &str) -> String {
            prioritized_value(values, key).unwrap_or_else(|| default.to_string())
        }

        let temperature = prioritized_value(values, "FLASHGEN_TEMPERATURE")
            .and_then(|value| value.parse().ok())
            .unwrap_or(0.3);
        let max_title_tokens = prioritized_value(values, "FLASHGEN_TITLE_MAX_TOKENS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);
        let timeout_secs = prioritized_value(values, "FLASHGEN_TIMEOUT_SECS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);
        let max_daily_generations = prioritized_value(values, "FLASHGEN_DAILY_LIMIT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_DAILY_LIMIT);

        Self {
            api_key: read(values, "OPENROUTER_API_KEY", ""),
            base_url: read(values, "OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
            model: read(values, "FLASHGEN_MODEL", DEFAULT_MODEL),
            temperature,
            max_title_tokens,
            request_timeout: Duration::from_secs(timeout_secs),
            max_daily_generations,
            default_user_id: read(
                values,
                "FLASHGEN_USER_ID",
                "00000000-0000-0000-0000-000000000000",
            ),
        }
    }

    fn tracked_keys() -> [(&'static str, &'static str); 8] {
        [
            ("OPENROUTER_API_KEY", ""),
            ("OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
            ("FLASHGEN_MODEL", DEFAULT_MODEL),
            ("FLASHGEN_TEMPERATURE", "0.3"),
            ("FLASHGEN_TITLE_MAX_TOKENS", "30"),
            ("FLASHGEN_TIMEOUT_SECS", "30"),
            ("FLASHGEN_DAILY_LIMIT", "5"),
            ("FLASHGEN_USER_ID", "00000000-0000-0000-0000-000000000000"),
        ]
    }
}
