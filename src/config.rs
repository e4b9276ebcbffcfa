use std::env;
use std::time::Duration;

/// Process-wide configuration, read from the environment exactly once at
/// startup and passed by reference into constructors. Business logic never
/// touches the environment directly.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// EIA open-data key; absent means the oil path runs on synthetic data.
    pub eia_api_key: Option<String>,
    /// openexchangerates.org app id; absent means fixed/synthetic FX.
    pub oxr_app_id: Option<String>,
    /// OpenWeatherMap key; absent means canned weather.
    pub openweather_api_key: Option<String>,
    /// OpenRouter key; absent means template-only response synthesis.
    pub openrouter_api_key: Option<String>,
    /// Chat model slug sent to OpenRouter.
    pub llm_model: String,
    /// Upper bound on every external call.
    pub request_timeout: Duration,
}

const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl AppConfig {
    /// Load from the environment, picking up a `.env` file if present.
    /// Empty variables are treated as absent.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            eia_api_key: non_empty_var("EIA_API_KEY"),
            oxr_app_id: non_empty_var("OPENEXCHANGERATES_APP_ID"),
            openweather_api_key: non_empty_var("OPENWEATHER_API_KEY"),
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            llm_model: non_empty_var("LLM_MODEL")
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Configuration with no credentials at all: every fetch goes synthetic
    /// and responses use the template path. This is what tests run on.
    pub fn offline() -> Self {
        Self {
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ..Default::default()
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
