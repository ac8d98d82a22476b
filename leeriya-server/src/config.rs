use std::time::Duration;

use anyhow::Context;

/// Environment-backed settings. All fields have the defaults the
/// original service shipped with; only `TOKEN_SECRET` should ever be
/// overridden in a real deployment.
pub struct Config {
    pub app_name: String,
    pub app_env: String,
    pub cors_origins: Vec<String>,
    pub token_secret: String,
    pub token_ttl_seconds: i64,
    pub reservation_ttl: Duration,
    pub use_mock_lyria: bool,
    pub remote_api_key: Option<String>,
    pub remote_model: String,
    pub remote_ws_endpoint: String,
    pub room_idle_timeout: Duration,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_name: "leeriya-server".to_string(),
            app_env: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            token_secret: "dev-secret-change-me".to_string(),
            token_ttl_seconds: 86_400,
            reservation_ttl: Duration::from_secs(30),
            use_mock_lyria: true,
            remote_api_key: None,
            remote_model: "models/lyria-realtime-exp".to_string(),
            remote_ws_endpoint: "wss://generativelanguage.googleapis.com/ws/live".to_string(),
            room_idle_timeout: Duration::from_secs(1800),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        let mut config = Config::default();

        if let Ok(v) = std::env::var("APP_NAME") {
            config.app_name = v;
        }
        if let Ok(v) = std::env::var("APP_ENV") {
            config.app_env = v;
        }
        if let Ok(v) = std::env::var("CORS_ORIGINS") {
            config.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = std::env::var("TOKEN_SECRET") {
            config.token_secret = v;
        }
        if let Ok(v) = std::env::var("TOKEN_TTL_SECONDS") {
            config.token_ttl_seconds = v.parse().context("TOKEN_TTL_SECONDS must be an integer")?;
        }
        if let Ok(v) = std::env::var("RESERVATION_TTL_SECONDS") {
            let secs: u64 = v.parse().context("RESERVATION_TTL_SECONDS must be an integer")?;
            config.reservation_ttl = Duration::from_secs(secs);
        }
        if let Ok(v) = std::env::var("USE_MOCK_LYRIA") {
            config.use_mock_lyria = parse_bool(&v).context("USE_MOCK_LYRIA must be a boolean")?;
        }
        if let Ok(v) = std::env::var("GEMINI_API_KEY") {
            config.remote_api_key = Some(v);
        }
        if let Ok(v) = std::env::var("GEMINI_MODEL") {
            config.remote_model = v;
        }
        if let Ok(v) = std::env::var("REMOTE_WS_ENDPOINT") {
            config.remote_ws_endpoint = v;
        }
        if let Ok(v) = std::env::var("ROOM_IDLE_TIMEOUT_SECONDS") {
            let secs: u64 = v.parse().context("ROOM_IDLE_TIMEOUT_SECONDS must be an integer")?;
            config.room_idle_timeout = Duration::from_secs(secs);
        }
        if let Ok(v) = std::env::var("BIND_ADDR") {
            config.bind_addr = v;
        }

        // Unconditionally the mock if no API key is configured.
        if config.remote_api_key.is_none() {
            config.use_mock_lyria = true;
        }

        Ok(config)
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_service_defaults() {
        let config = Config::default();
        assert_eq!(config.app_name, "leeriya-server");
        assert_eq!(config.token_ttl_seconds, 86_400);
        assert_eq!(config.reservation_ttl, Duration::from_secs(30));
        assert_eq!(config.room_idle_timeout, Duration::from_secs(1800));
        assert!(config.use_mock_lyria);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("nah"), None);
    }
}
