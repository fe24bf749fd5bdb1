use serde::Deserialize;

use textcam_gateway::DEFAULT_MAX_BODY_BYTES;
use textcam_ui::CameraOffPolicy;

/// textcam runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Gateway base URL used by `analyze` and `status`
    pub gateway_url: String,
    /// Maximum accepted request body
    pub max_body_bytes: usize,
    /// Directory for the rolling JSON log; `None` logs to the console only
    pub log_dir: Option<String>,
    /// Log level
    pub log_level: String,
    pub camera_off_policy: CameraOffPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            gateway_url: "http://localhost:3000".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_dir: Some("logs".to_string()),
            log_level: "info".to_string(),
            camera_off_policy: CameraOffPolicy::KeepStill,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_address: lookup("TEXTCAM_BIND").unwrap_or(defaults.bind_address),
            port: lookup("TEXTCAM_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            gateway_url: lookup("TEXTCAM_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            max_body_bytes: lookup("TEXTCAM_MAX_BODY_BYTES")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            log_dir: match lookup("TEXTCAM_LOG_DIR") {
                Some(dir) if dir.is_empty() => None,
                Some(dir) => Some(dir),
                None => defaults.log_dir,
            },
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            camera_off_policy: match lookup("TEXTCAM_CLEAR_STILL_ON_CAMERA_OFF").as_deref() {
                Some("1") | Some("true") | Some("yes") => CameraOffPolicy::ClearStill,
                _ => CameraOffPolicy::KeepStill,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.max_body_bytes, 20 * 1024 * 1024);
        assert_eq!(config.log_dir.as_deref(), Some("logs"));
        assert_eq!(config.camera_off_policy, CameraOffPolicy::KeepStill);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TEXTCAM_PORT", "8088"),
            ("TEXTCAM_GATEWAY_URL", "http://10.0.0.2:8088"),
            ("TEXTCAM_LOG_DIR", ""),
            ("TEXTCAM_CLEAR_STILL_ON_CAMERA_OFF", "true"),
        ]);
        assert_eq!(config.port, 8088);
        assert_eq!(config.gateway_url, "http://10.0.0.2:8088");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.camera_off_policy, CameraOffPolicy::ClearStill);
    }

    #[test]
    fn test_unparseable_port_falls_back() {
        assert_eq!(load(&[("TEXTCAM_PORT", "http")]).port, 3000);
    }
}
