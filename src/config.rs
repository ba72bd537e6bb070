use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// All settings can be configured via environment variables with the `EMOTION_` prefix.
/// For example: `EMOTION_SERVER__PORT=8000`, `EMOTION_MODELS__FACE_MODEL=/srv/face_model.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Model artifact locations
    #[serde(default)]
    pub models: ModelPathsConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Paths of the four serialized artifacts read at startup.
///
/// Relative paths resolve against the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelPathsConfig {
    #[serde(default = "default_text_model")]
    pub text_model: PathBuf,

    #[serde(default = "default_vectorizer")]
    pub vectorizer: PathBuf,

    #[serde(default = "default_face_model")]
    pub face_model: PathBuf,

    #[serde(default = "default_face_scaler")]
    pub face_scaler: PathBuf,
}

impl Default for ModelPathsConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            vectorizer: default_vectorizer(),
            face_model: default_face_model(),
            face_scaler: default_face_scaler(),
        }
    }
}

fn default_text_model() -> PathBuf {
    PathBuf::from("text_model.json")
}

fn default_vectorizer() -> PathBuf {
    PathBuf::from("vectorizer.json")
}

fn default_face_model() -> PathBuf {
    PathBuf::from("face_model.json")
}

fn default_face_scaler() -> PathBuf {
    PathBuf::from("face_scaler.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ServerConfig {
    /// Returns the socket address for binding the server
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables should be prefixed with `EMOTION_` and use
    /// double underscores for nested values:
    /// - `EMOTION_SERVER__HOST` -> server.host
    /// - `EMOTION_SERVER__PORT` -> server.port
    /// - `EMOTION_MODELS__TEXT_MODEL` -> models.text_model
    /// - `EMOTION_MODELS__VECTORIZER` -> models.vectorizer
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("EMOTION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.models.text_model, PathBuf::from("text_model.json"));
        assert_eq!(config.models.vectorizer, PathBuf::from("vectorizer.json"));
        assert_eq!(config.models.face_model, PathBuf::from("face_model.json"));
        assert_eq!(config.models.face_scaler, PathBuf::from("face_scaler.json"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        let addr = server.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let server = ServerConfig {
            host: "not a host".to_string(),
            port: 8000,
        };
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_partial_models_section_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"models": {"face_model": "/srv/face.json"}}"#).unwrap();
        assert_eq!(config.models.face_model, PathBuf::from("/srv/face.json"));
        assert_eq!(config.models.text_model, PathBuf::from("text_model.json"));
        assert_eq!(config.server.port, 8000);
    }
}
