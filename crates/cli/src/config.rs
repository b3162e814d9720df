//! Configuration loading from rekaliber.toml.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const CONFIG_FILE: &str = "rekaliber.toml";

/// Top-level configuration.
///
/// Every field has a default, so an absent file is a valid setup.
/// Environment variables override the file (`REKALIBER_MODEL`,
/// `REKALIBER_TEMPERATURE`, `OLLAMA_HOST`, `REKALIBER_HOST`,
/// `REKALIBER_PORT`, `REKALIBER_DEBUG`, `REKALIBER_DB`).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Ollama model to drive the conversation.
    pub name: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Ollama server address.
    pub base_url: String,

    /// Deadline for each model completion, in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "llama3.2:latest".to_string(),
            temperature: 0.5,
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Verbose mode: raw tool payloads in responses and error detail in
    /// failures.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/propiedades.db"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the effective configuration: the given file, or
    /// `rekaliber.toml` if present, or defaults — then environment
    /// overrides on top.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::load(CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("REKALIBER_MODEL") {
            self.model.name = v;
        }
        if let Ok(v) = std::env::var("REKALIBER_TEMPERATURE") {
            if let Ok(t) = v.parse() {
                self.model.temperature = t;
            }
        }
        if let Ok(v) = std::env::var("OLLAMA_HOST") {
            self.model.base_url = v;
        }
        if let Ok(v) = std::env::var("REKALIBER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = std::env::var("REKALIBER_PORT") {
            if let Ok(p) = v.parse() {
                self.server.port = p;
            }
        }
        if let Ok(v) = std::env::var("REKALIBER_DEBUG") {
            self.server.debug = v.eq_ignore_ascii_case("true") || v == "1";
        }
        if let Ok(v) = std::env::var("REKALIBER_DB") {
            self.storage.db_path = PathBuf::from(v);
        }
    }

    /// The listen address for the HTTP server.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigError::Addr(format!("{}:{}", self.server.host, self.server.port))
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid listen address: {0}")]
    Addr(String),
}
