use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_agent_url() -> String {
    "http://127.0.0.1:5051".to_string()
}

fn default_phones_file() -> String {
    "phones.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the session-agent sidecar holding the platform sessions.
    #[serde(default = "default_agent_url")]
    pub agent_url: String,
    #[serde(default = "default_phones_file")]
    pub phones_file: String,
    /// When set, tracing also writes daily-rolling files here.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Load from a TOML file (optional) with `ADDER_*` env overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("ADDER"))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }
}
