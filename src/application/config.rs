use crate::core::notifier::{EventKind, NotifierConfig, TransportMethod};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub notifiers: Vec<NotifierConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut heartbeat = NotifierConfig::new(
            "heartbeat",
            TransportMethod::HttpPost,
            "https://hooks.example.com/heartbeat",
            EventKind::Heartbeat,
        );
        heartbeat.enabled = false;

        Self {
            log_level: default_log_level(),
            notifiers: vec![heartbeat],
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    pub fn init_default(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
