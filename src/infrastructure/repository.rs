use crate::core::{
    error::{NotifyError, NotifyResult},
    notifier::{NotifierConfig, NotifierRegistry},
};
use async_trait::async_trait;
use serde_json::{self, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::fs;

// In-memory registry, used when the notifiers are supplied by the host process
pub struct InMemoryNotifierRegistry {
    notifiers: Arc<RwLock<Vec<NotifierConfig>>>,
}

impl InMemoryNotifierRegistry {
    pub fn new(notifiers: Vec<NotifierConfig>) -> Self {
        Self {
            notifiers: Arc::new(RwLock::new(notifiers)),
        }
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) -> anyhow::Result<()> {
        let mut notifiers = self
            .notifiers
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let notifier = notifiers
            .iter_mut()
            .find(|n| n.name == name)
            .ok_or_else(|| NotifyError::NotifierNotFound(name.to_string()))?;
        notifier.enabled = enabled;
        Ok(())
    }
}

#[async_trait]
impl NotifierRegistry for InMemoryNotifierRegistry {
    async fn find_all(&self) -> anyhow::Result<Vec<NotifierConfig>> {
        let notifiers = self
            .notifiers
            .read()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(notifiers.clone())
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<NotifierConfig>> {
        let notifiers = self
            .notifiers
            .read()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(notifiers.iter().find(|n| n.name == name).cloned())
    }

    async fn update(&self, notifier: &NotifierConfig) -> anyhow::Result<()> {
        let mut notifiers = self
            .notifiers
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        match notifiers.iter_mut().find(|n| n.name == notifier.name) {
            Some(existing) => *existing = notifier.clone(),
            None => notifiers.push(notifier.clone()),
        }
        Ok(())
    }
}

// Registry backed by the `notifiers` list of the JSON config file. Every
// lookup re-reads the file so edits from other processes are picked up.
pub struct FileNotifierRegistry {
    config_path: PathBuf,
}

impl FileNotifierRegistry {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    async fn read_config(&self) -> NotifyResult<Value> {
        if !self.config_path.exists() {
            return Ok(Value::Object(Default::default()));
        }

        let content = fs::read_to_string(&self.config_path).await.map_err(|e| {
            NotifyError::FileReadError {
                path: self.config_path.clone(),
                source: e,
            }
        })?;

        if content.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&content)
            .map_err(|e| NotifyError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    fn notifiers_of(config: &Value) -> NotifyResult<Vec<NotifierConfig>> {
        match config.get("notifiers") {
            Some(list) => serde_json::from_value(list.clone())
                .map_err(|e| NotifyError::ConfigError(format!("Invalid notifier entry: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    async fn write_config(&self, config: &Value) -> NotifyResult<()> {
        let content = serde_json::to_string_pretty(config).map_err(|e| {
            NotifyError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| NotifyError::FileWriteError {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
        }

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| NotifyError::FileWriteError {
                path: self.config_path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

#[async_trait]
impl NotifierRegistry for FileNotifierRegistry {
    async fn find_all(&self) -> anyhow::Result<Vec<NotifierConfig>> {
        let config = self.read_config().await?;
        Ok(Self::notifiers_of(&config)?)
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<NotifierConfig>> {
        let notifiers = self.find_all().await?;
        Ok(notifiers.into_iter().find(|n| n.name == name))
    }

    async fn update(&self, notifier: &NotifierConfig) -> anyhow::Result<()> {
        let mut config = self.read_config().await?;
        let mut notifiers = Self::notifiers_of(&config)?;
        match notifiers.iter_mut().find(|n| n.name == notifier.name) {
            Some(existing) => *existing = notifier.clone(),
            None => notifiers.push(notifier.clone()),
        }

        let list = serde_json::to_value(&notifiers)?;
        match config.as_object_mut() {
            Some(object) => {
                object.insert("notifiers".to_string(), list);
            }
            None => {
                return Err(NotifyError::ConfigError(
                    "Config root must be a JSON object".to_string(),
                )
                .into())
            }
        }

        self.write_config(&config).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifier::{EventKind, TransportMethod};

    fn heartbeat(name: &str) -> NotifierConfig {
        NotifierConfig::new(
            name,
            TransportMethod::HttpGet,
            "http://localhost/hb",
            EventKind::Heartbeat,
        )
    }

    #[tokio::test]
    async fn in_memory_toggle_is_visible_to_lookups() {
        let registry = InMemoryNotifierRegistry::new(vec![heartbeat("hb")]);
        registry.set_enabled("hb", false).unwrap();
        let found = registry.find_by_name("hb").await.unwrap().unwrap();
        assert!(!found.enabled);
        assert!(registry.set_enabled("missing", true).is_err());
    }

    #[tokio::test]
    async fn file_registry_keeps_unrelated_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"log_level": "debug", "notifiers": []}"#,
        )
        .unwrap();

        let registry = FileNotifierRegistry::new(&path);
        registry.update(&heartbeat("hb")).await.unwrap();

        let mut disabled = heartbeat("hb");
        disabled.enabled = false;
        registry.update(&disabled).await.unwrap();

        let all = registry.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].enabled);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["log_level"], "debug");
    }

    #[tokio::test]
    async fn missing_file_has_no_notifiers() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileNotifierRegistry::new(dir.path().join("absent.json"));
        assert!(registry.find_all().await.unwrap().is_empty());
        assert!(registry.find_by_name("hb").await.unwrap().is_none());
    }
}
