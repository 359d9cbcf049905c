use crate::core::{error::NotifyResult, notifier::NotifierConfig, session::CookieTokens};

/// Delivers an already-built body over the notifier's transport.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, notifier: &NotifierConfig, body: &[u8]) -> NotifyResult<()>;
}

/// Source of the process status string carried by heartbeats.
pub trait StatusProvider: Send + Sync {
    fn status(&self) -> String;
}

/// Renders captured cookies in a format downstream tooling can import.
pub trait CookieEncoder: Send + Sync {
    fn encode(&self, tokens: &CookieTokens) -> String;
}
