use serde::{Deserialize, Serialize};
use std::fmt;

/// How a notifier delivers its payload.
///
/// Method strings outside the supported set are kept verbatim in
/// `Unsupported` so the sender can reject them instead of failing the whole
/// config load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportMethod {
    HttpGet,
    HttpPost,
    Email,
    Unsupported(String),
}

impl From<String> for TransportMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HTTP-GET" | "GET" => TransportMethod::HttpGet,
            "HTTP-POST" | "POST" => TransportMethod::HttpPost,
            "Email" | "E-Mail" => TransportMethod::Email,
            _ => TransportMethod::Unsupported(value),
        }
    }
}

impl From<&str> for TransportMethod {
    fn from(value: &str) -> Self {
        TransportMethod::from(value.to_string())
    }
}

impl From<TransportMethod> for String {
    fn from(method: TransportMethod) -> Self {
        method.to_string()
    }
}

impl fmt::Display for TransportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMethod::HttpGet => f.write_str("HTTP-GET"),
            TransportMethod::HttpPost => f.write_str("HTTP-POST"),
            TransportMethod::Email => f.write_str("Email"),
            TransportMethod::Unsupported(other) => f.write_str(other),
        }
    }
}

/// Domain event a notifier subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Unauthorized,
    Visitor,
    Authorized,
    Heartbeat,
    Test,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Unauthorized => "unauthorized",
            EventKind::Visitor => "visitor",
            EventKind::Authorized => "authorized",
            EventKind::Heartbeat => "heartbeat",
            EventKind::Test => "test",
        };
        f.write_str(name)
    }
}

fn default_heartbeat_interval() -> u64 {
    60
}

/// A configured destination for outbound notifications.
///
/// Optional string settings are empty when unset. Transport-specific fields
/// (`smtp_server`, `from_address`) are only read for [`TransportMethod::Email`]
/// and are not cross-checked against the method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub name: String,
    pub method: TransportMethod,
    pub target: String,
    #[serde(default)]
    pub auth_header_name: String,
    #[serde(default)]
    pub auth_header_value: String,
    #[serde(default)]
    pub basic_auth_user: String,
    #[serde(default)]
    pub basic_auth_password: String,
    #[serde(default)]
    pub smtp_server: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub hide_sensitive: bool,
    pub on_event: EventKind,
    #[serde(default)]
    pub enabled: bool,
    /// Minutes between heartbeats.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval: u64,
    #[serde(default)]
    pub forward_param: String,
}

impl NotifierConfig {
    pub fn new(name: &str, method: TransportMethod, target: &str, on_event: EventKind) -> Self {
        Self {
            name: name.to_string(),
            method,
            target: target.to_string(),
            auth_header_name: String::new(),
            auth_header_value: String::new(),
            basic_auth_user: String::new(),
            basic_auth_password: String::new(),
            smtp_server: String::new(),
            from_address: String::new(),
            hide_sensitive: false,
            on_event,
            enabled: true,
            heartbeat_interval: default_heartbeat_interval(),
            forward_param: String::new(),
        }
    }

    /// The custom header pair, if both parts are set.
    pub fn auth_header(&self) -> Option<(&str, &str)> {
        if self.auth_header_name.is_empty() || self.auth_header_value.is_empty() {
            None
        } else {
            Some((&self.auth_header_name, &self.auth_header_value))
        }
    }

    /// Basic auth / SMTP credentials, if both parts are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.basic_auth_user.is_empty() || self.basic_auth_password.is_empty() {
            None
        } else {
            Some((&self.basic_auth_user, &self.basic_auth_password))
        }
    }

    pub fn subscribes_to(&self, kind: EventKind) -> bool {
        self.enabled && self.on_event == kind
    }
}

/// Read access to configured notifiers, plus the single write the CLI needs.
#[async_trait::async_trait]
pub trait NotifierRegistry: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<NotifierConfig>>;
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<NotifierConfig>>;
    async fn update(&self, notifier: &NotifierConfig) -> anyhow::Result<()>;
}
