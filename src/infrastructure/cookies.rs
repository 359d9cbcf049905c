use crate::core::{notification::CookieEncoder, session::CookieTokens};
use chrono::{Duration, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedCookie<'a> {
    path: &'a str,
    domain: &'a str,
    expiration_date: i64,
    value: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    http_only: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    host_only: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    secure: bool,
}

/// Encodes captured cookies as the JSON array Chromium cookie-import
/// extensions accept. Cookies expire one year from encoding time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromiumCookieEncoder;

impl CookieEncoder for ChromiumCookieEncoder {
    fn encode(&self, tokens: &CookieTokens) -> String {
        let expiration_date = (Utc::now() + Duration::days(365)).timestamp();

        let mut domains: Vec<_> = tokens.iter().collect();
        domains.sort_by(|a, b| a.0.cmp(b.0));

        let mut cookies = Vec::new();
        for (domain, jar) in domains {
            let mut names: Vec<_> = jar.iter().collect();
            names.sort_by(|a, b| a.0.cmp(b.0));

            for (name, token) in names {
                let (domain, host_only) = match domain.strip_prefix('.') {
                    Some(parent) => (parent, false),
                    None => (domain.as_str(), true),
                };
                cookies.push(ExportedCookie {
                    path: if token.path.is_empty() { "/" } else { token.path.as_str() },
                    domain,
                    expiration_date,
                    value: &token.value,
                    name: name.as_str(),
                    http_only: token.http_only,
                    host_only,
                    secure: name.starts_with("__Host-") || name.starts_with("__Secure-"),
                });
            }
        }

        serde_json::to_string(&cookies).unwrap_or_default()
    }
}
