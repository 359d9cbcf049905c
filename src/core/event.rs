use crate::core::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request that hit a lure without authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnauthorizedEvent {
    pub phishlet: String,
    pub req_url: String,
    pub useragent: String,
    pub remote_addr: String,
}

/// A visitor session. `tokens` stays empty until the session is authenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorEvent {
    #[serde(rename = "Session")]
    pub session: Session,
    pub tokens: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeartbeatEvent(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    pub test: String,
    pub time: DateTime<Utc>,
}

impl TestEvent {
    pub const MARKER: &'static str = "Test";

    pub fn now() -> Self {
        Self {
            test: Self::MARKER.to_string(),
            time: Utc::now(),
        }
    }
}

/// Exactly one event per dispatch. Serialized untagged, so each variant goes
/// on the wire as its own flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    Unauthorized(UnauthorizedEvent),
    Visitor(VisitorEvent),
    Test(TestEvent),
    Heartbeat(HeartbeatEvent),
}

impl From<UnauthorizedEvent> for EventPayload {
    fn from(event: UnauthorizedEvent) -> Self {
        EventPayload::Unauthorized(event)
    }
}

impl From<VisitorEvent> for EventPayload {
    fn from(event: VisitorEvent) -> Self {
        EventPayload::Visitor(event)
    }
}

impl From<HeartbeatEvent> for EventPayload {
    fn from(event: HeartbeatEvent) -> Self {
        EventPayload::Heartbeat(event)
    }
}

impl From<TestEvent> for EventPayload {
    fn from(event: TestEvent) -> Self {
        EventPayload::Test(event)
    }
}
