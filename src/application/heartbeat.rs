use crate::application::dispatcher::EventDispatcher;
use crate::core::notifier::{EventKind, NotifierRegistry};
use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Turns a configured interval in minutes into a sleep duration. Zero is
/// treated as one minute so a misconfigured notifier cannot spin.
pub fn interval_from_minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes.max(1).saturating_mul(60))
}

/// Runs one heartbeat loop per enabled heartbeat notifier.
///
/// Each loop sleeps first and then re-reads its notifier from the registry,
/// so disabling a notifier stops its loop after the current interval, never
/// before.
pub struct HeartbeatScheduler {
    registry: Arc<dyn NotifierRegistry>,
    dispatcher: Arc<EventDispatcher>,
}

impl HeartbeatScheduler {
    pub fn new(registry: Arc<dyn NotifierRegistry>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    pub async fn startup(&self) -> Result<Vec<JoinHandle<()>>> {
        let notifiers = self.registry.find_all().await?;

        let handles: Vec<JoinHandle<()>> = notifiers
            .iter()
            .filter(|n| n.subscribes_to(EventKind::Heartbeat))
            .map(|n| self.spawn(&n.name, interval_from_minutes(n.heartbeat_interval)))
            .collect();

        Ok(handles)
    }

    pub fn spawn(&self, name: &str, interval: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let dispatcher = Arc::clone(&self.dispatcher);
        let name = name.to_string();

        info!("Starting heartbeat for {} every {:?}", name, interval);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let notifier = match registry.find_by_name(&name).await {
                    Ok(Some(notifier)) => notifier,
                    Ok(None) => {
                        info!("Notifier {} was removed, stopping heartbeat", name);
                        return;
                    }
                    Err(e) => {
                        warn!("Could not read notifier {}: {}", name, e);
                        continue;
                    }
                };

                if !notifier.enabled {
                    info!("Notifier {} is disabled, stopping heartbeat", name);
                    return;
                }

                if let Err(e) = dispatcher.notify_heartbeat(&notifier).await {
                    error!("Heartbeat for {} failed: {}", name, e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(interval_from_minutes(0), Duration::from_secs(60));
        assert_eq!(interval_from_minutes(5), Duration::from_secs(300));
    }

    #[test]
    fn huge_interval_saturates_instead_of_overflowing() {
        assert_eq!(interval_from_minutes(u64::MAX), Duration::from_secs(u64::MAX));
        assert_eq!(
            interval_from_minutes(u64::MAX / 2),
            Duration::from_secs(u64::MAX)
        );
    }
}
