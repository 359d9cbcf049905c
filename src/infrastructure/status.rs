use crate::core::notification::StatusProvider;
use chrono::{DateTime, Utc};

/// Reports the running process and how long it has been up.
pub struct ProcessStatus {
    name: String,
    version: String,
    started_at: DateTime<Utc>,
}

impl ProcessStatus {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at,
        }
    }
}

impl Default for ProcessStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusProvider for ProcessStatus {
    fn status(&self) -> String {
        let uptime = Utc::now().signed_duration_since(self.started_at);
        format!(
            "{} {} is running since {} (uptime {}h {}m)",
            self.name,
            self.version,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            uptime.num_hours(),
            uptime.num_minutes() % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn status_reports_uptime() {
        let status = ProcessStatus::started_at(Utc::now() - Duration::minutes(125)).status();
        assert!(status.starts_with("ginx-notify "));
        assert!(status.contains("uptime 2h 5m"));
    }
}
