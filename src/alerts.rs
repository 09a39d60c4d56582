use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    expires_at: Instant,
}

/// Transient notifications stacked in the corner of the screen.
#[derive(Debug)]
pub struct Alerts {
    ttl: Duration,
    items: Vec<Alert>,
}

impl Alerts {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, items: Vec::new() }
    }

    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    pub fn push_at(&mut self, level: AlertLevel, message: impl Into<String>, now: Instant) {
        self.items.push(Alert {
            level,
            message: message.into(),
            expires_at: now + self.ttl,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|a| a.expires_at > now);
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_expire_after_their_ttl() {
        let start = Instant::now();
        let mut alerts = Alerts::new(Duration::from_secs(3));
        alerts.push_at(AlertLevel::Error, "Database Connection Failed", start);
        alerts.push_at(AlertLevel::Warning, "Error: refused", start + Duration::from_secs(2));

        alerts.prune(start + Duration::from_millis(2999));
        assert_eq!(alerts.iter().count(), 2);

        alerts.prune(start + Duration::from_secs(3));
        let left: Vec<_> = alerts.iter().map(|a| a.level).collect();
        assert_eq!(left, vec![AlertLevel::Warning]);

        alerts.prune(start + Duration::from_secs(5));
        assert!(alerts.is_empty());
    }
}
