//! Transient status line
//!
//! A single message that disappears after its time-to-live. Expiry is a
//! deadline checked against the caller's clock, so there is no timer to leak.

use std::time::Duration;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: Option<String>,
    expires_at: Option<DateTime<Local>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current message; it clears itself after `ttl`
    pub fn post(&mut self, message: impl Into<String>, ttl: Duration, now: DateTime<Local>) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        self.message = Some(message.into());
        self.expires_at = Some(now + ttl);
    }

    /// The message, while it is still live
    pub fn current(&self, now: DateTime<Local>) -> Option<&str> {
        match (&self.message, self.expires_at) {
            (Some(message), Some(deadline)) if now < deadline => Some(message.as_str()),
            _ => None,
        }
    }

    /// Drop an expired message. Returns true when something was cleared.
    pub fn tick(&mut self, now: DateTime<Local>) -> bool {
        if self.message.is_some() && self.current(now).is_none() {
            self.clear();
            return true;
        }
        false
    }

    /// Cancel any pending message
    pub fn clear(&mut self) {
        self.message = None;
        self.expires_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.message.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_message_expires() {
        let mut status = StatusLine::new();
        status.post("Backup saved", Duration::from_millis(2000), t0());

        assert_eq!(status.current(t0()), Some("Backup saved"));
        assert_eq!(
            status.current(t0() + chrono::Duration::milliseconds(1999)),
            Some("Backup saved")
        );
        assert_eq!(status.current(t0() + chrono::Duration::milliseconds(2000)), None);

        assert!(!status.tick(t0() + chrono::Duration::milliseconds(500)));
        assert!(status.tick(t0() + chrono::Duration::seconds(3)));
        assert!(!status.is_pending());
    }

    #[test]
    fn test_new_message_rearms() {
        let mut status = StatusLine::new();
        status.post("first", Duration::from_secs(2), t0());
        let later = t0() + chrono::Duration::seconds(1);
        status.post("second", Duration::from_secs(2), later);
        assert_eq!(
            status.current(t0() + chrono::Duration::milliseconds(2500)),
            Some("second")
        );
    }

    #[test]
    fn test_clear_cancels() {
        let mut status = StatusLine::new();
        status.post("pending", Duration::from_secs(5), t0());
        status.clear();
        assert_eq!(status.current(t0()), None);
        assert!(!status.tick(t0()));
    }
}
