//! Advisory login lockout: after five consecutive failures inside the
//! observation window, attempts are rejected locally for fifteen
//! minutes without contacting the store. UX sugar only — server-side
//! throttling is the real control.

use chrono::{DateTime, Duration, Utc};

use crate::error::FlowError;

pub const MAX_FAILURES: u32 = 5;
const WINDOW_MINUTES: i64 = 15;
const LOCKOUT_MINUTES: i64 = 15;

#[derive(Debug, Default)]
pub struct LoginLockout {
    failures: u32,
    window_start: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
}

impl LoginLockout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the attempt locally while locked out.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), FlowError> {
        if let Some(until) = self.locked_until
            && now < until
        {
            // Ceiling so "under a minute left" reads as 1, not 0.
            let remaining_minutes = ((until - now).num_seconds() + 59) / 60;
            return Err(FlowError::LockedOut { remaining_minutes });
        }
        Ok(())
    }

    /// Record a failed login; the fifth consecutive failure within the
    /// window starts the lockout.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        match self.window_start {
            Some(start) if now - start < Duration::minutes(WINDOW_MINUTES) => {
                self.failures += 1;
            }
            _ => {
                self.window_start = Some(now);
                self.failures = 1;
            }
        }
        if self.failures >= MAX_FAILURES {
            self.locked_until = Some(now + Duration::minutes(LOCKOUT_MINUTES));
        }
    }

    /// Any successful login resets the counter and the lockout.
    pub fn record_success(&mut self) {
        self.failures = 0;
        self.window_start = None;
        self.locked_until = None;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifth_failure_locks_for_fifteen_minutes() {
        let mut lockout = LoginLockout::new();
        let now = Utc::now();
        for _ in 0..MAX_FAILURES {
            assert!(lockout.check(now).is_ok());
            lockout.record_failure(now);
        }

        let err = lockout.check(now).unwrap_err();
        assert!(matches!(
            err,
            FlowError::LockedOut {
                remaining_minutes: 15
            }
        ));

        // Expired lockout admits attempts again.
        assert!(lockout.check(now + Duration::minutes(16)).is_ok());
    }

    #[test]
    fn success_resets_the_counter() {
        let mut lockout = LoginLockout::new();
        let now = Utc::now();
        for _ in 0..MAX_FAILURES - 1 {
            lockout.record_failure(now);
        }
        lockout.record_success();
        assert_eq!(lockout.failures(), 0);

        // Four fresh failures still do not lock.
        for _ in 0..MAX_FAILURES - 1 {
            lockout.record_failure(now);
        }
        assert!(lockout.check(now).is_ok());
    }

    #[test]
    fn stale_failures_age_out_of_the_window() {
        let mut lockout = LoginLockout::new();
        let start = Utc::now();
        for _ in 0..MAX_FAILURES - 1 {
            lockout.record_failure(start);
        }
        // A failure after the window restarts the count.
        lockout.record_failure(start + Duration::minutes(20));
        assert_eq!(lockout.failures(), 1);
        assert!(lockout.check(start + Duration::minutes(20)).is_ok());
    }
}
