//! Session and daily counters.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Emails and pages counted for the current UTC day and the whole session.
///
/// The daily pair resets when the UTC calendar date changes. The check
/// runs on every increment and every snapshot; session counts never reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counters {
    emails_today: u64,
    emails_session: u64,
    pages_today: u64,
    pages_session: u64,
    day: NaiveDate,
}

/// Point-in-time copy of [`Counters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// New emails since midnight UTC
    pub emails_today: u64,
    /// New emails since the session started
    pub emails_session: u64,
    /// Pages processed since midnight UTC
    pub pages_today: u64,
    /// Pages processed since the session started
    pub pages_session: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

impl Counters {
    /// Start counting today.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_on(today())
    }

    /// Start counting on `day`.
    #[must_use]
    pub fn starting_on(day: NaiveDate) -> Self {
        Self {
            emails_today: 0,
            emails_session: 0,
            pages_today: 0,
            pages_session: 0,
            day,
        }
    }

    /// Count `count` newly added emails.
    pub fn record_emails(&mut self, count: usize) {
        self.record_emails_on(today(), count);
    }

    /// Count one processed page.
    pub fn record_page(&mut self) {
        self.record_page_on(today());
    }

    /// Current values.
    pub fn snapshot(&mut self) -> CounterSnapshot {
        self.snapshot_on(today())
    }

    /// Count `count` emails as of `day`.
    pub fn record_emails_on(&mut self, day: NaiveDate, count: usize) {
        self.roll_over(day);
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        self.emails_today = self.emails_today.saturating_add(count);
        self.emails_session = self.emails_session.saturating_add(count);
    }

    /// Count one page as of `day`.
    pub fn record_page_on(&mut self, day: NaiveDate) {
        self.roll_over(day);
        self.pages_today = self.pages_today.saturating_add(1);
        self.pages_session = self.pages_session.saturating_add(1);
    }

    /// Current values as of `day`.
    pub fn snapshot_on(&mut self, day: NaiveDate) -> CounterSnapshot {
        self.roll_over(day);
        CounterSnapshot {
            emails_today: self.emails_today,
            emails_session: self.emails_session,
            pages_today: self.pages_today,
            pages_session: self.pages_session,
        }
    }

    fn roll_over(&mut self, day: NaiveDate) {
        if day != self.day {
            tracing::debug!(from = %self.day, to = %day, "daily counters rolled over");
            self.emails_today = 0;
            self.pages_today = 0;
            self.day = day;
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
    }

    #[test]
    fn test_counts_accumulate() {
        let mut counters = Counters::starting_on(day(1));
        counters.record_emails_on(day(1), 3);
        counters.record_page_on(day(1));
        counters.record_page_on(day(1));

        let snapshot = counters.snapshot_on(day(1));
        assert_eq!(snapshot.emails_today, 3);
        assert_eq!(snapshot.emails_session, 3);
        assert_eq!(snapshot.pages_today, 2);
        assert_eq!(snapshot.pages_session, 2);
    }

    #[test]
    fn test_daily_counts_reset_on_new_day() {
        let mut counters = Counters::starting_on(day(1));
        counters.record_emails_on(day(1), 5);
        counters.record_page_on(day(1));

        counters.record_emails_on(day(2), 1);

        let snapshot = counters.snapshot_on(day(2));
        assert_eq!(snapshot.emails_today, 1);
        assert_eq!(snapshot.emails_session, 6);
        assert_eq!(snapshot.pages_today, 0);
        assert_eq!(snapshot.pages_session, 1);
    }

    #[test]
    fn test_read_after_midnight_resets() {
        let mut counters = Counters::starting_on(day(1));
        counters.record_emails_on(day(1), 2);

        let snapshot = counters.snapshot_on(day(2));
        assert_eq!(snapshot.emails_today, 0);
        assert_eq!(snapshot.emails_session, 2);
    }

    #[test]
    fn test_live_clock() {
        let mut counters = Counters::new();
        counters.record_emails(2);
        counters.record_page();
        let snapshot = counters.snapshot();
        assert_eq!(snapshot.emails_session, 2);
        assert_eq!(snapshot.pages_session, 1);
    }
}
