//! Daily check-in bookkeeping.
//!
//! One credit per UTC calendar day. The streak counts consecutive days and
//! restarts at 1 after a missed day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInState {
    /// Day of the last credited check-in.
    pub last_day: Option<NaiveDate>,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInDecision {
    /// Already credited today (or the clock moved backwards).
    AlreadyCheckedIn,
    /// Credit today; `streak` is the streak after this check-in.
    Credit { streak: u32 },
}

impl CheckInState {
    pub fn decide(&self, today: NaiveDate) -> CheckInDecision {
        match self.last_day {
            None => CheckInDecision::Credit { streak: 1 },
            Some(last) if today <= last => CheckInDecision::AlreadyCheckedIn,
            Some(last) if last.succ_opt() == Some(today) => CheckInDecision::Credit {
                streak: self.streak.saturating_add(1),
            },
            Some(_) => CheckInDecision::Credit { streak: 1 },
        }
    }

    pub fn record(&mut self, today: NaiveDate, streak: u32) {
        self.last_day = Some(today);
        self.streak = streak;
    }

    /// Streak as seen on `today`: zero once a day has been missed.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        match self.last_day {
            Some(last) if last == today || last.succ_opt() == Some(today) => self.streak,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_first_check_in() {
        assert_eq!(
            CheckInState::default().decide(day(10)),
            CheckInDecision::Credit { streak: 1 }
        );
    }

    #[test]
    fn test_same_day_is_noop() {
        let mut state = CheckInState::default();
        state.record(day(10), 1);
        assert_eq!(state.decide(day(10)), CheckInDecision::AlreadyCheckedIn);
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let mut state = CheckInState::default();
        state.record(day(10), 4);
        assert_eq!(state.decide(day(11)), CheckInDecision::Credit { streak: 5 });
    }

    #[test]
    fn test_gap_resets_streak() {
        let mut state = CheckInState::default();
        state.record(day(10), 4);
        assert_eq!(state.decide(day(12)), CheckInDecision::Credit { streak: 1 });
        assert_eq!(state.current_streak(day(12)), 0);
        assert_eq!(state.current_streak(day(11)), 4);
    }

    #[test]
    fn test_clock_moving_back_does_not_credit() {
        let mut state = CheckInState::default();
        state.record(day(10), 2);
        assert_eq!(state.decide(day(9)), CheckInDecision::AlreadyCheckedIn);
    }

    #[test]
    fn test_month_boundary_is_consecutive() {
        let mut state = CheckInState::default();
        state.record(day(31), 1);
        let feb_first = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(state.decide(feb_first), CheckInDecision::Credit { streak: 2 });
    }

    #[test]
    fn test_serde_day_format() {
        let mut state = CheckInState::default();
        state.record(day(10), 3);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"last_day":"2025-01-10","streak":3}"#);
    }
}
