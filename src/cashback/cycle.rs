use chrono::{Datelike, NaiveDate};

use crate::errors::{FlowError, Result};

/// One month-aligned billing window, anchored on the account's statement
/// day. Only the start date is carried; the window implicitly ends the day
/// before the next statement day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWindow {
    pub start: NaiveDate,
}

impl CycleWindow {
    /// Tag identifying the window, derived from the start's year and month
    /// (`YYYY-MM`, zero padded).
    pub fn tag(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), self.start.month())
    }
}

/// Resolves the statement cycle containing `date` for an account whose
/// statement falls on `statement_day`.
///
/// A transaction dated before the statement day belongs to the cycle that
/// started on the statement day of the *previous* month; otherwise to the
/// one starting in the transaction's own month. Year rollover is handled
/// with a normalized year/month pair rather than date mutation.
///
/// Fails with [`FlowError::InvalidStatementDay`] when the day is outside
/// 1–31 or does not exist in the resolved cycle month (e.g. day 31 in
/// April); policy data is expected to supply valid anchors, so this is a
/// loud failure rather than a silent wrap.
pub fn resolve_cycle(date: NaiveDate, statement_day: u32) -> Result<CycleWindow> {
    if !(1..=31).contains(&statement_day) {
        return Err(FlowError::InvalidStatementDay(statement_day));
    }
    let mut year = date.year();
    let mut month = date.month() as i32;
    if date.day() < statement_day {
        month -= 1;
        if month < 1 {
            month += 12;
            year -= 1;
        }
    }
    let start = NaiveDate::from_ymd_opt(year, month as u32, statement_day)
        .ok_or(FlowError::InvalidStatementDay(statement_day))?;
    Ok(CycleWindow { start })
}

/// Convenience wrapper returning only the cycle tag.
pub fn resolve_cycle_tag(date: NaiveDate, statement_day: u32) -> Result<String> {
    resolve_cycle(date, statement_day).map(|window| window.tag())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_before_statement_maps_to_previous_month() {
        assert_eq!(
            resolve_cycle_tag(date(2025, 9, 10), 11).unwrap(),
            "2025-08"
        );
    }

    #[test]
    fn statement_day_itself_opens_the_new_cycle() {
        assert_eq!(
            resolve_cycle_tag(date(2025, 9, 11), 11).unwrap(),
            "2025-09"
        );
        assert_eq!(
            resolve_cycle_tag(date(2025, 9, 30), 11).unwrap(),
            "2025-09"
        );
    }

    #[test]
    fn january_rolls_back_into_previous_year() {
        assert_eq!(
            resolve_cycle_tag(date(2026, 1, 5), 11).unwrap(),
            "2025-12"
        );
    }

    #[test]
    fn window_start_carries_the_statement_day() {
        let window = resolve_cycle(date(2025, 9, 25), 11).unwrap();
        assert_eq!(window.start, date(2025, 9, 11));
    }

    #[test]
    fn rejects_out_of_range_days() {
        assert!(matches!(
            resolve_cycle(date(2025, 9, 10), 0),
            Err(FlowError::InvalidStatementDay(0))
        ));
        assert!(matches!(
            resolve_cycle(date(2025, 9, 10), 32),
            Err(FlowError::InvalidStatementDay(32))
        ));
    }

    #[test]
    fn rejects_days_missing_from_cycle_month() {
        // 15 April is before the 31st, so the cycle starts 31 March and is
        // valid. 15 May would start its cycle on 31 April, which does not
        // exist: loud failure, no wrap.
        assert!(resolve_cycle(date(2025, 4, 15), 31).is_ok());
        assert!(matches!(
            resolve_cycle(date(2025, 5, 15), 31),
            Err(FlowError::InvalidStatementDay(31))
        ));
    }
}
