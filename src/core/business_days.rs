use crate::domain::ports::HolidayLookup;
use crate::utils::error::{DeadlineError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

/// Longest run of non-business days accepted before the calendar is treated as corrupt.
pub const MAX_LOOKAHEAD_DAYS: u32 = 31;

/// Business-day arithmetic over weekends plus a borrowed holiday set.
#[derive(Debug)]
pub struct BusinessDayCalculator<'a, H: HolidayLookup + ?Sized> {
    holidays: &'a H,
}

impl<'a, H: HolidayLookup + ?Sized> BusinessDayCalculator<'a, H> {
    pub fn new(holidays: &'a H) -> Self {
        Self { holidays }
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !WEEKEND.contains(&date.weekday()) && !self.holidays.is_holiday(date)
    }

    /// Earliest business day strictly after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        let mut current = date;
        for _ in 0..MAX_LOOKAHEAD_DAYS {
            current = current
                .checked_add_days(Days::new(1))
                .ok_or(DeadlineError::LookaheadExhausted {
                    date,
                    days: MAX_LOOKAHEAD_DAYS,
                })?;
            if self.is_business_day(current) {
                return Ok(current);
            }
        }

        Err(DeadlineError::LookaheadExhausted {
            date,
            days: MAX_LOOKAHEAD_DAYS,
        })
    }

    /// Applies [`next_business_day`](Self::next_business_day) `n` times; the start date never counts.
    pub fn add_business_days(&self, date: NaiveDate, n: u32) -> Result<NaiveDate> {
        (0..n).try_fold(date, |current, _| self.next_business_day(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HolidaySet;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn christmas_2023() -> HolidaySet {
        HolidaySet::from_dates([d(2023, 12, 25), d(2023, 12, 26), d(2024, 1, 1)])
    }

    #[test]
    fn test_weekends_and_holidays_are_not_business_days() {
        let holidays = christmas_2023();
        let calc = BusinessDayCalculator::new(&holidays);

        assert!(!calc.is_business_day(d(2023, 10, 7))); // Saturday
        assert!(!calc.is_business_day(d(2023, 10, 8))); // Sunday
        assert!(!calc.is_business_day(d(2023, 12, 26)));
        assert!(calc.is_business_day(d(2023, 10, 3)));
    }

    #[test]
    fn test_next_business_day_skips_holiday_run() {
        let holidays = christmas_2023();
        let calc = BusinessDayCalculator::new(&holidays);

        // 週五 22 日 -> 週三 27 日
        assert_eq!(calc.next_business_day(d(2023, 12, 22)).unwrap(), d(2023, 12, 27));
        // strictly later, even from a business day
        assert_eq!(calc.next_business_day(d(2023, 10, 3)).unwrap(), d(2023, 10, 4));
    }

    #[test]
    fn test_add_business_days() {
        let holidays = christmas_2023();
        let calc = BusinessDayCalculator::new(&holidays);

        assert_eq!(calc.add_business_days(d(2023, 10, 3), 0).unwrap(), d(2023, 10, 3));
        assert_eq!(calc.add_business_days(d(2023, 10, 7), 0).unwrap(), d(2023, 10, 7));
        assert_eq!(calc.add_business_days(d(2023, 10, 3), 2).unwrap(), d(2023, 10, 5));
        assert_eq!(calc.add_business_days(d(2023, 12, 8), 2).unwrap(), d(2023, 12, 12));
        assert_eq!(calc.add_business_days(d(2023, 12, 22), 2).unwrap(), d(2023, 12, 28));
    }

    #[test]
    fn test_corrupt_calendar_exhausts_lookahead() {
        let start = d(2024, 1, 1);
        let every_day = HolidaySet::from_dates(
            (1..=90).map(|offset| start + chrono::Duration::days(offset)),
        );
        let calc = BusinessDayCalculator::new(&every_day);

        let err = calc.next_business_day(start).unwrap_err();
        assert!(matches!(err, DeadlineError::LookaheadExhausted { days: 31, .. }));
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| d(2020, 1, 1) + chrono::Duration::days(offset))
    }

    proptest! {
        #[test]
        fn prop_business_day_matches_weekend_and_holiday_membership(date in any_date()) {
            let holidays = christmas_2023();
            let calc = BusinessDayCalculator::new(&holidays);
            let expected = !WEEKEND.contains(&date.weekday()) && !holidays.contains(date);
            prop_assert_eq!(calc.is_business_day(date), expected);
        }

        #[test]
        fn prop_add_business_days_is_strictly_monotonic(date in any_date(), n in 0u32..40) {
            let holidays = christmas_2023();
            let calc = BusinessDayCalculator::new(&holidays);
            let shorter = calc.add_business_days(date, n).unwrap();
            let longer = calc.add_business_days(date, n + 1).unwrap();
            prop_assert!(longer > shorter);
            prop_assert!(calc.is_business_day(longer));
        }
    }
}
