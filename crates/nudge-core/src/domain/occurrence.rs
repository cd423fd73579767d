//! Occurrence calculator.
//!
//! Pure functions over a `Schedule` and an explicit reference instant. No
//! clock is read here; the poller and the store pass `now` in.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use super::schedule::Schedule;
use super::weekday::Weekday;

/// Next instant at or after `reference` at which `schedule` is due.
///
/// For every entry the candidate is the next date on/after the reference
/// date with a matching weekday, combined with the entry's time. A candidate
/// that is not strictly after `reference` is pushed one week ahead, so an
/// occurrence equal to "now" at computation time is never re-fired.
///
/// Returns `None` for an empty schedule.
pub fn next_occurrence(schedule: &Schedule, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    schedule
        .entries()
        .filter_map(|(weekday, time)| {
            let date = next_date_on_or_after(reference.date(), weekday)?;
            let candidate = date.and_time(time.to_naive_time());
            if candidate <= reference {
                candidate.checked_add_days(Days::new(7))
            } else {
                Some(candidate)
            }
        })
        .min()
}

/// The instant `schedule` falls on for a given calendar date, if any.
pub fn occurrence_on(schedule: &Schedule, date: NaiveDate) -> Option<NaiveDateTime> {
    let weekday = Weekday::from_chrono(date.weekday());
    schedule
        .time_on(weekday)
        .map(|time| date.and_time(time.to_naive_time()))
}

fn next_date_on_or_after(from: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let today = from.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    let ahead = (target + 7 - today) % 7;
    from.checked_add_days(Days::new(u64::from(ahead)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_of_day::TimeOfDay;
    use chrono::{Duration, NaiveTime};
    use rstest::rstest;

    // 2024-01-01 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    fn t(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::from_hm(hour, minute).unwrap()
    }

    #[test]
    fn empty_schedule_has_no_occurrence() {
        assert_eq!(next_occurrence(&Schedule::new(), at(1, 0, 0)), None);
    }

    #[test]
    fn wednesday_from_monday_midnight() {
        let schedule = Schedule::new().with(Weekday::Wednesday, t(9, 0));
        assert_eq!(next_occurrence(&schedule, at(1, 0, 0)), Some(at(3, 9, 0)));
    }

    #[test]
    fn exactly_now_advances_a_week() {
        let schedule = Schedule::new().with(Weekday::Wednesday, t(9, 0));
        assert_eq!(next_occurrence(&schedule, at(3, 9, 0)), Some(at(10, 9, 0)));
    }

    #[rstest]
    // later today still counts
    #[case(at(3, 8, 59), at(3, 9, 0))]
    // earlier today is past, next week
    #[case(at(3, 9, 1), at(10, 9, 0))]
    // Sunday evening wraps to Wednesday
    #[case(at(7, 23, 0), at(10, 9, 0))]
    // Thursday wraps forward
    #[case(at(4, 0, 0), at(10, 9, 0))]
    fn single_entry_cases(#[case] reference: NaiveDateTime, #[case] expected: NaiveDateTime) {
        let schedule = Schedule::new().with(Weekday::Wednesday, t(9, 0));
        assert_eq!(next_occurrence(&schedule, reference), Some(expected));
    }

    #[test]
    fn picks_earliest_of_several_entries() {
        let schedule = Schedule::new()
            .with(Weekday::Monday, t(8, 0))
            .with(Weekday::Friday, t(17, 30))
            .with(Weekday::Tuesday, t(6, 0));

        // Monday 09:00: Monday 08:00 has passed, Tuesday 06:00 is next
        assert_eq!(next_occurrence(&schedule, at(1, 9, 0)), Some(at(2, 6, 0)));
        // Saturday: wraps to next Monday
        assert_eq!(next_occurrence(&schedule, at(6, 12, 0)), Some(at(8, 8, 0)));
    }

    #[test]
    fn result_is_never_before_reference_and_is_the_minimum() {
        let schedule = Schedule::new()
            .with(Weekday::Monday, t(0, 0))
            .with(Weekday::Thursday, t(13, 45))
            .with(Weekday::Sunday, t(23, 59));

        let mut reference = at(1, 0, 0);
        let end = at(15, 0, 0);
        while reference < end {
            let next = next_occurrence(&schedule, reference).unwrap();
            assert!(next > reference);
            assert!(next - reference <= Duration::days(7));

            // brute force: first matching minute after reference
            let mut probe = reference + Duration::minutes(1);
            while occurrence_on(&schedule, probe.date()) != Some(probe) {
                probe += Duration::minutes(1);
            }
            assert_eq!(next, probe);

            reference += Duration::minutes(97);
        }
    }

    #[test]
    fn is_pure() {
        let schedule = Schedule::new().with(Weekday::Friday, t(17, 30));
        let reference = at(2, 10, 0);
        assert_eq!(
            next_occurrence(&schedule, reference),
            next_occurrence(&schedule, reference)
        );
    }

    #[test]
    fn weekly_round_trip() {
        let schedule = Schedule::new().with(Weekday::Friday, t(17, 30));
        let t1 = next_occurrence(&schedule, at(2, 10, 0)).unwrap();
        let again = next_occurrence(&schedule, t1 + Duration::seconds(1)).unwrap();
        assert_eq!(again, t1 + Duration::days(7));
    }

    #[test]
    fn occurrence_on_matches_weekday() {
        let schedule = Schedule::new().with(Weekday::Tuesday, t(6, 0));
        assert_eq!(
            occurrence_on(&schedule, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
            Some(at(2, 6, 0))
        );
        assert_eq!(
            occurrence_on(&schedule, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            None
        );
    }
}
