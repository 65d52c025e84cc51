// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar arithmetic on the civil date axis.

use jiff::civil::{Date, Weekday};

/// Number of ISO 8601 weeks in the given ISO week-year, 52 or 53.
pub(crate) fn iso_weeks_in_year(iso_year: i16) -> i8 {
    let Ok(jan1) = Date::new(iso_year, 1, 1) else {
        return 52;
    };
    match jan1.weekday() {
        Weekday::Thursday => 53,
        Weekday::Wednesday if jan1.in_leap_year() => 53,
        _ => 52,
    }
}

/// Resolve a signed 1-based index against a sequence of `len` items.
///
/// Positive values count from the start, negative from the end (`-1` is the
/// last item). Returns the 1-based position, or `None` if out of range.
pub(crate) fn resolve_signed(value: i32, len: i32) -> Option<i32> {
    let pos = if value < 0 { len + value + 1 } else { value };
    (1..=len).contains(&pos).then_some(pos)
}

/// Whether `date` is one of the resolved signed month days.
pub(crate) fn matches_month_day(date: Date, month_days: &[i8]) -> bool {
    let len = i32::from(date.days_in_month());
    let day = i32::from(date.day());
    month_days
        .iter()
        .any(|&v| resolve_signed(i32::from(v), len) == Some(day))
}

/// Whether `date` lies in one of the resolved signed ISO weeks.
///
/// Negative week numbers are resolved against the week-year the date belongs
/// to, so the first days of January may match the last week of the previous
/// ISO year.
pub(crate) fn matches_week_no(date: Date, week_nos: &[i8]) -> bool {
    let iso = date.iso_week_date();
    let len = i32::from(iso_weeks_in_year(iso.year()));
    let week = i32::from(iso.week());
    week_nos
        .iter()
        .any(|&v| resolve_signed(i32::from(v), len) == Some(week))
}

/// Scope an ordinal weekday is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NthScope {
    Month,
    Year,
}

/// Whether `date` is the `nth` occurrence of its weekday within `scope`.
///
/// `nth` is 1-based, negative counts from the end of the scope.
pub(crate) fn is_nth_weekday(date: Date, nth: i8, scope: NthScope) -> bool {
    let (index, len) = match scope {
        NthScope::Month => (i32::from(date.day()), i32::from(date.days_in_month())),
        NthScope::Year => (i32::from(date.day_of_year()), i32::from(date.days_in_year())),
    };
    let nth = i32::from(nth);
    if nth > 0 {
        (index - 1) / 7 + 1 == nth
    } else {
        (len - index) / 7 + 1 == -nth
    }
}

/// Pick the items at the given signed 1-based positions of `items`.
///
/// Positions out of range are skipped. The result is sorted and deduplicated.
pub(crate) fn select_positions<T: Ord + Clone>(items: &[T], positions: &[i16]) -> Vec<T> {
    let len = i32::try_from(items.len()).unwrap_or(i32::MAX);
    let mut selected: Vec<T> = positions
        .iter()
        .filter_map(|&p| resolve_signed(i32::from(p), len))
        .filter_map(|pos| usize::try_from(pos - 1).ok())
        .filter_map(|i| items.get(i).cloned())
        .collect();
    selected.sort();
    selected.dedup();
    selected
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn counts_iso_weeks() {
        for (year, weeks) in [
            (2015, 53), // starts on Thursday
            (2016, 52),
            (2020, 53), // leap year starting on Wednesday
            (2021, 52),
            (2024, 52),
            (2026, 53),
        ] {
            assert_eq!(iso_weeks_in_year(year), weeks, "Failed for {year}");
        }
    }

    #[test]
    fn resolves_signed_indices() {
        for (value, len, expected) in [
            (1, 31, Some(1)),
            (31, 31, Some(31)),
            (31, 30, None),
            (-1, 29, Some(29)),
            (-29, 29, Some(1)),
            (-30, 29, None),
            (0, 10, None),
            (1, 0, None),
        ] {
            assert_eq!(resolve_signed(value, len), expected, "Failed for {value} of {len}");
        }
    }

    #[test]
    fn matches_month_days() {
        assert!(matches_month_day(date(2024, 2, 29), &[-1]));
        assert!(matches_month_day(date(2024, 2, 1), &[-29]));
        assert!(!matches_month_day(date(2024, 2, 28), &[-1]));
        assert!(matches_month_day(date(2025, 1, 15), &[1, 15]));
        assert!(!matches_month_day(date(2025, 2, 28), &[30, 31]));
    }

    #[test]
    fn matches_week_numbers() {
        // 2025-01-01 is in ISO week 1 of 2025, 2024-12-30 too
        assert!(matches_week_no(date(2025, 1, 1), &[1]));
        assert!(matches_week_no(date(2024, 12, 30), &[1]));
        // 2021-01-03 belongs to week 53 of 2020
        assert!(matches_week_no(date(2021, 1, 3), &[53]));
        assert!(matches_week_no(date(2021, 1, 3), &[-1]));
        assert!(!matches_week_no(date(2021, 1, 4), &[-1]));
        assert!(matches_week_no(date(2025, 12, 22), &[-1]));
    }

    #[test]
    fn finds_nth_weekdays() {
        // March 2025: Sundays are 2, 9, 16, 23, 30
        assert!(is_nth_weekday(date(2025, 3, 2), 1, NthScope::Month));
        assert!(is_nth_weekday(date(2025, 3, 30), -1, NthScope::Month));
        assert!(is_nth_weekday(date(2025, 3, 30), 5, NthScope::Month));
        assert!(!is_nth_weekday(date(2025, 3, 23), -1, NthScope::Month));
        assert!(is_nth_weekday(date(2025, 3, 23), -2, NthScope::Month));

        // 2025 starts on Wednesday and ends on Wednesday
        assert!(is_nth_weekday(date(2025, 1, 1), 1, NthScope::Year));
        assert!(is_nth_weekday(date(2025, 12, 31), -1, NthScope::Year));
        assert!(is_nth_weekday(date(2025, 1, 8), 2, NthScope::Year));
        assert!(!is_nth_weekday(date(2025, 1, 8), 1, NthScope::Year));
    }

    #[test]
    fn selects_positions() {
        let items = [10, 20, 30, 40];
        assert_eq!(select_positions(&items, &[1]), vec![10]);
        assert_eq!(select_positions(&items, &[-1]), vec![40]);
        assert_eq!(select_positions(&items, &[-1, 1, 1]), vec![10, 40]);
        assert_eq!(select_positions(&items, &[5, -5]), Vec::<i32>::new());
        assert_eq!(select_positions::<i32>(&[], &[1]), Vec::<i32>::new());
    }
}
