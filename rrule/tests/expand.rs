// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for occurrence generation
//!
//! Scenarios are checked against hand-computed calendars; the sweeps at the
//! end check that ranged and unranged generation agree for a fixed set of
//! rules.

use cadence_rrule::{
    ExpandConfig, Expander, Rule, generate_occurrences, generate_occurrences_in_range, parse_rule,
    zoned_anchor,
};
use jiff::civil::{DateTime, date, datetime};

fn rule(src: &str) -> Rule {
    parse_rule(src).unwrap()
}

fn collect(src: &str, anchor: DateTime) -> Vec<DateTime> {
    let rule = rule(src);
    generate_occurrences(&rule, anchor, None).collect()
}

#[test]
fn daily_with_count() {
    let got = collect("FREQ=DAILY;COUNT=5", datetime(2025, 1, 1, 9, 0, 0, 0));
    let expected: Vec<_> = (1..=5).map(|d| datetime(2025, 1, d, 9, 0, 0, 0)).collect();
    assert_eq!(got, expected);
}

#[test]
fn count_zero_is_empty() {
    for src in ["FREQ=DAILY;COUNT=0", "FREQ=YEARLY;BYMONTH=3;COUNT=0"] {
        assert!(collect(src, datetime(2025, 1, 1, 9, 0, 0, 0)).is_empty(), "Failed for {src}");
    }
}

#[test]
fn weekly_with_interval() {
    let got = collect("FREQ=WEEKLY;INTERVAL=2;COUNT=3", datetime(2025, 1, 1, 9, 0, 0, 0));
    assert_eq!(
        got,
        vec![
            datetime(2025, 1, 1, 9, 0, 0, 0),
            datetime(2025, 1, 15, 9, 0, 0, 0),
            datetime(2025, 1, 29, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn until_is_inclusive() {
    let got = collect("FREQ=DAILY;UNTIL=20250103T090000", datetime(2025, 1, 1, 9, 0, 0, 0));
    assert_eq!(got.len(), 3);
    assert_eq!(got.last(), Some(&datetime(2025, 1, 3, 9, 0, 0, 0)));
}

#[test]
fn date_only_until_means_midnight() {
    let got = collect("FREQ=DAILY;UNTIL=20250103", datetime(2025, 1, 1, 9, 0, 0, 0));
    assert_eq!(got.len(), 2);

    let got = collect("FREQ=DAILY;UNTIL=20250103", datetime(2025, 1, 1, 0, 0, 0, 0));
    assert_eq!(got.len(), 3);
}

#[test]
fn first_trigger_wins_with_count_and_until() {
    let got = collect("FREQ=DAILY;COUNT=2;UNTIL=20250110", datetime(2025, 1, 1, 0, 0, 0, 0));
    assert_eq!(got.len(), 2);

    let got = collect("FREQ=DAILY;COUNT=20;UNTIL=20250103", datetime(2025, 1, 1, 0, 0, 0, 0));
    assert_eq!(got.len(), 3);
}

#[test]
fn last_day_of_month() {
    let got = collect("FREQ=MONTHLY;BYMONTHDAY=-1;COUNT=3", datetime(2024, 1, 31, 0, 0, 0, 0));
    let dates: Vec<_> = got.iter().map(|dt| dt.date()).collect();
    assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
}

#[test]
fn skips_nonexistent_month_days() {
    let got = collect("FREQ=MONTHLY;BYMONTHDAY=30;COUNT=3", datetime(2025, 1, 1, 0, 0, 0, 0));
    let dates: Vec<_> = got.iter().map(|dt| dt.date()).collect();
    assert_eq!(dates, vec![date(2025, 1, 30), date(2025, 3, 30), date(2025, 4, 30)]);
}

#[test]
fn last_sunday_of_march() {
    for anchor in [datetime(2025, 3, 1, 2, 0, 0, 0), datetime(2025, 3, 30, 2, 0, 0, 0)] {
        let got = collect("FREQ=YEARLY;BYMONTH=3;BYDAY=SU;BYSETPOS=-1;COUNT=3", anchor);
        let dates: Vec<_> = got.iter().map(|dt| dt.date()).collect();
        assert_eq!(
            dates,
            vec![date(2025, 3, 30), date(2026, 3, 29), date(2027, 3, 28)],
            "Failed for {anchor}"
        );
    }
}

#[test]
fn set_pos_out_of_range_yields_nothing_for_period() {
    // months have 4 or 5 Mondays, only the 5-Monday months qualify
    let got = collect("FREQ=MONTHLY;BYDAY=MO;BYSETPOS=5;COUNT=3", datetime(2025, 1, 1, 0, 0, 0, 0));
    let dates: Vec<_> = got.iter().map(|dt| dt.date()).collect();
    assert_eq!(dates, vec![date(2025, 3, 31), date(2025, 6, 30), date(2025, 9, 29)]);
}

#[test]
fn monthly_nth_weekdays() {
    let got = collect("FREQ=MONTHLY;BYDAY=2TU,-1FR;COUNT=4", datetime(2025, 1, 1, 18, 0, 0, 0));
    let dates: Vec<_> = got.iter().map(|dt| dt.date()).collect();
    assert_eq!(
        dates,
        vec![date(2025, 1, 14), date(2025, 1, 31), date(2025, 2, 11), date(2025, 2, 28)]
    );
}

#[test]
fn limit_caps_output() {
    let rule = rule("FREQ=DAILY");
    let anchor = datetime(2025, 1, 1, 0, 0, 0, 0);
    assert_eq!(generate_occurrences(&rule, anchor, Some(0)).count(), 0);
    assert_eq!(generate_occurrences(&rule, anchor, Some(7)).count(), 7);
}

#[test]
fn zoned_anchor_keeps_local_time_across_dst() {
    let rule = rule("FREQ=DAILY;COUNT=3");
    let anchor = zoned_anchor(datetime(2025, 3, 8, 9, 0, 0, 0), "America/New_York").unwrap();
    let got: Vec<_> = generate_occurrences(&rule, anchor, None).collect();

    assert_eq!(got.len(), 3);
    for (zdt, day) in got.iter().zip(8..) {
        assert_eq!(zdt.datetime(), datetime(2025, 3, day, 9, 0, 0, 0));
    }
    // DST starts on 2025-03-09, that day is one hour shorter
    let hours = got[0].timestamp().until(got[1].timestamp()).unwrap().get_seconds() / 3600;
    assert_eq!(hours, 23);
}

#[test]
fn utc_until_against_zoned_anchor() {
    // 09:00 in New York is 14:00 UTC in January
    let anchor = zoned_anchor(datetime(2025, 1, 1, 9, 0, 0, 0), "America/New_York").unwrap();
    for (src, expected) in [
        ("FREQ=DAILY;UNTIL=20250103T140000Z", 3),
        ("FREQ=DAILY;UNTIL=20250103T135959Z", 2),
        ("FREQ=DAILY;UNTIL=20250103T090000", 3),
    ] {
        let rule = rule(src);
        let got = generate_occurrences(&rule, anchor.clone(), None).count();
        assert_eq!(got, expected, "Failed for {src}");
    }
}

#[test]
fn impossible_rule_terminates() {
    let rule = rule("FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30");
    let expander = Expander::new(ExpandConfig {
        max_empty_years: 100,
    });
    let anchor = datetime(2025, 1, 1, 0, 0, 0, 0);
    assert_eq!(expander.occurrences(&rule, anchor, None).count(), 0);
    assert_eq!(
        generate_occurrences_in_range(&rule, anchor, anchor, datetime(2030, 1, 1, 0, 0, 0, 0))
            .count(),
        0
    );
}

#[test]
fn rare_rule_spans_decades() {
    // a leap day on a Monday happens every 28 years
    let rule = rule("FREQ=DAILY;BYMONTH=2;BYMONTHDAY=29;BYDAY=MO");
    let got: Vec<_> = generate_occurrences(&rule, datetime(2016, 1, 1, 9, 0, 0, 0), Some(2)).collect();
    assert_eq!(
        got,
        vec![datetime(2016, 2, 29, 9, 0, 0, 0), datetime(2044, 2, 29, 9, 0, 0, 0)]
    );
}

const SWEEP_RULES: [&str; 7] = [
    "FREQ=DAILY;INTERVAL=3",
    "FREQ=WEEKLY;BYDAY=MO,TH;COUNT=20",
    "FREQ=MONTHLY;BYDAY=2TU,-1FR",
    "FREQ=MONTHLY;BYMONTHDAY=1,15,-1;UNTIL=20261231T235959",
    "FREQ=YEARLY;BYMONTH=3;BYDAY=SU;BYSETPOS=-1",
    "FREQ=YEARLY;BYWEEKNO=1,-1;BYDAY=MO",
    "FREQ=MONTHLY;INTERVAL=2;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=1,-1;COUNT=15",
];

fn sweep_windows() -> [(DateTime, DateTime); 4] {
    [
        (datetime(2025, 2, 1, 0, 0, 0, 0), datetime(2025, 6, 30, 23, 59, 59, 0)),
        (datetime(2026, 1, 1, 10, 0, 0, 0), datetime(2027, 12, 31, 0, 0, 0, 0)),
        (datetime(2024, 6, 1, 0, 0, 0, 0), datetime(2025, 1, 1, 10, 0, 0, 0)),
        (datetime(2031, 5, 5, 0, 0, 0, 0), datetime(2034, 5, 5, 0, 0, 0, 0)),
    ]
}

#[test]
fn range_matches_filtered_sequence() {
    let anchor = datetime(2025, 1, 1, 10, 0, 0, 0);
    for src in SWEEP_RULES {
        let rule = rule(src);
        for (start, end) in sweep_windows() {
            let ranged: Vec<_> = generate_occurrences_in_range(&rule, anchor, start, end).collect();
            let filtered: Vec<_> = generate_occurrences(&rule, anchor, None)
                .skip_while(|dt| *dt < start)
                .take_while(|dt| *dt <= end)
                .collect();
            assert_eq!(ranged, filtered, "Failed for {src} in {start}..={end}");
        }
    }
}

#[test]
fn zoned_range_in_other_zone() {
    let rule = rule("FREQ=WEEKLY;INTERVAL=3;BYDAY=TU,SA");
    let anchor = zoned_anchor(datetime(2025, 1, 1, 22, 0, 0, 0), "America/New_York").unwrap();
    let start = zoned_anchor(datetime(2026, 6, 1, 0, 0, 0, 0), "Asia/Tokyo").unwrap();
    let end = zoned_anchor(datetime(2026, 9, 1, 0, 0, 0, 0), "Asia/Tokyo").unwrap();

    let ranged: Vec<_> =
        generate_occurrences_in_range(&rule, anchor.clone(), start.clone(), end.clone()).collect();
    let filtered: Vec<_> = generate_occurrences(&rule, anchor, None)
        .skip_while(|zdt| *zdt < start)
        .take_while(|zdt| *zdt <= end)
        .collect();
    assert!(!ranged.is_empty());
    assert_eq!(ranged, filtered);
}

#[test]
fn generation_is_deterministic_and_ascending() {
    let anchor = datetime(2025, 1, 1, 10, 0, 0, 0);
    for src in SWEEP_RULES {
        let rule = rule(src);
        let first: Vec<_> = generate_occurrences(&rule, anchor, Some(200)).collect();
        let second: Vec<_> = generate_occurrences(&rule, anchor, Some(200)).collect();
        assert_eq!(first, second, "Failed for {src}");
        assert!(!first.is_empty(), "Failed for {src}");
        assert!(first.iter().all(|dt| *dt >= anchor), "Failed for {src}");
        assert!(first.windows(2).all(|w| w[0] < w[1]), "Failed for {src}");
    }
}
