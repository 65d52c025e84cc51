// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lazy occurrence generation.
//!
//! A rule is expanded one period at a time (a day, a Monday-based week, a
//! month or a year, stepping by INTERVAL). All days of a period are filtered
//! by the BY* parts, the survivors get the anchor's time-of-day, BYSETPOS
//! picks from them, and the result is queued. Only one period is held in
//! memory at any time.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use jiff::Span;
use jiff::civil::{Date, DateTime, Time, Weekday};

use crate::anchor::Anchor;
use crate::calendar::{NthScope, is_nth_weekday, matches_month_day, matches_week_no, select_positions};
use crate::config::ExpandConfig;
use crate::rule::{Frequency, Rule};

/// Generate the occurrences of `rule` starting at `anchor`, ascending.
///
/// The sequence ends with the rule's COUNT or UNTIL, after `limit` items, or
/// never. See [`Expander`] to tune the generator.
#[must_use]
pub fn generate_occurrences<T: Anchor>(
    rule: &Rule,
    anchor: T,
    limit: Option<usize>,
) -> Occurrences<'_, T> {
    Expander::default().occurrences(rule, anchor, limit)
}

/// Generate the occurrences of `rule` within `start..=end`.
///
/// COUNT and UNTIL are applied to the unrestricted sequence, so this yields
/// exactly the items of [`generate_occurrences`] that fall in the range.
#[must_use]
pub fn generate_occurrences_in_range<T: Anchor>(
    rule: &Rule,
    anchor: T,
    start: T,
    end: T,
) -> Occurrences<'_, T> {
    Expander::default().occurrences_in_range(rule, anchor, start, end)
}

/// Occurrence generator with explicit configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expander {
    config: ExpandConfig,
}

impl Expander {
    /// Creates a new generator.
    #[must_use]
    pub fn new(config: ExpandConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    /// See [`generate_occurrences`].
    #[must_use]
    pub fn occurrences<'r, T: Anchor>(
        &self,
        rule: &'r Rule,
        anchor: T,
        limit: Option<usize>,
    ) -> Occurrences<'r, T> {
        let mut iter = Occurrences::new(rule, anchor, self.config);
        iter.limit = limit;
        iter
    }

    /// See [`generate_occurrences_in_range`].
    #[must_use]
    pub fn occurrences_in_range<'r, T: Anchor>(
        &self,
        rule: &'r Rule,
        anchor: T,
        start: T,
        end: T,
    ) -> Occurrences<'r, T> {
        let mut iter = Occurrences::new(rule, anchor, self.config);
        if start > end {
            iter.done = true;
            return iter;
        }

        // COUNT is accounted from the anchor, every period up to the range must be walked
        if rule.count().is_none() && start > iter.anchor {
            iter.skip_to(&start.wall_clock().date());
        }
        iter.window = Some((start, end));
        iter
    }
}

/// Lazy, strictly ascending sequence of occurrences.
///
/// Created by [`generate_occurrences`], [`generate_occurrences_in_range`] or
/// an [`Expander`].
#[derive(Debug, Clone)]
pub struct Occurrences<'r, T> {
    rule: &'r Rule,
    plan: Plan,
    anchor: T,
    base: Date,
    period: i64,
    pending: VecDeque<T>,
    last: Option<T>,
    emitted: u32,
    yielded: usize,
    limit: Option<usize>,
    window: Option<(T, T)>,
    empty_since: Option<Date>,
    max_empty_years: u32,
    done: bool,
}

impl<'r, T: Anchor> Occurrences<'r, T> {
    fn new(rule: &'r Rule, anchor: T, config: ExpandConfig) -> Self {
        let start = anchor.wall_clock();
        let plan = Plan::new(rule, start);
        let base = plan.period_containing(start.date());
        tracing::debug!(%rule, %start, "expanding rule");

        Self {
            rule,
            done: base.is_none() || rule.count() == Some(0),
            plan,
            anchor,
            base: base.unwrap_or(start.date()),
            period: 0,
            pending: VecDeque::new(),
            last: None,
            emitted: 0,
            yielded: 0,
            limit: None,
            window: None,
            empty_since: None,
            max_empty_years: config.max_empty_years,
        }
    }

    /// Move the cursor to the last interval-aligned period before `date`'s one.
    ///
    /// One period of slack covers range bounds given in another time zone.
    fn skip_to(&mut self, date: &Date) {
        let Some(units) = self.plan.units_between(self.base, *date) else {
            return;
        };
        let period = (units / self.plan.interval - 1).max(0);
        if period > self.period {
            tracing::debug!(period, %date, "skipping periods before range");
            self.period = period;
        }
    }

    /// First day of the `n`-th period.
    fn period_start(&self, n: i64) -> Option<Date> {
        let steps = n.checked_mul(self.plan.interval)?;
        let span = match self.plan.freq {
            Frequency::Daily => Span::new().try_days(steps),
            Frequency::Weekly => Span::new().try_weeks(steps),
            Frequency::Monthly => Span::new().try_months(steps),
            Frequency::Yearly => Span::new().try_years(steps),
        }
        .ok()?;
        self.base.checked_add(span).ok()
    }

    /// Whether nothing at or after `instant` can be emitted anymore.
    fn is_beyond_bounds(&self, instant: &T) -> bool {
        if let Some(until) = self.rule.until() {
            if instant.exceeds(until) {
                return true;
            }
        }
        matches!(&self.window, Some((_, end)) if instant > end)
    }

    /// Whether periods have been empty from `since` up to `start` for so long
    /// that the rule cannot match anymore.
    ///
    /// BY* parts only look at the civil date, and the periods line up again
    /// after 400 years times INTERVAL, so a full empty stretch of that length
    /// repeats forever.
    fn is_exhausted(&self, since: Date, start: Date) -> bool {
        let years = i64::from(self.max_empty_years).saturating_mul(self.plan.interval);
        Span::new()
            .try_years(years)
            .ok()
            .and_then(|span| since.checked_add(span).ok())
            .is_some_and(|limit| start >= limit)
    }

    /// Queue the candidates of the next non-empty period.
    ///
    /// Returns `false` when the sequence can produce nothing more.
    fn expand_next_period(&mut self) -> bool {
        loop {
            let Some(start) = self.period_start(self.period) else {
                tracing::debug!(period = self.period, "calendar range exhausted");
                return false;
            };
            self.period += 1;

            let midnight = start.to_datetime(Time::midnight());
            if let Some(first) = self.anchor.at_wall_clock(midnight) {
                if self.is_beyond_bounds(&first) {
                    return false;
                }
            }

            let candidates = self.plan.candidates(start);
            if candidates.is_empty() {
                let since = *self.empty_since.get_or_insert(start);
                if self.is_exhausted(since, start) {
                    tracing::warn!(
                        rule = %self.rule,
                        %since,
                        "no occurrence found in consecutive periods, giving up"
                    );
                    return false;
                }
                continue;
            }

            self.empty_since = None;
            let anchor = &self.anchor;
            self.pending
                .extend(candidates.into_iter().filter_map(|dt| anchor.at_wall_clock(dt)));
            return true;
        }
    }
}

impl<T: Anchor> Iterator for Occurrences<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while !self.done {
            if self.limit.is_some_and(|limit| self.yielded >= limit)
                || self.rule.count().is_some_and(|count| self.emitted >= count)
            {
                self.done = true;
                break;
            }

            let Some(candidate) = self.pending.pop_front() else {
                self.done = !self.expand_next_period();
                continue;
            };

            if candidate < self.anchor || self.last.as_ref().is_some_and(|last| candidate <= *last) {
                continue;
            }

            if let Some(until) = self.rule.until() {
                if candidate.exceeds(until) {
                    self.done = true;
                    break;
                }
            }

            self.emitted += 1;
            self.last = Some(candidate.clone());

            if let Some((start, end)) = &self.window {
                if candidate > *end {
                    self.done = true;
                    break;
                }
                if candidate < *start {
                    continue;
                }
            }

            self.yielded += 1;
            return Some(candidate);
        }

        self.pending.clear();
        None
    }
}

impl<T: Anchor> FusedIterator for Occurrences<'_, T> {}

/// BY* parts of a rule with the anchor defaults filled in.
#[derive(Debug, Clone)]
struct Plan {
    freq: Frequency,
    interval: i64,
    time: Time,
    by_month: Vec<i8>,
    by_week_no: Vec<i8>,
    by_month_day: Vec<i8>,
    weekdays: Vec<Weekday>,
    nth_weekdays: Vec<(i8, Weekday)>,
    nth_scope: NthScope,
    by_set_pos: Vec<i16>,
}

impl Plan {
    fn new(rule: &Rule, anchor: DateTime) -> Self {
        let freq = rule.frequency();
        let mut by_month: Vec<i8> = rule
            .by_month()
            .iter()
            .filter_map(|&m| i8::try_from(m).ok())
            .collect();
        let mut by_month_day = rule.by_month_day().to_vec();

        let by_week_no = if freq == Frequency::Yearly {
            rule.by_week_no().to_vec()
        } else {
            if !rule.by_week_no().is_empty() {
                tracing::debug!(%freq, "BYWEEKNO only applies to YEARLY rules, ignored");
            }
            Vec::new()
        };

        let nth_scope = if freq == Frequency::Yearly && by_month.is_empty() {
            NthScope::Year
        } else {
            NthScope::Month
        };
        let ordinals_apply = matches!(freq, Frequency::Monthly | Frequency::Yearly);

        let mut weekdays = Vec::new();
        let mut nth_weekdays = Vec::new();
        for day in rule.by_day() {
            let weekday = Weekday::from(day.weekday);
            match day.ordinal {
                Some(n) if ordinals_apply => nth_weekdays.push((n, weekday)),
                _ if !weekdays.contains(&weekday) => weekdays.push(weekday),
                _ => {}
            }
        }

        // Without a day selector the anchor's date supplies the pattern
        if by_week_no.is_empty() && by_month_day.is_empty() && rule.by_day().is_empty() {
            match freq {
                Frequency::Yearly => {
                    if by_month.is_empty() {
                        by_month.push(anchor.month());
                    }
                    by_month_day.push(anchor.day());
                }
                Frequency::Monthly => by_month_day.push(anchor.day()),
                Frequency::Weekly => weekdays.push(anchor.weekday()),
                Frequency::Daily => {}
            }
        }

        Self {
            freq,
            interval: i64::from(rule.interval()),
            time: anchor.time(),
            by_month,
            by_week_no,
            by_month_day,
            weekdays,
            nth_weekdays,
            nth_scope,
            by_set_pos: rule.by_set_pos().to_vec(),
        }
    }

    /// First day of the period `date` falls in.
    fn period_containing(&self, date: Date) -> Option<Date> {
        match self.freq {
            Frequency::Daily => Some(date),
            Frequency::Weekly => {
                let offset = i64::from(date.weekday().to_monday_zero_offset());
                date.checked_sub(Span::new().try_days(offset).ok()?).ok()
            }
            Frequency::Monthly => Some(date.first_of_month()),
            Frequency::Yearly => Some(date.first_of_year()),
        }
    }

    /// Number of whole frequency units from `base` to the period containing `date`.
    fn units_between(&self, base: Date, date: Date) -> Option<i64> {
        let months = |a: Date, b: Date| {
            (i64::from(b.year()) - i64::from(a.year())) * 12 + i64::from(b.month()) - i64::from(a.month())
        };
        let units = match self.freq {
            Frequency::Daily => i64::from(base.until(date).ok()?.get_days()),
            Frequency::Weekly => i64::from(base.until(date).ok()?.get_days()) / 7,
            Frequency::Monthly => months(base, date),
            Frequency::Yearly => i64::from(date.year()) - i64::from(base.year()),
        };
        (units > 0).then_some(units)
    }

    /// Candidate date-times of the period starting at `start`, ascending.
    fn candidates(&self, start: Date) -> Vec<DateTime> {
        let len = match self.freq {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => i16::from(start.days_in_month()),
            Frequency::Yearly => start.days_in_year(),
        };

        let mut days = Vec::new();
        let mut day = start;
        for i in 0..len {
            if self.matches(day) {
                days.push(day.to_datetime(self.time));
            }
            if i + 1 < len {
                match day.tomorrow() {
                    Ok(next) => day = next,
                    Err(_) => break,
                }
            }
        }

        if self.by_set_pos.is_empty() {
            days
        } else {
            select_positions(&days, &self.by_set_pos)
        }
    }

    fn matches(&self, date: Date) -> bool {
        (self.by_month.is_empty() || self.by_month.contains(&date.month()))
            && (self.by_week_no.is_empty() || matches_week_no(date, &self.by_week_no))
            && (self.by_month_day.is_empty() || matches_month_day(date, &self.by_month_day))
            && self.matches_weekday(date)
    }

    fn matches_weekday(&self, date: Date) -> bool {
        if self.weekdays.is_empty() && self.nth_weekdays.is_empty() {
            return true;
        }
        let weekday = date.weekday();
        self.weekdays.contains(&weekday)
            || self
                .nth_weekdays
                .iter()
                .any(|&(n, w)| w == weekday && is_nth_weekday(date, n, self.nth_scope))
    }
}
