// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule type definitions.

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::civil;

use crate::error::RuleError;
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE,
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY,
};
use crate::node::{Domain, Node, Param, WEEKDAY_ORDINAL};

/// Recurrence rule
///
/// Immutable once built, produced by [`parse_rule`](crate::parse_rule) or a
/// [`RuleBuilder`]. Every BY* list is deduplicated and keeps its original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    freq: Frequency,
    interval: u32,
    count: Option<u32>,
    until: Option<Until>,
    by_month: Vec<u8>,
    by_week_no: Vec<i8>,
    by_month_day: Vec<i8>,
    by_day: Vec<WeekdayNum>,
    by_set_pos: Vec<i16>,
}

impl Rule {
    /// Start building a rule from nodes.
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Frequency of recurrence
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.freq
    }

    /// Number of periods between two steps, at least 1
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Maximum number of occurrences
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Last instant at which an occurrence may happen, inclusive
    #[must_use]
    pub fn until(&self) -> Option<&Until> {
        self.until.as_ref()
    }

    /// Month specifier, 1-12
    #[must_use]
    pub fn by_month(&self) -> &[u8] {
        &self.by_month
    }

    /// ISO week number specifier, -53..=-1 and 1..=53
    #[must_use]
    pub fn by_week_no(&self) -> &[i8] {
        &self.by_week_no
    }

    /// Day of month specifier, -31..=-1 and 1..=31
    #[must_use]
    pub fn by_month_day(&self) -> &[i8] {
        &self.by_month_day
    }

    /// Day of week specifier
    #[must_use]
    pub fn by_day(&self) -> &[WeekdayNum] {
        &self.by_day
    }

    /// Position in the expanded set of each period
    #[must_use]
    pub fn by_set_pos(&self) -> &[i16] {
        &self.by_set_pos
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_rule(s)
    }
}

/// Canonical form, parameters in a fixed order. INTERVAL is omitted when it is 1.
impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: Display>(f: &mut fmt::Formatter<'_>, param: Param, values: &[T]) -> fmt::Result {
            if values.is_empty() {
                return Ok(());
            }
            write!(f, ";{param}=")?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{v}")?;
            }
            Ok(())
        }

        write!(f, "{}={}", Param::Freq, self.freq)?;
        if self.interval != 1 {
            write!(f, ";{}={}", Param::Interval, self.interval)?;
        }
        if let Some(count) = self.count {
            write!(f, ";{}={count}", Param::Count)?;
        }
        if let Some(until) = &self.until {
            write!(f, ";{}={until}", Param::Until)?;
        }
        list(f, Param::ByMonth, &self.by_month)?;
        list(f, Param::ByWeekNo, &self.by_week_no)?;
        list(f, Param::ByMonthDay, &self.by_month_day)?;
        list(f, Param::ByDay, &self.by_day)?;
        list(f, Param::BySetPos, &self.by_set_pos)
    }
}

/// Accumulates nodes, then validates them all at once in [`RuleBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    freq: Option<Frequency>,
    interval: Option<u32>,
    count: Option<u32>,
    until: Option<Until>,
    by_month: Option<Vec<u8>>,
    by_week_no: Option<Vec<i8>>,
    by_month_day: Option<Vec<i8>>,
    by_day: Option<Vec<WeekdayNum>>,
    by_set_pos: Option<Vec<i16>>,
}

impl RuleBuilder {
    /// Add a node.
    ///
    /// ## Errors
    ///
    /// If a node for the same parameter was already added.
    pub fn push(&mut self, node: Node) -> Result<&mut Self, RuleError> {
        fn set<T>(slot: &mut Option<T>, param: Param, value: T) -> Result<(), RuleError> {
            if slot.is_some() {
                return Err(RuleError::DuplicateParameter {
                    name: param.to_string(),
                    span: None,
                });
            }
            *slot = Some(value);
            Ok(())
        }

        let param = node.param();
        match node {
            Node::Freq(v) => set(&mut self.freq, param, v)?,
            Node::Interval(v) => set(&mut self.interval, param, v)?,
            Node::Count(v) => set(&mut self.count, param, v)?,
            Node::Until(v) => set(&mut self.until, param, v)?,
            Node::ByMonth(v) => set(&mut self.by_month, param, v)?,
            Node::ByWeekNo(v) => set(&mut self.by_week_no, param, v)?,
            Node::ByMonthDay(v) => set(&mut self.by_month_day, param, v)?,
            Node::ByDay(v) => set(&mut self.by_day, param, v)?,
            Node::BySetPos(v) => set(&mut self.by_set_pos, param, v)?,
        }
        Ok(self)
    }

    /// Apply defaults and cross-parameter checks, producing the rule.
    ///
    /// ## Errors
    ///
    /// If FREQ is missing, a value lies outside its parameter's range, or
    /// BYSETPOS is given without another BY* part. Range errors carry an empty
    /// span as the nodes have no location.
    pub fn build(self) -> Result<Rule, RuleError> {
        let freq = self.freq.ok_or(RuleError::MissingParameter {
            param: Param::Freq,
        })?;

        let by_month = dedup(self.by_month.unwrap_or_default());
        let by_week_no = dedup(self.by_week_no.unwrap_or_default());
        let by_month_day = dedup(self.by_month_day.unwrap_or_default());
        let by_day = dedup(self.by_day.unwrap_or_default());
        let by_set_pos = dedup(self.by_set_pos.unwrap_or_default());

        check_range(Param::Interval, Param::Interval.domain(), self.interval.as_slice())?;
        check_range(Param::Count, Param::Count.domain(), self.count.as_slice())?;
        check_range(Param::ByMonth, Param::ByMonth.domain(), &by_month)?;
        check_range(Param::ByWeekNo, Param::ByWeekNo.domain(), &by_week_no)?;
        check_range(Param::ByMonthDay, Param::ByMonthDay.domain(), &by_month_day)?;
        let ordinals: Vec<i8> = by_day.iter().filter_map(|day| day.ordinal).collect();
        check_range(Param::ByDay, WEEKDAY_ORDINAL, &ordinals)?;
        check_range(Param::BySetPos, Param::BySetPos.domain(), &by_set_pos)?;

        if !by_set_pos.is_empty()
            && by_month.is_empty()
            && by_week_no.is_empty()
            && by_month_day.is_empty()
            && by_day.is_empty()
        {
            return Err(RuleError::InvalidCombination {
                param: Param::BySetPos,
                requires: "BYDAY, BYMONTHDAY, BYMONTH or BYWEEKNO",
            });
        }

        if let (Some(count), Some(until)) = (self.count, &self.until) {
            // RFC 5545 forbids this, accepted for compatibility, whichever ends first wins
            tracing::warn!(count, %until, "rule has both COUNT and UNTIL");
        }

        Ok(Rule {
            freq,
            interval: self.interval.unwrap_or(1),
            count: self.count,
            until: self.until,
            by_month,
            by_week_no,
            by_month_day,
            by_day,
            by_set_pos,
        })
    }
}

/// Drop repeated values, keeping the first occurrence.
fn dedup<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(values.len());
    for v in values {
        if !unique.contains(&v) {
            unique.push(v);
        }
    }
    unique
}

fn check_range<T>(param: Param, domain: Domain, values: &[T]) -> Result<(), RuleError>
where
    T: Copy + Into<i64> + Display,
{
    match values.iter().find(|v| !domain.contains((**v).into())) {
        Some(v) => Err(RuleError::InvalidInteger {
            param,
            value: v.to_string(),
            domain,
            span: 0..0,
        }),
        None => Ok(()),
    }
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::VariantNames)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Frequency {
    #[strum(serialize = "DAILY")]
    Daily,
    #[strum(serialize = "WEEKLY")]
    Weekly,
    #[strum(serialize = "MONTHLY")]
    Monthly,
    #[strum(serialize = "YEARLY")]
    Yearly,
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            Frequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            Frequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            Frequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

/// Day of the week, weeks start on Monday
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Weekday {
    #[strum(serialize = "MO")]
    Monday,
    #[strum(serialize = "TU")]
    Tuesday,
    #[strum(serialize = "WE")]
    Wednesday,
    #[strum(serialize = "TH")]
    Thursday,
    #[strum(serialize = "FR")]
    Friday,
    #[strum(serialize = "SA")]
    Saturday,
    #[strum(serialize = "SU")]
    Sunday,
}

impl Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Monday => write!(f, "{KW_DAY_MO}"),
            Weekday::Tuesday => write!(f, "{KW_DAY_TU}"),
            Weekday::Wednesday => write!(f, "{KW_DAY_WE}"),
            Weekday::Thursday => write!(f, "{KW_DAY_TH}"),
            Weekday::Friday => write!(f, "{KW_DAY_FR}"),
            Weekday::Saturday => write!(f, "{KW_DAY_SA}"),
            Weekday::Sunday => write!(f, "{KW_DAY_SU}"),
        }
    }
}

impl From<Weekday> for civil::Weekday {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Monday => civil::Weekday::Monday,
            Weekday::Tuesday => civil::Weekday::Tuesday,
            Weekday::Wednesday => civil::Weekday::Wednesday,
            Weekday::Thursday => civil::Weekday::Thursday,
            Weekday::Friday => civil::Weekday::Friday,
            Weekday::Saturday => civil::Weekday::Saturday,
            Weekday::Sunday => civil::Weekday::Sunday,
        }
    }
}

impl From<civil::Weekday> for Weekday {
    fn from(value: civil::Weekday) -> Self {
        match value {
            civil::Weekday::Monday => Weekday::Monday,
            civil::Weekday::Tuesday => Weekday::Tuesday,
            civil::Weekday::Wednesday => Weekday::Wednesday,
            civil::Weekday::Thursday => Weekday::Thursday,
            civil::Weekday::Friday => Weekday::Friday,
            civil::Weekday::Saturday => Weekday::Saturday,
            civil::Weekday::Sunday => Weekday::Sunday,
        }
    }
}

/// Day of week with optional occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayNum {
    /// Occurrence within the month or year, negative counts from the end
    pub ordinal: Option<i8>,

    /// Day of the week
    pub weekday: Weekday,
}

impl WeekdayNum {
    /// Every `weekday` of the period.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// The `ordinal`-th `weekday` of the period.
    #[must_use]
    pub const fn nth(ordinal: i8, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{n}{}", self.weekday),
            None => write!(f, "{}", self.weekday),
        }
    }
}

/// Upper bound of a recurrence, the value of UNTIL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Until {
    datetime: civil::DateTime,
    utc: bool,
    date_only: bool,
}

impl Until {
    /// A date-only bound, taken as midnight of that day.
    #[must_use]
    pub fn date(date: civil::Date) -> Self {
        Self {
            datetime: date.to_datetime(civil::Time::midnight()),
            utc: false,
            date_only: true,
        }
    }

    /// A date-time bound, in UTC when `utc` is set, floating otherwise.
    #[must_use]
    pub fn date_time(datetime: civil::DateTime, utc: bool) -> Self {
        Self {
            datetime,
            utc,
            date_only: false,
        }
    }

    /// The bound as wall-clock date-time
    #[must_use]
    pub fn datetime(&self) -> civil::DateTime {
        self.datetime
    }

    /// Whether the bound was given in UTC (trailing `Z`)
    #[must_use]
    pub fn is_utc(&self) -> bool {
        self.utc
    }

    /// Whether the bound was given without a time
    #[must_use]
    pub fn is_date_only(&self) -> bool {
        self.date_only
    }

    /// The bound as an instant, when it was given in UTC.
    #[must_use]
    pub fn timestamp(&self) -> Option<jiff::Timestamp> {
        if !self.utc {
            return None;
        }
        self.datetime
            .to_zoned(jiff::tz::TimeZone::UTC)
            .ok()
            .map(|zdt| zdt.timestamp())
    }
}

/// RFC 5545 basic form, e.g. `20250103` or `20250103T090000Z`.
impl Display for Until {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.datetime;
        write!(f, "{:04}{:02}{:02}", dt.year(), dt.month(), dt.day())?;
        if !self.date_only {
            write!(f, "T{:02}{:02}{:02}", dt.hour(), dt.minute(), dt.second())?;
            if self.utc {
                write!(f, "Z")?;
            }
        }
        Ok(())
    }
}
