// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Typed rule parts, one per recognized parameter.
//!
//! Each node validates its own raw value. Checks involving several parameters
//! live in [`RuleBuilder::build`](crate::RuleBuilder::build).

use std::fmt::{self, Display};

use strum::VariantNames;

use crate::error::{RuleError, Span};
use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO,
    KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL,
};
use crate::rule::{Frequency, Until, Weekday, WeekdayNum};
use crate::value::{self, RawDateTime, RawWeekdayNum};

/// Upper bound of INTERVAL and COUNT.
const POSITIVE_MAX: i64 = u32::MAX as i64;

/// Occurrence number of a BYDAY item, e.g. the `-1` of `-1FR`.
pub(crate) const WEEKDAY_ORDINAL: Domain = Domain::Integer {
    min: -53,
    max: 53,
    zero: false,
};

/// Recognized rule parameter names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::EnumIter, strum::VariantNames,
)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum Param {
    #[strum(serialize = "FREQ")]
    Freq,
    #[strum(serialize = "INTERVAL")]
    Interval,
    #[strum(serialize = "COUNT")]
    Count,
    #[strum(serialize = "UNTIL")]
    Until,
    #[strum(serialize = "BYMONTH")]
    ByMonth,
    #[strum(serialize = "BYWEEKNO")]
    ByWeekNo,
    #[strum(serialize = "BYMONTHDAY")]
    ByMonthDay,
    #[strum(serialize = "BYDAY")]
    ByDay,
    #[strum(serialize = "BYSETPOS")]
    BySetPos,
}

impl Param {
    /// The values this parameter accepts.
    #[must_use]
    pub const fn domain(self) -> Domain {
        match self {
            Param::Freq => Domain::Choice(Frequency::VARIANTS),
            Param::Interval => Domain::Integer {
                min: 1,
                max: POSITIVE_MAX,
                zero: false,
            },
            Param::Count => Domain::Integer {
                min: 0,
                max: POSITIVE_MAX,
                zero: true,
            },
            Param::Until => Domain::DateTime,
            Param::ByMonth => Domain::Integer {
                min: 1,
                max: 12,
                zero: false,
            },
            Param::ByWeekNo => Domain::Integer {
                min: -53,
                max: 53,
                zero: false,
            },
            Param::ByMonthDay => Domain::Integer {
                min: -31,
                max: 31,
                zero: false,
            },
            Param::ByDay => Domain::Choice(Weekday::VARIANTS),
            Param::BySetPos => Domain::Integer {
                min: -366,
                max: 366,
                zero: false,
            },
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Freq => write!(f, "{KW_RRULE_FREQ}"),
            Param::Interval => write!(f, "{KW_RRULE_INTERVAL}"),
            Param::Count => write!(f, "{KW_RRULE_COUNT}"),
            Param::Until => write!(f, "{KW_RRULE_UNTIL}"),
            Param::ByMonth => write!(f, "{KW_RRULE_BYMONTH}"),
            Param::ByWeekNo => write!(f, "{KW_RRULE_BYWEEKNO}"),
            Param::ByMonthDay => write!(f, "{KW_RRULE_BYMONTHDAY}"),
            Param::ByDay => write!(f, "{KW_RRULE_BYDAY}"),
            Param::BySetPos => write!(f, "{KW_RRULE_BYSETPOS}"),
        }
    }
}

/// Permissible values of a parameter, used for validation and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// One of a fixed set of literals (case-insensitive)
    Choice(&'static [&'static str]),

    /// An integer within `min..=max`, zero only if `zero` is set
    Integer {
        /// Lower bound, inclusive
        min: i64,
        /// Upper bound, inclusive
        max: i64,
        /// Whether zero is accepted
        zero: bool,
    },

    /// A date or date-time literal
    DateTime,
}

impl Domain {
    /// Whether `value` lies in an integer domain. Always false for other domains.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        match *self {
            Domain::Integer { min, max, zero } => (min..=max).contains(&value) && (zero || value != 0),
            Domain::Choice(_) | Domain::DateTime => false,
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Domain::Choice(choices) => write!(f, "one of {}", choices.join(", ")),
            Domain::Integer { min: 1, max, .. } if max == POSITIVE_MAX => {
                write!(f, "a positive integer")
            }
            Domain::Integer { min: 0, max, .. } if max == POSITIVE_MAX => {
                write!(f, "a non-negative integer")
            }
            Domain::Integer { min, max, zero } if min < 0 && !zero => {
                write!(f, "an integer in {min}..=-1 or 1..={max}")
            }
            Domain::Integer { min, max, .. } => write!(f, "an integer in {min}..={max}"),
            Domain::DateTime => write!(
                f,
                "a date or date-time such as 20250103, 20250103T090000Z or 2025-01-03T09:00:00"
            ),
        }
    }
}

/// A rule part.
///
/// Values produced by [`Node::parse`] are validated. Nodes built by hand are
/// checked when the rule is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(missing_docs)]
pub enum Node {
    Freq(Frequency),
    Interval(u32),
    Count(u32),
    Until(Until),
    ByMonth(Vec<u8>),
    ByWeekNo(Vec<i8>),
    ByMonthDay(Vec<i8>),
    ByDay(Vec<WeekdayNum>),
    BySetPos(Vec<i16>),
}

impl Node {
    /// Parse and validate the raw value of one parameter.
    ///
    /// `span` locates `raw` in the rule string and is attached to errors.
    ///
    /// ## Errors
    ///
    /// A parameter scoped error naming `param` and the raw value.
    pub fn parse(param: Param, raw: &str, span: Span) -> Result<Self, RuleError> {
        if raw.is_empty() {
            return Err(RuleError::EmptyValue { param, span });
        }

        let node = match param {
            Param::Freq => Node::Freq(raw.parse().map_err(|_| RuleError::InvalidChoice {
                param,
                value: raw.to_owned(),
                domain: param.domain(),
                span,
            })?),
            Param::Interval => Node::Interval(parse_u32(param, raw, span)?),
            Param::Count => Node::Count(parse_u32(param, raw, span)?),
            Param::Until => Node::Until(parse_until(param, raw, span)?),
            Param::ByMonth => Node::ByMonth(parse_int_list(param, raw, span)?),
            Param::ByWeekNo => Node::ByWeekNo(parse_int_list(param, raw, span)?),
            Param::ByMonthDay => Node::ByMonthDay(parse_int_list(param, raw, span)?),
            Param::ByDay => Node::ByDay(parse_by_day(param, raw, span)?),
            Param::BySetPos => Node::BySetPos(parse_int_list(param, raw, span)?),
        };
        Ok(node)
    }

    /// The parameter this node was parsed from.
    #[must_use]
    pub fn param(&self) -> Param {
        match self {
            Node::Freq(_) => Param::Freq,
            Node::Interval(_) => Param::Interval,
            Node::Count(_) => Param::Count,
            Node::Until(_) => Param::Until,
            Node::ByMonth(_) => Param::ByMonth,
            Node::ByWeekNo(_) => Param::ByWeekNo,
            Node::ByMonthDay(_) => Param::ByMonthDay,
            Node::ByDay(_) => Param::ByDay,
            Node::BySetPos(_) => Param::BySetPos,
        }
    }
}

fn invalid_integer(param: Param, raw: &str, span: Span) -> RuleError {
    RuleError::InvalidInteger {
        param,
        value: raw.to_owned(),
        domain: param.domain(),
        span,
    }
}

fn parse_u32(param: Param, raw: &str, span: Span) -> Result<u32, RuleError> {
    let domain = param.domain();
    value::parse_integer(raw)
        .filter(|v| domain.contains(*v))
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid_integer(param, raw, span))
}

/// Comma separated integers, each checked against the parameter's domain.
/// Repeated values are dropped, keeping the first occurrence.
fn parse_int_list<T>(param: Param, raw: &str, span: Span) -> Result<Vec<T>, RuleError>
where
    T: TryFrom<i64> + PartialEq,
{
    let domain = param.domain();
    let items = value::parse_integer_list(raw).ok_or_else(|| invalid_integer(param, raw, span.clone()))?;

    let mut values = Vec::with_capacity(items.len());
    for (item, item_span) in items {
        let value = Some(item)
            .filter(|v| domain.contains(*v))
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| {
                let raw_item = raw.get(item_span.clone()).unwrap_or(raw);
                invalid_integer(param, raw_item, offset(&span, &item_span))
            })?;
        if !values.contains(&value) {
            values.push(value);
        }
    }
    Ok(values)
}

fn parse_by_day(param: Param, raw: &str, span: Span) -> Result<Vec<WeekdayNum>, RuleError> {
    let items = value::parse_weekday_num_list(raw).ok_or_else(|| RuleError::InvalidChoice {
        param,
        value: raw.to_owned(),
        domain: param.domain(),
        span: span.clone(),
    })?;

    let mut values = Vec::with_capacity(items.len());
    for (RawWeekdayNum { sign, ordinal, weekday }, item_span) in items {
        let raw_item = raw.get(item_span.clone()).unwrap_or(raw);
        let item_span = offset(&span, &item_span);

        let weekday: Weekday = weekday.parse().map_err(|_| RuleError::InvalidChoice {
            param,
            value: raw_item.to_owned(),
            domain: param.domain(),
            span: item_span.clone(),
        })?;

        let ordinal = match (sign, ordinal) {
            (None, None) => None,
            (_, Some(n)) => {
                let n = if sign == Some('-') { -n } else { n };
                match i8::try_from(n) {
                    Ok(n) if WEEKDAY_ORDINAL.contains(i64::from(n)) => Some(n),
                    _ => {
                        return Err(RuleError::InvalidInteger {
                            param,
                            value: raw_item.to_owned(),
                            domain: WEEKDAY_ORDINAL,
                            span: item_span,
                        });
                    }
                }
            }
            // sign without digits, e.g. "+MO"
            (Some(_), None) => {
                return Err(RuleError::InvalidInteger {
                    param,
                    value: raw_item.to_owned(),
                    domain: WEEKDAY_ORDINAL,
                    span: item_span,
                });
            }
        };

        let value = WeekdayNum { ordinal, weekday };
        if !values.contains(&value) {
            values.push(value);
        }
    }
    Ok(values)
}

fn parse_until(param: Param, raw: &str, span: Span) -> Result<Until, RuleError> {
    let invalid = || RuleError::InvalidDate {
        param,
        value: raw.to_owned(),
        domain: param.domain(),
        span: span.clone(),
    };

    let RawDateTime { date, time } = value::parse_date_time(raw).ok_or_else(invalid)?;
    let date = jiff::civil::Date::new(date.0, date.1, date.2).map_err(|_| invalid())?;
    match time {
        None => Ok(Until::date(date)),
        Some((hour, minute, second, utc)) => {
            // NOTE: leap second 60 is contracted to 59
            let time =
                jiff::civil::Time::new(hour, minute, second.min(59), 0).map_err(|_| invalid())?;
            Ok(Until::date_time(date.to_datetime(time), utc))
        }
    }
}

/// Shift a span relative to a value into a span relative to the rule string.
fn offset(base: &Span, inner: &Span) -> Span {
    (base.start + inner.start)..(base.start + inner.end)
}
