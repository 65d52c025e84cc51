// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value grammars of the rule parameters.
//!
//! These parsers only recognize the shape of a value. Range checks and
//! literal lookups are done by the [`node`](crate::node) module so that the
//! error can name the offending parameter.

use chumsky::extra;
use chumsky::prelude::*;

use crate::error::Span;

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Parse a single signed integer, e.g. `12`, `+3`, `-1`.
pub(crate) fn parse_integer(src: &str) -> Option<i64> {
    signed_integer().then_ignore(end()).parse(src).into_result().ok()
}

/// Parse a comma separated list of signed integers, keeping the span of each item.
///
/// ```txt
/// intlist     = signedint *("," signedint)
/// signedint   = [plus / minus] 1*DIGIT
/// ```
pub(crate) fn parse_integer_list(src: &str) -> Option<Vec<(i64, Span)>> {
    signed_integer()
        .map_with(|v, e| {
            let span: SimpleSpan = e.span();
            (v, span.into_range())
        })
        .separated_by(just(','))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .parse(src)
        .into_result()
        .ok()
}

/// Shape of a BYDAY item before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawWeekdayNum<'src> {
    /// Explicit sign, if any
    pub sign: Option<char>,
    /// Unsigned ordinal, if any
    pub ordinal: Option<i64>,
    /// Letters naming the weekday, not yet checked
    pub weekday: &'src str,
}

/// Parse a comma separated BYDAY list, keeping the span of each item.
///
/// ```txt
/// bywdaylist  = ( weekdaynum *("," weekdaynum) )
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// ```
pub(crate) fn parse_weekday_num_list(src: &str) -> Option<Vec<(RawWeekdayNum<'_>, Span)>> {
    sign()
        .or_not()
        .then(unsigned_integer().or_not())
        .then(letters())
        .map_with(|((sign, ordinal), weekday), e| {
            let span: SimpleSpan = e.span();
            let raw = RawWeekdayNum {
                sign,
                ordinal,
                weekday,
            };
            (raw, span.into_range())
        })
        .separated_by(just(','))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .parse(src)
        .into_result()
        .ok()
}

/// Numeric components of a date or date-time, not yet checked against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawDateTime {
    /// Year, month, day
    pub date: (i16, i8, i8),
    /// Hour, minute, second and the UTC marker
    pub time: Option<(i8, i8, i8, bool)>,
}

/// Parse a date or date-time, in RFC 5545 basic or ISO 8601 extended form.
///
/// ```txt
/// enddate     = date / date-time
/// date        = 4DIGIT ["-"] 2DIGIT ["-"] 2DIGIT
/// date-time   = date "T" 2DIGIT [":"] 2DIGIT [":"] 2DIGIT ["Z"]
/// ```
pub(crate) fn parse_date_time(src: &str) -> Option<RawDateTime> {
    let date = fixed_digits(4)
        .then_ignore(just('-').or_not())
        .then(fixed_digits(2))
        .then_ignore(just('-').or_not())
        .then(fixed_digits(2));

    let time = just('T')
        .ignore_then(fixed_digits(2))
        .then_ignore(just(':').or_not())
        .then(fixed_digits(2))
        .then_ignore(just(':').or_not())
        .then(fixed_digits(2))
        .then(just('Z').or_not());

    date.then(time.or_not())
        .then_ignore(end())
        .try_map(|(((year, month), day), time), span| {
            let narrow = || -> Option<RawDateTime> {
                let date = (
                    i16::try_from(year).ok()?,
                    i8::try_from(month).ok()?,
                    i8::try_from(day).ok()?,
                );
                let time = match time {
                    Some((((hour, minute), second), utc)) => Some((
                        i8::try_from(hour).ok()?,
                        i8::try_from(minute).ok()?,
                        i8::try_from(second).ok()?,
                        utc.is_some(),
                    )),
                    None => None,
                };
                Some(RawDateTime { date, time })
            };
            narrow().ok_or_else(|| Rich::custom(span, "date component out of range"))
        })
        .parse(src)
        .into_result()
        .ok()
}

// Helper parsers

fn sign<'src>() -> impl Parser<'src, &'src str, char, Extra<'src>> + Clone {
    one_of("+-")
}

fn letters<'src>() -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
    any()
        .filter(char::is_ascii_alphabetic)
        .repeated()
        .at_least(1)
        .to_slice()
}

fn digits<'src>() -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
    any()
        .filter(char::is_ascii_digit)
        .repeated()
        .at_least(1)
        .to_slice()
}

/// Parse i64 (1 or more digits)
fn unsigned_integer<'src>() -> impl Parser<'src, &'src str, i64, Extra<'src>> + Clone {
    digits().try_map(|str: &str, span| {
        lexical::parse::<i64, _>(str).map_err(|_| Rich::custom(span, "integer out of range"))
    })
}

fn signed_integer<'src>() -> impl Parser<'src, &'src str, i64, Extra<'src>> + Clone {
    sign()
        .or_not()
        .then(unsigned_integer())
        .map(|(sign, n)| if sign == Some('-') { -n } else { n })
}

/// Exactly `len` digits as a number.
fn fixed_digits<'src>(len: usize) -> impl Parser<'src, &'src str, i64, Extra<'src>> + Clone {
    any()
        .filter(char::is_ascii_digit)
        .repeated()
        .exactly(len)
        .to_slice()
        .try_map(|str: &str, span| {
            lexical::parse::<i64, _>(str).map_err(|_| Rich::custom(span, "invalid digits"))
        })
}
