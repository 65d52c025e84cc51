// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::error::RuleError;
use crate::lexer::tokenize;
use crate::node::{Node, Param};
use crate::rule::Rule;

/// Parse a recurrence rule, the value of an RRULE property
///
/// Parameter names and enumerated values are case-insensitive. Parsing stops
/// at the first error.
///
/// ## Errors
///
/// If the rule is malformed or a parameter is missing, unknown, repeated or
/// out of range.
///
/// ## Examples
///
/// Parsing a valid rule
///
/// ```
/// # use cadence_rrule::{Frequency, parse_rule};
/// let rule = parse_rule("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE").unwrap();
/// assert_eq!(rule.frequency(), Frequency::Weekly);
/// assert_eq!(rule.interval(), 2);
/// assert_eq!(rule.by_day().len(), 2);
/// ```
///
/// Errors carry the location of the offending text
///
/// ```
/// # use cadence_rrule::parse_rule;
/// use ariadne::{Color, Label, Report, ReportKind, Source};
/// let src = "FREQ=MONTHLY;BYMONTHDAY=1,32";
/// let err = parse_rule(src).unwrap_err();
/// let span = err.span().unwrap();
/// assert_eq!(&src[span.clone()], "32");
///
/// let report = Report::build(ReportKind::Error, span.clone())
///     .with_config(ariadne::Config::new().with_index_type(ariadne::IndexType::Byte))
///     .with_code(3)
///     .with_message(err.to_string())
///     .with_label(
///         Label::new(span)
///             .with_message("out of range")
///             .with_color(Color::Red),
///     )
///     .finish();
/// report.eprint(Source::from(src)).unwrap();
/// ```
#[tracing::instrument(level = "debug", err)]
pub fn parse_rule(src: &str) -> Result<Rule, RuleError> {
    let mut builder = Rule::builder();
    for part in tokenize(src)? {
        let param = Param::from_str(&part.name).map_err(|_| RuleError::UnrecognizedParameter {
            name: part.name.clone(),
            span: part.name_span.clone(),
        })?;
        builder.push(Node::parse(param, part.value, part.value_span)?)?;
    }
    builder.build()
}
