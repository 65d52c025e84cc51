// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while turning a rule string into a [`Rule`](crate::Rule).

use std::ops::Range;

use crate::node::{Domain, Param};

/// Byte range into the rule string that an error points at.
pub type Span = Range<usize>;

/// Error type for recurrence rule parsing.
///
/// Parsing stops at the first error, no partially built rule is ever returned.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A rule part without a `=` separator.
    #[error("Malformed rule part '{part}', expected NAME=VALUE")]
    MalformedPart {
        /// The offending rule part
        part: String,
        /// Location of the rule part
        span: Span,
    },

    /// A rule part with nothing before the `=`.
    #[error("Empty parameter name in rule part '{part}'")]
    EmptyName {
        /// The offending rule part
        part: String,
        /// Location of the rule part
        span: Span,
    },

    /// Whitespace inside a parameter name or value.
    #[error("Whitespace is not permitted inside rule part '{part}'")]
    WhitespaceInValue {
        /// The offending rule part
        part: String,
        /// Location of the whitespace
        span: Span,
    },

    /// The same parameter given twice.
    #[error("Duplicate parameter '{name}'")]
    DuplicateParameter {
        /// Normalized parameter name
        name: String,
        /// Location of the second occurrence, if parsed from text
        span: Option<Span>,
    },

    /// A parameter name outside the supported set.
    #[error("Unrecognized parameter '{name}'")]
    UnrecognizedParameter {
        /// Normalized parameter name
        name: String,
        /// Location of the parameter name
        span: Span,
    },

    /// A required parameter is absent.
    #[error("Missing required parameter '{param}'")]
    MissingParameter {
        /// The missing parameter
        param: Param,
    },

    /// A parameter with an empty value, e.g. `BYDAY=`.
    #[error("Parameter '{param}' has no value")]
    EmptyValue {
        /// The parameter
        param: Param,
        /// Location right after the `=`
        span: Span,
    },

    /// A literal outside an enumerated set.
    #[error("Invalid value '{value}' for {param}, expected {domain}")]
    InvalidChoice {
        /// The parameter
        param: Param,
        /// The raw rejected literal
        value: String,
        /// The permissible choices
        domain: Domain,
        /// Location of the value
        span: Span,
    },

    /// A non-numeric integer, or one violating positivity, range or nonzero constraints.
    #[error("Invalid integer '{value}' for {param}, expected {domain}")]
    InvalidInteger {
        /// The parameter
        param: Param,
        /// The raw rejected value
        value: String,
        /// The permissible integers
        domain: Domain,
        /// Location of the value, empty for a rule built from nodes
        span: Span,
    },

    /// An UNTIL literal that is not a valid date or date-time.
    #[error("Invalid date format '{value}' for {param}, expected {domain}")]
    InvalidDate {
        /// The parameter
        param: Param,
        /// The raw rejected value
        value: String,
        /// The accepted formats
        domain: Domain,
        /// Location of the value
        span: Span,
    },

    /// A parameter that requires a companion parameter.
    #[error("Parameter '{param}' requires at least one of {requires}")]
    InvalidCombination {
        /// The parameter lacking a companion
        param: Param,
        /// Human readable list of acceptable companions
        requires: &'static str,
    },
}

impl RuleError {
    /// Location in the rule string this error refers to, if any.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MalformedPart { span, .. }
            | Self::EmptyName { span, .. }
            | Self::WhitespaceInValue { span, .. }
            | Self::UnrecognizedParameter { span, .. }
            | Self::EmptyValue { span, .. }
            | Self::InvalidChoice { span, .. }
            | Self::InvalidInteger { span, .. }
            | Self::InvalidDate { span, .. } => Some(span.clone()),
            Self::DuplicateParameter { span, .. } => span.clone(),
            Self::MissingParameter { .. } | Self::InvalidCombination { .. } => None,
        }
    }

    /// The parameter this error is scoped to, if any.
    #[must_use]
    pub fn param(&self) -> Option<Param> {
        match self {
            Self::MissingParameter { param }
            | Self::EmptyValue { param, .. }
            | Self::InvalidChoice { param, .. }
            | Self::InvalidInteger { param, .. }
            | Self::InvalidDate { param, .. }
            | Self::InvalidCombination { param, .. } => Some(*param),
            Self::DuplicateParameter { name, .. } => name.parse().ok(),
            Self::MalformedPart { .. }
            | Self::EmptyName { .. }
            | Self::WhitespaceInValue { .. }
            | Self::UnrecognizedParameter { .. } => None,
        }
    }
}
