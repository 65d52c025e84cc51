// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse RFC 5545 recurrence rules and expand them into occurrences.
//!
//! ```
//! use cadence_rrule::{generate_occurrences, parse_rule};
//! use jiff::civil::datetime;
//!
//! let rule = parse_rule("FREQ=MONTHLY;BYMONTHDAY=-1;COUNT=3").unwrap();
//! let dates: Vec<_> = generate_occurrences(&rule, datetime(2024, 1, 31, 9, 0, 0, 0), None)
//!     .map(|dt| dt.date().to_string())
//!     .collect();
//! assert_eq!(dates, ["2024-01-31", "2024-02-29", "2024-03-31"]);
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod anchor;
mod calendar;
mod config;
mod error;
mod expand;
mod keyword;
mod lexer;
mod node;
mod parser;
mod rule;
mod validate;
mod value;

pub use crate::anchor::{Anchor, zoned_anchor};
pub use crate::config::{DEFAULT_MAX_EMPTY_YEARS, ExpandConfig};
pub use crate::error::{RuleError, Span};
pub use crate::expand::{Expander, Occurrences, generate_occurrences, generate_occurrences_in_range};
pub use crate::node::{Domain, Node, Param};
pub use crate::parser::parse_rule;
pub use crate::rule::{Frequency, Rule, RuleBuilder, Until, Weekday, WeekdayNum};
pub use crate::validate::{
    Membership, OccurrenceSource, OccurrenceValidator, Recurrence, is_valid_occurrence,
};
