// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Membership checks against an occurrence sequence.

use crate::anchor::Anchor;
use crate::config::ExpandConfig;
use crate::expand::{Expander, Occurrences};
use crate::rule::Rule;

/// Something that can produce an ascending sequence of occurrences.
pub trait OccurrenceSource<T> {
    /// The occurrences, ascending, starting over on every call.
    fn occurrences(&self) -> impl Iterator<Item = T> + '_;
}

/// Something that can tell whether an instant is one of its occurrences.
pub trait Membership<T> {
    /// Whether `candidate` is an occurrence.
    fn contains(&self, candidate: &T) -> bool;
}

/// A rule bound to its anchor, the occurrence sequence of an event or todo.
#[derive(Debug, Clone)]
pub struct Recurrence<'r, T> {
    rule: &'r Rule,
    anchor: T,
    expander: Expander,
}

impl<'r, T: Anchor> Recurrence<'r, T> {
    /// Bind `rule` to `anchor` with the default configuration.
    #[must_use]
    pub fn new(rule: &'r Rule, anchor: T) -> Self {
        Self::with_config(rule, anchor, ExpandConfig::default())
    }

    /// Bind `rule` to `anchor` with an explicit configuration.
    #[must_use]
    pub fn with_config(rule: &'r Rule, anchor: T, config: ExpandConfig) -> Self {
        Self {
            rule,
            anchor,
            expander: Expander::new(config),
        }
    }

    /// The bound rule
    #[must_use]
    pub fn rule(&self) -> &'r Rule {
        self.rule
    }

    /// The bound anchor
    #[must_use]
    pub fn anchor(&self) -> &T {
        &self.anchor
    }

    /// Occurrences within `start..=end`.
    #[must_use]
    pub fn between(&self, start: T, end: T) -> Occurrences<'r, T> {
        self.expander
            .occurrences_in_range(self.rule, self.anchor.clone(), start, end)
    }
}

impl<T: Anchor> OccurrenceSource<T> for Recurrence<'_, T> {
    fn occurrences(&self) -> impl Iterator<Item = T> + '_ {
        self.expander
            .occurrences(self.rule, self.anchor.clone(), None)
    }
}

/// Checks membership by walking a source until it reaches the candidate.
///
/// The walk stops at the first occurrence not before the candidate, so it is
/// bounded even for endless sources.
#[derive(Debug, Clone)]
pub struct OccurrenceValidator<S> {
    source: S,
}

impl<S> OccurrenceValidator<S> {
    /// Creates a new validator over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying source
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<T: Ord, S: OccurrenceSource<T>> Membership<T> for OccurrenceValidator<S> {
    fn contains(&self, candidate: &T) -> bool {
        self.source
            .occurrences()
            .find(|occurrence| occurrence >= candidate)
            .is_some_and(|occurrence| occurrence == *candidate)
    }
}

/// Whether `candidate` is an occurrence of `rule` anchored at `anchor`.
#[must_use]
pub fn is_valid_occurrence<T: Anchor>(rule: &Rule, anchor: T, candidate: &T) -> bool {
    if *candidate < anchor {
        return false;
    }
    OccurrenceValidator::new(Recurrence::new(rule, anchor)).contains(candidate)
}
