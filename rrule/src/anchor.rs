// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Time types an occurrence sequence can be anchored at.

use jiff::Zoned;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::rule::Until;

/// An instant type occurrences are generated in, the type of DTSTART.
///
/// Candidate dates are computed on the civil axis, then turned back into
/// `Self` with the anchor's time-of-day and zone.
pub trait Anchor: Clone + Ord {
    /// Wall-clock date and time of this instant.
    fn wall_clock(&self) -> DateTime;

    /// The instant with the given wall-clock time in the same zone as `self`,
    /// or `None` if it cannot be represented.
    fn at_wall_clock(&self, datetime: DateTime) -> Option<Self>;

    /// Whether this instant lies after the UNTIL bound.
    fn exceeds(&self, until: &Until) -> bool;
}

/// Floating time, UNTIL is always compared as wall clock.
impl Anchor for DateTime {
    fn wall_clock(&self) -> DateTime {
        *self
    }

    fn at_wall_clock(&self, datetime: DateTime) -> Option<Self> {
        Some(datetime)
    }

    fn exceeds(&self, until: &Until) -> bool {
        *self > until.datetime()
    }
}

/// Zoned time. A UTC bound is compared as an instant, a floating bound as
/// wall clock in the anchor's zone.
impl Anchor for Zoned {
    fn wall_clock(&self) -> DateTime {
        self.datetime()
    }

    fn at_wall_clock(&self, datetime: DateTime) -> Option<Self> {
        // compatible disambiguation: gaps move forward, folds take the earlier offset
        datetime.to_zoned(self.time_zone().clone()).ok()
    }

    fn exceeds(&self, until: &Until) -> bool {
        match until.timestamp() {
            Some(ts) => self.timestamp() > ts,
            None => self.datetime() > until.datetime(),
        }
    }
}

/// Build a zoned anchor from a wall-clock DTSTART and an IANA time zone name.
///
/// ## Errors
///
/// If the time zone is unknown or the datetime cannot be placed in it.
pub fn zoned_anchor(datetime: DateTime, tzid: &str) -> Result<Zoned, jiff::Error> {
    let tz = TimeZone::get(tzid)?;
    datetime.to_zoned(tz)
}
