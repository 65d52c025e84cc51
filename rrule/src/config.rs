// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Default for [`ExpandConfig::max_empty_years`], one Gregorian cycle.
pub const DEFAULT_MAX_EMPTY_YEARS: u32 = 400;

/// Configuration for occurrence expansion.
///
/// Usually embedded in an application config file:
///
/// ```toml
/// max_empty_years = 800
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    /// Years (times INTERVAL) of consecutive periods without any candidate
    /// before the sequence is considered exhausted, e.g.
    /// `FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30`.
    ///
    /// The civil calendar repeats every 400 years, so a rule that matches
    /// nothing over that span never matches. Lower values may end sequences
    /// whose occurrences are far apart.
    pub max_empty_years: u32,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            max_empty_years: DEFAULT_MAX_EMPTY_YEARS,
        }
    }
}
