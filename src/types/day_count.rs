// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import-window length in days.

use std::fmt;

use crate::error::ValueError;

/// Number of past days to import per cycle (1-150).
///
/// GRDF keeps roughly five months of informative daily readings online,
/// so the window is capped at 150 days.
///
/// # Examples
///
/// ```
/// use gazpar_link::types::DayCount;
///
/// let days = DayCount::new(30).unwrap();
/// assert_eq!(days.value(), 30);
///
/// // Out-of-range values return an error
/// assert!(DayCount::new(0).is_err());
/// assert!(DayCount::new(151).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayCount(u16);

impl DayCount {
    /// Minimum window (1 day).
    pub const MIN: Self = Self(1);

    /// Maximum window (150 days).
    pub const MAX: Self = Self(150);

    /// Creates a new day count.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 1-150.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value < Self::MIN.0 || value > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the number of days.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the window length as a signed day offset for date math.
    #[must_use]
    pub const fn as_days(&self) -> i64 {
        self.0 as i64
    }
}

impl Default for DayCount {
    /// Defaults to the full 150-day window.
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

impl TryFrom<u16> for DayCount {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
