// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device sink the host exposes for publishing counter updates.

use std::fmt;

use chrono::NaiveDate;

use crate::error::SinkError;
use crate::normalize::DailyUsage;

/// Placeholder counter value signalling "no absolute counter available".
///
/// GRDF reports daily deltas only, never the meter's absolute index in
/// energy terms, so every update carries this sentinel in the counter
/// slot.
pub const NO_COUNTER_SENTINEL: f64 = -1.0;

/// A counter update as delivered to the host device.
///
/// Renders as the `counter;usage;date` triplet home-automation counter
/// devices expect, with the counter slot pinned to
/// [`NO_COUNTER_SENTINEL`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gazpar_link::sink::CounterUpdate;
///
/// let update = CounterUpdate::new(
///     3.5,
///     NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
/// );
/// assert_eq!(update.to_string(), "-1.0;3.5;2023-01-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterUpdate {
    usage: f64,
    date: NaiveDate,
}

impl CounterUpdate {
    /// Creates an update for one daily usage value.
    #[must_use]
    pub fn new(usage: f64, date: NaiveDate) -> Self {
        Self { usage, date }
    }

    /// Returns the usage value.
    #[must_use]
    pub fn usage(&self) -> f64 {
        self.usage
    }

    /// Returns the gas day.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl From<DailyUsage> for CounterUpdate {
    fn from(daily: DailyUsage) -> Self {
        Self::new(daily.usage, daily.date)
    }
}

impl fmt::Display for CounterUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NO_COUNTER_SENTINEL:.1};{};{}",
            self.usage,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Destination for normalized counter updates.
///
/// Implemented against whatever device table the host offers. Both
/// operations are host-local, hence synchronous; the poller never holds
/// an implementation across an await point.
pub trait DeviceSink {
    /// Ensures the destination device exists, creating it if absent.
    ///
    /// Must be idempotent: calling it again once the device exists is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::DeviceCreation` if the device cannot be
    /// created; the poller aborts the cycle for that tick.
    fn ensure_device(&mut self) -> Result<(), SinkError>;

    /// Pushes one counter update to the device.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::UpdateRejected` if the host refuses the update.
    fn push_update(&mut self, update: &CounterUpdate) -> Result<(), SinkError>;
}
