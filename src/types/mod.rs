// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types used throughout the library.
//!
//! These are validated newtypes: constructing one guarantees the value is
//! acceptable to the provider API, so later code never re-checks.

mod day_count;
mod point_id;

pub use day_count::DayCount;
pub use point_id::PointId;
