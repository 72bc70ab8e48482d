// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PCE point identifier.

use std::fmt;

use crate::error::ValueError;

/// The PCE (Point de Comptage et d'Estimation) identifying a gas meter.
///
/// GRDF assigns one per delivery point; every consumption query is scoped
/// to it, and the consumption payload is keyed by it.
///
/// # Examples
///
/// ```
/// use gazpar_link::types::PointId;
///
/// let pce = PointId::new("21546000000000").unwrap();
/// assert_eq!(pce.as_str(), "21546000000000");
///
/// // Empty or non-numeric identifiers are rejected
/// assert!(PointId::new("").is_err());
/// assert!(PointId::new("21-546").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointId(String);

impl PointId {
    /// Creates a new point identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPointId` if the identifier is empty or
    /// contains non-digit characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::InvalidPointId(value));
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for PointId {
    type Error = ValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
