// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poller configuration and the host parameter source.
//!
//! Home-automation hosts hand plugins their settings as string-keyed
//! parameters. [`ParameterSource`] is that collaborator reduced to the one
//! lookup the library needs; [`PollerConfig`] is the validated result.

use crate::error::ValueError;
use crate::types::{DayCount, PointId};

/// Parameter keys understood by [`PollerConfig::from_parameters`].
pub mod keys {
    /// GRDF account login (email address).
    pub const LOGIN: &str = "login";
    /// GRDF account password.
    pub const PASSWORD: &str = "password";
    /// Number of past days to import (1-150, optional).
    pub const DAYS: &str = "days";
    /// PCE point identifier of the meter.
    pub const POINT_ID: &str = "pce";
    /// Usage multiplier applied before sink delivery (optional).
    pub const MULTIPLIER: &str = "multiplier";
    /// Debug flag raising payload log verbosity (optional).
    pub const DEBUG: &str = "debug";
}

/// String-keyed configuration exposed by the host.
pub trait ParameterSource {
    /// Returns the raw value for `key`, if the host has one.
    fn parameter(&self, key: &str) -> Option<String>;
}

impl ParameterSource for std::collections::HashMap<String, String> {
    fn parameter(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Validated configuration for a [`Poller`](crate::Poller).
///
/// # Examples
///
/// ```
/// use gazpar_link::config::PollerConfig;
/// use gazpar_link::types::{DayCount, PointId};
///
/// let config = PollerConfig::new(
///     "user@example.org",
///     "secret",
///     PointId::new("21546000000000").unwrap(),
/// )
/// .with_days(DayCount::new(30).unwrap())
/// .with_debug(true);
///
/// assert_eq!(config.days().value(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct PollerConfig {
    login: String,
    password: String,
    point_id: PointId,
    days: DayCount,
    multiplier: f64,
    debug: bool,
}

impl PollerConfig {
    /// Default usage multiplier (readings forwarded unscaled).
    pub const DEFAULT_MULTIPLIER: f64 = 1.0;

    /// Creates a configuration with default window, multiplier and debug flag.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>, point_id: PointId) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            point_id,
            days: DayCount::default(),
            multiplier: Self::DEFAULT_MULTIPLIER,
            debug: false,
        }
    }

    /// Sets the import window.
    #[must_use]
    pub fn with_days(mut self, days: DayCount) -> Self {
        self.days = days;
        self
    }

    /// Sets the usage multiplier.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidMultiplier` if the multiplier is not a
    /// finite positive number.
    pub fn with_multiplier(mut self, multiplier: f64) -> Result<Self, ValueError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ValueError::InvalidMultiplier(multiplier));
        }
        self.multiplier = multiplier;
        Ok(self)
    }

    /// Sets the debug flag.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds a configuration from the host's parameter source.
    ///
    /// `login`, `password` and `pce` are required; `days`, `multiplier` and
    /// `debug` fall back to their defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if a required parameter is missing or any
    /// parameter fails validation.
    pub fn from_parameters<S: ParameterSource>(source: &S) -> Result<Self, ValueError> {
        let login = require(source, keys::LOGIN)?;
        let password = require(source, keys::PASSWORD)?;
        let point_id = PointId::new(require(source, keys::POINT_ID)?)?;

        let mut config = Self::new(login, password, point_id);

        if let Some(raw) = source.parameter(keys::DAYS) {
            let value: u16 = raw.trim().parse().map_err(|_| ValueError::InvalidParameter {
                name: keys::DAYS.to_string(),
                message: format!("expected an integer, got {raw:?}"),
            })?;
            config = config.with_days(DayCount::new(value)?);
        }

        if let Some(raw) = source.parameter(keys::MULTIPLIER) {
            let value: f64 = raw.trim().parse().map_err(|_| ValueError::InvalidParameter {
                name: keys::MULTIPLIER.to_string(),
                message: format!("expected a number, got {raw:?}"),
            })?;
            config = config.with_multiplier(value)?;
        }

        if let Some(raw) = source.parameter(keys::DEBUG) {
            config = config.with_debug(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "debug"
            ));
        }

        Ok(config)
    }

    /// Returns the GRDF account login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the GRDF account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the PCE point identifier.
    #[must_use]
    pub fn point_id(&self) -> &PointId {
        &self.point_id
    }

    /// Returns the import window.
    #[must_use]
    pub fn days(&self) -> DayCount {
        self.days
    }

    /// Returns the usage multiplier.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Returns whether payload debug logging is enabled.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }
}

fn require<S: ParameterSource>(source: &S, key: &str) -> Result<String, ValueError> {
    source
        .parameter(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ValueError::MissingParameter(key.to_string()))
}
