// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `gazpar_link` library.
//!
//! This module provides the error hierarchy for the polling cycle:
//! authentication, data fetching, payload parsing, sink delivery, and
//! configuration-value validation each fail independently.

use thiserror::Error;

/// The main error type for this library.
///
/// Every failure mode of a polling cycle is represented here. The poller
/// catches all of them at the top of a tick, logs them, and resets the
/// state machine to `Idle`; none is fatal to the host process.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during provider authentication.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Error occurred while fetching consumption data.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error occurred while parsing a provider payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while delivering updates to the device sink.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Error occurred during configuration-value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors raised by the two-step GRDF login handshake.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The HTTP transport failed during the handshake.
    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth endpoint answered with a non-success HTTP status.
    #[error("login rejected with HTTP status {0}")]
    BadStatus(u16),

    /// The auth endpoint answered success but reported a non-SUCCESS state.
    #[error("login refused by provider: state {0:?}")]
    Refused(String),

    /// The auth response body could not be interpreted.
    #[error("unexpected login response: {0}")]
    UnexpectedResponse(String),
}

/// Errors raised by the date-ranged consumption query.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP transport failed during the query.
    #[error("consumption request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The session probe answered with a non-success HTTP status.
    #[error("session probe rejected with HTTP status {0}")]
    ProbeStatus(u16),

    /// The consumption endpoint answered with a non-success HTTP status.
    #[error("consumption query rejected with HTTP status {0}")]
    BadStatus(u16),
}

/// Errors raised while parsing provider payloads.
///
/// A single malformed daily record is not a `ParseError`: the normalizer
/// skips it with a log entry. This type covers payloads that are unusable
/// as a whole.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload does not contain the queried point identifier.
    #[error("point identifier {0} missing from response")]
    MissingPoint(String),
}

/// Errors raised by the device sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The destination device could not be created in the host.
    #[error("device creation failed: {0}")]
    DeviceCreation(String),

    /// A counter update was rejected by the host.
    #[error("update rejected: {0}")]
    UpdateRejected(String),
}

/// Errors related to configuration-value validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A point identifier was empty or contained non-digit characters.
    #[error("invalid point identifier: {0:?}")]
    InvalidPointId(String),

    /// A required configuration parameter is missing.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// A configuration parameter could not be parsed.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// The parameter that failed to parse.
        name: String,
        /// Description of the failure.
        message: String,
    },

    /// The usage multiplier must be finite and positive.
    #[error("invalid usage multiplier: {0}")]
    InvalidMultiplier(f64),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
