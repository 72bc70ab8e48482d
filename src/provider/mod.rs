// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GRDF "mon espace" provider endpoints and session handling.
//!
//! The provider exposes three endpoints this library talks to:
//!
//! - the account auth endpoint (form POST of credentials)
//! - the portal root, confirming the session cookie (GET with redirects)
//! - the informative-consumption endpoint (date-ranged GET, scoped by PCE)
//!
//! [`ProviderConfig`] holds the base URLs so tests can point the library at
//! a mock server; [`Session`] is the authenticated handle produced by the
//! login handshake.

mod consumption;
mod session;

pub use consumption::ConsumptionRecord;
pub use session::Session;

use std::time::Duration;

use chrono::NaiveDate;

use crate::types::PointId;

/// Default base URL of the GRDF account/login host.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://login.monespace.grdf.fr";

/// Default base URL of the GRDF customer portal.
pub const DEFAULT_API_BASE_URL: &str = "https://monespace.grdf.fr";

/// Connection parameters for the GRDF portal.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gazpar_link::provider::ProviderConfig;
///
/// // Production endpoints
/// let config = ProviderConfig::new();
///
/// // Pointed at a test server, with a short timeout
/// let config = ProviderConfig::new()
///     .with_auth_base_url("http://127.0.0.1:8080")
///     .with_api_base_url("http://127.0.0.1:8080")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    auth_base_url: String,
    api_base_url: String,
    timeout: Duration,
    log_payloads: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration for the production GRDF endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            log_payloads: false,
        }
    }

    /// Sets a custom auth base URL (no trailing slash).
    #[must_use]
    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = strip_trailing_slash(url.into());
        self
    }

    /// Sets a custom portal base URL (no trailing slash).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = strip_trailing_slash(url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables logging of raw provider payloads at debug level.
    ///
    /// Off by default: consumption payloads identify the account.
    #[must_use]
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    /// Returns the auth base URL.
    #[must_use]
    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }

    /// Returns the portal base URL.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether raw payload logging is enabled.
    #[must_use]
    pub fn log_payloads(&self) -> bool {
        self.log_payloads
    }

    /// URL of the credential-submission endpoint.
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/sofit-account-api/api/v1/auth", self.auth_base_url)
    }

    /// URL of the session-confirmation request (the portal root).
    #[must_use]
    pub fn portal_url(&self) -> String {
        format!("{}/", self.api_base_url)
    }

    /// URL of the authenticated-session probe.
    #[must_use]
    pub fn probe_url(&self) -> String {
        format!(
            "{}/api/e-connexion/users/pce/historique-consultation",
            self.api_base_url
        )
    }

    /// URL of the date-ranged informative-consumption query.
    #[must_use]
    pub fn consumption_url(&self, point_id: &PointId, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/api/e-conso/pce/consommation/informatives?dateDebut={}&dateFin={}&pceList[]={}",
            self.api_base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            urlencoding::encode(point_id.as_str()),
        )
    }

    /// Creates the cookie-bearing HTTP client backing a session.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .cookie_store(true)
            .build()
    }
}

fn strip_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
