// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated GRDF session and the login handshake that produces it.

use serde::Deserialize;

use crate::error::AuthError;
use crate::provider::ProviderConfig;

/// OAuth redirect target the portal expects in the credential form.
///
/// Opaque to this library; the value is what the portal's own login page
/// submits.
const AUTH_GOTO: &str = "https://sofa-connexion.grdf.fr:443/openam/oauth2/externeGrdf/authorize?response_type=code%26scope=openid%20profile%20email%20infotravaux%20%2Fv1%2Faccreditation%20%2Fv1%2Faccreditations%20%2Fdigiconso%2Fv1%20%2Fdigiconso%2Fv1%2Fconsommations%20new_meg%20%2FDemande.read%20%2FDemande.write%26client_id=prod_espaceclient%26state=0%26redirect_uri=https%3A%2F%2Fmonespace.grdf.fr%2F_codexch%26nonce=7cV89oGyWnw28DYdI-702Gjy9f5XdIJ_4dKE_hbsvag%26by_pass_okta=1%26capp=meg";

/// Referer the auth endpoint requires on the credential POST.
const AUTH_REFERER: &str = "https://login.monespace.grdf.fr/mire/connexion?goto=https:%2F%2Fsofa-connexion.grdf.fr:443%2Fopenam%2Foauth2%2FexterneGrdf%2Fauthorize%3Fresponse_type%3Dcode%26scope%3Dopenid%2520profile%2520email%2520infotravaux%2520%252Fv1%252Faccreditation%2520%252Fv1%252Faccreditations%2520%252Fdigiconso%252Fv1%2520%252Fdigiconso%252Fv1%252Fconsommations%2520new_meg%2520%252FDemande.read%2520%252FDemande.write%26client_id%3Dprod_espaceclient%26state%3D0%26redirect_uri%3Dhttps%253A%252F%252Fmonespace.grdf.fr%252F_codexch%26nonce%3D7cV89oGyWnw28DYdI-702Gjy9f5XdIJ_4dKE_hbsvag%26by_pass_okta%3D1%26capp%3Dmeg&realm=%2FexterneGrdf&capp=meg";

/// Auth state the provider reports on a successful credential check.
const AUTH_STATE_SUCCESS: &str = "SUCCESS";

/// Response body of the credential-submission endpoint.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    state: String,
}

/// An authenticated GRDF session.
///
/// A session is the cookie-bearing HTTP client produced by the two-step
/// login handshake. It is consumed by a single consumption fetch: the
/// poller discards it after every fetch attempt, successful or not, and
/// authenticates again on the next cycle.
#[derive(Debug)]
pub struct Session {
    pub(crate) client: reqwest::Client,
    pub(crate) provider: ProviderConfig,
}

impl Session {
    /// Performs the two-step GRDF login handshake.
    ///
    /// Step one POSTs the credential form to the auth endpoint and checks
    /// the reported auth state. Step two GETs the portal root (following
    /// redirects) so the session cookie is exchanged for portal access.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if either step answers a non-success HTTP
    /// status, if the auth state is not `SUCCESS`, or if the transport
    /// fails.
    pub async fn login(
        provider: ProviderConfig,
        login: &str,
        password: &str,
    ) -> Result<Self, AuthError> {
        let client = provider.build_client().map_err(AuthError::Transport)?;

        let form = [
            ("email", login),
            ("password", password),
            ("goto", AUTH_GOTO),
            ("capp", "meg"),
        ];

        tracing::debug!(url = %provider.auth_url(), "Submitting credentials");

        let response = client
            .post(provider.auth_url())
            .header(reqwest::header::REFERER, AUTH_REFERER)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::BadStatus(status.as_u16()));
        }

        let body = response.text().await?;
        if provider.log_payloads() {
            tracing::debug!(body = %body, "Auth response");
        }

        let auth: AuthResponse = serde_json::from_str(&body)
            .map_err(|err| AuthError::UnexpectedResponse(err.to_string()))?;
        if auth.state != AUTH_STATE_SUCCESS {
            return Err(AuthError::Refused(auth.state));
        }

        tracing::debug!(url = %provider.portal_url(), "Confirming session");

        let response = client.get(provider.portal_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::BadStatus(status.as_u16()));
        }

        tracing::debug!("GRDF session established");

        Ok(Self { client, provider })
    }
}
