// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the polling cycle using wiremock.

use chrono::{DateTime, Duration, Local, NaiveDate};
use gazpar_link::config::PollerConfig;
use gazpar_link::error::{Error, FetchError, SinkError};
use gazpar_link::poller::{PollState, Poller, TickOutcome};
use gazpar_link::provider::ProviderConfig;
use gazpar_link::sink::{CounterUpdate, DeviceSink};
use gazpar_link::types::{DayCount, PointId};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PCE: &str = "21546000000000";

/// In-memory device sink recording everything the poller delivers.
#[derive(Debug, Default)]
struct RecordingSink {
    device_exists: bool,
    creations: usize,
    updates: Vec<CounterUpdate>,
    fail_creation: bool,
}

impl DeviceSink for RecordingSink {
    fn ensure_device(&mut self) -> Result<(), SinkError> {
        if self.fail_creation {
            return Err(SinkError::DeviceCreation(
                "device creation disabled".to_string(),
            ));
        }
        if !self.device_exists {
            self.device_exists = true;
            self.creations += 1;
        }
        Ok(())
    }

    fn push_update(&mut self, update: &CounterUpdate) -> Result<(), SinkError> {
        self.updates.push(*update);
        Ok(())
    }
}

fn test_config() -> PollerConfig {
    PollerConfig::new("user@example.org", "secret", PointId::new(PCE).unwrap())
        .with_days(DayCount::new(30).unwrap())
}

fn test_poller(server: &MockServer, config: PollerConfig) -> Poller<RecordingSink> {
    let provider = ProviderConfig::new()
        .with_auth_base_url(server.uri())
        .with_api_base_url(server.uri());
    Poller::new(config, RecordingSink::default()).with_provider(provider)
}

fn due() -> DateTime<Local> {
    Local::now() + Duration::hours(1)
}

async fn mount_successful_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sofit-account-api/api/v1/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "SUCCESS"})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_session_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/e-connexion/users/pce/historique-consultation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

async fn mount_consumption(server: &MockServer, payload: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/e-conso/pce/consommation/informatives"))
        .and(query_param("pceList[]", PCE))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(server)
        .await;
}

// ============================================================================
// Scheduler gate
// ============================================================================

#[tokio::test]
async fn gated_tick_makes_no_network_calls() {
    let server = MockServer::start().await;
    let mut poller = test_poller(&server, test_config());

    let gate = poller.next_run_at();
    assert!(matches!(poller.tick_at(gate).await, TickOutcome::Skipped));
    assert!(matches!(
        poller.tick_at(gate - Duration::minutes(5)).await,
        TickOutcome::Skipped
    ));

    assert_eq!(poller.state(), PollState::Idle);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn successful_login_transitions_to_authenticated() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;

    let mut poller = test_poller(&server, test_config());
    let outcome = poller.tick_at(due()).await;

    assert!(matches!(outcome, TickOutcome::LoggedIn));
    assert_eq!(poller.state(), PollState::Authenticated);
}

#[tokio::test]
async fn login_submits_credential_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sofit-account-api/api/v1/auth"))
        .and(body_string_contains("email=user%40example.org"))
        .and(body_string_contains("password=secret"))
        .and(body_string_contains("capp=meg"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "SUCCESS"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut poller = test_poller(&server, test_config());
    assert!(matches!(poller.tick_at(due()).await, TickOutcome::LoggedIn));
}

#[tokio::test]
async fn failed_auth_status_stays_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sofit-account-api/api/v1/auth"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut poller = test_poller(&server, test_config());
    let outcome = poller.tick_at(due()).await;

    assert!(matches!(outcome, TickOutcome::Failed(Error::Auth(_))));
    assert_eq!(poller.state(), PollState::Idle);
}

#[tokio::test]
async fn refused_auth_state_stays_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sofit-account-api/api/v1/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "FAILED"})),
        )
        .mount(&server)
        .await;

    let mut poller = test_poller(&server, test_config());
    let outcome = poller.tick_at(due()).await;

    assert!(matches!(outcome, TickOutcome::Failed(Error::Auth(_))));
    assert_eq!(poller.state(), PollState::Idle);
}

#[tokio::test]
async fn failed_confirmation_step_stays_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sofit-account-api/api/v1/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "SUCCESS"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut poller = test_poller(&server, test_config());
    let outcome = poller.tick_at(due()).await;

    assert!(matches!(outcome, TickOutcome::Failed(Error::Auth(_))));
    assert_eq!(poller.state(), PollState::Idle);
}

// ============================================================================
// Fetch failures
// ============================================================================

#[tokio::test]
async fn failed_fetch_resets_to_idle_and_reauthenticates() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    mount_session_probe(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/e-conso/pce/consommation/informatives"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut poller = test_poller(&server, test_config());
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    let outcome = poller.tick_at(now).await;
    assert!(matches!(
        outcome,
        TickOutcome::Failed(Error::Fetch(FetchError::BadStatus(502)))
    ));
    assert_eq!(poller.state(), PollState::Idle);

    // The session was discarded; the next due tick logs in again.
    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    assert_eq!(poller.state(), PollState::Authenticated);
}

#[tokio::test]
async fn failed_session_probe_resets_to_idle() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/e-connexion/users/pce/historique-consultation"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut poller = test_poller(&server, test_config());
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    let outcome = poller.tick_at(now).await;
    assert!(matches!(
        outcome,
        TickOutcome::Failed(Error::Fetch(FetchError::ProbeStatus(401)))
    ));
    assert_eq!(poller.state(), PollState::Idle);
}

#[tokio::test]
async fn payload_missing_point_resets_to_idle() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    mount_session_probe(&server).await;
    mount_consumption(
        &server,
        serde_json::json!({"99999999999999": {"releves": []}}),
    )
    .await;

    let mut poller = test_poller(&server, test_config());
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    let outcome = poller.tick_at(now).await;
    assert!(matches!(outcome, TickOutcome::Failed(Error::Parse(_))));
    assert_eq!(poller.state(), PollState::Idle);
}

// ============================================================================
// End-to-end publishing
// ============================================================================

#[tokio::test]
async fn full_cycle_publishes_well_formed_readings_only() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    mount_session_probe(&server).await;
    mount_consumption(
        &server,
        serde_json::json!({
            PCE: {
                "releves": [
                    {"journeeGaziere": "2023-01-01", "energieConsomme": 2.0},
                    {"journeeGaziere": "2023-01-02", "energieConsomme": null}
                ]
            }
        }),
    )
    .await;

    let config = test_config().with_multiplier(1000.0).unwrap();
    let mut poller = test_poller(&server, config);
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    let outcome = poller.tick_at(now).await;

    assert!(matches!(outcome, TickOutcome::Published(1)));
    assert_eq!(poller.state(), PollState::Idle);

    let updates = &poller.sink().updates;
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].date(),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    );
    assert!((updates[0].usage() - 2000.0).abs() < f64::EPSILON);
    assert_eq!(updates[0].to_string(), "-1.0;2000;2023-01-01");
}

#[tokio::test]
async fn full_cycle_schedules_next_run() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    mount_session_probe(&server).await;
    mount_consumption(
        &server,
        serde_json::json!({
            PCE: {"releves": [{"journeeGaziere": "2023-01-01", "energieConsomme": 2.0}]}
        }),
    )
    .await;

    let mut poller = test_poller(&server, test_config());
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    assert!(matches!(poller.tick_at(now).await, TickOutcome::Published(1)));

    // The gate moved past `now`: the same heartbeat instant is a no-op.
    assert!(poller.next_run_at() > now);
    assert!(matches!(poller.tick_at(now).await, TickOutcome::Skipped));
}

#[tokio::test]
async fn ensure_device_is_idempotent_across_updates() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    mount_session_probe(&server).await;
    mount_consumption(
        &server,
        serde_json::json!({
            PCE: {
                "releves": [
                    {"journeeGaziere": "2023-01-01", "energieConsomme": 2.0},
                    {"journeeGaziere": "2023-01-02", "energieConsomme": 3.5}
                ]
            }
        }),
    )
    .await;

    let mut poller = test_poller(&server, test_config());
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    assert!(matches!(poller.tick_at(now).await, TickOutcome::Published(2)));

    // The device is ensured before every update but created only once.
    assert_eq!(poller.sink().creations, 1);
    assert_eq!(poller.sink().updates.len(), 2);
}

#[tokio::test]
async fn device_creation_failure_aborts_cycle() {
    let server = MockServer::start().await;
    mount_successful_login(&server).await;
    mount_session_probe(&server).await;
    mount_consumption(
        &server,
        serde_json::json!({
            PCE: {"releves": [{"journeeGaziere": "2023-01-01", "energieConsomme": 2.0}]}
        }),
    )
    .await;

    let provider = ProviderConfig::new()
        .with_auth_base_url(server.uri())
        .with_api_base_url(server.uri());
    let sink = RecordingSink {
        fail_creation: true,
        ..RecordingSink::default()
    };
    let mut poller = Poller::new(test_config(), sink).with_provider(provider);
    let now = due();

    assert!(matches!(poller.tick_at(now).await, TickOutcome::LoggedIn));
    let outcome = poller.tick_at(now).await;

    assert!(matches!(outcome, TickOutcome::Failed(Error::Sink(_))));
    assert_eq!(poller.state(), PollState::Idle);
    assert!(poller.sink().updates.is_empty());
}
