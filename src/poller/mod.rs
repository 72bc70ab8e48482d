// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The polling state machine driving the authenticate-then-fetch cycle.
//!
//! The host calls [`Poller::tick`] from its periodic heartbeat. A tick
//! before the `next_run_at` gate is a pure no-op. Once due, the first
//! tick authenticates and the next one fetches, normalizes and publishes;
//! any failure along the way resets the machine to [`PollState::Idle`] so
//! the following cycle starts with a fresh login. One session never
//! outlives one fetch attempt.

use chrono::{DateTime, Days, Duration, Local};

use crate::config::PollerConfig;
use crate::error::Error;
use crate::normalize::normalize;
use crate::provider::{ProviderConfig, Session};
use crate::sink::{CounterUpdate, DeviceSink};

/// Hour of day (local time) at which the next full cycle runs.
const NEXT_RUN_HOUR: u32 = 18;

/// Observable state of the polling machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No live session; the next due tick authenticates.
    Idle,
    /// A session is held; the next due tick fetches and publishes.
    Authenticated,
}

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The tick was not yet due; no network call, no state change.
    Skipped,
    /// Authentication succeeded; the next due tick fetches.
    LoggedIn,
    /// A full cycle completed and delivered this many updates; the next
    /// run is scheduled for tomorrow evening.
    Published(usize),
    /// The cycle failed; the machine is back to `Idle` and the next due
    /// tick starts over with a fresh login.
    Failed(Error),
}

/// Internal stage, carrying the session while authenticated.
///
/// Holding the session inside the variant makes the "`Authenticated`
/// implies a live session" invariant structural.
#[derive(Debug)]
enum Stage {
    Idle,
    Authenticated(Session),
}

/// Polls the GRDF portal and republishes daily usage into a device sink.
///
/// Owns all cycle state (session, poll state, next-run gate); the host
/// only drives the heartbeat.
///
/// # Examples
///
/// ```no_run
/// use gazpar_link::config::PollerConfig;
/// use gazpar_link::poller::Poller;
/// use gazpar_link::types::PointId;
/// # use gazpar_link::error::SinkError;
/// # use gazpar_link::sink::{CounterUpdate, DeviceSink};
/// # struct MySink;
/// # impl DeviceSink for MySink {
/// #     fn ensure_device(&mut self) -> Result<(), SinkError> { Ok(()) }
/// #     fn push_update(&mut self, _: &CounterUpdate) -> Result<(), SinkError> { Ok(()) }
/// # }
///
/// #[tokio::main]
/// async fn main() {
///     let config = PollerConfig::new(
///         "user@example.org",
///         "secret",
///         PointId::new("21546000000000").unwrap(),
///     );
///     let mut poller = Poller::new(config, MySink);
///
///     loop {
///         poller.tick().await;
///         tokio::time::sleep(std::time::Duration::from_secs(20)).await;
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Poller<S: DeviceSink> {
    config: PollerConfig,
    provider: ProviderConfig,
    sink: S,
    stage: Stage,
    next_run_at: DateTime<Local>,
}

impl<S: DeviceSink> Poller<S> {
    /// Creates a poller against the production GRDF endpoints.
    ///
    /// The first cycle is due on the next tick.
    #[must_use]
    pub fn new(config: PollerConfig, sink: S) -> Self {
        let provider = ProviderConfig::new().with_payload_logging(config.debug());
        Self {
            config,
            provider,
            sink,
            stage: Stage::Idle,
            next_run_at: Local::now(),
        }
    }

    /// Replaces the provider configuration (custom endpoints, timeout).
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        let log_payloads = provider.log_payloads() || self.config.debug();
        self.provider = provider.with_payload_logging(log_payloads);
        self
    }

    /// Returns the observable poll state.
    #[must_use]
    pub fn state(&self) -> PollState {
        match self.stage {
            Stage::Idle => PollState::Idle,
            Stage::Authenticated(_) => PollState::Authenticated,
        }
    }

    /// Returns the gate before which ticks are no-ops.
    #[must_use]
    pub fn next_run_at(&self) -> DateTime<Local> {
        self.next_run_at
    }

    /// Returns a reference to the device sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Performs one heartbeat tick at the current wall-clock time.
    pub async fn tick(&mut self) -> TickOutcome {
        self.tick_at(Local::now()).await
    }

    /// Performs one heartbeat tick at an explicit point in time.
    ///
    /// Exposed so hosts and tests drive time themselves; [`Poller::tick`]
    /// is the production entry point.
    pub async fn tick_at(&mut self, now: DateTime<Local>) -> TickOutcome {
        if now <= self.next_run_at {
            tracing::trace!(next_run_at = %self.next_run_at, "Tick not due");
            return TickOutcome::Skipped;
        }

        // Taking the stage drops any held session on the failure paths,
        // which is exactly the reset the cycle wants.
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Idle => match self.authenticate().await {
                Ok(session) => {
                    self.stage = Stage::Authenticated(session);
                    TickOutcome::LoggedIn
                }
                Err(err) => {
                    tracing::error!(error = %err, "Authentication failed");
                    TickOutcome::Failed(err)
                }
            },
            Stage::Authenticated(session) => match self.publish_cycle(&session, now).await {
                Ok(count) => {
                    self.next_run_at = next_schedule(now);
                    tracing::info!(
                        updates = count,
                        next_run_at = %self.next_run_at,
                        "Cycle complete"
                    );
                    TickOutcome::Published(count)
                }
                Err(err) => {
                    tracing::error!(error = %err, "Polling cycle failed, session discarded");
                    TickOutcome::Failed(err)
                }
            },
        }
    }

    async fn authenticate(&self) -> Result<Session, Error> {
        let session = Session::login(
            self.provider.clone(),
            self.config.login(),
            self.config.password(),
        )
        .await?;
        Ok(session)
    }

    /// Fetch, normalize and publish one date-ranged batch of readings.
    async fn publish_cycle(&mut self, session: &Session, now: DateTime<Local>) -> Result<usize, Error> {
        let end = now.date_naive();
        let start = end - Duration::days(self.config.days().as_days());

        let records = session
            .fetch_consumption(self.config.point_id(), start, end)
            .await?;
        let usages = normalize(&records, self.config.multiplier());

        for daily in &usages {
            self.sink.ensure_device()?;
            let update = CounterUpdate::from(*daily);
            tracing::debug!(%update, "Publishing counter update");
            self.sink.push_update(&update)?;
        }

        Ok(usages.len())
    }
}

/// Next full cycle runs tomorrow at 18:00 local time.
fn next_schedule(now: DateTime<Local>) -> DateTime<Local> {
    let fallback = now + Duration::days(1);
    (now.date_naive() + Days::new(1))
        .and_hms_opt(NEXT_RUN_HOUR, 0, 0)
        .and_then(|dt| dt.and_local_timezone(Local).earliest())
        .unwrap_or(fallback)
}
