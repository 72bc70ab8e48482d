// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `gazpar_link` - Poll GRDF Gazpar gas consumption into home-automation sinks.
//!
//! This library logs into the GRDF "mon espace" portal, fetches the daily
//! informative consumption of a Gazpar meter, and republishes each reading
//! as a counter update through a host-provided device sink.
//!
//! # How it works
//!
//! The host drives a periodic heartbeat; each beat calls [`Poller::tick`].
//! A tick before the next-run gate does nothing. Once due, one tick
//! authenticates (two-step handshake, cookie session) and the following
//! tick fetches a date-ranged batch of readings, normalizes them and
//! pushes them to the sink. Every session serves exactly one fetch; any
//! failure resets the machine to idle and the next cycle re-authenticates.
//!
//! # Quick Start
//!
//! ```no_run
//! use gazpar_link::config::PollerConfig;
//! use gazpar_link::error::SinkError;
//! use gazpar_link::sink::{CounterUpdate, DeviceSink};
//! use gazpar_link::types::{DayCount, PointId};
//! use gazpar_link::Poller;
//!
//! struct PrintSink;
//!
//! impl DeviceSink for PrintSink {
//!     fn ensure_device(&mut self) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//!
//!     fn push_update(&mut self, update: &CounterUpdate) -> Result<(), SinkError> {
//!         println!("{update}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PollerConfig::new(
//!         "user@example.org",
//!         "secret",
//!         PointId::new("21546000000000").unwrap(),
//!     )
//!     .with_days(DayCount::new(30).unwrap());
//!
//!     let mut poller = Poller::new(config, PrintSink);
//!
//!     loop {
//!         poller.tick().await;
//!         tokio::time::sleep(std::time::Duration::from_secs(20)).await;
//!     }
//! }
//! ```
//!
//! # Host parameters
//!
//! Hosts that hand out string-keyed settings can build the configuration
//! through [`config::ParameterSource`]:
//!
//! ```
//! use std::collections::HashMap;
//! use gazpar_link::config::PollerConfig;
//!
//! let mut params = HashMap::new();
//! params.insert("login".to_string(), "user@example.org".to_string());
//! params.insert("password".to_string(), "secret".to_string());
//! params.insert("pce".to_string(), "21546000000000".to_string());
//! params.insert("days".to_string(), "30".to_string());
//!
//! let config = PollerConfig::from_parameters(&params).unwrap();
//! assert_eq!(config.days().value(), 30);
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod poller;
pub mod provider;
pub mod sink;
pub mod types;

pub use config::{ParameterSource, PollerConfig};
pub use error::{AuthError, Error, FetchError, ParseError, Result, SinkError, ValueError};
pub use normalize::DailyUsage;
pub use poller::{PollState, Poller, TickOutcome};
pub use provider::{ConsumptionRecord, ProviderConfig, Session};
pub use sink::{CounterUpdate, DeviceSink, NO_COUNTER_SENTINEL};
pub use types::{DayCount, PointId};
