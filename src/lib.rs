//! Connectivity diagnostics for MongoDB deployments
//!
//! `mongo-connectivity` answers one question: can this process reach a
//! MongoDB deployment, authenticate, and run a command?
//!
//! There are three ways in:
//!
//! * a connection string, normalized into a [`ConnectionDescriptor`] first
//! * structured [`ConnectionAttributes`] as a connection form would produce
//! * a connection string handed straight to the driver with [`DriverOptions`]
//!
//! All three share one routine: print progress, connect, run
//! `connectionStatus`, report, close.
//!
//! ```no_run
//! # async fn example() -> mongo_connectivity::Result<()> {
//! use mongo_connectivity::ConnectivityTests;
//!
//! let tests = ConnectivityTests::new();
//! tests
//!     .test_connection_model_uri("mongodb://localhost:27017/?readPreference=primary")
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod connector;
pub mod descriptor;
pub mod error;
pub mod metrics;
pub mod report;
pub mod verifier;

pub use client::{ConnectivityTests, EntryPoint};
pub use connector::{Connector, ConnectorConfig, DriverOptions, DriverOptionsOverride, Session};
pub use descriptor::{
    AuthStrategy, AuthStrategyKind, ConnectionAttributes, ConnectionDescriptor, ReadPreferenceMode,
    SslMethod,
};
pub use error::{Error, Result};
pub use report::{ConsoleReporter, MemoryReporter, Reporter};
pub use verifier::VerifyOutcome;
