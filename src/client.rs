//! Connectivity test entry points

use crate::connector::{
    merge_driver_options, Connector, ConnectorConfig, DriverOptions, DriverOptionsOverride,
    MongoConnector,
};
use crate::descriptor::{ConnectionAttributes, ConnectionDescriptor};
use crate::metrics::{counters, histograms, labels};
use crate::report::{self, ConsoleReporter, Reporter};
use crate::verifier::{verify, VerifyOutcome};
use crate::Result;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// Which test path an invocation took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Connection string through the descriptor builder
    ConnectionModelUri,
    /// Structured attributes through the descriptor builder
    ConnectionModelAttributes,
    /// Connection string straight to the driver
    NativeDriverUri,
}

impl EntryPoint {
    /// Label used in spans and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionModelUri => "connection_model_uri",
            Self::ConnectionModelAttributes => "connection_model_attributes",
            Self::NativeDriverUri => "native_driver_uri",
        }
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connectivity tests
///
/// Each test makes one connection attempt: connect, run a status command,
/// report, close. Nothing is shared between calls.
///
/// Errors raised before a connection exists (bad connection string, bad
/// attributes, unreachable deployment, rejected credentials) are returned as
/// `Err`. A failed status command is reported and returned as
/// [`VerifyOutcome::CommandFailed`].
pub struct ConnectivityTests<C = MongoConnector, R = ConsoleReporter> {
    connector: C,
    reporter: R,
}

impl ConnectivityTests {
    /// Tests against the MongoDB driver, printing to stdout
    pub fn new() -> Self {
        Self::with_config(ConnectorConfig::default())
    }

    /// Tests against the MongoDB driver with custom connector settings
    pub fn with_config(config: ConnectorConfig) -> Self {
        Self::with_parts(MongoConnector::new(config), ConsoleReporter)
    }
}

impl Default for ConnectivityTests {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector, R: Reporter> ConnectivityTests<C, R> {
    /// Build from an explicit connector and reporter
    pub fn with_parts(connector: C, reporter: R) -> Self {
        Self {
            connector,
            reporter,
        }
    }

    /// Connector in use
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Reporter in use
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Test a connection string the way a connection form would use it
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> mongo_connectivity::Result<()> {
    /// use mongo_connectivity::ConnectivityTests;
    ///
    /// let tests = ConnectivityTests::new();
    /// let outcome = tests.test_connection_model_uri("mongodb://localhost:27017").await?;
    /// assert!(outcome.is_success());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn test_connection_model_uri(&self, uri: &str) -> Result<VerifyOutcome> {
        let entry = EntryPoint::ConnectionModelUri;
        async {
            counters::test_started(entry.as_str());
            let descriptor = self.construct(entry, ConnectionDescriptor::from_uri(uri))?;
            self.run_descriptor(entry, &descriptor).await
        }
        .instrument(tracing::info_span!(
            "connectivity_test",
            entry_point = entry.as_str()
        ))
        .await
    }

    /// Test structured connection attributes
    ///
    /// Missing credential fields fail before any connection attempt.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> mongo_connectivity::Result<()> {
    /// use mongo_connectivity::{ConnectionAttributes, ConnectivityTests};
    ///
    /// let attributes = ConnectionAttributes::from_json(
    ///     r#"{ "hostname": "localhost", "port": 27017, "authStrategy": "NONE" }"#,
    /// )?;
    /// ConnectivityTests::new()
    ///     .test_connection_model_attributes(attributes)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn test_connection_model_attributes(
        &self,
        attributes: ConnectionAttributes,
    ) -> Result<VerifyOutcome> {
        let entry = EntryPoint::ConnectionModelAttributes;
        async {
            counters::test_started(entry.as_str());
            let descriptor =
                self.construct(entry, ConnectionDescriptor::from_attributes(attributes))?;
            self.run_descriptor(entry, &descriptor).await
        }
        .instrument(tracing::info_span!(
            "connectivity_test",
            entry_point = entry.as_str()
        ))
        .await
    }

    /// Test a connection string directly through the driver
    ///
    /// `overrides` are merged over [`DriverOptions::default`] key by key.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> mongo_connectivity::Result<()> {
    /// use mongo_connectivity::{ConnectivityTests, DriverOptionsOverride};
    ///
    /// let overrides = DriverOptionsOverride {
    ///     use_unified_topology: Some(false),
    ///     ..Default::default()
    /// };
    /// ConnectivityTests::new()
    ///     .test_native_driver_uri("mongodb://localhost:27017", &overrides)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn test_native_driver_uri(
        &self,
        uri: &str,
        overrides: &DriverOptionsOverride,
    ) -> Result<VerifyOutcome> {
        let entry = EntryPoint::NativeDriverUri;
        async {
            counters::test_started(entry.as_str());
            let options = merge_driver_options(&DriverOptions::default(), overrides);
            tracing::debug!(?options, "merged driver options");

            self.reporter.line(report::CONNECTING);
            let session = self
                .timed_connect(entry, self.connector.connect_driver(uri, &options))
                .await?;
            self.finish(entry, session).await
        }
        .instrument(tracing::info_span!(
            "connectivity_test",
            entry_point = entry.as_str()
        ))
        .await
    }

    fn construct<T>(&self, entry: EntryPoint, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            tracing::debug!(error = %e, "invalid connection target");
            counters::test_failed(entry.as_str(), labels::STAGE_CONSTRUCTION, e.category());
            e
        })
    }

    async fn run_descriptor(
        &self,
        entry: EntryPoint,
        descriptor: &ConnectionDescriptor,
    ) -> Result<VerifyOutcome> {
        tracing::debug!(address = %descriptor, "connection descriptor built");
        self.reporter.line(report::CONNECTING);
        let session = self
            .timed_connect(entry, self.connector.connect_descriptor(descriptor))
            .await?;
        self.finish(entry, session).await
    }

    async fn timed_connect<F>(&self, entry: EntryPoint, connect: F) -> Result<C::Session>
    where
        F: Future<Output = Result<C::Session>>,
    {
        let started = Instant::now();
        match connect.await {
            Ok(session) => {
                histograms::connect_duration(entry.as_str(), started.elapsed().as_millis() as u64);
                Ok(session)
            }
            Err(e) => {
                tracing::debug!(error = %e, "connection failed");
                counters::test_failed(entry.as_str(), labels::STAGE_CONNECT, e.category());
                Err(e)
            }
        }
    }

    async fn finish(&self, entry: EntryPoint, session: C::Session) -> Result<VerifyOutcome> {
        let started = Instant::now();
        let result = verify(session, &self.reporter).await;
        histograms::verify_duration(entry.as_str(), started.elapsed().as_millis() as u64);

        match &result {
            Ok(VerifyOutcome::Succeeded(_)) => counters::test_succeeded(entry.as_str()),
            Ok(VerifyOutcome::CommandFailed(e)) => {
                counters::test_failed(entry.as_str(), labels::STAGE_COMMAND, e.category())
            }
            Err(e) => counters::test_failed(entry.as_str(), labels::STAGE_CLOSE, e.category()),
        }
        result
    }
}
