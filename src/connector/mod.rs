//! Connection management
//!
//! This module handles:
//! * The `Connector` / `Session` seam between entry points and the driver
//! * Native driver option defaults and overrides
//! * Connector-wide settings (app name, driver timeouts, topology tracing)

mod mongo;
mod options;

pub use mongo::{MongoConnector, MongoSession, DEFAULT_DATABASE};
pub use options::{merge_driver_options, DriverOptions, DriverOptionsOverride};

use crate::descriptor::ConnectionDescriptor;
use crate::Result;
use async_trait::async_trait;
use bson::Document;
use std::time::Duration;

/// Application name sent to the server when the target sets none
pub const DEFAULT_APP_NAME: &str = "mongo-connectivity";

/// An open connection handle.
///
/// Ownership moves to whoever verifies the connection; `close` consumes the
/// handle so it is released once.
#[async_trait]
pub trait Session: Send + Sync {
    /// Run a command against the default database
    async fn run_command(&self, command: Document) -> Result<Document>;

    /// Release the connection
    async fn close(self) -> Result<()>;
}

/// Opens sessions, either from a descriptor or straight through the driver
#[async_trait]
pub trait Connector: Send + Sync {
    /// Handle type produced by this connector
    type Session: Session;

    /// Connect using a connection descriptor
    async fn connect_descriptor(&self, descriptor: &ConnectionDescriptor) -> Result<Self::Session>;

    /// Connect a raw connection string with effective driver options
    async fn connect_driver(&self, uri: &str, options: &DriverOptions) -> Result<Self::Session>;
}

/// Connector-wide settings
///
/// Timeouts left unset fall back to the driver defaults.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Application name used when the target sets none
    pub app_name: Option<String>,
    /// Server selection timeout
    pub server_selection_timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Option<Duration>,
    /// Log topology (SDAM) events while connecting
    pub trace_topology: bool,
}

impl ConnectorConfig {
    /// Create configuration with defaults
    ///
    /// # Defaults
    ///
    /// - `app_name`: `mongo-connectivity`
    /// - `server_selection_timeout`: None (driver default)
    /// - `connect_timeout`: None (driver default)
    /// - `trace_topology`: false
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder
    ///
    /// # Examples
    ///
    /// ```
    /// use mongo_connectivity::connector::ConnectorConfig;
    /// use std::time::Duration;
    ///
    /// let config = ConnectorConfig::builder()
    ///     .app_name("support-probe")
    ///     .server_selection_timeout(Duration::from_secs(5))
    ///     .trace_topology(true)
    ///     .build();
    /// assert_eq!(config.app_name.as_deref(), Some("support-probe"));
    /// ```
    pub fn builder() -> ConnectorConfigBuilder {
        ConnectorConfigBuilder {
            app_name: Some(DEFAULT_APP_NAME.to_string()),
            server_selection_timeout: None,
            connect_timeout: None,
            trace_topology: false,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConnectorConfig`
#[derive(Debug, Clone)]
pub struct ConnectorConfigBuilder {
    app_name: Option<String>,
    server_selection_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    trace_topology: bool,
}

impl ConnectorConfigBuilder {
    /// Set the application name
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Do not send an application name unless the target sets one
    pub fn no_app_name(mut self) -> Self {
        self.app_name = None;
        self
    }

    /// Set server selection timeout
    ///
    /// Default: None (driver default)
    pub fn server_selection_timeout(mut self, duration: Duration) -> Self {
        self.server_selection_timeout = Some(duration);
        self
    }

    /// Set TCP connect timeout
    ///
    /// Default: None (driver default)
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Enable or disable topology event logging
    pub fn trace_topology(mut self, enabled: bool) -> Self {
        self.trace_topology = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ConnectorConfig {
        ConnectorConfig {
            app_name: self.app_name,
            server_selection_timeout: self.server_selection_timeout,
            connect_timeout: self.connect_timeout,
            trace_topology: self.trace_topology,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.app_name.as_deref(), Some(DEFAULT_APP_NAME));
        assert!(config.server_selection_timeout.is_none());
        assert!(config.connect_timeout.is_none());
        assert!(!config.trace_topology);
    }

    #[test]
    fn test_config_builder() {
        let config = ConnectorConfig::builder()
            .no_app_name()
            .server_selection_timeout(Duration::from_millis(500))
            .connect_timeout(Duration::from_secs(2))
            .build();
        assert!(config.app_name.is_none());
        assert_eq!(
            config.server_selection_timeout,
            Some(Duration::from_millis(500))
        );
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
    }
}
