//! Connection descriptors
//!
//! This module handles:
//! * Parsing `mongodb://` and `mongodb+srv://` connection strings
//! * Building descriptors from structured connection attributes
//! * Auth strategy and TLS option resolution
//! * Rendering a descriptor back to a driver connection string

mod attributes;
mod auth;
mod read_preference;
mod tls;
mod uri;

pub use attributes::{ConnectionAttributes, HostAddress, DEFAULT_PORT};
pub use auth::{AuthStrategy, AuthStrategyKind, ScramMechanism, EXTERNAL_AUTH_SOURCE};
pub use read_preference::ReadPreferenceMode;
pub use tls::{SslMethod, TlsSettings};

pub(crate) use uri::set_query_param;

use crate::Result;

/// Normalized description of how to reach and authenticate to a deployment.
///
/// Built once by [`ConnectionDescriptor::from_uri`] or
/// [`ConnectionDescriptor::from_attributes`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    hosts: Vec<HostAddress>,
    srv: bool,
    database: Option<String>,
    auth: AuthStrategy,
    read_preference: ReadPreferenceMode,
    replica_set: Option<String>,
    app_name: Option<String>,
    direct_connection: Option<bool>,
    tls: Option<TlsSettings>,
    extra_options: Vec<(String, String)>,
}

impl ConnectionDescriptor {
    /// Parse a connection string
    ///
    /// # Examples
    ///
    /// ```
    /// use mongo_connectivity::descriptor::ConnectionDescriptor;
    ///
    /// let descriptor = ConnectionDescriptor::from_uri("mongodb://localhost:27017").unwrap();
    /// assert_eq!(descriptor.hosts()[0].port, 27017);
    /// ```
    pub fn from_uri(uri: &str) -> Result<Self> {
        uri::parse(uri)
    }

    /// Build a descriptor from connection attributes
    pub fn from_attributes(attributes: ConnectionAttributes) -> Result<Self> {
        attributes.into_descriptor()
    }

    /// Seed hosts (a single SRV name when [`is_srv`](Self::is_srv))
    pub fn hosts(&self) -> &[HostAddress] {
        &self.hosts
    }

    /// Whether hosts are resolved through a DNS SRV record
    pub fn is_srv(&self) -> bool {
        self.srv
    }

    /// Default database
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Authentication strategy
    pub fn auth(&self) -> &AuthStrategy {
        &self.auth
    }

    /// Read preference
    pub fn read_preference(&self) -> ReadPreferenceMode {
        self.read_preference
    }

    /// Replica set name
    pub fn replica_set(&self) -> Option<&str> {
        self.replica_set.as_deref()
    }

    /// Application name reported to the server
    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    /// Direct connection flag
    pub fn direct_connection(&self) -> Option<bool> {
        self.direct_connection
    }

    /// TLS settings (None = plaintext)
    pub fn tls(&self) -> Option<&TlsSettings> {
        self.tls.as_ref()
    }

    /// Render as a driver connection string
    pub fn to_connection_string(&self) -> String {
        self.render(false)
    }

    /// Render with the password masked, for logs
    pub fn to_redacted_string(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        let mut s = String::from(if self.srv {
            "mongodb+srv://"
        } else {
            "mongodb://"
        });

        if let Some(user) = self.auth.username() {
            s.push_str(&urlencoding::encode(user));
            if let Some(password) = self.auth.password() {
                s.push(':');
                if redact {
                    s.push_str("****");
                } else {
                    s.push_str(&urlencoding::encode(password));
                }
            }
            s.push('@');
        }

        let hosts: Vec<String> = self
            .hosts
            .iter()
            .map(|h| {
                if self.srv {
                    h.host.clone()
                } else {
                    h.to_uri_component()
                }
            })
            .collect();
        s.push_str(&hosts.join(","));

        s.push('/');
        if let Some(ref db) = self.database {
            s.push_str(&urlencoding::encode(db));
        }

        let options = self.query_options();
        if !options.is_empty() {
            s.push('?');
            let pairs: Vec<String> = options
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&pairs.join("&"));
        }

        s
    }

    fn query_options(&self) -> Vec<(String, String)> {
        let mut options: Vec<(String, String)> = self
            .auth
            .query_options()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        if let Some(ref rs) = self.replica_set {
            options.push(("replicaSet".into(), urlencoding::encode(rs).into_owned()));
        }
        if self.read_preference != ReadPreferenceMode::Primary {
            options.push((
                "readPreference".into(),
                self.read_preference.as_str().into(),
            ));
        }
        if let Some(ref app_name) = self.app_name {
            options.push(("appName".into(), urlencoding::encode(app_name).into_owned()));
        }
        if let Some(direct) = self.direct_connection {
            options.push(("directConnection".into(), direct.to_string()));
        }
        if let Some(ref tls) = self.tls {
            options.extend(tls.query_options().into_iter().map(|(k, v)| (k.to_string(), v)));
        }
        options.extend(self.extra_options.iter().cloned());
        options
    }
}

impl std::fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_redacted_string())
    }
}
