//! TLS settings for connections to MongoDB.
//!
//! The driver owns the TLS handshake. This module only decides which
//! connection string options to emit for a given `sslMethod`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// TLS mode matching the connection-model `sslMethod` attribute.
///
/// Controls whether TLS is used and how the server certificate is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SslMethod {
    /// No TLS (plaintext connection)
    #[default]
    None,
    /// TLS, server certificate validated against system roots
    SystemCa,
    /// TLS, server certificate is not validated
    Unvalidated,
    /// TLS, server certificate validated against a provided CA file
    Server,
    /// TLS with a custom CA file and a client certificate
    All,
}

impl SslMethod {
    /// Whether this method enables TLS at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether this method requires a CA file
    pub fn requires_ca(&self) -> bool {
        matches!(self, Self::Server | Self::All)
    }
}

impl std::fmt::Display for SslMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::SystemCa => write!(f, "SYSTEMCA"),
            Self::Unvalidated => write!(f, "UNVALIDATED"),
            Self::Server => write!(f, "SERVER"),
            Self::All => write!(f, "ALL"),
        }
    }
}

impl std::str::FromStr for SslMethod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "SYSTEMCA" => Ok(Self::SystemCa),
            "UNVALIDATED" => Ok(Self::Unvalidated),
            "SERVER" => Ok(Self::Server),
            "ALL" => Ok(Self::All),
            _ => Err(Error::Config(format!(
                "invalid sslMethod '{}': expected NONE, SYSTEMCA, UNVALIDATED, SERVER, or ALL",
                s
            ))),
        }
    }
}

/// Resolved TLS settings for one connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    method: SslMethod,
    ca_file: Option<String>,
    cert_key_file: Option<String>,
    allow_invalid_hostnames: bool,
    insecure: bool,
}

impl TlsSettings {
    /// Build settings, checking the files each method needs.
    ///
    /// Returns `None` for `SslMethod::None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `SERVER` or `ALL` lacks a CA file, or `ALL` lacks
    /// a client certificate.
    pub fn new(
        method: SslMethod,
        ca_file: Option<String>,
        cert_key_file: Option<String>,
    ) -> Result<Option<Self>> {
        if !method.is_enabled() {
            return Ok(None);
        }
        if method.requires_ca() && ca_file.is_none() {
            return Err(Error::InvalidAttributes(format!(
                "sslMethod={} requires sslCA",
                method
            )));
        }
        if method == SslMethod::All && cert_key_file.is_none() {
            return Err(Error::InvalidAttributes(
                "sslMethod=ALL requires sslCert".into(),
            ));
        }
        Ok(Some(Self {
            method,
            ca_file,
            cert_key_file,
            allow_invalid_hostnames: false,
            insecure: false,
        }))
    }

    /// Skip hostname verification (`tlsAllowInvalidHostnames`)
    pub(crate) fn with_invalid_hostnames_allowed(mut self) -> Self {
        self.allow_invalid_hostnames = true;
        self
    }

    /// Disable certificate and hostname validation together (`tlsInsecure`)
    pub(crate) fn insecure(mut self) -> Self {
        self.method = SslMethod::Unvalidated;
        self.allow_invalid_hostnames = true;
        self.insecure = true;
        self
    }

    /// TLS method
    pub fn method(&self) -> SslMethod {
        self.method
    }

    /// CA certificate file (PEM)
    pub fn ca_file(&self) -> Option<&str> {
        self.ca_file.as_deref()
    }

    /// Combined client certificate and key file (PEM)
    pub fn cert_key_file(&self) -> Option<&str> {
        self.cert_key_file.as_deref()
    }

    /// Whether hostname verification is skipped
    pub fn allows_invalid_hostnames(&self) -> bool {
        self.allow_invalid_hostnames
    }

    /// Connection string options for these settings
    pub(crate) fn query_options(&self) -> Vec<(&'static str, String)> {
        let mut options = vec![("tls", "true".to_string())];
        if let Some(ref ca) = self.ca_file {
            options.push(("tlsCAFile", ca.clone()));
        }
        if let Some(ref cert) = self.cert_key_file {
            options.push(("tlsCertificateKeyFile", cert.clone()));
        }
        if self.insecure {
            options.push(("tlsInsecure", "true".to_string()));
            return options;
        }
        if self.method == SslMethod::Unvalidated {
            options.push(("tlsAllowInvalidCertificates", "true".to_string()));
        }
        if self.allow_invalid_hostnames {
            options.push(("tlsAllowInvalidHostnames", "true".to_string()));
        }
        options
    }
}
