//! Authentication strategies

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Auth source used by external mechanisms (Kerberos, LDAP, X.509)
pub const EXTERNAL_AUTH_SOURCE: &str = "$external";

/// Auth strategy name as written in connection attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStrategyKind {
    /// No authentication
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Username/password with mechanism negotiation
    #[serde(rename = "MONGODB")]
    MongoDb,
    /// Username/password forcing SCRAM-SHA-256
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    /// Kerberos (GSSAPI)
    #[serde(rename = "KERBEROS")]
    Kerberos,
    /// LDAP (PLAIN)
    #[serde(rename = "LDAP")]
    Ldap,
    /// X.509 client certificate
    #[serde(rename = "X509")]
    X509,
}

impl AuthStrategyKind {
    /// Attribute spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::MongoDb => "MONGODB",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::Kerberos => "KERBEROS",
            Self::Ldap => "LDAP",
            Self::X509 => "X509",
        }
    }
}

impl std::fmt::Display for AuthStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SCRAM mechanism selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScramMechanism {
    /// Let the server pick
    Negotiate,
    /// SCRAM-SHA-1
    Sha1,
    /// SCRAM-SHA-256
    Sha256,
}

/// Authentication strategy with its strategy-specific credentials
#[derive(Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// No authentication
    None,
    /// SCRAM username/password
    Scram {
        /// Username
        username: String,
        /// Password
        password: String,
        /// Authentication database
        source: Option<String>,
        /// Mechanism to request
        mechanism: ScramMechanism,
    },
    /// Kerberos (GSSAPI)
    Kerberos {
        /// Kerberos principal
        principal: String,
        /// Optional password (otherwise the ticket cache is used)
        password: Option<String>,
        /// Service name (driver default: `mongodb`)
        service_name: Option<String>,
        /// Canonicalize the server hostname before building the SPN
        canonicalize_hostname: bool,
        /// Remaining mechanism properties, such as `SERVICE_REALM`, kept as written
        extra_properties: Vec<(String, String)>,
        /// Authentication database; `$external` when None
        source: Option<String>,
    },
    /// LDAP (PLAIN)
    Ldap {
        /// LDAP username
        username: String,
        /// LDAP password
        password: String,
        /// Authentication database; `$external` when None
        source: Option<String>,
    },
    /// X.509 client certificate
    X509 {
        /// Certificate subject, derived from the certificate when absent
        username: Option<String>,
        /// Authentication database; `$external` when None
        source: Option<String>,
    },
}

impl AuthStrategy {
    /// Strategy kind
    pub fn kind(&self) -> AuthStrategyKind {
        match self {
            Self::None => AuthStrategyKind::None,
            Self::Scram {
                mechanism: ScramMechanism::Sha256,
                ..
            } => AuthStrategyKind::ScramSha256,
            Self::Scram { .. } => AuthStrategyKind::MongoDb,
            Self::Kerberos { .. } => AuthStrategyKind::Kerberos,
            Self::Ldap { .. } => AuthStrategyKind::Ldap,
            Self::X509 { .. } => AuthStrategyKind::X509,
        }
    }

    /// Username placed in the connection string user info
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Scram { username, .. } | Self::Ldap { username, .. } => Some(username),
            Self::Kerberos { principal, .. } => Some(principal),
            Self::X509 { username, .. } => username.as_deref(),
        }
    }

    /// Password placed in the connection string user info
    pub fn password(&self) -> Option<&str> {
        match self {
            Self::Scram { password, .. } | Self::Ldap { password, .. } => Some(password),
            Self::Kerberos { password, .. } => password.as_deref(),
            Self::None | Self::X509 { .. } => None,
        }
    }

    /// Connection string options selecting this strategy
    pub(crate) fn query_options(&self) -> Vec<(&'static str, String)> {
        let source_or_external = |source: &Option<String>| {
            let source = source.as_deref().unwrap_or(EXTERNAL_AUTH_SOURCE);
            ("authSource", source.to_string())
        };
        match self {
            Self::None => Vec::new(),
            Self::Scram {
                source, mechanism, ..
            } => {
                let mut options = Vec::new();
                match mechanism {
                    ScramMechanism::Negotiate => {}
                    ScramMechanism::Sha1 => options.push(("authMechanism", "SCRAM-SHA-1".into())),
                    ScramMechanism::Sha256 => {
                        options.push(("authMechanism", "SCRAM-SHA-256".into()))
                    }
                }
                if let Some(source) = source {
                    options.push(("authSource", source.clone()));
                }
                options
            }
            Self::Kerberos {
                service_name,
                canonicalize_hostname,
                extra_properties,
                source,
                ..
            } => {
                let mut options = vec![
                    ("authMechanism", "GSSAPI".to_string()),
                    source_or_external(source),
                ];
                let mut properties = Vec::new();
                if let Some(name) = service_name {
                    properties.push(format!("SERVICE_NAME:{}", name));
                }
                if *canonicalize_hostname {
                    properties.push("CANONICALIZE_HOST_NAME:true".to_string());
                }
                properties.extend(extra_properties.iter().map(|(k, v)| format!("{}:{}", k, v)));
                if !properties.is_empty() {
                    options.push(("authMechanismProperties", properties.join(",")));
                }
                options
            }
            Self::Ldap { source, .. } => vec![
                ("authMechanism", "PLAIN".to_string()),
                source_or_external(source),
            ],
            Self::X509 { source, .. } => vec![
                ("authMechanism", "MONGODB-X509".to_string()),
                source_or_external(source),
            ],
        }
    }

    /// Resolve a strategy from connection string parts
    pub(crate) fn from_uri_parts(
        mechanism: Option<&str>,
        username: Option<String>,
        password: Option<String>,
        source: Option<String>,
        properties: Option<&str>,
    ) -> Result<Self> {
        let require_user = |strategy: &'static str| {
            username.clone().ok_or(Error::MissingCredential {
                strategy,
                field: "username",
            })
        };
        let require_password = |strategy: &'static str| {
            password.clone().ok_or(Error::MissingCredential {
                strategy,
                field: "password",
            })
        };

        let scram = |mechanism: ScramMechanism| -> Result<Self> {
            Ok(Self::Scram {
                username: require_user("MONGODB")?,
                password: require_password("MONGODB")?,
                source: source.clone(),
                mechanism,
            })
        };

        let mechanism = mechanism.map(str::to_ascii_uppercase);
        if properties.is_some() && mechanism.as_deref() != Some("GSSAPI") {
            return Err(Error::InvalidUri(
                "authMechanismProperties is only supported with authMechanism=GSSAPI".into(),
            ));
        }

        match mechanism.as_deref() {
            None if username.is_none() => {
                if password.is_some() {
                    return Err(Error::InvalidUri("password given without username".into()));
                }
                Ok(Self::None)
            }
            None => scram(ScramMechanism::Negotiate),
            Some("SCRAM-SHA-1") => scram(ScramMechanism::Sha1),
            Some("SCRAM-SHA-256") => scram(ScramMechanism::Sha256),
            Some("GSSAPI") => {
                let properties = parse_mechanism_properties(properties.unwrap_or(""))?;
                let mut service_name = None;
                let mut canonicalize_hostname = false;
                let mut extra_properties = Vec::new();
                for (key, value) in properties {
                    let canonicalize = key == "CANONICALIZE_HOST_NAME";
                    if key == "SERVICE_NAME" {
                        service_name = Some(value);
                    } else if canonicalize && value.eq_ignore_ascii_case("true") {
                        canonicalize_hostname = true;
                    } else if canonicalize && value.eq_ignore_ascii_case("false") {
                        canonicalize_hostname = false;
                    } else {
                        extra_properties.push((key, value));
                    }
                }
                Ok(Self::Kerberos {
                    principal: require_user("KERBEROS")?,
                    password,
                    service_name,
                    canonicalize_hostname,
                    extra_properties,
                    source,
                })
            }
            Some("PLAIN") => Ok(Self::Ldap {
                username: require_user("LDAP")?,
                password: require_password("LDAP")?,
                source,
            }),
            Some("MONGODB-X509") => Ok(Self::X509 { username, source }),
            Some(other) => Err(Error::InvalidUri(format!(
                "unsupported authMechanism '{}': expected SCRAM-SHA-1, SCRAM-SHA-256, GSSAPI, PLAIN, or MONGODB-X509",
                other
            ))),
        }
    }
}

// Passwords never reach logs through Debug
impl std::fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |p: Option<&str>| p.map(|_| "<redacted>");
        match self {
            Self::None => f.write_str("None"),
            Self::Scram {
                username,
                source,
                mechanism,
                ..
            } => f
                .debug_struct("Scram")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("source", source)
                .field("mechanism", mechanism)
                .finish(),
            Self::Kerberos {
                principal,
                password,
                service_name,
                canonicalize_hostname,
                extra_properties,
                source,
            } => f
                .debug_struct("Kerberos")
                .field("principal", principal)
                .field("password", &redacted(password.as_deref()))
                .field("service_name", service_name)
                .field("canonicalize_hostname", canonicalize_hostname)
                .field("extra_properties", extra_properties)
                .field("source", source)
                .finish(),
            Self::Ldap {
                username, source, ..
            } => f
                .debug_struct("Ldap")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("source", source)
                .finish(),
            Self::X509 { username, source } => f
                .debug_struct("X509")
                .field("username", username)
                .field("source", source)
                .finish(),
        }
    }
}

/// Parse `KEY:value,KEY:value` mechanism properties
fn parse_mechanism_properties(s: &str) -> Result<Vec<(String, String)>> {
    s.split(',')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            pair.split_once(':')
                .map(|(k, v)| (k.to_ascii_uppercase(), v.to_string()))
                .ok_or_else(|| {
                    Error::InvalidUri(format!("invalid authMechanismProperties entry '{}'", pair))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_mechanism_no_user_is_none() {
        let auth = AuthStrategy::from_uri_parts(None, None, None, None, None).unwrap();
        assert_eq!(auth, AuthStrategy::None);
        assert_eq!(auth.kind(), AuthStrategyKind::None);
    }

    #[test]
    fn test_password_without_user_fails() {
        let result = AuthStrategy::from_uri_parts(None, None, Some("pw".into()), None, None);
        assert!(matches!(result, Err(Error::InvalidUri(_))));
    }

    #[test]
    fn test_user_without_mechanism_is_scram() {
        let auth = AuthStrategy::from_uri_parts(
            None,
            Some("alice".into()),
            Some("pw".into()),
            Some("admin".into()),
            None,
        )
        .unwrap();
        assert_eq!(auth.kind(), AuthStrategyKind::MongoDb);
        assert_eq!(auth.username(), Some("alice"));
        assert_eq!(auth.password(), Some("pw"));
        assert_eq!(
            auth.query_options(),
            vec![("authSource", "admin".to_string())]
        );
    }

    #[test]
    fn test_scram_requires_password() {
        let result =
            AuthStrategy::from_uri_parts(Some("SCRAM-SHA-256"), Some("alice".into()), None, None, None);
        assert!(matches!(
            result,
            Err(Error::MissingCredential {
                strategy: "MONGODB",
                field: "password"
            })
        ));
    }

    #[test]
    fn test_gssapi_with_properties() {
        let auth = AuthStrategy::from_uri_parts(
            Some("GSSAPI"),
            Some("user@EXAMPLE.COM".into()),
            None,
            None,
            Some("SERVICE_NAME:mongosvc,CANONICALIZE_HOST_NAME:true"),
        )
        .unwrap();
        match &auth {
            AuthStrategy::Kerberos {
                principal,
                service_name,
                canonicalize_hostname,
                ..
            } => {
                assert_eq!(principal, "user@EXAMPLE.COM");
                assert_eq!(service_name.as_deref(), Some("mongosvc"));
                assert!(*canonicalize_hostname);
            }
            other => panic!("expected Kerberos, got {:?}", other),
        }
        let options = auth.query_options();
        assert!(options.contains(&("authMechanism", "GSSAPI".to_string())));
        assert!(options.contains(&("authSource", "$external".to_string())));
        assert!(options.contains(&(
            "authMechanismProperties",
            "SERVICE_NAME:mongosvc,CANONICALIZE_HOST_NAME:true".to_string()
        )));
    }

    #[test]
    fn test_gssapi_requires_principal() {
        let result = AuthStrategy::from_uri_parts(Some("GSSAPI"), None, None, None, None);
        assert!(matches!(
            result,
            Err(Error::MissingCredential {
                strategy: "KERBEROS",
                ..
            })
        ));
    }

    #[test]
    fn test_plain_is_ldap() {
        let auth = AuthStrategy::from_uri_parts(
            Some("plain"),
            Some("ldapuser".into()),
            Some("secret".into()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(auth.kind(), AuthStrategyKind::Ldap);
    }

    #[test]
    fn test_unsupported_mechanism() {
        let result = AuthStrategy::from_uri_parts(Some("MONGODB-AWS"), None, None, None, None);
        assert!(matches!(result, Err(Error::InvalidUri(_))));
    }

    #[test]
    fn test_invalid_mechanism_properties() {
        let result = AuthStrategy::from_uri_parts(
            Some("GSSAPI"),
            Some("user".into()),
            None,
            None,
            Some("SERVICE_NAME"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_gssapi_keeps_other_properties() {
        let auth = AuthStrategy::from_uri_parts(
            Some("GSSAPI"),
            Some("user@EXAMPLE.COM".into()),
            None,
            None,
            Some("SERVICE_NAME:mongodb,SERVICE_REALM:OTHER.COM,SERVICE_HOST:kdc.other.com"),
        )
        .unwrap();
        assert!(auth.query_options().contains(&(
            "authMechanismProperties",
            "SERVICE_NAME:mongodb,SERVICE_REALM:OTHER.COM,SERVICE_HOST:kdc.other.com".to_string()
        )));
    }

    #[test]
    fn test_gssapi_keeps_canonicalize_mode() {
        let auth = AuthStrategy::from_uri_parts(
            Some("GSSAPI"),
            Some("user@EXAMPLE.COM".into()),
            None,
            None,
            Some("CANONICALIZE_HOST_NAME:forwardAndReverse"),
        )
        .unwrap();
        assert!(auth.query_options().contains(&(
            "authMechanismProperties",
            "CANONICALIZE_HOST_NAME:forwardAndReverse".to_string()
        )));
    }

    #[test]
    fn test_external_mechanisms_keep_explicit_source() {
        let ldap = AuthStrategy::from_uri_parts(
            Some("PLAIN"),
            Some("ldapuser".into()),
            Some("secret".into()),
            Some("ldapdb".into()),
            None,
        )
        .unwrap();
        assert_eq!(
            ldap.query_options(),
            vec![
                ("authMechanism", "PLAIN".to_string()),
                ("authSource", "ldapdb".to_string())
            ]
        );

        let x509 = AuthStrategy::from_uri_parts(Some("MONGODB-X509"), None, None, None, None)
            .unwrap();
        assert!(x509
            .query_options()
            .contains(&("authSource", EXTERNAL_AUTH_SOURCE.to_string())));
    }

    #[test]
    fn test_mechanism_properties_need_gssapi() {
        let result = AuthStrategy::from_uri_parts(
            Some("SCRAM-SHA-256"),
            Some("alice".into()),
            Some("pw".into()),
            None,
            Some("SERVICE_NAME:mongodb"),
        );
        assert!(matches!(result, Err(Error::InvalidUri(_))));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let auth = AuthStrategy::Ldap {
            username: "ldapuser".into(),
            password: "hunter2".into(),
            source: None,
        };
        let debug_str = format!("{:?}", auth);
        assert!(debug_str.contains("ldapuser"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: AuthStrategyKind = serde_json::from_str("\"SCRAM-SHA-256\"").unwrap();
        assert_eq!(kind, AuthStrategyKind::ScramSha256);
        assert_eq!(
            serde_json::to_string(&AuthStrategyKind::Kerberos).unwrap(),
            "\"KERBEROS\""
        );
    }
}
