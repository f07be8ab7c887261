//! Connection string parsing
//!
//! Supports formats:
//! * mongodb://[user[:password]@]host[:port][,host[:port]...][/[database]][?options]
//! * mongodb+srv://[user[:password]@]host[/[database]][?options]

use super::attributes::{HostAddress, DEFAULT_PORT};
use super::auth::AuthStrategy;
use super::read_preference;
use super::tls::{SslMethod, TlsSettings};
use super::ConnectionDescriptor;
use crate::{Error, Result};

const SCHEME: &str = "mongodb://";
const SRV_SCHEME: &str = "mongodb+srv://";

/// Options recognized while parsing; everything else is carried through
#[derive(Debug, Default)]
struct ParsedOptions {
    auth_mechanism: Option<String>,
    auth_source: Option<String>,
    auth_mechanism_properties: Option<String>,
    replica_set: Option<String>,
    read_preference: Option<String>,
    app_name: Option<String>,
    direct_connection: Option<bool>,
    tls: Option<bool>,
    tls_ca_file: Option<String>,
    tls_cert_key_file: Option<String>,
    tls_allow_invalid_certificates: bool,
    tls_allow_invalid_hostnames: bool,
    tls_insecure: bool,
    extra: Vec<(String, String)>,
}

/// Percent-decode a URI component
fn decode(component: &str, what: &str) -> Result<String> {
    urlencoding::decode(component)
        .map(|s| s.into_owned())
        .map_err(|_| Error::InvalidUri(format!("invalid percent-encoding in {}", what)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::InvalidUri(format!(
            "invalid value for {}: '{}' (expected true or false)",
            key, value
        ))),
    }
}

/// Parse one `host[:port]` entry, returning whether a port was given
fn parse_host(entry: &str) -> Result<(HostAddress, bool)> {
    let (host, port) = if let Some(rest) = entry.strip_prefix('[') {
        // IPv6 literal: [::1]:27017
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| Error::InvalidUri(format!("unterminated IPv6 host '{}'", entry)))?;
        match after {
            "" => (host, None),
            _ => match after.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => return Err(Error::InvalidUri(format!("invalid host '{}'", entry))),
            },
        }
    } else {
        match entry.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (entry, None),
        }
    };

    if host.is_empty() {
        return Err(Error::InvalidUri("empty host".into()));
    }

    if host.to_ascii_lowercase().ends_with(".sock") {
        if port.is_some() {
            return Err(Error::InvalidUri(format!(
                "unix socket host '{}' cannot have a port",
                entry
            )));
        }
        return Ok((HostAddress::new(decode(host, "host")?, DEFAULT_PORT), false));
    }

    let explicit = port.is_some();
    let port = match port {
        Some(p) => match p.parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => return Err(Error::InvalidUri(format!("invalid port '{}'", p))),
        },
        None => DEFAULT_PORT,
    };

    Ok((HostAddress::new(host, port), explicit))
}

fn parse_options(query: &str) -> Result<ParsedOptions> {
    let mut options = ParsedOptions::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidUri(format!("option '{}' has no value", pair)))?;

        match key.to_ascii_lowercase().as_str() {
            "authmechanism" => options.auth_mechanism = Some(value.to_string()),
            "authsource" => options.auth_source = Some(decode(value, "authSource")?),
            "authmechanismproperties" => {
                options.auth_mechanism_properties =
                    Some(decode(value, "authMechanismProperties")?)
            }
            "replicaset" => options.replica_set = Some(decode(value, "replicaSet")?),
            "readpreference" => options.read_preference = Some(value.to_string()),
            "appname" => options.app_name = Some(decode(value, "appName")?),
            "directconnection" => options.direct_connection = Some(parse_bool(key, value)?),
            "tls" | "ssl" => options.tls = Some(parse_bool(key, value)?),
            "tlscafile" => options.tls_ca_file = Some(decode(value, "tlsCAFile")?),
            "tlscertificatekeyfile" => {
                options.tls_cert_key_file = Some(decode(value, "tlsCertificateKeyFile")?)
            }
            "tlsallowinvalidcertificates" => {
                options.tls_allow_invalid_certificates = parse_bool(key, value)?
            }
            "tlsallowinvalidhostnames" => {
                options.tls_allow_invalid_hostnames = parse_bool(key, value)?
            }
            "tlsinsecure" => options.tls_insecure = parse_bool(key, value)?,
            _ => options.extra.push((key.to_string(), value.to_string())),
        }
    }

    Ok(options)
}

/// Resolve TLS settings from parsed options.
///
/// TLS left unspecified stays unspecified, so the driver default applies
/// (on for SRV, off otherwise).
fn resolve_tls(options: &mut ParsedOptions) -> Result<Option<TlsSettings>> {
    let has_files = options.tls_ca_file.is_some() || options.tls_cert_key_file.is_some();
    let relaxed = options.tls_insecure
        || options.tls_allow_invalid_certificates
        || options.tls_allow_invalid_hostnames;
    match options.tls {
        Some(false) => {
            if has_files || relaxed {
                return Err(Error::InvalidUri(
                    "tls=false conflicts with other TLS options".into(),
                ));
            }
            options.extra.push(("tls".into(), "false".into()));
            return Ok(None);
        }
        None if !has_files && !relaxed => return Ok(None),
        _ => {}
    }

    if options.tls_insecure
        && (options.tls_allow_invalid_certificates || options.tls_allow_invalid_hostnames)
    {
        return Err(Error::InvalidUri(
            "tlsInsecure cannot be combined with tlsAllowInvalidCertificates or tlsAllowInvalidHostnames".into(),
        ));
    }

    let method = if options.tls_allow_invalid_certificates {
        SslMethod::Unvalidated
    } else {
        match (&options.tls_ca_file, &options.tls_cert_key_file) {
            (Some(_), Some(_)) => SslMethod::All,
            (Some(_), None) => SslMethod::Server,
            _ => SslMethod::SystemCa,
        }
    };

    let settings = TlsSettings::new(
        method,
        options.tls_ca_file.take(),
        options.tls_cert_key_file.take(),
    )?;
    Ok(settings.map(|tls| {
        if options.tls_insecure {
            tls.insecure()
        } else if options.tls_allow_invalid_hostnames {
            tls.with_invalid_hostnames_allowed()
        } else {
            tls
        }
    }))
}

/// Parse a connection string into a descriptor
pub(super) fn parse(s: &str) -> Result<ConnectionDescriptor> {
    let (srv, rest) = if let Some(rest) = s.strip_prefix(SRV_SCHEME) {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix(SCHEME) {
        (false, rest)
    } else {
        return Err(Error::InvalidUri(
            "connection string must start with mongodb:// or mongodb+srv://".into(),
        ));
    };

    // Split off query string before parsing authority and path
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

    let (authority, path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, path),
        None => (rest, ""),
    };

    let (userinfo, host_list) = match authority.rsplit_once('@') {
        Some((userinfo, hosts)) => (Some(userinfo), hosts),
        None => (None, authority),
    };

    let (username, password) = match userinfo {
        Some(info) => {
            let (user, password) = match info.split_once(':') {
                Some((user, password)) => (user, Some(password)),
                None => (info, None),
            };
            if user.is_empty() {
                return Err(Error::InvalidUri("empty username".into()));
            }
            let password = password.map(|p| decode(p, "password")).transpose()?;
            (Some(decode(user, "username")?), password)
        }
        None => (None, None),
    };

    if host_list.is_empty() {
        return Err(Error::InvalidUri("missing host".into()));
    }

    let mut hosts = Vec::new();
    let mut any_port = false;
    for entry in host_list.split(',') {
        let (host, explicit_port) = parse_host(entry)?;
        any_port |= explicit_port;
        hosts.push(host);
    }

    if srv && (hosts.len() != 1 || any_port) {
        return Err(Error::InvalidUri(
            "mongodb+srv connection strings must have exactly one host and no port".into(),
        ));
    }

    if path.contains('/') {
        return Err(Error::InvalidUri(format!("invalid database name '{}'", path)));
    }
    let database = match path {
        "" => None,
        db => Some(decode(db, "database")?),
    };

    let mut options = parse_options(query)?;

    let auth_source = options.auth_source.take();
    let auth = AuthStrategy::from_uri_parts(
        options.auth_mechanism.as_deref(),
        username,
        password,
        auth_source.clone(),
        options.auth_mechanism_properties.as_deref(),
    )?;
    if let (AuthStrategy::None, Some(source)) = (&auth, auth_source) {
        options.extra.push(("authSource".into(), source));
    }

    let read_preference = read_preference::parse_or_default(options.read_preference.as_deref())
        .map_err(|e| Error::InvalidUri(e.to_string()))?;

    let tls = resolve_tls(&mut options)?;

    Ok(ConnectionDescriptor {
        hosts,
        srv,
        database,
        auth,
        read_preference,
        replica_set: options.replica_set,
        app_name: options.app_name,
        direct_connection: options.direct_connection,
        tls,
        extra_options: options.extra,
    })
}

/// Set a query option on a connection string, replacing any existing value
pub(crate) fn set_query_param(uri: &str, key: &str, value: &str) -> String {
    let (base, query) = uri.split_once('?').unwrap_or((uri, ""));

    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let name = pair.split_once('=').map_or(*pair, |(k, _)| k);
            !name.eq_ignore_ascii_case(key)
        })
        .map(str::to_string)
        .collect();
    pairs.push(format!("{}={}", key, value));

    // Options must follow a path separator: mongodb://host/?opt=1
    let authority_and_path = base.split_once("://").map_or(base, |(_, rest)| rest);
    let separator = if authority_and_path.contains('/') {
        ""
    } else {
        "/"
    };

    format!("{}{}?{}", base, separator, pairs.join("&"))
}
