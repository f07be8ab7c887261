//! Read preference mode

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Read preference mode as written in connection strings and attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadPreferenceMode {
    /// Primary only
    #[default]
    Primary,
    /// Primary if available, otherwise a secondary
    PrimaryPreferred,
    /// Secondaries only
    Secondary,
    /// A secondary if available, otherwise the primary
    SecondaryPreferred,
    /// Lowest latency member
    Nearest,
}

impl ReadPreferenceMode {
    /// Connection string spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::PrimaryPreferred => "primaryPreferred",
            Self::Secondary => "secondary",
            Self::SecondaryPreferred => "secondaryPreferred",
            Self::Nearest => "nearest",
        }
    }
}

impl std::fmt::Display for ReadPreferenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReadPreferenceMode {
    type Err = Error;

    // Connection string option values are case-insensitive
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "primarypreferred" => Ok(Self::PrimaryPreferred),
            "secondary" => Ok(Self::Secondary),
            "secondarypreferred" => Ok(Self::SecondaryPreferred),
            "nearest" => Ok(Self::Nearest),
            _ => Err(Error::Config(format!(
                "invalid readPreference '{}': expected primary, primaryPreferred, secondary, secondaryPreferred, or nearest",
                s
            ))),
        }
    }
}

/// Parse a read preference, defaulting when absent
pub(crate) fn parse_or_default(value: Option<&str>) -> Result<ReadPreferenceMode> {
    value.map(str::parse).transpose().map(Option::unwrap_or_default)
}
