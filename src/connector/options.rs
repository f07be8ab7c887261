//! Native driver options

use crate::descriptor::ReadPreferenceMode;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Effective driver options for one native-driver connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverOptions {
    /// Consider the connection established without a reachable primary
    pub connect_with_no_primary: bool,
    /// Read preference
    pub read_preference: ReadPreferenceMode,
    /// Legacy parser flag (always satisfied by this driver)
    pub use_new_url_parser: bool,
    /// Legacy topology flag (always satisfied by this driver)
    pub use_unified_topology: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            connect_with_no_primary: true,
            read_preference: ReadPreferenceMode::Primary,
            use_new_url_parser: true,
            use_unified_topology: true,
        }
    }
}

/// Caller-supplied option overrides; unset keys keep their defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DriverOptionsOverride {
    /// Override for `connectWithNoPrimary`
    pub connect_with_no_primary: Option<bool>,
    /// Override for `readPreference`
    pub read_preference: Option<ReadPreferenceMode>,
    /// Override for `useNewUrlParser`
    pub use_new_url_parser: Option<bool>,
    /// Override for `useUnifiedTopology`
    pub use_unified_topology: Option<bool>,
}

impl DriverOptionsOverride {
    /// Parse overrides from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Shallow merge: every key set in `overrides` wins, the rest come from `defaults`
pub fn merge_driver_options(
    defaults: &DriverOptions,
    overrides: &DriverOptionsOverride,
) -> DriverOptions {
    DriverOptions {
        connect_with_no_primary: overrides
            .connect_with_no_primary
            .unwrap_or(defaults.connect_with_no_primary),
        read_preference: overrides
            .read_preference
            .unwrap_or(defaults.read_preference),
        use_new_url_parser: overrides
            .use_new_url_parser
            .unwrap_or(defaults.use_new_url_parser),
        use_unified_topology: overrides
            .use_unified_topology
            .unwrap_or(defaults.use_unified_topology),
    }
}
