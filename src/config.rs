//! Process-wide IPAM settings.
//!
//! Settings are passed by reference into every admission call rather than read
//! from globals, so two stores with different policies can live in one process.

use serde::{Deserialize, Serialize};
use std::error::Error;

/// Environment variable for [`IpamConfig::enforce_global_unique`].
pub const ENV_ENFORCE_GLOBAL_UNIQUE: &str = "ENFORCE_GLOBAL_UNIQUE";
/// Environment variable for [`IpamConfig::auto_prefix_create`].
pub const ENV_AUTO_PREFIX_CREATE: &str = "AUTO_PREFIX_CREATE";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IpamConfig {
    /// Reject duplicate prefixes/addresses outside any VRF.
    #[serde(default)]
    pub enforce_global_unique: bool,
    /// Create the containing prefix when an IP address is admitted.
    #[serde(default)]
    pub auto_prefix_create: bool,
}

impl IpamConfig {
    pub fn new(enforce_global_unique: bool, auto_prefix_create: bool) -> IpamConfig {
        IpamConfig {
            enforce_global_unique,
            auto_prefix_create,
        }
    }

    /// Read settings from the environment, falling back to defaults for unset variables.
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<IpamConfig, Box<dyn Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<IpamConfig, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = IpamConfig::default();
        if let Some(v) = lookup(ENV_ENFORCE_GLOBAL_UNIQUE) {
            config.enforce_global_unique = parse_flag(ENV_ENFORCE_GLOBAL_UNIQUE, &v)?;
        }
        if let Some(v) = lookup(ENV_AUTO_PREFIX_CREATE) {
            config.auto_prefix_create = parse_flag(ENV_AUTO_PREFIX_CREATE, &v)?;
        }
        log::debug!("IpamConfig loaded: {config:?}");
        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Box<dyn Error>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("Invalid boolean for {key}: '{other}'").into()),
    }
}
