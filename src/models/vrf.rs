//! VRF (routing scope) data model.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

/// Store-assigned identity of a [`Vrf`].
pub type VrfId = u64;

/// Route distinguisher forms accepted: `ASN:nn` or `IPv4:nn`.
static RD_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_rd_regex() -> &'static Regex {
    RD_REGEX.get_or_init(|| {
        Regex::new(r"^(\d{1,10}|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}):\d{1,10}$")
            .expect("Invalid Regex")
    })
}

/// Check a route distinguisher string.
pub fn validate_rd(rd: &str) -> Result<(), Box<dyn Error>> {
    if get_rd_regex().is_match(rd) {
        Ok(())
    } else {
        Err(format!("Invalid route distinguisher '{rd}', expected ASN:nn or IP:nn").into())
    }
}

/// A persisted routing scope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Vrf {
    pub id: VrfId,
    pub name: String,
    /// Route distinguisher, unique across VRFs when set.
    pub rd: Option<String>,
    /// Reject duplicate prefixes/addresses inside this VRF.
    pub enforce_unique: bool,
    #[serde(default)]
    pub description: String,
    pub created: DateTime<Utc>,
}

/// Request to create a [`Vrf`].
///
/// When read from JSON, a missing `enforce_unique` key means `true`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewVrf {
    pub name: String,
    #[serde(default)]
    pub rd: Option<String>,
    /// Reject duplicates inside this VRF. Defaults to `true` when omitted.
    #[serde(default = "default_enforce_unique")]
    pub enforce_unique: bool,
    #[serde(default)]
    pub description: String,
}

fn default_enforce_unique() -> bool {
    true
}

impl NewVrf {
    pub fn new(name: &str, rd: Option<&str>, enforce_unique: bool) -> NewVrf {
        NewVrf {
            name: name.to_string(),
            rd: rd.map(str::to_string),
            enforce_unique,
            description: String::new(),
        }
    }
}

impl fmt::Display for Vrf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rd {
            Some(rd) => write!(f, "{} ({})", self.name, rd),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rd() {
        assert!(validate_rd("1:1").is_ok());
        assert!(validate_rd("65000:100").is_ok());
        assert!(validate_rd("192.0.2.1:7").is_ok());
        assert!(validate_rd("1").is_err());
        assert!(validate_rd("a:b").is_err());
        assert!(validate_rd(":1").is_err());
    }

    #[test]
    fn test_new_vrf_defaults_from_json() {
        let vrf: NewVrf = serde_json::from_str(r#"{"name":"Test"}"#).unwrap();
        assert!(vrf.enforce_unique);
        assert_eq!(vrf.rd, None);
        assert_eq!(vrf.description, "");
    }
}
