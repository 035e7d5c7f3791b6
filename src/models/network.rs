//! IP network address and CIDR notation utilities.
//!
//! Provides [`NetworkAddress`] for representing IPv4/IPv6 addresses with a prefix
//! length, along with the masking helpers used for containment checks.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum length for an IPv6 prefix (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// Bit width of the address family of `addr`.
pub fn max_length(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => MAX_LENGTH_V4,
        IpAddr::V6(_) => MAX_LENGTH_V6,
    }
}

/// Convert a prefix length to a netmask for a family `bits` wide.
///
/// The mask is returned right-aligned in a u128 so one routine serves both families.
///
/// # Examples
/// ```
/// use ipam_core::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24, 32).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8, bits: u8) -> Result<u128, Box<dyn Error>> {
    if len > bits {
        Err("Network length is too long".into())
    } else if len == 0 {
        Ok(0)
    } else {
        let all_bits = if bits == MAX_LENGTH_V6 {
            u128::MAX
        } else {
            (1u128 << bits) - 1
        };
        let right_len = (bits - len) as u32;
        Ok((all_bits >> right_len) << right_len)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: IpAddr, len: u8) -> Result<IpAddr, Box<dyn Error>> {
    let mask = get_cidr_mask(len, max_length(addr))?;
    let cut = match addr {
        IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from((u32::from(v4) as u128 & mask) as u32)),
        IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask)),
    };
    Ok(cut)
}

/// Canonical containing block of `addr` at `len`: host bits discarded.
pub fn network_of(addr: IpAddr, len: u8) -> Result<NetworkAddress, Box<dyn Error>> {
    Ok(NetworkAddress {
        addr: cut_addr(addr, len)?,
        mask: len,
    })
}

/// IP address with CIDR prefix length.
///
/// Equality is exact on both fields, so `10.0.0.1/24` and `10.0.0.0/24` differ.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct NetworkAddress {
    /// The IP address (may carry host bits).
    pub addr: IpAddr,
    /// The prefix length (0-32 or 0-128).
    pub mask: u8,
}

impl Serialize for NetworkAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkAddress {
    fn deserialize<D>(deserializer: D) -> Result<NetworkAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NetworkAddress::new(&s)
            .map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

impl NetworkAddress {
    /// Create a new [`NetworkAddress`] from a CIDR string (e.g. "10.0.0.0/24" or "2001:db8::/32").
    pub fn new(addr_cidr: &str) -> Result<NetworkAddress, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| format!("Invalid address/mask {addr_cidr}"))?;
        let addr = IpAddr::from_str(addr).map_err(|_| format!("Invalid address {addr}"))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| format!("Invalid prefix length {mask}"))?;
        if mask > max_length(addr) {
            return Err("Network length is too long".into());
        }
        Ok(NetworkAddress { addr, mask })
    }

    /// Bit width of this address family.
    pub fn bits(&self) -> u8 {
        max_length(self.addr)
    }

    /// The containing network of this address (host bits cleared).
    pub fn network(&self) -> NetworkAddress {
        // mask is validated against the family on construction
        network_of(self.addr, self.mask).unwrap_or(*self)
    }

    /// True when no host bits are set.
    pub fn is_network(&self) -> bool {
        self.network().addr == self.addr
    }

    /// Whether `inner` lies entirely inside this network.
    pub fn contains(&self, inner: &NetworkAddress) -> bool {
        if self.bits() != inner.bits() || self.mask > inner.mask {
            return false;
        }
        match (cut_addr(self.addr, self.mask), cut_addr(inner.addr, self.mask)) {
            (Ok(outer), Ok(masked)) => outer == masked,
            _ => false,
        }
    }
}

impl FromStr for NetworkAddress {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkAddress::new(s)
    }
}

impl std::fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
