//! Canonical text and reverse-DNS pointer generation.

use crate::models::Family;
use itertools::Itertools;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Zone suffix for IPv4 reverse lookups.
pub const IPV4_REVERSE_ZONE: &str = "in-addr.arpa";

/// Zone suffix for IPv6 reverse lookups.
pub const IPV6_REVERSE_ZONE: &str = "ip6.arpa";

/// Convert a raw address into a `std::net` address of the given family.
///
/// The address must already fit the family width.
pub fn to_ip_addr(family: Family, address: u128) -> IpAddr {
    match family {
        Family::V4 => IpAddr::V4(Ipv4Addr::from(address as u32)),
        Family::V6 => IpAddr::V6(Ipv6Addr::from(address)),
    }
}

/// Compressed address text (RFC 5952 for IPv6), without a prefix.
pub fn address_text(family: Family, address: u128) -> String {
    to_ip_addr(family, address).to_string()
}

/// Canonical CIDR text: the compressed address, suffixed with
/// `/prefix_len` unless the value is a single host.
///
/// # Examples
/// ```
/// use cidr_man::{format::compressed, Family};
/// assert_eq!(compressed(Family::V4, 0x0A00_0000, 8), "10.0.0.0/8");
/// assert_eq!(compressed(Family::V6, 1, 128), "::1");
/// ```
pub fn compressed(family: Family, address: u128, prefix_len: u8) -> String {
    let text = address_text(family, address);
    if prefix_len == family.max_prefix() {
        text
    } else {
        format!("{text}/{prefix_len}")
    }
}

/// Reverse-DNS name for a value.
///
/// Labels run from the least significant unit to the most significant:
/// decimal bytes for IPv4, hex nibbles for IPv6. Below the maximum
/// prefix only the labels wholly inside the prefix are kept, counted in
/// bytes for IPv4 and in nibbles for IPv6.
pub fn reverse_pointer(family: Family, address: u128, prefix_len: u8) -> String {
    let labels: Vec<String> = match family {
        Family::V4 => (address as u32)
            .to_be_bytes()
            .iter()
            .take(usize::from(prefix_len / 8))
            .map(|b| b.to_string())
            .collect(),
        Family::V6 => address
            .to_be_bytes()
            .iter()
            .flat_map(|b| [b >> 4, b & 0x0f])
            .take(usize::from(prefix_len / 4))
            .map(|n| format!("{n:x}"))
            .collect(),
    };
    let zone = match family {
        Family::V4 => IPV4_REVERSE_ZONE,
        Family::V6 => IPV6_REVERSE_ZONE,
    };
    if labels.is_empty() {
        return zone.to_string();
    }
    format!("{}.{zone}", labels.iter().rev().join("."))
}
