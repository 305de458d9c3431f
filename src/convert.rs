//! Conversion layer.
//!
//! Normalizes every supported source representation into a
//! [`Normalized`] triple of family, integer address and prefix length.
//! Textual parses are cached process-wide since the same CIDR strings
//! tend to be parsed over and over.

use crate::error::{CidrError, Result};
use crate::models::Family;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::{PoisonError, RwLock};

/// Upper bound on the number of distinct strings kept in the parse cache.
pub const PARSE_CACHE_LIMIT: usize = 65_536;

lazy_static! {
    static ref CIDR_RE: Regex = Regex::new(r"^([^/\s]+)(?:/(\d{1,3}))?$").expect("Invalid Regex?");
    static ref PARSE_CACHE: RwLock<HashMap<String, Normalized>> = RwLock::new(HashMap::new());
}

/// Source representations accepted when building a [`Cidr`](crate::Cidr).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CidrInput<'a> {
    /// `"<addr>[/<prefix>]"` notation.
    Text(&'a str),
    /// Raw address value. IPv4 unless the family is overridden.
    Int(u128),
    /// Packed big-endian address, 4 or 16 bytes.
    Bytes(Cow<'a, [u8]>),
    /// Single host address.
    Addr(IpAddr),
    /// Network taken from its network address and prefix length.
    Net(IpNet),
}

/// What the conversion layer discovered about an input.
///
/// Raw integers carry no family or prefix of their own; both are `None`
/// and the caller falls back to IPv4 at the maximum prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub family: Option<Family>,
    pub address: u128,
    pub prefix_len: Option<u8>,
}

impl Normalized {
    fn discovered(family: Family, address: u128, prefix_len: u8) -> Self {
        Normalized {
            family: Some(family),
            address,
            prefix_len: Some(prefix_len),
        }
    }
}

/// Normalize any [`CidrInput`] into family, address and prefix length.
pub fn normalize(input: &CidrInput<'_>) -> Result<Normalized> {
    match input {
        CidrInput::Text(s) => parse_cached(s),
        CidrInput::Int(value) => Ok(Normalized {
            family: None,
            address: *value,
            prefix_len: None,
        }),
        CidrInput::Bytes(bytes) => convert_bytes(bytes),
        CidrInput::Addr(addr) => Ok(convert_addr(*addr)),
        CidrInput::Net(net) => Ok(convert_net(net)),
    }
}

/// Number of strings currently held by the parse cache.
pub fn parse_cache_len() -> usize {
    PARSE_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}

/// Drop every cached text parse.
pub fn clear_parse_cache() {
    PARSE_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

fn parse_cached(s: &str) -> Result<Normalized> {
    if let Some(hit) = PARSE_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(s)
    {
        return Ok(*hit);
    }

    // Concurrent misses on one key compute the same value; last insert wins.
    let parsed = parse_text(s)?;
    log::trace!("parse cache miss for {s:?} -> {parsed:?}");

    let mut cache = PARSE_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    if cache.len() < PARSE_CACHE_LIMIT {
        cache.insert(s.to_string(), parsed);
    } else {
        log::debug!("parse cache full ({PARSE_CACHE_LIMIT} entries), not caching {s:?}");
    }
    Ok(parsed)
}

/// Parse `"<addr>[/<prefix>]"` without touching the cache.
pub fn parse_text(s: &str) -> Result<Normalized> {
    let caps = CIDR_RE
        .captures(s.trim())
        .ok_or_else(|| CidrError::parse(s, "expected <address>[/<prefix>]"))?;
    let addr_s = &caps[1];

    let (family, address) = if addr_s.contains(':') {
        let addr: Ipv6Addr = addr_s
            .parse()
            .map_err(|e| CidrError::parse(s, e))?;
        (Family::V6, u128::from(addr))
    } else if addr_s.contains('.') {
        let addr: Ipv4Addr = addr_s
            .parse()
            .map_err(|e| CidrError::parse(s, e))?;
        (Family::V4, u128::from(u32::from(addr)))
    } else {
        return Err(CidrError::parse(s, "not an IPv4 or IPv6 address"));
    };

    let prefix_len = match caps.get(2) {
        Some(m) => {
            // at most three digits, always fits
            let prefix_len: u32 = m
                .as_str()
                .parse()
                .map_err(|e| CidrError::parse(s, e))?;
            if prefix_len > u32::from(family.max_prefix()) {
                return Err(CidrError::PrefixLength {
                    prefix_len,
                    max: family.max_prefix(),
                });
            }
            prefix_len as u8
        }
        None => family.max_prefix(),
    };

    Ok(Normalized::discovered(family, address, prefix_len))
}

fn convert_bytes(bytes: &[u8]) -> Result<Normalized> {
    let (family, address) = match bytes.len() {
        4 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(bytes);
            (Family::V4, u128::from(u32::from_be_bytes(buf)))
        }
        16 => {
            let mut buf = [0u8; 16];
            buf.copy_from_slice(bytes);
            (Family::V6, u128::from_be_bytes(buf))
        }
        n => {
            return Err(CidrError::parse(
                &format!("{bytes:02x?}"),
                format!("expected 4 or 16 bytes, got {n}"),
            ))
        }
    };
    Ok(Normalized::discovered(family, address, family.max_prefix()))
}

fn convert_addr(addr: IpAddr) -> Normalized {
    match addr {
        IpAddr::V4(a) => Normalized::discovered(Family::V4, u128::from(u32::from(a)), 32),
        IpAddr::V6(a) => Normalized::discovered(Family::V6, u128::from(a), 128),
    }
}

fn convert_net(net: &IpNet) -> Normalized {
    let mut n = convert_addr(net.network());
    n.prefix_len = Some(net.prefix_len());
    n
}

impl<'a> From<&'a str> for CidrInput<'a> {
    fn from(s: &'a str) -> Self {
        CidrInput::Text(s)
    }
}

impl<'a> From<&'a String> for CidrInput<'a> {
    fn from(s: &'a String) -> Self {
        CidrInput::Text(s.as_str())
    }
}

impl From<u32> for CidrInput<'_> {
    fn from(value: u32) -> Self {
        CidrInput::Int(u128::from(value))
    }
}

impl From<u128> for CidrInput<'_> {
    fn from(value: u128) -> Self {
        CidrInput::Int(value)
    }
}

impl<'a> From<&'a [u8]> for CidrInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        CidrInput::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a> From<&'a [u8; 4]> for CidrInput<'a> {
    fn from(bytes: &'a [u8; 4]) -> Self {
        CidrInput::Bytes(Cow::Borrowed(&bytes[..]))
    }
}

impl<'a> From<&'a [u8; 16]> for CidrInput<'a> {
    fn from(bytes: &'a [u8; 16]) -> Self {
        CidrInput::Bytes(Cow::Borrowed(&bytes[..]))
    }
}

impl From<Vec<u8>> for CidrInput<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        CidrInput::Bytes(Cow::Owned(bytes))
    }
}

impl From<IpAddr> for CidrInput<'_> {
    fn from(addr: IpAddr) -> Self {
        CidrInput::Addr(addr)
    }
}

impl From<Ipv4Addr> for CidrInput<'_> {
    fn from(addr: Ipv4Addr) -> Self {
        CidrInput::Addr(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for CidrInput<'_> {
    fn from(addr: Ipv6Addr) -> Self {
        CidrInput::Addr(IpAddr::V6(addr))
    }
}

impl From<IpNet> for CidrInput<'_> {
    fn from(net: IpNet) -> Self {
        CidrInput::Net(net)
    }
}

impl From<Ipv4Net> for CidrInput<'_> {
    fn from(net: Ipv4Net) -> Self {
        CidrInput::Net(IpNet::V4(net))
    }
}

impl From<Ipv6Net> for CidrInput<'_> {
    fn from(net: Ipv6Net) -> Self {
        CidrInput::Net(IpNet::V6(net))
    }
}

/// Dynamically typed input, e.g. a field of a JSON document.
///
/// Strings and non-negative integers map to text and integer input,
/// arrays of byte values to packed bytes. Everything else is rejected
/// with [`CidrError::UnsupportedInput`].
impl<'a> TryFrom<&'a Value> for CidrInput<'a> {
    type Error = CidrError;

    fn try_from(value: &'a Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(CidrInput::Text(s.as_str())),
            Value::Number(n) => n
                .as_u64()
                .map(|v| CidrInput::Int(u128::from(v)))
                .ok_or_else(|| CidrError::UnsupportedInput(format!("number {n}"))),
            Value::Array(items) => {
                let bytes = items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .and_then(|v| u8::try_from(v).ok())
                            .ok_or_else(|| {
                                CidrError::UnsupportedInput(format!("array element {item}"))
                            })
                    })
                    .collect::<Result<Vec<u8>>>()?;
                Ok(CidrInput::Bytes(Cow::Owned(bytes)))
            }
            Value::Null => Err(CidrError::UnsupportedInput("null".to_string())),
            Value::Bool(b) => Err(CidrError::UnsupportedInput(format!("bool {b}"))),
            Value::Object(_) => Err(CidrError::UnsupportedInput("object".to_string())),
        }
    }
}
