//! The [`Cidr`] value type.
//!
//! One representation for IPv4 and IPv6: a family, a raw integer address
//! and a prefix length. The address is not masked to the network
//! boundary, so `10.0.0.5/24` is a host carrying its /24 context.
//! Derived values (packed bytes, canonical text, classification flags)
//! are computed on first use and cached for the lifetime of the value.

use super::Family;
use crate::classify::FlagCache;
use crate::convert::{self, CidrInput};
use crate::error::{CidrError, Result};
use crate::format;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::OnceLock;

/// IPv4 or IPv6 address with CIDR prefix length.
#[derive(Clone)]
pub struct Cidr {
    family: Family,
    address: u128,
    prefix_len: u8,
    packed: OnceLock<[u8; 16]>,
    text: OnceLock<String>,
    pub(crate) flags: FlagCache,
}

impl Cidr {
    /// Build a value from any supported input, keeping the family and
    /// prefix the input carries.
    ///
    /// # Examples
    /// ```
    /// use cidr_man::Cidr;
    /// let net = Cidr::new("10.0.0.0/8").unwrap();
    /// assert_eq!(net.prefix_len(), 8);
    /// assert_eq!(Cidr::new(0x0A00_0001u32).unwrap().to_string(), "10.0.0.1");
    /// ```
    pub fn new<'a>(input: impl Into<CidrInput<'a>>) -> Result<Cidr> {
        Cidr::with_options(input, None, None)
    }

    /// Build a value with explicit family and/or prefix length. Explicit
    /// values take precedence over what the input carries; raw integers
    /// fall back to IPv4 at the maximum prefix.
    pub fn with_options<'a>(
        input: impl Into<CidrInput<'a>>,
        family: Option<Family>,
        prefix_len: Option<u8>,
    ) -> Result<Cidr> {
        let normalized = convert::normalize(&input.into())?;
        let family = family.or(normalized.family).unwrap_or(Family::V4);
        let prefix_len = prefix_len
            .or(normalized.prefix_len)
            .unwrap_or_else(|| family.max_prefix());
        Cidr::from_parts(family, normalized.address, prefix_len)
    }

    /// Build a value from its raw parts, checking the width invariants.
    pub fn from_parts(family: Family, address: u128, prefix_len: u8) -> Result<Cidr> {
        if prefix_len > family.max_prefix() {
            return Err(CidrError::PrefixLength {
                prefix_len: u32::from(prefix_len),
                max: family.max_prefix(),
            });
        }
        if address > family.all_ones() {
            return Err(CidrError::AddressOutOfRange { address, family });
        }
        Ok(Cidr::raw(family, address, prefix_len))
    }

    fn raw(family: Family, address: u128, prefix_len: u8) -> Cidr {
        Cidr {
            family,
            address,
            prefix_len,
            packed: OnceLock::new(),
            text: OnceLock::new(),
            flags: FlagCache::default(),
        }
    }

    fn host(family: Family, address: u128) -> Cidr {
        Cidr::raw(family, address, family.max_prefix())
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// IP version number, 4 or 6.
    pub fn version(&self) -> u8 {
        self.family.version()
    }

    /// Raw address value.
    pub fn address(&self) -> u128 {
        self.address
    }

    pub fn ip(&self) -> IpAddr {
        format::to_ip_addr(self.family, self.address)
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn max_prefix_len(&self) -> u8 {
        self.family.max_prefix()
    }

    /// True when the prefix covers the whole address.
    pub fn is_host(&self) -> bool {
        self.prefix_len == self.family.max_prefix()
    }

    /// Number of addresses covered by the prefix. `None` for `::/0`,
    /// whose 2^128 addresses do not fit a `u128`.
    pub fn num_addresses(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.host_bits()))
    }

    fn host_bits(&self) -> u8 {
        self.family.max_prefix() - self.prefix_len
    }

    fn broadcast_bits(&self) -> u128 {
        self.address | self.family.host_mask(self.prefix_len)
    }

    /// The stored address as a single host value.
    pub fn network_address(&self) -> Cidr {
        if self.is_host() {
            return self.clone();
        }
        Cidr::host(self.family, self.address)
    }

    /// Highest address of the range as a single host value. A host is
    /// its own broadcast address.
    pub fn broadcast_address(&self) -> Cidr {
        if self.is_host() {
            return self.clone();
        }
        Cidr::host(self.family, self.broadcast_bits())
    }

    /// Top `prefix_len` bits set, as a host value.
    pub fn netmask(&self) -> Cidr {
        Cidr::host(self.family, self.family.prefix_mask(self.prefix_len))
    }

    /// Low `max_prefix - prefix_len` bits set, as a host value.
    pub fn hostmask(&self) -> Cidr {
        Cidr::host(self.family, self.family.host_mask(self.prefix_len))
    }

    /// Address following the network address. A host is its own first
    /// address; an address already at the broadcast stays there.
    pub fn first_address(&self) -> Cidr {
        if self.is_host() {
            return self.clone();
        }
        let first = if self.address == self.broadcast_bits() {
            self.address
        } else {
            self.address + 1
        };
        Cidr::host(self.family, first)
    }

    /// Address preceding the broadcast address. A host is its own last
    /// address.
    pub fn last_address(&self) -> Cidr {
        if self.is_host() {
            return self.clone();
        }
        Cidr::host(self.family, self.broadcast_bits() - 1)
    }

    fn split_bit(&self) -> Option<(u8, u128)> {
        if self.is_host() {
            return None;
        }
        let prefix_len = self.prefix_len + 1;
        Some((prefix_len, 1u128 << (self.family.max_prefix() - prefix_len)))
    }

    /// Lower half of the range, one bit longer prefix. `None` for a host.
    pub fn left(&self) -> Option<Cidr> {
        let (prefix_len, bit) = self.split_bit()?;
        Some(Cidr::raw(self.family, self.address & !bit, prefix_len))
    }

    /// Upper half of the range, one bit longer prefix. `None` for a host.
    pub fn right(&self) -> Option<Cidr> {
        let (prefix_len, bit) = self.split_bit()?;
        Some(Cidr::raw(self.family, self.address | bit, prefix_len))
    }

    /// Both halves, `(left, right)`.
    pub fn subnets(&self) -> Option<(Cidr, Cidr)> {
        Some((self.left()?, self.right()?))
    }

    /// True when every address of `other` lies inside `self`.
    ///
    /// # Errors
    /// [`CidrError::FamilyMismatch`] when comparing IPv4 with IPv6.
    ///
    /// # Examples
    /// ```
    /// use cidr_man::Cidr;
    /// let wide = Cidr::new("10.0.0.0/16").unwrap();
    /// let narrow = Cidr::new("10.0.0.0/24").unwrap();
    /// assert!(wide.contains(&narrow).unwrap());
    /// assert!(!narrow.contains(&wide).unwrap());
    /// ```
    pub fn contains(&self, other: &Cidr) -> Result<bool> {
        if self.family != other.family {
            return Err(CidrError::FamilyMismatch {
                left: self.family,
                right: other.family,
            });
        }
        if self.prefix_len > other.prefix_len {
            return Ok(false);
        }
        let mask = self.family.prefix_mask(self.prefix_len);
        Ok(self.address & mask == other.address & mask)
    }

    /// Equality against any supported input, normalized through the
    /// conversion layer first.
    ///
    /// # Errors
    /// Whatever building a [`Cidr`] from `other` raises.
    ///
    /// # Examples
    /// ```
    /// use cidr_man::{Cidr, CidrError};
    /// let net = Cidr::new("10.0.0.0/8").unwrap();
    /// assert!(net.eq_input("10.0.0.0/8").unwrap());
    /// assert!(!net.eq_input(0x0A00_0000u32).unwrap());
    /// assert!(matches!(
    ///     net.eq_input("10.0.0.0/99"),
    ///     Err(CidrError::PrefixLength { .. })
    /// ));
    /// ```
    pub fn eq_input<'a>(&self, other: impl Into<CidrInput<'a>>) -> Result<bool> {
        Ok(*self == Cidr::new(other)?)
    }

    /// True when `self` lies inside `other`.
    pub fn subnet_of(&self, other: &Cidr) -> Result<bool> {
        other.contains(self)
    }

    /// Strict-containment order. `Less` when `self` strictly contains
    /// `other`, `Greater` for the mirror case, `Equal` for equal values,
    /// `None` for unrelated ranges.
    ///
    /// # Errors
    /// [`CidrError::FamilyMismatch`] across families.
    pub fn partial_order(&self, other: &Cidr) -> Result<Option<Ordering>> {
        if self == other {
            return Ok(Some(Ordering::Equal));
        }
        let down = self.contains(other)?;
        let up = other.contains(self)?;
        Ok(match (down, up) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            _ => None,
        })
    }

    /// Canonical text, `/prefix` omitted for a single host.
    pub fn compressed(&self) -> &str {
        self.text
            .get_or_init(|| format::compressed(self.family, self.address, self.prefix_len))
    }

    /// Big-endian address bytes, 4 for IPv4 and 16 for IPv6.
    pub fn packed(&self) -> &[u8] {
        let bytes = self.packed.get_or_init(|| {
            let mut buf = [0u8; 16];
            match self.family {
                Family::V4 => buf[..4].copy_from_slice(&(self.address as u32).to_be_bytes()),
                Family::V6 => buf = self.address.to_be_bytes(),
            }
            buf
        });
        &bytes[..self.family.byte_len()]
    }

    /// Reverse-DNS name, truncated to the labels inside the prefix.
    ///
    /// # Examples
    /// ```
    /// use cidr_man::Cidr;
    /// let net = Cidr::new("192.168.1.0/24").unwrap();
    /// assert_eq!(net.reverse_pointer(), "1.168.192.in-addr.arpa");
    /// ```
    pub fn reverse_pointer(&self) -> String {
        format::reverse_pointer(self.family, self.address, self.prefix_len)
    }
}

impl Default for Cidr {
    /// `0.0.0.0/0`
    fn default() -> Self {
        Cidr::raw(Family::V4, 0, 0)
    }
}

impl PartialEq for Cidr {
    fn eq(&self, other: &Cidr) -> bool {
        self.family == other.family
            && self.prefix_len == other.prefix_len
            && self.address == other.address
    }
}

impl Eq for Cidr {}

impl Hash for Cidr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compressed().hash(state);
    }
}

impl PartialOrd for Cidr {
    fn partial_cmp(&self, other: &Cidr) -> Option<Ordering> {
        self.partial_order(other).ok().flatten()
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.compressed())
    }
}

impl fmt::Debug for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cidr({})", self.compressed())
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Cidr> {
        Cidr::new(s)
    }
}

impl TryFrom<&str> for Cidr {
    type Error = CidrError;

    fn try_from(s: &str) -> Result<Cidr> {
        Cidr::new(s)
    }
}

impl TryFrom<&[u8]> for Cidr {
    type Error = CidrError;

    fn try_from(bytes: &[u8]) -> Result<Cidr> {
        Cidr::new(bytes)
    }
}

/// IPv4 address value.
impl From<u32> for Cidr {
    fn from(value: u32) -> Self {
        Cidr::host(Family::V4, u128::from(value))
    }
}

/// IPv4 unless the value needs more than 32 bits, which is an error;
/// use [`Cidr::with_options`] for IPv6 integers.
impl TryFrom<u128> for Cidr {
    type Error = CidrError;

    fn try_from(value: u128) -> Result<Cidr> {
        Cidr::new(value)
    }
}

impl From<Ipv4Addr> for Cidr {
    fn from(addr: Ipv4Addr) -> Self {
        Cidr::host(Family::V4, u128::from(u32::from(addr)))
    }
}

impl From<Ipv6Addr> for Cidr {
    fn from(addr: Ipv6Addr) -> Self {
        Cidr::host(Family::V6, u128::from(addr))
    }
}

impl From<IpAddr> for Cidr {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => Cidr::from(a),
            IpAddr::V6(a) => Cidr::from(a),
        }
    }
}

impl From<Ipv4Net> for Cidr {
    fn from(net: Ipv4Net) -> Self {
        Cidr::raw(
            Family::V4,
            u128::from(u32::from(net.network())),
            net.prefix_len(),
        )
    }
}

impl From<Ipv6Net> for Cidr {
    fn from(net: Ipv6Net) -> Self {
        Cidr::raw(Family::V6, u128::from(net.network()), net.prefix_len())
    }
}

impl From<IpNet> for Cidr {
    fn from(net: IpNet) -> Self {
        match net {
            IpNet::V4(n) => Cidr::from(n),
            IpNet::V6(n) => Cidr::from(n),
        }
    }
}

impl From<&Cidr> for u128 {
    fn from(cidr: &Cidr) -> u128 {
        cidr.address
    }
}

impl From<&Cidr> for IpAddr {
    fn from(cidr: &Cidr) -> IpAddr {
        cidr.ip()
    }
}

impl From<&Cidr> for Vec<u8> {
    fn from(cidr: &Cidr) -> Vec<u8> {
        cidr.packed().to_vec()
    }
}

impl TryFrom<&Cidr> for IpNet {
    type Error = CidrError;

    fn try_from(cidr: &Cidr) -> Result<IpNet> {
        IpNet::new(cidr.ip(), cidr.prefix_len).map_err(|_| CidrError::PrefixLength {
            prefix_len: u32::from(cidr.prefix_len),
            max: cidr.max_prefix_len(),
        })
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.compressed())
    }
}

struct CidrVisitor;

impl<'de> Visitor<'de> for CidrVisitor {
    type Value = Cidr;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("CIDR text, an IPv4 integer or 4/16 address bytes")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Cidr, E> {
        Cidr::new(s).map_err(de::Error::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Cidr, E> {
        Cidr::new(u128::from(v)).map_err(de::Error::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Cidr, E> {
        Cidr::new(v).map_err(de::Error::custom)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Cidr, A::Error> {
        let mut bytes = Vec::with_capacity(16);
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        Cidr::new(bytes).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CidrVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(s: &str) -> Cidr {
        Cidr::new(s).unwrap()
    }

    #[test]
    fn test_cidr_init_empty() {
        let a = Cidr::default();
        assert_eq!(a.prefix_len(), 0);
        assert_eq!(a.version(), 4);
        assert_eq!(a.address(), 0);
        assert_eq!(a.compressed(), "0.0.0.0/0");
        assert_eq!(a.packed(), &[0u8, 0, 0, 0]);
        assert_eq!(a.network_address(), cidr("0.0.0.0"));
        assert_eq!(a.first_address(), cidr("0.0.0.1"));
        assert_eq!(a.broadcast_address(), cidr("255.255.255.255"));
        assert_eq!(a.last_address(), cidr("255.255.255.254"));
        assert_eq!(a.netmask(), cidr("0.0.0.0"));
        assert_eq!(a.hostmask(), cidr("255.255.255.255"));
    }

    #[test]
    fn test_cidr_init_1() {
        let a = cidr("0.0.0.0/1");
        assert_eq!(a.prefix_len(), 1);
        assert_eq!(a.network_address(), cidr("0.0.0.0"));
        assert_eq!(a.first_address(), cidr("0.0.0.1"));
        assert_eq!(a.broadcast_address(), cidr("127.255.255.255"));
        assert_eq!(a.last_address(), cidr("127.255.255.254"));
        assert_eq!(a.netmask(), cidr("128.0.0.0"));
    }

    #[test]
    fn test_cidr_init_2() {
        let a = cidr("128.0.0.0/1");
        assert_eq!(a.address(), 2147483648);
        assert_eq!(a.compressed(), "128.0.0.0/1");
        assert_eq!(a.packed(), &[0x80u8, 0, 0, 0]);
        assert_eq!(a.network_address(), cidr("128.0.0.0"));
        assert_eq!(a.first_address(), cidr("128.0.0.1"));
        assert_eq!(a.broadcast_address(), cidr("255.255.255.255"));
        assert_eq!(a.last_address(), cidr("255.255.255.254"));
        assert_eq!(a.netmask(), cidr("128.0.0.0"));
    }

    #[test]
    fn test_cidr_v6_init() {
        let a = cidr("::/0");
        assert_eq!(a.family(), Family::V6);
        assert_eq!(a.compressed(), "::/0");
        assert_eq!(a.packed(), &[0u8; 16]);
        assert_eq!(a.network_address(), cidr("::"));
        assert_eq!(a.first_address(), cidr("::1"));
        assert_eq!(
            a.broadcast_address(),
            cidr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff")
        );
        assert_eq!(
            a.last_address(),
            cidr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffe")
        );
        assert_eq!(a.netmask(), cidr("::"));
        assert_eq!(a.num_addresses(), None);
    }

    #[test]
    fn test_cidr_v6_init_2() {
        let a = cidr("8000::/1");
        assert_eq!(a.address(), 170141183460469231731687303715884105728);
        assert_eq!(a.compressed(), "8000::/1");
        assert_eq!(a.first_address(), cidr("8000::1"));
        assert_eq!(
            a.last_address(),
            cidr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffe")
        );
        assert_eq!(a.netmask(), cidr("8000::"));
        assert_eq!(a.num_addresses(), Some(1u128 << 127));
    }

    #[test]
    fn test_host_edges() {
        let a = cidr("192.168.1.1");
        assert!(a.is_host());
        assert_eq!(a.broadcast_address(), a);
        assert_eq!(a.first_address(), a);
        assert_eq!(a.last_address(), a);
        assert_eq!(a.network_address(), a);
        assert_eq!(a.left(), None);
        assert_eq!(a.right(), None);
        assert_eq!(a.subnets(), None);
        assert_eq!(a.num_addresses(), Some(1));
    }

    #[test]
    fn test_slash_31() {
        let a = cidr("10.0.0.0/31");
        assert_eq!(a.first_address(), cidr("10.0.0.1"));
        assert_eq!(a.last_address(), cidr("10.0.0.0"));
        assert_eq!(a.broadcast_address(), cidr("10.0.0.1"));
    }

    #[test]
    fn test_unaligned_address_keeps_host_bits() {
        let a = cidr("10.0.0.5/24");
        assert_eq!(a.compressed(), "10.0.0.5/24");
        assert_eq!(a.network_address(), cidr("10.0.0.5"));
        assert_eq!(a.broadcast_address(), cidr("10.0.0.255"));
        assert_eq!(a.first_address(), cidr("10.0.0.6"));
        assert!(a.first_address().address() > a.network_address().address());
        assert_eq!(a.last_address(), cidr("10.0.0.254"));
        assert!(cidr("10.0.0.0/24").contains(&a).unwrap());
        assert_ne!(a, cidr("10.0.0.0/24"));
    }

    #[test]
    fn test_first_address_stops_at_broadcast() {
        let a = cidr("10.0.0.255/24");
        assert_eq!(a.first_address(), cidr("10.0.0.255"));
        assert_eq!(a.first_address(), a.broadcast_address());

        let top = cidr("255.255.255.255/24");
        assert_eq!(top.first_address(), cidr("255.255.255.255"));
        let top = cidr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff/0");
        assert_eq!(top.first_address().address(), u128::MAX);
    }

    #[test]
    fn test_cidr_left_right() {
        let a = Cidr::default();
        let (left, right) = a.subnets().unwrap();
        assert_eq!(left.compressed(), "0.0.0.0/1");
        assert_eq!(right.compressed(), "128.0.0.0/1");
        assert_eq!(right.address(), 2147483648);
        assert_eq!(right.packed(), &[0x80u8, 0, 0, 0]);

        let v6 = cidr("::/0");
        assert_eq!(v6.left().unwrap().compressed(), "::/1");
        assert_eq!(v6.right().unwrap().compressed(), "8000::/1");
    }

    #[test]
    fn test_right_of_unaligned_stays_in_upper_half() {
        let a = cidr("128.0.0.0/0");
        assert_eq!(a.left().unwrap(), cidr("0.0.0.0/1"));
        assert_eq!(a.right().unwrap(), cidr("128.0.0.0/1"));
    }

    #[test]
    fn test_cidr_contains() {
        let a = Cidr::default();
        let left = a.left().unwrap();
        let right = a.right().unwrap();
        assert!(a.contains(&left).unwrap());
        assert!(a.contains(&right).unwrap());
        let deep_left = left.left().and_then(|c| c.left()).unwrap();
        let deep_right = right.right().and_then(|c| c.right()).unwrap();
        assert!(a.contains(&deep_left).unwrap());
        assert!(a.contains(&deep_right).unwrap());
        assert!(!left.contains(&deep_right).unwrap());
        assert!(a.contains(&cidr("128.0.0.0/24")).unwrap());
    }

    #[test]
    fn test_contains_family_mismatch() {
        let err = cidr("0.0.0.0/0").contains(&cidr("::/0")).unwrap_err();
        assert_eq!(
            err,
            CidrError::FamilyMismatch {
                left: Family::V4,
                right: Family::V6
            }
        );
        assert!(cidr("::/0").subnet_of(&cidr("0.0.0.0/0")).is_err());
    }

    #[test]
    fn test_ordering() {
        let wide = cidr("10.0.0.0/8");
        let narrow = cidr("10.0.10.0/24");
        let other = cidr("11.0.0.0/24");
        assert!(wide < narrow);
        assert!(narrow > wide);
        assert!(!(wide < wide.clone()));
        assert!(wide <= wide.clone());
        assert_eq!(narrow.partial_cmp(&other), None);
        assert!(!(narrow < other) && !(narrow > other));
        assert_eq!(wide.partial_cmp(&cidr("::/0")), None);
        assert!(wide.partial_order(&cidr("::/0")).is_err());
    }

    #[test]
    fn test_mutual_containment_without_equality() {
        let a = cidr("10.0.0.1/24");
        let b = cidr("10.0.0.2/24");
        assert!(a.contains(&b).unwrap() && b.contains(&a).unwrap());
        assert_ne!(a, b);
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn test_eq_input() {
        let a = cidr("10.0.0.0/8");
        assert!(a.eq_input("10.0.0.0/8").unwrap());
        assert!(a.eq_input(" 10.0.0.0/8 ").unwrap());
        assert!(!a.eq_input("10.0.0.0/9").unwrap());

        let host = cidr("10.0.0.1");
        assert!(host.eq_input(0x0A00_0001u32).unwrap());
        assert!(host.eq_input(&[10u8, 0, 0, 1]).unwrap());
        assert!(host.eq_input(Ipv4Addr::new(10, 0, 0, 1)).unwrap());
        let net: IpNet = "10.0.0.0/8".parse().unwrap();
        assert!(a.eq_input(net).unwrap());
        assert!(!a.eq_input(Ipv6Addr::UNSPECIFIED).unwrap());
    }

    #[test]
    fn test_eq_input_surfaces_errors() {
        let a = cidr("10.0.0.0/8");
        assert!(matches!(
            a.eq_input("10.0.0.0/99"),
            Err(CidrError::PrefixLength {
                prefix_len: 99,
                max: 32
            })
        ));
        assert!(matches!(
            a.eq_input("not an address"),
            Err(CidrError::AddressParse { .. })
        ));
        assert!(matches!(
            a.eq_input(1u128 << 40),
            Err(CidrError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn test_str_entry_points_agree() {
        let parsed: Cidr = "2001:db8::/32".parse().unwrap();
        assert_eq!(parsed, cidr("2001:db8::/32"));
        assert_eq!(Cidr::try_from("2001:db8::/32").unwrap(), parsed);
        assert!(matches!(
            "10.0.0.0/33".parse::<Cidr>(),
            Err(CidrError::PrefixLength { .. })
        ));
    }

    #[test]
    fn test_hash_follows_equality() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(cidr("2001:db8::/32"));
        set.insert(Cidr::with_options("2001:0db8:0000::", None, Some(32)).unwrap());
        set.insert(cidr("2001:db8::/33"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_with_options() {
        let a = Cidr::with_options(1u32, Some(Family::V6), None).unwrap();
        assert_eq!(a.compressed(), "::1");
        let a = Cidr::with_options("10.1.2.3", None, Some(16)).unwrap();
        assert_eq!(a.compressed(), "10.1.2.3/16");
        assert!(matches!(
            Cidr::with_options("10.0.0.0", None, Some(33)),
            Err(CidrError::PrefixLength { .. })
        ));
        assert!(matches!(
            Cidr::new(1u128 << 32),
            Err(CidrError::AddressOutOfRange { .. })
        ));
        assert!(Cidr::with_options(1u128 << 32, Some(Family::V6), None).is_ok());
    }

    #[test]
    fn test_foreign_conversions() {
        let net: IpNet = "10.1.2.3/16".parse().unwrap();
        let a = Cidr::from(net);
        assert_eq!(a, cidr("10.1.0.0/16"));
        assert_eq!(IpNet::try_from(&a).unwrap(), "10.1.0.0/16".parse::<IpNet>().unwrap());

        let v6: Ipv6Addr = "fe80::1".parse().unwrap();
        assert_eq!(Cidr::from(v6), cidr("fe80::1"));
        assert_eq!(IpAddr::from(&cidr("fe80::1")), IpAddr::V6(v6));
        assert_eq!(u128::from(&cidr("0.0.1.0")), 256);
        assert_eq!(Vec::<u8>::from(&cidr("1.2.3.4")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_debug_display() {
        let a = cidr("10.0.0.0/8");
        assert_eq!(format!("{a}"), "10.0.0.0/8");
        assert_eq!(format!("{a:?}"), "Cidr(10.0.0.0/8)");
    }
}
