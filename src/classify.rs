//! Special-purpose range classification.
//!
//! Static tables of IANA/IETF registered ranges (RFC 1918, 4193, 5771,
//! 6598, 6890 and friends) and the memoized `is_*` predicates on
//! [`Cidr`] built on top of containment.
//!
//! Tables are built on first use and never mutated afterwards.

use crate::models::Cidr;
use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

lazy_static! {
    pub static ref LINK_LOCAL: Vec<Cidr> = table("link-local", &["169.254.0.0/16", "fe80::/10"]);
    pub static ref LOOPBACK: Vec<Cidr> = table("loopback", &["127.0.0.0/8", "::1/128"]);
    pub static ref CARRIER: Vec<Cidr> =
        table("carrier", &["192.0.0.0/29", "100.64.0.0/10", "2002::/16"]);
    pub static ref DOCUMENTATION: Vec<Cidr> = table(
        "documentation",
        &[
            "192.0.2.0/24",
            "198.51.100.0/24",
            "203.0.113.0/24",
            "2001:db8::/32",
            // MCAST-TEST-NET, also listed under multicast
            "233.252.0.0/24",
        ]
    );
    pub static ref PRIVATE: Vec<Cidr> = {
        let mut private = table(
            "private",
            &[
                "10.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                "198.18.0.0/15",
                "2001::/32",
                "fc00::/7",
                "64:ff9b:1::/48",
                "2001:2::/48",
                "100::/64",
            ],
        );
        private.extend(CARRIER.iter().cloned());
        private.extend(LINK_LOCAL.iter().cloned());
        private.extend(LOOPBACK.iter().cloned());
        private.extend(DOCUMENTATION.iter().cloned());
        private
    };
    pub static ref RESERVED: Vec<Cidr> = {
        let mut reserved = table("reserved", &["240.0.0.0/4", "::ffff:0:0/96"]);
        reserved.extend(LOOPBACK.iter().cloned());
        reserved
    };
    pub static ref MULTICAST: Vec<Cidr> =
        table("multicast", &["224.0.0.0/4", "233.252.0.0/24", "ff00::/8"]);
    pub static ref OTHER: Vec<Cidr> =
        table("other", &["192.0.0.0/24", "2001::/23", "2001:10::/28"]);
}

fn table(name: &str, entries: &[&str]) -> Vec<Cidr> {
    log::debug!("Building {name} range table ({} entries)", entries.len());
    entries
        .iter()
        .map(|s| Cidr::new(*s).unwrap_or_else(|e| panic!("Invalid built-in range {s}: {e}")))
        .collect()
}

/// Named special-purpose range tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Range {
    LinkLocal,
    Loopback,
    Carrier,
    Documentation,
    Private,
    Reserved,
    Multicast,
    Other,
}

impl Range {
    pub const ALL: [Range; 8] = [
        Range::LinkLocal,
        Range::Loopback,
        Range::Carrier,
        Range::Documentation,
        Range::Private,
        Range::Reserved,
        Range::Multicast,
        Range::Other,
    ];

    /// Entries of the table, both families mixed.
    pub fn table(self) -> &'static [Cidr] {
        match self {
            Range::LinkLocal => &LINK_LOCAL,
            Range::Loopback => &LOOPBACK,
            Range::Carrier => &CARRIER,
            Range::Documentation => &DOCUMENTATION,
            Range::Private => &PRIVATE,
            Range::Reserved => &RESERVED,
            Range::Multicast => &MULTICAST,
            Range::Other => &OTHER,
        }
    }

    /// True when `cidr` lies inside an entry of this table.
    pub fn matches(self, cidr: &Cidr) -> bool {
        in_table(self.table(), cidr)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Range::LinkLocal => "link-local",
            Range::Loopback => "loopback",
            Range::Carrier => "carrier",
            Range::Documentation => "documentation",
            Range::Private => "private",
            Range::Reserved => "reserved",
            Range::Multicast => "multicast",
            Range::Other => "other",
        };
        f.write_str(name)
    }
}

// Entries of the other family are skipped, so containment cannot fail.
fn in_table(table: &[Cidr], cidr: &Cidr) -> bool {
    table
        .iter()
        .filter(|net| net.family() == cidr.family())
        .any(|net| matches!(net.contains(cidr), Ok(true)))
}

/// Per-value memo of the classification flags.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlagCache {
    global: OnceLock<bool>,
    private: OnceLock<bool>,
    reserved: OnceLock<bool>,
    link_local: OnceLock<bool>,
    loopback: OnceLock<bool>,
    multicast: OnceLock<bool>,
}

/// Snapshot of every classification flag of a value.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_global: bool,
    pub is_private: bool,
    pub is_reserved: bool,
    pub is_link_local: bool,
    pub is_loopback: bool,
    pub is_multicast: bool,
}

impl Cidr {
    /// Not inside any reserved, private or other special-purpose range.
    ///
    /// # Examples
    /// ```
    /// use cidr_man::Cidr;
    /// assert!(Cidr::new("8.8.8.8").unwrap().is_global());
    /// assert!(!Cidr::new("10.1.0.0/16").unwrap().is_global());
    /// ```
    pub fn is_global(&self) -> bool {
        *self.flags.global.get_or_init(|| {
            !(in_table(&RESERVED, self) || in_table(&PRIVATE, self) || in_table(&OTHER, self))
        })
    }

    pub fn is_private(&self) -> bool {
        *self.flags.private.get_or_init(|| in_table(&PRIVATE, self))
    }

    pub fn is_reserved(&self) -> bool {
        *self.flags.reserved.get_or_init(|| in_table(&RESERVED, self))
    }

    pub fn is_link_local(&self) -> bool {
        *self.flags.link_local.get_or_init(|| in_table(&LINK_LOCAL, self))
    }

    pub fn is_loopback(&self) -> bool {
        *self.flags.loopback.get_or_init(|| in_table(&LOOPBACK, self))
    }

    pub fn is_multicast(&self) -> bool {
        *self.flags.multicast.get_or_init(|| in_table(&MULTICAST, self))
    }

    /// All flags at once.
    pub fn classify(&self) -> Classification {
        Classification {
            is_global: self.is_global(),
            is_private: self.is_private(),
            is_reserved: self.is_reserved(),
            is_link_local: self.is_link_local(),
            is_loopback: self.is_loopback(),
            is_multicast: self.is_multicast(),
        }
    }
}
