//! IPv4/IPv6 CIDR value type.
//!
//! [`Cidr`] holds one address family, a raw integer address and a prefix
//! length, and offers subnet splitting, containment, canonical
//! formatting, reverse-DNS names and classification against the
//! special-purpose ranges registered by IANA.
//!
//! ```
//! use cidr_man::Cidr;
//! let net = Cidr::new("10.0.0.0/16").unwrap();
//! let (left, right) = net.subnets().unwrap();
//! assert_eq!(right.to_string(), "10.0.128.0/17");
//! assert!(net.contains(&left).unwrap());
//! assert!(net.is_private());
//! ```

pub mod classify;
pub mod convert;
pub mod error;
pub mod format;
pub mod models;

pub use classify::{Classification, Range};
pub use convert::{clear_parse_cache, parse_cache_len, CidrInput, PARSE_CACHE_LIMIT};
pub use error::{CidrError, Result};
pub use models::{Cidr, Family};
