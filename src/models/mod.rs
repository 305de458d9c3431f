//! Value types of the crate:
//! - [`Family`] - IPv4/IPv6 address family and its widths
//! - [`Cidr`] - address with CIDR prefix length

mod cidr;
mod family;

// Re-export public types
pub use cidr::Cidr;
pub use family::{Family, MAX_LENGTH_V4, MAX_LENGTH_V6};
