// Network domain types: links, interface attributes and kernel routes

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Address family filter for route queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    All,
    V4,
    V6,
}

impl AddressFamily {
    /// True when a route of family `other` passes this filter
    pub fn matches(self, other: AddressFamily) -> bool {
        self == AddressFamily::All || self == other
    }
}

/// 48-bit MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardwareAddr(pub [u8; 6]);

impl HardwareAddr {
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFlags {
    pub up: bool,
    pub broadcast: bool,
    pub loopback: bool,
    pub point_to_point: bool,
    pub multicast: bool,
}

/// Kernel link handle resolved by interface name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub index: u32,
}

/// One kernel route entry bound to a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub link_index: u32,
    pub family: AddressFamily,
    /// `None` for the default route
    pub destination: Option<IpNetwork>,
    /// `None` for on-link routes
    pub gateway: Option<IpAddr>,
    pub metric: u32,
    /// Raw `RTF_*` flags as reported by the kernel
    pub flags: u32,
}

impl Route {
    pub fn is_default(&self) -> bool {
        self.destination.is_none()
    }
}
