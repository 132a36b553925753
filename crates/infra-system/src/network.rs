// Network facade - getifaddrs interface enumeration + kernel route tables
// reason: nix for getifaddrs and if_nametoindex, so enumeration failures surface as errors
use ipnetwork::IpNetwork;
use nix::ifaddrs::InterfaceAddress;
use nix::net::if_::InterfaceFlags as RawFlags;
use nix::sys::socket::SockaddrStorage;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use tracing::debug;

use hostcap_core::domain::{AddressFamily, HardwareAddr, InterfaceFlags, Link, Route};
use hostcap_core::error::{HostError, Result};
use hostcap_core::port::{InterfaceSnapshot, NetworkFacade, NetworkInterface};

const IPV4_ROUTES: &str = "net/route";
const IPV6_ROUTES: &str = "net/ipv6_route";

// RTF_* bits from <linux/ipv6_route.h>
const RTF_REJECT: u32 = 0x0000_0200;
const RTF_CACHE: u32 = 0x0100_0000;
const RTF_LOCAL: u32 = 0x8000_0000;

/// Network facade over the live kernel
///
/// `proc_root` and `sys_root` locate the route tables and the interface
/// class directory; both default to the live mounts.
#[derive(Debug, Clone)]
pub struct SystemNetwork {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl SystemNetwork {
    pub fn new() -> Self {
        Self::with_roots("/proc", "/sys")
    }

    pub fn with_roots(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    /// Physical unless the class entry resolves under `/devices/virtual/`
    fn is_physical(&self, name: &str, flags: &InterfaceFlags) -> bool {
        if flags.loopback {
            return false;
        }
        match fs::canonicalize(self.sys_root.join("class/net").join(name)) {
            Ok(resolved) => !resolved.to_string_lossy().contains("/virtual/"),
            Err(_) => false,
        }
    }

    fn read_table(&self, relative: &str) -> Result<String> {
        let path = self.proc_root.join(relative);
        fs::read_to_string(&path).map_err(|e| HostError::from_io(path.display(), e))
    }
}

impl Default for SystemNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkFacade for SystemNetwork {
    fn interfaces(&self) -> Result<Vec<NetworkInterface<'_>>> {
        let entries = nix::ifaddrs::getifaddrs().map_err(|e| HostError::Io(e.into()))?;

        let interfaces: Vec<NetworkInterface<'_>> = group(entries.map(|entry| row(&entry)))
            .into_iter()
            .map(|mut snapshot| {
                // Gone since getifaddrs: index 0, routes() then reports NotFound
                snapshot.index = nix::net::if_::if_nametoindex(snapshot.name.as_str()).unwrap_or(0);
                snapshot.physical = snapshot.hardware_addr.is_some()
                    && self.is_physical(&snapshot.name, &snapshot.flags);
                NetworkInterface::new(snapshot, self)
            })
            .collect();

        debug!(count = interfaces.len(), "Enumerated network interfaces");
        Ok(interfaces)
    }

    fn link_by_name(&self, name: &str) -> Result<Link> {
        if name.is_empty() || name.contains('\0') {
            return Err(HostError::InvalidInput(format!("link name {:?}", name)));
        }
        match nix::net::if_::if_nametoindex(name) {
            Ok(index) => Ok(Link {
                name: name.to_string(),
                index,
            }),
            Err(nix::errno::Errno::ENODEV) | Err(nix::errno::Errno::ENXIO) => {
                Err(HostError::NotFound(format!("link {}", name)))
            }
            Err(e) => Err(HostError::Io(e.into())),
        }
    }

    fn route_list(&self, link: &Link, family: AddressFamily) -> Result<Vec<Route>> {
        let mut routes = Vec::new();

        if family.matches(AddressFamily::V4) {
            match self.read_table(IPV4_ROUTES) {
                Ok(table) => routes.extend(parse_ipv4_routes(&table, link)?),
                Err(e) if e.is_not_found() && family == AddressFamily::All => {}
                Err(e) => return Err(e),
            }
        }
        if family.matches(AddressFamily::V6) {
            match self.read_table(IPV6_ROUTES) {
                Ok(table) => routes.extend(parse_ipv6_routes(&table, link)?),
                // IPv6 disabled in the kernel: no table, no routes
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        debug!(link = %link.name, family = ?family, count = routes.len(), "Listed routes");
        Ok(routes)
    }
}

/// One `getifaddrs` entry reduced to what a snapshot keeps
#[derive(Debug, Clone)]
pub(crate) struct AddressRow {
    pub(crate) name: String,
    pub(crate) flags: InterfaceFlags,
    pub(crate) hardware_addr: Option<HardwareAddr>,
    pub(crate) addr: Option<IpNetwork>,
}

fn flags_of(raw: RawFlags) -> InterfaceFlags {
    InterfaceFlags {
        up: raw.contains(RawFlags::IFF_UP),
        broadcast: raw.contains(RawFlags::IFF_BROADCAST),
        loopback: raw.contains(RawFlags::IFF_LOOPBACK),
        point_to_point: raw.contains(RawFlags::IFF_POINTOPOINT),
        multicast: raw.contains(RawFlags::IFF_MULTICAST),
    }
}

fn ip_of(storage: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(v4) = storage.as_sockaddr_in() {
        return Some(IpAddr::V4(v4.ip()));
    }
    storage.as_sockaddr_in6().map(|v6| IpAddr::V6(v6.ip()))
}

/// Leading one bits of a netmask
fn prefix_len(mask: IpAddr) -> u8 {
    match mask {
        IpAddr::V4(m) => u32::from(m).leading_ones() as u8,
        IpAddr::V6(m) => u128::from(m).leading_ones() as u8,
    }
}

pub(crate) fn row(entry: &InterfaceAddress) -> AddressRow {
    let hardware_addr = entry
        .address
        .as_ref()
        .and_then(|a| a.as_link_addr())
        .and_then(|link| link.addr())
        .map(HardwareAddr)
        .filter(|m| !m.is_zero());

    let addr = entry.address.as_ref().and_then(ip_of).and_then(|ip| {
        let full = if ip.is_ipv4() { 32 } else { 128 };
        let prefix = entry
            .netmask
            .as_ref()
            .and_then(ip_of)
            .map_or(full, prefix_len);
        IpNetwork::new(ip, prefix).ok()
    });

    AddressRow {
        name: entry.interface_name.clone(),
        flags: flags_of(entry.flags),
        hardware_addr,
        addr,
    }
}

/// Fold per-address rows into one snapshot per interface, in first-seen order
pub(crate) fn group(rows: impl IntoIterator<Item = AddressRow>) -> Vec<InterfaceSnapshot> {
    let mut snapshots: Vec<InterfaceSnapshot> = Vec::new();

    for row in rows {
        let pos = match snapshots.iter().position(|s| s.name == row.name) {
            Some(pos) => pos,
            None => {
                snapshots.push(InterfaceSnapshot::new(row.name.clone(), 0));
                snapshots.len() - 1
            }
        };
        let snapshot = &mut snapshots[pos];
        snapshot.flags = row.flags;
        if row.hardware_addr.is_some() {
            snapshot.hardware_addr = row.hardware_addr;
        }
        if let Some(addr) = row.addr {
            snapshot.addrs.push(addr);
        }
    }

    snapshots
}

fn parse_hex_u32(field: &str, what: &str) -> Result<u32> {
    u32::from_str_radix(field, 16)
        .map_err(|e| HostError::Parse(format!("{} {:?}: {}", what, field, e)))
}

fn parse_hex_u128(field: &str, what: &str) -> Result<u128> {
    u128::from_str_radix(field, 16)
        .map_err(|e| HostError::Parse(format!("{} {:?}: {}", what, field, e)))
}

/// Kernel prints the raw network-order word in host order
fn ipv4_from_word(word: u32) -> Ipv4Addr {
    Ipv4Addr::from(word.to_ne_bytes())
}

/// Parse `/proc/net/route`, keeping rows for `link`
///
/// The kernel only prints the main table here.
///
/// Columns: Iface Destination Gateway Flags RefCnt Use Metric Mask MTU Window IRTT
pub(crate) fn parse_ipv4_routes(table: &str, link: &Link) -> Result<Vec<Route>> {
    let mut routes = Vec::new();

    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 || fields[0] != link.name {
            continue;
        }

        let destination = ipv4_from_word(parse_hex_u32(fields[1], "destination")?);
        let gateway = ipv4_from_word(parse_hex_u32(fields[2], "gateway")?);
        let flags = parse_hex_u32(fields[3], "flags")?;
        let metric = fields[6]
            .parse::<u32>()
            .map_err(|e| HostError::Parse(format!("metric {:?}: {}", fields[6], e)))?;
        let prefix = ipv4_from_word(parse_hex_u32(fields[7], "mask")?);
        let prefix_len = u32::from(prefix).count_ones() as u8;

        let destination = if destination.is_unspecified() && prefix_len == 0 {
            None
        } else {
            Some(
                IpNetwork::new(IpAddr::V4(destination), prefix_len)
                    .map_err(|e| HostError::Parse(e.to_string()))?,
            )
        };

        routes.push(Route {
            link_index: link.index,
            family: AddressFamily::V4,
            destination,
            gateway: (!gateway.is_unspecified()).then_some(IpAddr::V4(gateway)),
            metric,
            flags,
        });
    }

    Ok(routes)
}

/// Parse `/proc/net/ipv6_route`, keeping main-table rows for `link`
///
/// Columns: dest dest_plen src src_plen next_hop metric refcnt use flags iface
///
/// The file dumps every table without a table column. Local-table and
/// cached entries carry `RTF_LOCAL`/`RTF_CACHE`, the null entry on `lo` is
/// `RTF_REJECT`, and `ff00::/8` lives in the local table; all are skipped.
pub(crate) fn parse_ipv6_routes(table: &str, link: &Link) -> Result<Vec<Route>> {
    let mut routes = Vec::new();

    for line in table.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 || fields[9] != link.name {
            continue;
        }

        let destination = Ipv6Addr::from(parse_hex_u128(fields[0], "destination")?);
        let prefix_len = parse_hex_u32(fields[1], "prefix length")? as u8;
        let gateway = Ipv6Addr::from(parse_hex_u128(fields[4], "next hop")?);
        let metric = parse_hex_u32(fields[5], "metric")?;
        let flags = parse_hex_u32(fields[8], "flags")?;

        if flags & (RTF_REJECT | RTF_CACHE | RTF_LOCAL) != 0 || destination.is_multicast() {
            continue;
        }

        let destination = if destination.is_unspecified() && prefix_len == 0 {
            None
        } else {
            Some(
                IpNetwork::new(IpAddr::V6(destination), prefix_len)
                    .map_err(|e| HostError::Parse(e.to_string()))?,
            )
        };

        routes.push(Route {
            link_index: link.index,
            family: AddressFamily::V6,
            destination,
            gateway: (!gateway.is_unspecified()).then_some(IpAddr::V6(gateway)),
            metric,
            flags,
        });
    }

    Ok(routes)
}
