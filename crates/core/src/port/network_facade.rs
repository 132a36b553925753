// Network Facade Port
// Interface enumeration plus per-interface route lookup

use crate::domain::{AddressFamily, HardwareAddr, InterfaceFlags, Link, Route};
use crate::error::Result;
use ipnetwork::IpNetwork;
use std::fmt;

/// Attributes of one interface captured at enumeration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSnapshot {
    pub name: String,
    pub index: u32,
    pub hardware_addr: Option<HardwareAddr>,
    pub flags: InterfaceFlags,
    pub addrs: Vec<IpNetwork>,
    /// Backed by a real device rather than a virtual one (bridge, veth, tun...)
    pub physical: bool,
}

impl InterfaceSnapshot {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
            hardware_addr: None,
            flags: InterfaceFlags::default(),
            addrs: Vec::new(),
            physical: false,
        }
    }
}

/// Network facade port
pub trait NetworkFacade: Send + Sync {
    /// Fresh snapshot of every interface visible to the process
    fn interfaces(&self) -> Result<Vec<NetworkInterface<'_>>>;

    /// Resolve the kernel link handle for `name`
    ///
    /// # Errors
    /// - HostError::NotFound if no such link exists (anymore)
    fn link_by_name(&self, name: &str) -> Result<Link>;

    /// Routes bound to `link`, filtered by `family`
    ///
    /// An empty list is a valid answer, not an error.
    fn route_list(&self, link: &Link, family: AddressFamily) -> Result<Vec<Route>>;
}

/// An enumerated interface holding a borrowed handle to the facade that
/// produced it, so routes can be looked up on demand
///
/// The borrow ties the interface to the layer: it cannot outlive it.
/// Routes are never cached; each call re-resolves the link by name.
pub struct NetworkInterface<'a> {
    snapshot: InterfaceSnapshot,
    facade: &'a dyn NetworkFacade,
}

impl<'a> NetworkInterface<'a> {
    pub fn new(snapshot: InterfaceSnapshot, facade: &'a dyn NetworkFacade) -> Self {
        Self { snapshot, facade }
    }

    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    pub fn index(&self) -> u32 {
        self.snapshot.index
    }

    pub fn hardware_addr(&self) -> Option<HardwareAddr> {
        self.snapshot.hardware_addr
    }

    pub fn flags(&self) -> InterfaceFlags {
        self.snapshot.flags
    }

    pub fn addrs(&self) -> &[IpNetwork] {
        &self.snapshot.addrs
    }

    pub fn is_physical(&self) -> bool {
        self.snapshot.physical
    }

    pub fn snapshot(&self) -> &InterfaceSnapshot {
        &self.snapshot
    }

    /// # Errors
    /// - HostError::NotFound if the interface vanished since enumeration
    pub fn routes(&self, family: AddressFamily) -> Result<Vec<Route>> {
        let link = self.facade.link_by_name(&self.snapshot.name)?;
        self.facade.route_list(&link, family)
    }
}

impl fmt::Debug for NetworkInterface<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkInterface")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::HostError;
    use std::sync::{Arc, Mutex};

    /// In-memory network: a mutable interface list and a flat route table
    #[derive(Default, Clone)]
    pub struct FakeNetwork {
        interfaces: Arc<Mutex<Vec<InterfaceSnapshot>>>,
        routes: Arc<Mutex<Vec<Route>>>,
    }

    impl FakeNetwork {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_interface(self, snapshot: InterfaceSnapshot) -> Self {
            self.interfaces.lock().unwrap().push(snapshot);
            self
        }

        pub fn with_route(self, route: Route) -> Self {
            self.routes.lock().unwrap().push(route);
            self
        }

        /// Simulate an interface disappearing (e.g. a veth torn down)
        pub fn remove_interface(&self, name: &str) {
            self.interfaces.lock().unwrap().retain(|i| i.name != name);
        }
    }

    impl NetworkFacade for FakeNetwork {
        fn interfaces(&self) -> Result<Vec<NetworkInterface<'_>>> {
            let snapshots = self.interfaces.lock().unwrap().clone();
            Ok(snapshots
                .into_iter()
                .map(|s| NetworkInterface::new(s, self))
                .collect())
        }

        fn link_by_name(&self, name: &str) -> Result<Link> {
            self.interfaces
                .lock()
                .unwrap()
                .iter()
                .find(|i| i.name == name)
                .map(|i| Link {
                    name: i.name.clone(),
                    index: i.index,
                })
                .ok_or_else(|| HostError::NotFound(format!("link {}", name)))
        }

        fn route_list(&self, link: &Link, family: AddressFamily) -> Result<Vec<Route>> {
            Ok(self
                .routes
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.link_index == link.index && family.matches(r.family))
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::FakeNetwork;
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn default_route(index: u32) -> Route {
        Route {
            link_index: index,
            family: AddressFamily::V4,
            destination: None,
            gateway: Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
            metric: 100,
            flags: 0x3,
        }
    }

    #[test]
    fn test_routes_reissue_through_facade() {
        let network = FakeNetwork::new()
            .with_interface(InterfaceSnapshot::new("eth0", 2))
            .with_interface(InterfaceSnapshot::new("eth1", 3))
            .with_route(default_route(2));

        let interfaces = network.interfaces().unwrap();
        assert_eq!(interfaces.len(), 2);

        let eth0 = &interfaces[0];
        assert_eq!(eth0.routes(AddressFamily::V4).unwrap().len(), 1);
        assert!(eth0.routes(AddressFamily::V6).unwrap().is_empty());
        assert!(interfaces[1].routes(AddressFamily::All).unwrap().is_empty());
    }

    #[test]
    fn test_vanished_interface_fails_only_its_own_lookup() {
        let network = FakeNetwork::new()
            .with_interface(InterfaceSnapshot::new("veth0", 7))
            .with_interface(InterfaceSnapshot::new("eth0", 2))
            .with_route(default_route(2));

        let interfaces = network.interfaces().unwrap();
        network.remove_interface("veth0");

        let err = interfaces[0].routes(AddressFamily::All).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(interfaces[1].routes(AddressFamily::All).unwrap().len(), 1);
        assert_eq!(interfaces[0].name(), "veth0");
    }
}
