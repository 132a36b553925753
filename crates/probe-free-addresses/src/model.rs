// Request/response wire format

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeNetworksAddressesRequest {
    /// IPv4 networks in CIDR notation
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeNetworkAddresses {
    pub network: String,
    pub free_addresses: Vec<String>,
}
