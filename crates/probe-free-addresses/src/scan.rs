// nmap grepable output parsing and subnet address enumeration

use ipnetwork::Ipv4Network;
use std::collections::HashSet;
use std::net::Ipv4Addr;

use crate::ProbeError;

/// Parse a CIDR string into its network (host bits cleared) and prefix length
pub fn parse_ipv4_network(network: &str) -> Result<(Ipv4Network, u8), ProbeError> {
    let parsed: Ipv4Network = network.parse().map_err(|e| ProbeError::InvalidNetwork {
        network: network.to_string(),
        reason: format!("{}", e),
    })?;
    let prefix = parsed.prefix();
    let normalized = Ipv4Network::new(parsed.network(), prefix).map_err(|e| {
        ProbeError::InvalidNetwork {
            network: network.to_string(),
            reason: format!("{}", e),
        }
    })?;
    Ok((normalized, prefix))
}

/// Addresses reported `Status: Up` in `-oG` output
pub fn hosts_up(output: &str) -> HashSet<Ipv4Addr> {
    output
        .lines()
        .filter(|line| line.starts_with("Host:") && line.contains("Status: Up"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|addr| addr.parse().ok())
        .collect()
}

/// Assignable host addresses of `net`
///
/// Network and broadcast addresses are excluded except for /31 and /32,
/// where every address is a host.
pub fn host_addresses(net: Ipv4Network) -> impl Iterator<Item = Ipv4Addr> {
    let first = u32::from(net.network());
    let last = u32::from(net.broadcast());
    let (start, end) = if net.prefix() >= 31 {
        (first, last)
    } else {
        (first + 1, last - 1)
    };
    (start..=end).map(Ipv4Addr::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_host_bits() {
        let (net, prefix) = parse_ipv4_network("192.168.1.77/24").unwrap();
        assert_eq!(net.to_string(), "192.168.1.0/24");
        assert_eq!(prefix, 24);
        assert!(parse_ipv4_network("not-a-cidr").is_err());
    }

    #[test]
    fn test_hosts_up_ignores_down_and_comments() {
        let output = "\
# Nmap 7.92 scan
Host: 10.0.0.1 ()\tStatus: Up
Host: 10.0.0.2 ()\tStatus: Down
# Nmap done
";
        let up = hosts_up(output);
        assert_eq!(up.len(), 1);
        assert!(up.contains(&Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_host_addresses_exclude_network_and_broadcast() {
        let (net, _) = parse_ipv4_network("10.0.0.0/30").unwrap();
        let hosts: Vec<Ipv4Addr> = host_addresses(net).collect();
        assert_eq!(hosts, vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]);

        let (net, _) = parse_ipv4_network("10.0.0.4/31").unwrap();
        assert_eq!(host_addresses(net).count(), 2);

        let (net, _) = parse_ipv4_network("10.0.0.9/32").unwrap();
        assert_eq!(host_addresses(net).collect::<Vec<_>>(), vec![Ipv4Addr::new(10, 0, 0, 9)]);
    }
}
