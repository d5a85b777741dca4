use std::net::{IpAddr, Ipv4Addr};

use anyhow::Result;

/// Resolves a hostname or IPv4 literal to an address. Only A records are
/// considered; a v6-only host fails to resolve here.
pub async fn resolve_host_ipv4(host: &str) -> Result<Ipv4Addr> {
    // First try to parse as an IP literal
    if let Ok(ip) = host.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => Ok(v4),
            IpAddr::V6(_) => Err(anyhow::anyhow!("IPv6 address not supported: {}", host)),
        };
    }

    // If parsing fails, resolve via DNS
    let addr = format!("{}:0", host);
    let addrs = tokio::net::lookup_host(&addr).await?;
    addrs
        .filter_map(|a| match a.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve hostname to IPv4: {}", host))
}
