//! Local IPv4 address discovery

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Loopback alias Debian puts next to the hostname in /etc/hosts
const DEBIAN_HOSTNAME_ALIAS: Ipv4Addr = Ipv4Addr::new(127, 0, 1, 1);

/// Find the IPv4 address other hosts on the LAN can reach us at.
///
/// Tries the source address of the default route first; no packet is sent.
/// Falls back to resolving the hostname, and to `<hostname>.local` when that
/// only yields the Debian loopback alias.
pub fn detect_ipv4() -> Result<Ipv4Addr> {
    discover_ipv4(route_source_address, local_hostname, resolve_ipv4)
}

/// Fallback chain behind [`detect_ipv4`], with the system lookups injected
fn discover_ipv4<R, H, L>(route: R, hostname: H, mut resolve: L) -> Result<Ipv4Addr>
where
    R: FnOnce() -> io::Result<Ipv4Addr>,
    H: FnOnce() -> Result<String>,
    L: FnMut(&str) -> Result<Ipv4Addr>,
{
    match route() {
        Ok(ipv4) if !ipv4.is_loopback() && !ipv4.is_unspecified() => {
            debug!("Local IPv4 address {} from default route", ipv4);
            return Ok(ipv4);
        }
        Ok(ipv4) => debug!("Default route source {} is not usable", ipv4),
        Err(e) => warn!("socket error {}, will try to get ipv4 with gethostbyname", e),
    }

    let host = hostname()?;
    let ipv4 = resolve(&host)?;
    if ipv4 == DEBIAN_HOSTNAME_ALIAS {
        return resolve(&format!("{}.local", host));
    }
    Ok(ipv4)
}

fn route_source_address() -> io::Result<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(("8.8.8.8", 80))?;
    match socket.local_addr()?.ip() {
        IpAddr::V4(ipv4) => Ok(ipv4),
        IpAddr::V6(ipv6) => Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("unexpected IPv6 source address {}", ipv6),
        )),
    }
}

fn local_hostname() -> Result<String> {
    hostname::get()?
        .into_string()
        .map_err(|_| CliError::Ipv4Detection("hostname is not valid UTF-8".to_string()))
}

/// First IPv4 address a host name resolves to
fn resolve_ipv4(host: &str) -> Result<Ipv4Addr> {
    let addrs = (host, 0)
        .to_socket_addrs()
        .map_err(|e| CliError::Ipv4Detection(format!("{}: {}", host, e)))?;

    addrs
        .filter_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| CliError::Ipv4Detection(format!("{} has no IPv4 address", host)))
}
