//! Local endpoint detection.
//!
//! Used to default the sweep base address to this machine's LAN address.

use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Determine the local IPv4 address used for outbound traffic.
///
/// Connects a UDP socket to a public address; no packet is sent, the OS
/// just picks the route and reveals the source address.
pub fn local_ipv4() -> io::Result<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    match socket.local_addr()?.ip() {
        IpAddr::V4(ip) => Ok(ip),
        IpAddr::V6(_) => Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no local IPv4 address",
        )),
    }
}
