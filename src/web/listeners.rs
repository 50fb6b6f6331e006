use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{info, warn};

// Host value meaning "every interface"
pub const WILDCARD_HOST: &str = "*";

pub async fn create_listener(host: &str, port: u16) -> std::io::Result<(String, TcpListener)> {
    if host == WILDCARD_HOST {
        return create_wildcard_listener(port);
    }

    let addr = format!("{}:{}", host, port);
    info!("Attempting to bind server to {}...", addr);

    let listener = TcpListener::bind(&addr).await?;

    Ok((addr, listener))
}

fn bind_socket(domain: Domain, addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if domain == Domain::IPV6 {
        // Dual-stack so IPv4 clients reach the same socket; not every system allows it
        if let Err(e) = socket.set_only_v6(false) {
            warn!(
                "Failed to set dual-stack mode for IPv6 socket: {}. Continuing anyway.",
                e
            );
        }
    }

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    // tokio requires a non-blocking socket
    socket.set_nonblocking(true)?;

    TcpListener::from_std(socket.into())
}

fn create_wildcard_listener(port: u16) -> std::io::Result<(String, TcpListener)> {
    let ipv6_addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));
    info!(
        "Attempting to bind server to {}... (IPv6 + IPv4 dual-stack)",
        ipv6_addr
    );

    match bind_socket(Domain::IPV6, ipv6_addr) {
        Ok(listener) => return Ok((ipv6_addr.to_string(), listener)),
        Err(e) => warn!("Failed to bind IPv6 listener: {}. Attempting IPv4 only.", e),
    }

    let ipv4_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    info!("Attempting to bind server to {}... (IPv4)", ipv4_addr);

    let listener = bind_socket(Domain::IPV4, ipv4_addr)?;
    Ok((ipv4_addr.to_string(), listener))
}
