//! Packet transmission primitive.
//!
//! # Responsibilities
//! - Emit one UDP datagram carrying a magic packet to a broadcast address
//! - Surface OS failures untouched so the dispatcher can classify them

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::wol::packet::MagicPacket;

/// Sends a magic packet somewhere. Implemented by [`UdpTransport`] in
/// production and by recording/failing doubles in tests.
#[async_trait]
pub trait PacketTransport: Send + Sync {
    async fn send(&self, packet: &MagicPacket, target: SocketAddrV4) -> io::Result<()>;
}

/// Broadcast UDP transport. A fresh ephemeral socket is used per packet.
#[derive(Debug, Clone, Default)]
pub struct UdpTransport;

#[async_trait]
impl PacketTransport for UdpTransport {
    async fn send(&self, packet: &MagicPacket, target: SocketAddrV4) -> io::Result<()> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_broadcast(true)?;

        let sent = socket.send_to(packet.as_bytes(), target).await?;
        if sent != packet.as_bytes().len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram write ({sent} of {} bytes)", packet.as_bytes().len()),
            ));
        }

        tracing::trace!(target_addr = %target, bytes = sent, "Magic packet datagram sent");
        Ok(())
    }
}
