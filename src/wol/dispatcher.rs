//! Wake dispatch and transport failure classification.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

use crate::wol::packet::{MacAddress, MagicPacket};
use crate::wol::transport::PacketTransport;

const EPERM: i32 = 1;
const EACCES: i32 = 13;
const ENETUNREACH: i32 = 101;

/// Coarse classification of a failed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The process lacks the privilege to open or broadcast on the socket.
    PermissionDenied,
    /// No route to the broadcast segment.
    NetworkUnreachable,
    Other,
}

/// A send attempt that did not reach the wire.
#[derive(Debug, thiserror::Error)]
#[error("failed to send magic packet ({kind:?}): {source}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    #[source]
    pub source: io::Error,
}

impl From<io::Error> for TransportError {
    fn from(source: io::Error) -> Self {
        Self {
            kind: classify(&source),
            source,
        }
    }
}

/// Map an OS error onto a [`TransportErrorKind`].
pub fn classify(error: &io::Error) -> TransportErrorKind {
    match error.kind() {
        io::ErrorKind::PermissionDenied => return TransportErrorKind::PermissionDenied,
        io::ErrorKind::NetworkUnreachable => return TransportErrorKind::NetworkUnreachable,
        _ => {}
    }

    match error.raw_os_error() {
        Some(EPERM) | Some(EACCES) => return TransportErrorKind::PermissionDenied,
        Some(ENETUNREACH) => return TransportErrorKind::NetworkUnreachable,
        _ => {}
    }

    let message = error.to_string();
    if message.contains("Operation not permitted") {
        TransportErrorKind::PermissionDenied
    } else if message.contains("Network is unreachable") {
        TransportErrorKind::NetworkUnreachable
    } else {
        TransportErrorKind::Other
    }
}

/// Sends magic packets to one fixed broadcast target.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn PacketTransport>,
    target: SocketAddrV4,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn PacketTransport>, broadcast: Ipv4Addr, port: u16) -> Self {
        Self {
            transport,
            target: SocketAddrV4::new(broadcast, port),
        }
    }

    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }

    /// Emit exactly one magic packet for `mac`. Failures are reported, never retried.
    pub async fn send(&self, mac: &MacAddress) -> Result<(), TransportError> {
        let packet = MagicPacket::new(mac);
        self.transport
            .send(&packet, self.target)
            .await
            .map_err(TransportError::from)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
