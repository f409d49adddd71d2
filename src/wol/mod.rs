//! Wake-on-LAN subsystem.
//!
//! # Data Flow
//! ```text
//! registered physical address
//!     → packet.rs (MacAddress → 102-byte MagicPacket)
//!     → dispatcher.rs (fixed broadcast target, outcome classification)
//!     → transport.rs (UDP broadcast datagram)
//! ```
//!
//! # Design Decisions
//! - The dispatcher is the only component with a network side effect
//! - One datagram per call, no retries
//! - Transport is a trait so the pipeline can be exercised without sockets

pub mod dispatcher;
pub mod packet;
pub mod transport;

pub use dispatcher::{Dispatcher, TransportError, TransportErrorKind};
pub use packet::{MacAddress, MagicPacket};
pub use transport::{PacketTransport, UdpTransport};
