//! Network transport to the remote shell.
//!
//! - **transport**: `Transport` trait and its WebSocket implementation

pub mod transport;

pub use transport::{Transport, WsTransport};
