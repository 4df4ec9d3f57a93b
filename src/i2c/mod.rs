//! I2C client (slave-side) protocol engine.
//!
//! | Module   | Contents                                          |
//! |----------|---------------------------------------------------|
//! | `common` | events, direction, ACK status, errors, state      |
//! | `traits` | hardware capability and handler traits            |
//! | `client` | the interrupt-driven engine                       |
//! | `sim`    | software peripheral for host tests and simulation |

pub mod client;
pub mod common;
pub mod sim;
pub mod traits;

pub use client::{DefaultHandler, I2cClient, default_handler};
pub use common::{
    AckStatus, ClientError, ClientStatus, ProtocolState, TransferDirection, TransferEvent,
};
pub use sim::SimClientHardware;
pub use traits::{ClientHandler, ClientHardware, ClientRegisters};
