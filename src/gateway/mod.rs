//! Client side of the ledger gateway protocol: identity, proposal signing and
//! the gRPC calls that evaluate and submit transactions.

pub mod client;
pub mod connection;
pub mod contract;
pub mod error;
pub mod identity;
pub mod proposal;
pub mod proto;

pub use connection::{create_channel, Gateway, Timeouts};
pub use contract::LedgerContract;
pub use error::GatewayError;
