//! JSON-RPC API Layer
//!
//! Back-office administration: platform statistics, merchant
//! activation and on-demand subscription expiry.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
