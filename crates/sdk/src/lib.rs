//! PAPS SDK - Rust Client Library
//!
//! Two clients:
//! - [`CourierClient`] drives the courier delivery flow over the marketplace REST API,
//!   buffering `accept` and `status` actions in an [`OfflineQueue`] while the device is offline.
//! - [`AdminClient`] calls the back-office JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use paps_courier_sdk::{CourierClient, Delivery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CourierClient::new("http://127.0.0.1:3000/marketplace", "delivery_1", "/tmp/paps").await?;
//!
//!     for order in client.orders().await? {
//!         if order.status == "assigned" {
//!             match client.accept(&order.id).await? {
//!                 Delivery::Sent(order) => println!("accepted {}", order.id),
//!                 Delivery::Queued => println!("offline, will retry"),
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod admin;
mod client;
mod error;
mod queue;
mod sync;
mod types;

pub use admin::AdminClient;
pub use client::{CourierClient, Delivery};
pub use error::{Result, SdkError};
pub use queue::{FlushReport, OfflineQueue, QueuedAction};
pub use sync::{AssignmentTracker, SyncEvent, SyncLoop};
pub use types::{
    CourierOrder, MerchantRecord, MerchantStatusResponse, MerchantSummary, OrderLine,
    PlatformStats, SweepResponse,
};
