//! Courier REST client

use crate::error::{Result, SdkError};
use crate::queue::{FlushReport, OfflineQueue, QueuedAction};
use crate::types::{CourierOrder, ErrorEnvelope, OrderEnvelope, OrdersEnvelope};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened to a courier mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// The server applied it and returned the updated order
    Sent(CourierOrder),
    /// Stored in the offline queue for a later [`CourierClient::flush`]
    Queued,
}

/// Client for one courier against the marketplace API
///
/// # Example
///
/// ```no_run
/// use paps_courier_sdk::CourierClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CourierClient::new("http://127.0.0.1:3000/marketplace", "delivery_1", "/tmp/paps").await?;
/// client.set_presence(true).await?;
/// let report = client.flush().await?;
/// println!("{} queued actions sent", report.sent);
/// # Ok(())
/// # }
/// ```
pub struct CourierClient {
    http: Client,
    base_url: String,
    courier_id: String,
    queue: Mutex<OfflineQueue>,
    online: AtomicBool,
}

impl CourierClient {
    /// Create a client whose offline queue is stored under `queue_dir`
    ///
    /// `base_url` is the marketplace root, e.g. `http://127.0.0.1:3000/marketplace`.
    pub async fn new(
        base_url: impl Into<String>,
        courier_id: impl Into<String>,
        queue_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let courier_id = courier_id.into();
        let queue = OfflineQueue::for_courier(queue_dir, &courier_id).await?;
        Self::with_queue(base_url, courier_id, queue)
    }

    pub fn with_queue(
        base_url: impl Into<String>,
        courier_id: impl Into<String>,
        queue: OfflineQueue,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SdkError::InvalidUrl(base_url));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            courier_id: courier_id.into(),
            queue: Mutex::new(queue),
            online: AtomicBool::new(true),
        })
    }

    pub fn courier_id(&self) -> &str {
        &self.courier_id
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Force connectivity state, e.g. from the platform's network callback
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }

    /// Number of actions waiting in the offline queue
    pub async fn pending(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Orders assigned to this courier
    pub async fn orders(&self) -> Result<Vec<CourierOrder>> {
        let url = self.url("orders");
        let response = self.track(self.http.get(url).send().await)?;
        let envelope: OrdersEnvelope = read(response).await?;
        Ok(envelope.orders)
    }

    /// Report online/offline presence to the merchant
    pub async fn set_presence(&self, online: bool) -> Result<()> {
        let status = if online { "online" } else { "offline" };
        let response = self.track(
            self.http
                .post(self.url("status"))
                .json(&json!({ "status": status }))
                .send()
                .await,
        )?;
        let _: serde_json::Value = read(response).await?;
        Ok(())
    }

    pub async fn accept(&self, order_id: &str) -> Result<Delivery> {
        self.dispatch(QueuedAction::Accept {
            order_id: order_id.to_string(),
        })
        .await
    }

    /// Move an order along the delivery flow (`en_route_pickup`, `picked_up`, ...)
    pub async fn update_status(&self, order_id: &str, status: &str) -> Result<Delivery> {
        self.dispatch(QueuedAction::Status {
            order_id: order_id.to_string(),
            status: status.to_string(),
        })
        .await
    }

    /// Proof needs the customer in front of the courier, so it is never queued
    pub async fn submit_proof(&self, order_id: &str, pin: &str, photo: &str) -> Result<CourierOrder> {
        let response = self.track(
            self.http
                .post(self.url(&format!("orders/{}/proof", order_id)))
                .json(&json!({ "pin": pin, "photo": photo }))
                .send()
                .await,
        )?;
        let envelope: OrderEnvelope = read(response).await?;
        Ok(envelope.order)
    }

    /// Replay queued actions in order
    ///
    /// Sent actions leave the queue. A 4xx answer other than 408 or 429 drops the
    /// action and reports it. Anything else stops the replay and leaves the rest queued.
    pub async fn flush(&self) -> Result<FlushReport> {
        let mut queue = self.queue.lock().await;
        let mut report = FlushReport::default();

        while let Some(action) = queue.front().cloned() {
            match self.send(&action).await {
                Ok(_) => {
                    queue.pop_front().await?;
                    report.sent += 1;
                }
                Err(e) if e.is_rejection() => {
                    warn!(order_id = %action.order_id(), error = %e, "Queued action rejected");
                    queue.pop_front().await?;
                    report.rejected.push((action, e.to_string()));
                }
                Err(e) => {
                    debug!(error = %e, "Flush interrupted");
                    break;
                }
            }
        }

        report.remaining = queue.len();
        if !report.is_empty() {
            info!(
                courier_id = %self.courier_id,
                sent = report.sent,
                rejected = report.rejected.len(),
                remaining = report.remaining,
                "Offline queue flushed"
            );
        }
        Ok(report)
    }

    async fn dispatch(&self, action: QueuedAction) -> Result<Delivery> {
        if self.is_online() && self.flush().await?.remaining == 0 {
            match self.send(&action).await {
                Ok(order) => return Ok(Delivery::Sent(order)),
                Err(e) if e.is_transport() => {
                    debug!(error = %e, "Server unreachable, queueing action");
                }
                Err(e) => return Err(e),
            }
        }

        self.queue.lock().await.push(action).await?;
        Ok(Delivery::Queued)
    }

    async fn send(&self, action: &QueuedAction) -> Result<CourierOrder> {
        let request = match action {
            QueuedAction::Accept { order_id } => {
                self.http.post(self.url(&format!("orders/{}/accept", order_id)))
            }
            QueuedAction::Status { order_id, status } => self
                .http
                .post(self.url(&format!("orders/{}/status", order_id)))
                .json(&json!({ "status": status })),
        };

        let response = self.track(request.send().await)?;
        let envelope: OrderEnvelope = read(response).await?;
        Ok(envelope.order)
    }

    // Connectivity follows whether the last request reached the server
    fn track(&self, result: reqwest::Result<Response>) -> Result<Response> {
        match result {
            Ok(response) => {
                self.set_online(true);
                Ok(response)
            }
            Err(e) => {
                let err = SdkError::from(e);
                if err.is_transport() {
                    self.set_online(false);
                }
                Err(err)
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/delivery/{}/{}", self.base_url, self.courier_id, path)
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
    Err(SdkError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on port 1
    const UNREACHABLE: &str = "http://127.0.0.1:1/marketplace";

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("paps-sdk-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_rejects_bad_url() {
        let dir = temp_dir("bad-url");
        let result = CourierClient::new("ftp://example.com", "delivery_1", &dir).await;
        assert!(matches!(result, Err(SdkError::InvalidUrl(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_url_layout() {
        let dir = temp_dir("url");
        let client = CourierClient::new("http://localhost:3000/marketplace/", "d1", &dir)
            .await
            .unwrap();
        assert_eq!(
            client.url("orders/o1/accept"),
            "http://localhost:3000/marketplace/delivery/d1/orders/o1/accept"
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_offline_actions_are_queued() {
        let dir = temp_dir("offline");
        let client = CourierClient::new(UNREACHABLE, "delivery_1", &dir)
            .await
            .unwrap();
        client.set_online(false);

        assert_eq!(client.accept("order_1").await.unwrap(), Delivery::Queued);
        assert_eq!(
            client.update_status("order_1", "en_route_pickup").await.unwrap(),
            Delivery::Queued
        );
        assert_eq!(client.pending().await, 2);

        // Persisted for the next session
        let reopened = OfflineQueue::for_courier(&dir, "delivery_1")
            .await
            .unwrap();
        assert_eq!(reopened.len(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_transport_failure_queues_and_goes_offline() {
        let dir = temp_dir("transport");
        let client = CourierClient::new(UNREACHABLE, "delivery_1", &dir)
            .await
            .unwrap();
        assert!(client.is_online());

        assert_eq!(client.accept("order_1").await.unwrap(), Delivery::Queued);
        assert!(!client.is_online());
        assert_eq!(client.pending().await, 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_flush_stops_on_transport_failure() {
        let dir = temp_dir("flush");
        let client = CourierClient::new(UNREACHABLE, "delivery_1", &dir)
            .await
            .unwrap();
        client.set_online(false);
        client.accept("order_1").await.unwrap();
        client.accept("order_2").await.unwrap();

        let report = client.flush().await.unwrap();
        assert_eq!(report.sent, 0);
        assert!(report.rejected.is_empty());
        assert_eq!(report.remaining, 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_orders_unreachable_is_transport_error() {
        let dir = temp_dir("orders");
        let client = CourierClient::new(UNREACHABLE, "delivery_1", &dir)
            .await
            .unwrap();
        let err = client.orders().await.unwrap_err();
        assert!(err.is_transport());
        std::fs::remove_dir_all(&dir).ok();
    }
}
