// Background sync: replays the offline queue and watches for new assignments

use crate::client::CourierClient;
use crate::queue::FlushReport;
use crate::types::CourierOrder;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{debug, info};

/// Something the courier app should surface
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The offline queue was (partly) replayed
    Flushed(FlushReport),
    /// An order was assigned to this courier since the last poll
    NewAssignment(CourierOrder),
}

/// Remembers which orders were already reported
#[derive(Debug, Default)]
pub struct AssignmentTracker {
    seen: HashSet<String>,
}

impl AssignmentTracker {
    /// Orders in `assigned` status whose id was never seen before
    ///
    /// Every id in `orders` is remembered, whatever its status.
    pub fn observe(&mut self, orders: &[CourierOrder]) -> Vec<CourierOrder> {
        orders
            .iter()
            .filter(|order| self.seen.insert(order.id.clone()) && order.status == "assigned")
            .cloned()
            .collect()
    }
}

pub struct SyncLoop {
    client: Arc<CourierClient>,
    period: Duration,
    tracker: AssignmentTracker,
}

impl SyncLoop {
    pub fn new(client: Arc<CourierClient>, period: Duration) -> Self {
        Self {
            client,
            period: period.max(Duration::from_millis(100)),
            tracker: AssignmentTracker::default(),
        }
    }

    /// Run until `shutdown` flips to true or the receiver of `events` is dropped
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>, events: mpsc::Sender<SyncEvent>) {
        info!(
            courier_id = %self.client.courier_id(),
            period_ms = self.period.as_millis() as u64,
            "Courier sync started"
        );

        let mut tick = interval(self.period);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    for event in self.tick().await {
                        if events.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Courier sync stopping");
                        break;
                    }
                }
            }
        }
    }

    /// One sync pass
    pub async fn tick(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        match self.client.flush().await {
            Ok(report) if !report.is_empty() => events.push(SyncEvent::Flushed(report)),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Queue replay failed"),
        }

        match self.client.orders().await {
            Ok(orders) => events.extend(
                self.tracker
                    .observe(&orders)
                    .into_iter()
                    .map(SyncEvent::NewAssignment),
            ),
            Err(e) => debug!(error = %e, "Order poll failed"),
        }

        events
    }
}
