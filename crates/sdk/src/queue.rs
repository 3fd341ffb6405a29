//! Offline action queue
//!
//! Courier mutations made without connectivity are appended here and replayed in order
//! once the device is back online. The queue lives in a JSON file so it survives restarts.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A courier mutation waiting to be sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueuedAction {
    Accept {
        #[serde(rename = "orderId")]
        order_id: String,
    },
    Status {
        #[serde(rename = "orderId")]
        order_id: String,
        status: String,
    },
}

impl QueuedAction {
    pub fn order_id(&self) -> &str {
        match self {
            QueuedAction::Accept { order_id } | QueuedAction::Status { order_id, .. } => order_id,
        }
    }
}

/// Outcome of replaying the queue
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlushReport {
    pub sent: usize,
    /// Actions the server refused, with its message. They are not retried.
    pub rejected: Vec<(QueuedAction, String)>,
    /// Actions still queued because the server could not be reached
    pub remaining: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.sent == 0 && self.rejected.is_empty()
    }
}

/// File-backed FIFO of [`QueuedAction`]s
#[derive(Debug)]
pub struct OfflineQueue {
    path: PathBuf,
    actions: Vec<QueuedAction>,
}

impl OfflineQueue {
    /// Open (or create) the queue stored at `path`
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let actions = match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, actions })
    }

    /// Queue for one courier inside `dir`
    pub async fn for_courier(dir: impl AsRef<Path>, courier_id: &str) -> Result<Self> {
        fs::create_dir_all(dir.as_ref()).await?;
        Self::open(dir.as_ref().join(format!("offline-actions-{}.json", courier_id))).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[QueuedAction] {
        &self.actions
    }

    pub fn front(&self) -> Option<&QueuedAction> {
        self.actions.first()
    }

    pub async fn push(&mut self, action: QueuedAction) -> Result<()> {
        self.actions.push(action);
        self.persist().await
    }

    pub async fn pop_front(&mut self) -> Result<Option<QueuedAction>> {
        if self.actions.is_empty() {
            return Ok(None);
        }
        let action = self.actions.remove(0);
        self.persist().await?;
        Ok(Some(action))
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.actions.clear();
        self.persist().await
    }

    // Write-then-rename so a crash never leaves a truncated file
    async fn persist(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&self.actions)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
