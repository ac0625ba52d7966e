//! Single history writer
//!
//! All durable mutations go through one task, so appends and clears reach
//! the store in the order they were issued and never interleave.

use jackpot_api::HistoryEntry;
use jackpot_store::{PromptStore, StoreError, StoreResult};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A durable mutation
#[derive(Debug, Clone)]
pub enum WriteOp {
    Append(HistoryEntry),
    Clear,
}

struct WriteRequest {
    op: WriteOp,
    reply: oneshot::Sender<StoreResult<()>>,
}

/// Handle for submitting writes. Cheap to clone.
#[derive(Clone)]
pub struct HistoryWriter {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl HistoryWriter {
    pub fn append(&self, entry: HistoryEntry) -> WriteTicket {
        self.submit(WriteOp::Append(entry))
    }

    pub fn clear(&self) -> WriteTicket {
        self.submit(WriteOp::Clear)
    }

    fn submit(&self, op: WriteOp) -> WriteTicket {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(WriteRequest { op, reply }).is_err() {
            warn!("History writer has stopped; write dropped");
        }
        WriteTicket { rx }
    }
}

/// Completion of one submitted write
#[derive(Debug)]
pub struct WriteTicket {
    rx: oneshot::Receiver<StoreResult<()>>,
}

impl WriteTicket {
    /// Wait for the store to acknowledge the write
    pub async fn wait(self) -> StoreResult<()> {
        self.rx
            .await
            .unwrap_or_else(|_| Err(StoreError::Write("history writer stopped".into())))
    }
}

/// Start the writer task on the current tokio runtime.
///
/// The task exits once every `HistoryWriter` clone has been dropped and the
/// queue has drained.
pub fn spawn_writer(store: Arc<dyn PromptStore>) -> (HistoryWriter, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<WriteRequest>();

    let handle = tokio::spawn(async move {
        while let Some(WriteRequest { op, reply }) = rx.recv().await {
            let store = Arc::clone(&store);
            let label = match &op {
                WriteOp::Append(_) => "append",
                WriteOp::Clear => "clear",
            };

            let result = tokio::task::spawn_blocking(move || match op {
                WriteOp::Append(entry) => store.append(&entry),
                WriteOp::Clear => store.clear(),
            })
            .await
            .unwrap_or_else(|e| Err(StoreError::Write(format!("writer task failed: {}", e))));

            match &result {
                Ok(()) => debug!(op = label, "History write committed"),
                Err(e) => warn!(op = label, error = %e, "History write failed"),
            }

            // The submitter may not be waiting
            let _ = reply.send(result);
        }
        info!("History writer stopped");
    });

    (HistoryWriter { tx }, handle)
}
