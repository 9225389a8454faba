//! # Trace Worker Pool
//!
//! A fixed number of workers pull [`WorkItem`]s from one shared queue and
//! trace them. The pool size is a hard ceiling on how many traces run at
//! once. Results come back over a channel in completion order, so callers
//! must not assume they line up with the submission order.

use std::sync::Arc;

use reconr_common::error::{ConfigError, TraceError};
use reconr_common::network::probe::{TraceResult, WorkItem};
use reconr_common::probing::Tracer;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

type SharedQueue = Arc<Mutex<UnboundedReceiver<WorkItem>>>;

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Queues every item and starts the workers.
    ///
    /// The returned receiver yields exactly one result per item and closes
    /// once the last worker exits.
    pub fn run(&self, items: Vec<WorkItem>, tracer: Arc<dyn Tracer>) -> UnboundedReceiver<TraceResult> {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel::<WorkItem>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<TraceResult>();

        for item in items {
            // Receiver is held locally, so the queue cannot be closed yet.
            let _ = queue_tx.send(item);
        }
        drop(queue_tx);

        let queue: SharedQueue = Arc::new(Mutex::new(queue_rx));
        for id in 0..self.size {
            tokio::spawn(worker(id, queue.clone(), tracer.clone(), result_tx.clone()));
        }

        result_rx
    }
}

async fn worker(id: usize, queue: SharedQueue, tracer: Arc<dyn Tracer>, results: UnboundedSender<TraceResult>) {
    loop {
        let next: Option<WorkItem> = queue.lock().await.recv().await;
        let Some(item) = next else {
            break;
        };

        debug!(worker = id, target_addr = %item, "tracing");
        let result: TraceResult = run_isolated(item, tracer.clone()).await;

        if results.send(result).is_err() {
            debug!(worker = id, "result receiver dropped, stopping");
            break;
        }
    }
    debug!(worker = id, "queue drained");
}

/// Runs one trace on its own task so a panicking tracer only costs its item.
async fn run_isolated(item: WorkItem, tracer: Arc<dyn Tracer>) -> TraceResult {
    let addr = item.address;
    match tokio::spawn(async move { tracer.trace(addr).await }).await {
        Ok(result) => result,
        Err(e) => TraceResult::failure(addr, String::new(), TraceError::Join(e.to_string())),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
