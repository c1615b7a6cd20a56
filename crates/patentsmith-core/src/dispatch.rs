//! Bounded concurrent dispatch of independent units of work.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Runs `worker` over every item with at most `max_workers` units in flight
/// and returns one output per input, aligned by index.
///
/// A unit that returns `Err` or panics is replaced by `recover(index, message)`;
/// it never cancels or alters its siblings. `max_workers` of zero is treated
/// as one, and values above `items.len()` simply give every item its own slot.
///
/// Must be called from within a tokio runtime.
pub async fn dispatch_all<I, O, E, F, Fut, R>(
    items: Vec<I>,
    max_workers: usize,
    worker: F,
    recover: R,
) -> Vec<O>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    R: Fn(usize, String) -> O,
{
    let slots = max_workers.max(1);
    debug!(units = items.len(), max_workers = slots, "dispatching batch");

    let semaphore = Arc::new(Semaphore::new(slots));
    let worker = Arc::new(worker);

    let handles: Vec<_> = items
        .into_iter()
        .map(|item| {
            let semaphore = Arc::clone(&semaphore);
            let worker = Arc::clone(&worker);
            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| format!("worker pool closed: {e}"))?;
                worker(item).await.map_err(|e| e.to_string())
            })
        })
        .collect();

    // Handles are awaited in input order; completion order never leaks out.
    let mut outputs = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let output = match handle.await {
            Ok(Ok(output)) => output,
            Ok(Err(message)) => {
                warn!(index, error = %message, "unit of work failed");
                recover(index, message)
            }
            Err(join_error) => {
                let message = if join_error.is_panic() {
                    format!("worker panicked: {}", panic_message(join_error.into_panic()))
                } else {
                    format!("worker aborted: {join_error}")
                };
                warn!(index, error = %message, "unit of work did not complete");
                recover(index, message)
            }
        };
        outputs.push(output);
    }
    outputs
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
