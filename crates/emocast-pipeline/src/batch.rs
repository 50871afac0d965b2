// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded concurrent fan-out for multi-message requests.
//!
//! Each item runs on its own spawned task, gated by a semaphore. Failed
//! items are logged and dropped from the outcome. Dropping the future
//! returned by [`BatchCoordinator::run`] does not cancel items already
//! spawned; they run to completion and persist their own records.

use std::future::Future;
use std::sync::Arc;

use emocast_core::EmocastError;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Successful results of a fan-out plus the number of items attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    /// Results of items that succeeded, in input order.
    pub succeeded: Vec<T>,
    pub attempted: usize,
}

impl<T> BatchOutcome<T> {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded.len()
    }
}

/// Runs one async task per item with at most `concurrency` in flight.
#[derive(Debug, Clone, Copy)]
pub struct BatchCoordinator {
    concurrency: usize,
}

impl BatchCoordinator {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `task(index, item)` for every item and collects the successes.
    pub async fn run<I, T, F, Fut>(&self, batch_id: &str, items: Vec<I>, task: F) -> BatchOutcome<T>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(usize, I) -> Fut,
        Fut: Future<Output = Result<T, EmocastError>> + Send + 'static,
    {
        let attempted = items.len();
        if attempted == 0 {
            return BatchOutcome {
                succeeded: Vec::new(),
                attempted,
            };
        }

        let permits = Arc::new(Semaphore::new(self.concurrency.min(attempted)));
        debug!(batch_id, attempted, concurrency = self.concurrency.min(attempted), "fanning out batch");

        let handles: Vec<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let permits = Arc::clone(&permits);
                let fut = task(index, item);
                tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| EmocastError::Internal(format!("batch semaphore closed: {e}")))?;
                    fut.await
                })
            })
            .collect();

        let mut succeeded = Vec::with_capacity(attempted);
        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(Ok(value)) => succeeded.push(value),
                Ok(Err(e)) => warn!(batch_id, index, error = %e, "batch item failed, dropping"),
                Err(e) => warn!(batch_id, index, error = %e, "batch item task aborted, dropping"),
            }
        }

        debug!(batch_id, attempted, succeeded = succeeded.len(), "batch fan-out finished");
        BatchOutcome {
            succeeded,
            attempted,
        }
    }
}
