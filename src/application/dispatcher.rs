use crate::application::engine::AccountEngine;
use crate::domain::account::Amount;
use crate::domain::loan::LoanType;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

/// A banking operation request, amount already validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Deposit(Amount),
    Withdraw(Amount),
    RequestLoan(Amount, LoanType),
    PayEmi(Amount),
    ApplyInterest,
}

impl Operation {
    /// Simulated processing time, mirroring the per-operation figures of the
    /// desktop application this engine models.
    fn processing_delay(&self) -> Duration {
        match self {
            Operation::RequestLoan(..) => Duration::from_millis(1500),
            Operation::ApplyInterest => Duration::from_millis(800),
            _ => Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Worker pool size.
    pub workers: usize,
    /// Queue capacity; `submit` waits when the queue is full.
    pub queue_depth: usize,
    /// When set, each worker sleeps out the operation's processing time
    /// after the mutation commits, outside the account lock. The delay
    /// occupies that worker only; it never gates the lock or the queue.
    pub simulate_delay: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            queue_depth: 32,
            simulate_delay: false,
        }
    }
}

/// Bounded worker pool executing operations against one engine.
///
/// Workers pull from a shared queue; execution order is whatever order they
/// win the engine's lock. Mutual exclusion is the only guarantee, there is
/// no submission-order fairness.
pub struct Dispatcher {
    queue: mpsc::Sender<Operation>,
    workers: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Dispatcher {
    pub fn spawn(engine: Arc<AccountEngine>, config: DispatcherConfig) -> Self {
        let (queue, rx) = mpsc::channel(config.queue_depth);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let rx = Arc::new(Mutex::new(rx));
        let workers = (0..config.workers)
            .map(|id| {
                let engine = engine.clone();
                let rx = rx.clone();
                let config = config.clone();
                let mut shutdown_rx = shutdown_rx.clone();
                tokio::spawn(async move {
                    loop {
                        // Receiver lock is released before executing so other
                        // workers can pick up queued operations meanwhile.
                        let op = { rx.lock().await.recv().await };
                        let Some(op) = op else { break };
                        // Once dequeued, an operation runs to completion:
                        // shutdown only ever cuts the simulated delay short,
                        // never the mutation or its ledger/journal commit.
                        if let Err(err) = engine.execute(op).await {
                            // Operation errors are recovered here: state is
                            // untouched and the failure becomes a journal line.
                            engine.journal().record(&journal_message(&op, &err)).await;
                        }
                        if config.simulate_delay && !*shutdown_rx.borrow() {
                            tokio::select! {
                                _ = tokio::time::sleep(op.processing_delay()) => {}
                                _ = shutdown_rx.changed() => {}
                            }
                        }
                    }
                    tracing::debug!(worker = id, "dispatcher worker stopped");
                })
            })
            .collect();
        Self {
            queue,
            workers,
            shutdown_tx,
        }
    }

    /// Queues an operation. Waits only when the queue is at capacity.
    pub async fn submit(&self, op: Operation) -> Result<()> {
        self.queue.send(op).await.map_err(|_| Error::QueueClosed)
    }

    /// Closes the queue and waits for every queued operation to finish,
    /// simulated delays included.
    pub async fn drain(mut self) {
        drop(self.queue);
        for handle in self.workers.drain(..) {
            let _ = handle.await;
        }
    }

    /// Closes the queue and skips any remaining simulated delays.
    /// Window-close semantics: in-flight mutations still commit in full
    /// before the workers stop.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        drop(self.queue);
        for handle in self.workers.drain(..) {
            let _ = handle.await;
        }
    }
}

/// Journal phrasing for a failed operation. The EMI path has its own
/// insufficient-balance wording; everything else reads as the error itself.
fn journal_message(op: &Operation, err: &Error) -> String {
    match (op, err) {
        (Operation::PayEmi(_), Error::InsufficientFunds) => {
            "Insufficient balance to pay EMI!".to_string()
        }
        _ => err.to_string(),
    }
}
