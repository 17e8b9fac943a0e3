use crate::domain::ports::TransactionLedger;
use crate::domain::transaction::TransactionRecord;
use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory transaction ledger.
///
/// Uses `Arc<RwLock<Vec<TransactionRecord>>>` to allow shared concurrent
/// access. Records keep insertion order, which the engine guarantees matches
/// commit order.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    records: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionLedger for InMemoryLedger {
    async fn append(&self, record: TransactionRecord) -> io::Result<()> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn records(&self) -> io::Result<Vec<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records.clone())
    }
}
