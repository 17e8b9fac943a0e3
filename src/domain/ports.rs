use super::transaction::TransactionRecord;
use async_trait::async_trait;
use std::io;

#[async_trait]
pub trait TransactionLedger: Send + Sync {
    async fn append(&self, record: TransactionRecord) -> io::Result<()>;
    async fn records(&self) -> io::Result<Vec<TransactionRecord>>;
}

pub type TransactionLedgerBox = Box<dyn TransactionLedger>;
