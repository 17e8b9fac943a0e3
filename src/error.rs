use crate::domain::account::format_amount;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Operation failures. The first six variants abort a single banking
/// operation and are surfaced as journal messages; none of them is fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid amount!")]
    InvalidAmount,
    #[error("Insufficient balance!")]
    InsufficientFunds,
    #[error("Existing loan must be cleared first!")]
    LoanAlreadyActive,
    #[error("Loan amount exceeds eligibility (${})!", format_amount(*.limit))]
    ExceedsEligibility { limit: Decimal },
    #[error("Please pay exact EMI amount: ${}", format_amount(*.expected))]
    WrongEmiAmount { expected: Decimal },
    #[error("Please select a loan type!")]
    NoLoanTypeSelected,
    #[error("Operation queue is closed")]
    QueueClosed,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
