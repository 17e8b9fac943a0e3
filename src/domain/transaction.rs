use crate::domain::loan::LoanType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Type tag for a committed mutation. Loan rows carry the product so the
/// ledger reads "Personal Loan Taken" / "EMI Payment (Home)".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    LoanTaken(LoanType),
    EmiPayment(LoanType),
    InterestCredited,
}

impl TransactionKind {
    /// Row label as it appears on the statement and transaction table.
    pub fn label(&self) -> String {
        match self {
            TransactionKind::Deposit => "Deposit".to_string(),
            TransactionKind::Withdrawal => "Withdrawal".to_string(),
            TransactionKind::LoanTaken(loan_type) => format!("{loan_type} Loan Taken"),
            TransactionKind::EmiPayment(loan_type) => format!("EMI Payment ({loan_type})"),
            TransactionKind::InterestCredited => "Interest Credited".to_string(),
        }
    }
}

/// One row of the append-only ledger: created on every successful mutation,
/// never updated or deleted, ordered by commit time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    /// The operation amount (for a loan, the requested principal, not the EMI).
    pub amount: Decimal,
    /// Savings balance after the mutation committed.
    pub balance: Decimal,
}

impl TransactionRecord {
    pub fn new(kind: TransactionKind, amount: Decimal, balance: Decimal) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            amount,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(TransactionKind::Deposit.label(), "Deposit");
        assert_eq!(
            TransactionKind::LoanTaken(LoanType::Personal).label(),
            "Personal Loan Taken"
        );
        assert_eq!(
            TransactionKind::EmiPayment(LoanType::Home).label(),
            "EMI Payment (Home)"
        );
        assert_eq!(TransactionKind::InterestCredited.label(), "Interest Credited");
    }
}
