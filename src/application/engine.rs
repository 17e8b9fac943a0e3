use crate::application::dispatcher::Operation;
use crate::domain::account::{Account, Amount, EmiOutcome, format_amount};
use crate::domain::loan::LoanType;
use crate::domain::ports::TransactionLedgerBox;
use crate::domain::transaction::{TransactionKind, TransactionRecord};
use crate::error::Result;
use crate::infrastructure::journal::Journal;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use tokio::sync::{Mutex, watch};

/// Consistent view of the account published after every committed mutation.
/// Receivers converge on the latest committed state; no torn reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub savings: Decimal,
    pub loan_amount: Decimal,
    pub loan_type: Option<LoanType>,
    pub emi: Decimal,
    pub tenure: u32,
    pub eligibility: Decimal,
}

impl Snapshot {
    fn of(account: &Account) -> Self {
        let loan = account.loan();
        Self {
            savings: account.savings(),
            loan_amount: loan.map(|l| l.principal).unwrap_or(Decimal::ZERO),
            loan_type: loan.map(|l| l.loan_type),
            emi: loan.map(|l| l.emi).unwrap_or(Decimal::ZERO),
            tenure: loan.map(|l| l.tenure).unwrap_or(0),
            eligibility: account.eligibility(),
        }
    }
}

/// The account transaction engine.
///
/// Owns the single account behind one exclusive lock, the append-only ledger,
/// the journal, and a snapshot channel. Every operation runs its whole
/// read-modify-write sequence under the lock, so concurrent callers are
/// strictly serialized; amounts are validated before the lock is taken.
pub struct AccountEngine {
    account: Mutex<Account>,
    ledger: TransactionLedgerBox,
    journal: Journal,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl AccountEngine {
    pub fn new(ledger: TransactionLedgerBox, journal: Journal) -> Self {
        let account = Account::open();
        let (snapshot_tx, _) = watch::channel(Snapshot::of(&account));
        Self {
            account: Mutex::new(account),
            ledger,
            journal,
            snapshot_tx,
        }
    }

    /// Subscribes to committed-state snapshots. The receiver always observes
    /// the latest state, though intermediate snapshots may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub async fn snapshot(&self) -> Snapshot {
        Snapshot::of(&*self.account.lock().await)
    }

    pub async fn history(&self) -> io::Result<Vec<TransactionRecord>> {
        self.ledger.records().await
    }

    pub async fn deposit(&self, amount: Amount) -> Result<()> {
        let mut account = self.account.lock().await;
        account.deposit(amount);
        let message = format!("Deposited ${} successfully", format_amount(amount.value()));
        self.commit(&account, TransactionKind::Deposit, amount.value(), message)
            .await
    }

    pub async fn withdraw(&self, amount: Amount) -> Result<()> {
        let mut account = self.account.lock().await;
        account.withdraw(amount)?;
        let message = format!("Withdrawn ${} successfully", format_amount(amount.value()));
        self.commit(&account, TransactionKind::Withdrawal, amount.value(), message)
            .await
    }

    pub async fn request_loan(&self, amount: Amount, loan_type: LoanType) -> Result<()> {
        let mut account = self.account.lock().await;
        let loan = account.take_loan(amount, loan_type)?;
        let message = format!(
            "{loan_type} Loan of ${} approved. EMI: ${}/month",
            format_amount(amount.value()),
            format_amount(loan.emi),
        );
        // The ledger records the requested principal, not the installment.
        self.commit(
            &account,
            TransactionKind::LoanTaken(loan_type),
            amount.value(),
            message,
        )
        .await
    }

    pub async fn pay_emi(&self, amount: Amount) -> Result<()> {
        let mut account = self.account.lock().await;
        let outcome = account.pay_emi(amount)?;
        // The outcome carries the loan type read before the fields were
        // cleared, so the repaid message keeps its product name.
        let (kind, message) = match outcome {
            EmiOutcome::Outstanding { loan_type, .. } => (
                TransactionKind::EmiPayment(loan_type),
                format!("EMI of ${} paid successfully", format_amount(amount.value())),
            ),
            EmiOutcome::LoanRepaid(loan_type) => (
                TransactionKind::EmiPayment(loan_type),
                format!("{loan_type} Loan fully repaid!"),
            ),
        };
        self.commit(&account, kind, amount.value(), message).await
    }

    pub async fn apply_interest(&self) -> Result<()> {
        let mut account = self.account.lock().await;
        let interest = account.credit_interest();
        let message = format!(
            "Interest of ${} credited successfully",
            format_amount(interest)
        );
        self.commit(
            &account,
            TransactionKind::InterestCredited,
            interest,
            message,
        )
        .await
    }

    pub async fn execute(&self, op: Operation) -> Result<()> {
        match op {
            Operation::Deposit(amount) => self.deposit(amount).await,
            Operation::Withdraw(amount) => self.withdraw(amount).await,
            Operation::RequestLoan(amount, loan_type) => {
                self.request_loan(amount, loan_type).await
            }
            Operation::PayEmi(amount) => self.pay_emi(amount).await,
            Operation::ApplyInterest => self.apply_interest().await,
        }
    }

    /// Finishes a committed mutation: ledger append, snapshot publish,
    /// journal line. Runs while the caller still holds the account lock so
    /// ledger order matches commit order.
    async fn commit(
        &self,
        account: &Account,
        kind: TransactionKind,
        amount: Decimal,
        message: String,
    ) -> Result<()> {
        let record = TransactionRecord::new(kind, amount, account.savings());
        self.ledger.append(record).await?;
        self.snapshot_tx.send_replace(Snapshot::of(account));
        tracing::debug!(kind = ?kind, %amount, balance = %account.savings(), "committed");
        self.journal.record(&message).await;
        Ok(())
    }
}
