use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use teller::application::dispatcher::{Dispatcher, DispatcherConfig, Operation};
use teller::application::engine::AccountEngine;
use teller::domain::account::Amount;
use teller::domain::loan::LoanType;
use teller::domain::transaction::{TransactionKind, TransactionRecord};
use teller::infrastructure::in_memory::InMemoryLedger;
use teller::infrastructure::journal::Journal;

fn engine() -> Arc<AccountEngine> {
    Arc::new(AccountEngine::new(
        Box::new(InMemoryLedger::new()),
        Journal::in_memory(),
    ))
}

/// Replays the ledger from the opening balance and checks every record's
/// resulting balance. Any torn read-modify-write would break the chain.
fn assert_ledger_consistent(records: &[TransactionRecord]) -> Decimal {
    let mut balance = dec!(1000.00);
    for record in records {
        match record.kind {
            TransactionKind::Deposit | TransactionKind::InterestCredited => {
                balance += record.amount;
            }
            TransactionKind::Withdrawal | TransactionKind::EmiPayment(_) => {
                balance -= record.amount;
            }
            TransactionKind::LoanTaken(_) => {}
        }
        assert!(balance >= Decimal::ZERO, "balance went negative");
        assert_eq!(
            record.balance, balance,
            "record balance does not match replay"
        );
    }
    balance
}

#[tokio::test]
async fn test_commutative_mix_reaches_exact_total() {
    let engine = engine();
    let dispatcher = Dispatcher::spawn(engine.clone(), DispatcherConfig::default());

    // 20 deposits of 100 and 20 withdrawals of 50: no ordering can make a
    // withdrawal fail, so every serialization lands on the same total.
    let mut ops = Vec::new();
    for _ in 0..20 {
        ops.push(Operation::Deposit(Amount::new(dec!(100)).unwrap()));
        ops.push(Operation::Withdraw(Amount::new(dec!(50)).unwrap()));
    }
    ops.shuffle(&mut rand::thread_rng());

    for op in ops {
        dispatcher.submit(op).await.unwrap();
    }
    dispatcher.drain().await;

    let records = engine.history().await.unwrap();
    assert_eq!(records.len(), 40);
    let final_balance = assert_ledger_consistent(&records);
    assert_eq!(final_balance, dec!(2000.00));
    assert_eq!(engine.snapshot().await.savings, dec!(2000.00));
}

#[tokio::test]
async fn test_contended_mix_stays_serializable_and_non_negative() {
    let engine = engine();
    let dispatcher = Dispatcher::spawn(engine.clone(), DispatcherConfig::default());

    // Withdrawals large enough that some must fail depending on ordering.
    // Whatever interleaving wins, the ledger must replay cleanly and the
    // balance must never go negative.
    let mut ops = Vec::new();
    for _ in 0..30 {
        ops.push(Operation::Deposit(Amount::new(dec!(75)).unwrap()));
        ops.push(Operation::Withdraw(Amount::new(dec!(400)).unwrap()));
    }
    ops.push(Operation::ApplyInterest);
    ops.shuffle(&mut rand::thread_rng());

    for op in ops {
        dispatcher.submit(op).await.unwrap();
    }
    dispatcher.drain().await;

    let records = engine.history().await.unwrap();
    let final_balance = assert_ledger_consistent(&records);
    assert_eq!(engine.snapshot().await.savings, final_balance);

    // Failed withdrawals left journal lines rather than records.
    let journal_lines = engine.journal().lines().await;
    assert_eq!(records.len() + count_failures(&journal_lines), 61);
}

fn count_failures(lines: &[String]) -> usize {
    lines
        .iter()
        .filter(|l| l.ends_with("Insufficient balance!"))
        .count()
}

#[tokio::test]
async fn test_concurrent_loan_requests_grant_exactly_one() {
    let engine = engine();
    let dispatcher = Dispatcher::spawn(engine.clone(), DispatcherConfig::default());

    for loan_type in [LoanType::Personal, LoanType::Home, LoanType::Car] {
        dispatcher
            .submit(Operation::RequestLoan(
                Amount::new(dec!(1000)).unwrap(),
                loan_type,
            ))
            .await
            .unwrap();
    }
    dispatcher.drain().await;

    let records = engine.history().await.unwrap();
    let loans = records
        .iter()
        .filter(|r| matches!(r.kind, TransactionKind::LoanTaken(_)))
        .count();
    assert_eq!(loans, 1, "at most one active loan at a time");

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.loan_amount, dec!(1000));
    assert!(snapshot.loan_type.is_some());
}
