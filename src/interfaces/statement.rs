use crate::application::engine::Snapshot;
use crate::domain::account::format_amount;
use crate::domain::transaction::TransactionRecord;
use chrono::Local;
use std::fmt::Write;

/// Transaction rows that fit on the single statement page. History beyond
/// this is cut off: the statement is page 1 only, a deliberate limitation
/// carried over from the application this engine models.
pub const PAGE_CAPACITY: usize = 30;

/// Renders the account snapshot plus transaction history as a fixed
/// single-page textual statement: header, summary block, columnar table.
pub fn render(snapshot: &Snapshot, history: &[TransactionRecord]) -> String {
    let mut page = String::new();
    let _ = writeln!(page, "Bank Statement");
    let _ = writeln!(page, "Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(
        page,
        "Savings Balance: ${}",
        format_amount(snapshot.savings)
    );
    let loan_suffix = snapshot
        .loan_type
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();
    let _ = writeln!(
        page,
        "Loan Amount: ${}{loan_suffix}",
        format_amount(snapshot.loan_amount)
    );
    let _ = writeln!(
        page,
        "EMI: ${} (Remaining: {} months)",
        format_amount(snapshot.emi),
        snapshot.tenure
    );
    let _ = writeln!(
        page,
        "Loan Eligibility: ${}",
        format_amount(snapshot.eligibility)
    );
    let _ = writeln!(page);
    let _ = writeln!(page, "Transaction History:");
    let _ = writeln!(
        page,
        "{:<20} {:<22} {:>12} {:>12}",
        "Date", "Type", "Amount", "Balance"
    );
    let _ = writeln!(page, "{}", "-".repeat(69));
    for record in history.iter().take(PAGE_CAPACITY) {
        let _ = writeln!(
            page,
            "{:<20} {:<22} {:>12} {:>12}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.kind.label(),
            format!("${}", format_amount(record.amount)),
            format!("${}", format_amount(record.balance)),
        );
    }
    page
}
