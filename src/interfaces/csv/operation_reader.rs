use crate::application::dispatcher::Operation;
use crate::domain::account::Amount;
use crate::domain::loan::LoanType;
use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum OpCode {
    Deposit,
    Withdraw,
    Loan,
    Emi,
    Interest,
}

/// One CSV row: `op, amount, loan_type`. Amount is empty for `interest`;
/// `loan_type` is only meaningful for `loan` rows.
#[derive(Debug, Deserialize)]
struct OperationRow {
    op: OpCode,
    amount: Option<Decimal>,
    loan_type: Option<LoanType>,
}

impl TryFrom<OperationRow> for Operation {
    type Error = Error;

    fn try_from(row: OperationRow) -> Result<Self> {
        match row.op {
            OpCode::Deposit => Ok(Operation::Deposit(require_amount(row.amount)?)),
            OpCode::Withdraw => Ok(Operation::Withdraw(require_amount(row.amount)?)),
            OpCode::Loan => {
                let amount = require_amount(row.amount)?;
                // A loan row without a product never reaches the engine.
                let loan_type = row.loan_type.ok_or(Error::NoLoanTypeSelected)?;
                Ok(Operation::RequestLoan(amount, loan_type))
            }
            OpCode::Emi => Ok(Operation::PayEmi(require_amount(row.amount)?)),
            OpCode::Interest => Ok(Operation::ApplyInterest),
        }
    }
}

fn require_amount(amount: Option<Decimal>) -> Result<Amount> {
    amount.ok_or(Error::InvalidAmount).and_then(Amount::new)
}

/// Reads operation requests from a CSV source.
///
/// Wraps `csv::Reader` and yields `Result<Operation>` lazily, so large files
/// stream without loading everything into memory. Whitespace is trimmed and
/// short rows are tolerated.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads, deserializes and validates
    /// operations. Validation happens here, before any dispatch.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize::<OperationRow>()
            .map(|row| row.map_err(Error::from).and_then(Operation::try_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn read_all(data: &str) -> Vec<Result<Operation>> {
        OperationReader::new(data.as_bytes()).operations().collect()
    }

    #[test]
    fn test_reader_valid_stream() {
        let data = "op, amount, loan_type\n\
                    deposit, 500.00,\n\
                    withdraw, 200.00,\n\
                    loan, 5000.00, personal\n\
                    emi, 439.58,\n\
                    interest,,";
        let results = read_all(data);
        assert_eq!(results.len(), 5);
        assert_eq!(
            *results[0].as_ref().unwrap(),
            Operation::Deposit(Amount::new(dec!(500.00)).unwrap())
        );
        assert_eq!(
            *results[2].as_ref().unwrap(),
            Operation::RequestLoan(Amount::new(dec!(5000.00)).unwrap(), LoanType::Personal)
        );
        assert_eq!(*results[4].as_ref().unwrap(), Operation::ApplyInterest);
    }

    #[test]
    fn test_loan_without_type_is_rejected() {
        let results = read_all("op, amount, loan_type\nloan, 1000.00,");
        assert!(matches!(results[0], Err(Error::NoLoanTypeSelected)));
    }

    #[test]
    fn test_non_positive_and_missing_amounts_rejected() {
        let results = read_all(
            "op, amount, loan_type\n\
             deposit, -5.00,\n\
             deposit, 0,\n\
             withdraw,,",
        );
        assert!(matches!(results[0], Err(Error::InvalidAmount)));
        assert!(matches!(results[1], Err(Error::InvalidAmount)));
        assert!(matches!(results[2], Err(Error::InvalidAmount)));
    }

    #[test]
    fn test_malformed_row_yields_csv_error() {
        let results = read_all("op, amount, loan_type\ntransfer, 10.00,");
        assert!(matches!(results[0], Err(Error::Csv(_))));
    }
}
