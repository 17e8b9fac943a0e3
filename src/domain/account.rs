use crate::domain::loan::{Loan, LoanType};
use crate::error::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Represents a monetary balance with 2 decimal places display precision.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific
/// rules and provide type safety for financial calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Balance(pub Decimal);

/// Represents a positive monetary amount entered for an operation.
///
/// Validated at construction so nothing non-positive ever reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(Error::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Formats an amount in the `#,##0.00` style every display surface uses.
pub fn format_amount(value: Decimal) -> String {
    let text = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}

/// Outcome of a successful EMI payment. Carries the loan type so the caller
/// can compose messages even when the payment cleared the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmiOutcome {
    Outstanding { loan_type: LoanType, remaining: u32 },
    LoanRepaid(LoanType),
}

/// The single savings account: a balance plus at most one active loan.
///
/// Every mutation either commits fully or returns an error leaving the state
/// untouched. Callers are responsible for serializing access; the account
/// itself is plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    savings: Balance,
    loan: Option<Loan>,
}

impl Account {
    /// Opens the account with the fixed starting balance.
    pub fn open() -> Self {
        Self {
            savings: Balance::new(dec!(1000.00)),
            loan: None,
        }
    }

    pub fn savings(&self) -> Decimal {
        self.savings.0
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    /// Maximum loan principal the customer may request: 5x current savings.
    pub fn eligibility(&self) -> Decimal {
        self.savings.0 * dec!(5)
    }

    pub fn deposit(&mut self, amount: Amount) {
        self.savings += amount.into();
    }

    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        if amount.value() > self.savings.0 {
            return Err(Error::InsufficientFunds);
        }
        self.savings -= amount.into();
        Ok(())
    }

    /// Originates a loan. The principal is not credited to savings; the
    /// customer owes installments against it.
    pub fn take_loan(&mut self, amount: Amount, loan_type: LoanType) -> Result<Loan> {
        if self.loan.is_some() {
            return Err(Error::LoanAlreadyActive);
        }
        let limit = self.eligibility();
        if amount.value() > limit {
            return Err(Error::ExceedsEligibility {
                limit: limit.round_dp(2),
            });
        }
        let loan = Loan::originate(amount.value(), loan_type);
        self.loan = Some(loan);
        Ok(loan)
    }

    /// Pays one installment. Only the exact EMI is accepted; no partial or
    /// early-payoff amounts.
    pub fn pay_emi(&mut self, amount: Amount) -> Result<EmiOutcome> {
        let mut loan = match self.loan {
            Some(loan) => loan,
            None => {
                return Err(Error::WrongEmiAmount {
                    expected: Decimal::ZERO,
                });
            }
        };
        if amount.value() != loan.emi {
            return Err(Error::WrongEmiAmount { expected: loan.emi });
        }
        if amount.value() > self.savings.0 {
            return Err(Error::InsufficientFunds);
        }
        self.savings -= amount.into();
        loan.principal -= amount.value();
        // The final installment can exceed the remaining principal; clamp
        // before the clearance check so nothing ever observes a negative loan.
        if loan.principal < Decimal::ZERO {
            loan.principal = Decimal::ZERO;
        }
        loan.tenure -= 1;
        if loan.tenure == 0 || loan.principal == Decimal::ZERO {
            self.loan = None;
            Ok(EmiOutcome::LoanRepaid(loan.loan_type))
        } else {
            self.loan = Some(loan);
            Ok(EmiOutcome::Outstanding {
                loan_type: loan.loan_type,
                remaining: loan.tenure,
            })
        }
    }

    /// Credits one month of savings interest at 4%/yr. Repeated calls
    /// compound; this is not idempotent.
    pub fn credit_interest(&mut self) -> Decimal {
        let interest = (self.savings.0 * dec!(0.04) / dec!(12)).round_dp(2);
        self.savings += Balance::new(interest);
        interest
    }
}
