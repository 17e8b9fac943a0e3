use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The loan products on offer. Terms are fixed per product; there is no
/// per-customer underwriting beyond the eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Personal,
    Home,
    Car,
}

impl LoanType {
    pub fn tenure_months(&self) -> u32 {
        match self {
            LoanType::Personal => 12,
            LoanType::Home => 60,
            LoanType::Car => 36,
        }
    }

    pub fn annual_rate(&self) -> Decimal {
        match self {
            LoanType::Personal => dec!(0.10),
            LoanType::Home => dec!(0.07),
            LoanType::Car => dec!(0.08),
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanType::Personal => write!(f, "Personal"),
            LoanType::Home => write!(f, "Home"),
            LoanType::Car => write!(f, "Car"),
        }
    }
}

/// An active amortizing loan. All four fields transition together: a loan
/// either exists in full or not at all, so the account holds `Option<Loan>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Loan {
    pub loan_type: LoanType,
    /// Outstanding principal.
    pub principal: Decimal,
    /// Fixed monthly installment, 2 decimal places.
    pub emi: Decimal,
    /// Installments remaining.
    pub tenure: u32,
}

impl Loan {
    pub fn originate(principal: Decimal, loan_type: LoanType) -> Self {
        let tenure = loan_type.tenure_months();
        let emi = monthly_emi(principal, loan_type.annual_rate(), tenure);
        Self {
            loan_type,
            principal,
            emi,
            tenure,
        }
    }
}

/// Standard amortizing-loan installment:
/// `EMI = P·m·(1+m)^n / ((1+m)^n − 1)` with monthly rate `m = annual/12`.
///
/// Rounded to 2 decimal places, the display precision every surface uses.
pub fn monthly_emi(principal: Decimal, annual_rate: Decimal, months: u32) -> Decimal {
    let monthly = annual_rate / dec!(12);
    // (1+m)^n by repeated multiplication; terms never exceed 60 months.
    let mut factor = Decimal::ONE;
    for _ in 0..months {
        factor *= Decimal::ONE + monthly;
    }
    (principal * monthly * factor / (factor - Decimal::ONE)).round_dp(2)
}
