pub mod account;
pub mod loan;
pub mod ports;
pub mod transaction;
