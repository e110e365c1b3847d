//! Customer balances: billable debt netted against collections.

pub mod balance;

pub use balance::{BalanceCalculator, CustomerBalance};
