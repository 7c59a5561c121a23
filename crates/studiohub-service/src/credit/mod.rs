//! Credit ledger.

pub mod ledger;

pub use ledger::CreditLedger;
