//! Paywall unlocks: the ledger and the checkout flow feeding it.

pub mod checkout;
pub mod ledger;

pub use checkout::{CheckoutService, StartCheckout};
pub use ledger::UnlockLedger;
