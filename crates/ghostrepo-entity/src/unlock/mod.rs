//! Paywall unlock ledger entities.

pub mod grant;
pub mod record;

pub use grant::UnlockGrant;
pub use record::{UnlockRecord, normalize_email};
