//! Owner-editable share settings.

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Relative expiry choices offered by the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryPreset {
    /// One day.
    #[serde(rename = "1D")]
    OneDay,
    /// Seven days.
    #[serde(rename = "7D")]
    SevenDays,
    /// Thirty days.
    #[serde(rename = "30D")]
    ThirtyDays,
    /// One year.
    #[serde(rename = "1Y")]
    OneYear,
}

impl ExpiryPreset {
    /// Absolute expiry timestamp counted from `now`.
    pub fn expires_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::OneDay => now + Duration::days(1),
            Self::SevenDays => now + Duration::days(7),
            Self::ThirtyDays => now + Duration::days(30),
            Self::OneYear => now
                .checked_add_months(Months::new(12))
                .unwrap_or(now + Duration::days(365)),
        }
    }
}

/// A partial settings update. `None` leaves a field untouched; the nested
/// options on password and expiry distinguish "clear" from "leave".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareSettingsPatch {
    /// New unlock price.
    pub price: Option<Decimal>,
    /// New password hash (`Some(None)` removes the password).
    pub password_hash: Option<Option<String>>,
    /// New expiry (`Some(None)` removes the expiry).
    pub expires_at: Option<Option<DateTime<Utc>>>,
    /// New pin state.
    pub pinned: Option<bool>,
}

impl ShareSettingsPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.password_hash.is_none()
            && self.expires_at.is_none()
            && self.pinned.is_none()
    }
}
