//! Share link domain entities.

pub mod model;
pub mod settings;

pub use model::{CreateShareLink, ShareLink, ShareStatus};
pub use settings::{ExpiryPreset, ShareSettingsPatch};
