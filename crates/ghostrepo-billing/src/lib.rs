//! # ghostrepo-billing
//!
//! Hosted checkout sessions for paywalled share links. Callers depend on the
//! [`PaymentGateway`] trait; [`StripeClient`] talks to the Stripe REST API.

pub mod gateway;
pub mod stripe;

pub use gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentStatus};
pub use stripe::StripeClient;
