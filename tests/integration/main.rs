//! Integration tests driving the full router against in-memory stores.

mod helpers;

mod access_test;
mod content_test;
mod health_test;
mod share_test;
mod stripe_test;
