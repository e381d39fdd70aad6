//! Share links: token minting, registry and the access gate.

pub mod access;
pub mod link;
pub mod registry;

pub use access::{AccessEvaluator, Credentials, Evaluation};
pub use link::LinkService;
pub use registry::{LinkRegistry, UpdateShareRequest};
