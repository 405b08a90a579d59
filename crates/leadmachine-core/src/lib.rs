//! Service plumbing shared across Lead Machine services: probe handlers,
//! request-id middleware, tracing setup, and serialization helpers.
//!
//! Nothing in this crate knows about access codes or sessions; anything
//! domain-shaped belongs in `leadmachine-domain` or the service itself.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
