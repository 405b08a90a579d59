//! Domain types for the Lead Machine access-code login flow.
//!
//! This crate contains only pure types with no framework dependencies.
//! Every time-dependent operation takes the clock as an argument; nothing
//! in here reads the system time or touches I/O.

pub mod access_code;
pub mod history;
