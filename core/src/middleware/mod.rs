// stackwork/src/middleware/mod.rs

//! Defines the `Middleware` facade: declaring contracts, registering layers,
//! and calling the assembled stack.

pub mod definition;
pub mod execution;

// Re-export the main Middleware struct and its registration builder
pub use definition::{Middleware, Registration};
