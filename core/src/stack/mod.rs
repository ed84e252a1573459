// stackwork/src/stack/mod.rs

//! Defines the `Stack`: the assembled, immutable chain of layers with the
//! contracts every node inherits, and how a call travels through it.

pub mod definition;
pub mod execution;

// Re-export the main Stack struct
pub use definition::Stack;
