// stackwork/src/contract/mod.rs

//! The contracts that bound a whole stack: [`Input`] filters the options going
//! forth, [`Output`] coerces the single value coming back.

pub mod input;
pub mod output;

pub use input::Input;
pub use output::{Output, RESULT_FIELD};
