// src/lib.rs

//! Stackwork: a synchronous, declarative middleware stack for Rust.
//!
//! Stackwork lets you describe a chain of processing layers instead of
//! hand-writing a chain of responsibility:
//!  - Named input options with coercers, defaults and optionality.
//!  - A single declared output, coerced on the way back.
//!  - Layer types that declare their own options and receive a continuation
//!    for the rest of the chain.
//!  - Registration under unique names, with insertion before a named layer.
//!  - Per-registration filters injecting configuration into a layer's options.
//!  - Lazy, cached assembly of the stack, invalidated by any change.

pub mod contract;
pub mod core;
pub mod error;
pub mod layer;
pub mod middleware;
pub mod stack;

// --- Re-exports for the Public API ---

// Payload and declarations users interact with frequently
pub use crate::core::field::{Coercer, DefaultValue, FieldSpec};
pub use crate::core::schema::Schema;
pub use crate::core::value::{options, Options, Value};

// Contracts bounding a stack
pub use crate::contract::{Input, Output, RESULT_FIELD};

// Layers and the continuation they receive
pub use crate::layer::{Filter, Layer, LayerOptions, LayerType, Next, StackLayer, RESERVED_OPTION_NAMES};

// The assembled chain and the facade building it
pub use crate::middleware::{Middleware, Registration};
pub use crate::stack::Stack;

pub use crate::error::{StackworkError, StackworkResult};

/*
    Core Workflow:
    1. Define layer types with `LayerType::from_fn` (or implement `Layer` for a struct),
       declaring their options with `.option(FieldSpec::new(..))`.
    2. Create a `Middleware`, declare its input options and output with `.option()` / `.output()`.
    3. Register layers with `.use_layer()`, using `Registration` to rename a layer,
       place it `before` another one, or inject configuration with a `filter`.
    4. Call `middleware.call(options)`; the stack is assembled on the first call
       and reused until the middleware changes.
*/
