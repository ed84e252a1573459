// stackwork/src/layer/mod.rs

//! Layers: the units of work a stack is made of, the continuation they
//! receive, and their named bindings within a stack.

pub mod definition;
pub mod next;
pub mod stack_layer;

pub use definition::{Layer, LayerOptions, LayerType, RESERVED_OPTION_NAMES};
pub use next::Next;
pub use stack_layer::{Filter, StackLayer};
