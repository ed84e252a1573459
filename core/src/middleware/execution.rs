// stackwork/src/middleware/execution.rs

//! Contains `Middleware::call()` and the lazy, cached assembly of its stack.

use crate::core::value::{Options, Value};
use crate::error::StackworkResult;
use crate::middleware::definition::Middleware;
use crate::stack::Stack;
use std::sync::Arc;
use tracing::{event, instrument, Level};

impl Middleware {
  /// Returns the assembled stack, building it on first use after a change.
  ///
  /// Fails with [`crate::StackworkError::EmptyStack`] when no layer is registered.
  pub fn stack(&self) -> StackworkResult<Arc<Stack>> {
    let mut cached = self.stack.lock();
    if let Some(stack) = cached.as_ref() {
      event!(Level::TRACE, "Reusing cached stack.");
      return Ok(Arc::clone(stack));
    }

    let stack = Arc::new(Stack::build(
      Some(Arc::clone(&self.input)),
      Some(Arc::clone(&self.output)),
      &self.layers,
    )?);
    *cached = Some(Arc::clone(&stack));
    Ok(stack)
  }

  /// Calls the middleware with `options` and returns the coerced result.
  ///
  /// An empty middleware fails before any input coercion runs.
  #[instrument(
    name = "Middleware::call",
    skip_all,
    fields(
      description = self.description.as_deref().unwrap_or(""),
      num_layers = self.layers.len(),
    ),
    err(Display)
  )]
  pub fn call(&self, options: Options) -> StackworkResult<Value> {
    // The lock is released before the chain runs.
    let stack = self.stack()?;
    stack.call(options)
  }
}
