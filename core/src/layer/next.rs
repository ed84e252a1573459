// stackwork/src/layer/next.rs

//! The continuation handed to every layer: "the rest of the chain".

use crate::core::value::{Options, Value};
use crate::error::{StackworkError, StackworkResult};
use crate::stack::Stack;

/// Callback to invoke the remainder of the stack.
///
/// A layer may call [`Next::run`] to delegate downstream with a replacement
/// option map, or return directly to short-circuit the chain. At the bottom of
/// the stack there is nothing left to run and every call fails with
/// [`StackworkError::BottomLayer`].
pub struct Next<'a> {
  inner: NextInner<'a>,
}

enum NextInner<'a> {
  /// More layers below.
  Chain(&'a Stack),
  /// The caller is the bottom layer.
  Bottom { layer: &'a str },
  /// A detached continuation, for driving a layer outside of a stack.
  Func(&'a dyn Fn(Options) -> StackworkResult<Value>),
}

impl<'a> Next<'a> {
  pub(crate) fn chain(tail: &'a Stack) -> Self {
    Self {
      inner: NextInner::Chain(tail),
    }
  }

  pub(crate) fn bottom(layer: &'a str) -> Self {
    Self {
      inner: NextInner::Bottom { layer },
    }
  }

  /// Wraps a plain function as a continuation.
  pub fn from_fn(f: &'a dyn Fn(Options) -> StackworkResult<Value>) -> Self {
    Self {
      inner: NextInner::Func(f),
    }
  }

  /// Runs the rest of the chain with `options` and returns its result.
  pub fn run(&self, options: Options) -> StackworkResult<Value> {
    match self.inner {
      NextInner::Chain(tail) => tail.call(options),
      NextInner::Bottom { layer } => Err(StackworkError::BottomLayer {
        layer: layer.to_string(),
      }),
      NextInner::Func(f) => f(options),
    }
  }

  /// Whether the caller sits at the bottom of the stack.
  ///
  /// A diagnostic convenience for layers that may be registered anywhere;
  /// calling [`Next::run`] from the bottom still fails with
  /// [`StackworkError::BottomLayer`].
  pub fn is_bottom(&self) -> bool {
    matches!(self.inner, NextInner::Bottom { .. })
  }
}

impl std::fmt::Debug for Next<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let kind = match self.inner {
      NextInner::Chain(tail) => format!("Chain({})", tail.head().name()),
      NextInner::Bottom { layer } => format!("Bottom({})", layer),
      NextInner::Func(_) => "Func".to_string(),
    };
    f.debug_tuple("Next").field(&kind).finish()
  }
}
