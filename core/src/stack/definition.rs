// stackwork/src/stack/definition.rs

//! Contains the `Stack` node type and its assembly from an ordered layer list.

use crate::contract::{Input, Output};
use crate::error::{StackworkError, StackworkResult};
use crate::layer::StackLayer;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// One node of a singly linked chain of layers.
///
/// Only the bottom node carries the input/output contracts explicitly; every
/// node above it resolves them through its tail.
#[derive(Debug)]
pub struct Stack {
  pub(crate) head: Arc<StackLayer>,
  pub(crate) tail: Option<Box<Stack>>,
  pub(crate) input: Option<Arc<Input>>,
  pub(crate) output: Option<Arc<Output>>,
}

impl Stack {
  /// A node placed on top of `tail`, inheriting its contracts.
  pub fn new(head: Arc<StackLayer>, tail: Option<Box<Stack>>) -> Self {
    Self {
      head,
      tail,
      input: None,
      output: None,
    }
  }

  /// A bottom node carrying the contracts of the whole chain.
  pub fn bottom(head: Arc<StackLayer>, input: Option<Arc<Input>>, output: Option<Arc<Output>>) -> Self {
    Self {
      head,
      tail: None,
      input,
      output,
    }
  }

  /// Builds a stack from layers ordered from top to bottom.
  ///
  /// The last layer becomes the bottom node holding the contracts; the others
  /// are folded on top of it from last to first, so the first layer ends up
  /// as the head of the returned node.
  pub fn build(
    input: Option<Arc<Input>>,
    output: Option<Arc<Output>>,
    layers: &[Arc<StackLayer>],
  ) -> StackworkResult<Self> {
    let Some((bottom, upper)) = layers.split_last() else {
      event!(Level::ERROR, "Cannot build a stack without layers.");
      return Err(StackworkError::EmptyStack);
    };

    let stack = Self::bottom(Arc::clone(bottom), input, output);
    let stack = upper
      .iter()
      .rev()
      .fold(stack, |tail, head| Self::new(Arc::clone(head), Some(Box::new(tail))));

    event!(Level::DEBUG, depth = layers.len(), head = %stack.head.name(), "Stack assembled.");
    Ok(stack)
  }

  pub fn head(&self) -> &StackLayer {
    &self.head
  }

  pub fn tail(&self) -> Option<&Stack> {
    self.tail.as_deref()
  }

  pub fn is_bottom(&self) -> bool {
    self.tail.is_none()
  }

  /// The input contract of this node, or the nearest one down the tail.
  pub fn input(&self) -> Option<&Input> {
    self.nodes().find_map(|node| node.input.as_deref())
  }

  /// The output contract of this node, or the nearest one down the tail.
  pub fn output(&self) -> Option<&Output> {
    self.nodes().find_map(|node| node.output.as_deref())
  }

  /// This node followed by every node down to the bottom.
  pub fn nodes(&self) -> impl Iterator<Item = &Stack> {
    std::iter::successors(Some(self), |node| node.tail())
  }

  /// The layers of the chain, top to bottom.
  pub fn layers(&self) -> impl Iterator<Item = &StackLayer> {
    self.nodes().map(Stack::head)
  }

  pub fn len(&self) -> usize {
    self.nodes().count()
  }
}

impl fmt::Display for Stack {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.layers().try_for_each(|layer| write!(f, "{}", layer))
  }
}
