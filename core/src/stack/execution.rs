// stackwork/src/stack/execution.rs

//! Contains `Stack::call()`, which runs one node of the chain between its
//! (own or inherited) input and output contracts.

use crate::core::value::{Options, Value};
use crate::error::StackworkResult;
use crate::layer::Next;
use crate::stack::definition::Stack;
use tracing::{event, instrument, Level};

impl Stack {
  /// Calls the stack with `params`.
  ///
  /// The input contract filters `params` before the head layer runs and the
  /// output contract coerces whatever the layer returns. Every node resolves
  /// the contracts through its tail, and the continuation handed to the head
  /// calls the tail node, so the contracts are applied again at each level.
  #[instrument(name = "Stack::call", skip_all, fields(head = %self.head.name()), err(Display))]
  pub fn call(&self, params: Options) -> StackworkResult<Value> {
    let params = match self.input() {
      Some(input) => input.apply(&params)?,
      None => params,
    };
    event!(Level::TRACE, "Input accepted.");

    let next = match self.tail() {
      Some(tail) => Next::chain(tail),
      None => Next::bottom(self.head.name()),
    };
    let result = self.head.invoke(params, next)?;

    match self.output() {
      Some(output) => output.apply(result),
      None => Ok(result),
    }
  }
}
