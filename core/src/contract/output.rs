// stackwork/src/contract/output.rs

use crate::core::field::FieldSpec;
use crate::core::value::Value;
use crate::error::StackworkResult;
use std::fmt;

/// Name of the single field an [`Output`] declares.
pub const RESULT_FIELD: &str = "result";

/// The contract coercing the value that goes back through a middleware.
///
/// A chain always returns a value, so JSON `null` stands for "nothing was
/// returned": it picks up the default, passes through when the result is
/// optional, and fails otherwise. Until a result is declared the output is an
/// optional identity.
#[derive(Clone, Debug)]
pub struct Output {
  field: FieldSpec,
}

impl Default for Output {
  fn default() -> Self {
    Self {
      field: FieldSpec::new(RESULT_FIELD).optional(),
    }
  }
}

impl Output {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces the result declaration. Whatever name `field` carries, it is
  /// stored as [`RESULT_FIELD`].
  pub fn declare(&mut self, mut field: FieldSpec) -> &mut Self {
    field.name = RESULT_FIELD.to_string();
    self.field = field;
    self
  }

  pub fn field(&self) -> &FieldSpec {
    &self.field
  }

  pub fn apply(&self, raw: Value) -> StackworkResult<Value> {
    let supplied = if raw.is_null() { None } else { Some(raw) };
    Ok(self.field.resolve(supplied)?.unwrap_or(Value::Null))
  }
}

impl fmt::Display for Output {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Output: {}", self.field.description().unwrap_or("A resulting value"))
  }
}
