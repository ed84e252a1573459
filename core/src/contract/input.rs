// stackwork/src/contract/input.rs

use crate::core::field::FieldSpec;
use crate::core::schema::Schema;
use crate::core::value::Options;
use crate::error::StackworkResult;
use std::fmt;

/// The contract filtering data going forth through a middleware.
///
/// Every `Middleware` owns its own `Input`; declarations on one middleware
/// never leak into another.
#[derive(Clone, Debug, Default)]
pub struct Input {
  schema: Schema,
}

impl Input {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn option(&mut self, field: FieldSpec) -> &mut Self {
    self.schema.declare(field);
    self
  }

  pub fn schema(&self) -> &Schema {
    &self.schema
  }

  /// Coerces caller options. Unknown keys are dropped.
  pub fn apply(&self, raw: &Options) -> StackworkResult<Options> {
    self.schema.apply(raw)
  }
}

impl fmt::Display for Input {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Input options:")?;
    for field in self.schema.fields() {
      let status = if field.is_optional() { "optional" } else { "required" };
      match field.description() {
        Some(desc) => writeln!(f, "  {}: {} ({})", field.name(), desc, status)?,
        None => writeln!(f, "  {} ({})", field.name(), status)?,
      }
    }
    Ok(())
  }
}
