// stackwork/src/core/schema.rs

//! An ordered set of field declarations and the coercion pass over an option map.
//! Shared by the Input contract and by every layer type's own options.

use super::field::FieldSpec;
use super::value::Options;
use crate::error::StackworkResult;

#[derive(Clone, Debug, Default)]
pub struct Schema {
  fields: Vec<FieldSpec>,
}

impl Schema {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declares a field. Re-declaring a name replaces the earlier declaration in place.
  pub fn declare(&mut self, field: FieldSpec) {
    match self.fields.iter_mut().find(|f| f.name == field.name) {
      Some(existing) => *existing = field,
      None => self.fields.push(field),
    }
  }

  pub fn get(&self, name: &str) -> Option<&FieldSpec> {
    self.fields.iter().find(|f| f.name == name)
  }

  pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
    self.fields.iter()
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Coerces `raw` against the declared fields.
  ///
  /// Undeclared keys are dropped. An optional field with neither a value nor a
  /// default is left out of the result.
  pub fn apply(&self, raw: &Options) -> StackworkResult<Options> {
    let mut coerced = Options::new();
    for field in &self.fields {
      if let Some(value) = field.resolve(raw.get(&field.name).cloned())? {
        coerced.insert(field.name.clone(), value);
      }
    }
    Ok(coerced)
  }
}
