// stackwork/src/core/field.rs

//! Defines the declaration of a single named option (or output value).

use super::value::Value;
use crate::error::{StackworkError, StackworkResult};
use std::sync::Arc;

// Type alias for a value coercer.
// It takes ownership of the raw value and returns the coerced one.
// Uses Arc so field declarations stay cheaply cloneable.
pub type Coercer = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static>;

/// The default of a field: either a fixed value or a thunk evaluated on every use.
#[derive(Clone)]
pub enum DefaultValue {
  Value(Value),
  Thunk(Arc<dyn Fn() -> Value + Send + Sync + 'static>),
}

impl DefaultValue {
  pub fn resolve(&self) -> Value {
    match self {
      DefaultValue::Value(value) => value.clone(),
      DefaultValue::Thunk(thunk) => thunk(),
    }
  }
}

impl std::fmt::Debug for DefaultValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
      DefaultValue::Thunk(_) => f.write_str("Thunk(..)"),
    }
  }
}

/// Declaration of one named option: its coercers, default, optionality and description.
///
/// Built fluently:
///
/// ```
/// use serde_json::json;
/// use stackwork::FieldSpec;
///
/// let field = FieldSpec::new("limit")
///   .coerce(|v| Ok(json!(v.as_i64().unwrap_or(0).min(100))))
///   .default(json!(10))
///   .desc("Page size");
/// assert_eq!(field.name(), "limit");
/// ```
#[derive(Clone)]
pub struct FieldSpec {
  pub(crate) name: String,
  pub(crate) coercers: Vec<Coercer>,
  pub(crate) default: Option<DefaultValue>,
  pub(crate) optional: bool,
  pub(crate) description: Option<String>,
}

impl FieldSpec {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      coercers: Vec::new(),
      default: None,
      optional: false,
      description: None,
    }
  }

  /// Appends a coercer. Coercers run in the order they were added.
  pub fn coerce<F>(mut self, coercer: F) -> Self
  where
    F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
  {
    self.coercers.push(Arc::new(coercer));
    self
  }

  /// Appends an already shared coercer.
  pub fn coerce_with(mut self, coercer: Coercer) -> Self {
    self.coercers.push(coercer);
    self
  }

  pub fn default(mut self, value: Value) -> Self {
    self.default = Some(DefaultValue::Value(value));
    self
  }

  pub fn default_with<F>(mut self, thunk: F) -> Self
  where
    F: Fn() -> Value + Send + Sync + 'static,
  {
    self.default = Some(DefaultValue::Thunk(Arc::new(thunk)));
    self
  }

  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn desc(mut self, text: impl Into<String>) -> Self {
    self.description = Some(text.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn is_optional(&self) -> bool {
    self.optional
  }

  pub fn has_default(&self) -> bool {
    self.default.is_some()
  }

  /// Resolves the value of this field.
  ///
  /// `raw` is the supplied value, if any. Returns `Ok(None)` for an optional
  /// field that received nothing and has no default.
  pub(crate) fn resolve(&self, raw: Option<Value>) -> StackworkResult<Option<Value>> {
    let value = match raw.or_else(|| self.default.as_ref().map(DefaultValue::resolve)) {
      Some(value) => value,
      None if self.optional => return Ok(None),
      None => {
        return Err(StackworkError::MissingRequiredOption {
          name: self.name.clone(),
        })
      }
    };

    self
      .coercers
      .iter()
      .try_fold(value, |acc, coercer| coercer(acc))
      .map(Some)
      .map_err(|source| StackworkError::CoercionFailed {
        name: self.name.clone(),
        source,
      })
  }
}

// Coercers are closures, so Debug only reports how many there are.
impl std::fmt::Debug for FieldSpec {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FieldSpec")
      .field("name", &self.name)
      .field("coercers", &self.coercers.len())
      .field("default", &self.default)
      .field("optional", &self.optional)
      .field("description", &self.description)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[test]
  fn coercers_run_in_declaration_order() {
    let field = FieldSpec::new("n")
      .coerce(|v| Ok(json!(v.as_i64().unwrap_or_default() + 1)))
      .coerce(|v| Ok(json!(v.as_i64().unwrap_or_default() * 10)));
    assert_eq!(field.resolve(Some(json!(2))).unwrap(), Some(json!(30)));
  }

  #[test]
  fn default_is_coerced_like_a_supplied_value() {
    let field = FieldSpec::new("n")
      .default(json!(4))
      .coerce(|v| Ok(json!(v.to_string())));
    assert_eq!(field.resolve(None).unwrap(), Some(json!("4")));
  }

  #[test]
  fn thunk_default_is_evaluated_on_each_use() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let field = FieldSpec::new("n").default_with(move || json!(counter.fetch_add(1, Ordering::SeqCst)));

    assert_eq!(field.resolve(None).unwrap(), Some(json!(0)));
    assert_eq!(field.resolve(None).unwrap(), Some(json!(1)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn missing_required_field_fails() {
    let err = FieldSpec::new("text").resolve(None).unwrap_err();
    assert!(matches!(err, StackworkError::MissingRequiredOption { name } if name == "text"));
  }

  #[test]
  fn missing_optional_field_resolves_to_nothing() {
    let field = FieldSpec::new("text")
      .optional()
      .coerce(|_| panic!("coercer must not run for an absent optional value"));
    assert_eq!(field.resolve(None).unwrap(), None);
  }

  #[test]
  fn failing_coercer_names_the_field() {
    let field = FieldSpec::new("port").coerce(|_| Err(anyhow::anyhow!("not a port")));
    match field.resolve(Some(json!("x"))).unwrap_err() {
      StackworkError::CoercionFailed { name, source } => {
        assert_eq!(name, "port");
        assert_eq!(source.to_string(), "not a port");
      }
      other => panic!("Expected CoercionFailed, got {:?}", other),
    }
  }
}
