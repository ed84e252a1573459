// stackwork/src/layer/definition.rs

//! Contains the [`Layer`] trait, the [`LayerType`] that declares a layer's
//! options, and the [`LayerOptions`] a layer receives when it runs.

use super::next::Next;
use crate::core::field::FieldSpec;
use crate::core::schema::Schema;
use crate::core::value::{Options, Value};
use crate::error::{StackworkError, StackworkResult};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// Option names a layer type may not declare.
///
/// `options` is the accessor for the raw payload on [`LayerOptions`]; the rest
/// name the operations every layer type already has.
pub const RESERVED_OPTION_NAMES: &[&str] = &["options", "call", "desc", "inspect"];

/// A configurable unit of work in a stack.
///
/// `call` receives the coerced options of its layer type and a [`Next`]
/// continuation bound to the rest of the stack. Calling `next` is optional:
/// returning directly stops the chain at this layer.
pub trait Layer: Send + Sync + 'static {
  fn call(&self, options: LayerOptions, next: Next<'_>) -> StackworkResult<Value>;
}

// Adapter so plain closures can act as layers (see `LayerType::from_fn`).
struct FnLayer<F>(F);

impl<F> Layer for FnLayer<F>
where
  F: Fn(LayerOptions, Next<'_>) -> StackworkResult<Value> + Send + Sync + 'static,
{
  fn call(&self, options: LayerOptions, next: Next<'_>) -> StackworkResult<Value> {
    (self.0)(options, next)
  }
}

/// What a layer sees when it runs: its own coerced options, plus the
/// unfiltered payload it was handed so it can forward context it did not
/// declare.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerOptions {
  coerced: Options,
  raw: Options,
}

impl LayerOptions {
  pub fn new(coerced: Options, raw: Options) -> Self {
    Self { coerced, raw }
  }

  /// A declared option, after coercion.
  pub fn get(&self, name: &str) -> Option<&Value> {
    self.coerced.get(name)
  }

  /// A declared option deserialized into `T`.
  pub fn value<T: DeserializeOwned>(&self, name: &str) -> StackworkResult<T> {
    let value = self
      .coerced
      .get(name)
      .cloned()
      .ok_or_else(|| StackworkError::MissingRequiredOption { name: name.to_string() })?;
    serde_json::from_value(value).map_err(|e| StackworkError::CoercionFailed {
      name: name.to_string(),
      source: e.into(),
    })
  }

  pub fn coerced(&self) -> &Options {
    &self.coerced
  }

  /// The payload this layer received, before its filter ran.
  pub fn raw(&self) -> &Options {
    &self.raw
  }

  /// A copy of the raw payload with `name` replaced, ready to hand to `next`.
  pub fn forward_with(&self, name: impl Into<String>, value: Value) -> Options {
    let mut forwarded = self.raw.clone();
    forwarded.insert(name.into(), value);
    forwarded
  }
}

/// A named layer implementation together with the options it declares.
///
/// ```
/// use serde_json::json;
/// use stackwork::{FieldSpec, LayerType};
///
/// let add = LayerType::from_fn("Add", |opts, next| {
///   let sum = opts.value::<i64>("value")? + opts.value::<i64>("number")?;
///   next.run(opts.forward_with("value", json!(sum)))
/// })
/// .desc("Add number to a value")
/// .option(FieldSpec::new("number").desc("Number to be added"))?
/// .option(FieldSpec::new("value").desc("Source value"))?;
/// assert_eq!(add.name(), "Add");
/// # Ok::<(), stackwork::StackworkError>(())
/// ```
#[derive(Clone)]
pub struct LayerType {
  name: String,
  description: Option<String>,
  options: Schema,
  handler: Arc<dyn Layer>,
}

impl LayerType {
  pub fn new(name: impl Into<String>, handler: impl Layer) -> Self {
    Self {
      name: name.into(),
      description: None,
      options: Schema::new(),
      handler: Arc::new(handler),
    }
  }

  pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
  where
    F: Fn(LayerOptions, Next<'_>) -> StackworkResult<Value> + Send + Sync + 'static,
  {
    Self::new(name, FnLayer(f))
  }

  pub fn desc(mut self, text: impl Into<String>) -> Self {
    self.description = Some(text.into());
    self
  }

  /// Declares an option of this layer type.
  ///
  /// Fails with [`StackworkError::ReservedOptionName`] when `field` uses one of
  /// [`RESERVED_OPTION_NAMES`].
  pub fn option(mut self, field: FieldSpec) -> StackworkResult<Self> {
    if RESERVED_OPTION_NAMES.contains(&field.name()) {
      return Err(StackworkError::ReservedOptionName {
        name: field.name().to_string(),
        layer_type: self.name.clone(),
      });
    }
    self.options.declare(field);
    Ok(self)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn options(&self) -> &Schema {
    &self.options
  }

  /// Coerces `filtered` against the declared options and runs the layer.
  ///
  /// `raw` is exposed to the layer as [`LayerOptions::raw`]. The layer's
  /// result is returned verbatim.
  pub fn invoke(&self, filtered: &Options, raw: Options, next: Next<'_>) -> StackworkResult<Value> {
    let coerced = self.options.apply(filtered)?;
    self.handler.call(LayerOptions::new(coerced, raw), next)
  }
}

impl fmt::Debug for LayerType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LayerType")
      .field("name", &self.name)
      .field("description", &self.description)
      .field("options", &self.options)
      .finish_non_exhaustive()
  }
}

impl fmt::Display for LayerType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.description {
      Some(desc) => writeln!(f, "{}: {}", self.name, desc)?,
      None => writeln!(f, "{}", self.name)?,
    }
    for field in self.options.fields() {
      match field.description() {
        Some(desc) => writeln!(f, "  {}: {}", field.name(), desc)?,
        None => writeln!(f, "  {}", field.name())?,
      }
    }
    Ok(())
  }
}
