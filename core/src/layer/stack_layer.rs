// stackwork/src/layer/stack_layer.rs

//! A layer type bound to its name within one stack, plus the filter that
//! injects its configuration.

use super::definition::LayerType;
use super::next::Next;
use crate::core::value::{Options, Value};
use crate::error::StackworkResult;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

// Type alias for a registration-time filter.
// It mutates a copy of the options before the layer coerces them.
pub type Filter = Arc<dyn Fn(&mut Options) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StackLayer {
  name: String,
  layer: LayerType,
  filter: Option<Filter>,
}

impl StackLayer {
  pub fn new(name: impl ToString, layer: LayerType, filter: Option<Filter>) -> Self {
    Self {
      name: name.to_string(),
      layer,
      filter,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn layer_type(&self) -> &LayerType {
    &self.layer
  }

  pub fn has_filter(&self) -> bool {
    self.filter.is_some()
  }

  /// Runs the layer. The filter sees a copy of `options`; the layer receives
  /// the filtered copy for coercion and the untouched `options` as its raw payload.
  pub fn invoke(&self, options: Options, next: Next<'_>) -> StackworkResult<Value> {
    event!(Level::TRACE, layer = %self.name, layer_type = %self.layer.name(), "Invoking layer.");
    let filtered = self.filtered(&options);
    self.layer.invoke(&filtered, options, next)
  }

  fn filtered(&self, options: &Options) -> Options {
    let mut copy = options.clone();
    if let Some(filter) = &self.filter {
      filter(&mut copy);
    }
    copy
  }

  /// The configuration the filter injects, as seen from an empty payload.
  pub fn configuration(&self) -> Options {
    self.filtered(&Options::new())
  }
}

impl fmt::Debug for StackLayer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StackLayer")
      .field("name", &self.name)
      .field("layer_type", &self.layer.name())
      .field("filter_present", &self.filter.is_some())
      .finish()
  }
}

impl fmt::Display for StackLayer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.layer.description() {
      Some(desc) => writeln!(f, "{}: {}", self.name, desc)?,
      None => writeln!(f, "{}", self.name)?,
    }
    let config = self.configuration();
    for field in self.layer.options().fields() {
      let Some(value) = config.get(field.name()) else {
        continue;
      };
      match field.description() {
        Some(desc) => writeln!(f, "  {}: {} ({})", field.name(), value, desc)?,
        None => writeln!(f, "  {}: {}", field.name(), value)?,
      }
    }
    Ok(())
  }
}
