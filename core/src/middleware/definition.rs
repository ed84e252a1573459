// stackwork/src/middleware/definition.rs

//! Contains the `Middleware` struct and the methods that configure it.

use crate::contract::{Input, Output};
use crate::core::field::FieldSpec;
use crate::core::value::Options;
use crate::error::{StackworkError, StackworkResult};
use crate::layer::{Filter, LayerType, StackLayer};
use crate::stack::Stack;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// A configurable middleware: input and output contracts around an ordered
/// stack of named layers. Every layer runs between the same contracts.
///
/// Every structural change (`desc`, `option`, `output`, `use_layer`) drops the
/// cached [`Stack`]; the next `call` assembles a fresh one.
///
/// ```
/// use serde_json::json;
/// use stackwork::{options, FieldSpec, LayerType, Middleware, Registration};
///
/// let upcase = LayerType::from_fn("Upcase", |opts, _next| {
///   Ok(json!(opts.value::<String>("text")?.to_uppercase()))
/// })
/// .option(FieldSpec::new("text"))?;
///
/// let shout = Middleware::define(|m| {
///   m.desc("Shout the text").option(FieldSpec::new("text").desc("The text to shout"));
///   m.use_layer(upcase)?;
///   Ok(())
/// })?;
///
/// assert_eq!(shout.call(options([("text", json!("hey"))]))?, json!("HEY"));
/// # Ok::<(), stackwork::StackworkError>(())
/// ```
pub struct Middleware {
  pub(crate) description: Option<String>,
  pub(crate) input: Arc<Input>,
  pub(crate) output: Arc<Output>,
  /// Registered layers, top to bottom.
  pub(crate) layers: Vec<Arc<StackLayer>>,
  pub(crate) stack: Mutex<Option<Arc<Stack>>>,
}

/// How a layer type joins a middleware: under which name, where, and with
/// which configuration filter.
#[derive(Clone)]
pub struct Registration {
  layer: LayerType,
  name: Option<String>,
  before: Option<String>,
  filter: Option<Filter>,
}

impl Registration {
  pub fn new(layer: LayerType) -> Self {
    Self {
      layer,
      name: None,
      before: None,
      filter: None,
    }
  }

  /// Registers the layer under `name` instead of its type name, so the same
  /// layer type can appear more than once.
  pub fn named(mut self, name: impl ToString) -> Self {
    self.name = Some(name.to_string());
    self
  }

  /// Places the layer right above the layer registered as `anchor`.
  pub fn before(mut self, anchor: impl ToString) -> Self {
    self.before = Some(anchor.to_string());
    self
  }

  /// Sets the filter injecting configuration into the layer's options.
  pub fn filter<F>(mut self, filter: F) -> Self
  where
    F: Fn(&mut Options) + Send + Sync + 'static,
  {
    self.filter = Some(Arc::new(filter));
    self
  }

  fn resolved_name(&self) -> String {
    self.name.clone().unwrap_or_else(|| self.layer.name().to_string())
  }
}

impl From<LayerType> for Registration {
  fn from(layer: LayerType) -> Self {
    Self::new(layer)
  }
}

impl Default for Middleware {
  fn default() -> Self {
    Self::new()
  }
}

impl Middleware {
  pub fn new() -> Self {
    Self {
      description: None,
      input: Arc::new(Input::new()),
      output: Arc::new(Output::new()),
      layers: Vec::new(),
      stack: Mutex::new(None),
    }
  }

  /// Creates a middleware and configures it with `definition`.
  pub fn define<F>(definition: F) -> StackworkResult<Self>
  where
    F: FnOnce(&mut Middleware) -> StackworkResult<()>,
  {
    let mut middleware = Self::new();
    definition(&mut middleware)?;
    Ok(middleware)
  }

  /// Sets the human-readable description of the middleware.
  pub fn desc(&mut self, text: impl Into<String>) -> &mut Self {
    self.invalidate();
    self.description = Some(text.into());
    self
  }

  /// Declares an option of the data that goes forth through the middleware.
  pub fn option(&mut self, field: FieldSpec) -> &mut Self {
    self.invalidate();
    Arc::make_mut(&mut self.input).option(field);
    self
  }

  /// Declares the result that goes back through the middleware.
  pub fn output(&mut self, field: FieldSpec) -> &mut Self {
    self.invalidate();
    Arc::make_mut(&mut self.output).declare(field);
    self
  }

  /// Adds a layer to the stack.
  ///
  /// Without an anchor the layer goes to the bottom of the stack. Fails with
  /// [`StackworkError::LayerNotUnique`] when the resolved name is taken and with
  /// [`StackworkError::LayerNotFound`] when the anchor is unknown; either way
  /// the registered layers are left untouched.
  pub fn use_layer(&mut self, registration: impl Into<Registration>) -> StackworkResult<&mut Self> {
    let registration = registration.into();
    let name = registration.resolved_name();
    let Registration { layer, before, filter, .. } = registration;

    if self.layers.iter().any(|existing| existing.name() == name) {
      return Err(StackworkError::LayerNotUnique {
        name,
        layer_type: layer.name().to_string(),
      });
    }

    let index = self.index_for(before.as_deref())?;
    event!(Level::DEBUG, layer = %name, layer_type = %layer.name(), index, "Registering layer.");

    self.invalidate();
    self.layers.insert(index, Arc::new(StackLayer::new(name, layer, filter)));
    Ok(self)
  }

  fn index_for(&self, before: Option<&str>) -> StackworkResult<usize> {
    let Some(anchor) = before else {
      return Ok(self.layers.len());
    };
    self
      .layers
      .iter()
      .position(|layer| layer.name() == anchor)
      .ok_or_else(|| StackworkError::LayerNotFound {
        key: anchor.to_string(),
      })
  }

  pub(crate) fn invalidate(&mut self) {
    if self.stack.get_mut().take().is_some() {
      event!(Level::DEBUG, "Cached stack invalidated.");
    }
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn input(&self) -> &Input {
    &self.input
  }

  pub fn output_contract(&self) -> &Output {
    &self.output
  }

  /// The registered layers, top to bottom.
  pub fn layers(&self) -> impl Iterator<Item = &StackLayer> {
    self.layers.iter().map(|layer| layer.as_ref())
  }

  pub fn layer_names(&self) -> Vec<&str> {
    self.layers().map(StackLayer::name).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.layers.is_empty()
  }
}

impl fmt::Debug for Middleware {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Middleware")
      .field("description", &self.description)
      .field("input", &self.input)
      .field("output", &self.output)
      .field("layers", &self.layer_names())
      .field("stack_cached", &self.stack.lock().is_some())
      .finish()
  }
}

impl fmt::Display for Middleware {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(desc) = &self.description {
      writeln!(f, "{}", desc)?;
    }
    write!(f, "{}", self.input)?;
    for layer in self.layers() {
      write!(f, "{}", layer)?;
    }
    write!(f, "{}", self.output)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn pass(name: &str) -> LayerType {
    LayerType::from_fn(name, |opts, next| {
      if next.is_bottom() {
        Ok(serde_json::Value::Object(opts.raw().clone()))
      } else {
        next.run(opts.raw().clone())
      }
    })
  }

  #[test]
  fn layers_are_appended_to_the_bottom_by_default() {
    let mut middleware = Middleware::new();
    middleware.use_layer(pass("A")).unwrap().use_layer(pass("B")).unwrap();
    assert_eq!(middleware.layer_names(), vec!["A", "B"]);
  }

  #[test]
  fn before_inserts_strictly_ahead_of_the_anchor() {
    let mut middleware = Middleware::new();
    middleware
      .use_layer(pass("A"))
      .and_then(|m| m.use_layer(pass("X")))
      .and_then(|m| m.use_layer(pass("C")))
      .and_then(|m| m.use_layer(Registration::new(pass("B")).before("X")))
      .unwrap();
    assert_eq!(middleware.layer_names(), vec!["A", "B", "X", "C"]);
  }

  #[test]
  fn resolved_name_prefers_the_explicit_name() {
    let registration = Registration::new(pass("Add")).named("add_three");
    assert_eq!(registration.resolved_name(), "add_three");
    assert_eq!(Registration::new(pass("Add")).resolved_name(), "Add");
  }

  #[test]
  fn duplicate_names_are_rejected_in_either_order() {
    let mut middleware = Middleware::new();
    middleware.use_layer(Registration::new(pass("Add")).named("add")).unwrap();
    let err = middleware.use_layer(Registration::new(pass("Other")).named("add")).unwrap_err();
    match err {
      StackworkError::LayerNotUnique { name, layer_type } => {
        assert_eq!(name, "add");
        assert_eq!(layer_type, "Other");
      }
      other => panic!("Expected LayerNotUnique, got {:?}", other),
    }

    let mut reversed = Middleware::new();
    reversed.use_layer(pass("Add")).unwrap();
    assert!(matches!(
      reversed.use_layer(pass("Add")),
      Err(StackworkError::LayerNotUnique { .. })
    ));
  }

  #[test]
  fn unknown_anchor_fails_without_mutation() {
    let mut middleware = Middleware::new();
    middleware.use_layer(pass("A")).unwrap();
    middleware.stack().unwrap();

    let err = middleware.use_layer(Registration::new(pass("B")).before("missing")).unwrap_err();
    assert!(matches!(err, StackworkError::LayerNotFound { key } if key == "missing"));
    assert_eq!(middleware.layer_names(), vec!["A"]);
    assert!(middleware.stack.lock().is_some(), "a failed registration keeps the cached stack");
  }

  #[test]
  fn every_mutation_drops_the_cached_stack() {
    let mut middleware = Middleware::new();
    middleware.use_layer(pass("A")).unwrap();

    let mutations: [Box<dyn Fn(&mut Middleware)>; 4] = [
      Box::new(|m: &mut Middleware| {
        m.desc("described");
      }),
      Box::new(|m: &mut Middleware| {
        m.option(FieldSpec::new("x").optional());
      }),
      Box::new(|m: &mut Middleware| {
        m.output(FieldSpec::new("result").optional());
      }),
      Box::new(|m: &mut Middleware| {
        let name = format!("L{}", m.layers.len());
        m.use_layer(pass(&name)).unwrap();
      }),
    ];

    for mutate in mutations.iter() {
      middleware.stack().unwrap();
      assert!(middleware.stack.lock().is_some());
      mutate(&mut middleware);
      assert!(middleware.stack.lock().is_none());
    }
  }

  #[test]
  fn contracts_are_isolated_per_middleware() {
    let mut first = Middleware::new();
    first.option(FieldSpec::new("only_in_first"));
    let second = Middleware::new();

    assert_eq!(first.input().schema().len(), 1);
    assert!(second.input().schema().is_empty());
  }

  #[test]
  fn built_stack_keeps_its_contract_snapshot() {
    let mut middleware = Middleware::new();
    middleware.option(FieldSpec::new("a").optional());
    middleware.use_layer(pass("A")).unwrap();
    let stack = middleware.stack().unwrap();

    middleware.option(FieldSpec::new("b").optional());
    assert_eq!(stack.input().map(|i| i.schema().len()), Some(1));
    assert_eq!(middleware.input().schema().len(), 2);
  }

  #[test]
  fn describes_the_whole_middleware() {
    let number = LayerType::from_fn("Add", |_opts, _next| Ok(json!(0)))
      .desc("Add number to a value")
      .option(FieldSpec::new("number").desc("Number to be added"))
      .unwrap();

    let mut middleware = Middleware::new();
    middleware
      .desc("Make some computations")
      .option(FieldSpec::new("value").desc("Source value below 10"))
      .output(FieldSpec::new("result").desc("The computation result"));
    middleware
      .use_layer(Registration::new(number).filter(|opts| {
        opts.insert("number".to_string(), json!(1));
      }))
      .unwrap();

    assert_eq!(
      middleware.to_string(),
      "Make some computations\n\
       Input options:\n  value: Source value below 10 (required)\n\
       Add: Add number to a value\n  number: 1 (Number to be added)\n\
       Output: The computation result\n"
    );
  }
}
