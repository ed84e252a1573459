// stackwork/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StackworkError {
  #[error("The stack is empty. Add layers to the middleware.")]
  EmptyStack,

  #[error(
    "The bottom of the stack is reached at layer '{layer}'. There are no more layers to yield. \
     Check the stack and ensure that its bottom layer doesn't yield."
  )]
  BottomLayer { layer: String },

  #[error(
    "The layer cannot be found in the stack by the key '{key}'. \
     Check the stack and provide a proper value for the option `before`."
  )]
  LayerNotFound { key: String },

  #[error(
    "The layer '{name}' ({layer_type}) is already added to the stack. \
     Use the option `named` to provide another name for the layer."
  )]
  LayerNotUnique { name: String, layer_type: String },

  #[error("The option name '{name}' of layer '{layer_type}' is reserved by stackwork. Choose another name for this option.")]
  ReservedOptionName { name: String, layer_type: String },

  #[error("Missing required option: {name}")]
  MissingRequiredOption { name: String },

  #[error("Coercion failed for option '{name}'. Source: {source}")]
  CoercionFailed {
    name: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Error in user-provided layer. Source: {source}")]
  LayerFailed {
    #[source]
    source: AnyhowError,
  },
}

// Layers are free to use `anyhow` internally. A StackworkError that travelled
// through `anyhow` (e.g. a continuation failure propagated with `?` inside an
// anyhow-returning helper) is unwrapped so it reaches the caller verbatim.
impl From<AnyhowError> for StackworkError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<StackworkError>() {
      Ok(stackwork_err) => stackwork_err,
      Err(source) => StackworkError::LayerFailed { source },
    }
  }
}

pub type StackworkResult<T, E = StackworkError> = std::result::Result<T, E>;
