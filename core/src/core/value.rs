// stackwork/src/core/value.rs

//! The payload model shared by contracts, layers and stacks.
//!
//! Options travel through the stack as a plain JSON object map; the single
//! result of a chain is a JSON value. Coercers decide what shape each value
//! takes, the stack itself never inspects them.

/// A single option value or a chain result.
pub type Value = serde_json::Value;

/// A named option payload (`name -> value`).
pub type Options = serde_json::Map<String, Value>;

/// Builds an [`Options`] map from `(name, value)` pairs.
///
/// ```
/// use serde_json::json;
/// let opts = stackwork::options([("value", json!("7")), ("from", json!("en"))]);
/// assert_eq!(opts.len(), 2);
/// ```
pub fn options<K, I>(pairs: I) -> Options
where
  K: Into<String>,
  I: IntoIterator<Item = (K, Value)>,
{
  pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
