// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use stackwork::{FieldSpec, LayerType, Options};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

// --- Common Coercers ---
pub fn to_s(value: Value) -> anyhow::Result<Value> {
  Ok(match value {
    Value::String(s) => json!(s),
    other => json!(other.to_string()),
  })
}

pub fn to_i(value: Value) -> anyhow::Result<Value> {
  match &value {
    Value::Number(n) => n
      .as_i64()
      .map(|i| json!(i))
      .ok_or_else(|| anyhow::anyhow!("{} is not an integer", n)),
    Value::String(s) => Ok(json!(s.trim().parse::<i64>()?)),
    other => anyhow::bail!("cannot convert {} to an integer", other),
  }
}

pub fn mod_10(value: Value) -> anyhow::Result<Value> {
  let i = to_i(value)?;
  Ok(json!(i.as_i64().unwrap_or_default() % 10))
}

// --- Common Layer Types ---
fn arithmetic(name: &str, desc: &str, op: fn(i64, i64) -> i64) -> LayerType {
  LayerType::from_fn(name, move |opts, next| {
    let value = op(opts.value::<i64>("value")?, opts.value::<i64>("number")?);
    tracing::debug!(target: "test_layers", value, "computed");
    next.run(opts.forward_with("value", json!(value)))
  })
  .desc(desc)
  .option(FieldSpec::new("number").coerce(to_i).desc("Number to apply"))
  .and_then(|layer| layer.option(FieldSpec::new("value").coerce(to_i).desc("Source value")))
  .expect("arithmetic layer options are valid")
}

pub fn add_layer() -> LayerType {
  arithmetic("Add", "Add number to a value", |value, number| value + number)
}

pub fn multiply_layer() -> LayerType {
  arithmetic("Multiply", "Multiply a value by a number", |value, number| value * number)
}

pub fn return_layer() -> LayerType {
  LayerType::from_fn("Return", |opts, _next| Ok(opts.get("value").cloned().unwrap_or(Value::Null)))
    .desc("Return a source value")
    .option(FieldSpec::new("value").coerce(to_i).desc("Value to return"))
    .expect("return layer options are valid")
}

/// A layer that always yields, whatever its position.
pub fn forward_layer(name: &str) -> LayerType {
  LayerType::from_fn(name, |opts, next| next.run(opts.raw().clone()))
}

pub fn fixed_number(number: i64) -> impl Fn(&mut Options) + Send + Sync + 'static {
  move |opts: &mut Options| {
    opts.insert("number".to_string(), json!(number));
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static FILTER_EXEC_COUNTER: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));
pub static COERCER_EXEC_COUNTER: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));

pub fn reset_counters() {
  FILTER_EXEC_COUNTER.store(0, Ordering::SeqCst);
  COERCER_EXEC_COUNTER.store(0, Ordering::SeqCst);
}
