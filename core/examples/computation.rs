// stackwork/examples/computation.rs

use serde_json::{json, Value};
use stackwork::{options, FieldSpec, LayerType, Middleware, Registration, StackworkError};
use tracing::info;

fn to_i(value: Value) -> anyhow::Result<Value> {
  match value {
    Value::Number(n) => Ok(Value::Number(n)),
    Value::String(s) => Ok(json!(s.trim().parse::<i64>()?)),
    other => anyhow::bail!("cannot convert {} to an integer", other),
  }
}

fn arithmetic(name: &str, desc: &str, op: fn(i64, i64) -> i64) -> Result<LayerType, StackworkError> {
  LayerType::from_fn(name, move |opts, next| {
    let value = op(opts.value("value")?, opts.value("number")?);
    info!(value, "Computed.");
    next.run(opts.forward_with("value", json!(value)))
  })
  .desc(desc)
  .option(FieldSpec::new("number").coerce(to_i).desc("Number to apply"))?
  .option(FieldSpec::new("value").coerce(to_i).desc("Source value"))
}

fn main() -> Result<(), StackworkError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Computation Middleware Example ---");

  let add = arithmetic("Add", "Add number to a value", |v, n| v + n)?;
  let multiply = arithmetic("Multiply", "Multiply a value by a number", |v, n| v * n)?;
  let ret = LayerType::from_fn("Return", |opts, _next| Ok(opts.get("value").cloned().unwrap_or(Value::Null)))
    .desc("Return a source value")
    .option(FieldSpec::new("value").coerce(to_i).desc("Value to return"))?;

  let middleware = Middleware::define(|m| {
    m.desc("Make some computations")
      .option(
        FieldSpec::new("value")
          .coerce(to_i)
          .coerce(|v| Ok(json!(v.as_i64().unwrap_or_default() % 10)))
          .desc("Source value below 10"),
      )
      .output(
        FieldSpec::new("result")
          .coerce(|v| match v {
            Value::String(_) => Ok(v),
            other => Ok(json!(other.to_string())),
          })
          .desc("The computation result"),
      );

    m.use_layer(Registration::new(add.clone()).filter(|o| {
      o.insert("number".into(), json!(1));
    }))?
    .use_layer(Registration::new(add).named("add_three").filter(|o| {
      o.insert("number".into(), json!(3));
    }))?
    .use_layer(ret)?
    .use_layer(Registration::new(multiply).before("add_three").filter(|o| {
      o.insert("number".into(), json!(2));
    }))?;
    Ok(())
  })?;

  info!("Middleware:\n{}", middleware);

  let result = middleware.call(options([("value", json!("7"))]))?;
  info!("Result: {}", result);

  // Every layer sees the value through the input contract:
  // (7 + 1) * 2 = 16, which add_three receives as 6, so 6 + 3 = 9.
  assert_eq!(result, json!("9"));
  Ok(())
}
