// stackwork/examples/translator.rs

//! A translation middleware whose layers receive their configuration through
//! registration filters. The "translation" is a toy dictionary lookup.

use serde_json::{json, Value};
use stackwork::{options, FieldSpec, LayerType, Middleware, Registration, StackworkError};
use tracing::{info, warn};

fn to_s(value: Value) -> anyhow::Result<Value> {
  Ok(match value {
    Value::String(s) => json!(s),
    other => json!(other.to_string()),
  })
}

fn check_locales() -> Result<LayerType, StackworkError> {
  LayerType::from_fn("CheckLocales", |opts, next| {
    let available: Vec<String> = opts.value("available_locales")?;
    for key in ["from", "into"] {
      let locale: String = opts.value(key)?;
      if !available.contains(&locale) {
        warn!(locale = %locale, "Unsupported locale, returning the text untouched.");
        return Ok(opts.raw().get("text").cloned().unwrap_or(Value::Null));
      }
    }
    next.run(opts.raw().clone())
  })
  .desc("Skip the translation for unsupported locales")
  .option(FieldSpec::new("available_locales").desc("The locales the translator supports"))?
  .option(FieldSpec::new("from").coerce(to_s))?
  .option(FieldSpec::new("into").coerce(to_s))
}

fn drop_html() -> Result<LayerType, StackworkError> {
  LayerType::from_fn("DropHtml", |opts, next| {
    let text: String = opts.value("text")?;
    let mut plain = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
      match c {
        '<' => in_tag = true,
        '>' => in_tag = false,
        _ if !in_tag => plain.push(c),
        _ => {}
      }
    }
    next.run(opts.forward_with("text", json!(plain)))
  })
  .desc("Remove HTML tags from the text")
  .option(FieldSpec::new("text").coerce(to_s).desc("The text to clean"))
}

fn dictionary() -> Result<LayerType, StackworkError> {
  LayerType::from_fn("Dictionary", |opts, _next| {
    let text: String = opts.value("text")?;
    let words = opts.get("words").and_then(Value::as_object).cloned().unwrap_or_default();
    let translated: Vec<String> = text
      .split_whitespace()
      .map(|word| match words.get(word).and_then(Value::as_str) {
        Some(t) => t.to_string(),
        None => word.to_string(),
      })
      .collect();
    Ok(json!(translated.join(" ")))
  })
  .desc("Translate word by word")
  .option(FieldSpec::new("text").coerce(to_s))?
  .option(FieldSpec::new("words").desc("The dictionary"))
}

fn main() -> Result<(), StackworkError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let translator = Middleware::define(|m| {
    m.desc("Translate the string from one locale into another")
      .option(FieldSpec::new("text").coerce(to_s).desc("The text to translate"))
      .option(FieldSpec::new("from").coerce(to_s).desc("The source locale"))
      .option(FieldSpec::new("into").coerce(to_s).desc("The target locale"))
      .output(FieldSpec::new("result").coerce(to_s).desc("The result of the translation"));

    m.use_layer(Registration::new(check_locales()?).filter(|o| {
      o.insert("available_locales".into(), json!(["en", "de", "fr"]));
    }))?
    .use_layer(Registration::new(dictionary()?).filter(|o| {
      o.insert("words".into(), json!({ "Rust": "Rost", "is": "ist", "awesome!": "großartig!" }));
    }))?
    .use_layer(Registration::new(drop_html()?).named("drop_html").before("Dictionary"))?;
    Ok(())
  })?;

  info!("Translator:\n{}", translator);

  let text = "The <b>Rust</b> is awesome!";
  let german = translator.call(options([("text", json!(text)), ("from", json!("en")), ("into", json!("de"))]))?;
  info!("{} => {}", text, german);
  assert_eq!(german, json!("The Rost ist großartig!"));

  let georgian = translator.call(options([("text", json!(text)), ("from", json!("en")), ("into", json!("ka"))]))?;
  assert_eq!(georgian, json!(text));
  Ok(())
}
