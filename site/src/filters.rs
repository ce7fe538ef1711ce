//! Template filters registered with tera.

use std::collections::HashMap;

use tera::{Tera, Value};

/// Filter name as used in templates: `{{ week | zero_pad }}`,
/// `{{ chapter | zero_pad(places=3) }}`.
pub const ZERO_PAD: &str = "zero_pad";
pub const DEFAULT_PLACES: usize = 2;

/// Register every site filter on `tera`.
pub fn register(tera: &mut Tera) {
    tera.register_filter(ZERO_PAD, zero_pad_filter);
}

/// Left-pad `text` with `'0'` to `places` characters. Never truncates.
pub fn zero_pad(text: &str, places: usize) -> String {
    format!("{text:0>places$}")
}

fn zero_pad_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        other => return Err(tera::Error::msg(format!("{ZERO_PAD} expects a number, got `{other}`"))),
    };

    let places = match args.get("places") {
        None => DEFAULT_PLACES,
        Some(raw) => {
            let Some(places) = raw.as_u64() else {
                return Err(tera::Error::msg(format!("{ZERO_PAD}: `places` must be a non-negative integer, got `{raw}`")));
            };
            usize::try_from(places).map_err(|_| tera::Error::msg(format!("{ZERO_PAD}: `places` is too large")))?
        }
    };

    Ok(Value::String(zero_pad(&text, places)))
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
