//! Payload coercion for backend responses.
//!
//! The backend stores money as `DECIMAL` and serializes it as strings, and omits empty
//! collections. Clients expect numbers and arrays.

use serde_json::{Map, Number, Value};

use crate::money::parse_major;

const NUMERIC_FIELDS: [&str; 6] = [
    "price",
    "sale_price",
    "salePrice",
    "compare_at_price",
    "amount",
    "total",
];

const LIST_FIELDS: [&str; 2] = ["images", "tags"];

/// Coerce a payload in place, recursing through arrays and objects.
pub fn normalize(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize),
        Value::Object(object) => normalize_object(object),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn normalize_object(object: &mut Map<String, Value>) {
    for (key, field) in object.iter_mut() {
        if NUMERIC_FIELDS.contains(&key.as_str()) {
            coerce_number(field);
        } else if LIST_FIELDS.contains(&key.as_str()) && field.is_null() {
            *field = Value::Array(Vec::new());
        } else {
            normalize(field);
        }
    }

    if looks_like_product(object) {
        for key in LIST_FIELDS {
            object
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()));
        }
    }
}

/// Only records that carry a price get missing `images`/`tags` filled in, so envelopes and
/// unrelated objects keep their shape.
fn looks_like_product(object: &Map<String, Value>) -> bool {
    object.contains_key("price") || object.contains_key("images") || object.contains_key("tags")
}

fn coerce_number(field: &mut Value) {
    if let Value::String(raw) = field
        && let Some(number) = parse_major(raw).and_then(Number::from_f64)
    {
        *field = Value::Number(number);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn coerces_price_strings_and_defaults_images() {
        let mut payload = json!({ "price": "19.99" });

        normalize(&mut payload);

        assert_eq!(payload, json!({ "price": 19.99, "images": [], "tags": [] }));
    }

    #[test]
    fn recurses_into_nested_collections() {
        let mut payload = json!({
            "products": [
                { "name": "Cards", "price": "5.00", "sale_price": "4.50", "images": null },
                { "name": "Book", "price": 12, "tags": ["kids"] }
            ],
            "total": "2"
        });

        normalize(&mut payload);

        assert_eq!(
            payload,
            json!({
                "products": [
                    { "name": "Cards", "price": 5.0, "sale_price": 4.5, "images": [], "tags": [] },
                    { "name": "Book", "price": 12, "tags": ["kids"], "images": [] }
                ],
                "total": 2.0
            })
        );
    }

    #[test]
    fn leaves_non_numeric_strings_alone() {
        let mut payload = json!({ "price": "call us", "title": "Hello" });

        normalize(&mut payload);

        assert_eq!(payload["price"], json!("call us"));
        assert_eq!(payload["title"], json!("Hello"));
    }

    #[test]
    fn leaves_plain_envelopes_untouched() {
        let mut payload = json!({ "posts": [], "count": 0 });

        normalize(&mut payload);

        assert_eq!(payload, json!({ "posts": [], "count": 0 }));
    }
}
