//! Normalization of provider embedding payloads into flat vectors.

use super::EmbeddingClientError;
use serde_json::Value;

/// Recognized embedding payload shapes.
///
/// An outer `{"embedding": ...}` envelope (or the first entry of an
/// `{"embeddings": [...]}` batch) is removed before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingShape {
    /// `[0.1, 0.2, ...]`
    Flat(Vec<f32>),
    /// `{"values": [0.1, 0.2, ...]}`
    Keyed(Vec<f32>),
    /// Loosely typed sequence: numbers, numeric strings or `{"value": n}` items.
    Iterable(Vec<Value>),
}

impl EmbeddingShape {
    /// Classify a raw provider body, failing when no recognized shape matches.
    pub fn classify(body: Value) -> Result<Self, EmbeddingClientError> {
        match unwrap_envelope(body) {
            Value::Array(items) => Ok(match numeric(&items) {
                Some(vector) => Self::Flat(vector),
                None => Self::Iterable(items),
            }),
            Value::Object(mut fields) => match fields.remove("values") {
                Some(Value::Array(items)) => numeric(&items).map(Self::Keyed).ok_or_else(|| {
                    EmbeddingClientError::UnrecognizedShape(
                        "`values` holds non-numeric entries".into(),
                    )
                }),
                Some(other) => Err(EmbeddingClientError::UnrecognizedShape(format!(
                    "`values` is {}",
                    describe(&other)
                ))),
                None => Err(EmbeddingClientError::UnrecognizedShape(
                    "object without `values`".into(),
                )),
            },
            other => Err(EmbeddingClientError::UnrecognizedShape(describe(&other))),
        }
    }

    /// Flatten the shape into a vector.
    pub fn into_vector(self) -> Result<Vec<f32>, EmbeddingClientError> {
        match self {
            Self::Flat(vector) | Self::Keyed(vector) => Ok(vector),
            Self::Iterable(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    coerce(item).ok_or_else(|| {
                        EmbeddingClientError::UnrecognizedShape(format!(
                            "item {index} is not numeric: {item}"
                        ))
                    })
                })
                .collect(),
        }
    }
}

/// Extract a flat numeric vector from a provider embedding body.
pub fn normalize_embedding(body: Value) -> Result<Vec<f32>, EmbeddingClientError> {
    EmbeddingShape::classify(body)?.into_vector()
}

fn unwrap_envelope(body: Value) -> Value {
    let mut fields = match body {
        Value::Object(fields) => fields,
        other => return other,
    };
    if let Some(inner) = fields.remove("embedding") {
        return inner;
    }
    if let Some(Value::Array(batch)) = fields.get_mut("embeddings") {
        return if batch.is_empty() {
            Value::Null
        } else {
            batch.swap_remove(0)
        };
    }
    Value::Object(fields)
}

fn numeric(items: &[Value]) -> Option<Vec<f32>> {
    items
        .iter()
        .map(|item| item.as_f64().map(|n| n as f32))
        .collect()
}

fn coerce(item: &Value) -> Option<f32> {
    match item {
        Value::Number(number) => number.as_f64().map(|n| n as f32),
        Value::String(text) => text.trim().parse().ok(),
        Value::Object(fields) if fields.len() == 1 => fields.get("value").and_then(coerce),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "a boolean".into(),
        Value::Number(_) => "a single number".into(),
        Value::String(_) => "a string".into(),
        Value::Array(_) => "an array".into(),
        Value::Object(_) => "an object".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_recognized_shapes_normalize_to_the_same_vector() {
        let expected = vec![0.25_f32, -0.5, 1.0];
        let bodies = [
            json!([0.25, -0.5, 1.0]),
            json!({ "embedding": { "values": [0.25, -0.5, 1.0] } }),
            json!({ "embedding": [0.25, "-0.5", { "value": 1.0 }] }),
        ];

        for body in bodies {
            assert_eq!(normalize_embedding(body).expect("vector"), expected);
        }
    }

    #[test]
    fn classify_reports_each_variant() {
        assert!(matches!(
            EmbeddingShape::classify(json!([1.0])).unwrap(),
            EmbeddingShape::Flat(_)
        ));
        assert!(matches!(
            EmbeddingShape::classify(json!({ "values": [1.0] })).unwrap(),
            EmbeddingShape::Keyed(_)
        ));
        assert!(matches!(
            EmbeddingShape::classify(json!(["1.0"])).unwrap(),
            EmbeddingShape::Iterable(_)
        ));
    }

    #[test]
    fn batch_envelope_takes_first_entry() {
        let body = json!({ "embeddings": [{ "values": [3.0, 4.0] }, { "values": [9.0] }] });
        assert_eq!(normalize_embedding(body).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn unrecognized_shapes_fail_with_description() {
        let cases = [
            (json!({ "embedding": "not a vector" }), "a string"),
            (json!({ "unexpected": true }), "object without `values`"),
            (json!({ "embeddings": [] }), "null"),
            (json!(["abc"]), "item 0 is not numeric"),
        ];

        for (body, fragment) in cases {
            let error = normalize_embedding(body).expect_err("shape should be rejected");
            assert!(
                error.to_string().contains(fragment),
                "expected `{fragment}` in `{error}`"
            );
        }
    }
}
