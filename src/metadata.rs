//! Flattening of extracted document metadata into embedding input text.

use serde_json::{Map, Value};

/// Separator placed between labelled segments.
pub const SEGMENT_SEPARATOR: &str = " | ";

/// Metadata fields that contribute to the embedding text, in emission order.
///
/// Invoice fields come first, then contract fields. `summary` is shared by both document
/// types and always closes the text.
pub const EMBEDDED_FIELDS: [(&str, &str); 9] = [
    ("invoice_id", "Invoice ID"),
    ("seller_name", "Seller"),
    ("seller_address", "Address"),
    ("tax_id", "Tax ID"),
    ("subtotal_amount", "Subtotal"),
    ("tax_amount", "Tax"),
    ("contract_id", "Contract ID"),
    ("text", "Text"),
    ("summary", "Summary"),
];

/// Build the text embedded for a metadata record.
///
/// Fields that are missing or empty (`null`, `false`, `0`, `""`, `[]`, `{}`) are skipped.
/// Unrecognized keys never contribute.
pub fn embedding_text(metadata: &Map<String, Value>) -> String {
    EMBEDDED_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            metadata
                .get(*key)
                .filter(|value| is_present(value))
                .map(|value| format!("{label}: {}", render_value(value)))
        })
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

/// Render a metadata value for human-readable text: strings verbatim, everything else as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
