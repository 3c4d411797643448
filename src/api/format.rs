use bson::{Bson, Document};
use serde_json::{json, Map, Number, Value};

use crate::database::InsertAck;

/// Convert a stored document into the public wire format.
///
/// Object ids become 24-char hex strings and datetimes become RFC 3339
/// strings, so clients see plain JSON rather than extended JSON wrappers.
pub fn document_to_api_value(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_api_value(value)))
            .collect::<Map<String, Value>>(),
    )
}

pub fn documents_to_api_value(documents: Vec<Document>) -> Value {
    Value::Array(documents.into_iter().map(document_to_api_value).collect())
}

/// Insert acknowledgment body: `{ "inserted_id": "<hex>" }`
pub fn insert_ack_to_api_value(ack: &InsertAck) -> Value {
    json!({ "inserted_id": ack.inserted_id.to_hex() })
}

fn bson_to_api_value(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            // Outside the RFC 3339 range; fall back to epoch millis
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_api_value).collect()),
        Bson::Document(document) => document_to_api_value(document),
        other => other.into_relaxed_extjson(),
    }
}
