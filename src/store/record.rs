//! Wire types for the tabular datastore's REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the attachment field that holds the cover image.
///
/// Case-sensitive; it must match the column name in the datastore schema.
pub const COVER_FIELD: &str = "coverURL";

/// One record as returned by the datastore: an id plus a loose field bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Opaque record id.
    #[serde(default)]
    pub id: String,
    /// Field values keyed by column name.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// Returns a field as trimmed text, or `None` when absent or blank.
    ///
    /// Numbers and booleans are rendered with their JSON spelling; lists
    /// and objects are not text.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.fields.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        Some(text).filter(|t| !t.is_empty())
    }

    /// Returns the attachment list stored under `key`, if it is a list.
    #[must_use]
    pub fn attachments(&self, key: &str) -> Option<&Vec<Value>> {
        self.fields.get(key).and_then(Value::as_array)
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    /// Records on this page.
    #[serde(default)]
    pub records: Vec<RawRecord>,
    /// Cursor for the next page; absent on the last page.
    #[serde(default)]
    pub offset: Option<String>,
}

/// Body of a create or update request.
#[derive(Debug, Clone, Serialize)]
pub struct WritePayload {
    /// Field values to write.
    pub fields: Map<String, Value>,
    /// Let the datastore coerce strings into select/date/attachment columns.
    pub typecast: bool,
}

impl WritePayload {
    /// Wraps fields with type coercion enabled.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            typecast: true,
        }
    }
}

/// Response of a delete request.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedRecord {
    /// Id of the removed record.
    pub id: String,
    /// Whether the datastore removed it.
    #[serde(default)]
    pub deleted: bool,
}
