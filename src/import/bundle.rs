//! Decoded contents of an exported session file

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::import::error::ImportError;

/// The fields of one exported session that the preview reads.
///
/// Entries are read leniently: a field of an unexpected type is treated as
/// absent. The entry itself stays in the bundle's document and is forwarded
/// untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionRecord {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub domain: Option<String>,
    pub order: Option<f64>,
    /// `createdAt` as found in the file
    pub created_at: Option<Value>,
}

impl SessionRecord {
    fn from_entry(entry: &Map<String, Value>) -> Self {
        let string = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            id: entry.get("id").filter(|v| !v.is_null()).cloned(),
            name: string("name"),
            domain: string("domain"),
            order: entry.get("order").and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            created_at: entry.get("createdAt").filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Creation time, if `createdAt` holds epoch milliseconds (integer or
    /// float) or an RFC 3339 string. Zero and empty values count as absent.
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        match self.created_at.as_ref()? {
            Value::Number(n) => {
                let ms = n.as_f64().filter(|ms| ms.is_finite() && *ms != 0.0)?;
                Utc.timestamp_millis_opt(ms as i64).single()
            }
            Value::String(s) if !s.is_empty() => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }
}

/// A validated import file: the original JSON document plus the preview view
/// of its `sessions` array.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBundle {
    document: Map<String, Value>,
    sessions: Vec<SessionRecord>,
}

impl ImportBundle {
    /// Decode and validate file text.
    ///
    /// Syntax errors are `MalformedPayload`. A document that is not an object,
    /// or whose `sessions` is missing, null, not an array, or holds a
    /// non-object entry, is `InvalidSchema`.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(text)?;

        let Value::Object(document) = value else {
            return Err(ImportError::InvalidSchema(
                "missing sessions array".to_string(),
            ));
        };

        let entries = match document.get("sessions") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(ImportError::InvalidSchema(
                    "missing sessions array".to_string(),
                ))
            }
        };

        let sessions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(entry) => Ok(SessionRecord::from_entry(entry)),
                _ => Err(ImportError::InvalidSchema(format!(
                    "session at index {} is not an object",
                    index
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { document, sessions })
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn export_date(&self) -> Option<&str> {
        self.document.get("exportDate").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    /// Serialize the document exactly as decoded (key order preserved,
    /// no display fallbacks applied).
    pub fn to_json(&self) -> Result<String, ImportError> {
        serde_json::to_string(&self.document)
            .map_err(|e| ImportError::MalformedPayload(e.to_string()))
    }
}
