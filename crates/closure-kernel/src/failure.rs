//! Structured failures with deterministic identifiers.
//!
//! A [`ClosureFailure`] is classified into exactly one [`FailureKind`] and
//! carries its evidence twice: as machine-readable `fields` (offending
//! names, compared values, counts) and as rendered `summary`/`details`/`hint`
//! text. Callers and tests assert on the kind and fields; humans read the
//! text via [`ClosureFailure::render`].
//!
//! Identifier algorithm:
//! 1. Build the canonical key `{schema: 1, kind, fields}`
//! 2. Serialize with sorted keys and no whitespace (RFC 8785 style)
//! 3. `failureId = "c1_" || base32hex_lower(SHA256(keyBytes))`
//!
//! Text never contributes to the identifier, so rewording a message does not
//! change which failures are considered the same.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Failure taxonomy of the verification layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FailureKind {
    NotClosureData,
    NonIntegerColumns,
    ColumnsRemoved,
    UnexpectedColumnNames,
    MissingColumns,
    ColumnsMisordered,
    DataAltered,
    InvalidScaleRange,
    MeanBelowScaleMin,
    MeanAboveScaleMax,
    WrongType,
    WrongLength,
    UnexpectedMissing,
    DifferentColumnCount,
    DifferentColumnNames,
}

impl FailureKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::NotClosureData => "NotClosureData",
            Self::NonIntegerColumns => "NonIntegerColumns",
            Self::ColumnsRemoved => "ColumnsRemoved",
            Self::UnexpectedColumnNames => "UnexpectedColumnNames",
            Self::MissingColumns => "MissingColumns",
            Self::ColumnsMisordered => "ColumnsMisordered",
            Self::DataAltered => "DataAltered",
            Self::InvalidScaleRange => "InvalidScaleRange",
            Self::MeanBelowScaleMin => "MeanBelowScaleMin",
            Self::MeanAboveScaleMax => "MeanAboveScaleMax",
            Self::WrongType => "WrongType",
            Self::WrongLength => "WrongLength",
            Self::UnexpectedMissing => "UnexpectedMissing",
            Self::DifferentColumnCount => "DifferentColumnCount",
            Self::DifferentColumnNames => "DifferentColumnNames",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, terminal failure of a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{kind}: {summary}")]
pub struct ClosureFailure {
    /// Deterministic id over `kind` and `fields`.
    pub failure_id: String,

    pub kind: FailureKind,

    /// One-line description.
    pub summary: String,

    /// Supporting lines, most specific first.
    #[serde(default)]
    pub details: Vec<String>,

    /// What the caller should do about it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Class-specific machine-readable evidence.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl ClosureFailure {
    pub fn new(kind: FailureKind, summary: impl Into<String>) -> Self {
        let fields = Map::new();
        Self {
            failure_id: compute_failure_id(kind, &fields),
            kind,
            summary: summary.into(),
            details: Vec::new(),
            hint: None,
            fields,
        }
    }

    pub fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach a structured field; the identifier is recomputed.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self.failure_id = compute_failure_id(self.kind, &self.fields);
        self
    }

    pub fn is(&self, kind: FailureKind) -> bool {
        self.kind == kind
    }

    /// A string-list field, e.g. offending column names.
    pub fn field_strings(&self, key: &str) -> Vec<String> {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Multi-line human rendering: summary, `✖` details, `ℹ` hint.
    pub fn render(&self) -> String {
        let mut out = self.summary.clone();
        for line in &self.details {
            out.push_str("\n✖ ");
            out.push_str(line);
        }
        if let Some(hint) = &self.hint {
            out.push_str("\nℹ ");
            out.push_str(hint);
        }
        out
    }
}

/// Hint shared by every shape failure.
pub(crate) fn unchanged_hint(producer: &str) -> String {
    format!("Please leave the output of `{producer}()` unchanged.")
}

/// `singular` for one item, `plural` otherwise.
pub(crate) fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// "`a`, `b`" for use in messages.
pub(crate) fn quote_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| format!("`{}`", n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn names_value<S: AsRef<str>>(names: &[S]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|n| Value::String(n.as_ref().to_string()))
            .collect(),
    )
}

/// The input is not tagged as combine output.
///
/// With `allow_pivot`, the message also names the long-format view as an
/// acceptable origin.
pub fn abort_not_closure_data(allow_pivot: bool) -> ClosureFailure {
    let (summary, origin) = if allow_pivot {
        (
            "Data must be the output of `closure_combine()` or `closure_pivot_longer()`.",
            "`closure_combine()` or `closure_pivot_longer()`",
        )
    } else {
        (
            "Data must be the output of `closure_combine()`.",
            "`closure_combine()`",
        )
    };
    ClosureFailure::new(FailureKind::NotClosureData, summary)
        .with_detail("The input does not carry a CLOSURE result tag it can be checked against.")
        .with_hint(format!(
            "Pass the value returned by {origin} directly, and leave it unchanged."
        ))
        .with_field("allowPivot", allow_pivot)
}

/// A tagged view no longer has the shape its producer gave it.
pub fn abort_closure_data_altered(kind: &str, producing_operation: &str) -> ClosureFailure {
    ClosureFailure::new(
        FailureKind::DataAltered,
        format!("The {kind} data were altered."),
    )
    .with_detail(format!(
        "They must have the exact shape returned by `{producing_operation}()`."
    ))
    .with_hint(unchanged_hint(producing_operation))
    .with_field("kind", kind)
    .with_field("operation", producing_operation)
}

/// Compute the identifier for a failure of `kind` with `fields`.
pub fn compute_failure_id(kind: FailureKind, fields: &Map<String, Value>) -> String {
    let mut key = Map::new();
    key.insert("schema".to_string(), Value::Number(1.into()));
    key.insert("kind".to_string(), Value::String(kind.name().to_string()));
    key.insert("fields".to_string(), Value::Object(fields.clone()));
    let key_bytes = jcs_serialize_value(&Value::Object(key));
    let hash = Sha256::digest(&key_bytes);
    format!("c1_{}", base32hex_lower(&hash))
}

/// Canonical JSON: sorted object keys, no insignificant whitespace.
fn jcs_serialize_value(value: &Value) -> Vec<u8> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            value.to_string().into_bytes()
        }
        Value::Array(arr) => {
            let mut buf = vec![b'['];
            for (i, v) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                buf.extend_from_slice(&jcs_serialize_value(v));
            }
            buf.push(b']');
            buf
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut buf = vec![b'{'];
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                buf.extend_from_slice(Value::String((*key).clone()).to_string().as_bytes());
                buf.push(b':');
                buf.extend_from_slice(&jcs_serialize_value(&map[*key]));
            }
            buf.push(b'}');
            buf
        }
    }
}

/// Lowercase base32hex (RFC 4648 alphabet `0-9a-v`) with the padding
/// stripped. Each 5-byte group becomes 8 digits; a short final group emits
/// only the digits its bits reach.
fn base32hex_lower(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    for chunk in bytes.chunks(5) {
        let mut group = [0_u8; 5];
        group[..chunk.len()].copy_from_slice(chunk);
        let word = group.iter().fold(0_u64, |acc, &b| (acc << 8) | u64::from(b));
        for i in 0..(chunk.len() * 8).div_ceil(5) {
            let digit = (word >> (35 - 5 * i)) & 0x1f;
            out.push(char::from(DIGITS[digit as usize]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_id_determinism() {
        let a = abort_closure_data_altered("summary", "closure_summarize");
        let b = abort_closure_data_altered("summary", "closure_summarize");
        assert_eq!(a.failure_id, b.failure_id);
        assert!(a.failure_id.starts_with("c1_"));
    }

    #[test]
    fn failure_id_tracks_fields_not_text() {
        let a = ClosureFailure::new(FailureKind::MissingColumns, "one wording")
            .with_field("missing", json!(["n2"]));
        let b = ClosureFailure::new(FailureKind::MissingColumns, "another wording")
            .with_detail("extra")
            .with_field("missing", json!(["n2"]));
        let c = ClosureFailure::new(FailureKind::MissingColumns, "one wording")
            .with_field("missing", json!(["n3"]));
        assert_eq!(a.failure_id, b.failure_id);
        assert_ne!(a.failure_id, c.failure_id);
    }

    #[test]
    fn failure_id_tracks_kind() {
        let a = ClosureFailure::new(FailureKind::WrongType, "x");
        let b = ClosureFailure::new(FailureKind::WrongLength, "x");
        assert_ne!(a.failure_id, b.failure_id);
    }

    #[test]
    fn not_closure_data_mentions_pivot_only_when_allowed() {
        let plain = abort_not_closure_data(false);
        let pivot = abort_not_closure_data(true);
        assert!(plain.is(FailureKind::NotClosureData));
        assert!(!plain.summary.contains("closure_pivot_longer"));
        assert!(pivot.summary.contains("closure_pivot_longer"));
        assert_eq!(pivot.fields["allowPivot"], true);
    }

    #[test]
    fn render_lists_details_then_hint() {
        let failure = abort_closure_data_altered("long-format", "closure_pivot_longer");
        let text = failure.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "The long-format data were altered.");
        assert!(lines[1].starts_with("✖ "));
        assert_eq!(
            lines[2],
            "ℹ Please leave the output of `closure_pivot_longer()` unchanged."
        );
    }

    #[test]
    fn json_shape() {
        let failure = ClosureFailure::new(FailureKind::WrongLength, "bad")
            .with_field("length", 2);
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "WrongLength");
        assert_eq!(json["fields"]["length"], 2);
        assert!(json.get("hint").is_none());
        let back: ClosureFailure = serde_json::from_value(json).unwrap();
        assert_eq!(back, failure);
    }

    #[test]
    fn base32hex_known_answers() {
        assert_eq!(base32hex_lower(b""), "");
        assert_eq!(base32hex_lower(b"f"), "co");
        assert_eq!(base32hex_lower(b"foobar"), "cpnmuoj1e8");
        assert_eq!(
            base32hex_lower(&Sha256::digest(b"")),
            "seoc8gkovge196nruj49irtp4gjqsgf4cidp6j54imchmu2in1ag"
        );
    }

    #[test]
    fn canonical_key_ordering() {
        let bytes = jcs_serialize_value(&json!({"schema": 1, "kind": "X", "fields": {}}));
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"fields":{},"kind":"X","schema":1}"#
        );
    }

    #[test]
    fn pluralize_by_count() {
        assert_eq!(pluralize(1, "column", "columns"), "column");
        assert_eq!(pluralize(2, "column", "columns"), "columns");
        assert_eq!(quote_names(&["n1", "x"]), "`n1`, `x`");
    }
}
