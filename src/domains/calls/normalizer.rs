//! Request normalization.
//!
//! Front-ends do not agree on how to encode a tool call. The same call can
//! arrive as a JSON object, as form fields with the parameters JSON-encoded
//! inside one of them, or with the tool name under `function` or `name`.
//! [`Normalizer::normalize`] recovers a [`CanonicalCall`] from all of these.
//!
//! Decoding runs as a fixed sequence of stages. Each stage either yields a
//! decoded object or reports that it did not apply; a malformed sub-field is
//! recorded as a [`MalformedEncoding`] note and degrades to an empty value.
//! The only hard failure is [`CallError::MissingToolName`].

use std::fmt;

use bytes::Bytes;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::error::{CallError, MalformedEncoding};
use crate::domains::tools::Parameters;

/// Keys checked for the tool name, in order.
const TOOL_NAME_KEYS: [&str; 3] = ["tool", "function", "name"];

const PARAMETERS_KEY: &str = "parameters";

/// Default length of the raw-body prefix included in diagnostic records.
pub const DEFAULT_PREVIEW_LIMIT: usize = 200;

// ============================================================================
// Request and call types
// ============================================================================

/// An inbound request body as received, with its declared content type.
#[derive(Debug, Clone)]
pub struct RawRequest {
    content_type: Option<String>,
    body: Bytes,
}

impl RawRequest {
    pub fn new(content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Build from HTTP headers. A non-UTF-8 content-type counts as absent.
    pub fn from_parts(headers: &HeaderMap, body: Bytes) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self { content_type, body }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// A tool call in its canonical form, independent of the wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalCall {
    pub tool: String,
    pub parameters: Parameters,
}

impl CanonicalCall {
    pub fn new(tool: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            tool: tool.into(),
            parameters,
        }
    }
}

/// Body encoding implied by the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    FormUrlEncoded,
    /// Absent or unrecognized content type.
    Unspecified,
}

impl BodyEncoding {
    /// Classify a content-type header value. Matching ignores case and any
    /// parameters such as `charset`.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return Self::Unspecified;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::FormUrlEncoded
        } else {
            Self::Unspecified
        }
    }
}

impl fmt::Display for BodyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::FormUrlEncoded => f.write_str("form-urlencoded"),
            Self::Unspecified => f.write_str("unspecified"),
        }
    }
}

// ============================================================================
// Decode stages
// ============================================================================

/// Outcome of a single decode stage.
#[derive(Debug)]
enum Stage {
    Decoded(Map<String, Value>),
    NotApplicable,
}

/// Which stage produced the object the call was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodedFrom {
    JsonBody,
    FormFields,
    BareJson,
    Nothing,
}

impl fmt::Display for DecodedFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonBody => f.write_str("JSON body"),
            Self::FormFields => f.write_str("form fields"),
            Self::BareJson => f.write_str("JSON body (content-type ignored)"),
            Self::Nothing => f.write_str("nothing"),
        }
    }
}

/// Decode a JSON object from bytes.
fn decode_json_object(body: &[u8], notes: &mut Vec<MalformedEncoding>) -> Stage {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Stage::Decoded(object),
        Ok(other) => {
            notes.push(MalformedEncoding::new(
                "body",
                format!("expected a JSON object, found {}", json_kind(&other)),
            ));
            Stage::NotApplicable
        }
        Err(e) => {
            notes.push(MalformedEncoding::new("body", e.to_string()));
            Stage::NotApplicable
        }
    }
}

/// Decode form fields. Only `tool` and `parameters` are carried over; for
/// repeated keys the first value wins.
fn decode_form(body: &[u8], notes: &mut Vec<MalformedEncoding>) -> Stage {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_bytes(body) {
        Ok(pairs) => pairs,
        Err(e) => {
            notes.push(MalformedEncoding::new("body", e.to_string()));
            return Stage::NotApplicable;
        }
    };

    let mut object = Map::new();
    if let Some(tool) = first_value(&pairs, "tool") {
        object.insert("tool".to_string(), Value::String(tool.to_string()));
    }
    if let Some(raw) = first_value(&pairs, PARAMETERS_KEY) {
        let parameters = decode_parameters_string(raw, notes);
        object.insert(PARAMETERS_KEY.to_string(), Value::Object(parameters));
    }
    Stage::Decoded(object)
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// JSON-decode a parameters string, degrading to an empty mapping.
fn decode_parameters_string(raw: &str, notes: &mut Vec<MalformedEncoding>) -> Parameters {
    if raw.trim().is_empty() {
        return Parameters::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(parameters)) => parameters,
        Ok(other) => {
            notes.push(MalformedEncoding::new(
                PARAMETERS_KEY,
                format!("expected a JSON object, found {}", json_kind(&other)),
            ));
            Parameters::new()
        }
        Err(e) => {
            notes.push(MalformedEncoding::new(PARAMETERS_KEY, e.to_string()));
            Parameters::new()
        }
    }
}

/// First tool-name key holding a non-empty string.
fn resolve_tool_name(object: &Map<String, Value>) -> Option<String> {
    TOOL_NAME_KEYS.iter().find_map(|key| match object.get(*key) {
        Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
        _ => None,
    })
}

/// Take the `parameters` field, degrading anything unusable to empty.
fn resolve_parameters(
    object: &mut Map<String, Value>,
    notes: &mut Vec<MalformedEncoding>,
) -> Parameters {
    match object.remove(PARAMETERS_KEY) {
        None | Some(Value::Null) => Parameters::new(),
        Some(Value::Object(parameters)) => parameters,
        // Some clients double-encode the parameters object
        Some(Value::String(raw)) => decode_parameters_string(&raw, notes),
        Some(other) => {
            notes.push(MalformedEncoding::new(
                PARAMETERS_KEY,
                format!("expected a JSON object, found {}", json_kind(&other)),
            ));
            Parameters::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lossy UTF-8 prefix of `bytes`, at most `limit` characters.
pub fn preview(bytes: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

// ============================================================================
// Normalizer
// ============================================================================

/// Converts a [`RawRequest`] into a [`CanonicalCall`].
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    preview_limit: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_LIMIT)
    }
}

impl Normalizer {
    /// Create a normalizer whose diagnostic records include at most
    /// `preview_limit` characters of the raw body.
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    /// Recover the canonical call from a request of any supported encoding.
    #[instrument(skip_all, fields(content_type = raw.content_type().unwrap_or("")))]
    pub fn normalize(&self, raw: &RawRequest) -> Result<CanonicalCall, CallError> {
        let encoding = BodyEncoding::from_content_type(raw.content_type());
        debug!(
            %encoding,
            body_len = raw.body().len(),
            body_preview = %preview(raw.body(), self.preview_limit),
            "Normalizing tool call"
        );

        let mut notes = Vec::new();
        let (mut object, source) = self.decode(raw, encoding, &mut notes);

        for note in &notes {
            warn!(%note, "Degraded malformed request field");
        }

        let Some(tool) = resolve_tool_name(&object) else {
            let detail = self.missing_tool_detail(raw, &object, source, &notes);
            warn!(%source, "No tool name found in request");
            return Err(CallError::MissingToolName { detail });
        };

        let mut parameter_notes = Vec::new();
        let parameters = resolve_parameters(&mut object, &mut parameter_notes);
        for note in &parameter_notes {
            warn!(%note, "Degraded malformed request field");
        }

        debug!(
            %tool,
            %source,
            parameters = ?parameters.keys().collect::<Vec<_>>(),
            "Resolved canonical call"
        );
        Ok(CanonicalCall { tool, parameters })
    }

    /// Run the decode stages in order: declared encoding first, then a
    /// best-effort JSON decode when nothing usable came out of it.
    fn decode(
        &self,
        raw: &RawRequest,
        encoding: BodyEncoding,
        notes: &mut Vec<MalformedEncoding>,
    ) -> (Map<String, Value>, DecodedFrom) {
        let declared = match encoding {
            BodyEncoding::Json => (
                decode_json_object(raw.body(), notes),
                DecodedFrom::JsonBody,
            ),
            BodyEncoding::FormUrlEncoded => (decode_form(raw.body(), notes), DecodedFrom::FormFields),
            BodyEncoding::Unspecified => (Stage::NotApplicable, DecodedFrom::Nothing),
        };

        match declared {
            (Stage::Decoded(object), source) if !object.is_empty() => {
                debug!(%source, keys = ?object.keys().collect::<Vec<_>>(), "Decoded request");
                return (object, source);
            }
            (stage, source) => {
                debug!(%source, ?stage, "Declared encoding produced no data");
            }
        }

        // The JSON stage already tried these exact bytes
        if encoding == BodyEncoding::Json || raw.body().iter().all(u8::is_ascii_whitespace) {
            return (Map::new(), DecodedFrom::Nothing);
        }

        match decode_json_object(raw.body(), notes) {
            Stage::Decoded(object) => {
                debug!(keys = ?object.keys().collect::<Vec<_>>(), "Decoded request as bare JSON");
                (object, DecodedFrom::BareJson)
            }
            Stage::NotApplicable => (Map::new(), DecodedFrom::Nothing),
        }
    }

    fn missing_tool_detail(
        &self,
        raw: &RawRequest,
        object: &Map<String, Value>,
        source: DecodedFrom,
        notes: &[MalformedEncoding],
    ) -> String {
        let mut detail = format!(
            "Expected a non-empty string in one of the fields {:?}. \
             content-type: {}; decoded from: {}; fields found: {:?}",
            TOOL_NAME_KEYS,
            raw.content_type().unwrap_or("(none)"),
            source,
            object.keys().collect::<Vec<_>>(),
        );
        for note in notes {
            detail.push_str("; ");
            detail.push_str(&note.to_string());
        }
        detail.push_str("; body starts with: ");
        detail.push_str(&preview(raw.body(), self.preview_limit));
        detail
    }
}

// ============================================================================
// Tests
// ============================================================================
