use serde::Serialize;
use serde_json::Value;

/// Prefix of the visible notice shown above unparseable content
pub const PARSE_ERROR_NOTICE: &str = "Error parsing JSON";

const INDENT: &[u8] = b"  ";

/// Display projection of a JSON artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredBlock {
    /// Canonically re-serialized document
    Pretty(String),
    /// Parser rejected the input; `raw` is the untouched original
    ParseError { message: String, raw: String },
}

impl StructuredBlock {
    pub fn is_error(&self) -> bool {
        matches!(self, StructuredBlock::ParseError { .. })
    }

    /// Text exactly as it appears in the pane body
    pub fn display_text(&self) -> String {
        match self {
            StructuredBlock::Pretty(text) => text.clone(),
            StructuredBlock::ParseError { message, raw } => {
                format!("{PARSE_ERROR_NOTICE}: {message}\n\n{raw}")
            }
        }
    }
}

/// Parse `raw` as JSON and pretty-print it with two-space indentation.
///
/// Never fails: malformed input comes back as [`StructuredBlock::ParseError`].
pub fn render_structured(raw: &str) -> StructuredBlock {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "structured content failed to parse");
            return StructuredBlock::ParseError {
                message: err.to_string(),
                raw: raw.to_string(),
            };
        }
    };

    match to_pretty_string(&value) {
        Ok(text) => StructuredBlock::Pretty(text),
        Err(err) => StructuredBlock::ParseError {
            message: err.to_string(),
            raw: raw.to_string(),
        },
    }
}

fn to_pretty_string(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::with_capacity(128);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
