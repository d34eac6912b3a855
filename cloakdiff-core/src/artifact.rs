use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Trailing display annotation such as `" (masked)"` in `"config.json (masked)"`
static LABEL_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("valid annotation regex"));

const DOCUMENT_SUFFIXES: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];
const STRUCTURED_SUFFIXES: &[&str] = &["json", "geojson", "jsonld", "webmanifest"];

/// Rendering strategy for one pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    /// Lightweight markup (markdown)
    Document,
    /// JSON, pretty-printed
    StructuredData,
    /// Shown verbatim
    PlainText,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Document,
        ContentKind::StructuredData,
        ContentKind::PlainText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Document => "document",
            ContentKind::StructuredData => "structured-data",
            ContentKind::PlainText => "plain-text",
        }
    }

    /// Short badge shown next to a pane label
    pub fn badge(&self) -> &'static str {
        match self {
            ContentKind::Document => "md",
            ContentKind::StructuredData => "json",
            ContentKind::PlainText => "txt",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "markdown" | "md" => Ok(ContentKind::Document),
            "structured-data" | "structured" | "json" => Ok(ContentKind::StructuredData),
            "plain-text" | "plain" | "text" | "txt" => Ok(ContentKind::PlainText),
            other => Err(format!(
                "unknown content kind '{other}' (expected document, structured-data or plain-text)"
            )),
        }
    }
}

/// Decide the rendering strategy for a labeled artifact.
///
/// An explicit kind always wins. Otherwise the label's suffix decides, after
/// dropping a trailing parenthesized annotation. Total over all inputs:
/// anything unrecognized is plain text.
pub fn classify(label: &str, explicit: Option<ContentKind>) -> ContentKind {
    if let Some(kind) = explicit {
        return kind;
    }

    let name = LABEL_ANNOTATION.replace(label, "");
    let suffix = match name.trim_end().rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return ContentKind::PlainText,
    };

    if DOCUMENT_SUFFIXES.contains(&suffix.as_str()) {
        ContentKind::Document
    } else if STRUCTURED_SUFFIXES.contains(&suffix.as_str()) {
        ContentKind::StructuredData
    } else {
        ContentKind::PlainText
    }
}

/// One labeled text document shown in a pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub label: String,
    /// Kind supplied by the loader; `None` means "infer from the label"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContentKind>,
    /// Exact retrieved text; empty when there is no content
    #[serde(default)]
    pub raw: String,
}

impl Artifact {
    pub fn new(label: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: None,
            raw: raw.into(),
        }
    }

    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Kind after applying the classifier
    pub fn resolved_kind(&self) -> ContentKind {
        classify(&self.label, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(classify("report.md", None), ContentKind::Document);
        assert_eq!(classify("config.json", None), ContentKind::StructuredData);
        assert_eq!(classify("notes.txt", None), ContentKind::PlainText);
        assert_eq!(classify("README.MARKDOWN", None), ContentKind::Document);
    }

    #[test]
    fn test_explicit_kind_overrides_suffix() {
        assert_eq!(
            classify("data.csv", Some(ContentKind::PlainText)),
            ContentKind::PlainText
        );
        assert_eq!(
            classify("report.md", Some(ContentKind::StructuredData)),
            ContentKind::StructuredData
        );
    }

    #[test]
    fn test_classify_ignores_trailing_annotation() {
        assert_eq!(classify("config.json (masked)", None), ContentKind::StructuredData);
        assert_eq!(classify("README.md (masked)", None), ContentKind::Document);
    }

    #[test]
    fn test_classify_is_total() {
        for label in ["", ".", ".json", "json", "a.", "Makefile", "x.tar.gz", "(masked)", "é.md"] {
            let _ = classify(label, None);
        }
        assert_eq!(classify(".json", None), ContentKind::PlainText);
        assert_eq!(classify("a.", None), ContentKind::PlainText);
        assert_eq!(classify("é.md", None), ContentKind::Document);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("json".parse::<ContentKind>(), Ok(ContentKind::StructuredData));
        assert_eq!("Document".parse::<ContentKind>(), Ok(ContentKind::Document));
        assert!("yaml".parse::<ContentKind>().is_err());
        for kind in ContentKind::ALL {
            assert_eq!(kind.as_str().parse::<ContentKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_artifact_resolved_kind() {
        let artifact = Artifact::new("a.json", "{}");
        assert_eq!(artifact.resolved_kind(), ContentKind::StructuredData);
        let artifact = artifact.with_kind(ContentKind::PlainText);
        assert_eq!(artifact.resolved_kind(), ContentKind::PlainText);
    }
}
