//! Rendering strategies, one per [`ContentKind`].

pub mod document;
pub mod structured;

use crate::artifact::ContentKind;

pub use document::{is_navigable, render_document, Block, DocumentTree, Inline, ListItem};
pub use structured::{render_structured, StructuredBlock, PARSE_ERROR_NOTICE};

/// Display projection of one pane's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Document(DocumentTree),
    Structured(StructuredBlock),
    Plain(String),
}

/// Dispatch `raw` to the renderer for `kind`
pub fn render(kind: ContentKind, raw: &str) -> Rendered {
    match kind {
        ContentKind::Document => Rendered::Document(render_document(raw)),
        ContentKind::StructuredData => Rendered::Structured(render_structured(raw)),
        ContentKind::PlainText => Rendered::Plain(raw.to_string()),
    }
}

impl Rendered {
    /// Plain-text rendition for non-interactive output
    pub fn to_text(&self) -> String {
        match self {
            Rendered::Document(tree) => document_text(tree),
            Rendered::Structured(block) => block.display_text(),
            Rendered::Plain(text) => text.clone(),
        }
    }
}

fn document_text(tree: &DocumentTree) -> String {
    let mut lines = Vec::new();
    write_blocks(&tree.blocks, "", &mut lines);
    lines.join("\n")
}

fn write_blocks(blocks: &[Block], indent: &str, lines: &mut Vec<String>) {
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 && !indent.starts_with(' ') {
            lines.push(String::new());
        }
        match block {
            Block::Heading { level, content } => {
                let marks = "#".repeat(usize::from(*level));
                lines.push(format!("{indent}{marks} {}", inline_text(content)));
            }
            Block::Paragraph(content) => {
                for line in inline_text(content).lines() {
                    lines.push(format!("{indent}{line}"));
                }
            }
            Block::List { start, items } => {
                for (n, item) in items.iter().enumerate() {
                    let bullet = match start {
                        Some(first) => format!("{}. ", first + n as u64),
                        None => "- ".to_string(),
                    };
                    let mut item_lines = Vec::new();
                    let nested = format!("{indent}{}", " ".repeat(bullet.len()));
                    write_blocks(&item.blocks, &nested, &mut item_lines);
                    for (i, line) in item_lines.into_iter().enumerate() {
                        if i == 0 {
                            let body = line.strip_prefix(nested.as_str()).unwrap_or(&line);
                            lines.push(format!("{indent}{bullet}{body}"));
                        } else {
                            lines.push(line);
                        }
                    }
                }
            }
            Block::CodeBlock { code, .. } => {
                for line in code.lines() {
                    lines.push(format!("{indent}    {line}"));
                }
            }
            Block::Quote(inner) => {
                let mut quoted = Vec::new();
                write_blocks(inner, "", &mut quoted);
                for line in quoted {
                    lines.push(format!("{indent}> {line}"));
                }
            }
            Block::Rule => lines.push(format!("{indent}---")),
            Block::Literal(text) => {
                for line in text.lines() {
                    lines.push(format!("{indent}{line}"));
                }
            }
        }
    }
}

fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Literal(t) => out.push_str(t),
            Inline::Code(code) => {
                out.push('`');
                out.push_str(code);
                out.push('`');
            }
            Inline::Strong(children) | Inline::Emphasis(children) => {
                out.push_str(&inline_text(children))
            }
            Inline::Link { href, content } => {
                out.push_str(&inline_text(content));
                out.push_str(" <");
                out.push_str(href);
                out.push('>');
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_kind() {
        assert!(matches!(render(ContentKind::Document, "# a"), Rendered::Document(_)));
        assert!(matches!(
            render(ContentKind::StructuredData, "{}"),
            Rendered::Structured(StructuredBlock::Pretty(_))
        ));
        assert_eq!(
            render(ContentKind::PlainText, "  keep  \n"),
            Rendered::Plain("  keep  \n".to_string())
        );
    }

    #[test]
    fn test_document_text_rendition() {
        let rendered = render(
            ContentKind::Document,
            "# Title\n\n- one\n- two\n\n```\nx = 1\n```\n\n[site](https://a.b)",
        );
        assert_eq!(
            rendered.to_text(),
            "# Title\n\n- one\n- two\n\n    x = 1\n\nsite <https://a.b>"
        );
    }

    #[test]
    fn test_structured_error_text() {
        let rendered = render(ContentKind::StructuredData, "{oops");
        let text = rendered.to_text();
        assert!(text.starts_with(PARSE_ERROR_NOTICE));
        assert!(text.ends_with("{oops"));
    }
}
