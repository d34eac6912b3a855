//! Standalone HTML page for a comparison session.
//!
//! The page is the one place where links become activatable, so every anchor
//! carries [`LINK_TARGET`] and [`LINK_REL`]. Hrefs that fail
//! [`is_navigable`] are written as inert text.

use std::fmt::Write as _;

use crate::pane::{Pane, Side};
use crate::render::document::{Block, Inline, LINK_REL, LINK_TARGET};
use crate::render::{is_navigable, Rendered, StructuredBlock, PARSE_ERROR_NOTICE};
use crate::session::ComparisonSession;

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#fafafa;color:#222}
.split{display:flex;height:100vh}
.pane{overflow:auto;padding:0 1rem;box-sizing:border-box}
.divider{width:4px;background:#ccc}
.pane-header{position:sticky;top:0;background:#fafafa;padding:.5rem 0;border-bottom:1px solid #ddd;font-weight:600}
.badge{font-size:.75rem;color:#666;margin-left:.5rem}
pre{background:#f0f0f0;padding:.75rem;overflow:auto}
.parse-error{color:#b00020;font-weight:600}
.literal{color:#666}
.h1{font-size:1.8rem}.h2{font-size:1.4rem}.h3{font-size:1.1rem}";

/// Render the session as a complete HTML document split at the session's
/// current layout ratio
pub fn export_html(session: &ComparisonSession) -> String {
    let ratio = session.layout().ratio();
    let left = session.pane(Side::Left);
    let right = session.pane(Side::Right);

    let mut out = String::with_capacity(left.artifact().raw.len() + right.artifact().raw.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        out,
        "<title>{} vs {}</title>",
        escape(left.label()),
        escape(right.label())
    );
    let _ = writeln!(out, "<style>\n{STYLE}\n</style>\n</head>\n<body>");
    out.push_str("<div class=\"split\">\n");
    write_pane(&mut out, left, ratio);
    out.push_str("<div class=\"divider\"></div>\n");
    write_pane(&mut out, right, 1.0 - ratio);
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn write_pane(out: &mut String, pane: &Pane, share: f64) {
    let _ = writeln!(
        out,
        "<section class=\"pane pane-{}\" style=\"flex:0 0 {:.2}%\">",
        pane.side(),
        share * 100.0
    );
    let _ = writeln!(
        out,
        "<div class=\"pane-header\">{}<span class=\"badge\">{}</span></div>",
        escape(pane.label()),
        pane.kind().badge()
    );

    match pane.rendered() {
        Rendered::Document(tree) => write_blocks(out, &tree.blocks),
        Rendered::Structured(StructuredBlock::Pretty(text)) => {
            let _ = writeln!(out, "<pre class=\"json\">{}</pre>", escape(text));
        }
        Rendered::Structured(StructuredBlock::ParseError { message, raw }) => {
            let _ = writeln!(
                out,
                "<p class=\"parse-error\">{PARSE_ERROR_NOTICE}: {}</p>\n<pre>{}</pre>",
                escape(message),
                escape(raw)
            );
        }
        Rendered::Plain(text) => {
            let _ = writeln!(out, "<pre>{}</pre>", escape(text));
        }
    }
    out.push_str("</section>\n");
}

fn write_blocks(out: &mut String, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading { level, content } => {
                let tier = (*level).clamp(1, 3);
                let _ = write!(out, "<h{level} class=\"h{tier}\">");
                write_inlines(out, content);
                let _ = writeln!(out, "</h{level}>");
            }
            Block::Paragraph(content) => {
                out.push_str("<p>");
                write_inlines(out, content);
                out.push_str("</p>\n");
            }
            Block::List { start, items } => {
                match start {
                    Some(1) => out.push_str("<ol>\n"),
                    Some(n) => {
                        let _ = writeln!(out, "<ol start=\"{n}\">");
                    }
                    None => out.push_str("<ul>\n"),
                }
                for item in items {
                    out.push_str("<li>");
                    write_blocks(out, &item.blocks);
                    out.push_str("</li>\n");
                }
                out.push_str(if start.is_some() { "</ol>\n" } else { "</ul>\n" });
            }
            Block::CodeBlock { language, code } => {
                match language {
                    Some(lang) => {
                        let _ = write!(out, "<pre><code class=\"language-{}\">", escape(lang));
                    }
                    None => out.push_str("<pre><code>"),
                }
                out.push_str(&escape(code));
                out.push_str("</code></pre>\n");
            }
            Block::Quote(inner) => {
                out.push_str("<blockquote>\n");
                write_blocks(out, inner);
                out.push_str("</blockquote>\n");
            }
            Block::Rule => out.push_str("<hr>\n"),
            Block::Literal(text) => {
                let _ = writeln!(out, "<pre class=\"literal\">{}</pre>", escape(text));
            }
        }
    }
}

fn write_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape(text)),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                write_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                write_inlines(out, children);
                out.push_str("</em>");
            }
            Inline::Code(code) => {
                let _ = write!(out, "<code>{}</code>", escape(code));
            }
            Inline::Link { href, content } if is_navigable(href) => {
                let _ = write!(
                    out,
                    "<a href=\"{}\" target=\"{LINK_TARGET}\" rel=\"{LINK_REL}\">",
                    escape(href)
                );
                write_inlines(out, content);
                out.push_str("</a>");
            }
            Inline::Link { href, content } => {
                write_inlines(out, content);
                let _ = write!(out, " <span class=\"literal\">({})</span>", escape(href));
            }
            Inline::LineBreak => out.push_str("<br>\n"),
            Inline::Literal(text) => {
                let _ = write!(out, "<span class=\"literal\">{}</span>", escape(text));
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;

    fn session(left: &str, right: &str, label: &str) -> ComparisonSession {
        ComparisonSession::new(Artifact::new(label, left), Artifact::new(label, right))
    }

    #[test]
    fn test_links_carry_target_and_rel() {
        let page = export_html(&session("[site](https://a.test/?q=1&r=2)", "x", "a.md"));
        assert!(page.contains(
            "<a href=\"https://a.test/?q=1&amp;r=2\" target=\"_blank\" rel=\"noopener noreferrer\">site</a>"
        ));
    }

    #[test]
    fn test_unsafe_scheme_is_not_an_anchor() {
        let page = export_html(&session("[x](javascript:alert(1))", "", "a.md"));
        assert!(!page.contains("<a href"));
        assert!(page.contains("javascript:alert(1)"));
    }

    #[test]
    fn test_content_is_escaped() {
        let page = export_html(&session("<script>alert(1)</script>", "", "a.txt"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_json_error_block() {
        let page = export_html(&session("{\"x\":1}", "{\"x\":1,}", "c.json"));
        assert!(page.contains("<pre class=\"json\">{\n  &quot;x&quot;: 1\n}</pre>"));
        assert!(page.contains("class=\"parse-error\">Error parsing JSON"));
        assert!(page.contains("{&quot;x&quot;:1,}"));
    }

    #[test]
    fn test_split_follows_layout_ratio() {
        let mut s = session("a", "b", "a.txt");
        s.layout_mut().set_ratio(0.6);
        let page = export_html(&s);
        assert!(page.contains("flex:0 0 60.00%"));
        assert!(page.contains("flex:0 0 40.00%"));
    }

    #[test]
    fn test_heading_tiers() {
        let page = export_html(&session("# a\n\n## b\n\n##### e", "", "a.md"));
        assert!(page.contains("<h1 class=\"h1\">a</h1>"));
        assert!(page.contains("<h2 class=\"h2\">b</h2>"));
        assert!(page.contains("<h5 class=\"h3\">e</h5>"));
    }
}
