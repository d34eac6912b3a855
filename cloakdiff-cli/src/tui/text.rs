//! Mapping from rendered pane content to styled terminal text.
//!
//! Every document element kind has exactly one treatment here.

use cloakdiff_core::render::{Block, Inline, Rendered, StructuredBlock, PARSE_ERROR_NOTICE};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use super::ui::{ACCENT, DIM, HIGHLIGHT, SECONDARY};

const ERROR: Color = Color::Red;

/// Styled body text for one pane
pub fn pane_text(rendered: &Rendered) -> Text<'static> {
    let lines = match rendered {
        Rendered::Document(tree) => block_lines(&tree.blocks, true),
        Rendered::Structured(StructuredBlock::Pretty(text)) => raw_lines(text, Style::default()),
        Rendered::Structured(StructuredBlock::ParseError { message, raw }) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{PARSE_ERROR_NOTICE}: {message}"),
                    Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(raw_lines(raw, Style::default()));
            lines
        }
        Rendered::Plain(text) => raw_lines(text, Style::default()),
    };
    Text::from(lines)
}

fn raw_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

fn heading_style(level: u8) -> Style {
    match level {
        1 => Style::default()
            .fg(ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    }
}

fn block_lines(blocks: &[Block], spaced: bool) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for (idx, block) in blocks.iter().enumerate() {
        if spaced && idx > 0 {
            out.push(Line::from(""));
        }
        match block {
            Block::Heading { level, content } => {
                out.extend(inline_lines(content, heading_style(*level)));
            }
            Block::Paragraph(content) => out.extend(inline_lines(content, Style::default())),
            Block::List { start, items } => {
                for (n, item) in items.iter().enumerate() {
                    let bullet = match start {
                        Some(first) => format!("{}. ", first + n as u64),
                        None => "• ".to_string(),
                    };
                    let pad = " ".repeat(bullet.chars().count());
                    let body = block_lines(&item.blocks, false);
                    out.extend(prefixed(body, &bullet, &pad, Style::default().fg(SECONDARY)));
                }
            }
            Block::CodeBlock { code, .. } => {
                let code = code.strip_suffix('\n').unwrap_or(code);
                let body = raw_lines(code, Style::default().fg(HIGHLIGHT));
                out.extend(prefixed(body, "│ ", "│ ", Style::default().fg(DIM)));
            }
            Block::Quote(inner) => {
                let body = block_lines(inner, true);
                out.extend(prefixed(body, "▎ ", "▎ ", Style::default().fg(SECONDARY)));
            }
            Block::Rule => out.push(Line::from(Span::styled(
                "─".repeat(40),
                Style::default().fg(DIM),
            ))),
            Block::Literal(text) => {
                out.extend(raw_lines(text, Style::default().fg(DIM)));
            }
        }
    }
    out
}

fn prefixed(
    lines: Vec<Line<'static>>,
    first: &str,
    rest: &str,
    style: Style,
) -> Vec<Line<'static>> {
    let mut lines = lines;
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let marker = if idx == 0 { first } else { rest };
            let mut spans = vec![Span::styled(marker.to_string(), style)];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

fn inline_lines(inlines: &[Inline], base: Style) -> Vec<Line<'static>> {
    let mut lines = vec![Vec::new()];
    push_inlines(inlines, base, &mut lines);
    lines.into_iter().map(Line::from).collect()
}

fn push_inlines(inlines: &[Inline], style: Style, lines: &mut Vec<Vec<Span<'static>>>) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => push_text(text, style, lines),
            Inline::Strong(children) => {
                push_inlines(children, style.add_modifier(Modifier::BOLD), lines)
            }
            Inline::Emphasis(children) => {
                push_inlines(children, style.add_modifier(Modifier::ITALIC), lines)
            }
            Inline::Code(code) => push_text(code, style.fg(HIGHLIGHT), lines),
            Inline::Link { href, content } => {
                push_inlines(content, style.fg(ACCENT).add_modifier(Modifier::UNDERLINED), lines);
                push_text(&format!(" ({href})"), Style::default().fg(DIM), lines);
            }
            Inline::LineBreak => lines.push(Vec::new()),
            Inline::Literal(text) => push_text(text, style.fg(DIM), lines),
        }
    }
}

fn push_text(text: &str, style: Style, lines: &mut Vec<Vec<Span<'static>>>) {
    for (idx, part) in text.split('\n').enumerate() {
        if idx > 0 {
            lines.push(Vec::new());
        }
        if part.is_empty() {
            continue;
        }
        if let Some(current) = lines.last_mut() {
            current.push(Span::styled(part.to_string(), style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloakdiff_core::render::render;
    use cloakdiff_core::ContentKind;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_document_lines() {
        let rendered = render(
            ContentKind::Document,
            "# Title\n\n- one\n- **two**\n\n```\nlet x = 1;\n```",
        );
        let text = pane_text(&rendered);
        assert_eq!(
            plain(&text),
            vec!["Title", "", "• one", "• two", "", "│ let x = 1;"]
        );
        assert!(text.lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::BOLD | Modifier::UNDERLINED));
    }

    #[test]
    fn test_link_shows_target() {
        let text = pane_text(&render(ContentKind::Document, "[docs](https://a.test)"));
        assert_eq!(plain(&text), vec!["docs (https://a.test)"]);
        assert!(text.lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_parse_error_lines() {
        let text = pane_text(&render(ContentKind::StructuredData, "{\"x\":1,}"));
        let lines = plain(&text);
        assert!(lines[0].starts_with(PARSE_ERROR_NOTICE));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "{\"x\":1,}");
    }

    #[test]
    fn test_pretty_json_lines() {
        let text = pane_text(&render(ContentKind::StructuredData, "{\"x\":1}"));
        assert_eq!(plain(&text), vec!["{", "  \"x\": 1", "}"]);
    }
}
