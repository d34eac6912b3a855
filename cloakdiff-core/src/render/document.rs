//! Markdown document renderer.
//!
//! Produces a toolkit-agnostic tree over a closed set of element kinds. Each
//! front end (terminal, HTML export) maps every kind to exactly one visual
//! treatment. Markup outside that set is kept as [`Inline::Literal`] or
//! [`Block::Literal`] holding the original source span.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Browsing context a followed link must open in
pub const LINK_TARGET: &str = "_blank";
/// Link relation that withholds the opener and referrer from the target
pub const LINK_REL: &str = "noopener noreferrer";

const NAVIGABLE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Deepest block or inline nesting kept as structure; anything deeper is
/// emitted verbatim as a literal.
pub const MAX_NESTING: usize = 64;

/// Rendered markdown document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentTree {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level is 1..=6; front ends style 1, 2 and 3+ as distinct tiers
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    List {
        /// Starting number for ordered lists
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Quote(Vec<Block>),
    Rule,
    /// Unsupported block markup, verbatim
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Code(String),
    Link { href: String, content: Vec<Inline> },
    LineBreak,
    /// Unsupported inline markup, verbatim
    Literal(String),
}

impl Inline {
    /// Concatenated visible text
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(t) | Inline::Code(t) | Inline::Literal(t) => out.push_str(t),
                Inline::Strong(children) | Inline::Emphasis(children) => {
                    out.push_str(&Inline::plain_text(children))
                }
                Inline::Link { content, .. } => out.push_str(&Inline::plain_text(content)),
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }
}

/// Whether a link target may be followed at all.
///
/// Relative references and http, https or mailto URLs are navigable; any other
/// scheme (`javascript:`, `file:`, `data:` ...) stays inert text.
pub fn is_navigable(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() {
        return false;
    }
    match href.split_once(':') {
        Some((scheme, _)) if is_scheme(scheme) => {
            NAVIGABLE_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
        }
        _ => true,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Render markdown into a [`DocumentTree`]. Pure and deterministic.
pub fn render_document(raw: &str) -> DocumentTree {
    let parser = Parser::new_ext(raw, Options::empty()).into_offset_iter();
    let mut builder = TreeBuilder::new(raw);
    for (event, range) in parser {
        builder.event(event, range);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineKind {
    Paragraph,
    Heading(u8),
    Strong,
    Emphasis,
    Link,
}

#[derive(Debug)]
struct InlineFrame {
    kind: InlineKind,
    /// Opened for loose text (tight list items) rather than by a paragraph tag
    implicit: bool,
    href: String,
    children: Vec<Inline>,
}

struct TreeBuilder<'a> {
    source: &'a str,
    /// Block containers: root, then one per open quote or list item
    containers: Vec<Vec<Block>>,
    lists: Vec<(Option<u64>, Vec<ListItem>)>,
    inlines: Vec<InlineFrame>,
    code: Option<(Option<String>, String)>,
    /// Nesting depth inside markup already emitted as a literal
    skip_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            containers: vec![Vec::new()],
            lists: Vec::new(),
            inlines: Vec::new(),
            code: None,
            skip_depth: 0,
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        if self.skip_depth > 0 {
            match event {
                Event::Start(_) => self.skip_depth += 1,
                Event::End(_) => self.skip_depth -= 1,
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag, range),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_inline(Inline::Text(text.to_string()));
                }
            }
            Event::Code(code) => self.push_inline(Inline::Code(code.to_string())),
            Event::SoftBreak => self.push_inline(Inline::Text(" ".to_string())),
            Event::HardBreak => self.push_inline(Inline::LineBreak),
            Event::Rule => {
                self.flush_implicit();
                self.emit(Block::Rule);
            }
            Event::Html(html) => {
                self.flush_implicit();
                self.emit(Block::Literal(html.trim_end().to_string()));
            }
            Event::InlineHtml(html) => self.push_inline(Inline::Literal(html.to_string())),
            _ => {
                let span = self.span(&range);
                self.push_inline(Inline::Literal(span));
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Paragraph => {
                self.flush_implicit();
                self.open(InlineKind::Paragraph, String::new());
            }
            Tag::Heading { level, .. } => {
                self.flush_implicit();
                self.open(InlineKind::Heading(heading_level(level)), String::new());
            }
            Tag::Strong | Tag::Emphasis | Tag::Link { .. }
                if self.inlines.len() > MAX_NESTING =>
            {
                self.skip_as_literal(&range);
            }
            Tag::Strong => self.open_nested(InlineKind::Strong, String::new()),
            Tag::Emphasis => self.open_nested(InlineKind::Emphasis, String::new()),
            Tag::Link { dest_url, .. } => self.open_nested(InlineKind::Link, dest_url.to_string()),
            Tag::CodeBlock(kind) => {
                self.flush_implicit();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(_) | Tag::Item | Tag::BlockQuote(_)
                if self.containers.len() + self.lists.len() > MAX_NESTING =>
            {
                self.flush_implicit();
                self.skip_as_literal(&range);
            }
            Tag::List(start) => {
                self.flush_implicit();
                self.lists.push((start, Vec::new()));
            }
            Tag::Item | Tag::BlockQuote(_) => {
                self.flush_implicit();
                self.containers.push(Vec::new());
            }
            Tag::HtmlBlock => {
                self.flush_implicit();
                let span = self.span(&range);
                self.emit(Block::Literal(span.trim_end().to_string()));
                self.skip_depth = 1;
            }
            Tag::Image { .. } => {
                let span = self.span(&range);
                self.push_inline(Inline::Literal(span));
                self.skip_depth = 1;
            }
            _ => self.skip_as_literal(&range),
        }
    }

    /// Keep the source of the element starting at `range` verbatim and drop
    /// its events up to the matching end tag
    fn skip_as_literal(&mut self, range: &Range<usize>) {
        let span = self.span(range);
        if self.inlines.is_empty() {
            self.emit(Block::Literal(span.trim_end().to_string()));
        } else {
            self.push_inline(Inline::Literal(span));
        }
        self.skip_depth = 1;
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if let Some(frame) = self.close() {
                    self.emit(Block::Paragraph(frame.children));
                }
            }
            TagEnd::Heading(_) => {
                if let Some(frame) = self.close() {
                    let level = match frame.kind {
                        InlineKind::Heading(level) => level,
                        _ => 1,
                    };
                    self.emit(Block::Heading {
                        level,
                        content: frame.children,
                    });
                }
            }
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Link => {
                if let Some(frame) = self.close() {
                    let inline = match frame.kind {
                        InlineKind::Strong => Inline::Strong(frame.children),
                        InlineKind::Emphasis => Inline::Emphasis(frame.children),
                        InlineKind::Link => Inline::Link {
                            href: frame.href,
                            content: frame.children,
                        },
                        _ => Inline::Text(Inline::plain_text(&frame.children)),
                    };
                    self.push_inline(inline);
                }
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    self.emit(Block::CodeBlock { language, code });
                }
            }
            TagEnd::List(_) => {
                if let Some((start, items)) = self.lists.pop() {
                    self.emit(Block::List { start, items });
                }
            }
            TagEnd::Item => {
                self.flush_implicit();
                let blocks = self.pop_container();
                if let Some((_, items)) = self.lists.last_mut() {
                    items.push(ListItem { blocks });
                } else {
                    for block in blocks {
                        self.emit(block);
                    }
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_implicit();
                let blocks = self.pop_container();
                self.emit(Block::Quote(blocks));
            }
            _ => {}
        }
    }

    fn open(&mut self, kind: InlineKind, href: String) {
        self.inlines.push(InlineFrame {
            kind,
            implicit: false,
            href,
            children: Vec::new(),
        });
    }

    /// Open an inline container, starting an implicit paragraph if needed
    fn open_nested(&mut self, kind: InlineKind, href: String) {
        if self.inlines.is_empty() {
            self.open_implicit();
        }
        self.open(kind, href);
    }

    fn open_implicit(&mut self) {
        self.inlines.push(InlineFrame {
            kind: InlineKind::Paragraph,
            implicit: true,
            href: String::new(),
            children: Vec::new(),
        });
    }

    fn close(&mut self) -> Option<InlineFrame> {
        self.inlines.pop()
    }

    fn push_inline(&mut self, inline: Inline) {
        if self.inlines.is_empty() {
            self.open_implicit();
        }
        let Some(frame) = self.inlines.last_mut() else {
            return;
        };
        match (frame.children.last_mut(), inline) {
            (Some(Inline::Text(prev)), Inline::Text(next)) => prev.push_str(&next),
            (_, inline) => frame.children.push(inline),
        }
    }

    /// Close a paragraph opened for loose text, if that is what is on top
    fn flush_implicit(&mut self) {
        if matches!(self.inlines.last(), Some(frame) if frame.implicit) {
            if let Some(frame) = self.inlines.pop() {
                self.emit(Block::Paragraph(frame.children));
            }
        }
    }

    fn emit(&mut self, block: Block) {
        if let Some(container) = self.containers.last_mut() {
            container.push(block);
        }
    }

    fn pop_container(&mut self) -> Vec<Block> {
        if self.containers.len() > 1 {
            self.containers.pop().unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    fn span(&self, range: &Range<usize>) -> String {
        self.source.get(range.clone()).unwrap_or_default().to_string()
    }

    fn finish(mut self) -> DocumentTree {
        // Parser output is balanced; anything still open is folded into text
        while let Some(frame) = self.inlines.pop() {
            let inline = Inline::Text(Inline::plain_text(&frame.children));
            if self.inlines.is_empty() {
                self.emit(Block::Paragraph(vec![inline]));
            } else {
                self.push_inline(inline);
            }
        }
        if let Some((language, code)) = self.code.take() {
            self.emit(Block::CodeBlock { language, code });
        }
        while self.containers.len() > 1 {
            let blocks = self.pop_container();
            self.emit(Block::Quote(blocks));
        }
        DocumentTree {
            blocks: self.containers.pop().unwrap_or_default(),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let tree = render_document("# Title\n\nSome text.\n\n## Sub\n\n### Third\n");
        assert_eq!(
            tree.blocks,
            vec![
                Block::Heading { level: 1, content: vec![text("Title")] },
                Block::Paragraph(vec![text("Some text.")]),
                Block::Heading { level: 2, content: vec![text("Sub")] },
                Block::Heading { level: 3, content: vec![text("Third")] },
            ]
        );
    }

    #[test]
    fn test_tight_list_with_strong() {
        let tree = render_document("- **Fast**: quick\n- plain\n");
        let Block::List { start, items } = &tree.blocks[0] else {
            panic!("expected list, got {:?}", tree.blocks);
        };
        assert_eq!(*start, None);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].blocks,
            vec![Block::Paragraph(vec![
                Inline::Strong(vec![text("Fast")]),
                text(": quick"),
            ])]
        );
        assert_eq!(items[1].blocks, vec![Block::Paragraph(vec![text("plain")])]);
    }

    #[test]
    fn test_fenced_code_block_keeps_language() {
        let tree = render_document("```bash\nnpm install\nnpm start\n```\n");
        assert_eq!(
            tree.blocks,
            vec![Block::CodeBlock {
                language: Some("bash".to_string()),
                code: "npm install\nnpm start\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_inline_code_in_heading() {
        let tree = render_document("### `getData()`\n");
        assert_eq!(
            tree.blocks,
            vec![Block::Heading {
                level: 3,
                content: vec![Inline::Code("getData()".to_string())],
            }]
        );
    }

    #[test]
    fn test_links_and_emphasis() {
        let tree = render_document("[MIT](https://choosealicense.com/licenses/mit/) is *fine*");
        assert_eq!(
            tree.blocks,
            vec![Block::Paragraph(vec![
                Inline::Link {
                    href: "https://choosealicense.com/licenses/mit/".to_string(),
                    content: vec![text("MIT")],
                },
                text(" is "),
                Inline::Emphasis(vec![text("fine")]),
            ])]
        );
    }

    #[test]
    fn test_unresolved_reference_stays_text() {
        let tree = render_document("# [REDACTED]\n");
        assert_eq!(
            tree.blocks,
            vec![Block::Heading { level: 1, content: vec![text("[REDACTED]")] }]
        );
    }

    #[test]
    fn test_unsupported_markup_degrades_to_literal() {
        let tree = render_document("before ![logo](img.png) after\n\n<div>raw</div>\n");
        assert_eq!(
            tree.blocks[0],
            Block::Paragraph(vec![
                text("before "),
                Inline::Literal("![logo](img.png)".to_string()),
                text(" after"),
            ])
        );
        assert_eq!(tree.blocks[1], Block::Literal("<div>raw</div>".to_string()));
    }

    #[test]
    fn test_blockquote_and_ordered_list() {
        let tree = render_document("> quoted\n\n3. three\n4. four\n");
        assert_eq!(
            tree.blocks[0],
            Block::Quote(vec![Block::Paragraph(vec![text("quoted")])])
        );
        let Block::List { start, items } = &tree.blocks[1] else {
            panic!("expected list");
        };
        assert_eq!(*start, Some(3));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_render_is_deterministic() {
        let raw = "# A\n\n- x\n  - nested `y`\n\n```\ncode\n```\n";
        assert_eq!(render_document(raw), render_document(raw));
    }

    fn block_depth(blocks: &[Block]) -> usize {
        blocks
            .iter()
            .map(|block| match block {
                Block::Quote(inner) => 1 + block_depth(inner),
                Block::List { items, .. } => {
                    1 + items.iter().map(|item| block_depth(&item.blocks)).max().unwrap_or(0)
                }
                _ => 1,
            })
            .max()
            .unwrap_or(0)
    }

    fn contains_literal(blocks: &[Block]) -> bool {
        blocks.iter().any(|block| match block {
            Block::Literal(_) => true,
            Block::Quote(inner) => contains_literal(inner),
            Block::List { items, .. } => items.iter().any(|item| contains_literal(&item.blocks)),
            _ => false,
        })
    }

    #[test]
    fn test_deep_blockquote_is_capped() {
        let tree = render_document(&">".repeat(50_000));
        assert!(block_depth(&tree.blocks) <= MAX_NESTING + 1);
        assert!(contains_literal(&tree.blocks));
    }

    #[test]
    fn test_deep_list_is_capped() {
        let raw = format!("{}item", "- ".repeat(500));
        let tree = render_document(&raw);
        assert!(block_depth(&tree.blocks) <= 2 * MAX_NESTING);
        assert!(contains_literal(&tree.blocks));
    }

    #[test]
    fn test_shallow_nesting_keeps_structure() {
        let raw = format!("{}deep", "> ".repeat(10));
        let tree = render_document(&raw);
        assert_eq!(block_depth(&tree.blocks), 11);
        assert!(!contains_literal(&tree.blocks));
    }

    #[test]
    fn test_deep_emphasis_is_capped() {
        fn inline_depth(inlines: &[Inline]) -> usize {
            inlines
                .iter()
                .map(|inline| match inline {
                    Inline::Strong(inner) | Inline::Emphasis(inner) => 1 + inline_depth(inner),
                    _ => 1,
                })
                .max()
                .unwrap_or(0)
        }

        let stars = "*".repeat(1_000);
        let tree = render_document(&format!("{stars}x{stars}"));
        let Some(Block::Paragraph(content)) = tree.blocks.first() else {
            panic!("expected paragraph, got {:?}", tree.blocks);
        };
        assert!(inline_depth(content) <= MAX_NESTING + 1);
    }

    #[test]
    fn test_empty_document() {
        assert!(render_document("").blocks.is_empty());
    }

    #[test]
    fn test_navigable_links() {
        assert!(is_navigable("https://example.com"));
        assert!(is_navigable("HTTP://example.com"));
        assert!(is_navigable("mailto:a@b.c"));
        assert!(is_navigable("../docs/readme.md"));
        assert!(is_navigable("#section"));
        assert!(!is_navigable("javascript:alert(1)"));
        assert!(!is_navigable("file:///etc/passwd"));
        assert!(!is_navigable("data:text/html,hi"));
        assert!(!is_navigable("  "));
    }
}
