use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, ContentKind};
use crate::render::{render, Rendered};

/// Which half of a comparison a pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left pane, conventionally the original artifact
    Left,
    /// Right pane, conventionally the masked artifact
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Role name shown in headers
    pub fn role(self) -> &'static str {
        match self {
            Side::Left => "original",
            Side::Right => "masked",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One artifact composed with its rendering and scroll position
#[derive(Debug, Clone)]
pub struct Pane {
    side: Side,
    artifact: Artifact,
    kind: ContentKind,
    rendered: Rendered,
    scroll: usize,
}

impl Pane {
    /// Render `artifact` with the given kind; the artifact's own kind hint is
    /// not consulted here because the session owns the kind policy
    pub fn new(side: Side, artifact: Artifact, kind: ContentKind) -> Self {
        let rendered = render(kind, &artifact.raw);
        Self {
            side,
            artifact,
            kind,
            rendered,
            scroll: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn label(&self) -> &str {
        &self.artifact.label
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    /// Text handed to the clipboard: always the raw artifact, never the
    /// rendered projection
    pub fn copy_payload(&self) -> &str {
        &self.artifact.raw
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll by `delta` lines, clamped to `[0, max]`
    pub fn scroll_by(&mut self, delta: isize, max: usize) {
        let next = if delta.is_negative() {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta.unsigned_abs())
        };
        self.scroll = next.min(max);
    }

    pub fn scroll_to(&mut self, line: usize, max: usize) {
        self.scroll = line.min(max);
    }
}
