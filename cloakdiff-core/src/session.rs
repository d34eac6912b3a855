use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use crate::artifact::{Artifact, ContentKind};
use crate::clipboard::{ClipboardSink, CopyAcknowledgment, CopyOutcome};
use crate::layout::SplitLayout;
use crate::pane::{Pane, Side};

/// Two artifacts compared under one layout and one acknowledgment state.
///
/// Both panes always render with the same kind. Layout and acknowledgment
/// state belong to this instance; separate sessions never share them.
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    id: Uuid,
    kind: ContentKind,
    left: Pane,
    right: Pane,
    layout: SplitLayout,
    ack: CopyAcknowledgment,
}

impl ComparisonSession {
    /// Session with default layout and acknowledgment timeout
    pub fn new(left: Artifact, right: Artifact) -> Self {
        Self::with_parts(left, right, None, SplitLayout::default(), CopyAcknowledgment::default())
    }

    /// `kind` forces the policy; otherwise the left artifact decides it
    pub fn with_parts(
        left: Artifact,
        right: Artifact,
        kind: Option<ContentKind>,
        layout: SplitLayout,
        ack: CopyAcknowledgment,
    ) -> Self {
        let id = Uuid::new_v4();
        let kind = resolve_kind(&left, &right, kind);
        info!(session = %id, kind = %kind, left = %left.label, right = %right.label, "comparison session started");
        Self {
            id,
            kind,
            left: Pane::new(Side::Left, left, kind),
            right: Pane::new(Side::Right, right, kind),
            layout,
            ack,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn pane(&self, side: Side) -> &Pane {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, side: Side) -> &mut Pane {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn layout(&self) -> &SplitLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut SplitLayout {
        &mut self.layout
    }

    pub fn ack(&self) -> &CopyAcknowledgment {
        &self.ack
    }

    /// Copy the raw artifact behind `side`
    pub fn copy<S: ClipboardSink + ?Sized>(
        &mut self,
        side: Side,
        sink: &mut S,
        now: Instant,
    ) -> CopyOutcome {
        let pane = match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        };
        self.ack.copy(sink, pane.copy_payload(), side, now)
    }

    /// Advance time; returns whether the acknowledgment changed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.ack.expire(now)
    }

    /// Swap in a new pair of artifacts. The layout is kept; scroll positions
    /// and the acknowledgment are reset.
    pub fn replace_artifacts(&mut self, left: Artifact, right: Artifact, kind: Option<ContentKind>) {
        self.kind = resolve_kind(&left, &right, kind);
        self.left = Pane::new(Side::Left, left, self.kind);
        self.right = Pane::new(Side::Right, right, self.kind);
        self.ack.reset();
        info!(session = %self.id, kind = %self.kind, "session artifacts replaced");
    }
}

fn resolve_kind(left: &Artifact, right: &Artifact, forced: Option<ContentKind>) -> ContentKind {
    let kind = forced.unwrap_or_else(|| left.resolved_kind());
    let right_kind = right.resolved_kind();
    if forced.is_none() && right_kind != kind {
        debug!(
            session_kind = %kind,
            right_kind = %right_kind,
            label = %right.label,
            "right artifact classified differently; using session kind"
        );
    }
    kind
}
