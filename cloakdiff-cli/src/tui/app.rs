//! Core application state for the comparison viewer

use std::sync::Arc;
use std::time::Instant;

use cloakdiff_core::loader::{load_pair, ArtifactRequest, Loader, Location};
use cloakdiff_core::{
    Artifact, ClipboardSink, ComparisonSession, ContentKind, CopyAcknowledgment, CopyOutcome,
    LayoutStore, SampleCatalog, Side, SplitLayout,
};
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::text::pane_text;

/// Session-wide display phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for both artifacts
    Loading,
    /// Either retrieval failed; nothing is rendered
    Failed(String),
    /// Both panes rendered
    Ready,
}

/// What to show in the session
#[derive(Debug, Clone)]
pub enum LoadTarget {
    Pair {
        left: ArtifactRequest,
        right: ArtifactRequest,
    },
    Scenario(String),
}

impl LoadTarget {
    fn requests(&self) -> (ArtifactRequest, ArtifactRequest) {
        match self {
            LoadTarget::Pair { left, right } => (left.clone(), right.clone()),
            LoadTarget::Scenario(name) => {
                let request = |side| {
                    ArtifactRequest::new(
                        side,
                        Location::Sample {
                            scenario: name.clone(),
                            side,
                        },
                    )
                };
                (request(Side::Left), request(Side::Right))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            LoadTarget::Pair { left, right } => format!("{} ↔ {}", left.location, right.location),
            LoadTarget::Scenario(name) => format!("sample '{name}'"),
        }
    }
}

type LoadResult = cloakdiff_core::Result<(Artifact, Artifact)>;

/// Retrieval in flight. Dropping it drops the receiver, so a superseded
/// task's result has nowhere to land.
pub struct PendingLoad {
    task: JoinHandle<()>,
    rx: oneshot::Receiver<LoadResult>,
}

impl PendingLoad {
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Where things are on screen, derived from the viewport and split ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Area holding both panes and the divider
    pub body: Rect,
    pub left: Rect,
    pub divider: Rect,
    pub right: Rect,
    pub status: Rect,
}

impl Geometry {
    pub fn compute(area: Rect, layout: &SplitLayout) -> Self {
        let status_height = area.height.min(1);
        let body = Rect::new(area.x, area.y, area.width, area.height - status_height);
        let status = Rect::new(area.x, body.bottom(), area.width, status_height);

        let track = body.width.saturating_sub(1);
        let (left_width, right_width) = layout.split_width(track);
        let left = Rect::new(body.x, body.y, left_width, body.height);
        let divider = Rect::new(left.right(), body.y, body.width.min(1), body.height);
        let right = Rect::new(divider.right(), body.y, right_width, body.height);

        Self {
            body,
            left,
            divider,
            right,
            status,
        }
    }

    pub fn pane(&self, side: Side) -> Rect {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Width the divider may travel across
    pub fn track(&self) -> (u16, u16) {
        (self.body.x, self.body.width.saturating_sub(1))
    }

    /// Pane under a pointer, if any
    pub fn side_at(&self, column: u16, row: u16) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| contains(self.pane(*side), column, row))
    }

    pub fn on_divider(&self, column: u16, row: u16) -> bool {
        contains(self.divider, column, row)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

pub const COPY_LABEL: &str = "[ Copy ]";
pub const COPIED_LABEL: &str = "[ Copied! ]";

/// Header button columns for a pane, as `(start, end)` exclusive
pub fn copy_button_span(pane: Rect, copied: bool) -> (u16, u16) {
    let label = if copied { COPIED_LABEL } else { COPY_LABEL };
    let width = label.chars().count() as u16;
    let end = pane.right().saturating_sub(1);
    (end.saturating_sub(width), end)
}

/// Main application state
pub struct App {
    pub phase: Phase,
    pub session: Option<ComparisonSession>,
    /// Rendered body text, cached per load
    pub bodies: [Text<'static>; 2],
    /// Wrapped row count per body, keyed by the inner width it was measured at
    wrapped_rows: [Option<(u16, usize)>; 2],
    pub focus: Side,
    pub status_message: Option<String>,
    /// Current scenario when browsing samples
    pub scenario: Option<String>,
    pub catalog: SampleCatalog,
    pub viewport: Rect,
    target: LoadTarget,
    kind: Option<ContentKind>,
    pending: Option<PendingLoad>,
    initial_layout: SplitLayout,
    ack_template: CopyAcknowledgment,
    store: Option<Box<dyn LayoutStore>>,
    layout_key: String,
    clipboard: Box<dyn ClipboardSink>,
}

/// Settings that survive across loads
pub struct AppSettings {
    pub kind: Option<ContentKind>,
    pub layout: SplitLayout,
    pub ack: CopyAcknowledgment,
    pub store: Option<Box<dyn LayoutStore>>,
    pub layout_key: String,
    pub clipboard: Box<dyn ClipboardSink>,
    pub catalog: SampleCatalog,
}

impl App {
    pub fn new(target: LoadTarget, settings: AppSettings) -> Self {
        let scenario = match &target {
            LoadTarget::Scenario(name) => Some(name.clone()),
            LoadTarget::Pair { .. } => None,
        };
        Self {
            phase: Phase::Loading,
            session: None,
            bodies: [Text::default(), Text::default()],
            wrapped_rows: [None, None],
            focus: Side::Left,
            status_message: None,
            scenario,
            catalog: settings.catalog,
            viewport: Rect::default(),
            target,
            kind: settings.kind,
            pending: None,
            initial_layout: settings.layout,
            ack_template: settings.ack,
            store: settings.store,
            layout_key: settings.layout_key,
            clipboard: settings.clipboard,
        }
    }

    /// Layout of the live session, or the one it will start with
    pub fn layout(&self) -> &SplitLayout {
        self.session
            .as_ref()
            .map(|session| session.layout())
            .unwrap_or(&self.initial_layout)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::compute(self.viewport, self.layout())
    }

    pub fn target_description(&self) -> String {
        self.target.describe()
    }

    /// Start retrieving the current target. Any earlier retrieval is aborted
    /// and its result will be ignored.
    pub fn begin_load(&mut self, loader: Arc<Loader>) {
        self.cancel_pending();
        self.phase = Phase::Loading;

        let (left, right) = self.target.requests();
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let result = load_pair(loader.as_ref(), &left, &right).await;
            if tx.send(result).is_err() {
                debug!("load finished after being superseded; result dropped");
            }
        });
        debug!(target = %self.target.describe(), "load started");
        self.pending = Some(PendingLoad { task, rx });
    }

    /// Load a different scenario into the same session
    pub fn switch_scenario(&mut self, name: &str, loader: Arc<Loader>) {
        self.scenario = Some(name.to_string());
        self.target = LoadTarget::Scenario(name.to_string());
        self.begin_load(loader);
    }

    /// Scenario that `s` moves to
    pub fn next_scenario(&self) -> Option<String> {
        let current = self.scenario.as_deref()?;
        self.catalog
            .next_after(current)
            .map(|scenario| scenario.name.clone())
    }

    /// Apply a finished retrieval, if any. Returns whether state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                self.phase = Phase::Failed("load task ended without a result".to_string());
                return true;
            }
        };
        self.pending = None;

        match result {
            Ok((left, right)) => self.apply_artifacts(left, right),
            Err(err) => {
                warn!(error = %err, "comparison load failed");
                self.phase = Phase::Failed(err.to_string());
            }
        }
        true
    }

    fn apply_artifacts(&mut self, left: Artifact, right: Artifact) {
        match self.session.as_mut() {
            Some(session) => session.replace_artifacts(left, right, self.kind),
            None => {
                self.session = Some(ComparisonSession::with_parts(
                    left,
                    right,
                    self.kind,
                    self.initial_layout.clone(),
                    self.ack_template.clone(),
                ));
            }
        }
        if let Some(session) = &self.session {
            self.bodies = Side::BOTH.map(|side| pane_text(session.pane(side).rendered()));
            self.wrapped_rows = [None, None];
        }
        self.phase = Phase::Ready;
    }

    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Advance timers
    pub fn tick(&mut self, now: Instant) -> bool {
        self.session
            .as_mut()
            .map(|session| session.tick(now))
            .unwrap_or(false)
    }

    pub fn copy(&mut self, side: Side, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.copy(side, self.clipboard.as_mut(), now) {
            CopyOutcome::Copied(side) => {
                self.status_message = Some(format!("Copied {} artifact", side.role()));
            }
            CopyOutcome::Failed => {
                self.status_message = None;
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub fn body(&self, side: Side) -> &Text<'static> {
        &self.bodies[slot(side)]
    }

    /// Rows the body takes once wrapped inside the pane's borders. Scroll
    /// offsets count these rows, not logical lines.
    pub fn body_rows(&mut self, side: Side) -> usize {
        let width = self.geometry().pane(side).width.saturating_sub(2);
        let idx = slot(side);
        if let Some((measured, rows)) = self.wrapped_rows[idx] {
            if measured == width {
                return rows;
            }
        }
        let rows = if width == 0 {
            self.bodies[idx].lines.len()
        } else {
            Paragraph::new(self.bodies[idx].clone())
                .wrap(Wrap { trim: false })
                .line_count(width)
        };
        self.wrapped_rows[idx] = Some((width, rows));
        rows
    }

    fn max_scroll(&mut self, side: Side) -> usize {
        self.body_rows(side).saturating_sub(1)
    }

    pub fn scroll(&mut self, side: Side, delta: isize) {
        let max = self.max_scroll(side);
        if let Some(session) = self.session.as_mut() {
            session.pane_mut(side).scroll_by(delta, max);
        }
    }

    pub fn scroll_to(&mut self, side: Side, line: usize) {
        let max = self.max_scroll(side);
        if let Some(session) = self.session.as_mut() {
            session.pane_mut(side).scroll_to(line, max);
        }
    }

    /// Pull scroll offsets back inside the body after a resize or split change
    pub fn clamp_scroll(&mut self) {
        if self.session.is_none() {
            return;
        }
        for side in Side::BOTH {
            let max = self.max_scroll(side);
            if let Some(session) = self.session.as_mut() {
                let pane = session.pane_mut(side);
                let current = pane.scroll();
                pane.scroll_to(current, max);
            }
        }
    }

    /// Lines visible inside a pane's borders
    pub fn page_height(&self, side: Side) -> usize {
        usize::from(self.geometry().pane(side).height.saturating_sub(2)).max(1)
    }

    pub fn layout_mut(&mut self) -> &mut SplitLayout {
        match self.session.as_mut() {
            Some(session) => session.layout_mut(),
            None => &mut self.initial_layout,
        }
    }

    /// Save the committed ratio under the layout key
    pub fn persist_layout(&mut self) {
        let ratio = self.layout().ratio();
        let Some(store) = self.store.as_mut() else {
            return;
        };
        match store.save(&self.layout_key, ratio) {
            Ok(()) => info!(key = %self.layout_key, ratio, "split ratio saved"),
            Err(err) => {
                warn!(key = %self.layout_key, error = %err, "failed to save split ratio");
                self.set_status(format!("Could not save layout: {err}"));
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
