//! Split layout manager and its persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, ViewerError};

pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;
pub const DEFAULT_MIN_PANE_FRACTION: f64 = 0.3;
pub const DEFAULT_LAYOUT_KEY: &str = "diff-view-layout";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging,
}

/// Width split between the two panes of a session.
///
/// `ratio` is the left pane's share of the total width and always lies in
/// `[min_fraction, 1 - min_fraction]`.
#[derive(Debug, Clone)]
pub struct SplitLayout {
    ratio: f64,
    default_ratio: f64,
    min_fraction: f64,
    drag: DragState,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self::new(DEFAULT_SPLIT_RATIO, DEFAULT_MIN_PANE_FRACTION)
    }
}

impl SplitLayout {
    /// `min_fraction` is forced into `(0, 0.5]`; `default_ratio` is clamped
    pub fn new(default_ratio: f64, min_fraction: f64) -> Self {
        let min_fraction = if min_fraction.is_finite() && min_fraction > 0.0 {
            min_fraction.min(0.5)
        } else {
            DEFAULT_MIN_PANE_FRACTION
        };
        let default_ratio = if default_ratio.is_finite() {
            default_ratio.clamp(min_fraction, 1.0 - min_fraction)
        } else {
            DEFAULT_SPLIT_RATIO
        };
        Self {
            ratio: default_ratio,
            default_ratio,
            min_fraction,
            drag: DragState::Idle,
        }
    }

    /// Start from the ratio stored under `key`, falling back to the default
    /// when nothing usable is stored
    pub fn restored<S: LayoutStore + ?Sized>(
        default_ratio: f64,
        min_fraction: f64,
        store: &S,
        key: &str,
    ) -> Self {
        let mut layout = Self::new(default_ratio, min_fraction);
        match store.load(key) {
            Ok(Some(stored)) if stored.is_finite() => {
                let committed = layout.set_ratio(stored);
                debug!(key, stored, committed, "restored split ratio");
            }
            Ok(Some(stored)) => {
                warn!(key, stored, "ignoring non-finite stored split ratio");
            }
            Ok(None) => {}
            Err(err) => {
                warn!(key, error = %err, "could not read layout store, using default ratio");
            }
        }
        layout
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn min_fraction(&self) -> f64 {
        self.min_fraction
    }

    /// Inclusive range a committed ratio may take
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_fraction, 1.0 - self.min_fraction)
    }

    /// Clamp `proposed` into bounds and commit it. Non-finite proposals are
    /// ignored. Returns the committed ratio.
    pub fn set_ratio(&mut self, proposed: f64) -> f64 {
        if proposed.is_finite() {
            let (lo, hi) = self.bounds();
            self.ratio = proposed.clamp(lo, hi);
        }
        self.ratio
    }

    pub fn nudge(&mut self, delta: f64) -> f64 {
        self.set_ratio(self.ratio + delta)
    }

    pub fn reset(&mut self) -> f64 {
        self.ratio = self.default_ratio;
        self.ratio
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn begin_drag(&mut self) {
        self.drag = DragState::Dragging;
    }

    /// Pointer moved to `fraction` of the total width during a drag.
    /// Returns the committed ratio, or `None` when no drag is active.
    pub fn drag_to(&mut self, fraction: f64) -> Option<f64> {
        match self.drag {
            DragState::Dragging => Some(self.set_ratio(fraction)),
            DragState::Idle => None,
        }
    }

    /// Release; the ratio is left as the last move committed it.
    /// Returns the final ratio if a drag was active.
    pub fn end_drag(&mut self) -> Option<f64> {
        match std::mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Dragging => Some(self.ratio),
            DragState::Idle => None,
        }
    }

    /// Split `total` cells into `(left, right)` widths honoring the ratio
    pub fn split_width(&self, total: u16) -> (u16, u16) {
        let left = (f64::from(total) * self.ratio).round() as u16;
        let left = left.min(total);
        (left, total - left)
    }
}

/// Pointer position as a fraction of a track starting at `origin`
pub fn pointer_fraction(pointer: u16, origin: u16, extent: u16) -> f64 {
    if extent == 0 {
        return DEFAULT_SPLIT_RATIO;
    }
    f64::from(pointer.saturating_sub(origin)) / f64::from(extent)
}

/// Key-value store for split ratios. A missing key is not an error.
pub trait LayoutStore {
    fn load(&self, key: &str) -> Result<Option<f64>>;
    fn save(&mut self, key: &str, ratio: f64) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryLayoutStore {
    ratios: BTreeMap<String, f64>,
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.ratios.get(key).copied())
    }

    fn save(&mut self, key: &str, ratio: f64) -> Result<()> {
        self.ratios.insert(key.to_string(), ratio);
        Ok(())
    }
}

/// JSON map of `{ key: ratio }` on disk
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    path: PathBuf,
}

impl FileLayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.cloakdiff/layout.json`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cloakdiff")
            .join("layout.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, f64>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)
            .map_err(|err| ViewerError::persist(&self.path, err.to_string()))?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|err| ViewerError::persist(&self.path, err.to_string()))
    }
}

impl LayoutStore for FileLayoutStore {
    fn load(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn save(&mut self, key: &str, ratio: f64) -> Result<()> {
        // An unreadable file is replaced rather than blocking the save
        let mut ratios = self.read_all().unwrap_or_default();
        ratios.insert(key.to_string(), ratio);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| ViewerError::persist(parent, err.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&ratios)
            .map_err(|err| ViewerError::json("layout store", err))?;
        fs::write(&self.path, json).map_err(|err| ViewerError::persist(&self.path, err.to_string()))?;
        debug!(key, ratio, path = %self.path.display(), "saved split ratio");
        Ok(())
    }
}
