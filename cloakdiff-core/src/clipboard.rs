//! Per-pane copy with a self-expiring "copied" acknowledgment.
//!
//! States are `Idle` and `Copied(side)`. A successful copy enters
//! `Copied(side)` and arms a single deadline; a later success on either side
//! replaces the state and re-arms the deadline. Failures leave the state
//! untouched. Time is passed in explicitly so transitions are testable without
//! a UI loop.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::pane::Side;

/// How long the acknowledgment stays visible
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Platform clipboard rejected the write
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("clipboard write failed: {reason}")]
pub struct ClipboardError {
    pub reason: String,
}

impl ClipboardError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Write-only access to a clipboard
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard; keeps the last written text
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// When set, every write is rejected with this reason
    pub deny: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.deny {
            return Err(ClipboardError::new(reason.clone()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckState {
    Idle,
    Copied(Side),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(Side),
    /// Write rejected; acknowledgment state unchanged
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Activation {
    side: Side,
    expires_at: Instant,
}

/// Acknowledgment state machine owned by one comparison session
#[derive(Debug, Clone)]
pub struct CopyAcknowledgment {
    timeout: Duration,
    active: Option<Activation>,
}

impl Default for CopyAcknowledgment {
    fn default() -> Self {
        Self::new(DEFAULT_ACK_TIMEOUT)
    }
}

impl CopyAcknowledgment {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            active: None,
        }
    }

    /// Write `text` through `sink` and acknowledge `side` on success.
    ///
    /// A rejected write is logged and swallowed.
    pub fn copy<S: ClipboardSink + ?Sized>(
        &mut self,
        sink: &mut S,
        text: &str,
        side: Side,
        now: Instant,
    ) -> CopyOutcome {
        match sink.write_text(text) {
            Ok(()) => {
                self.acknowledge(side, now);
                CopyOutcome::Copied(side)
            }
            Err(err) => {
                warn!(side = %side, error = %err, "copy to clipboard failed");
                CopyOutcome::Failed
            }
        }
    }

    /// Enter `Copied(side)`. The new deadline replaces any earlier one.
    fn acknowledge(&mut self, side: Side, now: Instant) {
        let expires_at = now + self.timeout;
        self.active = Some(Activation { side, expires_at });
        debug!(side = %side, "copy acknowledged");
    }

    /// Clear the acknowledgment once its deadline has passed. Returns whether
    /// the state changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.active {
            Some(activation) if now >= activation.expires_at => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> AckState {
        match self.active {
            Some(activation) => AckState::Copied(activation.side),
            None => AckState::Idle,
        }
    }

    pub fn active_side(&self) -> Option<Side> {
        self.active.map(|activation| activation.side)
    }

    pub fn is_copied(&self, side: Side) -> bool {
        self.active_side() == Some(side)
    }

    /// Back to `Idle`, invalidating any pending timeout
    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_enters_copied_state() {
        let mut ack = CopyAcknowledgment::default();
        let mut clipboard = MemoryClipboard::default();
        let now = Instant::now();

        let outcome = ack.copy(&mut clipboard, "hello", Side::Left, now);

        assert_eq!(outcome, CopyOutcome::Copied(Side::Left));
        assert_eq!(ack.state(), AckState::Copied(Side::Left));
        assert_eq!(clipboard.contents.as_deref(), Some("hello"));
    }

    #[test]
    fn test_other_side_preempts_immediately() {
        let mut ack = CopyAcknowledgment::default();
        let mut clipboard = MemoryClipboard::default();
        let now = Instant::now();

        ack.copy(&mut clipboard, "a", Side::Left, now);
        ack.copy(&mut clipboard, "b", Side::Right, now);

        assert_eq!(ack.state(), AckState::Copied(Side::Right));
        assert!(!ack.is_copied(Side::Left));
        assert_eq!(clipboard.contents.as_deref(), Some("b"));
    }

    #[test]
    fn test_auto_clears_after_timeout() {
        let mut ack = CopyAcknowledgment::default();
        let mut clipboard = MemoryClipboard::default();
        let start = Instant::now();

        ack.copy(&mut clipboard, "a", Side::Left, start);
        assert!(!ack.expire(start + Duration::from_millis(1999)));
        assert_eq!(ack.state(), AckState::Copied(Side::Left));

        assert!(ack.expire(start + DEFAULT_ACK_TIMEOUT));
        assert_eq!(ack.state(), AckState::Idle);
    }

    #[test]
    fn test_preemption_restarts_timer() {
        let mut ack = CopyAcknowledgment::default();
        let mut clipboard = MemoryClipboard::default();
        let start = Instant::now();

        ack.copy(&mut clipboard, "a", Side::Left, start);
        ack.copy(&mut clipboard, "b", Side::Right, start + Duration::from_millis(1500));

        // The first activation's deadline has passed, the second's has not
        assert!(!ack.expire(start + Duration::from_millis(2500)));
        assert_eq!(ack.state(), AckState::Copied(Side::Right));
        assert!(ack.expire(start + Duration::from_millis(3500)));
    }

    #[test]
    fn test_same_side_recopy_extends_deadline() {
        let mut ack = CopyAcknowledgment::default();
        let mut clipboard = MemoryClipboard::default();
        let start = Instant::now();

        ack.copy(&mut clipboard, "a", Side::Left, start);
        ack.copy(&mut clipboard, "a", Side::Left, start + Duration::from_millis(1000));

        assert!(!ack.expire(start + DEFAULT_ACK_TIMEOUT));
        assert_eq!(ack.state(), AckState::Copied(Side::Left));
        assert!(ack.expire(start + Duration::from_millis(3000)));
        assert_eq!(ack.state(), AckState::Idle);
    }

    #[test]
    fn test_failure_leaves_state_untouched() {
        let mut ack = CopyAcknowledgment::default();
        let mut ok = MemoryClipboard::default();
        let mut denied = MemoryClipboard {
            deny: Some("access denied".to_string()),
            ..Default::default()
        };
        let now = Instant::now();

        assert_eq!(ack.copy(&mut denied, "x", Side::Left, now), CopyOutcome::Failed);
        assert_eq!(ack.state(), AckState::Idle);

        ack.copy(&mut ok, "y", Side::Right, now);
        assert_eq!(ack.copy(&mut denied, "x", Side::Left, now), CopyOutcome::Failed);
        assert_eq!(ack.state(), AckState::Copied(Side::Right));
    }
}
