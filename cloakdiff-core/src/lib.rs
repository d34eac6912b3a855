pub mod artifact;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod html;
pub mod layout;
#[cfg(feature = "rt")]
pub mod loader;
pub mod pane;
pub mod render;
pub mod samples;
pub mod session;

pub use artifact::{classify, Artifact, ContentKind};
pub use clipboard::{
    AckState, ClipboardError, ClipboardSink, CopyAcknowledgment, CopyOutcome, MemoryClipboard,
    DEFAULT_ACK_TIMEOUT,
};
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use html::export_html;
pub use layout::{FileLayoutStore, LayoutStore, MemoryLayoutStore, SplitLayout};
#[cfg(feature = "rt")]
pub use loader::{load_pair, ArtifactRequest, ArtifactSource, Loader, Location};
pub use pane::{Pane, Side};
pub use render::{render, DocumentTree, Rendered, StructuredBlock};
pub use samples::{SampleCatalog, Scenario};
pub use session::ComparisonSession;
