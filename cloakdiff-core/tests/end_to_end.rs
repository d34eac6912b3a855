use std::time::{Duration, Instant};

use cloakdiff_core::artifact::{classify, Artifact, ContentKind};
use cloakdiff_core::clipboard::{AckState, MemoryClipboard};
use cloakdiff_core::loader::{load_pair, ArtifactRequest, Loader, Location};
use cloakdiff_core::pane::Side;
use cloakdiff_core::render::{Rendered, StructuredBlock, PARSE_ERROR_NOTICE};
use cloakdiff_core::ComparisonSession;
use tempfile::tempdir;

#[test]
fn test_classifier_table() {
    assert_eq!(classify("report.md", None), ContentKind::Document);
    assert_eq!(classify("config.json", None), ContentKind::StructuredData);
    assert_eq!(classify("notes.txt", None), ContentKind::PlainText);
    assert_eq!(
        classify("data.csv", Some(ContentKind::PlainText)),
        ContentKind::PlainText
    );
    assert_eq!(classify("config.json (masked)", None), ContentKind::StructuredData);
}

#[test]
fn test_valid_left_invalid_right() {
    let session = ComparisonSession::new(
        Artifact::new("a.json", r#"{"x":1}"#),
        Artifact::new("a.json", r#"{"x":1,}"#),
    );

    assert_eq!(
        session.pane(Side::Left).rendered(),
        &Rendered::Structured(StructuredBlock::Pretty("{\n  \"x\": 1\n}".to_string()))
    );

    let right = session.pane(Side::Right).rendered().to_text();
    assert!(right.starts_with(PARSE_ERROR_NOTICE));
    assert!(right.ends_with(r#"{"x":1,}"#));
}

#[test]
fn test_copy_preemption_and_timeout() {
    let mut session = ComparisonSession::new(
        Artifact::new("a.md", "# original"),
        Artifact::new("a.md (masked)", "# [REDACTED]"),
    );
    let mut clipboard = MemoryClipboard::default();
    let start = Instant::now();

    session.copy(Side::Left, &mut clipboard, start);
    session.copy(Side::Right, &mut clipboard, start + Duration::from_millis(500));
    assert_eq!(session.ack().state(), AckState::Copied(Side::Right));

    // Timer restarted by the second copy
    session.tick(start + Duration::from_millis(2100));
    assert_eq!(session.ack().state(), AckState::Copied(Side::Right));

    session.tick(start + Duration::from_millis(2500));
    assert_eq!(session.ack().state(), AckState::Idle);
    assert_eq!(clipboard.contents.as_deref(), Some("# [REDACTED]"));
}

#[test]
fn test_denied_clipboard_shows_nothing() {
    let mut session = ComparisonSession::new(Artifact::new("a", "x"), Artifact::new("b", "y"));
    let mut denied = MemoryClipboard {
        deny: Some("permission denied".to_string()),
        ..Default::default()
    };
    session.copy(Side::Left, &mut denied, Instant::now());
    assert_eq!(session.ack().state(), AckState::Idle);
}

#[tokio::test]
async fn test_load_pair_from_files() {
    let dir = tempdir().unwrap();
    let left = dir.path().join("email.json");
    let right = dir.path().join("email.masked.json");
    std::fs::write(&left, r#"{"to":"alice@example.com"}"#).unwrap();
    std::fs::write(&right, r#"{"to":"[EMAIL]"}"#).unwrap();

    let loader = Loader::default();
    let (l, r) = load_pair(
        &loader,
        &ArtifactRequest::new(Side::Left, Location::File(left)),
        &ArtifactRequest::new(Side::Right, Location::File(right)),
    )
    .await
    .unwrap();

    assert_eq!(l.label, "email.json");
    assert_eq!(r.label, "email.masked.json");

    let session = ComparisonSession::new(l, r);
    assert_eq!(session.kind(), ContentKind::StructuredData);
}

#[tokio::test]
async fn test_load_pair_fails_if_either_side_fails() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("a.md");
    std::fs::write(&present, "# a").unwrap();

    let err = load_pair(
        &Loader::default(),
        &ArtifactRequest::new(Side::Left, Location::File(present)),
        &ArtifactRequest::new(Side::Right, Location::File(dir.path().join("missing.md"))),
    )
    .await
    .unwrap_err();

    assert!(err.is_load_failure());
    assert!(err.to_string().contains("right"));
}

#[tokio::test]
async fn test_non_utf8_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bin.txt");
    std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    let err = load_pair(
        &Loader::default(),
        &ArtifactRequest::new(Side::Left, Location::File(path.clone())),
        &ArtifactRequest::new(Side::Right, Location::File(path)),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("UTF-8"));
}
