//! Artifact retrieval.
//!
//! Each side of a comparison is fetched independently; [`load_pair`] runs both
//! retrievals concurrently and fails as soon as either one fails, so a session
//! never starts with one side missing.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::artifact::{Artifact, ContentKind};
use crate::error::{Result, ViewerError};
use crate::pane::Side;
use crate::samples::SampleCatalog;

const SAMPLE_PREFIX: &str = "sample:";

/// Where an artifact's text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Url(String),
    Sample { scenario: String, side: Side },
}

impl Location {
    /// `http(s)://...` is a URL, `sample:<scenario>/<side>` a catalog entry,
    /// anything else a file path
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Location::Url(trimmed.to_string()));
        }
        if let Some(rest) = trimmed.strip_prefix(SAMPLE_PREFIX) {
            let (scenario, side) = rest.split_once('/').ok_or_else(|| {
                ViewerError::config(format!(
                    "sample location '{trimmed}' must look like sample:<scenario>/<left|right>"
                ))
            })?;
            let side = match side.to_ascii_lowercase().as_str() {
                "left" | "original" => Side::Left,
                "right" | "masked" => Side::Right,
                other => {
                    return Err(ViewerError::config(format!(
                        "unknown sample side '{other}' (expected left or right)"
                    )))
                }
            };
            return Ok(Location::Sample {
                scenario: scenario.to_string(),
                side,
            });
        }
        Ok(Location::File(PathBuf::from(trimmed)))
    }

    /// Label used when the caller supplies none
    pub fn default_label(&self) -> String {
        match self {
            Location::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Location::Url(url) => {
                let path = url
                    .split(['?', '#'])
                    .next()
                    .unwrap_or(url)
                    .trim_end_matches('/');
                path.rsplit('/')
                    .next()
                    .filter(|segment| !segment.is_empty() && !segment.contains(':'))
                    .map(|segment| segment.to_string())
                    .unwrap_or_else(|| url.clone())
            }
            Location::Sample { scenario, side } => format!("{scenario} ({})", side.role()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Url(url) => f.write_str(url),
            Location::Sample { scenario, side } => write!(f, "{SAMPLE_PREFIX}{scenario}/{side}"),
        }
    }
}

/// One side of a comparison to be retrieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub side: Side,
    pub location: Location,
    pub label: Option<String>,
    pub kind: Option<ContentKind>,
}

impl ArtifactRequest {
    pub fn new(side: Side, location: Location) -> Self {
        Self {
            side,
            location,
            label: None,
            kind: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: Option<ContentKind>) -> Self {
        self.kind = kind;
        self
    }
}

/// Resolves a location to UTF-8 text or rejects with a description
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<FetchedText>;
}

/// Retrieved text plus the label the source suggests for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedText {
    pub text: String,
    pub label: Option<String>,
    pub kind: Option<ContentKind>,
}

impl FetchedText {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: None,
            kind: None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct FileSource;

#[async_trait]
impl ArtifactSource for FileSource {
    async fn fetch(&self, location: &Location) -> Result<FetchedText> {
        let Location::File(path) = location else {
            return Err(unsupported(location, "file"));
        };
        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ViewerError::config(format!("{} is not valid UTF-8", path.display())))?;
        Ok(FetchedText::text(text))
    }
}

#[derive(Debug, Default, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

#[async_trait]
impl ArtifactSource for HttpSource {
    async fn fetch(&self, location: &Location) -> Result<FetchedText> {
        let Location::Url(url) = location else {
            return Err(unsupported(location, "http"));
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ViewerError::http(url, err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::http(url, format!("server returned {status}")));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ViewerError::http(url, err.to_string()))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| ViewerError::http(url, "response body is not valid UTF-8"))?;
        Ok(FetchedText::text(text))
    }
}

#[derive(Debug, Default, Clone)]
pub struct SampleSource {
    catalog: SampleCatalog,
}

impl SampleSource {
    pub fn new(catalog: SampleCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ArtifactSource for SampleSource {
    async fn fetch(&self, location: &Location) -> Result<FetchedText> {
        let Location::Sample { scenario, side } = location else {
            return Err(unsupported(location, "sample"));
        };
        let artifact = self.catalog.get(scenario)?.artifact(*side);
        Ok(FetchedText {
            text: artifact.raw.clone(),
            label: Some(artifact.label.clone()),
            kind: artifact.kind,
        })
    }
}

/// Dispatches each location to the matching source
#[derive(Debug, Default, Clone)]
pub struct Loader {
    files: FileSource,
    http: HttpSource,
    samples: SampleSource,
}

impl Loader {
    pub fn new(catalog: SampleCatalog) -> Self {
        Self {
            files: FileSource,
            http: HttpSource::default(),
            samples: SampleSource::new(catalog),
        }
    }
}

#[async_trait]
impl ArtifactSource for Loader {
    async fn fetch(&self, location: &Location) -> Result<FetchedText> {
        match location {
            Location::File(_) => self.files.fetch(location).await,
            Location::Url(_) => self.http.fetch(location).await,
            Location::Sample { .. } => self.samples.fetch(location).await,
        }
    }
}

fn unsupported(location: &Location, source: &str) -> ViewerError {
    ViewerError::config(format!("{source} source cannot fetch {location}"))
}

/// Retrieve one artifact; every failure becomes a load failure for its side
#[instrument(skip(source, request), fields(side = %request.side, location = %request.location))]
pub async fn load_artifact<S: ArtifactSource + ?Sized>(
    source: &S,
    request: &ArtifactRequest,
) -> Result<Artifact> {
    let fetched = source.fetch(&request.location).await.map_err(|err| {
        ViewerError::load(
            request.side.as_str(),
            request.location.to_string(),
            err.to_string(),
        )
    })?;
    debug!(bytes = fetched.text.len(), "artifact retrieved");

    let label = request
        .label
        .clone()
        .or(fetched.label)
        .unwrap_or_else(|| request.location.default_label());
    Ok(Artifact {
        label,
        kind: request.kind.or(fetched.kind),
        raw: fetched.text,
    })
}

/// Retrieve both sides concurrently; the first failure wins
pub async fn load_pair<S: ArtifactSource + ?Sized>(
    source: &S,
    left: &ArtifactRequest,
    right: &ArtifactRequest,
) -> Result<(Artifact, Artifact)> {
    futures::future::try_join(load_artifact(source, left), load_artifact(source, right)).await
}
