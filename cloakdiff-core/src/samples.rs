//! Catalog of sample comparison scenarios.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::artifact::{Artifact, ContentKind};
use crate::error::{Result, ViewerError};
use crate::pane::Side;

const README_ORIGINAL: &str = include_str!("../samples/markdown/README.md");
const README_MASKED: &str = include_str!("../samples/markdown/README.masked.md");
const CONFIG_ORIGINAL: &str = include_str!("../samples/json/config.json");
const CONFIG_MASKED: &str = include_str!("../samples/json/config.masked.json");

/// A named original/masked pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub left: Artifact,
    pub right: Artifact,
}

impl Scenario {
    pub fn artifact(&self, side: Side) -> &Artifact {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleCatalog {
    scenarios: Vec<Scenario>,
}

impl Default for SampleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SampleCatalog {
    /// The two demo pairs: `markdown` and `json`
    pub fn builtin() -> Self {
        Self {
            scenarios: vec![
                Scenario {
                    name: "markdown".to_string(),
                    left: Artifact::new("README.md", README_ORIGINAL).with_kind(ContentKind::Document),
                    right: Artifact::new("README.md (masked)", README_MASKED)
                        .with_kind(ContentKind::Document),
                },
                Scenario {
                    name: "json".to_string(),
                    left: Artifact::new("config.json", CONFIG_ORIGINAL)
                        .with_kind(ContentKind::StructuredData),
                    right: Artifact::new("config.json (masked)", CONFIG_MASKED)
                        .with_kind(ContentKind::StructuredData),
                },
            ],
        }
    }

    /// Add scenarios from `dir`: each subdirectory holding one original file
    /// and one file whose name contains `masked` becomes a scenario named
    /// after the subdirectory. Incomplete subdirectories are skipped.
    pub fn with_dir(mut self, dir: &Path) -> Result<Self> {
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            match read_pair(&entry.path()) {
                Ok(Some((left, right))) => {
                    debug!(scenario = %name, "loaded sample scenario from disk");
                    self.scenarios.retain(|s| s.name != name);
                    self.scenarios.push(Scenario { name, left, right });
                }
                Ok(None) => {
                    debug!(scenario = %name, "skipping incomplete sample directory");
                }
                Err(err) => {
                    warn!(scenario = %name, error = %err, "failed to read sample directory");
                }
            }
        }
        Ok(self)
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, name: &str) -> Result<&Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ViewerError::unknown_scenario(name, &self.names()))
    }

    /// Scenario following `name`, wrapping around
    pub fn next_after(&self, name: &str) -> Option<&Scenario> {
        let idx = self.scenarios.iter().position(|s| s.name == name)?;
        self.scenarios.get((idx + 1) % self.scenarios.len())
    }
}

fn read_pair(dir: &Path) -> Result<Option<(Artifact, Artifact)>> {
    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let (masked, original): (Vec<_>, Vec<_>) = files.into_iter().partition(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase().contains("masked"))
            .unwrap_or(false)
    });

    let (Some(left), Some(right)) = (original.first(), masked.first()) else {
        return Ok(None);
    };

    let load = |path: &Path| -> Result<Artifact> {
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Artifact::new(label, fs::read_to_string(path)?))
    };
    Ok(Some((load(left.as_path())?, load(right.as_path())?)))
}
