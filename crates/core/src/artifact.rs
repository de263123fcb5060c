//! The serialized model artifact
//!
//! The artifact is the sole hand-off from the training run to the
//! prediction-time consumer: the fitted forest, the fitted transforms, and a
//! small metadata block, written as canonical JSON with a blake3 hash
//! sidecar. A training run either completes and writes the artifact or
//! fails and leaves nothing behind; the write goes through a temporary file
//! in the target directory followed by a rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canonical::canonical_json_string;
use crate::error::{ArtifactError, ArtifactResult};
use crate::forest::ForestModel;
use crate::record::FEATURE_COUNT;
use crate::transforms::FittedTransforms;

/// Artifact format version accepted by this crate.
pub const ARTIFACT_VERSION: u32 = 1;

/// Metadata recorded alongside the fitted model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactMetadata {
    /// Version of the crate that produced the artifact
    pub produced_by: String,
    /// Unix timestamp of the training run
    pub created_at: i64,
    pub feature_count: usize,
    pub tree_count: usize,
    pub training_rows: usize,
    /// Held-out evaluation metrics, informational only
    pub metrics: BTreeMap<String, f64>,
}

/// The complete persisted state of one training run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    pub model: ForestModel,
    pub transforms: FittedTransforms,
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Canonical JSON rendering of the artifact.
    pub fn to_canonical_json(&self) -> ArtifactResult<String> {
        Ok(canonical_json_string(self)?)
    }

    /// Write the artifact to `path` and its blake3 hash to `<path>.hash`.
    ///
    /// Returns the hex-encoded hash.
    pub fn save(&self, path: &Path) -> ArtifactResult<String> {
        self.validate()?;

        let json = self.to_canonical_json()?;
        let hash_hex = hex::encode(blake3::hash(json.as_bytes()).as_bytes());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)?;
        fs::rename(&tmp_path, path)?;
        fs::write(sidecar_path(path), &hash_hex)?;

        info!(path = %path.display(), hash = %hash_hex, "model artifact written");
        Ok(hash_hex)
    }

    /// Load and validate an artifact from `path`.
    ///
    /// When the hash sidecar is present, the file content is verified
    /// against it before deserialization.
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let json = fs::read_to_string(path)?;

        let sidecar = sidecar_path(path);
        if sidecar.exists() {
            let expected = fs::read_to_string(&sidecar)?.trim().to_string();
            let actual = hex::encode(blake3::hash(json.as_bytes()).as_bytes());
            if expected != actual {
                return Err(ArtifactError::HashMismatch { expected, actual });
            }
            debug!(path = %path.display(), "artifact hash verified");
        }

        let artifact: Self = serde_json::from_str(&json)?;
        artifact.validate()?;

        info!(
            path = %path.display(),
            trees = artifact.model.trees.len(),
            "model artifact loaded"
        );
        Ok(artifact)
    }

    /// Structural consistency checks shared by save and load.
    pub fn validate(&self) -> ArtifactResult<()> {
        self.model.validate()?;

        if self.model.version != ARTIFACT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported model version {} (expected {ARTIFACT_VERSION})",
                self.model.version
            )));
        }
        if self.model.feature_count != FEATURE_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "model expects {} features, this crate produces {FEATURE_COUNT}",
                self.model.feature_count
            )));
        }
        self.transforms.validate().map_err(ArtifactError::Invalid)?;

        Ok(())
    }
}

/// Hash sidecar path: `<artifact path>.hash`.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".hash");
    PathBuf::from(name)
}
