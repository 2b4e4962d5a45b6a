use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::{ArtifactStore, sort_artifacts};
use crate::model::Artifact;
use crate::util::write_json_pretty;

const KEY_PREFIX: &str = "artifacts_";

#[derive(Debug, Clone)]
pub struct JsonFileArtifactStore {
    path: PathBuf,
}

type Document = BTreeMap<String, Vec<Artifact>>;

impl JsonFileArtifactStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let raw = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn save(&self, document: &Document) -> Result<()> {
        write_json_pretty(&self.path, document)?;
        debug!(path = %self.path.display(), keys = document.len(), "saved artifact document");
        Ok(())
    }
}

fn storage_key(conversation_id: &str) -> String {
    format!("{KEY_PREFIX}{conversation_id}")
}

impl ArtifactStore for JsonFileArtifactStore {
    fn get(&self, conversation_id: &str, artifact_id: &str) -> Result<Option<Artifact>> {
        let document = self.load()?;
        Ok(document
            .get(&storage_key(conversation_id))
            .and_then(|artifacts| artifacts.iter().find(|artifact| artifact.id == artifact_id))
            .cloned())
    }

    fn set(&mut self, artifact: Artifact) -> Result<()> {
        let mut document = self.load()?;
        let artifacts = document
            .entry(storage_key(&artifact.conversation_id))
            .or_default();

        match artifacts.iter_mut().find(|existing| existing.id == artifact.id) {
            Some(existing) => *existing = artifact,
            None => artifacts.push(artifact),
        }

        self.save(&document)
    }

    fn delete(&mut self, conversation_id: &str, artifact_id: &str) -> Result<bool> {
        let mut document = self.load()?;
        let key = storage_key(conversation_id);

        let Some(artifacts) = document.get_mut(&key) else {
            return Ok(false);
        };
        let before = artifacts.len();
        artifacts.retain(|artifact| artifact.id != artifact_id);
        let removed = artifacts.len() != before;

        if artifacts.is_empty() {
            document.remove(&key);
        }
        if removed {
            self.save(&document)?;
        }

        Ok(removed)
    }

    fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Artifact>> {
        let document = self.load()?;
        let mut artifacts = document
            .get(&storage_key(conversation_id))
            .cloned()
            .unwrap_or_default();
        sort_artifacts(&mut artifacts);
        Ok(artifacts)
    }

    fn conversation_ids(&self) -> Result<Vec<String>> {
        let document = self.load()?;
        Ok(document
            .keys()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX))
            .map(ToOwned::to_owned)
            .collect())
    }
}
