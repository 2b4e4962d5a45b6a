use std::collections::BTreeMap;

use anyhow::Result;

use super::{ArtifactStore, sort_artifacts};
use crate::model::Artifact;

#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    entries: BTreeMap<(String, String), Artifact>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn get(&self, conversation_id: &str, artifact_id: &str) -> Result<Option<Artifact>> {
        Ok(self
            .entries
            .get(&(conversation_id.to_string(), artifact_id.to_string()))
            .cloned())
    }

    fn set(&mut self, artifact: Artifact) -> Result<()> {
        let key = (artifact.conversation_id.clone(), artifact.id.clone());
        self.entries.insert(key, artifact);
        Ok(())
    }

    fn delete(&mut self, conversation_id: &str, artifact_id: &str) -> Result<bool> {
        Ok(self
            .entries
            .remove(&(conversation_id.to_string(), artifact_id.to_string()))
            .is_some())
    }

    fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Artifact>> {
        let mut artifacts = self
            .entries
            .values()
            .filter(|artifact| artifact.conversation_id == conversation_id)
            .cloned()
            .collect::<Vec<Artifact>>();
        sort_artifacts(&mut artifacts);
        Ok(artifacts)
    }

    fn conversation_ids(&self) -> Result<Vec<String>> {
        let mut ids = self
            .entries
            .keys()
            .map(|(conversation_id, _)| conversation_id.clone())
            .collect::<Vec<String>>();
        ids.dedup();
        Ok(ids)
    }
}
