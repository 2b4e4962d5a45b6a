use std::path::Path;

use anyhow::Result;

use crate::cli::StoreBackend;
use crate::model::Artifact;

mod json_file;
mod memory;
mod sqlite;
#[cfg(test)]
mod tests;

pub use json_file::JsonFileArtifactStore;
pub use memory::MemoryArtifactStore;
pub use sqlite::SqliteArtifactStore;

pub trait ArtifactStore {
    fn get(&self, conversation_id: &str, artifact_id: &str) -> Result<Option<Artifact>>;

    // Last write wins.
    fn set(&mut self, artifact: Artifact) -> Result<()>;

    fn delete(&mut self, conversation_id: &str, artifact_id: &str) -> Result<bool>;

    // Ordered by created_at, then id.
    fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Artifact>>;

    fn conversation_ids(&self) -> Result<Vec<String>>;
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for Box<S> {
    fn get(&self, conversation_id: &str, artifact_id: &str) -> Result<Option<Artifact>> {
        (**self).get(conversation_id, artifact_id)
    }

    fn set(&mut self, artifact: Artifact) -> Result<()> {
        (**self).set(artifact)
    }

    fn delete(&mut self, conversation_id: &str, artifact_id: &str) -> Result<bool> {
        (**self).delete(conversation_id, artifact_id)
    }

    fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Artifact>> {
        (**self).list_by_conversation(conversation_id)
    }

    fn conversation_ids(&self) -> Result<Vec<String>> {
        (**self).conversation_ids()
    }
}

pub fn open_store(backend: StoreBackend, path: &Path) -> Result<Box<dyn ArtifactStore>> {
    let store: Box<dyn ArtifactStore> = match backend {
        StoreBackend::Sqlite => Box::new(SqliteArtifactStore::open(path)?),
        StoreBackend::Json => Box::new(JsonFileArtifactStore::new(path)),
        StoreBackend::Memory => Box::new(MemoryArtifactStore::new()),
    };
    Ok(store)
}

fn sort_artifacts(artifacts: &mut [Artifact]) {
    artifacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}
