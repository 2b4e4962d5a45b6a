use anyhow::{Result, bail};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::model::{Artifact, ArtifactDraft, ArtifactKind};
use crate::store::ArtifactStore;

const ARTIFACT_ID_HEX_LEN: usize = 16;

pub struct ArtifactLibrary<S> {
    store: S,
}

impl<S: ArtifactStore> ArtifactLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, draft: ArtifactDraft) -> Result<Artifact> {
        self.save_at(draft, Utc::now())
    }

    pub fn save_at(&mut self, draft: ArtifactDraft, created: DateTime<Utc>) -> Result<Artifact> {
        let conversation_id = require_conversation_id(&draft.conversation_id)?;
        let created_at = created.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut sequence = self.store.list_by_conversation(conversation_id)?.len();
        let mut id = artifact_id(&draft, &created_at, sequence);
        // Never reuse an id that is still stored.
        while self.store.get(conversation_id, &id)?.is_some() {
            sequence += 1;
            id = artifact_id(&draft, &created_at, sequence);
        }

        let artifact = Artifact {
            id,
            conversation_id: conversation_id.to_string(),
            kind: draft.kind,
            title: draft.title,
            content: draft.content,
            created_at,
        };
        self.store.set(artifact.clone())?;

        info!(
            conversation_id = %artifact.conversation_id,
            artifact_id = %artifact.id,
            kind = %artifact.kind,
            "saved artifact"
        );
        Ok(artifact)
    }

    pub fn get(&self, conversation_id: &str, artifact_id: &str) -> Result<Option<Artifact>> {
        self.store
            .get(require_conversation_id(conversation_id)?, artifact_id)
    }

    pub fn list(&self, conversation_id: &str) -> Result<Vec<Artifact>> {
        self.store
            .list_by_conversation(require_conversation_id(conversation_id)?)
    }

    pub fn of_kind(&self, conversation_id: &str, kind: ArtifactKind) -> Result<Vec<Artifact>> {
        Ok(self
            .list(conversation_id)?
            .into_iter()
            .filter(|artifact| artifact.kind == kind)
            .collect())
    }

    pub fn latest_of_kind(&self, conversation_id: &str, kind: ArtifactKind) -> Result<Option<Artifact>> {
        Ok(self.of_kind(conversation_id, kind)?.pop())
    }

    pub fn delete(&mut self, conversation_id: &str, artifact_id: &str) -> Result<bool> {
        let removed = self
            .store
            .delete(require_conversation_id(conversation_id)?, artifact_id)?;
        if removed {
            info!(conversation_id, artifact_id, "deleted artifact");
        }
        Ok(removed)
    }

    pub fn clear_conversation(&mut self, conversation_id: &str) -> Result<usize> {
        let mut removed = 0usize;
        for artifact in self.list(conversation_id)? {
            if self.store.delete(&artifact.conversation_id, &artifact.id)? {
                removed += 1;
            }
        }

        info!(conversation_id, removed, "cleared conversation artifacts");
        Ok(removed)
    }

    pub fn conversation_ids(&self) -> Result<Vec<String>> {
        self.store.conversation_ids()
    }
}

fn require_conversation_id(conversation_id: &str) -> Result<&str> {
    let trimmed = conversation_id.trim();
    if trimmed.is_empty() {
        bail!("conversation id must not be empty");
    }
    Ok(trimmed)
}

fn artifact_id(draft: &ArtifactDraft, created_at: &str, sequence: usize) -> String {
    let mut hasher = Sha256::new();
    for part in [
        draft.conversation_id.trim(),
        draft.kind.as_str(),
        draft.title.as_str(),
        draft.content.as_str(),
        created_at,
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(sequence.to_le_bytes());

    let digest = format!("{:x}", hasher.finalize());
    format!("{}-{}", draft.kind, &digest[..ARTIFACT_ID_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::store::MemoryArtifactStore;

    fn draft(conversation_id: &str, kind: ArtifactKind, title: &str) -> ArtifactDraft {
        ArtifactDraft {
            conversation_id: conversation_id.to_string(),
            kind,
            title: title.to_string(),
            content: format!("<div>{title}</div>"),
        }
    }

    fn at(seconds: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, seconds)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn save_assigns_kind_prefixed_id_and_timestamp() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());
        let saved = library
            .save_at(draft("conv-1", ArtifactKind::Map, "Flood zones"), at(0))
            .unwrap();

        assert!(saved.id.starts_with("map-"));
        assert_eq!(saved.id.len(), "map-".len() + ARTIFACT_ID_HEX_LEN);
        assert_eq!(saved.created_at, "2026-03-01T12:00:00.000Z");
        assert_eq!(library.get("conv-1", &saved.id).unwrap(), Some(saved));
    }

    #[test]
    fn identical_drafts_get_distinct_ids() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());
        let first = library
            .save_at(draft("conv-1", ArtifactKind::Extract, "Table 1"), at(0))
            .unwrap();
        let second = library
            .save_at(draft("conv-1", ArtifactKind::Extract, "Table 1"), at(0))
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(library.list("conv-1").unwrap().len(), 2);
    }

    #[test]
    fn resave_after_delete_does_not_overwrite_survivor() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());
        let first = library
            .save_at(draft("conv-1", ArtifactKind::Extract, "Table 1"), at(0))
            .unwrap();
        let second = library
            .save_at(draft("conv-1", ArtifactKind::Extract, "Table 1"), at(0))
            .unwrap();

        assert!(library.delete("conv-1", &first.id).unwrap());
        let third = library
            .save_at(draft("conv-1", ArtifactKind::Extract, "Table 1"), at(0))
            .unwrap();

        assert_ne!(third.id, second.id);
        let ids = library
            .list("conv-1")
            .unwrap()
            .into_iter()
            .map(|artifact| artifact.id)
            .collect::<Vec<String>>();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&second.id));
        assert!(ids.contains(&third.id));
    }

    #[test]
    fn kind_filters_and_latest() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());
        library
            .save_at(draft("conv-1", ArtifactKind::Map, "Old map"), at(1))
            .unwrap();
        library
            .save_at(draft("conv-1", ArtifactKind::Report, "Summary"), at(2))
            .unwrap();
        library
            .save_at(draft("conv-1", ArtifactKind::Map, "New map"), at(3))
            .unwrap();

        assert_eq!(library.of_kind("conv-1", ArtifactKind::Map).unwrap().len(), 2);
        assert_eq!(
            library
                .latest_of_kind("conv-1", ArtifactKind::Map)
                .unwrap()
                .map(|artifact| artifact.title),
            Some("New map".to_string())
        );
        assert!(
            library
                .latest_of_kind("conv-1", ArtifactKind::Chart)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn clear_conversation_leaves_other_conversations() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());
        library
            .save_at(draft("conv-1", ArtifactKind::Map, "A"), at(1))
            .unwrap();
        library
            .save_at(draft("conv-1", ArtifactKind::Chart, "B"), at(2))
            .unwrap();
        let kept = library
            .save_at(draft("conv-2", ArtifactKind::Map, "C"), at(3))
            .unwrap();

        assert_eq!(library.clear_conversation("conv-1").unwrap(), 2);
        assert!(library.list("conv-1").unwrap().is_empty());
        assert_eq!(library.list("conv-2").unwrap(), vec![kept]);
        assert_eq!(library.conversation_ids().unwrap(), vec!["conv-2".to_string()]);
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());
        let saved = library
            .save_at(draft("conv-1", ArtifactKind::Report, "R"), at(0))
            .unwrap();

        assert!(library.delete("conv-1", &saved.id).unwrap());
        assert!(!library.delete("conv-1", &saved.id).unwrap());
    }

    #[test]
    fn blank_conversation_id_is_rejected() {
        let mut library = ArtifactLibrary::new(MemoryArtifactStore::new());

        assert!(library.save(draft("  ", ArtifactKind::Map, "A")).is_err());
        assert!(library.list("").is_err());
    }
}
