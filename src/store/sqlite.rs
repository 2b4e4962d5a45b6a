use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::ArtifactStore;
use crate::model::{Artifact, ArtifactKind};
use crate::util::{ensure_directory, now_utc_string};

const DB_SCHEMA_VERSION: &str = "0.1.0";

pub struct SqliteArtifactStore {
    connection: Connection,
}

impl SqliteArtifactStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory(parent)?;
        }

        let connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        configure_connection(&connection)?;
        Self::from_connection(connection)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        ensure_schema(&connection)?;
        Ok(Self { connection })
    }
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS artifacts (
              conversation_id TEXT NOT NULL,
              artifact_id TEXT NOT NULL,
              kind TEXT NOT NULL,
              title TEXT NOT NULL,
              content TEXT NOT NULL,
              created_at TEXT NOT NULL,
              PRIMARY KEY (conversation_id, artifact_id)
            );

            CREATE INDEX IF NOT EXISTS idx_artifacts_conversation_created
              ON artifacts(conversation_id, created_at, artifact_id);
            ",
        )
        .context("failed to initialize artifact schema")?;

    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now_utc_string()],
    )?;

    Ok(())
}

struct ArtifactRow {
    id: String,
    conversation_id: String,
    kind: String,
    title: String,
    content: String,
    created_at: String,
}

impl ArtifactRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            conversation_id: row.get(1)?,
            kind: row.get(2)?,
            title: row.get(3)?,
            content: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_artifact(self) -> Result<Artifact> {
        let kind = self
            .kind
            .parse::<ArtifactKind>()
            .with_context(|| format!("invalid kind stored for artifact {}", self.id))?;

        Ok(Artifact {
            id: self.id,
            conversation_id: self.conversation_id,
            kind,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

impl ArtifactStore for SqliteArtifactStore {
    fn get(&self, conversation_id: &str, artifact_id: &str) -> Result<Option<Artifact>> {
        let row = self
            .connection
            .query_row(
                "
                SELECT artifact_id, conversation_id, kind, title, content, created_at
                FROM artifacts
                WHERE conversation_id = ?1 AND artifact_id = ?2
                LIMIT 1
                ",
                params![conversation_id, artifact_id],
                ArtifactRow::from_row,
            )
            .optional()
            .with_context(|| format!("failed to load artifact {artifact_id}"))?;

        row.map(ArtifactRow::into_artifact).transpose()
    }

    fn set(&mut self, artifact: Artifact) -> Result<()> {
        self.connection
            .execute(
                "
                INSERT INTO artifacts(conversation_id, artifact_id, kind, title, content, created_at)
                VALUES(?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(conversation_id, artifact_id) DO UPDATE SET
                  kind=excluded.kind,
                  title=excluded.title,
                  content=excluded.content,
                  created_at=excluded.created_at
                ",
                params![
                    artifact.conversation_id,
                    artifact.id,
                    artifact.kind.as_str(),
                    artifact.title,
                    artifact.content,
                    artifact.created_at,
                ],
            )
            .with_context(|| format!("failed to store artifact {}", artifact.id))?;

        debug!(
            conversation_id = %artifact.conversation_id,
            artifact_id = %artifact.id,
            "stored artifact"
        );
        Ok(())
    }

    fn delete(&mut self, conversation_id: &str, artifact_id: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute(
                "DELETE FROM artifacts WHERE conversation_id = ?1 AND artifact_id = ?2",
                params![conversation_id, artifact_id],
            )
            .with_context(|| format!("failed to delete artifact {artifact_id}"))?;

        Ok(removed > 0)
    }

    fn list_by_conversation(&self, conversation_id: &str) -> Result<Vec<Artifact>> {
        let mut statement = self.connection.prepare(
            "
            SELECT artifact_id, conversation_id, kind, title, content, created_at
            FROM artifacts
            WHERE conversation_id = ?1
            ORDER BY created_at ASC, artifact_id ASC
            ",
        )?;

        let mut rows = statement.query([conversation_id])?;
        let mut out = Vec::<Artifact>::new();

        while let Some(row) = rows.next()? {
            out.push(ArtifactRow::from_row(row)?.into_artifact()?);
        }

        Ok(out)
    }

    fn conversation_ids(&self) -> Result<Vec<String>> {
        let mut statement = self.connection.prepare(
            "SELECT DISTINCT conversation_id FROM artifacts ORDER BY conversation_id ASC",
        )?;

        let mut rows = statement.query([])?;
        let mut out = Vec::<String>::new();

        while let Some(row) = rows.next()? {
            out.push(row.get(0)?);
        }

        Ok(out)
    }
}
