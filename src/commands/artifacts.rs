use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

use super::open_library;
use crate::cli::ArtifactCommands;
use crate::model::Artifact;
use crate::util::write_json_stdout;

#[derive(Debug, Serialize)]
struct ArtifactListing {
    conversation_id: String,
    returned: usize,
    artifacts: Vec<Artifact>,
}

pub fn run(command: ArtifactCommands) -> Result<()> {
    match command {
        ArtifactCommands::List(args) => {
            let library = open_library(&args.store)?;
            let artifacts = match args.kind {
                Some(kind) => library.of_kind(&args.conversation_id, kind)?,
                None => library.list(&args.conversation_id)?,
            };

            write_json_stdout(&ArtifactListing {
                conversation_id: args.conversation_id,
                returned: artifacts.len(),
                artifacts,
            })
        }
        ArtifactCommands::Show(args) => {
            let library = open_library(&args.store)?;
            match library.get(&args.conversation_id, &args.id)? {
                Some(artifact) => write_json_stdout(&artifact),
                None => bail!(
                    "artifact {} not found in conversation {}",
                    args.id,
                    args.conversation_id
                ),
            }
        }
        ArtifactCommands::Delete(args) => {
            let mut library = open_library(&args.store)?;
            if !library.delete(&args.conversation_id, &args.id)? {
                bail!(
                    "artifact {} not found in conversation {}",
                    args.id,
                    args.conversation_id
                );
            }
            Ok(())
        }
        ArtifactCommands::Clear(args) => {
            let mut library = open_library(&args.store)?;
            let removed = library.clear_conversation(&args.conversation_id)?;
            info!(conversation_id = %args.conversation_id, removed, "clear complete");
            Ok(())
        }
    }
}
