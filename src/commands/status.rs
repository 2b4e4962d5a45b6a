use anyhow::Result;
use tracing::{info, warn};

use super::open_library;
use crate::cli::StatusArgs;
use crate::model::ArtifactKind;

pub fn run(args: StatusArgs) -> Result<()> {
    let path = args.store.resolved_path();
    if !path.exists() {
        warn!(path = %path.display(), "artifact store missing");
        return Ok(());
    }

    let library = open_library(&args.store)?;
    let conversation_ids = library.conversation_ids()?;
    let mut total = 0usize;

    for conversation_id in &conversation_ids {
        let artifacts = library.list(conversation_id)?;
        let count_of = |kind: ArtifactKind| {
            artifacts
                .iter()
                .filter(|artifact| artifact.kind == kind)
                .count()
        };

        let latest_map = library
            .latest_of_kind(conversation_id, ArtifactKind::Map)?
            .map(|artifact| artifact.id)
            .unwrap_or_default();

        info!(
            conversation_id = %conversation_id,
            artifacts = artifacts.len(),
            latest_map = %latest_map,
            maps = count_of(ArtifactKind::Map),
            reports = count_of(ArtifactKind::Report),
            charts = count_of(ArtifactKind::Chart),
            extracts = count_of(ArtifactKind::Extract),
            "conversation status"
        );
        total += artifacts.len();
    }

    info!(
        backend = args.store.backend.as_str(),
        path = %path.display(),
        conversations = conversation_ids.len(),
        artifacts = total,
        "artifact store status"
    );

    Ok(())
}
