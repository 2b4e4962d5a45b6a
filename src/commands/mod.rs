pub mod artifacts;
pub mod extract;
pub mod render;
pub mod status;

use anyhow::Result;
use tracing::info;

use crate::artifacts::ArtifactLibrary;
use crate::cli::StoreArgs;
use crate::store::{ArtifactStore, open_store};

fn open_library(args: &StoreArgs) -> Result<ArtifactLibrary<Box<dyn ArtifactStore>>> {
    let path = args.resolved_path();
    info!(backend = args.backend.as_str(), path = %path.display(), "opening artifact store");
    Ok(ArtifactLibrary::new(open_store(args.backend, &path)?))
}
