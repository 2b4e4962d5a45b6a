use anyhow::{Context, Result};
use tracing::info;

use super::open_library;
use crate::cli::RenderArgs;
use crate::model::InferenceResponse;
use crate::presentation::{collect_artifacts, present};
use crate::util::{read_input, write_json_stdout};

pub fn run(args: RenderArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let response: InferenceResponse =
        serde_json::from_str(&raw).context("failed to parse inference response json")?;

    let presentation = present(&response);

    if let Some(conversation_id) = args.conversation_id.as_deref() {
        let mut library = open_library(&args.store)?;
        let drafts = collect_artifacts(conversation_id, &presentation);
        let draft_count = drafts.len();
        for draft in drafts {
            library.save(draft)?;
        }
        info!(conversation_id, artifacts = draft_count, "persisted response artifacts");
    }

    write_json_stdout(&presentation)
}
