use anyhow::Result;
use tracing::info;

use crate::cli::ExtractArgs;
use crate::model::InferenceResponse;
use crate::presentation::present;
use crate::util::{read_input, write_json_stdout};

pub fn run(args: ExtractArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    info!(chars = text.chars().count(), "extracting tables from text");

    let presentation = present(&InferenceResponse {
        response: Some(text),
        ..InferenceResponse::default()
    });
    write_json_stdout(&presentation)
}
