use tracing::{debug, warn};

use super::html::render_html_table;
use super::lexer::{Line, LineKind, classify_lines, split_cells};
use super::{ExtractionFailure, ExtractionResult};

const MIN_CONTENT_ROWS: usize = 2;

pub fn extract_tables(text: Option<&str>) -> Option<ExtractionResult> {
    extract_tables_str(text?)
}

pub fn extract_tables_str(text: &str) -> Option<ExtractionResult> {
    if !text.contains('|') {
        return None;
    }

    match try_extract_tables(text) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "table extraction failed; leaving text unchanged");
            None
        }
    }
}

fn try_extract_tables(text: &str) -> Result<Option<ExtractionResult>, ExtractionFailure> {
    let lines = classify_lines(text);
    let mut result = ExtractionResult::default();

    for block in table_blocks(&lines) {
        let (first, last) = match (block.first(), block.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => continue,
        };

        let rows = block
            .iter()
            .filter(|line| line.kind == LineKind::Row)
            .map(|line| split_cells(line.content))
            .collect::<Vec<Vec<String>>>();

        if rows.iter().flatten().all(|cell| cell.is_empty()) {
            return Err(ExtractionFailure::EmptyTable { line: first.number });
        }

        // Header is the first non-separator row; never re-detected further down.
        let Some((header, body)) = rows.split_first() else {
            continue;
        };

        debug!(
            line = first.number,
            rows = rows.len(),
            columns = header.len(),
            "extracted markdown table"
        );
        result.push(
            render_html_table(header, body),
            text[first.start..last.end].to_string(),
        );
    }

    Ok((!result.is_empty()).then_some(result))
}

fn table_blocks<'l, 'a>(lines: &'l [Line<'a>]) -> Vec<&'l [Line<'a>]> {
    let mut blocks = Vec::<&'l [Line<'a>]>::new();
    let mut index = 0usize;

    while index < lines.len() {
        if !lines[index].kind.is_pipe() {
            index += 1;
            continue;
        }

        let start = index;
        while index < lines.len() && lines[index].kind.is_pipe() {
            index += 1;
        }

        let run = &lines[start..index];
        let content_rows = run
            .iter()
            .filter(|line| line.kind == LineKind::Row)
            .count();
        if content_rows >= MIN_CONTENT_ROWS {
            blocks.push(run);
        }
    }

    blocks
}
