use regex::Regex;
use tracing::warn;

use super::{ExtractionFailure, ExtractionResult};

const NOTE_MARKER: &str = "Note:";
const EMPTY_RESPONSE_LEAD: &str = "I've prepared the requested data.";
const SINGLE_TABLE_REFERENCE: &str = "_Table data is available in the visualization panel_";

pub fn clean_text(text: &str, extraction: &ExtractionResult) -> String {
    match try_clean_text(text, extraction) {
        Ok(cleaned) => cleaned,
        Err(err) => {
            warn!(error = %err, "failed to clean extracted tables; returning original text");
            text.to_string()
        }
    }
}

fn try_clean_text(text: &str, extraction: &ExtractionResult) -> Result<String, ExtractionFailure> {
    let paragraph_break = Regex::new(r"\r?\n[ \t]*\r?\n")?;
    let excess_breaks = Regex::new(r"(?:\r?\n){3,}")?;

    let mut remaining = text.to_string();
    let mut note = None::<String>;

    for (index, table) in extraction.markdown_tables.iter().enumerate() {
        let start = find_line_aligned(&remaining, table)
            .ok_or(ExtractionFailure::TableNotFound { index })?;
        let mut cut_end = start + table.len();

        if note.is_none()
            && let Some((body, note_end)) = note_after(&remaining, cut_end, &paragraph_break)
        {
            note = Some(body);
            cut_end = note_end;
        }

        remaining.replace_range(start..cut_end, "");
    }

    let collapsed = excess_breaks.replace_all(&remaining, "\n\n");
    let body = collapsed.trim();
    let reference = reference_sentence(extraction.len(), note.as_deref());

    if body.is_empty() {
        return Ok(format!("{EMPTY_RESPONSE_LEAD}\n\n{reference}"));
    }

    let mut out = body.to_string();
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    Ok(format!("{out}\n\n{reference}"))
}

// Tables are whole lines, so a match inside a prose line is not the table.
pub(super) fn find_line_aligned(text: &str, table: &str) -> Option<usize> {
    let mut from = 0usize;

    while let Some(offset) = text[from..].find(table) {
        let start = from + offset;
        let rest = &text[start + table.len()..];
        let starts_line = start == 0 || text[..start].ends_with('\n');
        let ends_line = rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n");
        if starts_line && ends_line {
            return Some(start);
        }

        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

fn note_after(text: &str, from: usize, paragraph_break: &Regex) -> Option<(String, usize)> {
    let tail = &text[from..];
    let leading = tail.len() - tail.trim_start().len();
    let body = tail[leading..].strip_prefix(NOTE_MARKER)?;

    let paragraph_len = paragraph_break
        .find(body)
        .map(|found| found.start())
        .unwrap_or(body.len());
    let note = body[..paragraph_len].trim();
    if note.is_empty() {
        return None;
    }

    Some((
        note.to_string(),
        from + leading + NOTE_MARKER.len() + paragraph_len,
    ))
}

fn reference_sentence(table_count: usize, note: Option<&str>) -> String {
    let mut reference = if table_count > 1 {
        format!("_{table_count} tables are available in the visualization panel_")
    } else {
        SINGLE_TABLE_REFERENCE.to_string()
    };

    if let Some(note) = note {
        reference.push_str(&format!("\n\n_{note}_"));
    }

    reference
}
