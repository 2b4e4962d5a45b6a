#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineKind {
    Blank,
    Separator,
    Row,
    Prose,
}

impl LineKind {
    pub fn is_pipe(self) -> bool {
        matches!(self, Self::Separator | Self::Row)
    }
}

// start..end excludes the line terminator.
#[derive(Copy, Clone, Debug)]
pub struct Line<'a> {
    pub number: usize,
    pub kind: LineKind,
    pub content: &'a str,
    pub start: usize,
    pub end: usize,
}

pub fn classify_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::<Line<'_>>::new();
    let mut offset = 0usize;

    for (index, raw) in text.split_inclusive('\n').enumerate() {
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);

        lines.push(Line {
            number: index + 1,
            kind: classify_line(content),
            content,
            start: offset,
            end: offset + content.len(),
        });
        offset += raw.len();
    }

    lines
}

pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    // A lone pipe or a line missing either outer pipe is unbalanced.
    if trimmed.len() < 2 || !trimmed.starts_with('|') || !trimmed.ends_with('|') {
        return LineKind::Prose;
    }

    if is_separator(trimmed) {
        LineKind::Separator
    } else {
        LineKind::Row
    }
}

fn is_separator(trimmed: &str) -> bool {
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|ch| matches!(ch, '|' | '-' | ':') || ch.is_whitespace())
}

pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    inner
        .split('|')
        .map(str::trim)
        .map(ToOwned::to_owned)
        .collect()
}
