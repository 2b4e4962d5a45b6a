use thiserror::Error;

mod clean;
mod extract;
mod html;
mod lexer;

pub use clean::clean_text;
pub use extract::extract_tables;
pub use html::render_tabular_data;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub html_tables: Vec<String>,
    pub markdown_tables: Vec<String>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.html_tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html_tables.is_empty()
    }

    fn push(&mut self, html: String, markdown: String) {
        self.html_tables.push(html);
        self.markdown_tables.push(markdown);
    }
}

#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("table starting at line {line} has no non-empty cells")]
    EmptyTable { line: usize },

    #[error("extracted table {index} does not occur in the text being cleaned")]
    TableNotFound { index: usize },

    #[error("failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}
