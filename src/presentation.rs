use tracing::info;

use crate::model::{ArtifactDraft, ArtifactKind, ChatPresentation, InferenceResponse};
use crate::tables::{clean_text, extract_tables, render_tabular_data};

pub fn present(response: &InferenceResponse) -> ChatPresentation {
    let raw = response.response.as_deref();
    let (text, mut tables) = match extract_tables(raw) {
        Some(extraction) => (
            clean_text(raw.unwrap_or_default(), &extraction),
            extraction.html_tables,
        ),
        None => (raw.unwrap_or_default().to_string(), Vec::new()),
    };
    let extracted = tables.len();

    if let Some(html) = response.table_data.as_ref().and_then(render_tabular_data) {
        tables.push(html);
    }

    let map_html = response
        .map_html
        .as_ref()
        .filter(|html| !html.trim().is_empty())
        .cloned();

    info!(
        extracted_tables = extracted,
        structured_tables = tables.len() - extracted,
        has_map = map_html.is_some(),
        "prepared chat presentation"
    );

    ChatPresentation {
        text,
        table_count: tables.len(),
        tables,
        map_html,
    }
}

pub fn collect_artifacts(conversation_id: &str, presentation: &ChatPresentation) -> Vec<ArtifactDraft> {
    let mut drafts = Vec::<ArtifactDraft>::new();

    if let Some(map_html) = &presentation.map_html {
        drafts.push(ArtifactDraft {
            conversation_id: conversation_id.to_string(),
            kind: ArtifactKind::Map,
            title: "Map".to_string(),
            content: map_html.clone(),
        });
    }

    for (index, table) in presentation.tables.iter().enumerate() {
        drafts.push(ArtifactDraft {
            conversation_id: conversation_id.to_string(),
            kind: ArtifactKind::Extract,
            title: format!("Table {}", index + 1),
            content: table.clone(),
        });
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TabularData;

    fn response(text: &str) -> InferenceResponse {
        InferenceResponse {
            response: Some(text.to_string()),
            ..InferenceResponse::default()
        }
    }

    #[test]
    fn plain_text_passes_through_untouched() {
        let presentation = present(&response("No tables, just an answer"));

        assert_eq!(presentation.text, "No tables, just an answer");
        assert!(presentation.tables.is_empty());
        assert_eq!(presentation.table_count, 0);
    }

    #[test]
    fn markdown_and_structured_tables_are_counted_together() {
        let mut input = response("Counts:\n\n| Zone | Sites |\n|---|---|\n| A | 4 |\n");
        input.table_data = Some(TabularData {
            headers: vec!["Zone".to_string()],
            data: vec![vec!["B".to_string()]],
        });
        input.map_html = Some("<div>map</div>".to_string());

        let presentation = present(&input);

        assert_eq!(presentation.table_count, 2);
        assert_eq!(presentation.tables.len(), 2);
        assert!(presentation.tables[0].contains("<td>4</td>"));
        assert!(presentation.tables[1].contains("<td>B</td>"));
        assert!(presentation.text.contains("_Table data is available in the visualization panel_"));
        assert_eq!(presentation.map_html.as_deref(), Some("<div>map</div>"));
    }

    #[test]
    fn missing_response_text_yields_empty_presentation() {
        let presentation = present(&InferenceResponse::default());

        assert!(presentation.text.is_empty());
        assert_eq!(presentation.table_count, 0);
    }

    #[test]
    fn blank_map_html_is_dropped() {
        let mut input = response("hello");
        input.map_html = Some("   ".to_string());

        assert!(present(&input).map_html.is_none());
    }

    #[test]
    fn collect_artifacts_drafts_map_and_tables() {
        let mut input = response("| A |\n| 1 |");
        input.map_html = Some("<div>map</div>".to_string());
        let presentation = present(&input);

        let drafts = collect_artifacts("conv-1", &presentation);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].kind, ArtifactKind::Map);
        assert_eq!(drafts[1].kind, ArtifactKind::Extract);
        assert_eq!(drafts[1].title, "Table 1");
        assert!(drafts.iter().all(|draft| draft.conversation_id == "conv-1"));
    }
}
