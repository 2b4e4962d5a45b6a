use html_escape::encode_text;

use crate::model::TabularData;

pub fn render_html_table(header: &[String], rows: &[Vec<String>]) -> String {
    let col_count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<String>::new();
    lines.push("<table>".to_string());

    if !header.is_empty() {
        lines.push("<thead>".to_string());
        lines.push(render_row(header, col_count, "th"));
        lines.push("</thead>".to_string());
    }

    lines.push("<tbody>".to_string());
    for row in rows {
        lines.push(render_row(row, col_count, "td"));
    }
    lines.push("</tbody>".to_string());
    lines.push("</table>".to_string());

    lines.join("\n")
}

fn render_row(cells: &[String], col_count: usize, tag: &str) -> String {
    let mut out = String::from("<tr>");
    for index in 0..col_count {
        let cell = cells.get(index).map(String::as_str).unwrap_or("");
        out.push_str(&format!("<{tag}>{}</{tag}>", encode_text(cell)));
    }
    out.push_str("</tr>");
    out
}

pub fn render_tabular_data(table: &TabularData) -> Option<String> {
    if table.headers.is_empty() && table.data.is_empty() {
        return None;
    }

    Some(render_html_table(&table.headers, &table.data))
}
