//! Pipe table rendering.

use crate::inline::InlineRenderer;
use crate::options::RenderOptions;
use crate::utilities::normalize;

/// Column alignment taken from the delimiter row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_cell(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        }
    }

    fn style(self) -> &'static str {
        match self {
            Alignment::None => "",
            Alignment::Left => r#" style="text-align: left;""#,
            Alignment::Center => r#" style="text-align: center;""#,
            Alignment::Right => r#" style="text-align: right;""#,
        }
    }
}

/// Render buffered table lines with default options
pub fn render_table(lines: &[&str]) -> String {
    let lines: Vec<String> = lines.iter().map(|line| normalize(line)).collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    render_table_with(&lines, &RenderOptions::default())
}

/// Render buffered table lines. Fewer than two lines is not a table and
/// renders as nothing.
pub fn render_table_with(lines: &[&str], options: &RenderOptions) -> String {
    if lines.len() < 2 {
        return String::new();
    }

    let inline = |cell: &str| InlineRenderer::new(options).render(cell);
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() * 2).sum());

    out.push_str("<table>\n<thead>\n<tr>\n");
    let headers = split_row(lines[0]);
    for &cell in &headers {
        out.push_str("<th>");
        out.push_str(&inline(cell));
        out.push_str("</th>\n");
    }
    out.push_str("</tr>\n</thead>\n");

    let has_alignment = lines[1].contains('-');
    let mut alignments = vec![Alignment::None; headers.len()];
    if has_alignment {
        for (slot, cell) in alignments.iter_mut().zip(split_row(lines[1])) {
            *slot = Alignment::from_cell(cell);
        }
    }

    out.push_str("<tbody>\n");
    let body_start = if has_alignment { 2 } else { 1 };
    for line in &lines[body_start..] {
        out.push_str("<tr>\n");
        for (i, cell) in split_row(line).into_iter().enumerate() {
            let style = alignments.get(i).copied().unwrap_or_default().style();
            out.push_str("<td");
            out.push_str(style);
            out.push('>');
            out.push_str(&inline(cell));
            out.push_str("</td>\n");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");

    log::debug!(
        "rendered table: {} columns, {} body rows",
        headers.len(),
        lines.len() - body_start
    );
    out
}

/// Split a row on `|`, dropping empty edge cells and trimming the rest
fn split_row(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.split('|').collect();

    if cells.first().is_some_and(|c| c.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }

    cells.into_iter().map(str::trim).collect()
}
