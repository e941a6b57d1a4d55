//! Plain-text exports of the matrix for pasting into spreadsheets

use crate::model::{column_label, DsmState};
use anyhow::Result;

/// Component names in display order, one per line
pub fn component_list_text(state: &DsmState) -> String {
    state
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated matrix grid, `None` when there are no components
///
/// The header row is an empty cell followed by one label per component.
/// Each row starts with its label; the diagonal repeats it and linked
/// cells hold `X`.
pub fn matrix_text(state: &DsmState) -> Result<Option<String>> {
    let count = state.components.len();
    if count == 0 {
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let header: Vec<String> = std::iter::once(String::new())
        .chain((0..count).map(column_label))
        .collect();
    writer.write_record(&header)?;

    for row in 0..count {
        let label = column_label(row);
        let mut record = Vec::with_capacity(count + 1);
        record.push(label.clone());
        for col in 0..count {
            let cell = if row == col {
                label.clone()
            } else if state.is_cell_linked(row, col) {
                "X".to_string()
            } else {
                String::new()
            };
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush matrix export: {}", e.error()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(Some(text))
}
