use std::io::Cursor;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::{parse_blocking, DocumentFormat, ExtractionError, TextExtractor};
use crate::models::UploadedDocument;

/// Extracts the first worksheet of a workbook (xlsx, xls, xlsb, ods) using calamine
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetExtractor;

#[async_trait]
impl TextExtractor for SpreadsheetExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Spreadsheet
    }

    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        parse_blocking(DocumentFormat::Spreadsheet, document, extract_spreadsheet_text).await
    }
}

/// Serialize the first sheet of a workbook as a text table.
///
/// Only the first sheet is read; further sheets are ignored.
pub fn extract_spreadsheet_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ExtractionError::failed(DocumentFormat::Spreadsheet, e))?;

    let sheet_count = workbook.sheet_names().len();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ExtractionError::failed(DocumentFormat::Spreadsheet, "workbook has no sheets")
        })?
        .map_err(|e| ExtractionError::failed(DocumentFormat::Spreadsheet, e))?;

    let text = render_sheet(&range);

    tracing::info!(
        sheets = sheet_count,
        rows = range.height(),
        columns = range.width(),
        chars = text.len(),
        "Spreadsheet extracted (first sheet)"
    );

    Ok(text)
}

/// Render a cell range row by row, each column right-aligned to its widest cell.
pub fn render_sheet(range: &Range<Data>) -> String {
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| format!("{:>width$}", cell, width = widths[col]))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
