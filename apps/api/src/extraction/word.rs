use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::extraction::ExtractionError;

pub const MIN_WORD_TEXT_CHARS: usize = 10;

/// Pulls the raw text runs out of an OOXML (`.docx`) container, one line
/// per paragraph. Table cells are read row by row, and runs nested in
/// hyperlinks count as paragraph text.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::ParseFailure(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(&mut text, paragraph),
            DocumentChild::Table(table) => push_table(&mut text, table),
            _ => {}
        }
    }

    if text.trim().chars().count() < MIN_WORD_TEXT_CHARS {
        return Err(ExtractionError::ParseFailure(
            "No text could be extracted from the Word document.".to_string(),
        ));
    }
    Ok(text)
}

fn push_paragraph(text: &mut String, paragraph: &Paragraph) {
    push_inline(text, &paragraph.children);
    text.push('\n');
}

fn push_inline(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Hyperlink(link) => push_inline(text, &link.children),
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push(' '),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn push_table(text: &mut String, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(text, paragraph),
                    TableCellContent::Table(nested) => push_table(text, nested),
                    _ => {}
                }
            }
        }
    }
}

/// Legacy binary `.doc` files have no decoder in this runtime.
pub fn extract_doc(_bytes: &[u8]) -> Result<String, ExtractionError> {
    Err(ExtractionError::UnavailableProcessor(
        "Legacy .doc processing is not available. Please convert to DOCX, PDF, or plain text."
            .to_string(),
    ))
}
