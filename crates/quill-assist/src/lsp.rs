use std::collections::HashMap;

use lsp_types::{
    CodeAction, CodeActionKind, Position, Range, TextEdit as LspTextEdit, Uri,
    WorkspaceEdit as LspWorkspaceEdit,
};
use thiserror::Error;

use crate::edit::WorkspaceEdit;
use crate::proposal::Proposal;
use crate::semantic::AssistDatabase;
use quill_types::FileId;

#[derive(Debug, Error)]
pub enum LspConversionError {
    #[error("unknown file {0:?}")]
    UnknownFile(FileId),
    #[error("invalid uri for {0:?}")]
    InvalidUri(FileId),
}

/// Convert an internal [`WorkspaceEdit`] into an LSP [`WorkspaceEdit`].
pub fn workspace_edit_to_lsp(
    db: &dyn AssistDatabase,
    edit: &WorkspaceEdit,
) -> Result<LspWorkspaceEdit, LspConversionError> {
    let mut changes: HashMap<Uri, Vec<LspTextEdit>> = HashMap::new();

    for e in &edit.edits {
        let text = db
            .file_text(&e.file)
            .ok_or_else(|| LspConversionError::UnknownFile(e.file.clone()))?;
        let uri = file_id_to_uri(&e.file)?;

        let range = Range {
            start: offset_to_position(text, e.range.start),
            end: offset_to_position(text, e.range.end),
        };

        changes.entry(uri).or_default().push(LspTextEdit {
            range,
            new_text: e.replacement.clone(),
        });
    }

    // LSP clients tend to apply edits sequentially. Provide them in reverse
    // order so offsets stay valid even under sequential application.
    for edits in changes.values_mut() {
        edits.sort_by(|a, b| {
            b.range
                .start
                .line
                .cmp(&a.range.start.line)
                .then_with(|| b.range.start.character.cmp(&a.range.start.character))
                .then_with(|| b.range.end.line.cmp(&a.range.end.line))
                .then_with(|| b.range.end.character.cmp(&a.range.end.character))
        });
    }

    Ok(LspWorkspaceEdit {
        changes: Some(changes),
        document_changes: None,
        change_annotations: None,
    })
}

/// Publish a proposal as a refactor-rewrite code action.
pub fn proposal_to_code_action(
    db: &dyn AssistDatabase,
    proposal: &Proposal,
) -> Result<CodeAction, LspConversionError> {
    let edit = workspace_edit_to_lsp(db, &proposal.edit)?;
    Ok(CodeAction {
        title: proposal.label.clone(),
        kind: Some(CodeActionKind::REFACTOR_REWRITE),
        edit: Some(edit),
        command: None,
        diagnostics: None,
        is_preferred: Some(proposal.relevance >= crate::proposal::RETURN_RELEVANCE),
        disabled: None,
        data: None,
    })
}

fn file_id_to_uri(file: &FileId) -> Result<Uri, LspConversionError> {
    file.as_str()
        .parse::<Uri>()
        .map_err(|_| LspConversionError::InvalidUri(file.clone()))
}

fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line: u32 = 0;
    let mut col_utf16: u32 = 0;

    let mut i = 0;
    for ch in text.chars() {
        if i >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            col_utf16 = 0;
        } else {
            col_utf16 += ch.len_utf16() as u32;
        }

        i += ch.len_utf8();
    }

    Position {
        line,
        character: col_utf16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_count_utf16_units() {
        let text = "a𝄞b\ncd";
        assert_eq!(offset_to_position(text, 0), Position::new(0, 0));
        // The clef is 4 bytes of UTF-8 but two UTF-16 units.
        assert_eq!(offset_to_position(text, 5), Position::new(0, 3));
        assert_eq!(offset_to_position(text, 7), Position::new(1, 0));
    }
}
