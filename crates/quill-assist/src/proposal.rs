//! Final shape of an assist offered to the editor.

use crate::edit::WorkspaceEdit;

pub const RETURN_LABEL: &str = "Generate hierarchy switch (return)";
pub const BREAK_LABEL: &str = "Generate hierarchy switch (break)";

/// Return-style completion sorts above break-style.
pub const RETURN_RELEVANCE: u32 = 12;
pub const BREAK_RELEVANCE: u32 = 11;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub label: String,
    /// Higher sorts first in the assist list.
    pub relevance: u32,
    pub edit: WorkspaceEdit,
}

impl Proposal {
    pub fn new(label: impl Into<String>, relevance: u32, edit: WorkspaceEdit) -> Self {
        Self {
            label: label.into(),
            relevance,
            edit,
        }
    }
}
