//! Finding the switch statement a cursor position targets.

use quill_types::Span;
use tree_sitter::Node;

/// A switch statement accepted as a rewrite target.
#[derive(Clone, Copy, Debug)]
pub struct SwitchTarget<'tree> {
    /// The whole switch statement.
    pub node: Node<'tree>,
    /// The expression inside the switch parentheses.
    pub subject: Node<'tree>,
}

/// Locate the switch statement covered by `selection`.
///
/// The covered node must be the switch itself or (a sub-expression of) its
/// subject expression. Walking upward is allowed only while every visited
/// ancestor stays inside the subject subtree: selecting inside a case body
/// never matches, so applying the assist can never clobber an enclosing
/// switch from within one of its cases.
pub fn locate_switch<'tree>(root: Node<'tree>, selection: Span) -> Option<SwitchTarget<'tree>> {
    let covered = root.named_descendant_for_byte_range(selection.start, selection.end)?;

    let switch = if covered.kind() == "switch_expression" {
        covered
    } else {
        let mut heir = covered;
        let parent = loop {
            let parent = heir.parent()?;
            if parent.kind() == "switch_expression" {
                break parent;
            }
            heir = parent;
        };
        // Arriving from anywhere but the condition subtree means the cursor
        // was in the body part of the switch.
        if parent.child_by_field_name("condition") != Some(heir) {
            tracing::debug!("selection is inside a switch body, not its subject");
            return None;
        }
        parent
    };

    let condition = switch.child_by_field_name("condition")?;
    let subject = condition.named_child(0)?;

    // Only a switch in statement position can be replaced by one (plus an
    // optional trailing statement).
    if !in_statement_position(switch) {
        tracing::debug!("switch is used as an expression, not a statement");
        return None;
    }

    Some(SwitchTarget {
        node: switch,
        subject,
    })
}

fn in_statement_position(switch: Node<'_>) -> bool {
    match switch.parent() {
        None => true,
        Some(parent) => matches!(
            parent.kind(),
            "program"
                | "block"
                | "constructor_body"
                | "switch_block_statement_group"
                | "if_statement"
                | "for_statement"
                | "enhanced_for_statement"
                | "while_statement"
                | "do_statement"
                | "labeled_statement"
        ),
    }
}
