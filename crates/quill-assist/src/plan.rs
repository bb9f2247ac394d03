//! Insertion planning.
//!
//! Decides how the replacement switch (and the optional fallback statement)
//! is spliced into the surrounding code. The plan is chosen *before* the
//! switch is synthesized: the synthesizer must know at which indentation
//! the new code will sit, and whether a fallback can legally be inserted.

use quill_parse::node_span;
use quill_types::Span;
use tree_sitter::Node;

use crate::rewrite::RewriteLog;

pub(crate) const INDENT_UNIT: &str = "    ";

/// How the new switch is spliced into its host location.
///
/// Consumed exactly once by [`InsertionPlan::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertionPlan {
    /// Replace the old switch node directly. Never carries a fallback.
    InPlace { target: Span, indent: String },
    /// Replace the old switch with a block `{ switch; fallback; }`, used
    /// when the switch is freestanding or fills a single-child slot.
    WrapInBlock { target: Span, indent: String },
    /// The switch is an element of a statement list: replace it in place
    /// and insert the fallback as its next sibling. The successor at
    /// plan-construction time is recorded so the insertion point is stable.
    SpliceIntoList {
        target: Span,
        successor: Option<Span>,
        indent: String,
    },
}

/// Choose the splice strategy for a switch statement.
pub fn plan_insertion(switch: Node<'_>, source: &str, with_fallback: bool) -> InsertionPlan {
    let target = node_span(switch);
    let indent = line_indent(source, target.start);

    // Without a trailing statement the replacement always fits in place.
    if !with_fallback {
        return InsertionPlan::InPlace { target, indent };
    }

    let Some(parent) = switch.parent() else {
        return InsertionPlan::WrapInBlock { target, indent };
    };

    if is_statement_list(parent) {
        // The successor lookup doubles as the membership check.
        let mut cursor = parent.walk();
        let in_list = parent.named_children(&mut cursor).any(|child| child == switch);
        if !in_list {
            panic!("switch statement not found in its parent's statement list");
        }
        let successor = switch.next_named_sibling().map(node_span);
        return InsertionPlan::SpliceIntoList {
            target,
            successor,
            indent,
        };
    }

    // Single-child slot (braceless `if` body and friends): a new block is
    // the only way to hold two statements.
    InsertionPlan::WrapInBlock { target, indent }
}

impl InsertionPlan {
    /// Indentation the synthesized switch's continuation lines will use.
    pub fn switch_indent(&self) -> String {
        match self {
            InsertionPlan::InPlace { indent, .. }
            | InsertionPlan::SpliceIntoList { indent, .. } => indent.clone(),
            InsertionPlan::WrapInBlock { indent, .. } => format!("{indent}{INDENT_UNIT}"),
        }
    }

    /// Record the replacement (and fallback insertion) into the rewrite log.
    ///
    /// # Panics
    ///
    /// Panics when asked to insert a fallback under the `InPlace` strategy;
    /// the planner only chooses `InPlace` when no fallback will be needed,
    /// so that combination is a bug, not an input condition.
    pub fn apply(self, log: &mut RewriteLog, switch_text: String, fallback: Option<String>) {
        match self {
            InsertionPlan::InPlace { target, .. } => {
                assert!(
                    fallback.is_none(),
                    "fallback insertion requested under in-place replacement"
                );
                log.replace(target, switch_text, None);
            }
            InsertionPlan::WrapInBlock { target, indent } => {
                let inner = format!("{indent}{INDENT_UNIT}");
                let mut block = String::new();
                block.push_str("{\n");
                block.push_str(&inner);
                block.push_str(&switch_text);
                if let Some(fallback) = fallback {
                    block.push('\n');
                    block.push_str(&inner);
                    block.push_str(&fallback);
                }
                block.push('\n');
                block.push_str(&indent);
                block.push('}');
                log.replace(target, block, None);
            }
            InsertionPlan::SpliceIntoList {
                target,
                successor,
                indent,
            } => {
                log.replace(target, switch_text, None);
                if let Some(fallback) = fallback {
                    match successor {
                        Some(next) => {
                            log.insert_before(next.start, format!("{fallback}\n{indent}"), None)
                        }
                        None => log.insert_last(target.end, format!("\n{indent}{fallback}"), None),
                    }
                }
            }
        }
    }
}

fn is_statement_list(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "block" | "constructor_body" | "switch_block_statement_group" | "program"
    )
}

fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0);
    source[line_start..offset]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_parse::parse_java;

    fn switch_node_plan(source: &str, with_fallback: bool) -> InsertionPlan {
        let tree = parse_java(source).expect("parse");
        let mut found = None;
        quill_parse::visit_nodes(tree.root_node(), &mut |node| {
            if found.is_none() && node.kind() == "switch_expression" {
                found = Some(node);
            }
        });
        let node = found.expect("switch in fixture");
        plan_insertion(node, source, with_fallback)
    }

    #[test]
    fn no_fallback_is_always_in_place() {
        let plan = switch_node_plan(
            "class A { void m(int x) { if (x > 0) switch (x) {} } }",
            false,
        );
        assert!(matches!(plan, InsertionPlan::InPlace { .. }));
    }

    #[test]
    fn single_child_slot_wraps_in_block() {
        let plan = switch_node_plan(
            "class A { void m(int x) { if (x > 0) switch (x) {} } }",
            true,
        );
        assert!(matches!(plan, InsertionPlan::WrapInBlock { .. }));
    }

    #[test]
    fn list_element_splices_with_successor() {
        let plan = switch_node_plan(
            "class A { void m(int x) { switch (x) {} return; } }",
            true,
        );
        match plan {
            InsertionPlan::SpliceIntoList { successor, .. } => {
                assert!(successor.is_some());
            }
            other => panic!("expected list splice, got {other:?}"),
        }
    }

    #[test]
    fn list_tail_splices_without_successor() {
        let plan = switch_node_plan("class A { void m(int x) { switch (x) {} } }", true);
        match plan {
            InsertionPlan::SpliceIntoList { successor, .. } => {
                assert!(successor.is_none());
            }
            other => panic!("expected list splice, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "fallback insertion requested under in-place replacement")]
    fn in_place_rejects_fallback() {
        let plan = switch_node_plan("class A { void m(int x) { switch (x) {} } }", false);
        let mut log = RewriteLog::new(quill_types::FileId::new("A.java"));
        plan.apply(&mut log, "switch (x) {}".to_string(), Some("throw;".to_string()));
    }
}
