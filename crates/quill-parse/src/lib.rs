//! Java parsing utilities shared by the Quill assist crates.
//!
//! Everything here is built on `tree-sitter-java`. The helpers are
//! deliberately best-effort: callers treat a failed extraction as "this
//! source does not match", never as a fatal error.

use std::cell::RefCell;
use std::collections::HashMap;

use quill_types::Span;
use tree_sitter::{Node, Parser, Tree};

thread_local! {
    static JAVA_PARSER: RefCell<Result<Parser, String>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(tree_sitter_java::language()) {
            Ok(()) => Ok(parser),
            Err(_) => Err("tree-sitter-java language load failed".to_string()),
        }
    });
}

/// Parse Java source text with `tree-sitter-java`.
///
/// The parser instance is reused per thread; parse results are never cached,
/// so repeated calls on the same text reparse.
pub fn parse_java(source: &str) -> Result<Tree, String> {
    JAVA_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| "tree-sitter parser is already in use".to_string())?;
        let parser = match parser.as_mut() {
            Ok(parser) => parser,
            Err(err) => return Err(err.clone()),
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| "tree-sitter failed to produce a syntax tree".to_string())?;
        if tree.root_node().has_error() {
            tracing::debug!("parsed Java source contains syntax errors");
        }
        Ok(tree)
    })
}

/// Visit a node and all its descendants in pre-order.
pub fn visit_nodes<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    if node.child_count() == 0 {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_nodes(child, f);
    }
}

/// Find the first named child with the given kind.
pub fn find_named_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    found
}

/// Fetch a declaration's `modifiers` node, falling back to a named child.
pub fn modifier_node(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("modifiers")
        .or_else(|| find_named_child(node, "modifiers"))
}

/// Return the byte slice for `node` within `source`.
pub fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

/// Span of a node within its source.
pub fn node_span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// A parsed Java annotation use site.
///
/// ## Argument semantics
/// - A single positional argument is stored under the key `value`, matching
///   Java's shorthand rules.
/// - String and char literal values have their surrounding quotes stripped,
///   but escape sequences are preserved (no unescaping).
/// - Class literals such as `Foo.class` are stored *with* the `.class`
///   suffix intact; see [`parse_class_literal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAnnotation {
    pub simple_name: String,
    pub args: HashMap<String, String>,
    pub span: Span,
}

impl ParsedAnnotation {
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }
}

/// Collect all annotations attached to a declaration's modifiers node.
pub fn collect_annotations(modifiers: Node<'_>, source: &str) -> Vec<ParsedAnnotation> {
    let mut anns = Vec::new();
    let mut cursor = modifiers.walk();
    for child in modifiers.named_children(&mut cursor) {
        if matches!(child.kind(), "annotation" | "marker_annotation") {
            if let Some(ann) = parse_annotation(child, source) {
                anns.push(ann);
            }
        }
    }
    anns
}

/// Parse a single `annotation` or `marker_annotation` node.
pub fn parse_annotation(node: Node<'_>, source: &str) -> Option<ParsedAnnotation> {
    let name = node.child_by_field_name("name")?;
    let name_text = node_text(source, name);
    let simple_name = name_text
        .rsplit('.')
        .next()
        .unwrap_or(name_text)
        .trim()
        .to_string();

    let mut args = HashMap::new();
    if let Some(arg_list) = node.child_by_field_name("arguments") {
        let mut cursor = arg_list.walk();
        for arg in arg_list.named_children(&mut cursor) {
            if arg.kind() == "element_value_pair" {
                let Some(key) = arg.child_by_field_name("key") else {
                    continue;
                };
                let Some(value) = arg.child_by_field_name("value") else {
                    continue;
                };
                args.insert(
                    node_text(source, key).to_string(),
                    element_value_text(value, source),
                );
            } else {
                // Single positional argument => `value`.
                args.insert("value".to_string(), element_value_text(arg, source));
            }
        }
    }

    Some(ParsedAnnotation {
        simple_name,
        args,
        span: node_span(node),
    })
}

/// Render an annotation element value as text, stripping literal quotes.
pub fn element_value_text(node: Node<'_>, source: &str) -> String {
    let text = node_text(source, node).trim();
    match node.kind() {
        "string_literal" | "character_literal" if text.len() >= 2 => {
            text[1..text.len() - 1].to_string()
        }
        _ => text.to_string(),
    }
}

/// Parse a class literal like `Foo.class` into a type name (`Foo`).
///
/// Best-effort: also accepts qualified literals (`a.b.Foo.class` yields
/// `a.b.Foo`) and bare type names without the `.class` suffix.
pub fn parse_class_literal(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let value = value.strip_suffix(".class").unwrap_or(value).trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Remove all whitespace from a type-like string.
pub fn clean_type(raw: &str) -> String {
    raw.split_whitespace().collect::<String>()
}

/// Reduce a type-like string to its unqualified base name.
///
/// Strips whitespace, generic arguments, array suffixes, and qualifiers.
/// Returns `None` when nothing identifier-like remains (e.g. a bare `?`
/// wildcard), so callers can fall back to their own defaults.
pub fn simple_type_name(raw: &str) -> Option<String> {
    let compact = clean_type(raw);
    let no_generics = strip_generic_args(&compact);
    let no_array = no_generics.trim_end_matches("[]");
    let simple = no_array.rsplit('.').next().unwrap_or(no_array);
    if simple.is_empty() || !simple.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return None;
    }
    Some(simple.to_string())
}

fn strip_generic_args(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0u32;
    for ch in raw.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}
