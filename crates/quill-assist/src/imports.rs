//! Type references and import planning.
//!
//! Given a type declaration, compute the reference text usable at the edit
//! location: the simple name when it is unambiguous there, the fully
//! qualified name when another type with the same simple name shadows it,
//! and otherwise the simple name plus a recorded import.

use quill_parse::{node_text, parse_java};
use quill_types::FileId;

use crate::semantic::{Semantics, TypeDecl};

/// A resolved reference to a type at a particular location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeReference {
    /// Text to splice into the generated code.
    pub text: String,
    /// Qualified name to import, when one is needed.
    pub import: Option<String>,
}

impl TypeReference {
    fn simple(name: &str) -> Self {
        Self {
            text: name.to_string(),
            import: None,
        }
    }
}

/// Compute how `target` should be referenced from `editing_file`.
pub fn type_reference(
    sema: &Semantics<'_>,
    editing_file: &FileId,
    editing_source: &str,
    target: &TypeDecl,
) -> TypeReference {
    if target.file == *editing_file {
        return TypeReference::simple(&target.name);
    }

    let qualified = target.qualified_name();
    let imports = existing_imports(editing_source);

    // A local declaration or an existing import of a *different* type with
    // the same simple name shadows the target: fall back to the qualified
    // name instead of adding a clashing import.
    let dotted_suffix = format!(".{}", target.name);
    let shadowed_locally = sema
        .types_in_file(editing_file)
        .iter()
        .any(|decl| decl.name == target.name && decl.qualified_name() != qualified);
    let shadowed_by_import = imports
        .iter()
        .any(|imp| imp.ends_with(&dotted_suffix) && *imp != qualified);
    if shadowed_locally || shadowed_by_import {
        return TypeReference {
            text: qualified,
            import: None,
        };
    }

    if imports.iter().any(|imp| *imp == qualified) {
        return TypeReference::simple(&target.name);
    }

    // Top-level types of the same package are visible without an import.
    if target.enclosing.is_empty() && target.package.as_deref() == file_package(editing_source) {
        return TypeReference::simple(&target.name);
    }

    TypeReference {
        text: target.name.clone(),
        import: Some(qualified),
    }
}

/// Where and how new imports are inserted in a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSite {
    offset: usize,
    style: ImportStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImportStyle {
    /// Appending after an existing import list.
    AfterImports,
    /// Starting an import section after the package declaration.
    AfterPackage,
    /// No package, no imports: the top of the file.
    TopOfFile,
}

impl ImportSite {
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Render a sorted batch of qualified names as one insertion.
    pub fn render<'a>(&self, imports: impl Iterator<Item = &'a str>) -> String {
        let mut out = String::new();
        match self.style {
            ImportStyle::AfterImports => {
                for import in imports {
                    out.push_str("\nimport ");
                    out.push_str(import);
                    out.push(';');
                }
            }
            ImportStyle::AfterPackage => {
                out.push('\n');
                for import in imports {
                    out.push_str("\nimport ");
                    out.push_str(import);
                    out.push(';');
                }
            }
            ImportStyle::TopOfFile => {
                for import in imports {
                    out.push_str("import ");
                    out.push_str(import);
                    out.push_str(";\n");
                }
                out.push('\n');
            }
        }
        out
    }
}

/// Locate the import insertion point of a file.
pub fn import_site(source: &str) -> ImportSite {
    let Ok(tree) = parse_java(source) else {
        return ImportSite {
            offset: 0,
            style: ImportStyle::TopOfFile,
        };
    };
    let root = tree.root_node();

    let mut last_import_end = None;
    let mut package_end = None;
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "import_declaration" => last_import_end = Some(child.end_byte()),
            "package_declaration" => package_end = Some(child.end_byte()),
            _ => {}
        }
    }

    if let Some(offset) = last_import_end {
        ImportSite {
            offset,
            style: ImportStyle::AfterImports,
        }
    } else if let Some(offset) = package_end {
        ImportSite {
            offset,
            style: ImportStyle::AfterPackage,
        }
    } else {
        ImportSite {
            offset: 0,
            style: ImportStyle::TopOfFile,
        }
    }
}

/// Qualified names imported by a file (single-type imports only).
pub fn existing_imports(source: &str) -> Vec<String> {
    let Ok(tree) = parse_java(source) else {
        return Vec::new();
    };
    let root = tree.root_node();
    let mut out = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut inner = child.walk();
        let name = child
            .named_children(&mut inner)
            .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"));
        if let Some(name) = name {
            out.push(node_text(source, name).to_string());
        }
    }
    out
}

fn file_package(source: &str) -> Option<&str> {
    let tree = parse_java(source).ok()?;
    let root = tree.root_node();
    let pkg = quill_parse::find_named_child(root, "package_declaration")?;
    let mut cursor = pkg.walk();
    let name = pkg
        .named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
        .last()?;
    // Safe: the span came from this parse of `source`.
    Some(&source[name.byte_range()])
}
