use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use quill_assist::{
    apply_workspace_edit, hierarchy_switch_assists, FileId, Proposal, SourceWorkspace, Span,
};

fn fixture_selection(fixture: &str) -> (String, Span) {
    let start_marker = "/*[*/";
    let end_marker = "/*]*/";
    let start = fixture.find(start_marker).expect("missing start marker");
    let mut code = fixture.to_string();
    code.replace_range(start..start + start_marker.len(), "");
    let end = code.find(end_marker).expect("missing end marker");
    code.replace_range(end..end + end_marker.len(), "");
    (code, Span::new(start, end))
}

fn applied(workspace: &SourceWorkspace, proposal: &Proposal) -> BTreeMap<FileId, String> {
    apply_workspace_edit(workspace.files(), &proposal.edit).expect("apply edits")
}

#[test]
fn method_dispatch_generates_return_and_break_proposals() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy("getKind")
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class),
        SQUARE(Square.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Square extends Shape {
    Kind getKind() {
        return Kind.SQUARE;
    }
}

class Renderer {
    String describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
        return "";
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);
    assert_eq!(proposals[0].label, "Generate hierarchy switch (return)");
    assert_eq!(proposals[0].relevance, 12);
    assert_eq!(proposals[1].label, "Generate hierarchy switch (break)");
    assert_eq!(proposals[1].relevance, 11);

    let with_return = applied(&workspace, &proposals[0]);
    assert_eq!(
        with_return.get(&file).unwrap(),
        r#"
package geometry;

@Hierarchy("getKind")
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class),
        SQUARE(Square.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Square extends Shape {
    Kind getKind() {
        return Kind.SQUARE;
    }
}

class Renderer {
    String describe(Shape shape) {
        switch (shape.getKind()) {
            case CIRCLE: {
                final Circle circle = (Circle) shape;
                return null;
            }
            case SQUARE: {
                final Square square = (Square) shape;
                return null;
            }
        }
        return "";
    }
}
"#
    );

    let with_break = applied(&workspace, &proposals[1]);
    let text = with_break.get(&file).unwrap();
    assert!(text.contains(
        "        switch (shape.getKind()) {\n            case CIRCLE: {\n                final Circle circle = (Circle) shape;\n                break;\n            }"
    ));
    assert!(!text.contains("throw"));
}

#[test]
fn field_dispatch_reads_the_member_without_a_call() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy(value = "ckind", field = true)
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    Kind ckind;
}

class Circle extends Shape {
}

class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return.get(&file).unwrap().contains(
        "        switch (shape.ckind) {\n            case CIRCLE: {\n                final Circle circle = (Circle) shape;\n                return;\n            }\n        }"
    ));
}

fn fallback_fixture(renderer: &str) -> String {
    format!(
        r#"
package geometry;

@Hierarchy(value = "getKind", unmatched = BadKindException.class)
abstract class Shape {{
    enum Kind {{
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {{
        }}
    }}

    abstract Kind getKind();
}}

class Circle extends Shape {{
    Kind getKind() {{
        return Kind.CIRCLE;
    }}
}}

class BadKindException extends RuntimeException {{
    BadKindException(Enum<?> kind) {{
        super(kind.toString());
    }}
}}

{renderer}"#
    )
}

#[test]
fn fallback_in_a_braceless_if_body_wraps_in_a_block() {
    let (code, selection) = fixture_selection(&fallback_fixture(
        r#"class Renderer {
    String describe(Shape shape, boolean detailed) {
        if (detailed)
            switch (/*[*/shape/*]*/) {
            }
        return "";
    }
}
"#,
    ));

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return.get(&file).unwrap().contains(
        r#"        if (detailed)
            {
                switch (shape.getKind()) {
                    case CIRCLE: {
                        final Circle circle = (Circle) shape;
                        return null;
                    }
                }
                throw new BadKindException(shape.getKind());
            }
        return "";"#
    ));

    // The break flavor needs no fallback, so it stays in place.
    let with_break = applied(&workspace, &proposals[1]);
    assert!(with_break.get(&file).unwrap().contains(
        r#"        if (detailed)
            switch (shape.getKind()) {
                case CIRCLE: {
                    final Circle circle = (Circle) shape;
                    break;
                }
            }
        return "";"#
    ));
}

#[test]
fn fallback_in_a_statement_list_becomes_a_sibling() {
    let (code, selection) = fixture_selection(&fallback_fixture(
        r#"class Renderer {
    String describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
        return "";
    }
}
"#,
    ));

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return.get(&file).unwrap().contains(
        r#"        switch (shape.getKind()) {
            case CIRCLE: {
                final Circle circle = (Circle) shape;
                return null;
            }
        }
        throw new BadKindException(shape.getKind());
        return "";"#
    ));

    let with_break = applied(&workspace, &proposals[1]);
    assert!(!with_break.get(&file).unwrap().contains("throw"));
}

#[test]
fn fallback_after_the_last_list_element_appends() {
    let (code, selection) = fixture_selection(&fallback_fixture(
        r#"class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    ));

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return.get(&file).unwrap().contains(
        "        }\n        throw new BadKindException(shape.getKind());\n    }"
    ));
}

#[test]
fn unmatched_type_outside_runtime_exception_aborts() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy(value = "getKind", unmatched = PlainType.class)
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class PlainType {
    PlainType(Enum<?> kind) {
    }
}

class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);
    assert!(hierarchy_switch_assists(&workspace, &file, selection).is_empty());
}

#[test]
fn unmatched_type_without_enum_constructor_aborts() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy(value = "getKind", unmatched = BadKindException.class)
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class BadKindException extends RuntimeException {
    BadKindException(String message) {
        super(message);
    }
}

class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);
    assert!(hierarchy_switch_assists(&workspace, &file, selection).is_empty());
}

#[test]
fn selection_inside_a_case_body_is_inapplicable() {
    let (code, selection) = fixture_selection(
        r#"
class T {
    void m(int x) {
        switch (x) {
            case 1: {
                /*[*/int unused = 0;/*]*/
                break;
            }
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("T.java", code);
    assert!(hierarchy_switch_assists(&workspace, &file, selection).is_empty());
}

#[test]
fn switch_in_expression_position_is_inapplicable() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy("getKind")
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Renderer {
    Object describe(Shape shape) {
        return switch (/*[*/shape/*]*/) {
        };
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);
    assert!(hierarchy_switch_assists(&workspace, &file, selection).is_empty());
}

#[test]
fn external_dispatcher_reuses_the_subject_expression() {
    let (code, selection) = fixture_selection(
        r#"
package vfs;

class Resource {
}

class FileResource extends Resource {
}

class FolderResource extends Resource {
}

enum ResourceKind {
    FILE(FileResource.class),
    FOLDER(FolderResource.class);

    ResourceKind(Class<?> witness) {
    }
}

class Dispatch {
    @Hierarchy("")
    static ResourceKind kindOf(Resource res) {
        return ResourceKind.FILE;
    }

    void handle(Resource res) {
        switch (/*[*/Dispatch.kindOf(res)/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("vfs/Resources.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return.get(&file).unwrap().contains(
        r#"        switch (Dispatch.kindOf(res)) {
            case FILE: {
                final FileResource fileresource = (FileResource) res;
                return;
            }
            case FOLDER: {
                final FolderResource folderresource = (FolderResource) res;
                return;
            }
        }"#
    ));
}

#[test]
fn empty_enumeration_yields_a_caseless_switch() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy("getKind")
abstract class Shape {
    enum Kind {
    }

    abstract Kind getKind();
}

class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return
        .get(&file)
        .unwrap()
        .contains("        switch (shape.getKind()) {\n        }\n"));
}

#[test]
fn annotation_type_defaults_supply_the_fallback() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@interface Hierarchy {
    String value();

    boolean field() default false;

    Class<?> unmatched() default BadKindException.class;
}

class BadKindException extends RuntimeException {
    BadKindException(Enum<?> kind) {
        super(kind.toString());
    }
}

@Hierarchy("getKind")
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Renderer {
    String describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
        return "";
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return
        .get(&file)
        .unwrap()
        .contains("throw new BadKindException(shape.getKind());"));

    let with_break = applied(&workspace, &proposals[1]);
    assert!(!with_break.get(&file).unwrap().contains("throw"));
}

fn cross_file_hierarchy() -> (SourceWorkspace, FileId) {
    let mut workspace = SourceWorkspace::new();
    let geometry = workspace.add_file(
        "geometry/Shapes.java",
        r#"
package geometry;

@Hierarchy("getKind")
public abstract class Shape {
    public enum Kind {
        CIRCLE(Circle.class),
        SQUARE(Square.class);

        Kind(Class<?> witness) {
        }
    }

    public abstract Kind getKind();
}

class Circle extends Shape {
    public Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Square extends Shape {
    public Kind getKind() {
        return Kind.SQUARE;
    }
}
"#,
    );
    (workspace, geometry)
}

#[test]
fn cross_file_variant_types_get_imported() {
    let (mut workspace, geometry) = cross_file_hierarchy();
    let (code, selection) = fixture_selection(
        r#"
package app;

import geometry.Shape;

class Renderer {
    void render(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );
    let file = workspace.add_file("app/Renderer.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    assert_eq!(
        with_return.get(&file).unwrap(),
        r#"
package app;

import geometry.Shape;
import geometry.Circle;
import geometry.Square;

class Renderer {
    void render(Shape shape) {
        switch (shape.getKind()) {
            case CIRCLE: {
                final Circle circle = (Circle) shape;
                return;
            }
            case SQUARE: {
                final Square square = (Square) shape;
                return;
            }
        }
    }
}
"#
    );

    // The hierarchy's own file is untouched.
    assert_eq!(
        with_return.get(&geometry).unwrap(),
        workspace.files().get(&geometry).unwrap()
    );
}

#[test]
fn shadowed_variant_type_is_qualified_instead_of_imported() {
    let (mut workspace, _geometry) = cross_file_hierarchy();
    let (code, selection) = fixture_selection(
        r#"
package app;

import geometry.Shape;

class Circle {
}

class Renderer {
    String render(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
        return "";
    }
}
"#,
    );
    let file = workspace.add_file("app/Renderer.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    let with_return = applied(&workspace, &proposals[0]);
    let text = with_return.get(&file).unwrap();

    assert!(text.contains("final geometry.Circle circle = (geometry.Circle) shape;"));
    assert!(text.contains("import geometry.Square;"));
    assert!(!text.contains("import geometry.Circle;"));
}

#[test]
fn proposals_are_deterministic() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy("getKind")
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let first = hierarchy_switch_assists(&workspace, &file, selection.clone());
    let second = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(first, second);
}

#[test]
fn nested_variant_types_resolve_by_simple_name() {
    let (code, selection) = fixture_selection(
        r#"
package notes;

@Hierarchy("getKind")
abstract class Model {
    enum Kind {
        NOTE(Note.class),
        TASK(Task.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();

    static class Note extends Model {
        Kind getKind() {
            return Kind.NOTE;
        }
    }

    static class Task extends Model {
        Kind getKind() {
            return Kind.TASK;
        }
    }
}

class Viewer {
    String title(Model m) {
        switch (/*[*/m/*]*/) {
        }
        return "";
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("notes/Model.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);

    let with_return = applied(&workspace, &proposals[0]);
    let updated = with_return.get(&file).unwrap();
    assert!(updated.contains(
        "        switch (m.getKind()) {\n            case NOTE: {\n                final Note note = (Note) m;\n                return null;\n            }\n            case TASK: {\n                final Task task = (Task) m;\n                return null;\n            }\n        }"
    ));
    // Nested members of the same file never gain an import.
    assert!(!updated.contains("import"));
}

#[test]
fn external_dispatcher_with_nonempty_value_still_applies() {
    let (code, selection) = fixture_selection(
        r#"
package vfs;

class Resource {
}

class FileResource extends Resource {
}

enum ResourceKind {
    FILE(FileResource.class);

    ResourceKind(Class<?> witness) {
    }
}

class Dispatch {
    @Hierarchy("oops")
    static ResourceKind kindOf(Resource res) {
        return ResourceKind.FILE;
    }

    void handle(Resource res) {
        switch (/*[*/Dispatch.kindOf(res)/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("vfs/Resources.java", code);

    // A stray value on the dispatcher is diagnosed, not fatal.
    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);
    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return
        .get(&file)
        .unwrap()
        .contains("switch (Dispatch.kindOf(res)) {"));
}

#[test]
fn nonboolean_field_member_falls_back_to_method_dispatch() {
    let (code, selection) = fixture_selection(
        r#"
package geometry;

@Hierarchy(value = "getKind", field = 1)
abstract class Shape {
    enum Kind {
        CIRCLE(Circle.class);

        Kind(Class<?> witness) {
        }
    }

    abstract Kind getKind();
}

class Circle extends Shape {
    Kind getKind() {
        return Kind.CIRCLE;
    }
}

class Renderer {
    void describe(Shape shape) {
        switch (/*[*/shape/*]*/) {
        }
    }
}
"#,
    );

    let mut workspace = SourceWorkspace::new();
    let file = workspace.add_file("geometry/Shapes.java", code);

    let proposals = hierarchy_switch_assists(&workspace, &file, selection);
    assert_eq!(proposals.len(), 2);
    let with_return = applied(&workspace, &proposals[0]);
    assert!(with_return
        .get(&file)
        .unwrap()
        .contains("switch (shape.getKind()) {"));
}
