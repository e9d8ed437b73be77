//! Member extraction and merging over the sample project sources

use pretty_assertions::assert_eq;
use pullto_foundation::{EditorState, FileHandle, LineEnding, SourceDocument};
use pullto_lang_csharp::{
    add_member_to_document, add_usings_to_target, already_present, clean_excessive_blank_lines,
    extract_member_body, get_inherited_names, get_signature_to_pull, member_name,
    parse_type_relationship, remove_member_from_source, render_interface_member, Accessor,
    SignatureType,
};
use pullto_test_support::fixtures::{self, BASE_CLASS, I_BASE_CLASS, I_MY_CLASS, MY_CLASS};

fn editor(line: usize) -> EditorState {
    EditorState::new(
        FileHandle::new("MyClass.cs"),
        SourceDocument::new(MY_CLASS),
        line,
    )
}

#[test]
fn test_auto_property_into_empty_interface() {
    let member = get_signature_to_pull(&editor(fixtures::MY_PROPERTY_LINE)).unwrap();
    assert_eq!(member.signature_type(), SignatureType::FullProperty);

    let target = "namespace Sample\n{\n    public interface IMyClass { }\n}\n";
    let body = extract_member_body(&SourceDocument::new(MY_CLASS), &member).unwrap();
    let merged =
        add_member_to_document("IMyClass", &member, Some(&body), LineEnding::Lf, target, 4).unwrap();

    assert_eq!(
        merged,
        "namespace Sample\n{\n    public interface IMyClass\n    {\n        int MyProperty { get; set; }\n    }\n}\n"
    );
}

#[test]
fn test_lambda_property_is_read_only_in_interface() {
    let member = get_signature_to_pull(&editor(fixtures::MY_PROPERTY_LAMBDA_LINE)).unwrap();
    assert_eq!(member.signature_type(), SignatureType::LambdaProperty);
    assert_eq!(
        render_interface_member(&member, None).as_deref(),
        Some("int MyPropertyLamda { get; }")
    );
}

#[test]
fn test_block_property_keeps_setter() {
    let document = SourceDocument::new(MY_CLASS);
    let member = get_signature_to_pull(&editor(fixtures::FULL_PROPERTY_LINE)).unwrap();
    let body = extract_member_body(&document, &member).unwrap();
    assert_eq!(body, document.lines()[12..=16].join("\n"));
    assert_eq!(
        render_interface_member(&member, Some(&body)).as_deref(),
        Some("string FullProperty { get; set; }")
    );
}

#[test]
fn test_protected_method_is_found_with_its_accessor() {
    let member = get_signature_to_pull(&editor(fixtures::RESET_LINE)).unwrap();
    assert_eq!(member.accessor(), Accessor::Protected);
    assert_eq!(member.signature_type(), SignatureType::Method);
}

#[test]
fn test_sample_class_relationships() {
    let relationship = parse_type_relationship(MY_CLASS, true).unwrap();
    assert_eq!(relationship.namespace, "Sample");
    assert_eq!(relationship.class_name, "MyClass");
    assert_eq!(
        relationship.inherited_names,
        vec!["BaseClass", "IMyClass", "IMyTypedClass"]
    );

    let generic = "class MyClass<T> : Base, IFoo, IBar<string> where T : class\n{\n}\n";
    assert_eq!(get_inherited_names(generic, false), vec!["IFoo", "IBar"]);
    assert_eq!(get_inherited_names(generic, true), vec!["Base", "IFoo", "IBar"]);

    assert_eq!(get_inherited_names(I_BASE_CLASS, true), vec!["IDisposable"]);
}

#[test]
fn test_wrapped_method_body_round_trips() {
    let document = SourceDocument::new(MY_CLASS);
    let member = get_signature_to_pull(&editor(fixtures::GET_NEW_ID_BODY_LINE)).unwrap();
    assert_eq!(member.line_match_starts_on(), fixtures::GET_NEW_ID_LINE);

    let body = extract_member_body(&document, &member).unwrap();
    assert_eq!(body, document.lines()[28..=42].join("\n"));
    assert!(MY_CLASS.contains(&body));
    assert_eq!(
        member.signature().and_then(member_name).as_deref(),
        Some("GetNewIdAsync")
    );
}

#[test]
fn test_existing_declaration_is_detected() {
    let member = get_signature_to_pull(&editor(fixtures::GET_NEW_ID_LINE)).unwrap();
    let rendered = render_interface_member(&member, None);
    assert!(already_present(I_MY_CLASS, &member, rendered.as_deref()));

    let lambda = get_signature_to_pull(&editor(fixtures::MY_PROPERTY_LAMBDA_LINE)).unwrap();
    let rendered = render_interface_member(&lambda, None);
    assert!(!already_present(I_MY_CLASS, &lambda, rendered.as_deref()));
}

#[test]
fn test_guarded_merge_is_applied_once() {
    let member = get_signature_to_pull(&editor(fixtures::MY_PROPERTY_LAMBDA_LINE)).unwrap();
    let rendered = render_interface_member(&member, None);

    let mut target = fixtures::INTERFACE_FILE.to_string();
    for _ in 0..2 {
        if already_present(&target, &member, rendered.as_deref()) {
            continue;
        }
        target = add_member_to_document("IMyClass", &member, None, LineEnding::Lf, &target, 4)
            .unwrap();
    }
    assert_eq!(target.matches("MyPropertyLamda").count(), 1);
}

#[test]
fn test_move_to_base_class() {
    let document = SourceDocument::new(MY_CLASS);
    let member = get_signature_to_pull(&editor(fixtures::MY_PROPERTY_LAMBDA_LINE)).unwrap();
    let body = extract_member_body(&document, &member).unwrap();
    assert_eq!(body, "        public int MyPropertyLamda => 5;");

    let pulled = member.with_signature(body.clone());
    let merged =
        add_member_to_document("BaseClass", &pulled, None, LineEnding::Lf, BASE_CLASS, 4).unwrap();
    let merged = add_usings_to_target(LineEnding::Lf, &merged, &["using System.Text;".to_string()]);
    let merged = clean_excessive_blank_lines(&merged, LineEnding::Lf);

    assert!(merged.contains("using SampleProject;\nusing System.Text;\n\nnamespace Sample"));
    assert!(merged.contains(
        "    {\n        public int MyPropertyLamda => 5;\n        public int MyMethodLamda() => 5;"
    ));

    let source =
        remove_member_from_source(MY_CLASS, pulled.line_match_starts_on(), &body).unwrap();
    assert!(!source.contains("MyPropertyLamda"));
    assert!(source.contains("        public int MyProperty { get; set; }\n        public string FullProperty\n"));
}

#[test]
fn test_cursor_outside_any_member() {
    assert!(get_signature_to_pull(&editor(0)).is_none());
    assert!(get_signature_to_pull(&editor(7)).is_none());
}
