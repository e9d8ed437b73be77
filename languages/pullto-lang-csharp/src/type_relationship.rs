//! Namespace, class name and base list extraction from a declaration header

use once_cell::sync::Lazy;
use pullto_foundation::{PullError, PullResult};
use regex::Regex;
use serde::Serialize;

static NAMESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnamespace\s+([A-Za-z_][\w.]*)").expect("Invalid regex for namespaces")
});

// Modifiers are skipped rather than required so abstract, sealed and partial
// classes resolve the same way as plain ones.
static CLASS_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bpublic\s+(?:(?:abstract|sealed|partial|static)\s+)*class\s+([A-Za-z_]\w*)")
        .expect("Invalid regex for class names")
});

static TYPE_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:class|interface|struct|record)\s+[A-Za-z_]\w*")
        .expect("Invalid regex for type headers")
});

/// Where a type sits in the hierarchy, derived fresh from source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRelationship {
    pub namespace: String,
    pub class_name: String,
    pub inherited_names: Vec<String>,
}

/// True if a type name follows the `I` interface naming convention
pub fn is_interface_name(name: &str) -> bool {
    name.starts_with('I')
}

/// First namespace declared in the text (block or file-scoped)
pub fn get_namespace(text: &str) -> PullResult<String> {
    NAMESPACE_REGEX
        .captures(text)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| PullError::structure_not_found("namespace"))
}

/// Name of the first `public class` declared in the text
pub fn get_class_name(text: &str) -> PullResult<String> {
    CLASS_NAME_REGEX
        .captures(text)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| PullError::structure_not_found("class name"))
}

/// Ordered base types of the first type declared in the text
///
/// For `class MyClass<T> : Base, IFoo, IBar<string> where T : class` this is
/// `[Base, IFoo, IBar]`, or `[IFoo, IBar]` when base classes are excluded.
/// Missing base lists yield an empty list.
pub fn get_inherited_names(text: &str, include_base_classes: bool) -> Vec<String> {
    let Some(header) = TYPE_HEADER_REGEX.find(text) else {
        return Vec::new();
    };
    let Some(base_list) = base_list_after(&text[header.end()..]) else {
        return Vec::new();
    };

    split_top_level(base_list)
        .into_iter()
        .map(clean_type_name)
        .filter(|name| !name.is_empty())
        .filter(|name| include_base_classes || is_interface_name(name))
        .collect()
}

/// Namespace, class name and base types of a class source file
pub fn parse_type_relationship(
    text: &str,
    include_base_classes: bool,
) -> PullResult<TypeRelationship> {
    Ok(TypeRelationship {
        namespace: get_namespace(text)?,
        class_name: get_class_name(text)?,
        inherited_names: get_inherited_names(text, include_base_classes),
    })
}

/// Text between the header's `:` and its `where` clause or body
fn base_list_after(rest: &str) -> Option<&str> {
    let mut angle = 0usize;
    let mut paren = 0usize;
    let mut colon = None;

    for (idx, c) in rest.char_indices() {
        match c {
            '<' => angle += 1,
            '>' => angle = angle.saturating_sub(1),
            '(' => paren += 1,
            ')' => paren = paren.saturating_sub(1),
            ':' if angle == 0 && paren == 0 => {
                colon = Some(idx);
                break;
            }
            '{' | ';' if angle == 0 && paren == 0 => return None,
            // A constraint clause before any `:` means there is no base list
            'w' if angle == 0 && paren == 0 && find_keyword(&rest[idx..], "where") == Some(0) => {
                let before = rest[..idx].chars().next_back();
                if before.map_or(true, |c| !(c.is_alphanumeric() || c == '_')) {
                    return None;
                }
            }
            _ => {}
        }
    }

    let list = &rest[colon? + 1..];
    let end = list.find(['{', ';']).unwrap_or(list.len());
    let list = &list[..end];
    let list = match find_keyword(list, "where") {
        Some(idx) => &list[..idx],
        None => list,
    };
    Some(list)
}

fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    text.match_indices(keyword).map(|(idx, _)| idx).find(|&idx| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + keyword.len()..].chars().next();
        let boundary = |c: Option<char>| c.map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        boundary(before) && boundary(after)
    })
}

/// Split on commas outside generic argument lists
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in list.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Drop whitespace, generic arguments and namespace qualifiers
fn clean_type_name(entry: &str) -> String {
    let compact: String = entry.chars().filter(|c| !c.is_whitespace()).collect();
    let without_generics = match compact.find('<') {
        Some(idx) => &compact[..idx],
        None => compact.as_str(),
    };
    let without_args = match without_generics.find('(') {
        Some(idx) => &without_generics[..idx],
        None => without_generics,
    };
    without_args
        .rsplit('.')
        .next()
        .unwrap_or(without_args)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_namespace() {
        assert_eq!(get_namespace("namespace Test\n    {\n    }").unwrap(), "Test");
        assert_eq!(get_namespace("namespace Sample;\n").unwrap(), "Sample");
        assert_eq!(
            get_namespace("namespace Company.Product.Core {").unwrap(),
            "Company.Product.Core"
        );
    }

    #[test]
    fn test_missing_namespace_is_structure_error() {
        let err = get_namespace("foo bar").unwrap_err();
        assert!(matches!(err, PullError::StructureNotFound { .. }));
        assert_eq!(err.user_message(), "Could not find the namespace.");
    }

    #[test]
    fn test_get_class_name() {
        let text = "namespace Test\n{\n    public class TestModel\n    {\n    }\n}";
        assert_eq!(get_class_name(text).unwrap(), "TestModel");

        let text = "namespace Test\n{\n    public abstract class TestModel\n    {\n    }\n}";
        assert_eq!(get_class_name(text).unwrap(), "TestModel");

        assert!(get_class_name("foo bar").is_err());
    }

    #[test]
    fn test_inherited_names_with_where_clause() {
        let text = "class MyClass<T> : Base, IFoo, IBar<string> where T : class\n{\n}";
        assert_eq!(get_inherited_names(text, false), vec!["IFoo", "IBar"]);
        assert_eq!(get_inherited_names(text, true), vec!["Base", "IFoo", "IBar"]);
    }

    #[test]
    fn test_inherited_names_without_where_clause() {
        let text = "public class BaseClass : IBaseClass\n{\n    public int A => 5;\n}";
        assert_eq!(get_inherited_names(text, true), vec!["IBaseClass"]);
    }

    #[test]
    fn test_inherited_names_keep_generic_commas_together() {
        let text = "public class Cache : IDictionary<string, int>, System.IDisposable {";
        assert_eq!(
            get_inherited_names(text, true),
            vec!["IDictionary", "IDisposable"]
        );
    }

    #[test]
    fn test_inherited_names_of_interface_and_record() {
        assert_eq!(
            get_inherited_names("public interface IMyClass : IBase, IOther\n{\n}", true),
            vec!["IBase", "IOther"]
        );
        assert_eq!(
            get_inherited_names("public record Person(string Name) : Entity, IAudited;", true),
            vec!["Entity", "IAudited"]
        );
    }

    #[test]
    fn test_no_base_list() {
        assert!(get_inherited_names("public class Plain\n{\n}", true).is_empty());
        assert!(get_inherited_names("foo bar", true).is_empty());
    }

    #[test]
    fn test_constraint_colon_is_not_a_base_list() {
        let text = "public class Sorter<T> where T : IComparable<T>\n{\n}";
        assert!(get_inherited_names(text, true).is_empty());
        // `where` inside a longer name is not a clause
        assert_eq!(
            get_inherited_names("public class Somewhere : IPlace\n{\n}", true),
            vec!["IPlace"]
        );
    }

    #[test]
    fn test_parse_type_relationship() {
        let text = "namespace Sample\n{\n    public class MyClass<TType> : BaseClass, IMyClass where TType : class\n    {\n    }\n}";
        let rel = parse_type_relationship(text, false).unwrap();
        assert_eq!(rel.namespace, "Sample");
        assert_eq!(rel.class_name, "MyClass");
        assert_eq!(rel.inherited_names, vec!["IMyClass"]);
    }
}
