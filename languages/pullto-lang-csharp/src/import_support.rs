//! `using` directive parsing and merging

use crate::line_classifier::is_type_declaration_line;
use once_cell::sync::Lazy;
use pullto_foundation::{LineEnding, SourceDocument};
use regex::Regex;
use tracing::debug;

// `using (...)` blocks and `using var` declarations never match: both need a
// character the directive forms cannot contain before the `;`.
static USING_DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:global\s+)?using\s+(?:static\s+)?(?:[A-Za-z_]\w*\s*=\s*)?[A-Za-z_][\w.]*(?:<[\w.,\s<>]*>)?\s*;\s*$",
    )
    .expect("Invalid regex for using directives")
});

static NAMESPACE_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*namespace\b").expect("Invalid regex for namespace lines"));

/// True if the line is a `using` directive
pub fn is_using_directive(line: &str) -> bool {
    USING_DIRECTIVE_REGEX.is_match(line)
}

/// Index of the first line past the file header (namespace or type declaration)
fn header_end(document: &SourceDocument) -> usize {
    document
        .lines()
        .iter()
        .position(|line| NAMESPACE_LINE_REGEX.is_match(line) || is_type_declaration_line(line))
        .unwrap_or(document.line_count())
}

/// Using directives declared in the file header, trimmed, in source order
pub fn get_using_statements(text: &str) -> Vec<String> {
    let document = SourceDocument::new(text);
    document.lines()[..header_end(&document)]
        .iter()
        .filter(|line| is_using_directive(line))
        .map(|line| line.trim().to_string())
        .collect()
}

/// True if the text already declares `directive` (compared trimmed)
pub fn contains_using(text: &str, directive: &str) -> bool {
    let directive = directive.trim();
    get_using_statements(text).iter().any(|u| u == directive)
}

/// Merge `incoming` directives into the target's header
///
/// Existing directives keep their order and position; new ones are appended
/// after the last existing directive. A target without any directives gets a
/// new block at the top followed by a blank line.
pub fn add_usings_to_target(
    line_ending: LineEnding,
    target_text: &str,
    incoming: &[String],
) -> String {
    let existing = get_using_statements(target_text);
    let mut additions: Vec<String> = Vec::new();
    for directive in incoming {
        let directive = directive.trim();
        if directive.is_empty() || existing.iter().any(|e| e == directive) {
            continue;
        }
        if !additions.iter().any(|a| a == directive) {
            additions.push(directive.to_string());
        }
    }

    if additions.is_empty() {
        return target_text.to_string();
    }
    debug!(added = additions.len(), "Merging using directives into target");

    let document = SourceDocument::with_line_ending(target_text, line_ending);
    let header = header_end(&document);
    let mut lines = document.lines().to_vec();
    let last_using = lines[..header]
        .iter()
        .rposition(|line| is_using_directive(line));

    match last_using {
        Some(index) => {
            lines.splice(index + 1..index + 1, additions);
        }
        None => {
            let mut block = additions;
            block.push(String::new());
            lines.splice(0..0, block);
        }
    }

    let mut merged = lines.join(line_ending.as_str());
    if target_text.ends_with('\n') {
        merged.push_str(line_ending.as_str());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "using System;\nusing System.Linq;\nglobal using Sample.Core;\nusing static System.Math;\nusing Json = System.Text.Json;\n\nnamespace Sample\n{\n    public class A\n    {\n        public void Run()\n        {\n            using (var s = Open())\n            {\n            }\n            using var r = Open();\n        }\n    }\n}\n";

    #[test]
    fn test_using_statements_cover_directive_forms() {
        assert_eq!(
            get_using_statements(HEADER),
            vec![
                "using System;",
                "using System.Linq;",
                "global using Sample.Core;",
                "using static System.Math;",
                "using Json = System.Text.Json;",
            ]
        );
    }

    #[test]
    fn test_statement_forms_are_not_directives() {
        assert!(!is_using_directive("using (var s = Open())"));
        assert!(!is_using_directive("using var r = Open();"));
        assert!(is_using_directive("  using System.Collections.Generic;"));
    }

    #[test]
    fn test_merge_appends_new_directives_after_existing() {
        let target = "using System;\n\nnamespace Sample\n{\n}\n";
        let incoming = vec![
            "using System;".to_string(),
            "using SampleProject;".to_string(),
            "using SampleProject;".to_string(),
        ];
        let merged = add_usings_to_target(LineEnding::Lf, target, &incoming);
        assert_eq!(
            merged,
            "using System;\nusing SampleProject;\n\nnamespace Sample\n{\n}\n"
        );
        assert!(contains_using(&merged, "using SampleProject;"));
    }

    #[test]
    fn test_merge_into_target_without_directives() {
        let target = "namespace Sample;\n\npublic interface IBaseClass\n{\n}\n";
        let merged = add_usings_to_target(LineEnding::Lf, target, &["using System;".to_string()]);
        assert_eq!(
            merged,
            "using System;\n\nnamespace Sample;\n\npublic interface IBaseClass\n{\n}\n"
        );
    }

    #[test]
    fn test_merge_without_additions_is_identity() {
        let merged = add_usings_to_target(LineEnding::Crlf, HEADER, &["using System;".to_string()]);
        assert_eq!(merged, HEADER);
    }

    #[test]
    fn test_merge_uses_line_ending() {
        let target = "using System;\r\n\r\nnamespace Sample\r\n{\r\n}\r\n";
        let merged = add_usings_to_target(LineEnding::Crlf, target, &["using System.Linq;".to_string()]);
        assert_eq!(
            merged,
            "using System;\r\nusing System.Linq;\r\n\r\nnamespace Sample\r\n{\r\n}\r\n"
        );
    }
}
