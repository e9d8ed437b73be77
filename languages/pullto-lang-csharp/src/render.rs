//! Target rendering and merging
//!
//! Every function here is a pure `&str -> String` step. The pull pipeline
//! chains them (add member, add usings, clean blank lines) and writes the
//! final text once.

use crate::signature::{clean_string, SignatureLineResult, SignatureType};
use crate::type_relationship::is_interface_name;
use once_cell::sync::Lazy;
use pullto_foundation::{LineEnding, SourceDocument};
use regex::Regex;
use tracing::debug;

static NAMESPACE_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*namespace\b").expect("Invalid regex for namespace lines"));

static LEADING_ATTRIBUTE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*").expect("Invalid regex for attributes"));

static WRITE_ACCESSOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\b(private|protected|internal)\s+)?\b(set|init)\b")
        .expect("Invalid regex for property accessors")
});

/// Modifiers ignored when checking whether a member is already in a target
const MEMBER_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "abstract", "virtual", "override", "async",
    "static", "sealed", "new", "extern", "readonly", "partial",
];

/// Modifiers an interface member declaration cannot carry
const ILLEGAL_INTERFACE_MODIFIERS: &[&str] = &[
    "public", "protected", "internal", "async", "virtual", "override", "abstract", "sealed",
    "static", "new", "extern",
];

/// What kind of container a pull target is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Interface,
    Class,
}

impl TargetKind {
    /// Interfaces are recognised by the `I` naming convention
    pub fn for_target_name(target_name: &str) -> Self {
        if is_interface_name(target_name) {
            TargetKind::Interface
        } else {
            TargetKind::Class
        }
    }

    fn container_pattern(&self, target_name: &str) -> String {
        let name = regex::escape(target_name);
        match self {
            TargetKind::Interface => format!(
                r"^\s*(?:(?:public|internal|partial)\s+)*interface\s+{}\b",
                name
            ),
            TargetKind::Class => format!(
                r"^\s*(?:(?:public|internal|abstract|sealed|partial|static)\s+)*(?:class|record|struct)\s+{}\b",
                name
            ),
        }
    }
}

fn drop_leading_words<'a>(mut text: &'a str, words: &[&str]) -> &'a str {
    loop {
        let trimmed = text.trim_start();
        let next = words.iter().find_map(|word| {
            trimmed
                .strip_prefix(word)
                .filter(|rest| rest.starts_with(char::is_whitespace))
        });
        match next {
            Some(rest) => text = rest,
            None => return trimmed,
        }
    }
}

/// Remove leading attributes and modifier keywords, then normalize whitespace
pub fn strip_modifiers(line: &str) -> String {
    let without_attributes = LEADING_ATTRIBUTE_REGEX.replace(line, "");
    normalize_whitespace(drop_leading_words(&without_attributes, MEMBER_MODIFIERS))
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accessor list for an interface property, read from the member's source
fn property_accessors(source: &str) -> &'static str {
    let after_signature = source.find('{').map_or(source, |idx| &source[idx..]);
    let writable = WRITE_ACCESSOR_REGEX
        .captures_iter(after_signature)
        .filter(|caps| caps.get(1).is_none())
        .find_map(|caps| caps.get(2).map(|m| m.as_str()));
    match writable {
        Some("set") => "{ get; set; }",
        Some(_) => "{ get; init; }",
        None => "{ get; }",
    }
}

/// Render a member as an interface declaration with its terminator
///
/// `source` is the member's full text when known (used to read property
/// accessors); the member's start line is used otherwise.
pub fn render_interface_member(member: &SignatureLineResult, source: Option<&str>) -> Option<String> {
    let signature = member.signature()?;
    let signature = clean_string(drop_leading_words(signature, ILLEGAL_INTERFACE_MODIFIERS));
    let rendered = match member.signature_type() {
        SignatureType::Method => format!("{};", signature),
        SignatureType::LambdaProperty => format!("{} {{ get; }}", signature),
        SignatureType::FullProperty => {
            let source = source.unwrap_or(member.original_selected_line());
            format!("{} {}", signature, property_accessors(source))
        }
        SignatureType::Unknown => return None,
    };
    Some(rendered)
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn indent_unit(container_indent: &str, indent_width: usize) -> String {
    if container_indent.contains('\t') {
        "\t".to_string()
    } else {
        " ".repeat(indent_width)
    }
}

/// Re-indent a block so its least indented line sits at `indent`
fn reindent(block: &str, indent: &str) -> Vec<String> {
    let lines: Vec<&str> = block.lines().collect();
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l).chars().count())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                // Strip by chars, indentation may hold multi-byte whitespace
                let strip = line
                    .char_indices()
                    .nth(common)
                    .map_or(line.len(), |(i, _)| i);
                format!("{}{}", indent, &line[strip..])
            }
        })
        .collect()
}

/// Drop blank lines a splice left at `index` right inside a brace pair
///
/// Anywhere else a run of blank lines at the splice point collapses to one.
fn tidy_splice_point(lines: &mut Vec<String>, index: usize) {
    let index = index.min(lines.len());
    let mut start = index;
    while start > 0 && lines[start - 1].trim().is_empty() {
        start -= 1;
    }
    let mut end = index;
    while end < lines.len() && lines[end].trim().is_empty() {
        end += 1;
    }
    if start == end {
        return;
    }

    let after_open = start == 0 || lines[start - 1].trim_end().ends_with('{');
    let before_close = end == lines.len() || lines[end].trim_start().starts_with('}');
    let keep = if after_open || before_close { 0 } else { 1 };
    lines.drain(start + keep..end);
}

fn join_like(lines: &[String], line_ending: LineEnding, original: &str) -> String {
    let mut text = lines.join(line_ending.as_str());
    if original.ends_with('\n') {
        text.push_str(line_ending.as_str());
    }
    text
}

/// Splice `member` lines into the container named `target_name`
///
/// Returns `None` when no container header or opening brace is found.
fn insert_into_container(
    kind: TargetKind,
    target_name: &str,
    member: &str,
    line_ending: LineEnding,
    target_text: &str,
    indent_width: usize,
) -> Option<String> {
    let header_regex = Regex::new(&kind.container_pattern(target_name)).ok()?;
    let document = SourceDocument::with_line_ending(target_text, line_ending);
    let mut lines = document.lines().to_vec();

    let header = lines.iter().position(|l| header_regex.is_match(l))?;
    let brace = (header..lines.len()).find(|&i| lines[i].contains('{'))?;
    if lines[header..brace].iter().any(|l| l.contains(';')) {
        return None;
    }

    let brace_line = lines[brace].clone();
    let container_indent = leading_whitespace(&brace_line).to_string();
    let member_indent = format!(
        "{}{}",
        container_indent,
        indent_unit(&container_indent, indent_width)
    );
    let mut member_lines = reindent(member, &member_indent);
    let inserted = member_lines.len();

    let open = brace_line.find('{')?;
    let before_open = brace_line[..open].trim_end();
    let after_open = brace_line[open + 1..].trim_start();

    if let Some(close_rest) = after_open.strip_prefix('}') {
        // `{ }`: split so the member lands between the braces
        let mut replacement = Vec::new();
        if !before_open.trim().is_empty() {
            replacement.push(before_open.to_string());
        }
        replacement.push(format!("{}{{", container_indent));
        replacement.append(&mut member_lines);
        replacement.push(format!("{}}}{}", container_indent, close_rest));
        lines.splice(brace..=brace, replacement);
    } else {
        lines.splice(brace + 1..brace + 1, member_lines);
        tidy_splice_point(&mut lines, brace + 1 + inserted);
    }

    debug!(target_name, brace_line = brace, "Inserted member into container");
    Some(join_like(&lines, line_ending, target_text))
}

/// Insert a rendered interface member right after the interface's opening brace
///
/// Returns the input unchanged when `public interface <target_name>` is not in the text.
pub fn add_member_to_interface(
    target_name: &str,
    member_text: &str,
    line_ending: LineEnding,
    target_text: &str,
    indent_width: usize,
) -> String {
    insert_into_container(
        TargetKind::Interface,
        target_name,
        member_text,
        line_ending,
        target_text,
        indent_width,
    )
    .unwrap_or_else(|| target_text.to_string())
}

/// Insert a member's full body right after the class's opening brace
///
/// The body is re-indented to one unit inside the class while keeping its
/// internal relative indentation.
pub fn add_member_to_class_body(
    target_name: &str,
    body: &str,
    line_ending: LineEnding,
    target_text: &str,
    indent_width: usize,
) -> String {
    insert_into_container(
        TargetKind::Class,
        target_name,
        body,
        line_ending,
        target_text,
        indent_width,
    )
    .unwrap_or_else(|| target_text.to_string())
}

/// Render and insert a member into whichever container the target names
///
/// Interface targets receive the terminated signature, rendered with
/// `accessor_source` for full properties. Class targets receive `member`'s
/// signature, which the pipeline repackages as the full extracted body.
/// `None` means nothing could be inserted.
pub fn add_member_to_document(
    target_name: &str,
    member: &SignatureLineResult,
    accessor_source: Option<&str>,
    line_ending: LineEnding,
    target_text: &str,
    indent_width: usize,
) -> Option<String> {
    let kind = TargetKind::for_target_name(target_name);
    let member_text = match kind {
        TargetKind::Interface => render_interface_member(member, accessor_source)?,
        TargetKind::Class => member.signature()?.to_string(),
    };
    insert_into_container(
        kind,
        target_name,
        &member_text,
        line_ending,
        target_text,
        indent_width,
    )
}

/// Collapse blank-line noise in a target after its directives were merged
///
/// Whitespace-only lines become empty, leading blank lines go, runs of blank
/// lines collapse to one and exactly one blank line precedes the namespace
/// declaration. Blank lines inside braces are left to the splice that made
/// them.
pub fn clean_excessive_blank_lines(text: &str, line_ending: LineEnding) -> String {
    let document = SourceDocument::with_line_ending(text, line_ending);
    let mut out: Vec<String> = Vec::with_capacity(document.line_count());

    for line in document.lines() {
        if line.trim().is_empty() {
            if out.last().is_some_and(|prev| !prev.is_empty()) {
                out.push(String::new());
            }
            continue;
        }

        let namespace = NAMESPACE_LINE_REGEX.is_match(line);
        if namespace {
            while out.last().is_some_and(|l| l.is_empty()) {
                out.pop();
            }
        }
        if namespace && !out.is_empty() {
            out.push(String::new());
        }
        out.push(line.clone());
    }

    join_like(&out, line_ending, text)
}

/// True if the member already exists in the target
///
/// Candidates are the member's start line with modifiers stripped and, when
/// given, the rendered interface member. Matching is substring containment
/// over whitespace-normalized target lines.
pub fn already_present(target_text: &str, member: &SignatureLineResult, rendered: Option<&str>) -> bool {
    let mut candidates = vec![strip_modifiers(member.original_selected_line())];
    if let Some(rendered) = rendered {
        candidates.push(normalize_whitespace(rendered));
    }
    candidates.retain(|c| !c.is_empty());
    if candidates.is_empty() {
        return false;
    }

    target_text
        .lines()
        .map(normalize_whitespace)
        .any(|line| candidates.iter().any(|c| line.contains(c.as_str())))
}

/// Remove a pulled member's body from its source text
///
/// The body's lines are removed at `start_line`, where the member was
/// classified. Only the blank lines around the removal point are tidied, the
/// rest of the source keeps its text. Returns `None` when the lines at
/// `start_line` no longer match the body.
pub fn remove_member_from_source(source: &str, start_line: usize, body: &str) -> Option<String> {
    let document = SourceDocument::new(source);
    let body_lines: Vec<&str> = body.lines().collect();
    if body_lines.is_empty() {
        return None;
    }

    let end = start_line.checked_add(body_lines.len())?;
    let current = document.lines().get(start_line..end)?;
    if !current.iter().map(String::as_str).eq(body_lines.iter().copied()) {
        debug!(start_line, "Member body does not match the source at its start line");
        return None;
    }

    let mut lines = document.lines().to_vec();
    lines.drain(start_line..end);
    tidy_splice_point(&mut lines, start_line);
    Some(join_like(&lines, document.line_ending(), source))
}
