//! Signature location and classification
//!
//! Finds the member enclosing a cursor line by scanning backward to the
//! nearest member start, then assembles the (possibly wrapped) declaration
//! forward until its body begins. There is no syntax tree here; the passes
//! are line scans plus a parenthesis-aware search for the body start.

use crate::line_classifier::{
    is_search_boundary, member_accessor, Accessor, AccessorFilter, BoundaryOptions,
};
use once_cell::sync::Lazy;
use pullto_foundation::{EditorState, SourceDocument};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static METHOD_PARENS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("Invalid regex for method parameters"));

static WHITESPACE_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("Invalid regex for whitespace runs"));

static ACCESSOR_KEYWORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(public|protected)\b").expect("Invalid regex for accessors"));

/// Syntactic shape of a located member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignatureType {
    /// Block-bodied property (`{ get; set; }` or explicit accessor bodies)
    FullProperty,
    /// Expression-bodied property (`=> value;`)
    LambdaProperty,
    Method,
    Unknown,
}

/// How a member's body begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStart {
    /// `{`: the body is brace delimited
    Brace,
    /// `=>`: the body runs to the terminating `;`
    Arrow,
}

/// Result of locating one member for one command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureLineResult {
    signature: Option<String>,
    signature_type: SignatureType,
    line_match_starts_on: usize,
    accessor: Accessor,
    original_selected_line: String,
    body_start: Option<BodyStart>,
}

impl SignatureLineResult {
    /// Create a result; an empty signature always classifies as `Unknown`
    pub fn new(
        signature: Option<String>,
        signature_type: SignatureType,
        line_match_starts_on: usize,
        accessor: Accessor,
        original_selected_line: impl Into<String>,
    ) -> Self {
        let signature = signature.filter(|s| !s.trim().is_empty());
        let signature_type = if signature.is_some() {
            signature_type
        } else {
            SignatureType::Unknown
        };
        Self {
            signature,
            signature_type,
            line_match_starts_on,
            accessor,
            original_selected_line: original_selected_line.into(),
            body_start: None,
        }
    }

    fn with_body_start(mut self, body_start: Option<BodyStart>) -> Self {
        self.body_start = body_start;
        self
    }

    /// Clone with a replaced signature, keeping every other field
    pub fn with_signature(&self, signature: impl Into<String>) -> Self {
        let mut clone = self.clone();
        clone.signature = Some(signature.into());
        clone
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn line_match_starts_on(&self) -> usize {
        self.line_match_starts_on
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }

    /// Raw text of the member start line the assembly began from
    pub fn original_selected_line(&self) -> &str {
        &self.original_selected_line
    }

    pub fn body_start(&self) -> Option<BodyStart> {
        self.body_start
    }

    pub fn is_unknown(&self) -> bool {
        self.signature_type == SignatureType::Unknown
    }

    pub fn is_property(&self) -> bool {
        matches!(
            self.signature_type,
            SignatureType::FullProperty | SignatureType::LambdaProperty
        )
    }
}

/// Whitespace-normalize assembled declaration text
///
/// Runs of two or more whitespace characters are removed, except between two
/// identifier characters where a single space is kept. This joins wrapped
/// parameter lists (`string name,string address`) without fusing words.
pub fn clean_string(text: &str) -> String {
    let cleaned = WHITESPACE_RUN_REGEX.replace_all(text, |caps: &regex::Captures<'_>| {
        let Some(m) = caps.get(0) else {
            return "";
        };
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        match (before, after) {
            (Some(b), Some(a)) if is_word_char(b) && is_word_char(a) => " ",
            _ => "",
        }
    });
    cleaned.trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True iff the signature contains a parenthesised parameter list
pub fn is_method(signature: Option<&str>) -> bool {
    signature.is_some_and(|s| METHOD_PARENS_REGEX.is_match(s))
}

/// Split declaration text at the first `{` or `=>` outside parentheses
///
/// Returns the text before the body start and which token began the body.
fn split_at_body_start(text: &str) -> Option<(&str, BodyStart)> {
    let mut depth = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '{' if depth == 0 => return Some((&text[..idx], BodyStart::Brace)),
            '=' if depth == 0 => {
                if let Some(&(_, '>')) = chars.peek() {
                    return Some((&text[..idx], BodyStart::Arrow));
                }
            }
            _ => {}
        }
    }
    None
}

/// Classify a declaration by its signature text and the token that began its body
pub fn classify_signature(signature: &str, body_start: Option<BodyStart>) -> SignatureType {
    if signature.trim().is_empty() {
        return SignatureType::Unknown;
    }
    if is_method(Some(signature)) {
        return SignatureType::Method;
    }
    match body_start {
        Some(BodyStart::Brace) => SignatureType::FullProperty,
        Some(BodyStart::Arrow) => SignatureType::LambdaProperty,
        None => SignatureType::Unknown,
    }
}

/// Assemble the full signature of the member starting on `starting_line`
///
/// Lines are concatenated until the running text contains `{`, `=>` or `;`,
/// because declarations wrap across lines (parameter lists, `where` clauses).
/// The accessor keyword itself is not part of the returned signature.
pub fn get_full_signature_of_line(
    document: &SourceDocument,
    starting_line: usize,
    accessor: Accessor,
) -> SignatureLineResult {
    let original = document.line_at(starting_line).unwrap_or_default();
    let mut assembled = String::new();
    let mut line = starting_line;

    while let Some(text) = document.line_at(line) {
        if !assembled.is_empty() {
            assembled.push(' ');
        }
        assembled.push_str(text);
        line += 1;
        if assembled.contains('{') || assembled.contains("=>") || assembled.contains(';') {
            break;
        }
    }

    let assembled = clean_string(&assembled);
    let after_accessor = ACCESSOR_KEYWORD_REGEX
        .find(&assembled)
        .map(|m| &assembled[m.end()..])
        .unwrap_or(&assembled);

    let (signature, body_start) = match split_at_body_start(after_accessor) {
        Some((sig, start)) => (Some(clean_string(sig)), Some(start)),
        None => (None, None),
    };

    let signature_type = signature
        .as_deref()
        .map(|s| classify_signature(s, body_start))
        .unwrap_or(SignatureType::Unknown);

    debug!(
        starting_line,
        ?signature_type,
        signature = signature.as_deref().unwrap_or(""),
        "Assembled member signature"
    );

    SignatureLineResult::new(signature, signature_type, starting_line, accessor, original)
        .with_body_start(body_start)
}

/// Locate the member enclosing `cursor_line`
///
/// If the cursor line starts a member it is used directly; otherwise lines are
/// scanned backward until a member start or a boundary line is hit. Returns
/// `None` when no member start is found.
pub fn locate(
    document: &SourceDocument,
    cursor_line: usize,
    filter: AccessorFilter,
) -> Option<SignatureLineResult> {
    let boundaries = BoundaryOptions::for_filter(filter);
    let mut line = cursor_line;
    let mut current = document.line_at(line)?;

    let accepted = |text: &str| member_accessor(text).filter(|a| filter.accepts(*a));

    if let Some(accessor) = accepted(current) {
        return Some(get_full_signature_of_line(document, line, accessor));
    }

    while !is_search_boundary(current, boundaries) {
        if line == 0 {
            break;
        }
        line -= 1;
        current = document.line_at(line)?;
        if let Some(accessor) = accepted(current) {
            return Some(get_full_signature_of_line(document, line, accessor));
        }
    }

    debug!(cursor_line, stopped_at = line, "No member start found");
    None
}

/// Signature of the public method enclosing the cursor
pub fn get_method_signature_text(editor: &EditorState) -> Option<SignatureLineResult> {
    locate(&editor.document, editor.cursor_line(), AccessorFilter::PublicOnly)
        .filter(|r| r.signature_type() == SignatureType::Method)
}

/// Signature of the public property enclosing the cursor
pub fn get_property_signature_text(editor: &EditorState) -> Option<SignatureLineResult> {
    locate(&editor.document, editor.cursor_line(), AccessorFilter::PublicOnly)
        .filter(SignatureLineResult::is_property)
}

/// Member to pull: public or protected, method or property
pub fn get_signature_to_pull(editor: &EditorState) -> Option<SignatureLineResult> {
    locate(
        &editor.document,
        editor.cursor_line(),
        AccessorFilter::PublicOrProtected,
    )
}

/// Trimmed text of the cursor line
pub fn get_current_line(editor: &EditorState) -> Option<String> {
    editor
        .line_text(editor.cursor_line())
        .map(|l| l.trim().to_string())
}

/// Member name from a signature (`GetNewIdAsync` for a generic method)
pub fn member_name(signature: &str) -> Option<String> {
    let head = if is_method(Some(signature)) {
        // Tuple return types start with `(`; the parameter list is the last group
        let open = signature.find('(')?;
        let open = if open == 0 {
            signature.rfind('(')?
        } else {
            open
        };
        &signature[..open]
    } else {
        signature
    };

    let head = head.trim_end();
    let head = strip_trailing_generics(head);
    head.split_whitespace()
        .last()
        .map(|name| name.trim_matches(|c: char| !is_word_char(c)).to_string())
        .filter(|name| !name.is_empty())
}

fn strip_trailing_generics(text: &str) -> &str {
    if !text.ends_with('>') {
        return text;
    }
    let mut depth = 0usize;
    for (idx, c) in text.char_indices().rev() {
        match c {
            '>' => depth += 1,
            '<' => {
                depth -= 1;
                if depth == 0 {
                    return text[..idx].trim_end();
                }
            }
            _ => {}
        }
    }
    text
}
