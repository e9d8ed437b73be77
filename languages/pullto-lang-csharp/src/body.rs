//! Member body extraction
//!
//! Two strategies, chosen by how the member's body begins:
//! - brace-balanced for `{ ... }` bodies
//! - semicolon-terminated for `=> ...;` bodies
//!
//! Both return the source lines verbatim, joined with the document's line
//! ending, so the body can be inserted into a base class and later removed
//! from the source by exact match.

use crate::line_classifier::{is_search_boundary, BoundaryOptions};
use crate::signature::{BodyStart, SignatureLineResult};
use pullto_foundation::{PullError, PullResult, SourceDocument};
use tracing::debug;

fn member_label(member: &SignatureLineResult) -> String {
    member
        .signature()
        .map(str::to_string)
        .unwrap_or_else(|| format!("member on line {}", member.line_match_starts_on() + 1))
}

/// Extract a brace-delimited member body by counting `{` and `}`
///
/// The count only has to return to zero once the first `{` has been seen. A
/// boundary line reached before any brace means the member has no block body.
pub fn get_member_body_by_brackets(
    document: &SourceDocument,
    member: &SignatureLineResult,
) -> PullResult<String> {
    let start = member.line_match_starts_on();
    let boundaries = BoundaryOptions::default();
    let mut depth: i64 = 0;
    let mut tracking = false;
    let mut collected: Vec<&str> = Vec::new();

    for index in start..document.line_count() {
        let Some(line) = document.line_at(index) else {
            break;
        };
        if index > start && !tracking && depth == 0 && is_search_boundary(line, boundaries) {
            debug!(line = index, "Boundary reached before member body");
            break;
        }

        collected.push(line);
        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;
        if opens > 0 {
            tracking = true;
        }
        depth += opens - closes;

        if tracking && depth == 0 {
            return Ok(collected.join(document.line_ending().as_str()));
        }
        if depth < 0 {
            break;
        }
    }

    debug!(start, depth, tracking, "Unbalanced member body");
    Err(PullError::unbalanced_body(member_label(member)))
}

/// Extract an expression-bodied member ending at its first `;` line
///
/// Closing braces do not end the scan here, so multi-line object initializers
/// (`=> new Address { ... };`) are taken whole.
pub fn get_member_body_by_semicolon(
    document: &SourceDocument,
    member: &SignatureLineResult,
) -> PullResult<String> {
    let start = member.line_match_starts_on();
    let boundaries = BoundaryOptions {
        include_closing_brace: false,
        include_protected: true,
    };
    let mut semicolon_lines = 0usize;
    let mut collected: Vec<&str> = Vec::new();

    for index in start..document.line_count() {
        let Some(line) = document.line_at(index) else {
            break;
        };
        if line.contains(';') {
            collected.push(line);
            semicolon_lines += 1;
            break;
        }
        if index > start && is_search_boundary(line, boundaries) {
            debug!(line = index, "Boundary reached before terminating semicolon");
            break;
        }
        collected.push(line);
    }

    if semicolon_lines != 1 {
        return Err(PullError::unbalanced_body(member_label(member)));
    }
    Ok(collected.join(document.line_ending().as_str()))
}

/// Extract the body with the strategy matching how the member's body begins
pub fn extract_member_body(
    document: &SourceDocument,
    member: &SignatureLineResult,
) -> PullResult<String> {
    let start_line = document
        .line_at(member.line_match_starts_on())
        .unwrap_or_default();
    let arrow = start_line.contains("=>") || member.body_start() == Some(BodyStart::Arrow);

    if arrow {
        get_member_body_by_semicolon(document, member)
    } else {
        get_member_body_by_brackets(document, member)
    }
}
