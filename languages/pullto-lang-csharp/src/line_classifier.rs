//! Line predicates used to bound member searches
//!
//! These are pure text checks on a single line. They know nothing about the
//! surrounding document; the locator and body extractor combine them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ACCESSOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(public|protected)\s").expect("Invalid regex for member accessors")
});

static PRIVATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprivate\b").expect("Invalid regex for private modifier"));

static EXCLUDED_ACCESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(private|internal|namespace)\b").expect("Invalid regex for excluded access")
});

static PROTECTED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprotected\b").expect("Invalid regex for protected modifier"));

// `record` and friends must be followed by a type name to count, so a
// parameter called `record` is not mistaken for a declaration.
static TYPE_DECLARATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(class|interface|struct|enum|record)\s+[A-Za-z_]\w*")
        .expect("Invalid regex for type declarations")
});

/// Access modifier found on a member start line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    Public,
    Protected,
}

impl Accessor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessor::Public => "public",
            Accessor::Protected => "protected",
        }
    }
}

impl std::fmt::Display for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which accessors qualify a line as a member start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessorFilter {
    PublicOnly,
    #[default]
    PublicOrProtected,
}

impl AccessorFilter {
    pub fn accepts(&self, accessor: Accessor) -> bool {
        match self {
            AccessorFilter::PublicOnly => accessor == Accessor::Public,
            AccessorFilter::PublicOrProtected => true,
        }
    }
}

/// Knobs for [`is_search_boundary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryOptions {
    /// A line containing `}` ends the search
    pub include_closing_brace: bool,
    /// A line containing `protected` ends the search
    pub include_protected: bool,
}

impl Default for BoundaryOptions {
    fn default() -> Self {
        Self {
            include_closing_brace: true,
            include_protected: true,
        }
    }
}

impl BoundaryOptions {
    /// Boundaries for a locator that accepts `filter` as member starts
    pub fn for_filter(filter: AccessorFilter) -> Self {
        Self {
            include_closing_brace: true,
            include_protected: !filter.accepts(Accessor::Protected),
        }
    }
}

/// True if the line declares a type rather than a member
pub fn is_type_declaration_line(line: &str) -> bool {
    TYPE_DECLARATION_REGEX.is_match(line)
}

/// Accessor of a member start line, or `None` if the line does not start a member
///
/// `private protected` members and type declarations never qualify.
pub fn member_accessor(line: &str) -> Option<Accessor> {
    let caps = ACCESSOR_REGEX.captures(line)?;
    if PRIVATE_REGEX.is_match(line) || is_type_declaration_line(line) {
        return None;
    }
    match &caps[1] {
        "protected" => Some(Accessor::Protected),
        _ => Some(Accessor::Public),
    }
}

/// True if the line starts a `public` or `protected` member declaration
pub fn is_member_start_line(line: &str) -> bool {
    member_accessor(line).is_some()
}

/// True if the line starts a member whose accessor passes `filter`
pub fn is_member_start_line_for(line: &str, filter: AccessorFilter) -> bool {
    member_accessor(line).is_some_and(|a| filter.accepts(a))
}

/// True if the line ends a backward or forward member scan
pub fn is_search_boundary(line: &str, options: BoundaryOptions) -> bool {
    if line.trim().is_empty() || line.contains(['\n', '\r']) {
        return true;
    }
    if options.include_closing_brace && line.contains('}') {
        return true;
    }
    if EXCLUDED_ACCESS_REGEX.is_match(line) {
        return true;
    }
    options.include_protected && PROTECTED_REGEX.is_match(line)
}
