//! C# member extraction and interface synchronization for pullto
//!
//! Locates the member under the cursor, classifies its shape, extracts its
//! signature and body, and merges it into an interface or base class, all with
//! line scans and regular expressions rather than a syntax tree.
//!
//! # Modules
//!
//! - [`line_classifier`] - Member start and search boundary predicates
//! - [`signature`] - Signature location, assembly and classification
//! - [`body`] - Brace-balanced and semicolon-terminated body extraction
//! - [`type_relationship`] - Namespace, class name and base list parsing
//! - [`import_support`] - `using` directive parsing and merging
//! - [`render`] - Target rendering, blank line cleanup and idempotence

pub mod body;
pub mod import_support;
pub mod line_classifier;
pub mod render;
pub mod signature;
pub mod type_relationship;

pub use body::{extract_member_body, get_member_body_by_brackets, get_member_body_by_semicolon};
pub use import_support::{add_usings_to_target, get_using_statements};
pub use line_classifier::{
    is_member_start_line, is_search_boundary, Accessor, AccessorFilter, BoundaryOptions,
};
pub use render::{
    add_member_to_class_body, add_member_to_document, add_member_to_interface, already_present,
    clean_excessive_blank_lines, remove_member_from_source, render_interface_member, TargetKind,
};
pub use signature::{
    get_current_line, get_method_signature_text, get_property_signature_text,
    get_signature_to_pull, locate, member_name, BodyStart, SignatureLineResult, SignatureType,
};
pub use type_relationship::{
    get_class_name, get_inherited_names, get_namespace, is_interface_name,
    parse_type_relationship, TypeRelationship,
};
