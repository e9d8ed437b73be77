//! The pull pipeline
//!
//! One invocation reads the source snapshot and the target once, runs the
//! pure render steps, and writes the target once. Source cleanup (base class
//! targets only) is a second, independent write: if it fails the target
//! stays updated and only the cleanup failure is reported.

use crate::services::targets::{find_single_file, list_targets, TargetListing};
use pullto_config::AppConfig;
use pullto_foundation::{
    EditorState, NotifyLevel, PersistSide, PullError, PullResult, WorkspaceHost,
};
use pullto_lang_csharp::{
    add_member_to_document, add_usings_to_target, already_present, clean_excessive_blank_lines,
    extract_member_body, get_class_name, get_namespace, get_signature_to_pull,
    get_using_statements, member_name, remove_member_from_source, render_interface_member,
    Accessor, SignatureLineResult, SignatureType, TargetKind,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a pull that did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PullOutcome {
    /// The member was written into the target
    Pulled {
        member: String,
        target: String,
        target_file: PathBuf,
        /// The member was also removed from the source file
        source_updated: bool,
    },
    /// The target already declares the member; nothing was written
    AlreadyPresent { target: String },
}

impl PullOutcome {
    /// Message shown to the user for this outcome
    pub fn message(&self) -> String {
        match self {
            PullOutcome::Pulled { member, target, .. } => format!("{} pulled to {}", member, target),
            PullOutcome::AlreadyPresent { target } => {
                format!("Member already in {}. Skipping pull", target)
            }
        }
    }
}

/// Runs pulls against a workspace host
pub struct PullService<H: WorkspaceHost> {
    host: Arc<H>,
    config: AppConfig,
}

impl<H: WorkspaceHost> PullService<H> {
    pub fn new(host: Arc<H>, config: AppConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Candidate targets for the member under the cursor
    pub async fn targets(&self, editor: &EditorState) -> PullResult<TargetListing> {
        list_targets(editor, self.host.as_ref(), &self.config).await
    }

    /// Pull the member under the cursor into `target`
    ///
    /// The outcome or error is also reported through the host's notifications.
    pub async fn pull(&self, editor: &EditorState, target: &str) -> PullResult<PullOutcome> {
        let result = self.run_pull(editor, target).await;
        match &result {
            Ok(outcome @ PullOutcome::Pulled { .. }) => {
                info!(target_name = target, "Pull complete");
                self.host.notify(NotifyLevel::Info, &outcome.message());
            }
            Ok(outcome @ PullOutcome::AlreadyPresent { .. }) => {
                warn!(target_name = target, "Member already present, skipping");
                self.host.notify(NotifyLevel::Warning, &outcome.message());
            }
            Err(e) => {
                warn!(target_name = target, code = e.code(), error = %e, "Pull failed");
                self.host.notify(NotifyLevel::Error, &e.user_message());
            }
        }
        result
    }

    async fn run_pull(&self, editor: &EditorState, target: &str) -> PullResult<PullOutcome> {
        let source_text = editor.document.text();
        get_namespace(&source_text)?;
        get_class_name(&source_text)?;

        let member = get_signature_to_pull(editor)
            .filter(|m| !m.is_unknown())
            .ok_or_else(|| PullError::unclassifiable_member("no public or protected member at cursor"))?;
        let kind = TargetKind::for_target_name(target);
        self.check_policy(&member, kind)?;

        let file = find_single_file(self.host.as_ref(), &self.config, target).await?;
        let target_text = self.host.read_text(&file).await?;
        if target_text.trim().is_empty() {
            return Err(PullError::unreadable_target(target));
        }

        // Target edits keep the target's own line ending
        let line_ending = self.config.editor.line_ending.resolve(&target_text);
        let indent_width = self.config.editor.indent_width;

        // Interface properties read their accessors from the full body
        let interface_source = match (kind, member.signature_type()) {
            (TargetKind::Interface, SignatureType::FullProperty) => {
                extract_member_body(&editor.document, &member).ok()
            }
            _ => None,
        };
        let rendered = match kind {
            TargetKind::Interface => Some(
                render_interface_member(&member, interface_source.as_deref())
                    .ok_or_else(|| PullError::unclassifiable_member("member has no signature"))?,
            ),
            TargetKind::Class => None,
        };

        if already_present(&target_text, &member, rendered.as_deref()) {
            return Ok(PullOutcome::AlreadyPresent {
                target: target.to_string(),
            });
        }

        // Base classes receive the whole member, carried as its signature
        let (pulled, accessor_source) = match kind {
            TargetKind::Class => (
                member.with_signature(extract_member_body(&editor.document, &member)?),
                None,
            ),
            TargetKind::Interface => (member.clone(), interface_source),
        };

        let merged = add_member_to_document(
            target,
            &pulled,
            accessor_source.as_deref(),
            line_ending,
            &target_text,
            indent_width,
        )
        .ok_or_else(|| PullError::unreadable_target(target))?;
        let merged = add_usings_to_target(line_ending, &merged, &get_using_statements(&source_text));
        let merged = clean_excessive_blank_lines(&merged, line_ending);

        if !self.host.write_text(&file, &merged).await {
            return Err(PullError::persist(PersistSide::Target, target));
        }
        debug!(path = %file.path().display(), "Target updated");

        let source_updated = match (kind, pulled.signature()) {
            (TargetKind::Class, Some(body)) if self.config.pull.remove_from_source => {
                self.remove_from_source(editor, &source_text, pulled.line_match_starts_on(), body)
                    .await?;
                true
            }
            _ => false,
        };

        let name = member
            .signature()
            .and_then(member_name)
            .unwrap_or_else(|| member.signature().unwrap_or_default().to_string());

        Ok(PullOutcome::Pulled {
            member: name,
            target: target.to_string(),
            target_file: file.path().to_path_buf(),
            source_updated,
        })
    }

    fn check_policy(&self, member: &SignatureLineResult, kind: TargetKind) -> PullResult<()> {
        match kind {
            TargetKind::Interface if member.accessor() == Accessor::Protected => {
                Err(PullError::unsupported_pull(
                    "Protected members can not be pulled to an interface",
                ))
            }
            TargetKind::Class
                if member.signature_type() == SignatureType::Method
                    && !self.config.pull.allow_methods_to_base_class =>
            {
                Err(PullError::unsupported_pull(
                    "Methods can not be pulled to a base class",
                ))
            }
            _ => Ok(()),
        }
    }

    async fn remove_from_source(
        &self,
        editor: &EditorState,
        source_text: &str,
        start_line: usize,
        body: &str,
    ) -> PullResult<()> {
        let cleanup_failed = || {
            let name = editor.file.stem().unwrap_or("source file").to_string();
            PullError::persist(PersistSide::SourceCleanup, name)
        };
        let updated = remove_member_from_source(source_text, start_line, body)
            .ok_or_else(cleanup_failed)?;
        if !self.host.write_text(&editor.file, &updated).await {
            return Err(cleanup_failed());
        }
        debug!(path = %editor.file.path().display(), "Member removed from source");
        Ok(())
    }
}
