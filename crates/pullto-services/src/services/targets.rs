//! Pull target discovery
//!
//! Targets are the base types a class declares directly, followed by the
//! interfaces its ancestors implement. Ancestors are read through the host so
//! the lookup works in any workspace the host can search.

use pullto_config::AppConfig;
use pullto_foundation::{EditorState, FileHandle, PullError, PullResult, WorkspaceHost};
use pullto_lang_csharp::{
    get_class_name, get_inherited_names, get_namespace, get_signature_to_pull, is_interface_name,
    Accessor, SignatureLineResult,
};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Candidate targets for the member under the cursor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetListing {
    pub namespace: String,
    pub class_name: String,
    pub targets: Vec<String>,
    pub member: Option<SignatureLineResult>,
}

/// The one file declaring `type_name`
///
/// Zero matches is [`PullError::TargetNotFound`], more than one is
/// [`PullError::AmbiguousTarget`].
pub async fn find_single_file<H>(host: &H, config: &AppConfig, type_name: &str) -> PullResult<FileHandle>
where
    H: WorkspaceHost + ?Sized,
{
    let file_name = config.target_file_name(type_name);
    let mut files = host.find_files_by_name(&file_name).await;
    match files.len() {
        0 => Err(PullError::target_not_found(type_name)),
        1 => Ok(files.remove(0)),
        n => Err(PullError::ambiguous_target(type_name, n)),
    }
}

/// Interfaces implemented through the given base types, excluding `names` themselves
///
/// Each name is looked up and its own base list followed, breadth first. A
/// visited set stops inheritance cycles. Names whose file is missing,
/// ambiguous or unreadable are skipped; only interfaces backed by exactly one
/// file are returned.
pub async fn resolve_transitive_interfaces<H>(
    host: &H,
    names: &[String],
    config: &AppConfig,
) -> Vec<String>
where
    H: WorkspaceHost + ?Sized,
{
    let mut visited: HashSet<String> = names.iter().cloned().collect();
    let mut queue: VecDeque<String> = names.iter().cloned().collect();
    let mut resolved = Vec::new();

    while let Some(name) = queue.pop_front() {
        let file = match find_single_file(host, config, &name).await {
            Ok(file) => file,
            Err(e) => {
                debug!(name = %name, error = %e, "Skipping base type");
                continue;
            }
        };
        let text = match host.read_text(&file).await {
            Ok(text) => text,
            Err(e) => {
                debug!(name = %name, error = %e, "Unable to read base type");
                continue;
            }
        };

        if !names.contains(&name) && is_interface_name(&name) {
            resolved.push(name.clone());
        }

        for inherited in get_inherited_names(&text, true) {
            if visited.insert(inherited.clone()) {
                queue.push_back(inherited);
            }
        }
    }

    debug!(direct = names.len(), transitive = resolved.len(), "Resolved base types");
    resolved
}

/// Enumerate pull targets for the editor's class and cursor
///
/// Fails with [`PullError::StructureNotFound`] when the file has no namespace
/// or class. When the member under the cursor is `protected`, interfaces are
/// left out because they cannot declare it.
pub async fn list_targets<H>(
    editor: &EditorState,
    host: &H,
    config: &AppConfig,
) -> PullResult<TargetListing>
where
    H: WorkspaceHost + ?Sized,
{
    let text = editor.document.text();
    let namespace = get_namespace(&text)?;
    let class_name = get_class_name(&text)?;

    let direct = get_inherited_names(&text, true);
    let transitive = resolve_transitive_interfaces(host, &direct, config).await;

    let mut seen = HashSet::new();
    let mut targets: Vec<String> = direct
        .into_iter()
        .chain(transitive)
        .filter(|name| seen.insert(name.clone()))
        .collect();

    let member = get_signature_to_pull(editor);
    if member.as_ref().map(SignatureLineResult::accessor) == Some(Accessor::Protected) {
        targets.retain(|name| !is_interface_name(name));
    }

    Ok(TargetListing {
        namespace,
        class_name,
        targets,
        member,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullto_foundation::SourceDocument;
    use pullto_test_support::fixtures::{self, MY_CLASS};
    use pullto_test_support::MockWorkspaceHost;
    use std::collections::HashMap;

    /// Host serving a fixed set of files by type name
    fn host_with(files: &[(&str, &str)]) -> MockWorkspaceHost {
        let contents: HashMap<String, String> = files
            .iter()
            .map(|(name, text)| (format!("{}.cs", name), text.to_string()))
            .collect();
        let names: Vec<String> = contents.keys().cloned().collect();

        let mut host = MockWorkspaceHost::new();
        host.expect_find_files_by_name().returning(move |file_name| {
            names
                .iter()
                .filter(|n| n.as_str() == file_name)
                .map(|n| FileHandle::new(n.as_str()))
                .collect()
        });
        host.expect_read_text().returning(move |file| {
            let key = file.path().display().to_string();
            contents
                .get(&key)
                .cloned()
                .ok_or_else(|| PullError::target_not_found(key))
        });
        host
    }

    fn editor(text: &str, line: usize) -> EditorState {
        EditorState::new(FileHandle::new("MyClass.cs"), SourceDocument::new(text), line)
    }

    #[tokio::test]
    async fn test_find_single_file_reports_ambiguity() {
        let mut host = MockWorkspaceHost::new();
        host.expect_find_files_by_name()
            .returning(|_| vec![FileHandle::new("a/IMyClass.cs"), FileHandle::new("b/IMyClass.cs")]);
        let err = find_single_file(&host, &AppConfig::default(), "IMyClass")
            .await
            .unwrap_err();
        assert!(matches!(err, PullError::AmbiguousTarget { matches: 2, .. }));
    }

    #[tokio::test]
    async fn test_transitive_resolution_follows_base_classes() {
        let host = host_with(&[
            ("BaseClass", "public class BaseClass : Root, IBaseClass\n{\n}\n"),
            ("Root", "public abstract class Root : IRoot\n{\n}\n"),
            ("IRoot", "public interface IRoot : IBaseClass\n{\n}\n"),
            ("IBaseClass", "public interface IBaseClass\n{\n}\n"),
        ]);
        let resolved = resolve_transitive_interfaces(
            &host,
            &["BaseClass".to_string()],
            &AppConfig::default(),
        )
        .await;
        assert_eq!(resolved, vec!["IBaseClass", "IRoot"]);
    }

    #[tokio::test]
    async fn test_transitive_resolution_terminates_on_cycles() {
        let host = host_with(&[
            ("IA", "public interface IA : IB\n{\n}\n"),
            ("IB", "public interface IB : IA\n{\n}\n"),
        ]);
        let resolved =
            resolve_transitive_interfaces(&host, &["IA".to_string()], &AppConfig::default()).await;
        assert_eq!(resolved, vec!["IB"]);
    }

    #[tokio::test]
    async fn test_list_targets_for_public_member() {
        let host = host_with(&[
            ("BaseClass", fixtures::BASE_CLASS),
            ("IMyClass", fixtures::I_MY_CLASS),
            ("IBaseClass", fixtures::I_BASE_CLASS),
        ]);
        let listing = list_targets(
            &editor(MY_CLASS, fixtures::MY_PROPERTY_LINE),
            &host,
            &AppConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(listing.namespace, "Sample");
        assert_eq!(listing.class_name, "MyClass");
        assert_eq!(
            listing.targets,
            vec!["BaseClass", "IMyClass", "IMyTypedClass", "IBaseClass"]
        );
    }

    #[tokio::test]
    async fn test_list_targets_drops_interfaces_for_protected_member() {
        let host = host_with(&[("BaseClass", fixtures::BASE_CLASS)]);
        let listing = list_targets(
            &editor(MY_CLASS, fixtures::RESET_LINE),
            &host,
            &AppConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(listing.targets, vec!["BaseClass"]);
    }

    #[tokio::test]
    async fn test_list_targets_requires_namespace() {
        let host = MockWorkspaceHost::new();
        let err = list_targets(
            &editor("public class A : IA\n{\n}\n", 0),
            &host,
            &AppConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PullError::StructureNotFound { .. }));
    }
}
