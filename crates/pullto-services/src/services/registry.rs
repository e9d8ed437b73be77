//! Process-scoped registry of per-target pull commands

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Prefix of every per-target command id
pub const COMMAND_PREFIX: &str = "pullto.pullto";

/// Maps `pullto.pullto.<Target>` command ids to their target names
///
/// Targets are discovered per invocation, so the same target is offered many
/// times over a session. Registering it again is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Arc<DashMap<String, String>>,
}

impl CommandRegistry {
    /// Creates a new, empty `CommandRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Command id for a target (`IMyClass` -> `pullto.pullto.IMyClass`)
    pub fn command_id(target: &str) -> String {
        format!("{}.{}", COMMAND_PREFIX, target)
    }

    /// Register a target, returning `false` if it was already registered
    pub fn register(&self, target: &str) -> bool {
        match self.commands.entry(Self::command_id(target)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(target.to_string());
                true
            }
        }
    }

    /// Register every target, returning how many were new
    pub fn register_all<'a>(&self, targets: impl IntoIterator<Item = &'a str>) -> usize {
        targets.into_iter().filter(|t| self.register(t)).count()
    }

    pub fn is_registered(&self, command_id: &str) -> bool {
        self.commands.contains_key(command_id)
    }

    /// Target behind a command id
    pub fn resolve(&self, command_id: &str) -> Option<String> {
        self.commands
            .get(command_id)
            .map(|entry| entry.value().clone())
    }

    /// Target registered under the given target name
    pub fn resolve_target(&self, target: &str) -> Option<String> {
        self.resolve(&Self::command_id(target))
    }

    /// All registered targets, sorted
    pub fn targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self
            .commands
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        targets.sort();
        targets
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let registry = CommandRegistry::new();
        assert!(registry.register("IMyClass"));
        assert!(!registry.register("IMyClass"));
        assert_eq!(registry.len(), 1);
        assert!(registry.is_registered("pullto.pullto.IMyClass"));
    }

    #[test]
    fn test_register_all_counts_new_targets() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.register_all(["BaseClass", "IMyClass"]), 2);
        assert_eq!(registry.register_all(["IMyClass", "IBaseClass"]), 1);
        assert_eq!(registry.targets(), vec!["BaseClass", "IBaseClass", "IMyClass"]);
    }

    #[test]
    fn test_resolve() {
        let registry = CommandRegistry::new();
        registry.register("BaseClass");
        assert_eq!(
            registry.resolve("pullto.pullto.BaseClass").as_deref(),
            Some("BaseClass")
        );
        assert_eq!(registry.resolve_target("IMissing"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = CommandRegistry::new();
        let clone = registry.clone();
        clone.register("IMyClass");
        assert!(!registry.is_empty());
    }
}
