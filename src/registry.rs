//! The rule registry (spec.md §4.1): name -> rule, and plugin name ->
//! rule set. Process-global once built, read-only afterwards (spec.md §5
//! "Shared resources").
//!
//! Grounded on the teacher's `plugin.rs` (`Plugin { name, rules }`) and
//! `config::Config::get_rules_by_plugin_prefixed_name`, which builds a
//! single `name -> rule` map lazily from plugins plus standalone rules.
//! Here registration is explicit and builder-style rather than
//! `OnceLock`-memoized, since the registry is meant to be constructed
//! once at startup by the embedding application (spec.md §9 "Global rule
//! registry": "Model this as a builder that produces an immutable
//! registry value at startup").

use std::collections::HashMap;
use std::sync::Arc;

/// A named bundle of rules enabled en masse with default severity `error`
/// (spec.md §4.2 step 3, GLOSSARY "Plugin").
#[derive(Clone)]
pub struct Plugin {
    pub name: String,
    pub rules: Vec<Arc<dyn crate::rule::Rule>>,
}

impl Plugin {
    pub fn new(name: impl Into<String>, rules: Vec<Arc<dyn crate::rule::Rule>>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

/// Process-global mapping from rule name to rule value, plus plugin name
/// to rule set (spec.md §4.1).
#[derive(Default, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn crate::rule::Rule>>,
    plugins: HashMap<String, Vec<Arc<dyn crate::rule::Rule>>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `register(name, rule)`. Replacing an already-present name is not
    /// an error — used for test overrides (spec.md §4.1).
    pub fn register(&mut self, name: impl Into<String>, rule: Arc<dyn crate::rule::Rule>) {
        self.rules.insert(name.into(), rule);
    }

    pub fn register_plugin(&mut self, plugin: Plugin) {
        self.plugins.insert(plugin.name, plugin.rules);
    }

    /// `lookup(name) -> rule?`.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn crate::rule::Rule>> {
        self.rules.get(name).cloned()
    }

    /// `rulesForPlugin(pluginName) -> [rule]`. Unknown plugins are
    /// silently ignored to match liberal ESLint behavior (spec.md §4.1).
    pub fn rules_for_plugin(&self, plugin_name: &str) -> Vec<Arc<dyn crate::rule::Rule>> {
        self.plugins.get(plugin_name).cloned().unwrap_or_default()
    }

    /// `all() -> [rule]`. No ordering guarantee (spec.md §4.1).
    pub fn all(&self) -> Vec<Arc<dyn crate::rule::Rule>> {
        self.rules.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::RuleContext;
    use crate::rule::{Listeners, RuleMeta};

    struct NoopRule(RuleMeta);

    impl crate::rule::Rule for NoopRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn run<'a>(&self, _ctx: &RuleContext<'a>, _options: &crate::rule::RuleOptions) -> Listeners<'a> {
            Listeners::new()
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = RuleRegistry::new();
        registry.register(
            "no-op",
            Arc::new(NoopRule(RuleMeta {
                name: "no-op".into(),
                fixable: false,
            })),
        );
        assert!(registry.lookup("no-op").is_some());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn re_registering_a_name_replaces_it() {
        let mut registry = RuleRegistry::new();
        registry.register(
            "r",
            Arc::new(NoopRule(RuleMeta {
                name: "r".into(),
                fixable: false,
            })),
        );
        registry.register(
            "r",
            Arc::new(NoopRule(RuleMeta {
                name: "r".into(),
                fixable: true,
            })),
        );
        assert!(registry.lookup("r").unwrap().meta().fixable);
    }

    #[test]
    fn unknown_plugin_yields_empty_rule_set() {
        let registry = RuleRegistry::new();
        assert!(registry.rules_for_plugin("nonexistent").is_empty());
    }
}
