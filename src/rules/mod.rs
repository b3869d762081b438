//! Illustrative rules exercising the engine end-to-end (spec.md §8): a
//! purely syntactic non-fixable rule, a fixable syntactic rule, and a
//! fixable rule that consults the type checker. These are demonstration
//! content, not a rule set meant to ship to end users.

mod no_ternary;
mod no_unnecessary_type_assertion;
mod prefer_as_const;

pub use no_ternary::NoTernaryRule;
pub use no_unnecessary_type_assertion::NoUnnecessaryTypeAssertionRule;
pub use prefer_as_const::PreferAsConstRule;

use std::sync::Arc;

use crate::registry::RuleRegistry;

/// Registers every illustrative rule under its canonical name. Host
/// applications are not required to use this — it exists so the crate's
/// own tests and examples have a populated registry to lint against.
pub fn register_all(registry: &mut RuleRegistry) {
    registry.register("no-ternary", Arc::new(NoTernaryRule::new()));
    registry.register("prefer-as-const", Arc::new(PreferAsConstRule::new()));
    registry.register(
        "no-unnecessary-type-assertion",
        Arc::new(NoUnnecessaryTypeAssertionRule::new()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_populates_every_illustrative_rule() {
        let mut registry = RuleRegistry::new();
        register_all(&mut registry);
        assert!(registry.lookup("no-ternary").is_some());
        assert!(registry.lookup("prefer-as-const").is_some());
        assert!(registry.lookup("no-unnecessary-type-assertion").is_some());
    }
}
