//! `no-ternary`: flags every conditional (ternary) expression,
//! unconditionally. The simplest possible illustrative rule — one
//! listener, no options, not fixable (spec.md §8 scenario 1).

use crate::context::RuleContext;
use crate::rule::{Listeners, Rule, RuleMeta, RuleOptions};
use crate::syntax::Kind;

pub struct NoTernaryRule {
    meta: RuleMeta,
}

impl NoTernaryRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                name: "no-ternary".into(),
                fixable: false,
            },
        }
    }
}

impl Default for NoTernaryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoTernaryRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn run<'a>(&self, _ctx: &RuleContext<'a>, _options: &RuleOptions) -> Listeners<'a> {
        Listeners::new().on_enter(Kind::ConditionalExpression, |node, ctx| {
            ctx.report_node(node, "noTernaryOperator", "ternary operators are not allowed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ReferenceFrontEnd;
    use crate::rule_tester::{RuleTestError, RuleTestInvalid, RuleTestValid, RuleTester, RuleTests};
    use std::sync::Arc;

    #[test]
    fn flags_ternaries_and_leaves_other_code_alone() {
        let front_end = ReferenceFrontEnd;
        let tester = RuleTester::new(Arc::new(NoTernaryRule::new()), &front_end);
        tester.run(&RuleTests {
            valid: vec![RuleTestValid::new("const x = 1;")],
            invalid: vec![RuleTestInvalid::new(
                "a ? 1 : 2;",
                vec![RuleTestError::new("noTernaryOperator")],
            )],
        });
    }
}
