//! `prefer-as-const`: flags a literal asserted to its own literal type
//! (`3 as 3`, `"x" as "x"`) and offers a fix that drops the redundant
//! assertion, since `as const` (or simply the bare literal) says the
//! same thing (spec.md §8 scenario 3).

use crate::context::RuleContext;
use crate::diagnostic::Edit;
use crate::rule::{Listeners, Rule, RuleMeta, RuleOptions};
use crate::source::Range;
use crate::syntax::Kind;
use crate::util;

pub struct PreferAsConstRule {
    meta: RuleMeta,
}

impl PreferAsConstRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                name: "prefer-as-const".into(),
                fixable: true,
            },
        }
    }
}

impl Default for PreferAsConstRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for PreferAsConstRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn run<'a>(&self, _ctx: &RuleContext<'a>, _options: &RuleOptions) -> Listeners<'a> {
        Listeners::new().on_enter(Kind::AsExpression, |node, ctx| {
            let expression = node.field("expression");
            let type_node = node.field("type");

            let is_self_assertion = matches!(expression.kind(), Kind::NumericLiteral | Kind::StringLiteral)
                && util::text_of(ctx.source_file, expression) == util::text_of(ctx.source_file, type_node);

            if !is_self_assertion {
                return;
            }

            let redundant_suffix = Range::new(expression.range().end, node.range().end);
            ctx.report_node_with_fix(
                node,
                "preferConstAssertion",
                "literal type assertion is redundant; the literal already has this type",
                vec![Edit::remove(redundant_suffix)],
            );
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
    fn flags_a_literal_asserted_to_its_own_type_and_fixes_it() {
        let front_end = ReferenceFrontEnd;
        let tester = RuleTester::new(Arc::new(PreferAsConstRule::new()), &front_end);
        tester.run(&RuleTests {
            valid: vec![RuleTestValid::new("const x = 3 as number;")],
            invalid: vec![RuleTestInvalid::new(
                "const x = 3 as 3;",
                vec![RuleTestError::new("preferConstAssertion")],
            )
            .expect_output("const x = 3;")],
        });
    }
}
