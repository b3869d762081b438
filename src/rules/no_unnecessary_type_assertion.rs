//! `no-unnecessary-type-assertion`: flags an `as` assertion whose target
//! type is identical to the expression's own resolved type, and offers a
//! fix dropping the assertion (spec.md §8 scenario 4). The only
//! illustrative rule that consults the type checker rather than staying
//! purely syntactic.

use crate::context::RuleContext;
use crate::diagnostic::Edit;
use crate::rule::{Listeners, Rule, RuleMeta, RuleOptions};
use crate::source::Range;
use crate::syntax::Kind;

pub struct NoUnnecessaryTypeAssertionRule {
    meta: RuleMeta,
}

impl NoUnnecessaryTypeAssertionRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                name: "no-unnecessary-type-assertion".into(),
                fixable: true,
            },
        }
    }
}

impl Default for NoUnnecessaryTypeAssertionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoUnnecessaryTypeAssertionRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn run<'a>(&self, _ctx: &RuleContext<'a>, _options: &RuleOptions) -> Listeners<'a> {
        Listeners::new().on_enter(Kind::AsExpression, |node, ctx| {
            let expression = node.field("expression");
            let type_node = node.field("type");

            let expression_type = ctx.type_checker.type_at(expression);
            let asserted_type = ctx.type_checker.type_from_type_node(type_node);

            let (Some(expression_type), Some(asserted_type)) = (expression_type, asserted_type) else {
                return;
            };

            if !ctx.type_checker.is_identical_to(expression_type, asserted_type) {
                return;
            }

            let redundant_suffix = Range::new(expression.range().end, node.range().end);
            ctx.report_node_with_fix(
                node,
                "unnecessaryTypeAssertion",
                "this assertion does not change the type of the expression",
                vec![Edit::remove(redundant_suffix)],
            );
        })
    }
}
