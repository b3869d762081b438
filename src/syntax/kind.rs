//! The closed set of node kinds the engine dispatches on.
//!
//! spec.md §3 describes the syntax tree as "polymorphic over a closed set
//! of kinds"; Design Notes §9 says to model this as a flat enum plus
//! exhaustive matching rather than an inheritance hierarchy — the same
//! choice the teacher makes by keying its listener map off of
//! `tree_sitter::Node::kind()` string tags. We use a proper enum instead
//! of strings since the kind set here is closed and known at compile time.

use std::fmt;

/// Node kind tags. Not exhaustive of the whole TypeScript grammar — this
/// is the subset the engine and its illustrative rules dispatch on; a
/// real front end maps its own richer kind set onto (a superset of) this
/// one, or the engine is generalized with additional variants as rules
/// need them. `EndOfFileToken` is never a structural child; it is only
/// ever delivered as the synthetic end-of-file `Enter` event (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Kind {
    SourceFile,
    Identifier,
    NumericLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    Block,
    VariableDeclarationList,
    VariableDeclaration,
    ClassDeclaration,
    FunctionDeclaration,
    Parameter,
    CallExpression,
    NewExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    BinaryExpression,
    ConditionalExpression,
    AsExpression,
    TypeAssertionExpression,
    ParenthesizedExpression,
    ArrowFunction,
    ReturnStatement,
    ExpressionStatement,
    IfStatement,
    TypeReference,
    TypeAnnotation,
    EndOfFileToken,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
