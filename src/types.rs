//! Opaque handles for the type checker's `Type`/`Symbol`/`Signature`
//! values, and the `TypeChecker` trait that is the engine's boundary onto
//! that external collaborator (spec.md §3 "Type, Symbol, Signature",
//! §6 "Parser / type-checker contract").
//!
//! The real front end (a TypeScript compiler) owns these values; the
//! engine only ever holds handles with cheap equality and a flag bitset.
//! This module defines the trait boundary plus `TypeFlags`; concrete
//! values are supplied by whatever `TypeChecker` implementation is wired
//! in (see `frontend` for the reference implementation used by the rule
//! tester).

use bitflags::bitflags;

use crate::syntax::Node;

bitflags! {
    /// Flag bits carried by every `Type`, mirroring spec.md §3's bag of
    /// type flags (string-like, number-like, union, intersection, ...).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        const STRING_LIKE    = 1 << 0;
        const NUMBER_LIKE    = 1 << 1;
        const BIGINT_LIKE    = 1 << 2;
        const BOOLEAN_LIKE   = 1 << 3;
        const NULL           = 1 << 4;
        const UNDEFINED      = 1 << 5;
        const VOID           = 1 << 6;
        const NEVER          = 1 << 7;
        const UNKNOWN        = 1 << 8;
        const ANY            = 1 << 9;
        const OBJECT         = 1 << 10;
        const SYMBOL_LIKE    = 1 << 11;
        const ENUM_LIKE      = 1 << 12;
        const UNION          = 1 << 13;
        const INTERSECTION   = 1 << 14;
    }
}

/// A handle identifying one resolved type. Equality is the identity the
/// front end assigns it (e.g. a pointer or interned index), not structural
/// comparison — two independently-constructed `5`-literal types need not
/// be `==` unless the front end interns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub u64);

/// A parameter of a `Signature`: a name and its declared type, if any.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Option<Type>,
}

/// The external type-checker contract the engine consumes (spec.md §6).
/// Every method may return `None`/empty when the front end has no
/// information for that location — rules must treat that as "unknown",
/// never as a specific flag value.
pub trait TypeChecker {
    fn type_at(&self, node: Node) -> Option<Type>;
    fn type_from_type_node(&self, node: Node) -> Option<Type>;
    fn symbol_at(&self, node: Node) -> Option<Symbol>;
    fn resolved_signature(&self, call: Node) -> Option<Signature>;
    fn base_constraint_of(&self, ty: Type) -> Option<Type>;
    fn is_assignable_to(&self, source: Type, target: Type) -> bool;
    fn is_identical_to(&self, a: Type, b: Type) -> bool;
    fn type_to_string(&self, ty: Type) -> String;

    fn flags_of(&self, ty: Type) -> TypeFlags;
    fn symbol_of_type(&self, ty: Type) -> Option<Symbol>;
    fn call_signatures_of(&self, ty: Type) -> Vec<Signature>;
    fn property_of_type(&self, ty: Type, name: &str) -> Option<Symbol>;

    fn params_of_signature(&self, signature: Signature) -> Vec<Param>;
    fn type_params_of_signature(&self, signature: Signature) -> Vec<Type>;

    /// Constituent types of a union (`flags_of` contains `UNION`); empty
    /// for any other type. Used by the `util` module's decomposition
    /// helpers (spec.md component table: "union/intersection
    /// decomposition").
    fn union_constituents(&self, ty: Type) -> Vec<Type>;

    /// Constituent types of an intersection (`flags_of` contains
    /// `INTERSECTION`); empty for any other type.
    fn intersection_constituents(&self, ty: Type) -> Vec<Type>;
}

/// A `TypeChecker` with no information at all — every query answers
/// "unknown". Used when a file is analyzed by rules that are purely
/// syntactic and a real type checker was never wired in.
pub struct NullTypeChecker;

impl TypeChecker for NullTypeChecker {
    fn type_at(&self, _node: Node) -> Option<Type> {
        None
    }
    fn type_from_type_node(&self, _node: Node) -> Option<Type> {
        None
    }
    fn symbol_at(&self, _node: Node) -> Option<Symbol> {
        None
    }
    fn resolved_signature(&self, _call: Node) -> Option<Signature> {
        None
    }
    fn base_constraint_of(&self, _ty: Type) -> Option<Type> {
        None
    }
    fn is_assignable_to(&self, _source: Type, _target: Type) -> bool {
        false
    }
    fn is_identical_to(&self, a: Type, b: Type) -> bool {
        a == b
    }
    fn type_to_string(&self, ty: Type) -> String {
        format!("<unknown type #{}>", ty.0)
    }
    fn flags_of(&self, _ty: Type) -> TypeFlags {
        TypeFlags::empty()
    }
    fn symbol_of_type(&self, _ty: Type) -> Option<Symbol> {
        None
    }
    fn call_signatures_of(&self, _ty: Type) -> Vec<Signature> {
        Vec::new()
    }
    fn property_of_type(&self, _ty: Type, _name: &str) -> Option<Symbol> {
        None
    }
    fn params_of_signature(&self, _signature: Signature) -> Vec<Param> {
        Vec::new()
    }
    fn type_params_of_signature(&self, _signature: Signature) -> Vec<Type> {
        Vec::new()
    }
    fn union_constituents(&self, _ty: Type) -> Vec<Type> {
        Vec::new()
    }
    fn intersection_constituents(&self, _ty: Type) -> Vec<Type> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_checker_reports_unknown_everywhere() {
        let checker = NullTypeChecker;
        assert_eq!(checker.flags_of(Type(0)), TypeFlags::empty());
        assert!(checker.is_identical_to(Type(1), Type(1)));
        assert!(!checker.is_identical_to(Type(1), Type(2)));
    }

    #[test]
    fn type_flags_compose() {
        let flags = TypeFlags::STRING_LIKE | TypeFlags::UNION;
        assert!(flags.contains(TypeFlags::STRING_LIKE));
        assert!(flags.contains(TypeFlags::UNION));
        assert!(!flags.contains(TypeFlags::NUMBER_LIKE));
    }
}
