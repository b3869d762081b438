//! Arena-backed syntax tree: nodes own no pointers directly, they are
//! indices into a `SyntaxTree`'s arena, with the tree owning both the
//! child lists and the upward parent edges (spec.md §3: "All pointer
//! graphs are trees plus the parent back-edge, no cycles"; Design Notes
//! §9: "Model this as arena allocation with indices").
//!
//! Grounded on the teacher's `node.rs` (`NodeExt` trait: `is_descendant_of`,
//! `field`, `root`, `find_first_descendant_of_kind`), adapted from a
//! tree-sitter-backed node to this crate's own arena.

use crate::source::Range;
use crate::syntax::kind::Kind;

/// An index into a `SyntaxTree`'s arena. Cheap to copy, valid only for the
/// `SyntaxTree` that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

struct NodeData {
    kind: Kind,
    range: Range,
    parent: Option<NodeId>,
    /// Children in source (structural) order — this order is part of the
    /// contract so rules relying on token adjacency are deterministic
    /// (spec.md §4.4).
    children: Vec<NodeId>,
    /// Named structural accessors, e.g. a call's `expression`/`arguments`.
    fields: Vec<(&'static str, NodeId)>,
}

/// Owns every node produced while parsing one source file. Lifetime is
/// the analysis pass over that file (spec.md §3 "Lifecycle").
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

/// Builder used by a front end to assemble a `SyntaxTree` bottom-up: push
/// leaves first, then a parent once all its children exist.
#[derive(Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<NodeData>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: Kind, range: Range, children: Vec<NodeId>) -> NodeId {
        self.push_with_fields(kind, range, children, Vec::new())
    }

    pub fn push_with_fields(
        &mut self,
        kind: Kind,
        range: Range,
        children: Vec<NodeId>,
        fields: Vec<(&'static str, NodeId)>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for &child in &children {
            self.nodes[child.0 as usize].parent = Some(id);
        }
        self.nodes.push(NodeData {
            kind,
            range,
            parent: None,
            children,
            fields,
        });
        id
    }

    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            nodes: self.nodes,
            root,
        }
    }
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }
}

/// A cheap, `Copy` handle into a `SyntaxTree`. Mirrors the teacher's
/// pattern of passing `tree_sitter::Node` by value through rule handlers.
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree SyntaxTree,
    id: NodeId,
}

impl<'tree> PartialEq for Node<'tree> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<'tree> Eq for Node<'tree> {}

impl<'tree> Node<'tree> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.tree.data(self.id).kind
    }

    pub fn range(&self) -> Range {
        self.tree.data(self.id).range
    }

    pub fn parent(&self) -> Option<Node<'tree>> {
        self.tree.data(self.id).parent.map(|id| self.tree.node(id))
    }

    /// Children in structural/source order (spec.md §4.4).
    pub fn children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| tree.node(id))
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    /// A structural accessor by field name, e.g. `call.field("expression")`.
    /// Panics if the field is absent — mirrors the teacher's `NodeExt::field`,
    /// which treats a missing required field as a front-end bug, not a
    /// rule-author-recoverable condition.
    pub fn field(&self, name: &str) -> Node<'tree> {
        self.maybe_field(name)
            .unwrap_or_else(|| panic!("expected field '{name}' on {:?}", self.kind()))
    }

    pub fn maybe_field(&self, name: &str) -> Option<Node<'tree>> {
        self.tree
            .data(self.id)
            .fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|&(_, id)| self.tree.node(id))
    }

    pub fn root(&self) -> Node<'tree> {
        self.tree.root()
    }

    pub fn is_descendant_of(&self, other: &Node<'tree>) -> bool {
        let other_range = other.range();
        let self_range = self.range();
        self_range.start >= other_range.start && self_range.end <= other_range.end
    }

    pub fn find_first_descendant_of_kind(&self, kind: Kind) -> Option<Node<'tree>> {
        self.find_first_matching_descendant(|node| node.kind() == kind)
    }

    pub fn find_first_matching_descendant(
        &self,
        mut predicate: impl FnMut(Node<'tree>) -> bool,
    ) -> Option<Node<'tree>> {
        if predicate(*self) {
            return Some(*self);
        }
        for child in self.children() {
            if let Some(found) = child.find_first_matching_descendant(&mut predicate) {
                return Some(found);
            }
        }
        None
    }

    pub fn ancestors(&self) -> impl Iterator<Item = Node<'tree>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_parent_child_links() {
        let mut builder = SyntaxTreeBuilder::new();
        let leaf = builder.push(Kind::Identifier, Range::new(0, 3), vec![]);
        let root = builder.push(Kind::SourceFile, Range::new(0, 3), vec![leaf]);
        let tree = builder.finish(root);

        let root_node = tree.root();
        assert_eq!(root_node.kind(), Kind::SourceFile);
        let child = root_node.children().next().unwrap();
        assert_eq!(child.kind(), Kind::Identifier);
        assert_eq!(child.parent().unwrap().kind(), Kind::SourceFile);
    }

    #[test]
    fn descendant_of_uses_byte_ranges() {
        let mut builder = SyntaxTreeBuilder::new();
        let leaf = builder.push(Kind::Identifier, Range::new(2, 5), vec![]);
        let root = builder.push(Kind::SourceFile, Range::new(0, 10), vec![leaf]);
        let tree = builder.finish(root);

        assert!(tree.node(leaf).is_descendant_of(&tree.root()));
        assert!(!tree.root().is_descendant_of(&tree.node(leaf)));
    }

    #[test]
    fn fields_are_looked_up_by_name() {
        let mut builder = SyntaxTreeBuilder::new();
        let callee = builder.push(Kind::Identifier, Range::new(0, 3), vec![]);
        let arg = builder.push(Kind::NumericLiteral, Range::new(4, 5), vec![]);
        let call = builder.push_with_fields(
            Kind::CallExpression,
            Range::new(0, 6),
            vec![callee, arg],
            vec![("expression", callee)],
        );
        let tree = builder.finish(call);

        assert_eq!(tree.root().field("expression").kind(), Kind::Identifier);
        assert!(tree.root().maybe_field("arguments").is_none());
    }
}
