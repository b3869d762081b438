mod kind;
mod tree;

pub use kind::Kind;
pub use tree::{Node, NodeId, SyntaxTree, SyntaxTreeBuilder};
