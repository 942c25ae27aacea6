pub mod kind;
pub mod node;
pub mod tree;

pub use kind::SyntaxKind;
pub use node::{Descendants, NodeTag, SyntaxNode};
pub use tree::{NodeId, Replacement, SyntaxTree};
