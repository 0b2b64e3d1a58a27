//! Spatial index over document lines for directional nearest-neighbor search.

mod node;
mod quadtree;

pub use node::QuadTreeNode;
pub use quadtree::QuadTree;
