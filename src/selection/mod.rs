mod catalog;
mod group;
mod node;
mod tree;

pub use catalog::StaticLayers;
pub use group::{CategoryGroup, GroupedLayers, OwnerGroup};
pub use node::{NodeState, SelectionNode};
pub use tree::{Selection, SelectionTree};
