//! Bin-packing structures used to lay out pages.

pub mod tree;

pub use tree::GrowingTree;
