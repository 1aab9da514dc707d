pub mod data_core;
pub mod document;
pub mod duplicates;
pub mod markup;
pub mod move_engine;
pub mod node;
pub mod path;
pub mod performance;
pub mod shadow_tree;
pub mod tree_store;
