pub mod error;
pub mod node;
pub mod node_name;
pub mod packages;
pub mod scene_data;
pub mod scene_tree;
