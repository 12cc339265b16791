pub mod scene_builder;
pub mod sync_helpers;

pub use scene_builder::{
    camera, character, directional_light, geo, group, material, mesh, sample_scene,
    skinned_geo, texture, three_node_scene, TestSceneBuilder,
};
pub use sync_helpers::{client_config, connect_client, tick_until, wait_until, WAIT_TIMEOUT};
