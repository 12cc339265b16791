pub mod error;
pub mod scene_buffers;
pub mod scene_category;
pub mod scene_codec;
