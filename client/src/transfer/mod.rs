pub mod scene_receiver;
pub mod transfer_state;
