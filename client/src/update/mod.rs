pub mod update_events;
pub mod update_subscriber;
