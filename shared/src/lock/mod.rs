pub mod error;
pub mod lock_coordinator;
pub mod lock_mode;
