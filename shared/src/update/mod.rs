pub mod error;
pub mod param_type;
pub mod parameter_update;
pub mod parameter_value;
pub mod update_applier;
