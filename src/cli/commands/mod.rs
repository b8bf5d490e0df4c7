//! CLI command implementations.

mod config;
mod doctor;
mod run;
mod split;
mod status;

pub use config::run_config;
pub use doctor::run_doctor;
pub use run::run_pipeline;
pub use split::run_split;
pub use status::run_status;
