//! Command implementations for the trainhub CLI

pub mod serve;
pub mod setup_db;

pub use serve::run_serve;
pub use setup_db::run_setup_db;
