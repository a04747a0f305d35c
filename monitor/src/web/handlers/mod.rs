pub mod common;
pub mod health;
pub mod loader;

pub use health::{check_health, fix_connection, get_status, report_failure, run_probes};
pub use loader::load_bundle;
