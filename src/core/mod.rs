pub mod checks;
pub mod debug_logger;
pub mod heartbeat;
pub mod report;
pub mod runner;
pub mod types;

pub use runner::{Check, Doctor};
pub use types::CheckResult;
