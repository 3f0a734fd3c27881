pub mod config;
pub mod logging;

pub mod aggregate;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod planner;
pub mod probe;
pub mod report;
pub mod worker;
