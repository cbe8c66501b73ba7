pub mod auth;
pub mod config;
pub mod error;
pub mod goal_api;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod oracle;
pub mod planner;
pub mod priority;
pub mod progress;
pub mod storage;
