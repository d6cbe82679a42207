pub mod chart;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod ephemeris;
pub mod exposure;
pub mod observers;
pub mod obsnight_errors;
pub mod planner;
pub mod scheduler;
pub mod targets;
pub mod time;
