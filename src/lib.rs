pub mod analyze;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod output;
pub mod providers;
pub mod scoring;
pub mod ticker;
