pub mod cli;
pub mod config;
pub mod data;
pub mod estimator;
pub mod server;
