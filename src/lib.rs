pub mod cli;
pub mod config;
pub mod env_file;
pub mod errors;
pub mod executor;
pub mod filter;
pub mod runner;
pub mod steps;
pub mod ui;
