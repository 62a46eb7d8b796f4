pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod reader;
pub mod services;
