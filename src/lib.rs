pub mod config;
pub mod launcher;
pub mod node_env;
pub mod runner;
pub mod utils;
