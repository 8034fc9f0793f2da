pub mod cli;
pub mod cluster;
pub mod commands;
pub mod extract;
pub mod utils;
