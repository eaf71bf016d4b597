pub mod commands;
pub mod core;
mod help;
mod io;
pub mod output;
mod shell;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV};
