pub mod cli;
pub mod disasm;
pub mod extract;
pub mod list;

pub use cli::{Cli, CliHandler};
