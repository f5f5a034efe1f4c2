pub mod config;
pub mod terminal;

pub use config::{ConfigError, ShellConfig};
pub use terminal::{CommandRes, LastCommand, ShellError, Terminal};
