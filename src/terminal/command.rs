use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vfs::VirtualFilesystem;

/// A shell command that reads or mutates the filesystem.
///
/// `args` are the whitespace-split tokens after the command word, switches
/// included, in the order they were typed.
pub trait VfsCommand: Send + Sync {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("The system cannot find the path specified.")]
    PathNotFound,
    #[error("The system cannot find the file specified.\n{0}")]
    FileNotFound(String),
    #[error("The system cannot find the drive specified.")]
    DriveNotFound,
    #[error("Cannot {0} a directory.")]
    IsADirectory(&'static str),
    #[error("A subdirectory or file {0} already exists.")]
    AlreadyExists(String),
    #[error("Access is denied.")]
    AccessDenied,
    #[error("The syntax of the command is incorrect.")]
    SyntaxError,
    #[error("{0}, Are you sure (Y/N)? Add /Q to delete without this prompt.")]
    ConfirmationRequired(String),
    #[error(
        "'{0}' is not recognized as an internal or external command,\n\
         operable program or batch file."
    )]
    UnknownCommand(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRes {
    Output(String),
    Err(ShellError),
    /// The session was asked to end.
    Exit,
    Nothing,
}

impl CommandRes {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    pub fn error(&self) -> Option<&ShellError> {
        match self {
            Self::Err(err) => Some(err),
            _ => None,
        }
    }

    /// What the user sees, for successes and failures alike.
    pub fn text(&self) -> String {
        match self {
            Self::Output(text) => text.clone(),
            Self::Err(err) => err.to_string(),
            Self::Exit | Self::Nothing => String::new(),
        }
    }
}

impl fmt::Display for CommandRes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<Result<String, ShellError>> for CommandRes {
    fn from(value: Result<String, ShellError>) -> Self {
        match value {
            Ok(text) if text.is_empty() => Self::Nothing,
            Ok(text) => Self::Output(text),
            Err(err) => Self::Err(err),
        }
    }
}

/// The most recent command and its arguments, as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl LastCommand {
    pub fn new<S: AsRef<str>>(name: &str, args: &[S]) -> Self {
        Self {
            name: name.to_string(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cmd {
    Dir,
    Cd,
    MkDir,
    Copy,
    Del,
    Type,
    Echo,
    Move,
    Help,
    Exit,
    Unknown,
}

impl From<&str> for Cmd {
    fn from(value: &str) -> Self {
        match value {
            "dir" => Self::Dir,
            "cd" | "chdir" => Self::Cd,
            "mkdir" | "md" => Self::MkDir,
            "copy" => Self::Copy,
            "del" | "erase" => Self::Del,
            "type" => Self::Type,
            "echo" => Self::Echo,
            "move" => Self::Move,
            "help" => Self::Help,
            "exit" => Self::Exit,
            _ => Self::Unknown,
        }
    }
}

impl Cmd {
    pub fn all() -> Vec<Cmd> {
        vec![
            Self::Dir,
            Self::Cd,
            Self::MkDir,
            Self::Copy,
            Self::Del,
            Self::Type,
            Self::Echo,
            Self::Move,
            Self::Help,
            Self::Exit,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Cd => "cd",
            Self::MkDir => "mkdir",
            Self::Copy => "copy",
            Self::Del => "del",
            Self::Type => "type",
            Self::Echo => "echo",
            Self::Move => "move",
            Self::Help => "help",
            Self::Exit => "exit",
            Self::Unknown => "",
        }
    }
}

/// Splits `/X` switches from positional arguments, keeping the order of each.
pub fn parse_switches(args: Vec<&str>) -> (Vec<&str>, Vec<&str>) {
    args.into_iter()
        .partition(|arg| arg.starts_with('/') && arg.len() > 1)
}

/// Switch lookup is case-insensitive, like cmd.exe.
pub fn has_switch(options: &[&str], switch: &str) -> bool {
    options.iter().any(|o| o.eq_ignore_ascii_case(switch))
}
