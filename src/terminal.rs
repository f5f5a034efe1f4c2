mod command;
mod dir_tools;
mod file_tools;
pub mod path;
mod simple_tools;
pub mod vfs;

pub use command::{Cmd, CommandRes, LastCommand, ShellError, VfsCommand};

use std::collections::HashMap;

use log::{debug, warn};

use crate::config::{ConfigError, ShellConfig};
use dir_tools::{CdCommand, DirCommand, MkdirCommand};
use file_tools::{CopyCommand, DelCommand, MoveCommand, TypeCommand};
use simple_tools::{EchoCommand, HelpCommand};
use vfs::VirtualFilesystem;

/// The command engine: one simulated session with its own tree, cwd and
/// last-command record.
///
/// Commands can be driven either through the typed methods (`dir`, `cd`, ...)
/// or from a raw input line with [`Terminal::handle_command`]. Both paths
/// update [`Terminal::last_command`].
pub struct Terminal {
    config: ShellConfig,
    vfs: VirtualFilesystem,
    commands: HashMap<Cmd, Box<dyn VfsCommand>>,
    last_command: Option<LastCommand>,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self::build(ShellConfig::default())
    }

    /// Starts a session with a custom layout, rejecting configs that
    /// [`ShellConfig::validate`] refuses.
    pub fn with_config(config: ShellConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ShellConfig) -> Self {
        let vfs = VirtualFilesystem::new(&config);
        let mut terminal = Self {
            config,
            vfs,
            commands: HashMap::new(),
            last_command: None,
        };
        terminal.initialize_commands();
        terminal
    }

    fn initialize_commands(&mut self) {
        self.commands
            .insert(Cmd::Dir, Box::new(DirCommand::new(&self.config)));
        self.commands.insert(Cmd::Cd, Box::new(CdCommand));
        self.commands.insert(Cmd::MkDir, Box::new(MkdirCommand));
        self.commands.insert(Cmd::Copy, Box::new(CopyCommand));
        self.commands.insert(Cmd::Del, Box::new(DelCommand));
        self.commands.insert(Cmd::Type, Box::new(TypeCommand));
        self.commands.insert(Cmd::Echo, Box::new(EchoCommand));
        self.commands.insert(Cmd::Move, Box::new(MoveCommand));
        self.commands.insert(Cmd::Help, Box::new(HelpCommand));
        // exit and unknown commands are answered by handle_command itself
    }

    pub fn cwd(&self) -> &str {
        self.vfs.cwd()
    }

    /// `C:\Users\Player>`
    pub fn prompt(&self) -> String {
        format!("{}>", self.vfs.cwd())
    }

    pub fn vfs(&self) -> &VirtualFilesystem {
        &self.vfs
    }

    pub fn last_command(&self) -> Option<&LastCommand> {
        self.last_command.as_ref()
    }

    fn record<S: AsRef<str>>(&mut self, name: &str, args: &[S]) {
        self.last_command = Some(LastCommand::new(name, args));
    }

    fn report(name: &str, res: CommandRes) -> CommandRes {
        if let CommandRes::Err(err) = &res {
            warn!("{name}: {err}");
        }
        res
    }

    /// Splits a line into a command word and arguments and runs it.
    /// The command word is case-insensitive; arguments are passed through
    /// and recorded exactly as typed.
    pub fn handle_command(&mut self, input: &str) -> CommandRes {
        let mut parts = input.split_whitespace();
        let Some(cmd_text) = parts.next() else {
            return CommandRes::Nothing;
        };
        let args: Vec<&str> = parts.collect();
        let cmd_name = cmd_text.to_lowercase();
        let cmd = Cmd::from(cmd_name.as_str());
        debug!("dispatch: {cmd_name} {args:?}");

        match cmd {
            Cmd::Unknown => {
                self.record(&cmd_name, &args);
                Self::report(
                    &cmd_name,
                    CommandRes::Err(ShellError::UnknownCommand(cmd_text.to_string())),
                )
            }
            Cmd::Exit => {
                self.record(cmd.as_str(), &args);
                CommandRes::Exit
            }
            _ => {
                self.record(cmd.as_str(), &args);
                let res = match self.commands.get(&cmd) {
                    Some(command) => command.execute(&mut self.vfs, args),
                    None => CommandRes::Nothing,
                };
                Self::report(cmd.as_str(), res)
            }
        }
    }

    pub fn dir(&mut self, path: Option<&str>, options: &[&str]) -> CommandRes {
        let args: Vec<&str> = path.into_iter().chain(options.iter().copied()).collect();
        self.record(Cmd::Dir.as_str(), &args);
        let res = DirCommand::new(&self.config).list(&self.vfs, path, options);
        Self::report(Cmd::Dir.as_str(), res.into())
    }

    pub fn cd(&mut self, target: &str) -> CommandRes {
        self.record(Cmd::Cd.as_str(), &non_empty(&[target]));
        let res = CdCommand.change(&mut self.vfs, target);
        Self::report(Cmd::Cd.as_str(), res.into())
    }

    pub fn mkdir(&mut self, name: &str) -> CommandRes {
        self.record(Cmd::MkDir.as_str(), &non_empty(&[name]));
        let res = MkdirCommand.create(&mut self.vfs, name);
        Self::report(Cmd::MkDir.as_str(), res.into())
    }

    pub fn copy(&mut self, source: &str, destination: &str) -> CommandRes {
        self.record(Cmd::Copy.as_str(), &non_empty(&[source, destination]));
        let res = CopyCommand.copy(&mut self.vfs, source, destination);
        Self::report(Cmd::Copy.as_str(), res.into())
    }

    pub fn del(&mut self, target: &str, options: &[&str]) -> CommandRes {
        let mut args = non_empty(&[target]);
        args.extend_from_slice(options);
        self.record(Cmd::Del.as_str(), &args);
        let res = DelCommand.delete(&mut self.vfs, target, options);
        Self::report(Cmd::Del.as_str(), res.into())
    }

    /// `type`, named to stay clear of the keyword.
    pub fn type_file(&mut self, filename: &str) -> CommandRes {
        self.record(Cmd::Type.as_str(), &non_empty(&[filename]));
        let res = TypeCommand.show(&self.vfs, filename);
        Self::report(Cmd::Type.as_str(), res.into())
    }

    pub fn echo(
        &mut self,
        text: &str,
        operator: Option<&str>,
        filename: Option<&str>,
    ) -> CommandRes {
        let mut args = non_empty(&[text]);
        args.extend(operator);
        args.extend(filename);
        self.record(Cmd::Echo.as_str(), &args);
        let res = EchoCommand.echo(&mut self.vfs, text, operator, filename);
        Self::report(Cmd::Echo.as_str(), res.into())
    }

    /// `move`, named to stay clear of the keyword.
    pub fn move_file(&mut self, source: &str, destination: &str) -> CommandRes {
        self.record(Cmd::Move.as_str(), &non_empty(&[source, destination]));
        let res = MoveCommand.relocate(&mut self.vfs, source, destination);
        Self::report(Cmd::Move.as_str(), res.into())
    }
}

fn non_empty<'a>(args: &[&'a str]) -> Vec<&'a str> {
    args.iter().copied().filter(|a| !a.is_empty()).collect()
}
