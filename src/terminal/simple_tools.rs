use log::debug;

use super::command::{CommandRes, ShellError, VfsCommand};
use super::file_tools::ensure_not_directory;
use super::path;
use super::vfs::{VfsNodeType, VirtualFilesystem};

const HELP_TEXT: &str = r#"Practice moving around a Windows-style command prompt.
The commands behave like their cmd.exe namesakes:
    cd      display or change the current directory
    copy    copy one file to another location
    del     delete a file (/Q skips the prompt, /F forces read-only files)
    dir     list a directory (/W wide, /P paged)
    echo    display text, or write it to a file with > and >>
    exit    leave the session
    mkdir   create a directory
    move    move a file to another location
    type    display the contents of a text file
"#;

pub struct HelpCommand;

impl VfsCommand for HelpCommand {
    fn execute(&self, _vfs: &mut VirtualFilesystem, _args: Vec<&str>) -> CommandRes {
        CommandRes::Output(HELP_TEXT.trim_end().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Redirect {
    Overwrite,
    Append,
}

impl Redirect {
    fn parse(operator: &str) -> Option<Self> {
        match operator {
            ">" => Some(Self::Overwrite),
            ">>" => Some(Self::Append),
            _ => None,
        }
    }
}

pub struct EchoCommand;

impl EchoCommand {
    /// Echoes `text`, or writes it to `filename` for `>` and `>>`.
    /// An unrecognised operator falls back to a plain echo.
    pub fn echo(
        &self,
        vfs: &mut VirtualFilesystem,
        text: &str,
        operator: Option<&str>,
        filename: Option<&str>,
    ) -> Result<String, ShellError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let (Some(operator), Some(filename)) = (operator, filename) else {
            return Ok(text.to_string());
        };
        let Some(redirect) = Redirect::parse(operator) else {
            return Ok(text.to_string());
        };
        if filename.is_empty() {
            return Ok(text.to_string());
        }

        let file_path = path::canonical(&path::normalize(filename, vfs.cwd()));
        let parent = vfs
            .parent_directory(&file_path)
            .map_err(|_| ShellError::PathNotFound)?;
        let name = path::file_name(&file_path)
            .filter(|name| !path::is_navigation(name))
            .ok_or(ShellError::PathNotFound)?;
        ensure_not_directory(vfs, parent, name)?;

        let previous = vfs
            .child(parent, name)
            .and_then(|id| vfs.read_file(id).ok());
        let content = match (redirect, previous) {
            (Redirect::Append, Some(previous)) => format!("{previous}\n{text}"),
            _ => text.to_string(),
        };

        debug!("echo: {redirect:?} into {file_path}");
        vfs.insert(parent, name, VfsNodeType::File { content });
        Ok(String::new())
    }
}

impl VfsCommand for EchoCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let Some(pos) = args.iter().position(|a| *a == ">" || *a == ">>") else {
            return self.echo(vfs, &args.join(" "), None, None).into();
        };

        let text = args[..pos].join(" ");
        let filename = match &args[pos + 1..] {
            [filename] => *filename,
            _ => return CommandRes::Err(ShellError::SyntaxError),
        };
        self.echo(vfs, &text, Some(args[pos]), Some(filename)).into()
    }
}
