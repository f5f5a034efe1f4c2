use chrono::{DateTime, Local};
use log::debug;

use super::command::{has_switch, parse_switches, CommandRes, ShellError, VfsCommand};
use super::path;
use super::vfs::{DirEntry, VfsNodeType, VirtualFilesystem};
use crate::config::ShellConfig;

const MORE_PROMPT: &str = "Press any key to continue . . .";

pub struct DirCommand {
    page_size: usize,
    wide_columns: usize,
}

impl DirCommand {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            wide_columns: config.wide_columns.max(1),
        }
    }

    /// Lists `path` (the cwd when absent). `/w` takes precedence over `/p`.
    pub fn list(
        &self,
        vfs: &VirtualFilesystem,
        path: Option<&str>,
        options: &[&str],
    ) -> Result<String, ShellError> {
        let target_path = match path {
            Some(p) if !p.is_empty() => path::canonical(&path::normalize(p, vfs.cwd())),
            _ => vfs.cwd().to_string(),
        };
        let dir_id = vfs
            .lookup(&target_path)
            .map_err(|_| ShellError::PathNotFound)?;
        let entries = vfs
            .list_directory(dir_id)
            .map_err(|_| ShellError::PathNotFound)?;

        let mut output = vec![format!(" Directory of {target_path}\n")];

        if has_switch(options, "/w") {
            output.extend(self.wide_lines(&entries));
        } else {
            let mut lines = Vec::with_capacity(entries.len() + 1);
            if let Some(parent_path) = path::parent_path(&target_path) {
                let modified = vfs
                    .lookup(&parent_path)
                    .ok()
                    .and_then(|id| vfs.get_node(id))
                    .map(|node| node.metadata.modified)
                    .unwrap_or_else(Local::now);
                lines.push(entry_line(modified, true, 0, ".."));
            }
            lines.extend(
                entries
                    .iter()
                    .map(|e| entry_line(e.modified, e.is_directory, e.size, &e.name)),
            );

            if has_switch(options, "/p") {
                output.extend(self.paged(lines));
            } else {
                output.extend(lines);
            }
        }

        output.push(summary(&entries));
        Ok(output.join("\n"))
    }

    fn wide_lines(&self, entries: &[DirEntry]) -> Vec<String> {
        let names = entries
            .iter()
            .map(|e| {
                if e.is_directory {
                    format!("[{}]", e.name)
                } else {
                    e.name.clone()
                }
            })
            .collect::<Vec<_>>();
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0) + 2;

        names
            .chunks(self.wide_columns)
            .map(|row| {
                row.iter()
                    .map(|n| format!("{n:<width$}"))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn paged(&self, lines: Vec<String>) -> Vec<String> {
        let page_count = lines.len().div_ceil(self.page_size);
        let mut out = Vec::with_capacity(lines.len() + page_count * 2);
        for (i, page) in lines.chunks(self.page_size).enumerate() {
            out.extend_from_slice(page);
            if i + 1 < page_count {
                out.push(String::new());
                out.push(MORE_PROMPT.to_string());
            }
        }
        out
    }
}

fn entry_line(modified: DateTime<Local>, is_directory: bool, size: usize, name: &str) -> String {
    let stamp = modified.format("%Y-%m-%d  %H:%M");
    if is_directory {
        format!("{stamp}    <DIR>          {name}")
    } else {
        format!("{stamp}    {size:>14} {name}")
    }
}

fn summary(entries: &[DirEntry]) -> String {
    let (dirs, files): (Vec<&DirEntry>, Vec<&DirEntry>) =
        entries.iter().partition(|e| e.is_directory);
    let bytes: usize = files.iter().map(|e| e.size).sum();
    format!(
        "{:>16} File(s) {bytes:>14} bytes\n{:>16} Dir(s)",
        files.len(),
        dirs.len()
    )
}

impl VfsCommand for DirCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let (options, targets) = parse_switches(args);
        self.list(vfs, targets.first().copied(), &options).into()
    }
}

pub struct CdCommand;

impl CdCommand {
    /// Changes the cwd and returns it. An empty target only reports it.
    pub fn change(&self, vfs: &mut VirtualFilesystem, target: &str) -> Result<String, ShellError> {
        match target {
            "" => return Ok(vfs.cwd().to_string()),
            ".." => {
                let parent = path::parent_path(vfs.cwd()).ok_or(ShellError::PathNotFound)?;
                vfs.set_cwd(&parent).map_err(|_| ShellError::PathNotFound)?;
            }
            "\\" => {
                let drive = path::components(vfs.cwd())
                    .first()
                    .map(|drive| path::join_components(&[*drive]))
                    .ok_or(ShellError::PathNotFound)?;
                vfs.set_cwd(&drive).map_err(|_| ShellError::PathNotFound)?;
            }
            drive if path::is_drive_token(drive) => {
                if !vfs.drive_exists(drive) {
                    return Err(ShellError::DriveNotFound);
                }
                vfs.set_cwd(&format!("{drive}{}", path::SEPARATOR))
                    .map_err(|_| ShellError::DriveNotFound)?;
            }
            target => {
                let new_path = path::normalize(target, vfs.cwd());
                vfs.set_cwd(&new_path).map_err(|_| ShellError::PathNotFound)?;
            }
        }

        debug!("cd: cwd is now {}", vfs.cwd());
        Ok(vfs.cwd().to_string())
    }
}

impl VfsCommand for CdCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let target = args.first().copied().unwrap_or_default();
        self.change(vfs, target).into()
    }
}

pub struct MkdirCommand;

impl MkdirCommand {
    pub fn create(&self, vfs: &mut VirtualFilesystem, name: &str) -> Result<String, ShellError> {
        if name.is_empty() {
            return Err(ShellError::SyntaxError);
        }

        let target_path = path::canonical(&path::normalize(name, vfs.cwd()));
        let Some(dir_name) = path::file_name(&target_path) else {
            // a drive root
            return Err(if vfs.exists(&target_path) {
                ShellError::AlreadyExists(target_path.clone())
            } else {
                ShellError::PathNotFound
            });
        };

        if path::is_navigation(dir_name) {
            return Err(ShellError::PathNotFound);
        }

        let parent = vfs
            .parent_directory(&target_path)
            .map_err(|_| ShellError::PathNotFound)?;
        if vfs.child(parent, dir_name).is_some() {
            return Err(ShellError::AlreadyExists(dir_name.to_string()));
        }

        vfs.insert(parent, dir_name, VfsNodeType::Directory);
        Ok(format!("Created directory {target_path}"))
    }
}

impl VfsCommand for MkdirCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let name = args.first().copied().unwrap_or_default();
        self.create(vfs, name).into()
    }
}
