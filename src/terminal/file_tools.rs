use indextree::NodeId;
use log::info;

use super::command::{has_switch, parse_switches, CommandRes, ShellError, VfsCommand};
use super::path;
use super::vfs::{VfsNodeType, VirtualFilesystem};

/// A validated source file and destination slot, shared by copy and move.
struct Transfer {
    source_id: NodeId,
    source_parent: NodeId,
    source_name: String,
    content: String,
    dest_parent: NodeId,
    dest_name: String,
}

/// Resolves both ends of a copy or move. A destination naming an existing
/// directory receives the file under the source's name.
fn prepare_transfer(
    vfs: &VirtualFilesystem,
    source: &str,
    destination: &str,
    verb: &'static str,
) -> Result<Transfer, ShellError> {
    if source.is_empty() || destination.is_empty() {
        return Err(ShellError::SyntaxError);
    }

    let source_path = path::canonical(&path::normalize(source, vfs.cwd()));
    let not_found = || ShellError::FileNotFound(source_path.clone());
    let source_id = vfs.lookup(&source_path).map_err(|_| not_found())?;
    let content = vfs
        .read_file(source_id)
        .map_err(|_| ShellError::IsADirectory(verb))?
        .to_string();
    let source_name = path::file_name(&source_path).ok_or_else(not_found)?;
    let source_parent = vfs.parent_directory(&source_path).map_err(|_| not_found())?;

    let mut dest_path = path::canonical(&path::normalize(destination, vfs.cwd()));
    let dest_is_dir = vfs
        .lookup(&dest_path)
        .ok()
        .and_then(|id| vfs.get_node(id))
        .is_some_and(|node| node.is_directory());
    if dest_is_dir {
        dest_path = format!(
            "{}{}{source_name}",
            dest_path.trim_end_matches(path::SEPARATOR),
            path::SEPARATOR
        );
    }

    let dest_parent = vfs
        .parent_directory(&dest_path)
        .map_err(|_| ShellError::PathNotFound)?;
    let dest_name = path::file_name(&dest_path)
        .filter(|name| !path::is_navigation(name))
        .ok_or(ShellError::PathNotFound)?;
    ensure_not_directory(vfs, dest_parent, dest_name)?;

    Ok(Transfer {
        source_id,
        source_parent,
        source_name: source_name.to_string(),
        content,
        dest_parent,
        dest_name: dest_name.to_string(),
    })
}

/// Writing a file over a directory would orphan its contents.
pub(super) fn ensure_not_directory(
    vfs: &VirtualFilesystem,
    parent: NodeId,
    name: &str,
) -> Result<(), ShellError> {
    let clash = vfs
        .child(parent, name)
        .and_then(|id| vfs.get_node(id))
        .is_some_and(|node| node.is_directory());
    if clash {
        return Err(ShellError::AccessDenied);
    }
    Ok(())
}

fn two_operands(args: Vec<&str>) -> (&str, &str) {
    let (_, targets) = parse_switches(args);
    let source = targets.first().copied().unwrap_or_default();
    let destination = targets.get(1).copied().unwrap_or_default();
    (source, destination)
}

pub struct CopyCommand;

impl CopyCommand {
    /// Duplicates a file's content; later writes to either side stay separate.
    pub fn copy(
        &self,
        vfs: &mut VirtualFilesystem,
        source: &str,
        destination: &str,
    ) -> Result<String, ShellError> {
        let transfer = prepare_transfer(vfs, source, destination, "copy")?;
        vfs.insert(
            transfer.dest_parent,
            &transfer.dest_name,
            VfsNodeType::File {
                content: transfer.content,
            },
        );
        Ok("        1 file(s) copied.".to_string())
    }
}

impl VfsCommand for CopyCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let (source, destination) = two_operands(args);
        self.copy(vfs, source, destination).into()
    }
}

pub struct MoveCommand;

impl MoveCommand {
    /// Writes the destination first, then drops the source entry.
    pub fn relocate(
        &self,
        vfs: &mut VirtualFilesystem,
        source: &str,
        destination: &str,
    ) -> Result<String, ShellError> {
        let transfer = prepare_transfer(vfs, source, destination, "move")?;

        if vfs.child(transfer.dest_parent, &transfer.dest_name) != Some(transfer.source_id) {
            vfs.insert(
                transfer.dest_parent,
                &transfer.dest_name,
                VfsNodeType::File {
                    content: transfer.content,
                },
            );
            vfs.remove(transfer.source_parent, &transfer.source_name)
                .map_err(|_| ShellError::FileNotFound(transfer.source_name.clone()))?;
            info!(
                "move: '{}' -> '{}'",
                transfer.source_name, transfer.dest_name
            );
        }
        Ok("        1 file(s) moved.".to_string())
    }
}

impl VfsCommand for MoveCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let (source, destination) = two_operands(args);
        self.relocate(vfs, source, destination).into()
    }
}

pub struct DelCommand;

impl DelCommand {
    /// Deletes one file. Without `/Q` only the confirmation prompt comes back,
    /// and read-only files additionally need `/F`.
    pub fn delete(
        &self,
        vfs: &mut VirtualFilesystem,
        target: &str,
        options: &[&str],
    ) -> Result<String, ShellError> {
        if target.is_empty() {
            return Err(ShellError::SyntaxError);
        }

        let target_path = path::canonical(&path::normalize(target, vfs.cwd()));
        let parent = vfs
            .parent_directory(&target_path)
            .map_err(|_| ShellError::PathNotFound)?;
        let name = path::file_name(&target_path).ok_or(ShellError::PathNotFound)?;
        let node = vfs
            .child(parent, name)
            .and_then(|id| vfs.get_node(id))
            .ok_or_else(|| ShellError::FileNotFound(target_path.clone()))?;

        if node.is_directory() {
            return Err(ShellError::IsADirectory("delete"));
        }
        if node.is_read_only() && !has_switch(options, "/F") {
            return Err(ShellError::AccessDenied);
        }
        if !has_switch(options, "/Q") {
            return Err(ShellError::ConfirmationRequired(target_path.clone()));
        }

        vfs.remove(parent, name)
            .map_err(|_| ShellError::FileNotFound(target_path.clone()))?;
        Ok(format!("Deleted file - {target_path}"))
    }
}

impl VfsCommand for DelCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let (options, targets) = parse_switches(args);
        let target = targets.first().copied().unwrap_or_default();
        self.delete(vfs, target, &options).into()
    }
}

pub struct TypeCommand;

impl TypeCommand {
    pub fn show(&self, vfs: &VirtualFilesystem, filename: &str) -> Result<String, ShellError> {
        if filename.is_empty() {
            return Err(ShellError::SyntaxError);
        }

        let file_path = path::canonical(&path::normalize(filename, vfs.cwd()));
        let id = vfs
            .lookup(&file_path)
            .map_err(|_| ShellError::FileNotFound(file_path.clone()))?;
        vfs.read_file(id)
            .map(str::to_string)
            .map_err(|_| ShellError::IsADirectory("display the contents of"))
    }
}

impl VfsCommand for TypeCommand {
    fn execute(&self, vfs: &mut VirtualFilesystem, args: Vec<&str>) -> CommandRes {
        let filename = args.first().copied().unwrap_or_default();
        self.show(vfs, filename).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;

    fn new_vfs() -> VirtualFilesystem {
        VirtualFilesystem::new(&ShellConfig::default())
    }

    fn write(vfs: &mut VirtualFilesystem, abs: &str, content: &str) {
        let parent = vfs.parent_directory(abs).unwrap();
        let name = path::file_name(abs).unwrap();
        vfs.insert(
            parent,
            name,
            VfsNodeType::File {
                content: content.to_string(),
            },
        );
    }

    #[test]
    fn test_copy_duplicates_content() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "original");

        let result = CopyCommand.copy(&mut vfs, "a.txt", r"Documents\b.txt");
        assert_eq!(result, Ok("        1 file(s) copied.".to_string()));
        assert_eq!(vfs.contents_at(r"C:\Users\Player\Documents\b.txt"), Some("original"));

        write(&mut vfs, r"C:\Users\Player\a.txt", "changed");
        assert_eq!(vfs.contents_at(r"C:\Users\Player\Documents\b.txt"), Some("original"));
    }

    #[test]
    fn test_copy_into_directory_keeps_name() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "data");

        CopyCommand.copy(&mut vfs, "a.txt", "Desktop").unwrap();
        assert_eq!(vfs.contents_at(r"C:\Users\Player\Desktop\a.txt"), Some("data"));
        assert!(vfs.lookup(r"C:\Users\Player\Desktop").is_ok());
    }

    #[test]
    fn test_copy_failures() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "data");

        assert_eq!(CopyCommand.copy(&mut vfs, "", "b.txt"), Err(ShellError::SyntaxError));
        assert_eq!(CopyCommand.copy(&mut vfs, "a.txt", ""), Err(ShellError::SyntaxError));
        assert_eq!(
            CopyCommand.copy(&mut vfs, "missing.txt", "b.txt"),
            Err(ShellError::FileNotFound(r"C:\Users\Player\missing.txt".to_string()))
        );
        assert_eq!(
            CopyCommand.copy(&mut vfs, "Documents", "b.txt"),
            Err(ShellError::IsADirectory("copy"))
        );
        assert_eq!(
            CopyCommand.copy(&mut vfs, "a.txt", r"Nowhere\b.txt"),
            Err(ShellError::PathNotFound)
        );
    }

    #[test]
    fn test_copy_refuses_to_replace_nested_directory() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "data");
        let desktop = vfs.lookup(r"C:\Users\Player\Desktop").unwrap();
        vfs.insert(desktop, "a.txt", VfsNodeType::Directory);

        assert_eq!(
            CopyCommand.copy(&mut vfs, "a.txt", "Desktop"),
            Err(ShellError::AccessDenied)
        );
    }

    #[test]
    fn test_transfer_rejects_dot_destinations() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "data");

        assert_eq!(
            CopyCommand.copy(&mut vfs, "a.txt", r"C:\Users\.."),
            Err(ShellError::PathNotFound)
        );
        assert_eq!(
            MoveCommand.relocate(&mut vfs, "a.txt", r"C:\Users\Player\Desktop\."),
            Err(ShellError::PathNotFound)
        );
        assert!(vfs.exists(r"C:\Users\Player\a.txt"));
        assert!(!vfs.exists(r"C:\Users\.."));
    }

    #[test]
    fn test_move() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "payload");

        let result = MoveCommand.relocate(&mut vfs, "a.txt", r"Documents\b.txt");
        assert_eq!(result, Ok("        1 file(s) moved.".to_string()));
        assert!(!vfs.exists(r"C:\Users\Player\a.txt"));
        assert_eq!(vfs.contents_at(r"C:\Users\Player\Documents\b.txt"), Some("payload"));
    }

    #[test]
    fn test_move_onto_itself_keeps_file() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\a.txt", "payload");

        MoveCommand
            .relocate(&mut vfs, "a.txt", r"C:\Users\Player\a.txt")
            .unwrap();
        assert_eq!(vfs.contents_at(r"C:\Users\Player\a.txt"), Some("payload"));

        MoveCommand.relocate(&mut vfs, "a.txt", ".").unwrap();
        assert_eq!(vfs.contents_at(r"C:\Users\Player\a.txt"), Some("payload"));
    }

    #[test]
    fn test_move_rejects_directory() {
        let mut vfs = new_vfs();
        assert_eq!(
            MoveCommand.relocate(&mut vfs, "Documents", "Stuff"),
            Err(ShellError::IsADirectory("move"))
        );
        assert!(vfs.exists(r"C:\Users\Player\Documents"));
    }

    #[test]
    fn test_del_confirmation_and_read_only() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\readonly.txt", "locked");
        write(&mut vfs, r"C:\Users\Player\plain.txt", "open");

        assert_eq!(
            DelCommand.delete(&mut vfs, "readonly.txt", &[]),
            Err(ShellError::AccessDenied)
        );
        assert_eq!(
            DelCommand.delete(&mut vfs, "readonly.txt", &["/F"]),
            Err(ShellError::ConfirmationRequired(
                r"C:\Users\Player\readonly.txt".to_string()
            ))
        );
        assert!(vfs.exists(r"C:\Users\Player\readonly.txt"));
        assert!(DelCommand
            .delete(&mut vfs, "readonly.txt", &["/Q", "/F"])
            .is_ok());
        assert!(!vfs.exists(r"C:\Users\Player\readonly.txt"));

        assert!(matches!(
            DelCommand.delete(&mut vfs, "plain.txt", &[]),
            Err(ShellError::ConfirmationRequired(_))
        ));
        assert_eq!(
            DelCommand.delete(&mut vfs, "plain.txt", &["/q"]),
            Ok(r"Deleted file - C:\Users\Player\plain.txt".to_string())
        );
    }

    #[test]
    fn test_del_failures() {
        let mut vfs = new_vfs();
        assert_eq!(DelCommand.delete(&mut vfs, "", &["/Q"]), Err(ShellError::SyntaxError));
        assert_eq!(
            DelCommand.delete(&mut vfs, r"Nowhere\x.txt", &["/Q"]),
            Err(ShellError::PathNotFound)
        );
        assert_eq!(
            DelCommand.delete(&mut vfs, "x.txt", &["/Q"]),
            Err(ShellError::FileNotFound(r"C:\Users\Player\x.txt".to_string()))
        );
        assert_eq!(
            DelCommand.delete(&mut vfs, "Documents", &["/Q"]),
            Err(ShellError::IsADirectory("delete"))
        );
        assert!(vfs.exists(r"C:\Users\Player\Documents"));
    }

    #[test]
    fn test_type() {
        let mut vfs = new_vfs();
        write(&mut vfs, r"C:\Users\Player\Documents\a.txt", "line1\nline2");

        assert_eq!(
            TypeCommand.show(&vfs, r"Documents\a.txt"),
            Ok("line1\nline2".to_string())
        );
        assert_eq!(TypeCommand.show(&vfs, ""), Err(ShellError::SyntaxError));
        assert!(matches!(
            TypeCommand.show(&vfs, "b.txt"),
            Err(ShellError::FileNotFound(_))
        ));
        assert_eq!(
            TypeCommand.show(&vfs, "Documents"),
            Err(ShellError::IsADirectory("display the contents of"))
        );
    }
}
