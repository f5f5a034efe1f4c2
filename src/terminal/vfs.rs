use chrono::{DateTime, Local};
use indextree::{Arena, NodeId};
use log::info;
use thiserror::Error;

use super::path;
use crate::config::ShellConfig;

#[derive(Debug, Clone)]
pub struct VfsNode {
    pub name: String,
    pub node_type: VfsNodeType,
    pub permissions: Permissions,
    pub metadata: NodeMetadata,
}

impl VfsNode {
    fn new(name: &str, node_type: VfsNodeType, permissions: Permissions) -> Self {
        Self {
            name: name.to_string(),
            node_type,
            permissions,
            metadata: NodeMetadata::default(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.node_type, VfsNodeType::Directory)
    }

    pub fn is_read_only(&self) -> bool {
        self.permissions.read_only
    }

    /// Content length for files, zero for directories.
    pub fn size(&self) -> usize {
        match &self.node_type {
            VfsNodeType::File { content } => content.len(),
            VfsNodeType::Directory => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsNodeType {
    Directory,
    File { content: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub read_only: bool,
}

impl Permissions {
    pub fn read_only() -> Self {
        Self { read_only: true }
    }
}

#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl Default for NodeMetadata {
    fn default() -> Self {
        let now = Local::now();
        Self {
            created: now,
            modified: now,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VfsError {
    #[error("No such file or directory")]
    NotFound,
    #[error("Not a directory")]
    NotADirectory,
    #[error("Not a file")]
    NotAFile,
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub node_id: NodeId,
    pub is_directory: bool,
    pub size: usize,
    pub modified: DateTime<Local>,
}

/// The node tree plus the current working directory.
///
/// Drives hang off a hidden top node, so an absolute path's first component
/// (`C:`) is looked up like any other name. Children keep insertion order.
pub struct VirtualFilesystem {
    arena: Arena<VfsNode>,
    drives: NodeId,
    cwd: String,
    read_only_files: Vec<String>,
}

impl VirtualFilesystem {
    pub fn new(config: &ShellConfig) -> Self {
        let mut arena = Arena::new();
        let drives = arena.new_node(VfsNode::new(
            "",
            VfsNodeType::Directory,
            Permissions::default(),
        ));

        let mut vfs = Self {
            arena,
            drives,
            cwd: String::new(),
            read_only_files: config.read_only_files.clone(),
        };

        vfs.initialize_home(config);
        vfs
    }

    fn initialize_home(&mut self, config: &ShellConfig) {
        let parts = path::components(&config.home);
        let mut current = self.drives;
        for part in &parts {
            current = self.ensure_directory(current, part);
        }
        for dir in &config.home_dirs {
            self.ensure_directory(current, dir);
        }
        self.cwd = path::join_components(&parts);
    }

    fn ensure_directory(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.child(parent, name) {
            Some(id) if self.arena[id].get().is_directory() => id,
            _ => self.insert(parent, name, VfsNodeType::Directory),
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Moves the cwd; the target must be an existing directory.
    pub fn set_cwd(&mut self, abs: &str) -> Result<(), VfsError> {
        let id = self.lookup(abs)?;
        if !self.arena[id].get().is_directory() {
            return Err(VfsError::NotADirectory);
        }
        self.cwd = path::canonical(abs);
        Ok(())
    }

    pub fn drive_exists(&self, drive: &str) -> bool {
        self.child(self.drives, drive).is_some()
    }

    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        dir.children(&self.arena)
            .find(|id| self.arena.get(*id).is_some_and(|n| n.get().name == name))
    }

    pub fn get_node(&self, node: NodeId) -> Option<&VfsNode> {
        self.arena.get(node).map(|node_ref| node_ref.get())
    }

    /// Walks an absolute path from the drive table.
    pub fn lookup(&self, abs: &str) -> Result<NodeId, VfsError> {
        let parts = path::components(abs);
        if parts.is_empty() {
            return Err(VfsError::NotFound);
        }

        let mut current = self.drives;
        for part in parts {
            if !self.arena[current].get().is_directory() {
                return Err(VfsError::NotADirectory);
            }
            current = self.child(current, part).ok_or(VfsError::NotFound)?;
        }
        Ok(current)
    }

    /// Directory holding `abs`. Drive roots have no parent.
    pub fn parent_directory(&self, abs: &str) -> Result<NodeId, VfsError> {
        let parent = path::parent_path(abs).ok_or(VfsError::NotFound)?;
        let id = self.lookup(&parent)?;
        if !self.arena[id].get().is_directory() {
            return Err(VfsError::NotADirectory);
        }
        Ok(id)
    }

    /// Adds `name` under `parent`, or replaces the existing entry of that name
    /// in place so it keeps its listing position. Callers validate that
    /// replacing is allowed.
    pub fn insert(&mut self, parent: NodeId, name: &str, node_type: VfsNodeType) -> NodeId {
        let permissions = if self.read_only_files.iter().any(|f| f == name) {
            Permissions::read_only()
        } else {
            Permissions::default()
        };

        if let Some(existing) = self.child(parent, name) {
            let node = self.arena[existing].get_mut();
            node.node_type = node_type;
            node.permissions = permissions;
            node.metadata.modified = Local::now();
            info!("vfs: replaced '{name}'");
            return existing;
        }

        let id = self
            .arena
            .new_node(VfsNode::new(name, node_type, permissions));
        parent.append(id, &mut self.arena);
        info!("vfs: created '{name}'");
        id
    }

    pub fn remove(&mut self, parent: NodeId, name: &str) -> Result<(), VfsError> {
        let id = self.child(parent, name).ok_or(VfsError::NotFound)?;
        id.remove_subtree(&mut self.arena);
        info!("vfs: removed '{name}'");
        Ok(())
    }

    pub fn read_file(&self, node: NodeId) -> Result<&str, VfsError> {
        let node_ref = self.arena.get(node).ok_or(VfsError::NotFound)?;
        match &node_ref.get().node_type {
            VfsNodeType::File { content } => Ok(content),
            VfsNodeType::Directory => Err(VfsError::NotAFile),
        }
    }

    /// Entries of a directory in insertion order.
    pub fn list_directory(&self, node: NodeId) -> Result<Vec<DirEntry>, VfsError> {
        let node_ref = self.arena.get(node).ok_or(VfsError::NotFound)?;
        if !node_ref.get().is_directory() {
            return Err(VfsError::NotADirectory);
        }

        let entries = node
            .children(&self.arena)
            .filter_map(|child_id| {
                let child = self.arena.get(child_id)?.get();
                Some(DirEntry {
                    name: child.name.clone(),
                    node_id: child_id,
                    is_directory: child.is_directory(),
                    size: child.size(),
                    modified: child.metadata.modified,
                })
            })
            .collect();
        Ok(entries)
    }

    /// File content at an absolute path, if a file lives there.
    pub fn contents_at(&self, abs: &str) -> Option<&str> {
        let id = self.lookup(abs).ok()?;
        self.read_file(id).ok()
    }

    pub fn exists(&self, abs: &str) -> bool {
        self.lookup(abs).is_ok()
    }
}
