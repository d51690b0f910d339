use indextree::{Arena, NodeId};
use jwalk::WalkDir;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ViewConfig;
use crate::error::TreeError;

/// Read access to a hierarchy of directories and files.
pub trait FileSystemProvider {
    fn is_directory(&self, path: &Path) -> bool;

    /// Like `is_directory`, for the path a traversal starts from.
    fn is_directory_root(&self, path: &Path) -> bool {
        self.is_directory(path)
    }

    /// Names of the entries directly under `path`, in listing order.
    fn list_children(&self, path: &Path) -> Result<Vec<String>, TreeError>;
}

/// The real filesystem.
///
/// Symlinks below the root are reported as files so a link cycle cannot
/// recurse forever. A root given as a link to a directory is followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystemProvider for LocalFileSystem {
    fn is_directory(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    fn is_directory_root(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>, TreeError> {
        let list_error = |source| TreeError::List {
            path: path.to_path_buf(),
            source,
        };
        std::fs::metadata(path).map_err(list_error)?;

        // The walker does not descend through a link, so list its target
        let is_link = std::fs::symlink_metadata(path)
            .map(|metadata| metadata.file_type().is_symlink())
            .unwrap_or(false);
        let target = if is_link {
            std::fs::canonicalize(path).map_err(list_error)?
        } else {
            path.to_path_buf()
        };

        let walker = WalkDir::new(&target)
            .min_depth(1)
            .max_depth(1)
            .skip_hidden(false)
            .sort(true)
            .parallelism(jwalk::Parallelism::Serial);

        let mut names = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| TreeError::Walk {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    name: String,
    is_dir: bool,
}

/// In-memory hierarchy backed by an arena, for tests and the demo tree.
pub struct MemoryFileSystem {
    arena: Arena<MemoryEntry>,
    root: NodeId,
    root_path: PathBuf,
    path_to_node: HashMap<PathBuf, NodeId>,
}

impl MemoryFileSystem {
    /// Create an empty directory rooted at `root_path`.
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        let mut arena = Arena::new();
        let root_path_buf = root_path.as_ref().to_path_buf();
        let root_name = root_path_buf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path_buf.display().to_string());

        let root = arena.new_node(MemoryEntry {
            name: root_name,
            is_dir: true,
        });
        let mut path_to_node = HashMap::new();
        path_to_node.insert(root_path_buf.clone(), root);

        Self {
            arena,
            root,
            root_path: root_path_buf,
            path_to_node,
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Add a directory at `relative` under the root, creating missing parents.
    pub fn add_dir<P: AsRef<Path>>(&mut self, relative: P) -> &mut Self {
        let path = self.root_path().join(relative);
        self.insert(path, true);
        self
    }

    /// Add a file at `relative` under the root, creating missing parents.
    pub fn add_file<P: AsRef<Path>>(&mut self, relative: P) -> &mut Self {
        let path = self.root_path().join(relative);
        self.insert(path, false);
        self
    }

    fn insert(&mut self, path: PathBuf, is_dir: bool) -> NodeId {
        if let Some(&existing) = self.path_to_node.get(&path) {
            return existing;
        }

        let parent_id = match path.parent() {
            Some(parent) => self.insert(parent.to_path_buf(), true),
            None => self.root,
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let node_id = self.arena.new_node(MemoryEntry { name, is_dir });
        parent_id.append(node_id, &mut self.arena);
        self.path_to_node.insert(path, node_id);
        node_id
    }

    pub fn len(&self) -> usize {
        self.path_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// A small source tree with enough rows to overflow a typical window.
    pub fn demo<P: AsRef<Path>>(root_path: P) -> Self {
        let mut fs = Self::new(root_path);
        fs.add_file("Cargo.toml").add_file("README.md");

        for krate in ["core", "render", "shell"] {
            for module in ["config", "error", "layout", "model", "state", "util"] {
                fs.add_file(format!("crates/{krate}/src/{module}.rs"));
            }
            for nested in ["parse", "encode", "cache"] {
                fs.add_file(format!("crates/{krate}/src/{nested}/mod.rs"));
                fs.add_file(format!("crates/{krate}/src/{nested}/tests.rs"));
            }
            fs.add_file(format!("crates/{krate}/Cargo.toml"));
        }

        for page in ["intro", "install", "usage", "layout", "faq"] {
            fs.add_file(format!("docs/{page}.md"));
        }
        for icon in 0..12 {
            fs.add_file(format!("assets/icons/icon_{icon:02}.png"));
        }
        fs.add_dir("target");
        fs
    }
}

impl FileSystemProvider for MemoryFileSystem {
    fn is_directory(&self, path: &Path) -> bool {
        self.path_to_node
            .get(path)
            .and_then(|&id| self.arena.get(id))
            .map(|node| node.get().is_dir)
            .unwrap_or(false)
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>, TreeError> {
        let id = self
            .path_to_node
            .get(path)
            .copied()
            .ok_or_else(|| TreeError::NotFound {
                path: path.to_path_buf(),
            })?;

        let is_dir = self.arena.get(id).map(|n| n.get().is_dir).unwrap_or(false);
        if !is_dir {
            return Err(TreeError::List {
                path: path.to_path_buf(),
                source: io::Error::other("not a directory"),
            });
        }

        Ok(id
            .children(&self.arena)
            .filter_map(|child| self.arena.get(child))
            .map(|node| node.get().name.clone())
            .collect())
    }
}

/// Pick the hierarchy a config asks for.
pub fn provider_for(config: &ViewConfig) -> Box<dyn FileSystemProvider> {
    if config.demo {
        Box::new(MemoryFileSystem::demo(&config.root))
    } else {
        Box::new(LocalFileSystem)
    }
}

/// Fail early when the configured root is not on disk.
///
/// A missing path would otherwise be classified as a file and drawn as a
/// single row.
pub fn ensure_root(config: &ViewConfig) -> Result<(), TreeError> {
    if config.demo || config.root.exists() {
        Ok(())
    } else {
        Err(TreeError::NotFound {
            path: config.root.clone(),
        })
    }
}
