use std::path::{Path, PathBuf};

use crate::error::TreeError;
use crate::fs::FileSystemProvider;

/// An entry of the hierarchy being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(PathBuf),
    File(PathBuf),
}

impl Node {
    /// Wrap `path` in the variant the provider reports for it.
    pub fn classify<F>(fs: &F, path: impl Into<PathBuf>) -> Self
    where
        F: FileSystemProvider + ?Sized,
    {
        let path = path.into();
        if fs.is_directory(&path) {
            Node::Directory(path)
        } else {
            Node::File(path)
        }
    }

    /// Classify the node a traversal starts from.
    pub fn classify_root<F>(fs: &F, path: impl Into<PathBuf>) -> Self
    where
        F: FileSystemProvider + ?Sized,
    {
        let path = path.into();
        if fs.is_directory_root(&path) {
            Node::Directory(path)
        } else {
            Node::File(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Node::Directory(path) | Node::File(path) => path,
        }
    }

    /// Final path component, or the whole path when there is none (`.`, `/`).
    pub fn name(&self) -> String {
        let path = self.path();
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Walk this node depth-first, pre-order, reporting to `visitor`.
    ///
    /// Children are visited in the order the provider lists them.
    pub fn populate<F, V>(&self, fs: &F, visitor: &mut V) -> Result<(), TreeError>
    where
        F: FileSystemProvider + ?Sized,
        V: TreeVisitor + ?Sized,
    {
        match self {
            Node::File(_) => {
                visitor.leaf(self);
                Ok(())
            }
            Node::Directory(path) => {
                visitor.begin_tree(self);
                for name in fs.list_children(path)? {
                    let child = Node::classify(fs, path.join(name));
                    child.populate(fs, visitor)?;
                }
                visitor.end_tree(self);
                Ok(())
            }
        }
    }
}

/// Receives the traversal of a `Node`.
pub trait TreeVisitor {
    fn begin_tree(&mut self, node: &Node);
    fn leaf(&mut self, node: &Node);
    fn end_tree(&mut self, node: &Node);
}

/// One line of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub depth: usize,
    pub name: String,
    pub is_dir: bool,
}

/// Flattens a traversal into indent-annotated rows.
#[derive(Debug, Default)]
pub struct RowCollector {
    depth: usize,
    rows: Vec<Row>,
}

impl RowCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    fn push(&mut self, node: &Node) {
        self.rows.push(Row {
            depth: self.depth,
            name: node.name(),
            is_dir: node.is_dir(),
        });
    }
}

impl TreeVisitor for RowCollector {
    fn begin_tree(&mut self, node: &Node) {
        self.push(node);
        self.depth += 1;
    }

    fn leaf(&mut self, node: &Node) {
        self.push(node);
    }

    fn end_tree(&mut self, _node: &Node) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Rows of the hierarchy under `root`, in depth-first pre-order.
pub fn collect_rows<F>(fs: &F, root: &Path) -> Result<Vec<Row>, TreeError>
where
    F: FileSystemProvider + ?Sized,
{
    let mut collector = RowCollector::new();
    Node::classify_root(fs, root).populate(fs, &mut collector)?;
    Ok(collector.into_rows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn pairs(rows: &[Row]) -> Vec<(usize, &str)> {
        rows.iter().map(|r| (r.depth, r.name.as_str())).collect()
    }

    #[test]
    fn test_two_level_traversal() {
        let mut fs = MemoryFileSystem::new(".");
        fs.add_dir("folder1").add_file("folder1/file11").add_file("file2");

        let rows = collect_rows(&fs, Path::new(".")).unwrap();

        assert_eq!(
            pairs(&rows),
            vec![(0, "."), (1, "folder1"), (2, "file11"), (1, "file2")]
        );
        assert!(rows[0].is_dir && rows[1].is_dir);
        assert!(!rows[2].is_dir && !rows[3].is_dir);
    }

    #[test]
    fn test_visitor_event_order() {
        #[derive(Default)]
        struct Log(Vec<String>);

        impl TreeVisitor for Log {
            fn begin_tree(&mut self, node: &Node) {
                self.0.push(format!("begin {}", node.name()));
            }
            fn leaf(&mut self, node: &Node) {
                self.0.push(format!("leaf {}", node.name()));
            }
            fn end_tree(&mut self, node: &Node) {
                self.0.push(format!("end {}", node.name()));
            }
        }

        let mut fs = MemoryFileSystem::new("/r");
        fs.add_file("a/x").add_dir("b").add_file("c");

        let mut log = Log::default();
        Node::classify(&fs, "/r").populate(&fs, &mut log).unwrap();

        assert_eq!(
            log.0,
            vec![
                "begin r", "begin a", "leaf x", "end a", "begin b", "end b", "leaf c", "end r"
            ]
        );
    }

    #[test]
    fn test_file_root_is_single_row() {
        let mut fs = MemoryFileSystem::new(".");
        fs.add_file("notes.txt");

        let rows = collect_rows(&fs, Path::new("./notes.txt")).unwrap();
        assert_eq!(pairs(&rows), vec![(0, "notes.txt")]);
    }

    #[test]
    fn test_listing_error_propagates() {
        struct Broken;

        impl FileSystemProvider for Broken {
            fn is_directory(&self, _path: &Path) -> bool {
                true
            }
            fn list_children(&self, path: &Path) -> Result<Vec<String>, TreeError> {
                Err(TreeError::List {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                })
            }
        }

        let err = collect_rows(&Broken, Path::new("/locked")).unwrap_err();
        assert!(err.to_string().contains("/locked"));
    }

    #[test]
    fn test_node_names() {
        assert_eq!(Node::Directory(PathBuf::from(".")).name(), ".");
        assert_eq!(Node::Directory(PathBuf::from("/")).name(), "/");
        assert_eq!(Node::File(PathBuf::from("./src/lib.rs")).name(), "lib.rs");
    }
}
