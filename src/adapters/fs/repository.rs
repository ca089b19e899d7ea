use crate::domain::error::DocumentError;
use crate::domain::ports::StackSource;
use crate::domain::stack::Stack;
use std::path::{Path, PathBuf};

/// Directory of stack snapshots: one subdirectory per stack, each holding
/// `resources.json`, `template.json` and `description.json`.
pub struct FsStackRepository {
    pub root: PathBuf,
}

impl FsStackRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl StackSource for FsStackRepository {
    /// Stacks sorted by name. Hidden entries (leading dot) are skipped.
    fn stacks(&self) -> Result<Vec<Stack>, DocumentError> {
        let root_error = |source| DocumentError::RootNotFound {
            path: self.root.clone(),
            source,
        };

        let mut stacks = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(root_error)? {
            let entry = entry.map_err(root_error)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            stacks.push(Stack::new(name, entry.path()));
        }
        stacks.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(stacks)
    }
}
