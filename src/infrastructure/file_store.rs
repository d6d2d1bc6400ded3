//! File-backed site-tree store
//!
//! Persists each root subtree as one TOML document `<root-id>.tree.toml`
//! under the store directory. Saving rewrites the whole file; there are no
//! partial or delta updates.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::NodeDoc;
use crate::infrastructure::traits::{SiteTreeStore, StoreError, StoreResult};

const DOC_SUFFIX: &str = ".tree.toml";

/// Store keeping one TOML document per root subtree in a directory.
#[derive(Debug)]
pub struct FileTreeStore {
    store_dir: PathBuf,
}

impl FileTreeStore {
    /// Create a store over the given directory, creating it if needed.
    pub fn new(store_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let store_dir = store_dir.into();
        std::fs::create_dir_all(&store_dir).map_err(|e| {
            StoreError::io(format!("create store dir {}", store_dir.display()), e)
        })?;
        Ok(Self { store_dir })
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    fn doc_path(&self, root_id: &str) -> PathBuf {
        self.store_dir.join(format!("{root_id}{DOC_SUFFIX}"))
    }

    /// Ids become file names; anything that could resolve outside the
    /// store directory is rejected before touching the filesystem.
    fn check_id(root_id: &str) -> StoreResult<()> {
        if root_id.is_empty()
            || root_id == "."
            || root_id == ".."
            || root_id.contains(['/', '\\'])
        {
            return Err(StoreError::UnsafeId {
                root_id: root_id.to_string(),
            });
        }
        Ok(())
    }

    fn read_doc(&self, path: &Path) -> StoreResult<NodeDoc> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::io(format!("read {}", path.display()), e))?;
        toml::from_str(&content).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl SiteTreeStore for FileTreeStore {
    /// Scan the store directory and load every root document.
    ///
    /// Files are visited in name order so the forest has a stable root
    /// sequence across loads.
    #[instrument(level = "debug", skip(self))]
    fn load_forest(&self) -> StoreResult<Vec<NodeDoc>> {
        let mut docs = Vec::new();
        let walker = WalkDir::new(&self.store_dir)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| StoreError::Io {
                context: format!("scan store dir {}", self.store_dir.display()),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(DOC_SUFFIX) {
                continue;
            }
            docs.push(self.read_doc(entry.path())?);
        }
        debug!("loaded {} root documents", docs.len());
        Ok(docs)
    }

    #[instrument(level = "debug", skip(self, root), fields(root_id = %root.id))]
    fn save_root(&self, root: &NodeDoc) -> StoreResult<()> {
        Self::check_id(&root.id)?;
        let content = toml::to_string_pretty(root).map_err(|e| StoreError::Serialize {
            root_id: root.id.clone(),
            message: e.to_string(),
        })?;
        let path = self.doc_path(&root.id);
        std::fs::write(&path, content)
            .map_err(|e| StoreError::io(format!("write {}", path.display()), e))
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_root(&self, root_id: &str) -> StoreResult<()> {
        Self::check_id(root_id)?;
        let path = self.doc_path(root_id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Deleting an absent root is a no-op
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(format!("remove {}", path.display()), e)),
        }
    }
}
