//! Node registry - JSON document of node profiles.
//!
//! Every mutation is a read-modify-write of the whole document. The new
//! document is written to a uniquely named temp file in the same directory
//! and renamed over the old one, so readers only ever see a complete set.
//!
//! Writers are not serialised: two writers mutating the same file at the
//! same time can lose one of the updates. Use external locking if that
//! matters.

use crate::error::ReplicaError;
use crate::node::{NodeDraft, NodeProfile};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File-backed node registry
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    path: PathBuf,
}

impl NodeRegistry {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty document if missing
    fn ensure_file(&self) -> Result<(), ReplicaError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.path.exists() {
            debug!("Creating empty node registry at {}", self.path.display());
            self.save(&[])?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<NodeProfile>, ReplicaError> {
        self.ensure_file()?;
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, nodes: &[NodeProfile]) -> Result<(), ReplicaError> {
        let json = serde_json::to_string_pretty(nodes)?;

        // Write to a private temp file then rename (atomic)
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// All nodes in storage order
    pub fn list(&self) -> Result<Vec<NodeProfile>, ReplicaError> {
        self.load()
    }

    pub fn get(&self, id: &str) -> Result<Option<NodeProfile>, ReplicaError> {
        Ok(self.load()?.into_iter().find(|n| n.id == id))
    }

    /// Like [`get`](Self::get) but absent ids are an error
    pub fn require(&self, id: &str) -> Result<NodeProfile, ReplicaError> {
        self.get(id)?
            .ok_or_else(|| ReplicaError::NodeNotFound(id.to_string()))
    }

    /// Insert a new node with a freshly generated id
    pub fn add(&self, draft: NodeDraft) -> Result<NodeProfile, ReplicaError> {
        let node = draft.into_profile(uuid::Uuid::new_v4().to_string())?;
        let mut nodes = self.load()?;
        nodes.push(node.clone());
        self.save(&nodes)?;

        info!("Added node {} ({}) at {}", node.id, node.name, node.endpoint());
        Ok(node)
    }

    /// Replace the stored node that has `node.id`. No merge with the old
    /// values happens; the replacement is normalised like an insert.
    pub fn update(&self, node: NodeProfile) -> Result<(), ReplicaError> {
        let node = node.normalized()?;

        let mut nodes = self.load()?;
        let slot = nodes
            .iter_mut()
            .find(|n| n.id == node.id)
            .ok_or_else(|| ReplicaError::NodeNotFound(node.id.clone()))?;

        info!("Updated node {} ({})", node.id, node.name);
        *slot = node;
        self.save(&nodes)
    }

    /// Remove a node. Returns whether anything was removed; absent ids are
    /// not an error.
    pub fn delete(&self, id: &str) -> Result<bool, ReplicaError> {
        let mut nodes = self.load()?;
        let before = nodes.len();
        nodes.retain(|n| n.id != id);

        if nodes.len() == before {
            debug!("Delete of unknown node {} ignored", id);
            return Ok(false);
        }

        self.save(&nodes)?;
        info!("Deleted node {}", id);
        Ok(true)
    }
}
