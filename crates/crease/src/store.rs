//! Named design persistence keyed by design id.
//!
//! Saving a design that has no id (or the placeholder id `"default"`)
//! assigns a fresh `design-xxxxxxx` id and writes it back into the spec.
//! Saving under an existing id replaces that design in place.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{CreaseError, FoldSpec, Result};

/// Id a fresh, never-saved design may carry.
pub const PLACEHOLDER_ID: &str = "default";

/// Listing entry for a stored design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSummary {
    /// Design id.
    pub id: String,
    /// Design name.
    pub name: String,
    /// Sheet width (mm).
    pub width: f64,
    /// Sheet length (mm).
    pub length: f64,
    /// Number of fold lines.
    pub fold_count: usize,
}

impl DesignSummary {
    fn of(id: &str, spec: &FoldSpec) -> Self {
        Self {
            id: id.to_string(),
            name: spec.name.clone(),
            width: spec.width(),
            length: spec.length(),
            fold_count: spec.fold_lines().len(),
        }
    }
}

/// A key-value store of fold specs.
pub trait DesignStore {
    /// Save `spec`, assigning an id first if it has none. Returns the id.
    fn save(&mut self, spec: &mut FoldSpec) -> Result<String>;

    /// Load the design with this id.
    fn load(&self, id: &str) -> Result<FoldSpec>;

    /// Summaries of every stored design.
    fn list(&self) -> Result<Vec<DesignSummary>>;

    /// Remove a design. Returns `false` if it was not stored.
    fn delete(&mut self, id: &str) -> Result<bool>;
}

/// Give `spec` a persistent id if it lacks one, and return it.
pub fn assign_design_id(spec: &mut FoldSpec) -> String {
    match spec.id.as_deref() {
        Some(id) if id != PLACEHOLDER_ID => id.to_string(),
        _ => {
            let raw = Uuid::new_v4().simple().to_string();
            let id = format!("design-{}", &raw[..7]);
            spec.id = Some(id.clone());
            id
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Designs held in memory, in first-save order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    designs: Vec<FoldSpec>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.designs
            .iter()
            .position(|d| d.id.as_deref() == Some(id))
    }
}

impl DesignStore for MemoryStore {
    fn save(&mut self, spec: &mut FoldSpec) -> Result<String> {
        let id = assign_design_id(spec);
        match self.position(&id) {
            Some(i) => self.designs[i] = spec.clone(),
            None => self.designs.push(spec.clone()),
        }
        info!(%id, name = %spec.name, "saved design");
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<FoldSpec> {
        self.position(id)
            .map(|i| self.designs[i].clone())
            .ok_or_else(|| CreaseError::UnknownDesign(id.to_string()))
    }

    fn list(&self) -> Result<Vec<DesignSummary>> {
        Ok(self
            .designs
            .iter()
            .filter_map(|d| d.id.as_deref().map(|id| DesignSummary::of(id, d)))
            .collect())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.designs.len();
        self.designs.retain(|d| d.id.as_deref() != Some(id));
        Ok(self.designs.len() != before)
    }
}

// =============================================================================
// Directory store
// =============================================================================

/// One `<id>.json` snapshot per design in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        // ids become file names; keep them inside the root
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(self.root.join(format!("{id}.json")))
        } else {
            Err(CreaseError::InvalidDesignId(id.to_string()))
        }
    }
}

impl DesignStore for DirStore {
    fn save(&mut self, spec: &mut FoldSpec) -> Result<String> {
        let id = assign_design_id(spec);
        let path = self.path_for(&id)?;
        fs::write(&path, spec.to_json()?)?;
        info!(%id, path = %path.display(), "saved design");
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<FoldSpec> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(CreaseError::UnknownDesign(id.to_string()));
        }
        let mut spec = FoldSpec::from_json(&fs::read_to_string(&path)?)?;
        // the file name is authoritative
        spec.id = Some(id.to_string());
        Ok(spec)
    }

    fn list(&self) -> Result<Vec<DesignSummary>> {
        let mut ids: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .collect();
        ids.sort();

        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load(&id) {
                Ok(spec) => summaries.push(DesignSummary::of(&id, &spec)),
                Err(e) => debug!(%id, error = %e, "skipping unreadable design"),
            }
        }
        Ok(summaries)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!(%id, "deleted design");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket() -> FoldSpec {
        let mut spec = FoldSpec::default();
        spec.name = "Bracket".into();
        spec.add_fold_line().unwrap();
        spec
    }

    fn exercise(store: &mut dyn DesignStore) {
        let mut spec = bracket();
        let id = store.save(&mut spec).unwrap();
        assert!(id.starts_with("design-"));
        assert_eq!(id.len(), "design-".len() + 7);
        assert_eq!(spec.id.as_deref(), Some(id.as_str()));

        // resave keeps the id and replaces the entry
        spec.name = "Bracket v2".into();
        assert_eq!(store.save(&mut spec).unwrap(), id);
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Bracket v2");
        assert_eq!(listed[0].fold_count, 1);

        assert_eq!(store.load(&id).unwrap(), spec);
        assert!(matches!(
            store.load("design-missing"),
            Err(CreaseError::UnknownDesign(_))
        ));

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_dir_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(dir.path().join("designs")).unwrap();
        exercise(&mut store);
    }

    #[test]
    fn test_placeholder_id_is_replaced() {
        let mut spec = bracket();
        spec.id = Some(PLACEHOLDER_ID.into());
        let id = assign_design_id(&mut spec);
        assert_ne!(id, PLACEHOLDER_ID);

        spec.id = Some("design-keep".into());
        assert_eq!(assign_design_id(&mut spec), "design-keep");
    }

    #[test]
    fn test_dir_store_rejects_path_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load("../etc/passwd"),
            Err(CreaseError::InvalidDesignId(_))
        ));

        let mut spec = bracket();
        spec.id = Some("my design".into());
        assert!(matches!(
            store.save(&mut spec),
            Err(CreaseError::InvalidDesignId(id)) if id == "my design"
        ));
        assert!(matches!(
            store.delete("a/b"),
            Err(CreaseError::InvalidDesignId(_))
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_keeps_save_order() {
        let mut store = MemoryStore::new();
        let mut a = bracket();
        let mut b = FoldSpec::default();
        let id_a = store.save(&mut a).unwrap();
        let id_b = store.save(&mut b).unwrap();
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![id_a, id_b]);
    }
}
