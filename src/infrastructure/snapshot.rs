//! Sled-backed snapshot store for sealed project databases.
//!
//! A built graph can be persisted and reloaded without re-running the
//! pipeline; chain queries over a reloaded database produce byte-equal
//! output given the same source.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;

use crate::domain::database::ProjectDatabase;

pub struct SledSnapshotStore {
    _db: Db,
    projects_tree: sled::Tree,
}

impl SledSnapshotStore {
    pub fn open(path: &str) -> Result<Self> {
        let db = sled::open(path)
            .with_context(|| format!("Failed to open snapshot store: {}", path))?;
        let projects_tree = db.open_tree("projects")?;
        Ok(Self {
            _db: db,
            projects_tree,
        })
    }

    pub fn save<M, C>(&self, key: &str, database: &ProjectDatabase<M, C>) -> Result<()>
    where
        M: Serialize,
        C: Serialize,
    {
        let bytes =
            bincode::serialize(database).context("Failed to encode project snapshot")?;
        self.projects_tree.insert(key.as_bytes(), bytes)?;
        self.projects_tree.flush()?;
        Ok(())
    }

    pub fn load<M, C>(&self, key: &str) -> Result<Option<ProjectDatabase<M, C>>>
    where
        M: DeserializeOwned,
        C: DeserializeOwned,
    {
        match self.projects_tree.get(key.as_bytes())? {
            Some(bytes) => {
                let database = bincode::deserialize(&bytes)
                    .context("Failed to decode project snapshot")?;
                Ok(Some(database))
            }
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.projects_tree.contains_key(key.as_bytes())?)
    }
}
