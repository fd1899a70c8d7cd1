//! In-memory object store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Avu, ObjectStore};
use crate::error::{Result, TabmetaError};

/// Object store held entirely in memory.
///
/// Paths map to their attribute lists; a `BTreeMap` keeps search results
/// in path order, which satisfies the "stable for a given store state"
/// ordering contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, Vec<Avu>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with objects and their attributes.
    pub fn from_objects(objects: BTreeMap<String, Vec<Avu>>) -> Self {
        Self {
            objects: RwLock::new(objects),
        }
    }

    /// Register a data object with no attributes. Replaces nothing if the
    /// object already exists.
    pub async fn insert_object(&self, path: impl Into<String>) {
        self.objects.write().await.entry(path.into()).or_default();
    }

    /// The attributes currently attached to an object.
    pub async fn attributes_of(&self, path: &str) -> Option<Vec<Avu>> {
        self.objects.read().await.get(path).cloned()
    }

    /// Number of registered objects.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Copy out the full store contents (used by the snapshot store).
    pub async fn dump(&self) -> BTreeMap<String, Vec<Avu>> {
        self.objects.read().await.clone()
    }
}

fn object_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.objects.read().await.contains_key(path))
    }

    async fn search(
        &self,
        workdir: &str,
        identifier: &str,
        exact_match: bool,
    ) -> Result<Vec<String>> {
        let prefix = format!("{}/", workdir.trim_end_matches('/'));
        let objects = self.objects.read().await;

        Ok(objects
            .keys()
            .filter(|path| path.starts_with(&prefix))
            .filter(|path| {
                let name = object_name(path);
                if exact_match {
                    name == identifier
                } else {
                    name.starts_with(identifier)
                }
            })
            .cloned()
            .collect())
    }

    async fn add_metadata(&self, path: &str, attributes: &[(String, String)]) -> Result<()> {
        // Validate the whole set before touching the object, so a rejected
        // call leaves the object unchanged.
        for (name, _) in attributes {
            if name.is_empty() {
                return Err(TabmetaError::store(format!(
                    "{}: attribute with an empty name rejected",
                    path
                )));
            }
        }

        let mut objects = self.objects.write().await;
        let avus = objects
            .get_mut(path)
            .ok_or_else(|| TabmetaError::store(format!("data object not found: {}", path)))?;

        for (name, value) in attributes {
            let avu = Avu::new(name.clone(), value.clone());
            if !avus.contains(&avu) {
                avus.push(avu);
            }
        }

        Ok(())
    }
}
