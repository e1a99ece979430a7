//! Attribute proxy.
//!
//! Attributes are created and deleted through their owner's `attributes()`
//! collection; this type carries identity and the scalar fields `check_in`
//! pushes.

use std::sync::Arc;

use crate::connection::Connection;
use crate::error::AfResult;
use crate::loaders::ObjectSeed;
use crate::objects::base::ObjectCore;

#[derive(Clone)]
pub struct AfAttribute {
    core: ObjectCore,
}

impl AfAttribute {
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: ObjectSeed) -> Self {
        AfAttribute {
            core: ObjectCore::from_seed(connection, seed),
        }
    }

    /// Stages an attribute that does not exist remotely yet; add it to an
    /// owner's `attributes()` collection to create it.
    pub fn draft(
        connection: &Arc<Connection>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AfAttribute {
            core: ObjectCore::draft(Arc::clone(connection), name, description),
        }
    }

    pub fn find(connection: &Arc<Connection>, id: &str) -> AfResult<Self> {
        let seed = connection.attributes().find(id)?;
        Ok(AfAttribute::from_seed(Arc::clone(connection), seed))
    }

    pub fn delete(connection: &Arc<Connection>, id: &str) -> AfResult<bool> {
        connection.attributes().delete(id)
    }

    pub fn id(&self) -> &str {
        self.core.id()
    }

    pub fn path(&self) -> &str {
        self.core.path()
    }

    pub fn name(&self) -> String {
        self.core.name()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.core.set_name(name);
    }

    pub fn description(&self) -> String {
        self.core.description()
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.core.set_description(description);
    }

    /// Pushes the attribute's scalar fields to the remote store.
    pub fn check_in(&self) -> AfResult<bool> {
        self.core
            .connection()
            .attributes()
            .update(&self.core.patch())
    }

    pub(crate) fn core(&self) -> &ObjectCore {
        &self.core
    }
}

impl PartialEq for AfAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl std::fmt::Debug for AfAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfAttribute")
            .field("id", &self.core.id())
            .field("path", &self.core.path())
            .finish()
    }
}
