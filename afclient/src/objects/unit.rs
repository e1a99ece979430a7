//! Unit-of-measure proxy.
//!
//! Units carry their conversion scalars eagerly; they have no lazy
//! relationships.

use std::sync::Arc;

use crate::connection::Connection;
use crate::error::AfResult;
use crate::loaders::UnitSeed;
use crate::objects::base::ObjectCore;

#[derive(Clone)]
pub struct AfUnit {
    core: ObjectCore,
    abbreviation: String,
    factor: f64,
    offset: f64,
    reference_factor: f64,
    reference_offset: f64,
    reference_unit_abbreviation: String,
}

impl AfUnit {
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: UnitSeed) -> Self {
        AfUnit {
            core: ObjectCore::from_seed(connection, seed.object),
            abbreviation: seed.abbreviation,
            factor: seed.factor,
            offset: seed.offset,
            reference_factor: seed.reference_factor,
            reference_offset: seed.reference_offset,
            reference_unit_abbreviation: seed.reference_unit_abbreviation,
        }
    }

    pub fn find(connection: &Arc<Connection>, id: &str) -> AfResult<Self> {
        let seed = connection.units().find(id)?;
        Ok(AfUnit::from_seed(Arc::clone(connection), seed))
    }

    pub fn find_by_path(connection: &Arc<Connection>, path: &str) -> AfResult<Self> {
        let seed = connection.units().find_by_path(path)?;
        Ok(AfUnit::from_seed(Arc::clone(connection), seed))
    }

    pub fn delete(connection: &Arc<Connection>, id: &str) -> AfResult<bool> {
        connection.units().delete(id)
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

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn reference_factor(&self) -> f64 {
        self.reference_factor
    }

    pub fn reference_offset(&self) -> f64 {
        self.reference_offset
    }

    pub fn reference_unit_abbreviation(&self) -> &str {
        &self.reference_unit_abbreviation
    }

    /// Pushes the unit's scalar fields to the remote store.
    pub fn check_in(&self) -> AfResult<bool> {
        self.core.connection().units().update(&self.core.patch())
    }
}

impl PartialEq for AfUnit {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl std::fmt::Debug for AfUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfUnit")
            .field("id", &self.core.id())
            .field("abbreviation", &self.abbreviation)
            .finish()
    }
}
