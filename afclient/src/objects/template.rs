//! Element template proxy.
//!
//! Templates expose their categories, an extendibility flag and their
//! attribute templates; the attribute-template collection writes Add/Remove
//! edits through as create/delete calls.

use std::sync::Arc;

use tracing::debug;

use crate::connection::Connection;
use crate::error::{AfError, AfResult, ChangeKind};
use crate::lazy::LazyField;
use crate::loaders::ObjectSeed;
use crate::objects::base::ObjectCore;
use crate::tracked::{CollectionChange, TrackedCollection};

/// A template's attribute blueprint. Carries identity only; created and
/// deleted through the owning template's `attribute_templates()` collection.
#[derive(Clone)]
pub struct AfAttributeTemplate {
    core: ObjectCore,
}

impl AfAttributeTemplate {
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: ObjectSeed) -> Self {
        AfAttributeTemplate {
            core: ObjectCore::from_seed(connection, seed),
        }
    }

    /// Stages an attribute template that does not exist remotely yet.
    pub fn draft(
        connection: &Arc<Connection>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AfAttributeTemplate {
            core: ObjectCore::draft(Arc::clone(connection), name, description),
        }
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

    pub fn description(&self) -> String {
        self.core.description()
    }

    pub(crate) fn core(&self) -> &ObjectCore {
        &self.core
    }
}

impl PartialEq for AfAttributeTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl std::fmt::Debug for AfAttributeTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfAttributeTemplate")
            .field("id", &self.core.id())
            .finish()
    }
}

#[derive(Clone)]
pub struct AfElementTemplate {
    core: ObjectCore,
    categories: Arc<LazyField<Vec<String>>>,
    is_extendible: Arc<LazyField<bool>>,
    attribute_templates: Arc<LazyField<Arc<TrackedCollection<AfAttributeTemplate>>>>,
}

impl AfElementTemplate {
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: ObjectSeed) -> Self {
        let core = ObjectCore::from_seed(connection, seed);

        let categories = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                core.connection().templates().categories(core.id())
            }))
        };

        let is_extendible = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                core.connection().templates().is_extendible(core.id())
            }))
        };

        let attribute_templates = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let seeds = core
                    .connection()
                    .templates()
                    .attribute_templates(core.id())?;
                let items = seeds
                    .into_iter()
                    .map(|seed| {
                        AfAttributeTemplate::from_seed(Arc::clone(core.connection()), seed)
                    })
                    .collect();
                let owner = core.clone();
                Ok(Arc::new(TrackedCollection::new(items, move |change| {
                    sync_attribute_templates(&owner, change)
                })))
            }))
        };

        AfElementTemplate {
            core,
            categories,
            is_extendible,
            attribute_templates,
        }
    }

    pub fn find(connection: &Arc<Connection>, id: &str) -> AfResult<Self> {
        let seed = connection.templates().find(id)?;
        Ok(AfElementTemplate::from_seed(Arc::clone(connection), seed))
    }

    pub fn find_by_path(connection: &Arc<Connection>, path: &str) -> AfResult<Self> {
        let seed = connection.templates().find_by_path(path)?;
        Ok(AfElementTemplate::from_seed(Arc::clone(connection), seed))
    }

    pub fn delete(connection: &Arc<Connection>, id: &str) -> AfResult<bool> {
        connection.templates().delete(id)
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

    pub fn categories(&self) -> AfResult<Vec<String>> {
        self.categories.value()
    }

    /// Whether elements built from this template may extend it.
    pub fn is_extendible(&self) -> AfResult<bool> {
        self.is_extendible.value()
    }

    /// Attribute templates; local Add/Remove edits create/delete remotely.
    pub fn attribute_templates(
        &self,
    ) -> AfResult<Arc<TrackedCollection<AfAttributeTemplate>>> {
        self.attribute_templates.value()
    }

    /// Pushes the template's scalar fields to the remote store.
    pub fn check_in(&self) -> AfResult<bool> {
        self.core
            .connection()
            .templates()
            .update(&self.core.patch())
    }
}

fn sync_attribute_templates(
    owner: &ObjectCore,
    change: CollectionChange<'_, AfAttributeTemplate>,
) -> AfResult<()> {
    match change {
        CollectionChange::Added(template) => {
            debug!(
                "creating attribute template '{}' on {}",
                template.name(),
                owner.id()
            );
            let created = owner
                .connection()
                .templates()
                .create_attribute_template(owner.id(), &template.core().to_new())?;
            if !created {
                return Err(AfError::Rejected {
                    operation: "create attribute template",
                    target: template.name(),
                });
            }
            Ok(())
        }
        CollectionChange::Removed(template) => {
            debug!("deleting attribute template {}", template.id());
            let deleted = owner
                .connection()
                .templates()
                .delete_attribute_template(template.id())?;
            if !deleted {
                return Err(AfError::Rejected {
                    operation: "delete attribute template",
                    target: template.id().to_string(),
                });
            }
            Ok(())
        }
        CollectionChange::Replaced => Err(AfError::Unsupported(ChangeKind::Replace)),
        CollectionChange::Reset => Err(AfError::Unsupported(ChangeKind::Reset)),
        CollectionChange::Moved => Err(AfError::Unsupported(ChangeKind::Move)),
    }
}

impl PartialEq for AfElementTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl std::fmt::Debug for AfElementTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfElementTemplate")
            .field("id", &self.core.id())
            .field("path", &self.core.path())
            .finish()
    }
}
