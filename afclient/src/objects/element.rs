//! Asset element proxy.
//!
//! Relationships resolve on first access and cache for the proxy's
//! lifetime: categories, template, parent (derived from the path), child
//! elements and attributes. The two collections write local Add/Remove
//! edits through to the backend as create/delete calls.

use std::sync::Arc;

use tracing::debug;

use crate::connection::Connection;
use crate::error::{AfError, AfResult, ChangeKind};
use crate::lazy::LazyField;
use crate::loaders::{AttributeQuery, ElementQuery, ObjectSeed};
use crate::objects::attribute::AfAttribute;
use crate::objects::base::ObjectCore;
use crate::objects::template::AfElementTemplate;
use crate::tracked::{CollectionChange, TrackedCollection};

#[derive(Clone)]
pub struct AfElement {
    core: ObjectCore,
    categories: Arc<LazyField<Vec<String>>>,
    template: Arc<LazyField<Option<AfElementTemplate>>>,
    parent: Arc<LazyField<AfElement>>,
    children: Arc<LazyField<Arc<TrackedCollection<AfElement>>>>,
    attributes: Arc<LazyField<Arc<TrackedCollection<AfAttribute>>>>,
}

impl AfElement {
    /// Builds the proxy and binds every resolver to the connection and this
    /// element's identity.
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: ObjectSeed) -> Self {
        let core = ObjectCore::from_seed(connection, seed);

        let categories = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                core.connection().elements().categories(core.id())
            }))
        };

        let template = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                match core.connection().elements().template_name(core.id())? {
                    Some(name) => {
                        let template = AfElementTemplate::find(core.connection(), &name)?;
                        Ok(Some(template))
                    }
                    None => Ok(None),
                }
            }))
        };

        let parent = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let parent_path = core.parent_path()?;
                AfElement::find_by_path(core.connection(), &parent_path)
            }))
        };

        let children = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let seeds = core
                    .connection()
                    .elements()
                    .children(core.id(), &ElementQuery::default())?;
                let items = seeds
                    .into_iter()
                    .map(|seed| AfElement::from_seed(Arc::clone(core.connection()), seed))
                    .collect();
                let owner = core.clone();
                Ok(Arc::new(TrackedCollection::new(items, move |change| {
                    sync_children(&owner, change)
                })))
            }))
        };

        let attributes = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let seeds = core
                    .connection()
                    .elements()
                    .attributes(core.id(), &AttributeQuery::default())?;
                let items = seeds
                    .into_iter()
                    .map(|seed| AfAttribute::from_seed(Arc::clone(core.connection()), seed))
                    .collect();
                let owner = core.clone();
                Ok(Arc::new(TrackedCollection::new(items, move |change| {
                    sync_attributes(&owner, change)
                })))
            }))
        };

        AfElement {
            core,
            categories,
            template,
            parent,
            children,
            attributes,
        }
    }

    /// Stages a child element that does not exist remotely yet; add it to a
    /// parent's `children()` collection to create it.
    pub fn draft(
        connection: &Arc<Connection>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AfElement::from_seed(
            Arc::clone(connection),
            ObjectSeed {
                id: String::new(),
                name: name.into(),
                description: description.into(),
                path: String::new(),
            },
        )
    }

    pub fn find(connection: &Arc<Connection>, id: &str) -> AfResult<Self> {
        let seed = connection.elements().find(id)?;
        Ok(AfElement::from_seed(Arc::clone(connection), seed))
    }

    pub fn find_by_path(connection: &Arc<Connection>, path: &str) -> AfResult<Self> {
        let seed = connection.elements().find_by_path(path)?;
        Ok(AfElement::from_seed(Arc::clone(connection), seed))
    }

    pub fn delete(connection: &Arc<Connection>, id: &str) -> AfResult<bool> {
        connection.elements().delete(id)
    }

    /// Child elements of `root_id` carrying the given category.
    pub fn find_by_category(
        connection: &Arc<Connection>,
        root_id: &str,
        category: &str,
        max_count: usize,
    ) -> AfResult<Vec<Self>> {
        let query = ElementQuery::default()
            .with_category(category)
            .with_max_count(max_count);
        let seeds = connection.elements().children(root_id, &query)?;
        Ok(seeds
            .into_iter()
            .map(|seed| AfElement::from_seed(Arc::clone(connection), seed))
            .collect())
    }

    /// Child elements of `root_id` built from the given template.
    pub fn find_by_template(
        connection: &Arc<Connection>,
        root_id: &str,
        template: &str,
        max_count: usize,
    ) -> AfResult<Vec<Self>> {
        let query = ElementQuery::default()
            .with_template(template)
            .with_max_count(max_count);
        let seeds = connection.elements().children(root_id, &query)?;
        Ok(seeds
            .into_iter()
            .map(|seed| AfElement::from_seed(Arc::clone(connection), seed))
            .collect())
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

    /// Category names, loaded on first access.
    pub fn categories(&self) -> AfResult<Vec<String>> {
        self.categories.value()
    }

    /// The element's template, or `None` when it has none.
    pub fn template(&self) -> AfResult<Option<AfElementTemplate>> {
        self.template.value()
    }

    /// The parent element, looked up by truncating this element's path at
    /// the last separator. Fails with [`AfError::NoParent`] on roots.
    pub fn parent(&self) -> AfResult<AfElement> {
        self.parent.value()
    }

    /// Child elements; local Add/Remove edits create/delete remotely.
    pub fn children(&self) -> AfResult<Arc<TrackedCollection<AfElement>>> {
        self.children.value()
    }

    /// Attributes; local Add/Remove edits create/delete remotely.
    pub fn attributes(&self) -> AfResult<Arc<TrackedCollection<AfAttribute>>> {
        self.attributes.value()
    }

    /// Pushes this element's scalar fields (not its relationships) to the
    /// remote store.
    pub fn check_in(&self) -> AfResult<bool> {
        self.core.connection().elements().update(&self.core.patch())
    }

    pub(crate) fn core(&self) -> &ObjectCore {
        &self.core
    }
}

fn sync_children(owner: &ObjectCore, change: CollectionChange<'_, AfElement>) -> AfResult<()> {
    match change {
        CollectionChange::Added(child) => {
            debug!("creating child element '{}' under {}", child.name(), owner.id());
            let created = owner
                .connection()
                .elements()
                .create_child(owner.id(), &child.core().to_new())?;
            if !created {
                return Err(AfError::Rejected {
                    operation: "create child element",
                    target: child.name(),
                });
            }
            Ok(())
        }
        CollectionChange::Removed(child) => {
            debug!("deleting child element {}", child.id());
            let deleted = owner.connection().elements().delete(child.id())?;
            if !deleted {
                return Err(AfError::Rejected {
                    operation: "delete element",
                    target: child.id().to_string(),
                });
            }
            Ok(())
        }
        CollectionChange::Replaced => Err(AfError::Unsupported(ChangeKind::Replace)),
        CollectionChange::Reset => Err(AfError::Unsupported(ChangeKind::Reset)),
        CollectionChange::Moved => Err(AfError::Unsupported(ChangeKind::Move)),
    }
}

fn sync_attributes(owner: &ObjectCore, change: CollectionChange<'_, AfAttribute>) -> AfResult<()> {
    match change {
        CollectionChange::Added(attribute) => {
            debug!("creating attribute '{}' on {}", attribute.name(), owner.id());
            let created = owner
                .connection()
                .attributes()
                .create(owner.id(), &attribute.core().to_new())?;
            if !created {
                return Err(AfError::Rejected {
                    operation: "create attribute",
                    target: attribute.name(),
                });
            }
            Ok(())
        }
        CollectionChange::Removed(attribute) => {
            debug!("deleting attribute {}", attribute.id());
            let deleted = owner.connection().attributes().delete(attribute.id())?;
            if !deleted {
                return Err(AfError::Rejected {
                    operation: "delete attribute",
                    target: attribute.id().to_string(),
                });
            }
            Ok(())
        }
        CollectionChange::Replaced => Err(AfError::Unsupported(ChangeKind::Replace)),
        CollectionChange::Reset => Err(AfError::Unsupported(ChangeKind::Reset)),
        CollectionChange::Moved => Err(AfError::Unsupported(ChangeKind::Move)),
    }
}

impl PartialEq for AfElement {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl std::fmt::Debug for AfElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfElement")
            .field("id", &self.core.id())
            .field("path", &self.core.path())
            .finish()
    }
}
