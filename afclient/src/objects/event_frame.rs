//! Event frame proxy.
//!
//! Event frames carry a time window eagerly and resolve their template,
//! categories, child frames, attributes and referenced elements on demand.
//! Child frames and attributes write Add/Remove edits through to the
//! backend.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::connection::Connection;
use crate::error::{AfError, AfResult, ChangeKind};
use crate::lazy::LazyField;
use crate::loaders::{AttributeQuery, FrameQuery, FrameSeed};
use crate::objects::attribute::AfAttribute;
use crate::objects::base::ObjectCore;
use crate::objects::element::AfElement;
use crate::objects::template::AfElementTemplate;
use crate::tracked::{CollectionChange, TrackedCollection};

struct Window {
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AfEventFrame {
    core: ObjectCore,
    window: Arc<Mutex<Window>>,
    template: Arc<LazyField<Option<AfElementTemplate>>>,
    categories: Arc<LazyField<Vec<String>>>,
    child_frames: Arc<LazyField<Arc<TrackedCollection<AfEventFrame>>>>,
    attributes: Arc<LazyField<Arc<TrackedCollection<AfAttribute>>>>,
    referenced_elements: Arc<LazyField<Vec<AfElement>>>,
}

impl AfEventFrame {
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: FrameSeed) -> Self {
        let core = ObjectCore::from_seed(connection, seed.object);
        let window = Arc::new(Mutex::new(Window {
            start_time: seed.start_time,
            end_time: seed.end_time,
        }));

        let template = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                match core.connection().event_frames().template_name(core.id())? {
                    Some(name) => {
                        let template = AfElementTemplate::find(core.connection(), &name)?;
                        Ok(Some(template))
                    }
                    None => Ok(None),
                }
            }))
        };

        let categories = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                core.connection().event_frames().categories(core.id())
            }))
        };

        let child_frames = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let seeds = core
                    .connection()
                    .event_frames()
                    .child_frames(core.id(), &FrameQuery::default())?;
                let items = seeds
                    .into_iter()
                    .map(|seed| AfEventFrame::from_seed(Arc::clone(core.connection()), seed))
                    .collect();
                let owner = core.clone();
                Ok(Arc::new(TrackedCollection::new(items, move |change| {
                    sync_child_frames(&owner, change)
                })))
            }))
        };

        let attributes = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let seeds = core
                    .connection()
                    .event_frames()
                    .attributes(core.id(), &AttributeQuery::default())?;
                let items = seeds
                    .into_iter()
                    .map(|seed| AfAttribute::from_seed(Arc::clone(core.connection()), seed))
                    .collect();
                let owner = core.clone();
                Ok(Arc::new(TrackedCollection::new(items, move |change| {
                    sync_frame_attributes(&owner, change)
                })))
            }))
        };

        let referenced_elements = {
            let core = core.clone();
            Arc::new(LazyField::new(move || {
                let seeds = core
                    .connection()
                    .event_frames()
                    .referenced_elements(core.id())?;
                Ok(seeds
                    .into_iter()
                    .map(|seed| AfElement::from_seed(Arc::clone(core.connection()), seed))
                    .collect())
            }))
        };

        AfEventFrame {
            core,
            window,
            template,
            categories,
            child_frames,
            attributes,
            referenced_elements,
        }
    }

    /// Stages an event frame that does not exist remotely yet; add it to a
    /// parent frame's `child_frames()` collection to create it.
    pub fn draft(
        connection: &Arc<Connection>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AfEventFrame::from_seed(
            Arc::clone(connection),
            FrameSeed {
                object: crate::loaders::ObjectSeed {
                    id: String::new(),
                    name: name.into(),
                    description: description.into(),
                    path: String::new(),
                },
                start_time: None,
                end_time: None,
            },
        )
    }

    pub fn find(connection: &Arc<Connection>, id: &str) -> AfResult<Self> {
        let seed = connection.event_frames().find(id)?;
        Ok(AfEventFrame::from_seed(Arc::clone(connection), seed))
    }

    pub fn find_by_path(connection: &Arc<Connection>, path: &str) -> AfResult<Self> {
        let seed = connection.event_frames().find_by_path(path)?;
        Ok(AfEventFrame::from_seed(Arc::clone(connection), seed))
    }

    pub fn delete(connection: &Arc<Connection>, id: &str) -> AfResult<bool> {
        connection.event_frames().delete(id)
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

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.window.lock().unwrap().start_time
    }

    pub fn set_start_time(&self, start: DateTime<Utc>) {
        self.window.lock().unwrap().start_time = Some(start);
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.window.lock().unwrap().end_time
    }

    pub fn set_end_time(&self, end: DateTime<Utc>) {
        self.window.lock().unwrap().end_time = Some(end);
    }

    /// The frame's template, or `None` when it has none.
    pub fn template(&self) -> AfResult<Option<AfElementTemplate>> {
        self.template.value()
    }

    pub fn categories(&self) -> AfResult<Vec<String>> {
        self.categories.value()
    }

    /// Child frames; local Add/Remove edits create/delete remotely.
    pub fn child_frames(&self) -> AfResult<Arc<TrackedCollection<AfEventFrame>>> {
        self.child_frames.value()
    }

    /// Attributes; local Add/Remove edits create/delete remotely.
    pub fn attributes(&self) -> AfResult<Arc<TrackedCollection<AfAttribute>>> {
        self.attributes.value()
    }

    /// Elements this frame references. Read-only snapshot.
    pub fn referenced_elements(&self) -> AfResult<Vec<AfElement>> {
        self.referenced_elements.value()
    }

    /// Snapshots the frame's attribute values on the server.
    pub fn capture_values(&self) -> AfResult<bool> {
        self.core.connection().event_frames().capture_values(self.core.id())
    }

    /// Pushes the frame's scalar fields to the remote store.
    pub fn check_in(&self) -> AfResult<bool> {
        self.core
            .connection()
            .event_frames()
            .update(&self.core.patch())
    }

    pub(crate) fn core(&self) -> &ObjectCore {
        &self.core
    }
}

fn sync_child_frames(owner: &ObjectCore, change: CollectionChange<'_, AfEventFrame>) -> AfResult<()> {
    match change {
        CollectionChange::Added(frame) => {
            debug!("creating child frame '{}' under {}", frame.name(), owner.id());
            let created = owner
                .connection()
                .event_frames()
                .create_child(owner.id(), &frame.core().to_new())?;
            if !created {
                return Err(AfError::Rejected {
                    operation: "create child event frame",
                    target: frame.name(),
                });
            }
            Ok(())
        }
        CollectionChange::Removed(frame) => {
            debug!("deleting child frame {}", frame.id());
            let deleted = owner.connection().event_frames().delete(frame.id())?;
            if !deleted {
                return Err(AfError::Rejected {
                    operation: "delete event frame",
                    target: frame.id().to_string(),
                });
            }
            Ok(())
        }
        CollectionChange::Replaced => Err(AfError::Unsupported(ChangeKind::Replace)),
        CollectionChange::Reset => Err(AfError::Unsupported(ChangeKind::Reset)),
        CollectionChange::Moved => Err(AfError::Unsupported(ChangeKind::Move)),
    }
}

fn sync_frame_attributes(
    owner: &ObjectCore,
    change: CollectionChange<'_, AfAttribute>,
) -> AfResult<()> {
    match change {
        CollectionChange::Added(attribute) => {
            debug!("creating attribute '{}' on frame {}", attribute.name(), owner.id());
            let created = owner
                .connection()
                .event_frames()
                .create_attribute(owner.id(), &attribute.core().to_new())?;
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

impl PartialEq for AfEventFrame {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl std::fmt::Debug for AfEventFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfEventFrame")
            .field("id", &self.core.id())
            .field("path", &self.core.path())
            .finish()
    }
}
