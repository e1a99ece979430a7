//! Shared identity for every proxy object.
//!
//! An `ObjectCore` carries the stable identity (`id`, `path`), the mutable
//! name/description scalars, and the owning connection. Cores are cheap to
//! clone and clones share state, so a cloned proxy is the same logical
//! object; two independently fetched proxies for the same remote ID are not.

use std::sync::{Arc, Mutex};

use crate::connection::Connection;
use crate::error::{AfError, AfResult};
use crate::loaders::{NewObject, ObjectPatch, ObjectSeed};

/// Hierarchy delimiter used in object paths.
pub const PATH_SEPARATOR: char = '\\';

/// Returns the parent path of `path`, the prefix up to the last separator.
/// A path with no separator (or nothing before it) is a root and has no
/// parent.
pub(crate) fn parent_path(path: &str) -> AfResult<&str> {
    match path.rfind(PATH_SEPARATOR) {
        Some(index) if index > 0 => Ok(&path[..index]),
        _ => Err(AfError::NoParent(path.to_string())),
    }
}

struct Scalars {
    name: String,
    description: String,
}

struct CoreInner {
    connection: Arc<Connection>,
    id: String,
    path: String,
    scalars: Mutex<Scalars>,
}

#[derive(Clone)]
pub struct ObjectCore {
    inner: Arc<CoreInner>,
}

impl ObjectCore {
    pub(crate) fn from_seed(connection: Arc<Connection>, seed: ObjectSeed) -> Self {
        ObjectCore {
            inner: Arc::new(CoreInner {
                connection,
                id: seed.id,
                path: seed.path,
                scalars: Mutex::new(Scalars {
                    name: seed.name,
                    description: seed.description,
                }),
            }),
        }
    }

    /// Stages an object that does not exist remotely yet: no ID, no path.
    /// The server assigns identity on creation; the staged proxy keeps none
    /// until re-fetched.
    pub(crate) fn draft(
        connection: Arc<Connection>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ObjectCore::from_seed(
            connection,
            ObjectSeed {
                id: String::new(),
                name: name.into(),
                description: description.into(),
                path: String::new(),
            },
        )
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    pub fn name(&self) -> String {
        self.inner.scalars.lock().unwrap().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.scalars.lock().unwrap().name = name.into();
    }

    pub fn description(&self) -> String {
        self.inner.scalars.lock().unwrap().description.clone()
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.inner.scalars.lock().unwrap().description = description.into();
    }

    pub(crate) fn connection(&self) -> &Arc<Connection> {
        &self.inner.connection
    }

    pub(crate) fn parent_path(&self) -> AfResult<String> {
        parent_path(&self.inner.path).map(str::to_string)
    }

    /// The scalar fields as pushed by `check_in`.
    pub(crate) fn patch(&self) -> ObjectPatch {
        let scalars = self.inner.scalars.lock().unwrap();
        ObjectPatch {
            id: self.inner.id.clone(),
            name: scalars.name.clone(),
            description: scalars.description.clone(),
        }
    }

    /// The creation payload for staged objects.
    pub(crate) fn to_new(&self) -> NewObject {
        let scalars = self.inner.scalars.lock().unwrap();
        NewObject {
            name: scalars.name.clone(),
            description: scalars.description.clone(),
        }
    }
}

impl PartialEq for ObjectCore {
    fn eq(&self, other: &Self) -> bool {
        // Same shared core, or same server identity. Drafts have no server
        // identity and only compare equal to their own clones.
        Arc::ptr_eq(&self.inner, &other.inner)
            || (!self.inner.id.is_empty() && self.inner.id == other.inner.id)
    }
}

impl std::fmt::Debug for ObjectCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCore")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path)
            .finish()
    }
}
