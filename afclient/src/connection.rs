//! Session object shared by every proxy.
//!
//! A `Connection` is the capability bundle for one remote session: one
//! loader per entity kind, injected once at construction and fixed for the
//! session's lifetime. Proxies hold the connection as shared read-only
//! context and never mutate it; several connections with different backends
//! can coexist in one process.

use std::sync::Arc;

use crate::loaders::{
    AttributeLoader, ElementLoader, EventFrameLoader, TemplateLoader, UnitLoader,
};

/// The loader set a backend supplies when opening a session.
pub struct Loaders {
    pub elements: Arc<dyn ElementLoader>,
    pub event_frames: Arc<dyn EventFrameLoader>,
    pub attributes: Arc<dyn AttributeLoader>,
    pub templates: Arc<dyn TemplateLoader>,
    pub units: Arc<dyn UnitLoader>,
}

/// One remote session. Cheap to share; every proxy derived from it holds an
/// `Arc<Connection>`.
pub struct Connection {
    loaders: Loaders,
}

impl Connection {
    pub fn new(loaders: Loaders) -> Arc<Self> {
        Arc::new(Connection { loaders })
    }

    pub(crate) fn elements(&self) -> &Arc<dyn ElementLoader> {
        &self.loaders.elements
    }

    pub(crate) fn event_frames(&self) -> &Arc<dyn EventFrameLoader> {
        &self.loaders.event_frames
    }

    pub(crate) fn attributes(&self) -> &Arc<dyn AttributeLoader> {
        &self.loaders.attributes
    }

    pub(crate) fn templates(&self) -> &Arc<dyn TemplateLoader> {
        &self.loaders.templates
    }

    pub(crate) fn units(&self) -> &Arc<dyn UnitLoader> {
        &self.loaders.units
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}
