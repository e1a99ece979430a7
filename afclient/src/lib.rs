// afclient - lazy, write-through domain-object client for PI Web API style
// asset hierarchies (elements, event frames, units, templates).
//
// Remote objects are presented as local proxies: relationship fields resolve
// on first access and cache for the proxy's lifetime; local Add/Remove edits
// on relationship collections are mirrored to the remote store as
// create/delete calls, and edits the hierarchy cannot mirror (replace,
// reset, move) are rejected.

pub mod connection;
pub mod error;
pub mod lazy;
pub mod loaders;
pub mod objects;
pub mod tracked;
pub mod webapi;

pub use connection::{Connection, Loaders};
pub use error::{AfError, AfResult, ChangeKind};
pub use lazy::LazyField;
pub use objects::{
    AfAttribute, AfAttributeTemplate, AfElement, AfElementTemplate, AfEventFrame, AfUnit,
    PATH_SEPARATOR,
};
pub use tracked::{CollectionChange, TrackedCollection};
