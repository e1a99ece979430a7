//! Proxy objects over the remote asset hierarchy.

pub mod attribute;
pub mod base;
pub mod element;
pub mod event_frame;
pub mod template;
pub mod unit;

pub use attribute::AfAttribute;
pub use base::{ObjectCore, PATH_SEPARATOR};
pub use element::AfElement;
pub use event_frame::AfEventFrame;
pub use template::{AfAttributeTemplate, AfElementTemplate};
pub use unit::AfUnit;
