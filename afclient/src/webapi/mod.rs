//! WebAPI backend: blocking REST loaders for every entity kind.
//!
//! The loaders here are mechanical request/response translators; all
//! invariants live in the domain layer. [`connect`] opens a session and
//! wires one loader per entity kind into a [`Connection`].

pub mod client;
pub mod models;
mod params;

mod attribute;
mod element;
mod event_frame;
mod template;
mod unit;

pub use attribute::WebApiAttributeLoader;
pub use client::{WebApiClient, WebApiConfig};
pub use element::WebApiElementLoader;
pub use event_frame::WebApiEventFrameLoader;
pub use template::WebApiTemplateLoader;
pub use unit::WebApiUnitLoader;

use std::sync::Arc;

use crate::connection::{Connection, Loaders};
use crate::error::AfResult;

/// Opens a WebAPI session and returns a connection backed by it.
pub fn connect(config: WebApiConfig) -> AfResult<Arc<Connection>> {
    let client = Arc::new(WebApiClient::new(config)?);
    Ok(Connection::new(Loaders {
        elements: Arc::new(WebApiElementLoader::new(Arc::clone(&client))),
        event_frames: Arc::new(WebApiEventFrameLoader::new(Arc::clone(&client))),
        attributes: Arc::new(WebApiAttributeLoader::new(Arc::clone(&client))),
        templates: Arc::new(WebApiTemplateLoader::new(Arc::clone(&client))),
        units: Arc::new(WebApiUnitLoader::new(client)),
    }))
}
