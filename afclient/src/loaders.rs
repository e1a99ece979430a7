//! Backend capability traits, one per entity kind.
//!
//! Responsibilities:
//! - Define the minimal remote surface the domain layer consumes: lookups,
//!   scalar updates, deletes, relationship getters and relationship
//!   mutators.
//! - Keep interfaces small and backend-agnostic so alternate transports and
//!   test doubles stay easy to write.
//!
//! Loaders are constructed with whatever session handle they need and are
//! injected into a [`Connection`](crate::Connection) once, at session setup.
//! Getters are idempotent and side-effect free; mutators change remote state
//! and report plain success/failure, never partial success. Filter
//! parameters are passed through to the backend unchanged — the domain layer
//! applies no filtering of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AfResult;

/// Identity data for one remote object, as returned by lookups and
/// relationship getters. The domain layer builds proxies from seeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSeed {
    pub id: String,
    pub name: String,
    pub description: String,
    pub path: String,
}

/// Scalar fields pushed to the remote store by `check_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPatch {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Payload for creating a new relationship member. The server assigns the
/// identity; the staged local object carries none until re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewObject {
    pub name: String,
    pub description: String,
}

/// Seed for a unit of measure; units carry their conversion scalars eagerly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSeed {
    pub object: ObjectSeed,
    pub abbreviation: String,
    pub factor: f64,
    pub offset: f64,
    pub reference_factor: f64,
    pub reference_offset: f64,
    pub reference_unit_abbreviation: String,
}

/// Seed for an event frame; start/end are eager scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSeed {
    pub object: ObjectSeed,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

/// Time relation used when searching child event frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    None,
    BackwardFromStartTime,
    ForwardFromStartTime,
    Overlapped,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::None => "None",
            SearchMode::BackwardFromStartTime => "BackwardFromStartTime",
            SearchMode::ForwardFromStartTime => "ForwardFromStartTime",
            SearchMode::Overlapped => "Overlapped",
        }
    }
}

/// Filters for child-element searches. Defaults match an unfiltered,
/// name-ascending first page of 1000.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementQuery {
    pub name_filter: String,
    pub category_name: Option<String>,
    pub template_name: Option<String>,
    pub element_type: Option<String>,
    pub search_full_hierarchy: bool,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub start_index: usize,
    pub max_count: usize,
}

impl Default for ElementQuery {
    fn default() -> Self {
        ElementQuery {
            name_filter: "*".to_string(),
            category_name: None,
            template_name: None,
            element_type: None,
            search_full_hierarchy: false,
            sort_field: "Name".to_string(),
            sort_order: SortOrder::Ascending,
            start_index: 0,
            max_count: 1000,
        }
    }
}

impl ElementQuery {
    pub fn with_name_filter(mut self, pattern: impl Into<String>) -> Self {
        self.name_filter = pattern.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_name = Some(category.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template_name = Some(template.into());
        self
    }

    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }
}

/// Filters for attribute listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeQuery {
    pub name_filter: String,
    pub category_name: Option<String>,
    pub template_name: Option<String>,
    pub value_type: Option<String>,
    pub search_full_hierarchy: bool,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub start_index: usize,
    pub show_excluded: bool,
    pub show_hidden: bool,
    pub max_count: usize,
}

impl Default for AttributeQuery {
    fn default() -> Self {
        AttributeQuery {
            name_filter: "*".to_string(),
            category_name: None,
            template_name: None,
            value_type: None,
            search_full_hierarchy: false,
            sort_field: "Name".to_string(),
            sort_order: SortOrder::Ascending,
            start_index: 0,
            show_excluded: false,
            show_hidden: false,
            max_count: 1000,
        }
    }
}

impl AttributeQuery {
    pub fn with_name_filter(mut self, pattern: impl Into<String>) -> Self {
        self.name_filter = pattern.into();
        self
    }

    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }
}

/// Filters for child event-frame searches. The default window looks eight
/// days back from now, matching the remote service's convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameQuery {
    pub search_mode: SearchMode,
    pub start_time: String,
    pub end_time: String,
    pub name_filter: String,
    pub search_full_hierarchy: bool,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub start_index: usize,
    pub max_count: usize,
}

impl Default for FrameQuery {
    fn default() -> Self {
        FrameQuery {
            search_mode: SearchMode::None,
            start_time: "*-8d".to_string(),
            end_time: "*".to_string(),
            name_filter: "*".to_string(),
            search_full_hierarchy: false,
            sort_field: "Name".to_string(),
            sort_order: SortOrder::Ascending,
            start_index: 0,
            max_count: 1000,
        }
    }
}

impl FrameQuery {
    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }
}

/// Remote operations on asset elements.
pub trait ElementLoader: Send + Sync {
    fn find(&self, id: &str) -> AfResult<ObjectSeed>;
    fn find_by_path(&self, path: &str) -> AfResult<ObjectSeed>;
    fn update(&self, patch: &ObjectPatch) -> AfResult<bool>;
    fn delete(&self, id: &str) -> AfResult<bool>;
    fn categories(&self, id: &str) -> AfResult<Vec<String>>;
    fn template_name(&self, id: &str) -> AfResult<Option<String>>;
    fn children(&self, id: &str, query: &ElementQuery) -> AfResult<Vec<ObjectSeed>>;
    fn attributes(&self, id: &str, query: &AttributeQuery) -> AfResult<Vec<ObjectSeed>>;
    fn create_child(&self, parent_id: &str, child: &NewObject) -> AfResult<bool>;
}

/// Remote operations on event frames.
pub trait EventFrameLoader: Send + Sync {
    fn find(&self, id: &str) -> AfResult<FrameSeed>;
    fn find_by_path(&self, path: &str) -> AfResult<FrameSeed>;
    fn update(&self, patch: &ObjectPatch) -> AfResult<bool>;
    fn delete(&self, id: &str) -> AfResult<bool>;
    fn categories(&self, id: &str) -> AfResult<Vec<String>>;
    fn template_name(&self, id: &str) -> AfResult<Option<String>>;
    fn child_frames(&self, id: &str, query: &FrameQuery) -> AfResult<Vec<FrameSeed>>;
    fn attributes(&self, id: &str, query: &AttributeQuery) -> AfResult<Vec<ObjectSeed>>;
    fn referenced_elements(&self, id: &str) -> AfResult<Vec<ObjectSeed>>;
    fn create_child(&self, parent_id: &str, frame: &NewObject) -> AfResult<bool>;
    fn create_attribute(&self, owner_id: &str, attribute: &NewObject) -> AfResult<bool>;
    /// Snapshots the current values of the frame's attributes on the server.
    fn capture_values(&self, id: &str) -> AfResult<bool>;
}

/// Remote operations on attributes.
pub trait AttributeLoader: Send + Sync {
    fn find(&self, id: &str) -> AfResult<ObjectSeed>;
    fn update(&self, patch: &ObjectPatch) -> AfResult<bool>;
    fn delete(&self, id: &str) -> AfResult<bool>;
    fn create(&self, owner_id: &str, attribute: &NewObject) -> AfResult<bool>;
}

/// Remote operations on element templates.
pub trait TemplateLoader: Send + Sync {
    fn find(&self, id: &str) -> AfResult<ObjectSeed>;
    fn find_by_path(&self, path: &str) -> AfResult<ObjectSeed>;
    fn update(&self, patch: &ObjectPatch) -> AfResult<bool>;
    fn delete(&self, id: &str) -> AfResult<bool>;
    fn categories(&self, id: &str) -> AfResult<Vec<String>>;
    fn is_extendible(&self, id: &str) -> AfResult<bool>;
    fn attribute_templates(&self, id: &str) -> AfResult<Vec<ObjectSeed>>;
    fn create_attribute_template(&self, template_id: &str, template: &NewObject)
        -> AfResult<bool>;
    fn delete_attribute_template(&self, id: &str) -> AfResult<bool>;
}

/// Remote operations on units of measure.
pub trait UnitLoader: Send + Sync {
    fn find(&self, id: &str) -> AfResult<UnitSeed>;
    fn find_by_path(&self, path: &str) -> AfResult<UnitSeed>;
    fn update(&self, patch: &ObjectPatch) -> AfResult<bool>;
    fn delete(&self, id: &str) -> AfResult<bool>;
}
