//! Translation of query structs into WebAPI query-string pairs.
//!
//! The domain layer passes filters through untouched; this is the only
//! place that knows the service's parameter names.

use crate::loaders::{AttributeQuery, ElementQuery, FrameQuery};

pub(crate) fn element_query(query: &ElementQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("nameFilter", query.name_filter.clone())];
    if let Some(category) = &query.category_name {
        pairs.push(("categoryName", category.clone()));
    }
    if let Some(template) = &query.template_name {
        pairs.push(("templateName", template.clone()));
    }
    if let Some(element_type) = &query.element_type {
        pairs.push(("elementType", element_type.clone()));
    }
    pairs.push((
        "searchFullHierarchy",
        query.search_full_hierarchy.to_string(),
    ));
    pairs.push(("sortField", query.sort_field.clone()));
    pairs.push(("sortOrder", query.sort_order.as_str().to_string()));
    pairs.push(("startIndex", query.start_index.to_string()));
    pairs.push(("maxCount", query.max_count.to_string()));
    pairs
}

pub(crate) fn attribute_query(query: &AttributeQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("nameFilter", query.name_filter.clone())];
    if let Some(category) = &query.category_name {
        pairs.push(("categoryName", category.clone()));
    }
    if let Some(template) = &query.template_name {
        pairs.push(("templateName", template.clone()));
    }
    if let Some(value_type) = &query.value_type {
        pairs.push(("valueType", value_type.clone()));
    }
    pairs.push((
        "searchFullHierarchy",
        query.search_full_hierarchy.to_string(),
    ));
    pairs.push(("sortField", query.sort_field.clone()));
    pairs.push(("sortOrder", query.sort_order.as_str().to_string()));
    pairs.push(("startIndex", query.start_index.to_string()));
    pairs.push(("showExcluded", query.show_excluded.to_string()));
    pairs.push(("showHidden", query.show_hidden.to_string()));
    pairs.push(("maxCount", query.max_count.to_string()));
    pairs
}

pub(crate) fn frame_query(query: &FrameQuery) -> Vec<(&'static str, String)> {
    vec![
        ("searchMode", query.search_mode.as_str().to_string()),
        ("startTime", query.start_time.clone()),
        ("endTime", query.end_time.clone()),
        ("nameFilter", query.name_filter.clone()),
        (
            "searchFullHierarchy",
            query.search_full_hierarchy.to_string(),
        ),
        ("sortField", query.sort_field.clone()),
        ("sortOrder", query.sort_order.as_str().to_string()),
        ("startIndex", query.start_index.to_string()),
        ("maxCount", query.max_count.to_string()),
    ]
}
