//! Element operations against the WebAPI backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::AfResult;
use crate::loaders::{AttributeQuery, ElementLoader, ElementQuery, NewObject, ObjectPatch, ObjectSeed};
use crate::webapi::client::WebApiClient;
use crate::webapi::models::{
    AttributeDto, CategoryDto, ElementDto, ItemsDto, NewObjectBody, PatchBody,
};
use crate::webapi::params;

pub struct WebApiElementLoader {
    client: Arc<WebApiClient>,
}

impl WebApiElementLoader {
    pub fn new(client: Arc<WebApiClient>) -> Self {
        WebApiElementLoader { client }
    }
}

impl ElementLoader for WebApiElementLoader {
    fn find(&self, id: &str) -> AfResult<ObjectSeed> {
        let url = self.client.url(&["elements", id])?;
        let dto: ElementDto = self
            .client
            .get_json(url, &[], &format!("element {}", id))?;
        Ok(dto.into())
    }

    fn find_by_path(&self, path: &str) -> AfResult<ObjectSeed> {
        let url = self.client.url(&["elements"])?;
        let dto: ElementDto = self.client.get_json(
            url,
            &[("path", path.to_string())],
            &format!("element at '{}'", path),
        )?;
        Ok(dto.into())
    }

    fn update(&self, patch: &ObjectPatch) -> AfResult<bool> {
        let url = self.client.url(&["elements", &patch.id])?;
        self.client.send_expect(
            Method::PATCH,
            url,
            Some(&PatchBody::from(patch)),
            StatusCode::NO_CONTENT,
        )
    }

    fn delete(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["elements", id])?;
        self.client
            .send_expect::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
    }

    fn categories(&self, id: &str) -> AfResult<Vec<String>> {
        let url = self.client.url(&["elements", id, "categories"])?;
        let items: ItemsDto<CategoryDto> =
            self.client
                .get_json(url, &[], &format!("categories of element {}", id))?;
        Ok(items.items.into_iter().map(|c| c.name).collect())
    }

    fn template_name(&self, id: &str) -> AfResult<Option<String>> {
        let url = self.client.url(&["elements", id])?;
        let dto: ElementDto = self
            .client
            .get_json(url, &[], &format!("element {}", id))?;
        Ok(dto.template_name)
    }

    fn children(&self, id: &str, query: &ElementQuery) -> AfResult<Vec<ObjectSeed>> {
        let url = self.client.url(&["elements", id, "elements"])?;
        let items: ItemsDto<ElementDto> = self.client.get_json(
            url,
            &params::element_query(query),
            &format!("children of element {}", id),
        )?;
        Ok(items.items.into_iter().map(Into::into).collect())
    }

    fn attributes(&self, id: &str, query: &AttributeQuery) -> AfResult<Vec<ObjectSeed>> {
        let url = self.client.url(&["elements", id, "attributes"])?;
        let items: ItemsDto<AttributeDto> = self.client.get_json(
            url,
            &params::attribute_query(query),
            &format!("attributes of element {}", id),
        )?;
        Ok(items.items.into_iter().map(Into::into).collect())
    }

    fn create_child(&self, parent_id: &str, child: &NewObject) -> AfResult<bool> {
        let url = self.client.url(&["elements", parent_id, "elements"])?;
        self.client.send_expect(
            Method::POST,
            url,
            Some(&NewObjectBody::from(child)),
            StatusCode::CREATED,
        )
    }
}
