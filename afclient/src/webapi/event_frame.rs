//! Event-frame operations against the WebAPI backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::AfResult;
use crate::loaders::{
    AttributeQuery, EventFrameLoader, FrameQuery, FrameSeed, NewObject, ObjectPatch, ObjectSeed,
};
use crate::webapi::client::WebApiClient;
use crate::webapi::models::{
    AttributeDto, CategoryDto, ElementDto, EventFrameDto, ItemsDto, NewObjectBody, PatchBody,
};
use crate::webapi::params;

pub struct WebApiEventFrameLoader {
    client: Arc<WebApiClient>,
}

impl WebApiEventFrameLoader {
    pub fn new(client: Arc<WebApiClient>) -> Self {
        WebApiEventFrameLoader { client }
    }
}

impl EventFrameLoader for WebApiEventFrameLoader {
    fn find(&self, id: &str) -> AfResult<FrameSeed> {
        let url = self.client.url(&["eventframes", id])?;
        let dto: EventFrameDto = self
            .client
            .get_json(url, &[], &format!("event frame {}", id))?;
        Ok(dto.into())
    }

    fn find_by_path(&self, path: &str) -> AfResult<FrameSeed> {
        let url = self.client.url(&["eventframes"])?;
        let dto: EventFrameDto = self.client.get_json(
            url,
            &[("path", path.to_string())],
            &format!("event frame at '{}'", path),
        )?;
        Ok(dto.into())
    }

    fn update(&self, patch: &ObjectPatch) -> AfResult<bool> {
        let url = self.client.url(&["eventframes", &patch.id])?;
        self.client.send_expect(
            Method::PATCH,
            url,
            Some(&PatchBody::from(patch)),
            StatusCode::NO_CONTENT,
        )
    }

    fn delete(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["eventframes", id])?;
        self.client
            .send_expect::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
    }

    fn categories(&self, id: &str) -> AfResult<Vec<String>> {
        let url = self.client.url(&["eventframes", id, "categories"])?;
        let items: ItemsDto<CategoryDto> =
            self.client
                .get_json(url, &[], &format!("categories of event frame {}", id))?;
        Ok(items.items.into_iter().map(|c| c.name).collect())
    }

    fn template_name(&self, id: &str) -> AfResult<Option<String>> {
        let url = self.client.url(&["eventframes", id])?;
        let dto: EventFrameDto = self
            .client
            .get_json(url, &[], &format!("event frame {}", id))?;
        Ok(dto.template_name)
    }

    fn child_frames(&self, id: &str, query: &FrameQuery) -> AfResult<Vec<FrameSeed>> {
        let url = self.client.url(&["eventframes", id, "eventframes"])?;
        let items: ItemsDto<EventFrameDto> = self.client.get_json(
            url,
            &params::frame_query(query),
            &format!("child frames of event frame {}", id),
        )?;
        Ok(items.items.into_iter().map(Into::into).collect())
    }

    fn attributes(&self, id: &str, query: &AttributeQuery) -> AfResult<Vec<ObjectSeed>> {
        let url = self.client.url(&["eventframes", id, "attributes"])?;
        let items: ItemsDto<AttributeDto> = self.client.get_json(
            url,
            &params::attribute_query(query),
            &format!("attributes of event frame {}", id),
        )?;
        Ok(items.items.into_iter().map(Into::into).collect())
    }

    fn referenced_elements(&self, id: &str) -> AfResult<Vec<ObjectSeed>> {
        let url = self.client.url(&["eventframes", id, "referencedelements"])?;
        let items: ItemsDto<ElementDto> = self.client.get_json(
            url,
            &[],
            &format!("elements referenced by event frame {}", id),
        )?;
        Ok(items.items.into_iter().map(Into::into).collect())
    }

    fn create_child(&self, parent_id: &str, frame: &NewObject) -> AfResult<bool> {
        let url = self.client.url(&["eventframes", parent_id, "eventframes"])?;
        self.client.send_expect(
            Method::POST,
            url,
            Some(&NewObjectBody::from(frame)),
            StatusCode::CREATED,
        )
    }

    fn create_attribute(&self, owner_id: &str, attribute: &NewObject) -> AfResult<bool> {
        let url = self.client.url(&["eventframes", owner_id, "attributes"])?;
        self.client.send_expect(
            Method::POST,
            url,
            Some(&NewObjectBody::from(attribute)),
            StatusCode::CREATED,
        )
    }

    fn capture_values(&self, id: &str) -> AfResult<bool> {
        let url = self
            .client
            .url(&["eventframes", id, "attributes", "capture"])?;
        self.client
            .send_expect::<()>(Method::POST, url, None, StatusCode::NO_CONTENT)
    }
}
