//! Attribute operations against the WebAPI backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::AfResult;
use crate::loaders::{AttributeLoader, NewObject, ObjectPatch, ObjectSeed};
use crate::webapi::client::WebApiClient;
use crate::webapi::models::{AttributeDto, NewObjectBody, PatchBody};

pub struct WebApiAttributeLoader {
    client: Arc<WebApiClient>,
}

impl WebApiAttributeLoader {
    pub fn new(client: Arc<WebApiClient>) -> Self {
        WebApiAttributeLoader { client }
    }
}

impl AttributeLoader for WebApiAttributeLoader {
    fn find(&self, id: &str) -> AfResult<ObjectSeed> {
        let url = self.client.url(&["attributes", id])?;
        let dto: AttributeDto = self
            .client
            .get_json(url, &[], &format!("attribute {}", id))?;
        Ok(dto.into())
    }

    fn update(&self, patch: &ObjectPatch) -> AfResult<bool> {
        let url = self.client.url(&["attributes", &patch.id])?;
        self.client.send_expect(
            Method::PATCH,
            url,
            Some(&PatchBody::from(patch)),
            StatusCode::NO_CONTENT,
        )
    }

    fn delete(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["attributes", id])?;
        self.client
            .send_expect::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
    }

    fn create(&self, owner_id: &str, attribute: &NewObject) -> AfResult<bool> {
        let url = self.client.url(&["elements", owner_id, "attributes"])?;
        self.client.send_expect(
            Method::POST,
            url,
            Some(&NewObjectBody::from(attribute)),
            StatusCode::CREATED,
        )
    }
}
