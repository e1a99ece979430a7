//! Unit-of-measure operations against the WebAPI backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::AfResult;
use crate::loaders::{ObjectPatch, UnitLoader, UnitSeed};
use crate::webapi::client::WebApiClient;
use crate::webapi::models::{PatchBody, UnitDto};

pub struct WebApiUnitLoader {
    client: Arc<WebApiClient>,
}

impl WebApiUnitLoader {
    pub fn new(client: Arc<WebApiClient>) -> Self {
        WebApiUnitLoader { client }
    }
}

impl UnitLoader for WebApiUnitLoader {
    fn find(&self, id: &str) -> AfResult<UnitSeed> {
        let url = self.client.url(&["units", id])?;
        let dto: UnitDto = self.client.get_json(url, &[], &format!("unit {}", id))?;
        Ok(dto.into())
    }

    fn find_by_path(&self, path: &str) -> AfResult<UnitSeed> {
        let url = self.client.url(&["units"])?;
        let dto: UnitDto = self.client.get_json(
            url,
            &[("path", path.to_string())],
            &format!("unit at '{}'", path),
        )?;
        Ok(dto.into())
    }

    fn update(&self, patch: &ObjectPatch) -> AfResult<bool> {
        let url = self.client.url(&["units", &patch.id])?;
        self.client.send_expect(
            Method::PATCH,
            url,
            Some(&PatchBody::from(patch)),
            StatusCode::NO_CONTENT,
        )
    }

    fn delete(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["units", id])?;
        self.client
            .send_expect::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
    }
}
