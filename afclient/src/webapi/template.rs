//! Element-template operations against the WebAPI backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::error::AfResult;
use crate::loaders::{NewObject, ObjectPatch, ObjectSeed, TemplateLoader};
use crate::webapi::client::WebApiClient;
use crate::webapi::models::{ItemsDto, NewObjectBody, PatchBody, TemplateDto};

pub struct WebApiTemplateLoader {
    client: Arc<WebApiClient>,
}

impl WebApiTemplateLoader {
    pub fn new(client: Arc<WebApiClient>) -> Self {
        WebApiTemplateLoader { client }
    }
}

impl TemplateLoader for WebApiTemplateLoader {
    fn find(&self, id: &str) -> AfResult<ObjectSeed> {
        let url = self.client.url(&["elementtemplates", id])?;
        let dto: TemplateDto = self
            .client
            .get_json(url, &[], &format!("element template {}", id))?;
        Ok(dto.into())
    }

    fn find_by_path(&self, path: &str) -> AfResult<ObjectSeed> {
        let url = self.client.url(&["elementtemplates"])?;
        let dto: TemplateDto = self.client.get_json(
            url,
            &[("path", path.to_string())],
            &format!("element template at '{}'", path),
        )?;
        Ok(dto.into())
    }

    fn update(&self, patch: &ObjectPatch) -> AfResult<bool> {
        let url = self.client.url(&["elementtemplates", &patch.id])?;
        self.client.send_expect(
            Method::PATCH,
            url,
            Some(&PatchBody::from(patch)),
            StatusCode::NO_CONTENT,
        )
    }

    fn delete(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["elementtemplates", id])?;
        self.client
            .send_expect::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
    }

    fn categories(&self, id: &str) -> AfResult<Vec<String>> {
        let url = self.client.url(&["elementtemplates", id])?;
        let dto: TemplateDto = self
            .client
            .get_json(url, &[], &format!("element template {}", id))?;
        Ok(dto.category_names)
    }

    fn is_extendible(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["elementtemplates", id])?;
        let dto: TemplateDto = self
            .client
            .get_json(url, &[], &format!("element template {}", id))?;
        Ok(dto.allow_element_to_extend)
    }

    fn attribute_templates(&self, id: &str) -> AfResult<Vec<ObjectSeed>> {
        let url = self
            .client
            .url(&["elementtemplates", id, "attributetemplates"])?;
        let items: ItemsDto<TemplateDto> = self.client.get_json(
            url,
            &[],
            &format!("attribute templates of element template {}", id),
        )?;
        Ok(items.items.into_iter().map(Into::into).collect())
    }

    fn create_attribute_template(
        &self,
        template_id: &str,
        template: &NewObject,
    ) -> AfResult<bool> {
        let url = self
            .client
            .url(&["elementtemplates", template_id, "attributetemplates"])?;
        self.client.send_expect(
            Method::POST,
            url,
            Some(&NewObjectBody::from(template)),
            StatusCode::CREATED,
        )
    }

    fn delete_attribute_template(&self, id: &str) -> AfResult<bool> {
        let url = self.client.url(&["attributetemplates", id])?;
        self.client
            .send_expect::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
    }
}
