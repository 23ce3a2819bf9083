//! Buffered `multipart/form-data` bodies.
//!
//! Text parts become a JSON object of strings so the content crate's request
//! types deserialize the same way from forms as from JSON bodies.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use folio_infra::Upload;

use crate::app::errors::ApiError;

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part for an untouched file input.
                if bytes.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                form.fields.insert(name, field.text().await?);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    /// Deserialize the text parts into a request type.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let object: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        serde_json::from_value(JsonValue::Object(object))
            .map_err(|e| ApiError::MalformedBody(e.to_string()))
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Self::read(multipart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::NewSkill;

    #[test]
    fn text_fields_deserialize_into_request_types() {
        let mut form = MultipartForm::default();
        form.fields.insert("title".into(), "Rust".into());
        form.fields.insert("proficiency".into(), "90".into());

        let skill: NewSkill = form.parse().unwrap();
        let draft = skill.validate().unwrap();
        assert_eq!(draft.title, "Rust");
        assert_eq!(draft.proficiency, 90);
    }

    #[test]
    fn files_are_taken_once() {
        let mut form = MultipartForm::default();
        form.files.insert(
            "svg".into(),
            Upload {
                file_name: Some("rust.svg".into()),
                content_type: Some("image/svg+xml".into()),
                bytes: b"<svg/>".to_vec(),
            },
        );
        assert!(form.has_file("svg"));
        assert!(form.take_file("svg").is_some());
        assert!(form.take_file("svg").is_none());
        assert_eq!(form.text("svg"), None);
    }
}
