//! Remote Service - HTTP-Adapter für Kataloge und Mapping-Store
//!
//! Dünne I/O-Wrapper um die REST-Aufrufe des Katalog- und
//! Mapping-Service. Jeder Transportfehler wird am Aufruf in die
//! Fehler-Taxonomie des Engines konvertiert; nichts wirft über die
//! Komponentengrenze hinaus.

mod payload;

pub use payload::{FieldPayload, TemplateInputPayload, TemplatePayload};

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use docbind_mapping_config::{FieldDescriptor, MappingRecord, ObjectDescriptor, Template};
use docbind_mapping_engine::{
    MappingEngineError, MappingStore, ObjectCatalog, TemplateCatalog,
};

/// HTTP-Client für den Katalog- und Mapping-Service.
pub struct RemoteService {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Client mit Request-Timeout; Timeouts werden zu gewöhnlichen
    /// per-Call-Fehlern.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MappingEngineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| MappingEngineError::CatalogUnavailable(err.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(base_url.into()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, reqwest::Error> {
        self.client
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl TemplateCatalog for RemoteService {
    async fn list_templates(&self) -> Result<Vec<Template>, MappingEngineError> {
        let payloads: Vec<TemplatePayload> = self
            .get_json("templates")
            .await
            .map_err(|err| MappingEngineError::CatalogUnavailable(format!("template list: {}", err)))?;

        Ok(payloads.into_iter().map(TemplatePayload::into_model).collect())
    }
}

#[async_trait]
impl ObjectCatalog for RemoteService {
    async fn list_objects(&self) -> Result<Vec<ObjectDescriptor>, MappingEngineError> {
        self.get_json("objects")
            .await
            .map_err(|err| MappingEngineError::CatalogUnavailable(format!("object list: {}", err)))
    }

    async fn list_object_fields(
        &self,
        object: &str,
    ) -> Result<Vec<FieldDescriptor>, MappingEngineError> {
        let payloads: Vec<FieldPayload> = self
            .get_json(&format!("objects/{}/fields", object))
            .await
            .map_err(|err| {
                MappingEngineError::CatalogUnavailable(format!("field list for {}: {}", object, err))
            })?;

        Ok(payloads.into_iter().map(FieldPayload::into_model).collect())
    }
}

#[async_trait]
impl MappingStore for RemoteService {
    async fn list_mappings(
        &self,
        template_id: &str,
    ) -> Result<Vec<MappingRecord>, MappingEngineError> {
        self.get_json(&format!("templates/{}/mappings", template_id))
            .await
            .map_err(|err| {
                MappingEngineError::CatalogUnavailable(format!(
                    "mapping list for template {}: {}",
                    template_id, err
                ))
            })
    }

    async fn get_mapping(
        &self,
        template_id: &str,
        input_id: &str,
    ) -> Result<Option<MappingRecord>, MappingEngineError> {
        let response = self
            .client
            .get(self.url(&format!("templates/{}/mappings/{}", template_id, input_id)))
            .send()
            .await
            .map_err(|err| MappingEngineError::MappingLookupFailed {
                input_id: input_id.to_string(),
                reason: err.to_string(),
            })?;

        // Fehlender Record ist ein normales Ergebnis, kein Fehler
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|err| MappingEngineError::MappingLookupFailed {
                input_id: input_id.to_string(),
                reason: err.to_string(),
            })?;

        let record: MappingRecord =
            response
                .json()
                .await
                .map_err(|err| MappingEngineError::MappingLookupFailed {
                    input_id: input_id.to_string(),
                    reason: err.to_string(),
                })?;

        Ok(Some(record))
    }

    async fn create_mapping(
        &self,
        record: &MappingRecord,
    ) -> Result<MappingRecord, MappingEngineError> {
        self.client
            .post(self.url("mappings"))
            .json(record)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| MappingEngineError::MappingWriteFailed {
                input_id: record.input_id.clone(),
                reason: err.to_string(),
            })?
            .json()
            .await
            .map_err(|err| MappingEngineError::MappingWriteFailed {
                input_id: record.input_id.clone(),
                reason: err.to_string(),
            })
    }

    async fn update_mapping(
        &self,
        record: &MappingRecord,
    ) -> Result<MappingRecord, MappingEngineError> {
        let id = record
            .id
            .as_deref()
            .ok_or_else(|| MappingEngineError::MappingWriteFailed {
                input_id: record.input_id.clone(),
                reason: "missing mapping id".to_string(),
            })?;

        self.client
            .patch(self.url(&format!("mappings/{}", id)))
            .json(record)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| MappingEngineError::MappingWriteFailed {
                input_id: record.input_id.clone(),
                reason: err.to_string(),
            })?
            .json()
            .await
            .map_err(|err| MappingEngineError::MappingWriteFailed {
                input_id: record.input_id.clone(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let service = RemoteService::new("https://mapping.example.com/api/");

        assert_eq!(service.base_url(), "https://mapping.example.com/api");
        assert_eq!(
            service.url("templates"),
            "https://mapping.example.com/api/templates"
        );
    }

    #[test]
    fn test_with_timeout_builds_client() {
        let service =
            RemoteService::with_timeout("http://localhost:8080", Duration::from_secs(5)).unwrap();

        assert_eq!(service.base_url(), "http://localhost:8080");
    }
}
