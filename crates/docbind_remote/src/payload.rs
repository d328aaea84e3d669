//! Wire-Payloads des Katalog- und Mapping-Service
//!
//! Die Payloads werden am Eingang in die Modelltypen konvertiert; in die
//! Engine gelangt nie ungeprüfte Fremdstruktur. Felder sind tolerant
//! deklariert, fehlende Werte fallen auf Defaults zurück.

use serde::Deserialize;

use docbind_mapping_config::{
    FieldDescriptor, FieldKind, SemanticType, Template, TemplateInput,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub document_inputs: Vec<TemplateInputPayload>,
}

impl TemplatePayload {
    pub fn into_model(self) -> Template {
        Template {
            id: self.id,
            label: self.value,
            inputs: self
                .document_inputs
                .into_iter()
                .map(TemplateInputPayload::into_model)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInputPayload {
    pub id: String,
    #[serde(default)]
    pub internal_label: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub place_holder: String,
    #[serde(default)]
    pub preferred_icon: String,
    #[serde(default)]
    pub field_type: String,
}

impl TemplateInputPayload {
    pub fn into_model(self) -> TemplateInput {
        TemplateInput {
            id: self.id,
            internal_label: self.internal_label,
            required: self.is_required,
            placeholder: self.place_holder,
            preferred_icon: self.preferred_icon,
            kind: FieldKind::from_wire(&self.field_type),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    pub api_name: String,
    #[serde(default, rename = "type")]
    pub field_type: String,
}

impl FieldPayload {
    pub fn into_model(self) -> FieldDescriptor {
        FieldDescriptor {
            api_name: self.api_name,
            semantic: SemanticType::from_wire(&self.field_type),
        }
    }
}
