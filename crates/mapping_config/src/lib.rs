//! Data model for document template input mappings

use serde::{Deserialize, Serialize};

/// Kind of a template input placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text placeholder
    Text,
    /// Image placeholder
    Image,
    /// Unknown kind (preserved verbatim, never offered any fields)
    Other(String),
}

impl FieldKind {
    /// Parses a wire value like "TEXTINPUT" or "IMAGEINPUT".
    pub fn from_wire(s: &str) -> Self {
        match s {
            "TEXTINPUT" => Self::Text,
            "IMAGEINPUT" => Self::Image,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Text => "TEXTINPUT",
            Self::Image => "IMAGEINPUT",
            Self::Other(s) => s,
        }
    }
}

/// Semantic type of an object field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    /// Plain string field
    String,
    /// Long text field
    TextArea,
    /// Any other type (never offered as a candidate)
    Other(String),
}

impl SemanticType {
    /// Parses a wire value like "STRING" or "TEXTAREA".
    pub fn from_wire(s: &str) -> Self {
        match s {
            "STRING" => Self::String,
            "TEXTAREA" => Self::TextArea,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::String => "STRING",
            Self::TextArea => "TEXTAREA",
            Self::Other(s) => s,
        }
    }
}

/// A document template with its declared placeholder inputs.
///
/// Immutable once loaded; input order is the template's declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub label: String,
    pub inputs: Vec<TemplateInput>,
}

impl Template {
    /// Templates without inputs cannot be mapped.
    pub fn has_inputs(&self) -> bool {
        !self.inputs.is_empty()
    }

    pub fn find_input(&self, input_id: &str) -> Option<&TemplateInput> {
        self.inputs.iter().find(|i| i.id == input_id)
    }
}

/// Keeps only templates that can actually be mapped (at least one input).
pub fn selectable_templates(templates: Vec<Template>) -> Vec<Template> {
    templates.into_iter().filter(Template::has_inputs).collect()
}

/// One placeholder slot on a template. The id is unique within its template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInput {
    pub id: String,
    pub internal_label: String,
    pub required: bool,
    pub placeholder: String,
    pub preferred_icon: String,
    pub kind: FieldKind,
}

/// A business object offered for mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub label: String,
    /// Object API name
    #[serde(rename = "value")]
    pub api_name: String,
}

/// Sorts objects for display: by label, case-insensitive, ascending.
pub fn sort_by_label(objects: &mut [ObjectDescriptor]) {
    objects.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));
}

/// One field of a business object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub api_name: String,
    pub semantic: SemanticType,
}

/// Persisted binding of one template input to one object field.
///
/// Key is (template_id, input_id); at most one live record per key.
/// Records are created and updated by the engine, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRecord {
    /// Absent until the record has been created in the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub template_id: String,
    pub input_id: String,
    #[serde(default)]
    pub object_api_name: String,
    #[serde(default)]
    pub field_api_name: String,
}

impl MappingRecord {
    pub fn key(&self) -> (&str, &str) {
        (&self.template_id, &self.input_id)
    }

    /// A record persisted with empty values carries no usable selection.
    pub fn has_selection(&self) -> bool {
        !self.object_api_name.is_empty() && !self.field_api_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: &str, kind: FieldKind) -> TemplateInput {
        TemplateInput {
            id: id.to_string(),
            internal_label: id.to_string(),
            required: false,
            placeholder: String::new(),
            preferred_icon: String::new(),
            kind,
        }
    }

    #[test]
    fn test_field_kind_from_wire() {
        assert_eq!(FieldKind::from_wire("TEXTINPUT"), FieldKind::Text);
        assert_eq!(FieldKind::from_wire("IMAGEINPUT"), FieldKind::Image);
        assert_eq!(
            FieldKind::from_wire("SIGNATUREINPUT"),
            FieldKind::Other("SIGNATUREINPUT".to_string())
        );
    }

    #[test]
    fn test_field_kind_wire_roundtrip() {
        for wire in ["TEXTINPUT", "IMAGEINPUT", "SOMETHINGELSE"] {
            assert_eq!(FieldKind::from_wire(wire).as_wire(), wire);
        }
    }

    #[test]
    fn test_semantic_type_from_wire() {
        assert_eq!(SemanticType::from_wire("STRING"), SemanticType::String);
        assert_eq!(SemanticType::from_wire("TEXTAREA"), SemanticType::TextArea);
        assert_eq!(
            SemanticType::from_wire("DOUBLE"),
            SemanticType::Other("DOUBLE".to_string())
        );
    }

    #[test]
    fn test_selectable_templates_drops_empty() {
        let with_inputs = Template {
            id: "t1".to_string(),
            label: "Invoice".to_string(),
            inputs: vec![input("i1", FieldKind::Text)],
        };
        let without_inputs = Template {
            id: "t2".to_string(),
            label: "Blank".to_string(),
            inputs: vec![],
        };

        let selectable = selectable_templates(vec![with_inputs.clone(), without_inputs]);

        assert_eq!(selectable, vec![with_inputs]);
    }

    #[test]
    fn test_find_input() {
        let template = Template {
            id: "t1".to_string(),
            label: "Invoice".to_string(),
            inputs: vec![input("i1", FieldKind::Text), input("i2", FieldKind::Image)],
        };

        assert!(template.find_input("i2").is_some());
        assert!(template.find_input("i3").is_none());
    }

    #[test]
    fn test_sort_by_label_case_insensitive() {
        let mut objects = vec![
            ObjectDescriptor {
                label: "contact".to_string(),
                api_name: "Contact".to_string(),
            },
            ObjectDescriptor {
                label: "Account".to_string(),
                api_name: "Account".to_string(),
            },
            ObjectDescriptor {
                label: "Billing".to_string(),
                api_name: "Billing__c".to_string(),
            },
        ];

        sort_by_label(&mut objects);

        let labels: Vec<&str> = objects.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Account", "Billing", "contact"]);
    }

    #[test]
    fn test_parse_object_descriptor() {
        let json_str = r#"{"label": "Account", "value": "Account"}"#;
        let object: ObjectDescriptor = serde_json::from_str(json_str).unwrap();
        assert_eq!(object.api_name, "Account");
    }

    #[test]
    fn test_parse_mapping_record_without_id() {
        let json_str = r#"{
            "templateId": "t1",
            "inputId": "i1",
            "objectApiName": "Account",
            "fieldApiName": "Name"
        }"#;
        let record: MappingRecord = serde_json::from_str(json_str).unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.key(), ("t1", "i1"));
        assert!(record.has_selection());
    }

    #[test]
    fn test_serialize_mapping_record_skips_absent_id() {
        let record = MappingRecord {
            id: None,
            template_id: "t1".to_string(),
            input_id: "i1".to_string(),
            object_api_name: "Account".to_string(),
            field_api_name: "Name".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"templateId\":\"t1\""));
    }

    #[test]
    fn test_empty_record_has_no_selection() {
        let record = MappingRecord {
            id: Some("m1".to_string()),
            template_id: "t1".to_string(),
            input_id: "i1".to_string(),
            object_api_name: String::new(),
            field_api_name: String::new(),
        };

        assert!(!record.has_selection());
    }
}
