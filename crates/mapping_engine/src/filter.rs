//! Field Type Filter - reine Kandidatenberechnung
//!
//! Einzige Quelle der Wahrheit für die Kompatibilitätsregel:
//! TEXT-Inputs bekommen nur STRING-Felder, IMAGE-Inputs nur TEXTAREA-Felder,
//! alle anderen semantischen Typen werden nie angeboten. Wird beim Hydrate
//! und beim Edit identisch angewendet.

use docbind_mapping_config::{FieldDescriptor, FieldKind, SemanticType};

/// Filtert die Kandidaten-Felder für einen Input-Kind.
///
/// Pur, total, deterministisch, reihenfolgeerhaltend. Unbekannte Kinds
/// ergeben die leere Menge (lieber keine Felder als falsche Felder).
pub fn filter_fields(kind: &FieldKind, fields: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    let admitted = match kind {
        FieldKind::Text => SemanticType::String,
        FieldKind::Image => SemanticType::TextArea,
        FieldKind::Other(_) => return Vec::new(),
    };

    fields.into_iter().filter(|f| f.semantic == admitted).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor {
                api_name: "Name".to_string(),
                semantic: SemanticType::String,
            },
            FieldDescriptor {
                api_name: "Description__c".to_string(),
                semantic: SemanticType::TextArea,
            },
            FieldDescriptor {
                api_name: "Revenue__c".to_string(),
                semantic: SemanticType::Other("DOUBLE".to_string()),
            },
        ]
    }

    #[test]
    fn test_text_admits_only_string_fields() {
        let candidates = filter_fields(&FieldKind::Text, account_fields());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].api_name, "Name");
    }

    #[test]
    fn test_image_admits_only_textarea_fields() {
        let candidates = filter_fields(&FieldKind::Image, account_fields());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].api_name, "Description__c");
    }

    #[test]
    fn test_unknown_kind_yields_empty_set() {
        let kind = FieldKind::Other("SIGNATUREINPUT".to_string());
        assert!(filter_fields(&kind, account_fields()).is_empty());
    }

    #[test]
    fn test_result_is_subset_in_input_order() {
        let fields = vec![
            FieldDescriptor {
                api_name: "Zeta".to_string(),
                semantic: SemanticType::String,
            },
            FieldDescriptor {
                api_name: "Mid__c".to_string(),
                semantic: SemanticType::TextArea,
            },
            FieldDescriptor {
                api_name: "Alpha".to_string(),
                semantic: SemanticType::String,
            },
        ];

        let candidates = filter_fields(&FieldKind::Text, fields.clone());

        let names: Vec<&str> = candidates.iter().map(|f| f.api_name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        for candidate in &candidates {
            assert!(fields.contains(candidate));
        }
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(filter_fields(&FieldKind::Text, vec![]).is_empty());
        assert!(filter_fields(&FieldKind::Image, vec![]).is_empty());
    }
}
