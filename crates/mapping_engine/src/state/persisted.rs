//! Persisted Mappings - Hydrate-Snapshot des Mapping-Stores
//!
//! Nur für das Hydrate relevant; beim Save macht der Executor pro Input
//! einen frischen Punkt-Lookup, weil Records seit dem Laden von einer
//! anderen Session angelegt worden sein können.

use docbind_mapping_config::MappingRecord;

/// Die persistierten Records eines Templates zum Hydrate-Zeitpunkt.
#[derive(Debug, Clone, Default)]
pub struct PersistedMappings {
    records: Vec<MappingRecord>,
}

impl PersistedMappings {
    pub fn new(records: Vec<MappingRecord>) -> Self {
        Self { records }
    }

    /// Der Record für eine Input-Id. Die Key-Eindeutigkeit garantiert
    /// höchstens einen Treffer; bei verletztem Invariant gewinnt der erste.
    pub fn find_for_input(&self, input_id: &str) -> Option<&MappingRecord> {
        self.records.iter().find(|r| r.input_id == input_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(input_id: &str, object: &str) -> MappingRecord {
        MappingRecord {
            id: Some(format!("m-{}", input_id)),
            template_id: "t1".to_string(),
            input_id: input_id.to_string(),
            object_api_name: object.to_string(),
            field_api_name: "Name".to_string(),
        }
    }

    #[test]
    fn test_find_for_input() {
        let persisted =
            PersistedMappings::new(vec![record("i1", "Account"), record("i2", "Contact")]);

        assert_eq!(
            persisted.find_for_input("i2").map(|r| r.object_api_name.as_str()),
            Some("Contact")
        );
        assert!(persisted.find_for_input("i3").is_none());
    }

    #[test]
    fn test_empty_snapshot() {
        let persisted = PersistedMappings::default();

        assert!(persisted.is_empty());
        assert_eq!(persisted.len(), 0);
        assert!(persisted.find_for_input("i1").is_none());
    }
}
