//! Working State - Arbeitszustand der Input-Selektionen
//!
//! Der WorkingState ist der einzige veränderliche geteilte Zustand des
//! Engines. Hydrate ersetzt ihn als Ganzes, Edits erzeugen einen
//! Copy-on-Write-Snapshot mit genau einem geänderten Eintrag. Zugriff
//! läuft immer über die Input-Id, nie über die Array-Position, weil im
//! Hintergrund noch Lookups für andere Inputs laufen können.

use docbind_mapping_config::{FieldDescriptor, TemplateInput};

/// Transiente Sicht auf einen Template-Input samt aktueller Selektion.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingInput {
    pub input: TemplateInput,
    pub template_id: String,
    pub selected_object: Option<String>,
    pub selected_field: Option<String>,
    /// Kandidaten für das aktuell selektierte Objekt, bereits gefiltert
    pub candidate_fields: Vec<FieldDescriptor>,
    /// Wird bei jedem Objektwechsel erhöht; verspätete Kandidaten-Fetches
    /// mit alter Revision werden verworfen
    pub revision: u64,
}

impl WorkingInput {
    /// Input ohne Selektion und ohne Kandidaten.
    pub fn unmapped(template_id: &str, input: TemplateInput) -> Self {
        Self {
            input,
            template_id: template_id.to_string(),
            selected_object: None,
            selected_field: None,
            candidate_fields: Vec::new(),
            revision: 0,
        }
    }

    pub fn input_id(&self) -> &str {
        &self.input.id
    }

    /// Vollständige Selektion: Objekt und Feld gewählt.
    pub fn is_selected(&self) -> bool {
        self.selected_object.is_some() && self.selected_field.is_some()
    }
}

/// Der Arbeitszustand für das aktive Template.
///
/// Die Input-Reihenfolge ist die deklarierte Reihenfolge des Templates,
/// unabhängig davon in welcher Reihenfolge Remote-Lookups fertig wurden.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkingState {
    pub template_id: String,
    pub inputs: Vec<WorkingInput>,
}

impl WorkingState {
    pub fn new(template_id: String, inputs: Vec<WorkingInput>) -> Self {
        Self { template_id, inputs }
    }

    pub fn find(&self, input_id: &str) -> Option<&WorkingInput> {
        self.inputs.iter().find(|w| w.input_id() == input_id)
    }

    /// Copy-on-Write: neuer Snapshot mit genau einem geänderten Eintrag.
    /// None wenn die Input-Id unbekannt ist.
    pub fn with_updated(
        &self,
        input_id: &str,
        update: impl FnOnce(&mut WorkingInput),
    ) -> Option<WorkingState> {
        let position = self.inputs.iter().position(|w| w.input_id() == input_id)?;

        let mut snapshot = self.clone();
        update(&mut snapshot.inputs[position]);
        Some(snapshot)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbind_mapping_config::FieldKind;

    fn input(id: &str) -> TemplateInput {
        TemplateInput {
            id: id.to_string(),
            internal_label: id.to_string(),
            required: false,
            placeholder: String::new(),
            preferred_icon: String::new(),
            kind: FieldKind::Text,
        }
    }

    fn state() -> WorkingState {
        WorkingState::new(
            "t1".to_string(),
            vec![
                WorkingInput::unmapped("t1", input("i1")),
                WorkingInput::unmapped("t1", input("i2")),
            ],
        )
    }

    #[test]
    fn test_unmapped_has_no_selection() {
        let working = WorkingInput::unmapped("t1", input("i1"));

        assert!(!working.is_selected());
        assert!(working.candidate_fields.is_empty());
        assert_eq!(working.revision, 0);
    }

    #[test]
    fn test_find_by_input_id() {
        let state = state();

        assert_eq!(state.find("i2").map(|w| w.input_id()), Some("i2"));
        assert!(state.find("i3").is_none());
    }

    #[test]
    fn test_with_updated_changes_single_entry() {
        let state = state();

        let updated = state
            .with_updated("i2", |w| {
                w.selected_object = Some("Account".to_string());
            })
            .unwrap();

        assert_eq!(updated.find("i2").unwrap().selected_object.as_deref(), Some("Account"));
        // Der alte Snapshot bleibt unberührt
        assert_eq!(state.find("i2").unwrap().selected_object, None);
        assert_eq!(updated.find("i1").unwrap(), state.find("i1").unwrap());
    }

    #[test]
    fn test_with_updated_unknown_input() {
        assert!(state().with_updated("i9", |_| {}).is_none());
    }

    #[test]
    fn test_partial_selection_is_not_selected() {
        let updated = state()
            .with_updated("i1", |w| {
                w.selected_object = Some("Account".to_string());
            })
            .unwrap();

        assert!(!updated.find("i1").unwrap().is_selected());

        let complete = updated
            .with_updated("i1", |w| {
                w.selected_field = Some("Name".to_string());
            })
            .unwrap();

        assert!(complete.find("i1").unwrap().is_selected());
    }
}
