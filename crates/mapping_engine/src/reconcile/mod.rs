//! Reconcile Module - Pure Function für die Save-Reconciliation
//!
//! save_action() berechnet pro Input, welche Store-Operation nötig ist,
//! um vom persistierten Zustand zur aktuellen Selektion zu gelangen.
//!
//! Die Funktion ist eine **pure function**:
//! - Keine Side Effects
//! - Deterministisch
//! - Perfekt testbar ohne Mocks

mod actions;

pub use actions::{SaveAction, SaveFailure, SaveOutcome, SavePolicy, SaveReport, SaveStatus};

use crate::state::WorkingInput;
use docbind_mapping_config::MappingRecord;

/// Berechnet die Save-Aktion für einen einzelnen Input.
///
/// Existiert bereits ein Record für den Key (template_id, input_id), wird
/// er in place aktualisiert (idempotent, nie dupliziert); sonst wird neu
/// angelegt. Inputs ohne vollständige Selektion werden je nach Policy
/// übersprungen oder mit leeren Werten geschrieben.
pub fn save_action(
    working: &WorkingInput,
    existing: Option<&MappingRecord>,
    policy: SavePolicy,
) -> SaveAction {
    if !working.is_selected() && policy == SavePolicy::SkipUnselected {
        return SaveAction::Skip {
            input_id: working.input_id().to_string(),
        };
    }

    let record = MappingRecord {
        id: existing.and_then(|e| e.id.clone()),
        template_id: working.template_id.clone(),
        input_id: working.input_id().to_string(),
        object_api_name: working.selected_object.clone().unwrap_or_default(),
        field_api_name: working.selected_field.clone().unwrap_or_default(),
    };

    // Ein existierender Record ohne Id kann nicht adressiert werden und
    // wird wie ein fehlender behandelt
    match record.id {
        Some(_) => SaveAction::Update(record),
        None => SaveAction::Create(record),
    }
}
