//! Save Executor - führt die pro Input berechnete Save-Aktion aus
//!
//! Jeder Input wird unabhängig behandelt: frischer Punkt-Lookup, reine
//! Aktionsberechnung, Create oder Update. Der Fehler eines Inputs bricht
//! die Geschwister nie ab; jedes Ergebnis wird als SaveOutcome
//! aufgezeichnet (all-attempted Batch, keine Transaktion).

use crate::reconcile::{save_action, SaveAction, SaveOutcome, SavePolicy};
use crate::state::WorkingInput;
use crate::MappingStore;

/// Führt den Save für einen einzelnen Input aus.
pub async fn execute_save<S: MappingStore>(
    store: &S,
    working: &WorkingInput,
    policy: SavePolicy,
) -> SaveOutcome {
    let input_id = working.input_id().to_string();

    // Punkt-Lookup statt Hydrate-Snapshot: der Record kann seit dem Laden
    // von einer anderen Session angelegt worden sein
    let existing = match store.get_mapping(&working.template_id, &input_id).await {
        Ok(existing) => existing,
        Err(err) => return SaveOutcome::failed(input_id, err.to_string()),
    };

    match save_action(working, existing.as_ref(), policy) {
        SaveAction::Skip { input_id } => SaveOutcome::skipped(input_id),
        SaveAction::Create(record) => match store.create_mapping(&record).await {
            Ok(saved) => SaveOutcome::saved(input_id, saved),
            Err(err) => SaveOutcome::failed(input_id, err.to_string()),
        },
        SaveAction::Update(record) => match store.update_mapping(&record).await {
            Ok(saved) => SaveOutcome::saved(input_id, saved),
            Err(err) => SaveOutcome::failed(input_id, err.to_string()),
        },
    }
}
