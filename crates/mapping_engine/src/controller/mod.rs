//! Controller Module - Orchestrierung von Hydrate, Edits und Save
//!
//! Der SettingsController führt den Zyklus aus:
//! 1. Template wählen und Arbeitszustand hydrieren
//! 2. Operator-Edits anwenden (Objekt/Feld pro Input)
//! 3. Save: pro Input Punkt-Lookup, Aktion berechnen, ausführen
//! 4. Aggregiertes Ergebnis an den Host melden

pub mod executor;
pub mod settings_controller;

pub use executor::execute_save;
pub use settings_controller::{
    CandidateRefresh, CandidateUpdate, HydrateTicket, HydratedInputs, PublishOutcome,
    SettingsController,
};
