//! SettingsController - orchestriert Hydrate, Edits und Save
//!
//! Ein logischer Kontrollfaden; Suspension nur an Remote-Grenzen. Pro
//! Zyklus werden die Remote-Lookups aller Inputs nebenläufig gestartet
//! und erst publiziert wenn alle settled sind (Latenz = langsamster
//! Lookup, kein partieller Zwischenzustand sichtbar). Verspätete
//! Ergebnisse eines überholten Hydrates werden über die Generation
//! verworfen, verspätete Kandidaten-Fetches über die Input-Revision.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::controller::executor::execute_save;
use crate::filter::filter_fields;
use crate::reconcile::{SavePolicy, SaveReport};
use crate::state::{PersistedMappings, WorkingInput, WorkingState};
use crate::{MappingEngineError, MappingStore, ObjectCatalog, SettingsUI};
use docbind_mapping_config::{
    FieldDescriptor, FieldKind, MappingRecord, ObjectDescriptor, Template, TemplateInput,
};

/// Ergebnis eines Publish-Versuchs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Der Zustand wurde übernommen
    Published,
    /// Das Ergebnis war überholt und wurde verworfen
    Discarded,
}

/// Ticket für ein begonnenes Hydrate. Bindet das Ergebnis an die
/// Generation, unter der es gestartet wurde.
#[derive(Debug, Clone)]
pub struct HydrateTicket {
    pub template: Template,
    pub generation: u64,
}

/// Das settled Ergebnis eines Hydrates, noch nicht publiziert.
#[derive(Debug, Clone)]
pub struct HydratedInputs {
    pub template_id: String,
    pub generation: u64,
    pub inputs: Vec<WorkingInput>,
    pub warnings: Vec<String>,
}

/// Ticket für einen laufenden Kandidaten-Refresh nach einem Objektwechsel.
#[derive(Debug, Clone)]
pub struct CandidateRefresh {
    pub input_id: String,
    pub object: String,
    pub kind: FieldKind,
    pub revision: u64,
    pub generation: u64,
}

/// Das settled Ergebnis eines Kandidaten-Refreshs.
#[derive(Debug, Clone)]
pub struct CandidateUpdate {
    pub input_id: String,
    pub revision: u64,
    pub generation: u64,
    pub fields: Vec<FieldDescriptor>,
    pub warning: Option<String>,
}

/// Der Controller für die Mapping-Konfiguration eines Templates.
pub struct SettingsController<C: ObjectCatalog, S: MappingStore, U: SettingsUI> {
    catalog: Arc<C>,
    store: Arc<S>,
    /// Bereits auf mappbare Templates gefiltert (mindestens ein Input)
    templates: Vec<Template>,
    objects: Vec<ObjectDescriptor>,
    working: WorkingState,
    /// Wird bei jeder Template-Wahl erhöht; Publish prüft dagegen
    generation: u64,
    policy: SavePolicy,
    ui: U,
}

impl<C: ObjectCatalog, S: MappingStore, U: SettingsUI> SettingsController<C, S, U> {
    pub fn new(
        catalog: Arc<C>,
        store: Arc<S>,
        templates: Vec<Template>,
        objects: Vec<ObjectDescriptor>,
        ui: U,
    ) -> Self {
        Self {
            catalog,
            store,
            templates,
            objects,
            working: WorkingState::default(),
            generation: 0,
            policy: SavePolicy::default(),
            ui,
        }
    }

    pub fn with_policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn objects(&self) -> &[ObjectDescriptor] {
        &self.objects
    }

    /// Der aktuelle Arbeitszustand (immutable Snapshot für den Host).
    pub fn working(&self) -> &WorkingState {
        &self.working
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    // ------------------------------------------------------------------------
    // Hydrate
    // ------------------------------------------------------------------------

    /// Beginnt die Wahl eines Templates. Der Lookup ist lokal, weil die
    /// Templates einmal beim Start geladen wurden.
    pub fn begin_select(&mut self, template_id: &str) -> Result<HydrateTicket, MappingEngineError> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id == template_id)
            .cloned()
            .ok_or_else(|| MappingEngineError::UnknownTemplate(template_id.to_string()))?;

        self.generation += 1;
        Ok(HydrateTicket {
            template,
            generation: self.generation,
        })
    }

    /// Löst alle Inputs des Templates auf; wartet bis jeder Lookup
    /// settled ist. Publiziert nichts.
    pub async fn run_hydrate(&self, ticket: &HydrateTicket) -> HydratedInputs {
        hydrate_inputs(
            self.catalog.as_ref(),
            self.store.as_ref(),
            &ticket.template,
            ticket.generation,
        )
        .await
    }

    /// Übernimmt ein Hydrate-Ergebnis atomar, sofern es nicht von einer
    /// späteren Template-Wahl überholt wurde.
    pub fn publish_hydrated(&mut self, hydrated: HydratedInputs) -> PublishOutcome {
        if hydrated.generation != self.generation {
            return PublishOutcome::Discarded;
        }

        for warning in &hydrated.warnings {
            self.ui.on_warning(warning);
        }
        self.ui.on_hydrated(&hydrated.template_id, hydrated.inputs.len());

        self.working = WorkingState::new(hydrated.template_id, hydrated.inputs);
        PublishOutcome::Published
    }

    /// Komfort-Variante: begin + run + publish in einem Schritt.
    pub async fn select_template(
        &mut self,
        template_id: &str,
    ) -> Result<PublishOutcome, MappingEngineError> {
        let ticket = self.begin_select(template_id)?;
        let hydrated = self.run_hydrate(&ticket).await;
        Ok(self.publish_hydrated(hydrated))
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Setzt das Feld eines Inputs. Rein lokal, kein Remote-Call.
    pub fn set_field(&mut self, input_id: &str, field: &str) -> Result<(), MappingEngineError> {
        let updated = self
            .working
            .with_updated(input_id, |w| {
                w.selected_field = Some(field.to_string());
            })
            .ok_or_else(|| MappingEngineError::UnknownInput(input_id.to_string()))?;

        self.working = updated;
        Ok(())
    }

    /// Wechselt das Objekt eines Inputs. Das Feld wird sofort geleert,
    /// weil ein Feld des alten Objekts für das neue nie gültig ist; die
    /// Kandidaten werden asynchron nachgeladen.
    pub fn begin_set_object(
        &mut self,
        input_id: &str,
        object: &str,
    ) -> Result<CandidateRefresh, MappingEngineError> {
        let current = self
            .working
            .find(input_id)
            .ok_or_else(|| MappingEngineError::UnknownInput(input_id.to_string()))?;
        let kind = current.input.kind.clone();
        let revision = current.revision + 1;

        let updated = self
            .working
            .with_updated(input_id, |w| {
                w.selected_object = Some(object.to_string());
                w.selected_field = None;
                w.candidate_fields = Vec::new();
                w.revision = revision;
            })
            .ok_or_else(|| MappingEngineError::UnknownInput(input_id.to_string()))?;
        self.working = updated;

        Ok(CandidateRefresh {
            input_id: input_id.to_string(),
            object: object.to_string(),
            kind,
            revision,
            generation: self.generation,
        })
    }

    /// Lädt und filtert die Kandidaten für einen Refresh. Ein
    /// Katalogfehler degradiert zu leeren Kandidaten plus Warnung.
    pub async fn fetch_candidates(&self, refresh: &CandidateRefresh) -> CandidateUpdate {
        match self.catalog.list_object_fields(&refresh.object).await {
            Ok(fields) => CandidateUpdate {
                input_id: refresh.input_id.clone(),
                revision: refresh.revision,
                generation: refresh.generation,
                fields: filter_fields(&refresh.kind, fields),
                warning: None,
            },
            Err(err) => CandidateUpdate {
                input_id: refresh.input_id.clone(),
                revision: refresh.revision,
                generation: refresh.generation,
                fields: Vec::new(),
                warning: Some(format!(
                    "Field catalog unavailable for {}: {}",
                    refresh.object, err
                )),
            },
        }
    }

    /// Publiziert die Kandidaten genau eines Inputs. Ergebnisse mit
    /// überholter Generation oder Revision werden verworfen, damit ein
    /// langsamer Fetch einen späteren Objektwechsel nicht überschreibt.
    pub fn apply_candidates(&mut self, update: CandidateUpdate) -> PublishOutcome {
        let CandidateUpdate {
            input_id,
            revision,
            generation,
            fields,
            warning,
        } = update;

        if generation != self.generation {
            return PublishOutcome::Discarded;
        }
        match self.working.find(&input_id) {
            Some(current) if current.revision == revision => {}
            _ => return PublishOutcome::Discarded,
        }

        if let Some(warning) = &warning {
            self.ui.on_warning(warning);
        }

        let count = fields.len();
        match self.working.with_updated(&input_id, |w| {
            w.candidate_fields = fields;
        }) {
            Some(updated) => {
                self.working = updated;
                self.ui.on_candidates_updated(&input_id, count);
                PublishOutcome::Published
            }
            None => PublishOutcome::Discarded,
        }
    }

    /// Komfort-Variante: Objektwechsel samt Kandidaten-Refresh.
    pub async fn select_object(
        &mut self,
        input_id: &str,
        object: &str,
    ) -> Result<PublishOutcome, MappingEngineError> {
        let refresh = self.begin_set_object(input_id, object)?;
        let update = self.fetch_candidates(&refresh).await;
        Ok(self.apply_candidates(update))
    }

    // ------------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------------

    /// Speichert alle Inputs des aktiven Templates.
    ///
    /// Alle Inputs werden nebenläufig und unabhängig versucht; der Report
    /// wird erst gebaut wenn jede Operation settled ist, und genau einmal
    /// an den Host gemeldet.
    pub async fn save(&mut self) -> SaveReport {
        let outcomes = join_all(
            self.working
                .inputs
                .iter()
                .map(|w| execute_save(self.store.as_ref(), w, self.policy)),
        )
        .await;

        let report = SaveReport::from_outcomes(outcomes);
        self.ui.on_save_result(&report);
        report
    }
}

// ============================================================================
// Hydrate-Auflösung
// ============================================================================

/// Löst alle Inputs eines Templates nebenläufig auf. Die Reihenfolge des
/// Ergebnisses ist die deklarierte Input-Reihenfolge des Templates,
/// unabhängig von der Completion-Reihenfolge der Lookups.
async fn hydrate_inputs<C: ObjectCatalog, S: MappingStore>(
    catalog: &C,
    store: &S,
    template: &Template,
    generation: u64,
) -> HydratedInputs {
    let mut warnings = Vec::new();

    let persisted = match store.list_mappings(&template.id).await {
        Ok(records) => PersistedMappings::new(records),
        Err(err) => {
            // Degradiert das gesamte Hydrate zu leeren Selektionen statt
            // abzubrechen; der Operator kann neu mappen
            warnings.push(format!(
                "Existing mappings unavailable for template {}: {}",
                template.id, err
            ));
            PersistedMappings::default()
        }
    };

    let resolutions = join_all(template.inputs.iter().map(|input| {
        let record = persisted.find_for_input(&input.id).cloned();
        resolve_input(catalog, &template.id, input.clone(), record)
    }))
    .await;

    let mut inputs = Vec::with_capacity(resolutions.len());
    for (working, warning) in resolutions {
        if let Some(warning) = warning {
            warnings.push(warning);
        }
        inputs.push(working);
    }

    HydratedInputs {
        template_id: template.id.clone(),
        generation,
        inputs,
        warnings,
    }
}

/// Löst einen einzelnen Input auf. Ohne persistierten Record gibt es
/// keinen Remote-Call. Ein fehlgeschlagener Feld-Lookup degradiert nur
/// diesen Input: Selektion bleibt erhalten, Kandidaten bleiben leer.
async fn resolve_input<C: ObjectCatalog>(
    catalog: &C,
    template_id: &str,
    input: TemplateInput,
    record: Option<MappingRecord>,
) -> (WorkingInput, Option<String>) {
    let record = match record {
        // Leere Records (AttemptEmpty-Policy) tragen keine Selektion
        Some(record) if !record.object_api_name.is_empty() => record,
        _ => return (WorkingInput::unmapped(template_id, input), None),
    };

    match catalog.list_object_fields(&record.object_api_name).await {
        Ok(fields) => {
            let candidates = filter_fields(&input.kind, fields);
            (
                WorkingInput {
                    template_id: template_id.to_string(),
                    selected_object: Some(record.object_api_name),
                    selected_field: Some(record.field_api_name),
                    candidate_fields: candidates,
                    revision: 0,
                    input,
                },
                None,
            )
        }
        Err(err) => {
            let warning = format!(
                "Field catalog unavailable for {}: {}",
                record.object_api_name, err
            );
            (
                WorkingInput {
                    template_id: template_id.to_string(),
                    selected_object: Some(record.object_api_name),
                    selected_field: Some(record.field_api_name),
                    candidate_fields: Vec::new(),
                    revision: 0,
                    input,
                },
                Some(warning),
            )
        }
    }
}
