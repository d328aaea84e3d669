//! Mapping Engine - Reconciliation von Template-Inputs gegen den Mapping-Store
//!
//! Kern des Systems: berechnet pro Input die zulässigen Kandidaten-Felder,
//! hält den Arbeitszustand über nebenläufig laufende Remote-Lookups hinweg
//! und gleicht ihn beim Speichern idempotent (create-or-update) gegen den
//! Store ab. Fehler einzelner Inputs degradieren nur diesen Input bzw.
//! landen als Eintrag im aggregierten Save-Report.

use async_trait::async_trait;
use thiserror::Error;

use docbind_mapping_config::{
    selectable_templates, sort_by_label, FieldDescriptor, MappingRecord, ObjectDescriptor,
    Template,
};

pub mod controller;
pub mod filter;
pub mod reconcile;
pub mod state;

pub use controller::{
    CandidateRefresh, CandidateUpdate, HydrateTicket, HydratedInputs, PublishOutcome,
    SettingsController,
};
pub use filter::filter_fields;
pub use reconcile::{SaveAction, SaveFailure, SaveOutcome, SavePolicy, SaveReport, SaveStatus};
pub use state::{PersistedMappings, WorkingInput, WorkingState};

#[derive(Debug, Error)]
pub enum MappingEngineError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown input: {0}")]
    UnknownInput(String),

    #[error("Mapping lookup failed for input {input_id}: {reason}")]
    MappingLookupFailed { input_id: String, reason: String },

    #[error("Mapping write failed for input {input_id}: {reason}")]
    MappingWriteFailed { input_id: String, reason: String },
}

// ============================================================================
// Backend Traits - abstrahieren die Remote-Kollaborateure
// ============================================================================

/// Katalog der Dokument-Templates.
/// Wird einmal beim Start abgefragt; danach sind Template-Lookups lokal.
#[async_trait]
pub trait TemplateCatalog: Send + Sync {
    /// Listet alle Templates samt deklarierter Inputs auf
    async fn list_templates(&self) -> Result<Vec<Template>, MappingEngineError>;
}

/// Katalog der Business-Objekte und ihrer Felder.
#[async_trait]
pub trait ObjectCatalog: Send + Sync {
    /// Listet alle Objekte auf
    async fn list_objects(&self) -> Result<Vec<ObjectDescriptor>, MappingEngineError>;

    /// Listet die Felder eines Objekts samt semantischem Typ auf
    async fn list_object_fields(
        &self,
        object: &str,
    ) -> Result<Vec<FieldDescriptor>, MappingEngineError>;
}

/// Persistenz für Mapping-Records. Key ist (template_id, input_id),
/// höchstens ein lebender Record pro Key. Records werden nie gelöscht.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Alle Records eines Templates (Hydrate-Snapshot)
    async fn list_mappings(
        &self,
        template_id: &str,
    ) -> Result<Vec<MappingRecord>, MappingEngineError>;

    /// Punkt-Lookup; Ok(None) wenn kein Record existiert
    async fn get_mapping(
        &self,
        template_id: &str,
        input_id: &str,
    ) -> Result<Option<MappingRecord>, MappingEngineError>;

    /// Legt einen neuen Record an und vergibt die Id
    async fn create_mapping(
        &self,
        record: &MappingRecord,
    ) -> Result<MappingRecord, MappingEngineError>;

    /// Update in place; record.id muss gesetzt sein
    async fn update_mapping(
        &self,
        record: &MappingRecord,
    ) -> Result<MappingRecord, MappingEngineError>;
}

// ============================================================================
// SettingsUI Trait - abstrahiert Host-Feedback (Headless und Tests)
// ============================================================================

/// Trait für Host-Benachrichtigungen des Engines.
/// Der Host rendert daraus sein User-Feedback.
pub trait SettingsUI {
    /// Wird nach dem Laden des Template-Katalogs aufgerufen
    fn on_templates_loaded(&mut self, count: usize);

    /// Wird aufgerufen wenn ein Hydrate publiziert wurde
    fn on_hydrated(&mut self, template_id: &str, input_count: usize);

    /// Wird aufgerufen wenn die Kandidaten eines Inputs neu publiziert wurden
    fn on_candidates_updated(&mut self, input_id: &str, count: usize);

    /// Nicht-fatale Degradierung (Katalog nicht erreichbar o.ä.)
    fn on_warning(&mut self, msg: &str);

    /// Genau ein terminales Event pro Save-Versuch
    fn on_save_result(&mut self, report: &SaveReport);
}

/// Headless UI implementation using println!
pub struct HeadlessUI;

impl SettingsUI for HeadlessUI {
    fn on_templates_loaded(&mut self, count: usize) {
        println!("{} template(s) available for mapping", count);
    }

    fn on_hydrated(&mut self, template_id: &str, input_count: usize) {
        println!("Template {}: {} input(s)", template_id, input_count);
    }

    fn on_candidates_updated(&mut self, input_id: &str, count: usize) {
        println!("  {}: {} candidate field(s)", input_id, count);
    }

    fn on_warning(&mut self, msg: &str) {
        eprintln!("Warning: {}", msg);
    }

    fn on_save_result(&mut self, report: &SaveReport) {
        if report.ok {
            println!(
                "Saved {} mapping(s){}",
                report.saved,
                if report.skipped > 0 {
                    format!(" ({} skipped)", report.skipped)
                } else {
                    String::new()
                }
            );
        } else {
            eprintln!("Save finished with {} failure(s):", report.failures.len());
            for failure in &report.failures {
                eprintln!("  {}: {}", failure.input_id, failure.reason);
            }
        }
    }
}

// ============================================================================
// Katalog-Laden - degradiert bei Fehlern zu leeren Listen
// ============================================================================

/// Lädt die Templates. Nur Templates mit mindestens einem Input sind
/// wählbar; ein Katalogfehler degradiert zur leeren Liste.
pub async fn load_templates<T: TemplateCatalog, U: SettingsUI>(
    catalog: &T,
    ui: &mut U,
) -> Vec<Template> {
    match catalog.list_templates().await {
        Ok(templates) => {
            let templates = selectable_templates(templates);
            ui.on_templates_loaded(templates.len());
            templates
        }
        Err(err) => {
            ui.on_warning(&format!("Template catalog unavailable: {}", err));
            Vec::new()
        }
    }
}

/// Lädt die Objekte in Anzeige-Sortierung (Label, case-insensitive).
pub async fn load_objects<C: ObjectCatalog, U: SettingsUI>(
    catalog: &C,
    ui: &mut U,
) -> Vec<ObjectDescriptor> {
    match catalog.list_objects().await {
        Ok(mut objects) => {
            sort_by_label(&mut objects);
            objects
        }
        Err(err) => {
            ui.on_warning(&format!("Object catalog unavailable: {}", err));
            Vec::new()
        }
    }
}

// ============================================================================
// Test Utilities - exportiert für Integrationstests
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::*;
    use docbind_mapping_config::{FieldKind, SemanticType, TemplateInput};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Mock UI für Tests - zeichnet alle Events auf
    #[derive(Default)]
    pub struct MockUI {
        pub events: Vec<String>,
    }

    impl MockUI {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn warnings(&self) -> Vec<&String> {
            self.events.iter().filter(|e| e.starts_with("warning:")).collect()
        }
    }

    impl SettingsUI for MockUI {
        fn on_templates_loaded(&mut self, count: usize) {
            self.events.push(format!("templates_loaded:{}", count));
        }
        fn on_hydrated(&mut self, template_id: &str, input_count: usize) {
            self.events.push(format!("hydrated:{}:{}", template_id, input_count));
        }
        fn on_candidates_updated(&mut self, input_id: &str, count: usize) {
            self.events.push(format!("candidates:{}:{}", input_id, count));
        }
        fn on_warning(&mut self, msg: &str) {
            self.events.push(format!("warning:{}", msg));
        }
        fn on_save_result(&mut self, report: &SaveReport) {
            self.events.push(format!(
                "save:{}:{}:{}:{}",
                report.ok,
                report.saved,
                report.skipped,
                report.failures.len()
            ));
        }
    }

    /// Mock-Katalog für Templates, Objekte und Felder
    #[derive(Default)]
    pub struct MockCatalog {
        templates: Mutex<Vec<Template>>,
        objects: Mutex<Vec<ObjectDescriptor>>,
        fields: Mutex<HashMap<String, Vec<FieldDescriptor>>>,
        failing_objects: Mutex<HashSet<String>>,
        fail_templates: Mutex<bool>,
        field_calls: Mutex<Vec<String>>,
    }

    impl MockCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_template(&self, template: Template) {
            self.templates.lock().unwrap().push(template);
        }

        pub fn add_object(&self, object: ObjectDescriptor) {
            self.objects.lock().unwrap().push(object);
        }

        pub fn set_fields(&self, object: &str, fields: Vec<FieldDescriptor>) {
            self.fields.lock().unwrap().insert(object.to_string(), fields);
        }

        /// Lässt list_object_fields für dieses Objekt fehlschlagen
        pub fn fail_fields_for(&self, object: &str) {
            self.failing_objects.lock().unwrap().insert(object.to_string());
        }

        /// Lässt list_templates fehlschlagen
        pub fn fail_templates(&self) {
            *self.fail_templates.lock().unwrap() = true;
        }

        /// Welche Objekte nachgeschlagen wurden
        pub fn field_calls(&self) -> Vec<String> {
            self.field_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TemplateCatalog for MockCatalog {
        async fn list_templates(&self) -> Result<Vec<Template>, MappingEngineError> {
            if *self.fail_templates.lock().unwrap() {
                return Err(MappingEngineError::CatalogUnavailable(
                    "mock template catalog down".to_string(),
                ));
            }
            Ok(self.templates.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl ObjectCatalog for MockCatalog {
        async fn list_objects(&self) -> Result<Vec<ObjectDescriptor>, MappingEngineError> {
            Ok(self.objects.lock().unwrap().clone())
        }

        async fn list_object_fields(
            &self,
            object: &str,
        ) -> Result<Vec<FieldDescriptor>, MappingEngineError> {
            self.field_calls.lock().unwrap().push(object.to_string());

            if self.failing_objects.lock().unwrap().contains(object) {
                return Err(MappingEngineError::CatalogUnavailable(format!(
                    "mock field catalog down for {}",
                    object
                )));
            }

            Ok(self
                .fields
                .lock()
                .unwrap()
                .get(object)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Mock-Store - in-memory Mapping-Store mit Fehlerinjektion
    #[derive(Default)]
    pub struct MockStore {
        records: Mutex<Vec<MappingRecord>>,
        next_id: Mutex<u64>,
        create_calls: Mutex<Vec<MappingRecord>>,
        update_calls: Mutex<Vec<MappingRecord>>,
        failing_writes: Mutex<HashSet<String>>,
        failing_lookups: Mutex<HashSet<String>>,
        fail_list: Mutex<bool>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Legt einen Record direkt ab (vergibt eine Id falls keine da ist)
        pub fn insert(&self, mut record: MappingRecord) {
            if record.id.is_none() {
                record.id = Some(self.assign_id());
            }
            self.records.lock().unwrap().push(record);
        }

        pub fn records(&self) -> Vec<MappingRecord> {
            self.records.lock().unwrap().clone()
        }

        pub fn created(&self) -> Vec<MappingRecord> {
            self.create_calls.lock().unwrap().clone()
        }

        pub fn updated(&self) -> Vec<MappingRecord> {
            self.update_calls.lock().unwrap().clone()
        }

        /// Lässt create/update für diesen Input fehlschlagen
        pub fn fail_writes_for(&self, input_id: &str) {
            self.failing_writes.lock().unwrap().insert(input_id.to_string());
        }

        /// Lässt get_mapping für diesen Input fehlschlagen
        pub fn fail_lookups_for(&self, input_id: &str) {
            self.failing_lookups.lock().unwrap().insert(input_id.to_string());
        }

        /// Lässt list_mappings fehlschlagen
        pub fn fail_list(&self) {
            *self.fail_list.lock().unwrap() = true;
        }

        fn assign_id(&self) -> String {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("m{}", *next)
        }
    }

    #[async_trait]
    impl MappingStore for MockStore {
        async fn list_mappings(
            &self,
            template_id: &str,
        ) -> Result<Vec<MappingRecord>, MappingEngineError> {
            if *self.fail_list.lock().unwrap() {
                return Err(MappingEngineError::CatalogUnavailable(
                    "mock mapping store down".to_string(),
                ));
            }
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.template_id == template_id)
                .cloned()
                .collect())
        }

        async fn get_mapping(
            &self,
            template_id: &str,
            input_id: &str,
        ) -> Result<Option<MappingRecord>, MappingEngineError> {
            if self.failing_lookups.lock().unwrap().contains(input_id) {
                return Err(MappingEngineError::MappingLookupFailed {
                    input_id: input_id.to_string(),
                    reason: "mock lookup failure".to_string(),
                });
            }
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.key() == (template_id, input_id))
                .cloned())
        }

        async fn create_mapping(
            &self,
            record: &MappingRecord,
        ) -> Result<MappingRecord, MappingEngineError> {
            self.create_calls.lock().unwrap().push(record.clone());

            if self.failing_writes.lock().unwrap().contains(&record.input_id) {
                return Err(MappingEngineError::MappingWriteFailed {
                    input_id: record.input_id.clone(),
                    reason: "mock write failure".to_string(),
                });
            }

            let mut saved = record.clone();
            saved.id = Some(self.assign_id());
            self.records.lock().unwrap().push(saved.clone());
            Ok(saved)
        }

        async fn update_mapping(
            &self,
            record: &MappingRecord,
        ) -> Result<MappingRecord, MappingEngineError> {
            self.update_calls.lock().unwrap().push(record.clone());

            if self.failing_writes.lock().unwrap().contains(&record.input_id) {
                return Err(MappingEngineError::MappingWriteFailed {
                    input_id: record.input_id.clone(),
                    reason: "mock write failure".to_string(),
                });
            }

            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => {
                    *existing = record.clone();
                    Ok(record.clone())
                }
                None => Err(MappingEngineError::MappingWriteFailed {
                    input_id: record.input_id.clone(),
                    reason: "unknown mapping id".to_string(),
                }),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Baukasten für Testdaten
    // ------------------------------------------------------------------------

    pub fn text_input(id: &str) -> TemplateInput {
        TemplateInput {
            id: id.to_string(),
            internal_label: format!("{}_label", id),
            required: false,
            placeholder: format!("Enter {}", id),
            preferred_icon: "utility:text".to_string(),
            kind: FieldKind::Text,
        }
    }

    pub fn image_input(id: &str) -> TemplateInput {
        TemplateInput {
            id: id.to_string(),
            internal_label: format!("{}_label", id),
            required: false,
            placeholder: format!("Pick {}", id),
            preferred_icon: "utility:image".to_string(),
            kind: FieldKind::Image,
        }
    }

    pub fn template(id: &str, inputs: Vec<TemplateInput>) -> Template {
        Template {
            id: id.to_string(),
            label: format!("Template {}", id),
            inputs,
        }
    }

    pub fn string_field(api_name: &str) -> FieldDescriptor {
        FieldDescriptor {
            api_name: api_name.to_string(),
            semantic: SemanticType::String,
        }
    }

    pub fn textarea_field(api_name: &str) -> FieldDescriptor {
        FieldDescriptor {
            api_name: api_name.to_string(),
            semantic: SemanticType::TextArea,
        }
    }

    pub fn object(label: &str, api_name: &str) -> ObjectDescriptor {
        ObjectDescriptor {
            label: label.to_string(),
            api_name: api_name.to_string(),
        }
    }

    pub fn mapping_record(
        template_id: &str,
        input_id: &str,
        object: &str,
        field: &str,
    ) -> MappingRecord {
        MappingRecord {
            id: None,
            template_id: template_id.to_string(),
            input_id: input_id.to_string(),
            object_api_name: object.to_string(),
            field_api_name: field.to_string(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::*;

    #[tokio::test]
    async fn test_load_templates_filters_empty_templates() {
        let catalog = MockCatalog::new();
        catalog.add_template(template("t1", vec![text_input("i1")]));
        catalog.add_template(template("t2", vec![]));
        let mut ui = MockUI::new();

        let templates = load_templates(&catalog, &mut ui).await;

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "t1");
        assert!(ui.events.contains(&"templates_loaded:1".to_string()));
    }

    #[tokio::test]
    async fn test_load_templates_degrades_on_catalog_failure() {
        let catalog = MockCatalog::new();
        catalog.fail_templates();
        let mut ui = MockUI::new();

        let templates = load_templates(&catalog, &mut ui).await;

        assert!(templates.is_empty());
        assert_eq!(ui.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_load_objects_sorted_for_display() {
        let catalog = MockCatalog::new();
        catalog.add_object(object("contact", "Contact"));
        catalog.add_object(object("Account", "Account"));
        let mut ui = MockUI::new();

        let objects = load_objects(&catalog, &mut ui).await;

        assert_eq!(objects[0].api_name, "Account");
        assert_eq!(objects[1].api_name, "Contact");
    }

    #[tokio::test]
    async fn test_mock_store_uniqueness_per_key() {
        let store = MockStore::new();
        let created = store
            .create_mapping(&mapping_record("t1", "i1", "Account", "Name"))
            .await
            .unwrap();

        assert!(created.id.is_some());
        let found = store.get_mapping("t1", "i1").await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(store.get_mapping("t1", "i2").await.unwrap(), None);
    }
}
