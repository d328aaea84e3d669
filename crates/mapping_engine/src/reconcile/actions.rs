//! Actions und Ergebnis-Typen der Save-Reconciliation
//!
//! SaveAction beschreibt was der Executor tun soll, SaveOutcome was pro
//! Input tatsächlich passiert ist, SaveReport das aggregierte Ergebnis
//! eines Save-Versuchs.

use docbind_mapping_config::MappingRecord;

/// Policy für Inputs ohne vollständige Selektion beim Save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Unselektierte Inputs überspringen (Default)
    #[default]
    SkipUnselected,
    /// Unselektierte Inputs mit leeren Werten schreiben
    AttemptEmpty,
}

/// Die für einen Input berechnete Store-Operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    /// Neuen Record anlegen (record.id ist None)
    Create(MappingRecord),
    /// Existierenden Record in place aktualisieren (record.id gesetzt)
    Update(MappingRecord),
    /// Nichts schreiben (Policy SkipUnselected)
    Skip { input_id: String },
}

impl SaveAction {
    /// Erzeugt diese Aktion einen Store-Write?
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Update(_))
    }
}

/// Ergebnis der Save-Operation für einen einzelnen Input.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub input_id: String,
    pub status: SaveStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    /// Record wurde angelegt oder aktualisiert
    Saved(MappingRecord),
    /// Input wurde per Policy übersprungen
    Skipped,
    /// Lookup oder Write ist fehlgeschlagen
    Failed(String),
}

impl SaveOutcome {
    pub fn saved(input_id: String, record: MappingRecord) -> Self {
        Self {
            input_id,
            status: SaveStatus::Saved(record),
        }
    }

    pub fn skipped(input_id: String) -> Self {
        Self {
            input_id,
            status: SaveStatus::Skipped,
        }
    }

    pub fn failed(input_id: String, reason: String) -> Self {
        Self {
            input_id,
            status: SaveStatus::Failed(reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SaveStatus::Failed(_))
    }
}

/// Ein fehlgeschlagener Input im aggregierten Report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub input_id: String,
    pub reason: String,
}

/// Das aggregierte Ergebnis eines Save-Versuchs.
///
/// ok ist nur dann true, wenn keine einzige Operation fehlgeschlagen ist.
/// Übersprungene Inputs zählen nicht als Fehler.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub ok: bool,
    pub saved: usize,
    pub skipped: usize,
    pub failures: Vec<SaveFailure>,
}

impl SaveReport {
    pub fn from_outcomes(outcomes: Vec<SaveOutcome>) -> Self {
        let mut saved = 0;
        let mut skipped = 0;
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome.status {
                SaveStatus::Saved(_) => saved += 1,
                SaveStatus::Skipped => skipped += 1,
                SaveStatus::Failed(reason) => failures.push(SaveFailure {
                    input_id: outcome.input_id,
                    reason,
                }),
            }
        }

        Self {
            ok: failures.is_empty(),
            saved,
            skipped,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(input_id: &str) -> MappingRecord {
        MappingRecord {
            id: Some("m1".to_string()),
            template_id: "t1".to_string(),
            input_id: input_id.to_string(),
            object_api_name: "Account".to_string(),
            field_api_name: "Name".to_string(),
        }
    }

    #[test]
    fn test_save_action_is_write() {
        assert!(SaveAction::Create(record("i1")).is_write());
        assert!(SaveAction::Update(record("i1")).is_write());
        assert!(!SaveAction::Skip {
            input_id: "i1".to_string()
        }
        .is_write());
    }

    #[test]
    fn test_report_all_saved() {
        let report = SaveReport::from_outcomes(vec![
            SaveOutcome::saved("i1".to_string(), record("i1")),
            SaveOutcome::saved("i2".to_string(), record("i2")),
        ]);

        assert!(report.ok);
        assert_eq!(report.saved, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_report_skips_are_not_failures() {
        let report = SaveReport::from_outcomes(vec![
            SaveOutcome::saved("i1".to_string(), record("i1")),
            SaveOutcome::skipped("i2".to_string()),
        ]);

        assert!(report.ok);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_report_single_failure_flips_ok() {
        let report = SaveReport::from_outcomes(vec![
            SaveOutcome::saved("i1".to_string(), record("i1")),
            SaveOutcome::failed("i2".to_string(), "store down".to_string()),
        ]);

        assert!(!report.ok);
        assert_eq!(report.saved, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].input_id, "i2");
        assert_eq!(report.failures[0].reason, "store down");
    }

    #[test]
    fn test_report_empty_batch_is_ok() {
        let report = SaveReport::from_outcomes(vec![]);

        assert!(report.ok);
        assert_eq!(report.saved, 0);
    }

    #[test]
    fn test_default_policy_is_skip_unselected() {
        assert_eq!(SavePolicy::default(), SavePolicy::SkipUnselected);
    }
}
