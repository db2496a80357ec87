use crate::classifier::Classifier;
use crate::client::RecordStore;
use crate::config::Config;
use crate::error::Result;
use crate::types::LabelNames;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub scanned: usize,
    /// Writes issued (or, in dry-run mode, writes that would have been issued).
    pub updated: usize,
    pub unchanged: usize,
    /// Records in the terminal status, left untouched.
    pub skipped_done: usize,
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Fetch every record, classify it, and write back labels that changed.
///
/// Writes happen one at a time in fetch order. The first failed write aborts
/// the run; writes already applied stay applied.
pub struct Synchronizer<S> {
    store: S,
    collection_id: String,
    classifier: Classifier,
    labels: LabelNames,
    dry_run: bool,
}

impl<S: RecordStore> Synchronizer<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            collection_id: config.database_id.clone(),
            classifier: Classifier::from_config(config),
            labels: config.labels.clone(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    pub async fn run(&self) -> Result<SyncReport> {
        self.run_at(Utc::now()).await
    }

    /// Run with a fixed "now" shared by every record.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SyncReport> {
        let records = self.store.list_all(&self.collection_id).await?;
        let mut report = SyncReport {
            scanned: records.len(),
            dry_run: self.dry_run,
            ..SyncReport::default()
        };

        for record in &records {
            let Some(target) = self.classifier.classify_record(record, now) else {
                report.skipped_done += 1;
                continue;
            };

            let target_name = self.labels.name(target);
            if record.sla.as_deref() == Some(target_name) {
                report.unchanged += 1;
                continue;
            }

            info!(
                record = %record.id,
                from = record.sla.as_deref().unwrap_or("-"),
                to = target_name,
                label = %target,
                dry_run = self.dry_run,
                "updating SLA"
            );
            if !self.dry_run {
                self.store.update_label(&record.id, target_name).await?;
            }
            report.updated += 1;
        }

        info!(
            scanned = report.scanned,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped_done = report.skipped_done,
            "SLA sync complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlaError;
    use crate::record::Record;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// In-memory collection that applies writes to its own records.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<Record>>,
        writes: Mutex<Vec<(String, String)>>,
        fail_on: Option<String>,
    }

    impl MemoryStore {
        fn with(records: Vec<Record>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Default::default()
            }
        }

        fn writes(&self) -> Vec<(String, String)> {
            self.writes.lock().unwrap().clone()
        }

        fn clear_writes(&self) {
            self.writes.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn list_all(&self, collection_id: &str) -> Result<Vec<Record>> {
            assert_eq!(collection_id, "db1");
            Ok(self.records.lock().unwrap().clone())
        }

        async fn update_label(&self, record_id: &str, label_name: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(record_id) {
                return Err(SlaError::Api {
                    status: 500,
                    reason: "Internal Server Error".into(),
                    body: "boom".into(),
                });
            }
            let mut records = self.records.lock().unwrap();
            if let Some(r) = records.iter_mut().find(|r| r.id == record_id) {
                r.sla = Some(label_name.to_string());
            }
            self.writes
                .lock()
                .unwrap()
                .push((record_id.to_string(), label_name.to_string()));
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        // 2024-01-10T10:00 Europe/Istanbul
        Utc.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap()
    }

    fn record(id: &str, status: &str, due: Option<&str>, sla: Option<&str>) -> Record {
        Record {
            id: id.to_string(),
            status: Some(status.to_string()),
            due: due.map(str::to_string),
            sla: sla.map(str::to_string),
        }
    }

    fn scenario_records() -> Vec<Record> {
        vec![
            record("done", "Bitti", Some("2020-01-01"), Some("On Time")),
            record("no-due", "Devam", None, Some("On Time")),
            record("late", "Devam", Some("2024-01-09T23:00"), Some("On Time")),
            record("soon", "Devam", Some("2024-01-11T09:00"), Some("On Time")),
            record("later", "Devam", Some("2024-01-20T00:00"), Some("On Time")),
        ]
    }

    fn config() -> Config {
        Config::new("secret", "db1")
    }

    #[tokio::test]
    async fn writes_only_changed_labels() {
        let sync = Synchronizer::new(MemoryStore::with(scenario_records()), &config());
        let report = sync.run_at(now()).await.unwrap();

        assert_eq!(
            sync.store().writes(),
            vec![
                ("no-due".to_string(), "At Risk".to_string()),
                ("late".to_string(), "Breached".to_string()),
                ("soon".to_string(), "At Risk".to_string()),
            ]
        );
        assert_eq!(
            report,
            SyncReport {
                scanned: 5,
                updated: 3,
                unchanged: 1,
                skipped_done: 1,
                dry_run: false,
            }
        );
    }

    #[tokio::test]
    async fn done_records_keep_any_stored_label() {
        let records = vec![
            record("a", "Bitti", None, None),
            record("b", "Bitti", Some("2024-01-11T09:00"), Some("Breached")),
        ];
        let sync = Synchronizer::new(MemoryStore::with(records), &config());
        let report = sync.run_at(now()).await.unwrap();

        assert!(sync.store().writes().is_empty());
        assert_eq!(report.skipped_done, 2);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let sync = Synchronizer::new(MemoryStore::with(scenario_records()), &config());
        sync.run_at(now()).await.unwrap();
        sync.store().clear_writes();

        let report = sync.run_at(now()).await.unwrap();

        assert!(sync.store().writes().is_empty());
        assert_eq!(report.updated, 0);
        assert_eq!(report.unchanged, 4);
    }

    #[tokio::test]
    async fn write_failure_aborts_remaining_records() {
        let store = MemoryStore {
            fail_on: Some("late".to_string()),
            ..MemoryStore::with(scenario_records())
        };
        let sync = Synchronizer::new(store, &config());

        let err = sync.run_at(now()).await.unwrap_err();

        assert!(matches!(err, SlaError::Api { status: 500, .. }));
        // "no-due" was written before the failure; "soon" was never reached.
        assert_eq!(
            sync.store().writes(),
            vec![("no-due".to_string(), "At Risk".to_string())]
        );
    }

    #[tokio::test]
    async fn dry_run_counts_without_writing() {
        let sync =
            Synchronizer::new(MemoryStore::with(scenario_records()), &config()).dry_run(true);
        let report = sync.run_at(now()).await.unwrap();

        assert!(sync.store().writes().is_empty());
        assert_eq!(report.updated, 3);
        assert!(report.dry_run);
    }

    #[tokio::test]
    async fn compares_against_configured_label_names() {
        let mut cfg = config();
        cfg.labels.on_time = "Zamanında".into();
        cfg.labels.at_risk = "Riskte".into();
        cfg.labels.breached = "İhlal".into();
        let records = vec![
            record("later", "Devam", Some("2024-01-20T00:00"), Some("Zamanında")),
            record("late", "Devam", Some("2024-01-09T23:00"), Some("Zamanında")),
            // Stored in canonical English, so it is rewritten in the localized name.
            record("soon", "Devam", Some("2024-01-11T09:00"), Some("At Risk")),
        ];
        let sync = Synchronizer::new(MemoryStore::with(records), &cfg);
        sync.run_at(now()).await.unwrap();

        assert_eq!(
            sync.store().writes(),
            vec![
                ("late".to_string(), "İhlal".to_string()),
                ("soon".to_string(), "Riskte".to_string()),
            ]
        );
    }
}
