use civicmap_shared::models::{ReportPin, Status};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const REPORTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("reports");

/// A report as persisted: the engine's pin snapshot plus bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    #[serde(flatten)]
    pub pin: ReportPin,
    pub reported_at: String,
    pub updated_at: String,
}

impl ReportRecord {
    pub fn new(pin: ReportPin) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        ReportRecord {
            pin,
            reported_at: now.clone(),
            updated_at: now,
        }
    }
}

pub struct Storage {
    db: Database,
    path: PathBuf,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, String> {
        let db = Database::create(path)
            .map_err(|e| format!("Failed to open database at {}: {}", path.display(), e))?;

        // Ensure table exists
        let write_txn = db.begin_write().map_err(|e| e.to_string())?;
        {
            write_txn
                .open_table(REPORTS_TABLE)
                .map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;

        Ok(Arc::new(Storage {
            db,
            path: path.to_path_buf(),
        }))
    }

    pub fn save_report(&self, record: &ReportRecord) -> Result<(), String> {
        let json = serde_json::to_vec(record).map_err(|e| e.to_string())?;

        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        {
            let mut table = write_txn.open_table(REPORTS_TABLE).map_err(|e| e.to_string())?;
            table
                .insert(record.pin.id.as_str(), json.as_slice())
                .map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn get_report(&self, id: &str) -> Result<Option<ReportRecord>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(REPORTS_TABLE).map_err(|e| e.to_string())?;

        match table.get(id).map_err(|e| e.to_string())? {
            Some(value) => {
                let record = serde_json::from_slice(value.value()).map_err(|e| e.to_string())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// All stored reports, ordered by id.
    pub fn list_reports(&self) -> Result<Vec<ReportRecord>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(REPORTS_TABLE).map_err(|e| e.to_string())?;

        let mut records = Vec::new();
        for entry in table.iter().map_err(|e| e.to_string())? {
            let (_, value) = entry.map_err(|e| e.to_string())?;
            records.push(serde_json::from_slice(value.value()).map_err(|e| e.to_string())?);
        }
        Ok(records)
    }

    /// Pin snapshots for the engine.
    pub fn list_pins(&self) -> Result<Vec<ReportPin>, String> {
        Ok(self.list_reports()?.into_iter().map(|r| r.pin).collect())
    }

    /// Read, change and write back inside one write transaction, so a delete
    /// committed by another caller is never overwritten by a stale copy.
    pub fn update_status(&self, id: &str, status: Status) -> Result<Option<ReportRecord>, String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        let updated = {
            let mut table = write_txn.open_table(REPORTS_TABLE).map_err(|e| e.to_string())?;
            let existing: Option<ReportRecord> = match table.get(id).map_err(|e| e.to_string())? {
                Some(value) => Some(serde_json::from_slice(value.value()).map_err(|e| e.to_string())?),
                None => None,
            };
            match existing {
                Some(mut record) => {
                    record.pin.status = status;
                    record.updated_at = chrono::Utc::now().to_rfc3339();
                    let json = serde_json::to_vec(&record).map_err(|e| e.to_string())?;
                    table.insert(id, json.as_slice()).map_err(|e| e.to_string())?;
                    Some(record)
                }
                None => None,
            }
        };
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(updated)
    }

    pub fn count_reports(&self) -> Result<u64, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(REPORTS_TABLE).map_err(|e| e.to_string())?;
        table.len().map_err(|e| e.to_string())
    }

    pub fn db_size_bytes(&self) -> Result<u64, String> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| e.to_string())
    }

    pub fn delete_report(&self, id: &str) -> Result<bool, String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        let removed = {
            let mut table = write_txn.open_table(REPORTS_TABLE).map_err(|e| e.to_string())?;
            let result = table.remove(id).map_err(|e| e.to_string())?;
            result.is_some()
        };
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(removed)
    }

    /// Insert `pins` only when the store is empty. Returns how many were written.
    pub fn seed_if_empty(&self, pins: &[ReportPin]) -> Result<usize, String> {
        if self.count_reports()? > 0 {
            return Ok(0);
        }
        for pin in pins {
            self.save_report(&ReportRecord::new(pin.clone()))?;
        }
        Ok(pins.len())
    }
}
