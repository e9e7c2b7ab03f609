use chrono::Utc;
use tracing::debug;
use crate::errors::ShiplensError;
use crate::models::Report;
use super::Database;

/// Fixed key under which the live report is stored.
pub const DASHBOARD_SNAPSHOT_KEY: &str = "dashboard_data";

impl Database {
    pub fn get_snapshot(&self, key: &str) -> Result<Option<String>, ShiplensError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM snapshots WHERE key = ?1")
            .map_err(|e| ShiplensError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ShiplensError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn put_snapshot(&self, key: &str, value: &str) -> Result<(), ShiplensError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        ).map_err(|e| ShiplensError::Database(format!("Insert failed: {}", e)))?;
        debug!(key, bytes = value.len(), "Snapshot written");
        Ok(())
    }

    pub fn delete_snapshot(&self, key: &str) -> Result<(), ShiplensError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM snapshots WHERE key = ?1", rusqlite::params![key])
            .map_err(|e| ShiplensError::Database(format!("Delete failed: {}", e)))?;
        Ok(())
    }

    /// The persisted report, if any. Malformed JSON is a `Json` error so the
    /// caller can decide to ignore it.
    pub fn load_report(&self) -> Result<Option<Report>, ShiplensError> {
        match self.get_snapshot(DASHBOARD_SNAPSHOT_KEY)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub fn save_report(&self, report: &Report) -> Result<(), ShiplensError> {
        let text = serde_json::to_string(report)?;
        self.put_snapshot(DASHBOARD_SNAPSHOT_KEY, &text)
    }

    pub fn clear_report(&self) -> Result<(), ShiplensError> {
        self.delete_snapshot(DASHBOARD_SNAPSHOT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn sample_report() -> Report {
        Report {
            analysis_title: "Lane Costs".into(),
            key_metrics: vec![Metric {
                label: "Avg Cost".into(),
                value: "$412".into(),
                is_new: true,
                ..Default::default()
            }],
            record_count: Some(88),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_round_trip() {
        let db = Database::in_memory().unwrap();
        assert!(db.load_report().unwrap().is_none());
        db.save_report(&sample_report()).unwrap();
        assert_eq!(db.load_report().unwrap(), Some(sample_report()));
    }

    #[test]
    fn test_snapshot_overwrite() {
        let db = Database::in_memory().unwrap();
        db.put_snapshot("k", "one").unwrap();
        db.put_snapshot("k", "two").unwrap();
        assert_eq!(db.get_snapshot("k").unwrap(), Some("two".to_string()));
    }

    #[test]
    fn test_clear_report() {
        let db = Database::in_memory().unwrap();
        db.save_report(&sample_report()).unwrap();
        db.clear_report().unwrap();
        assert!(db.load_report().unwrap().is_none());
        db.clear_report().unwrap();
    }

    #[test]
    fn test_corrupt_snapshot_is_json_error() {
        let db = Database::in_memory().unwrap();
        db.put_snapshot(DASHBOARD_SNAPSHOT_KEY, "{not json").unwrap();
        assert!(matches!(db.load_report(), Err(ShiplensError::Json(_))));
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shiplens.db");
        Database::new(&path).unwrap().save_report(&sample_report()).unwrap();
        let reopened = Database::new(&path).unwrap();
        assert_eq!(reopened.load_report().unwrap().unwrap().analysis_title, "Lane Costs");
    }
}
