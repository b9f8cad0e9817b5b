// 📒 History Ledger - append-only CSV of committed tallies
// One row per saved cart. Rows are immutable; the only delete is a full erase.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const HISTORY_FILE: &str = "history.csv";

/// One committed tally. Column order is the wire format:
/// `datetime,count,subtotal,tax_rate,total,memo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// "YYYY-MM-DD HH:MM:SS", local time at commit
    pub datetime: String,

    /// Number of prices in the cart when saved
    #[serde(deserialize_with = "lenient_usize")]
    pub count: usize,

    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub tax_rate: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub total: f64,

    /// Free-text label (store / category / items). Rows written before the
    /// memo column existed read back as "".
    #[serde(default)]
    pub memo: String,
}

// CSV cells are strings; an unparseable number repairs to zero instead of
// failing the whole row.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(0.0))
}

fn lenient_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(0))
}

/// Append-only CSV store rooted at an injected data directory.
/// Single-process, single-writer; no locking.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    dir: PathBuf,
    path: PathBuf,
}

impl HistoryLedger {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let dir = base_dir.into();
        let path = dir.join(HISTORY_FILE);
        HistoryLedger { dir, path }
    }

    /// Path of the backing file (for export / download).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header row first if the file is new.
    /// Existing rows are never touched.
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data dir {}", self.dir.display()))?;

        let is_new = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);

        writer.serialize(record).context("Failed to write history row")?;
        writer.flush().context("Failed to flush history file")?;

        Ok(())
    }

    /// Read every record in file order. An absent file is an empty history,
    /// not an error. Legacy rows without a memo column get `memo = ""`.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: HistoryRecord = row.context("Failed to parse history row")?;
            records.push(record);
        }

        Ok(records)
    }

    /// Copy the CSV verbatim to `dest`. Returns whether there was a file to
    /// copy; an absent ledger exports nothing.
    pub fn export_to(&self, dest: &Path) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::copy(&self.path, dest)
            .with_context(|| format!("Failed to copy ledger to {}", dest.display()))?;

        Ok(true)
    }

    /// Delete the whole ledger. Returns whether a file was actually removed.
    /// Irreversible - callers gate this behind an explicit confirmation.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;

        Ok(true)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(datetime: &str, total: f64, memo: &str) -> HistoryRecord {
        HistoryRecord {
            datetime: datetime.to_string(),
            count: 3,
            subtotal: total / 1.1,
            tax_rate: 0.10,
            total,
            memo: memo.to_string(),
        }
    }

    #[test]
    fn test_read_all_missing_file() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path().join("data"));

        assert_eq!(ledger.read_all().unwrap(), Vec::new());
    }

    #[test]
    fn test_append_then_read() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        let r = record("2026-08-25 12:00:00", 330.0, "supermarket");
        ledger.append(&r).unwrap();

        let rows = ledger.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.last(), Some(&r));
    }

    #[test]
    fn test_append_preserves_order() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        for i in 0..5 {
            ledger
                .append(&record("2026-08-25 12:00:00", i as f64, "m"))
                .unwrap();
        }

        let rows = ledger.read_all().unwrap();
        let totals: Vec<f64> = rows.iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_header_written_once() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        ledger.append(&record("2026-08-25 12:00:00", 1.0, "a")).unwrap();
        ledger.append(&record("2026-08-25 13:00:00", 2.0, "b")).unwrap();

        let raw = fs::read_to_string(ledger.path()).unwrap();
        let mut lines = raw.lines();
        assert_eq!(
            lines.next(),
            Some("datetime,count,subtotal,tax_rate,total,memo")
        );
        assert_eq!(raw.lines().count(), 3);
    }

    #[test]
    fn test_idempotent_read() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        ledger.append(&record("2026-08-25 12:00:00", 9.5, "x")).unwrap();

        assert_eq!(ledger.read_all().unwrap(), ledger.read_all().unwrap());
    }

    #[test]
    fn test_legacy_rows_without_memo_column() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        fs::write(
            ledger.path(),
            "datetime,count,subtotal,tax_rate,total\n\
             2025-01-31 23:10:00,2,300.0,0.1,330.0\n",
        )
        .unwrap();

        let rows = ledger.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].memo, "");
        assert_eq!(rows[0].total, 330.0);
    }

    #[test]
    fn test_garbage_numeric_cell_reads_as_zero() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        fs::write(
            ledger.path(),
            "datetime,count,subtotal,tax_rate,total,memo\n\
             2025-01-31 23:10:00,2,300.0,0.1,oops,bakery\n",
        )
        .unwrap();

        let rows = ledger.read_all().unwrap();
        assert_eq!(rows[0].total, 0.0);
        assert_eq!(rows[0].memo, "bakery");
    }

    #[test]
    fn test_clear_absent_file() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path().join("data"));

        assert!(!ledger.clear().unwrap());
    }

    #[test]
    fn test_clear_present_file() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        ledger.append(&record("2026-08-25 12:00:00", 1.0, "")).unwrap();

        assert!(ledger.clear().unwrap());
        assert_eq!(ledger.read_all().unwrap(), Vec::new());
    }

    #[test]
    fn test_export_copies_file_verbatim() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        ledger
            .append(&record("2026-08-25 12:00:00", 330.0, "supermarket"))
            .unwrap();

        let dest = tmp.path().join("export.csv");
        assert!(ledger.export_to(&dest).unwrap());
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            fs::read_to_string(ledger.path()).unwrap()
        );
    }

    #[test]
    fn test_export_without_ledger() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path().join("data"));

        let dest = tmp.path().join("export.csv");
        assert!(!ledger.export_to(&dest).unwrap());
        assert!(!dest.exists());
    }

    #[test]
    fn test_memo_with_commas_round_trips() {
        let tmp = tempdir().unwrap();
        let ledger = HistoryLedger::new(tmp.path());

        let r = record("2026-08-25 12:00:00", 42.0, "milk, bread, eggs");
        ledger.append(&r).unwrap();

        assert_eq!(ledger.read_all().unwrap()[0].memo, "milk, bread, eggs");
    }
}
