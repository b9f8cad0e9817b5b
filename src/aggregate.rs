// 📊 Aggregator - derived views over the full ledger
// Both views are recomputed from a fresh read_all(); nothing is cached.

use crate::ledger::HistoryRecord;

/// Bucket name for records whose memo trims to nothing.
pub const NO_MEMO: &str = "(no memo)";

/// Chart shows at most this many memo buckets.
pub const TOP_MEMO_BUCKETS: usize = 10;

/// Recent totals as parallel vectors, in ledger (chronological) order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrendView {
    /// Short "MM-DD HH:MM" labels derived from each record's datetime
    pub labels: Vec<String>,
    pub totals: Vec<f64>,
    pub memos: Vec<String>,
}

impl TrendView {
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Last `window` records as a trend view. Fewer records than the window
/// just yields them all.
pub fn recent_trend(records: &[HistoryRecord], window: usize) -> TrendView {
    let start = records.len().saturating_sub(window);

    let mut view = TrendView::default();
    for record in &records[start..] {
        view.labels.push(short_label(&record.datetime));
        view.totals.push(record.total);
        view.memos.push(record.memo.clone());
    }
    view
}

// "YYYY-MM-DD HH:MM:SS" -> "MM-DD HH:MM"; anything shorter passes through.
fn short_label(datetime: &str) -> String {
    match datetime.get(5..16) {
        Some(s) => s.to_string(),
        None => datetime.to_string(),
    }
}

/// Summed total per memo.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoBucket {
    pub memo: String,
    pub total: f64,
}

/// Group the whole ledger by trimmed memo and sum totals per bucket.
///
/// Sorted descending by total, truncated to [`TOP_MEMO_BUCKETS`]. Equal
/// totals keep first-seen order: buckets accumulate in order of first
/// appearance and the sort is stable.
pub fn memo_totals(records: &[HistoryRecord]) -> Vec<MemoBucket> {
    let mut buckets: Vec<MemoBucket> = Vec::new();

    for record in records {
        let memo = record.memo.trim();
        let key = if memo.is_empty() { NO_MEMO } else { memo };

        match buckets.iter_mut().find(|b| b.memo == key) {
            Some(bucket) => bucket.total += record.total,
            None => buckets.push(MemoBucket {
                memo: key.to_string(),
                total: record.total,
            }),
        }
    }

    buckets.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    buckets.truncate(TOP_MEMO_BUCKETS);
    buckets
}

// ============================================================================
// TESTS
// ============================================================================
