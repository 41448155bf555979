use std::collections::BTreeMap;

/// A single sheet read out of a workbook, with every cell coerced to text.
/// Owned transiently while a scan is in progress; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Display name of the workbook the sheet came from (file basename).
    pub workbook: String,
    /// Sheet name inside the workbook.
    pub sheet: String,
    /// Ordered header row.
    pub columns: Vec<String>,
    /// Ordered data rows, one cell per column.
    pub rows: Vec<Vec<String>>,
}

/// One normalized SKU occurrence. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Canonical SKU string produced by the normalizer.
    pub sku: String,
    /// Workbook display name the value was found in.
    pub workbook: String,
    /// Sheet name the value was found in.
    pub sheet: String,
    /// Column name (trimmed) the value was found in.
    pub column: String,
    /// 1-based spreadsheet row number, counting the header as row 1.
    /// Absent when the source row has no plain ordinal position.
    pub row: Option<u32>,
}

/// Columns judged SKU-bearing for one scanned table. Entries only exist for
/// tables where detection found at least one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedColumns {
    pub workbook: String,
    pub sheet: String,
    pub columns: Vec<String>,
}

/// A workbook that could not be opened or parsed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    pub workbook: String,
    pub reason: String,
}

/// Per-SKU, per-workbook occurrence counts. Stored sparsely; count queries
/// for absent pairs return zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceMatrix {
    counts: BTreeMap<String, BTreeMap<String, u32>>,
}

impl PresenceMatrix {
    /// Rebuilds the matrix wholesale from a record list. A SKU appears as a
    /// key iff it has at least one record.
    pub fn from_records(records: &[Record]) -> Self {
        let mut counts: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        for record in records {
            *counts
                .entry(record.sku.clone())
                .or_default()
                .entry(record.workbook.clone())
                .or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Occurrence count for a (SKU, workbook) pair; zero when absent.
    pub fn count(&self, sku: &str, workbook: &str) -> u32 {
        self.counts
            .get(sku)
            .and_then(|per_workbook| per_workbook.get(workbook))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct workbooks a SKU occurs in.
    pub fn workbook_count(&self, sku: &str) -> usize {
        self.counts
            .get(sku)
            .map(|per_workbook| per_workbook.values().filter(|count| **count > 0).count())
            .unwrap_or(0)
    }

    /// All SKUs with at least one occurrence, ascending.
    pub fn skus(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Union of workbook names across all SKUs, ascending.
    pub fn workbooks(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .counts
            .values()
            .flat_map(|per_workbook| per_workbook.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Everything one analysis run produces. The four parts are built together
/// and stay mutually consistent: every record's SKU is a presence-matrix key
/// and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub records: Vec<Record>,
    pub presence: PresenceMatrix,
    /// One entry per table with detected columns, in scan order.
    pub detected: Vec<DetectedColumns>,
    /// One entry per unreadable workbook, in scan order.
    pub read_errors: Vec<ReadError>,
}

impl Analysis {
    /// True when the scan produced no records at all, so callers can render
    /// a single informational message instead of empty tables.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
