use serde::Serialize;

/// One CSV row that produced no feature, and why. Boundary-lookup misses
/// drop the row, but they stay visible here instead of vanishing.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    /// Physical line number in the source file.
    pub line: u64,
    pub geo_id: String,
    pub reason: String,
}

/// What an importer did with one datafile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub features: usize,
    pub skipped: Vec<SkippedRow>,
}
