use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Bribe report ──────────────────────────────────────────────────────────────

/// One self-reported bribe record from the paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BribeReport {
    /// `None` when the amount text failed to parse — excluded from statistics.
    pub amount: Option<f64>,
    pub transaction: String,
    pub department: String,
    pub scraped_at: NaiveDateTime,
}

// ── Raw selector output ───────────────────────────────────────────────────────

/// The three field columns pulled off one listing page, each in document
/// order, text verbatim. The columns are positionally aligned on well-formed
/// pages; the cleaner enforces the shape policy.
#[derive(Debug, Clone)]
pub struct RawReportPage {
    pub amounts: Vec<String>,
    pub transactions: Vec<String>,
    pub departments: Vec<String>,
}
