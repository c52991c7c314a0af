use super::ScrapeError;
use crate::config::MismatchPolicy;
use crate::models::{BribeReport, RawReportPage};
use chrono::NaiveDateTime;
use tracing::warn;

const AMOUNT_PREFIX: &str = "Paid INR ";

// ── Amount normalizer ─────────────────────────────────────────────────────────

/// Normalize a raw amount string to a number.
/// "Paid INR 12,000\r\n2 days ago" → 12000.0 | "Paid INR 500" → 500.0
///
/// Steps, in order: strip the first "Paid INR " if present, drop everything
/// from the first carriage return (trailing timestamp text), remove
/// thousands-separator commas, parse as decimal. Unparseable input yields
/// `None` rather than an error, so one mangled row never aborts a run.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut s = raw.replacen(AMOUNT_PREFIX, "", 1);

    if let Some(i) = s.find('\r') {
        s.truncate(i);
    }

    let s = s.replace(',', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    s.parse().ok()
}

// ── Row construction ──────────────────────────────────────────────────────────

/// Zip the three selector columns into rows, applying the shape policy when
/// their lengths disagree. Transaction and department text is trimmed; the
/// amount goes through `parse_amount`.
pub fn rows_from_page(
    page: RawReportPage,
    policy: MismatchPolicy,
    now: NaiveDateTime,
) -> Result<Vec<BribeReport>, ScrapeError> {
    let (na, nt, nd) = (
        page.amounts.len(),
        page.transactions.len(),
        page.departments.len(),
    );

    if na != nt || nt != nd {
        match policy {
            MismatchPolicy::Error => {
                return Err(ScrapeError::ShapeMismatch {
                    amounts: na,
                    transactions: nt,
                    departments: nd,
                });
            }
            MismatchPolicy::Truncate => {
                warn!(
                    "Column lengths differ ({}/{}/{}), truncating to shortest",
                    na, nt, nd
                );
            }
        }
    }

    let rows = page
        .amounts
        .iter()
        .zip(page.transactions.iter())
        .zip(page.departments.iter())
        .map(|((amount, transaction), department)| BribeReport {
            amount: parse_amount(amount),
            transaction: transaction.trim().to_string(),
            department: department.trim().to_string(),
            scraped_at: now,
        })
        .collect();

    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("Paid INR 12,000\r\n2 days ago"), Some(12000.0));
        assert_eq!(parse_amount("Paid INR 500"), Some(500.0));
        assert_eq!(parse_amount("Paid INR 1,50,000\r stale text"), Some(150000.0));
        assert_eq!(parse_amount("2500.50"), Some(2500.5));
    }

    #[test]
    fn test_parse_amount_failures() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("Paid INR "), None);
        assert_eq!(parse_amount("Paid INR unknown"), None);
        assert_eq!(parse_amount("\r\nonly metadata"), None);
    }

    fn page(amounts: &[&str], transactions: &[&str], departments: &[&str]) -> RawReportPage {
        RawReportPage {
            amounts: amounts.iter().map(|s| s.to_string()).collect(),
            transactions: transactions.iter().map(|s| s.to_string()).collect(),
            departments: departments.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_rows_from_aligned_page() {
        let raw = page(
            &["Paid INR 12,000\r\n2 days ago", "Paid INR 500"],
            &["Birth certificate ", "Licence renewal"],
            &[" Municipal Services", "Transport"],
        );

        let rows = rows_from_page(raw, MismatchPolicy::Error, now()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, Some(12000.0));
        assert_eq!(rows[0].transaction, "Birth certificate");
        assert_eq!(rows[0].department, "Municipal Services");
        assert_eq!(rows[1].amount, Some(500.0));
    }

    #[test]
    fn test_mismatch_error_policy() {
        let raw = page(&["Paid INR 100", "Paid INR 200"], &["a", "b"], &["only one"]);

        let err = rows_from_page(raw, MismatchPolicy::Error, now()).unwrap_err();
        match err {
            ScrapeError::ShapeMismatch {
                amounts,
                transactions,
                departments,
            } => {
                assert_eq!((amounts, transactions, departments), (2, 2, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mismatch_truncate_policy() {
        let raw = page(&["Paid INR 100", "Paid INR 200"], &["a", "b"], &["only one"]);

        let rows = rows_from_page(raw, MismatchPolicy::Truncate, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Some(100.0));
        assert_eq!(rows[0].department, "only one");
    }

    #[test]
    fn test_unparseable_amount_becomes_missing() {
        let raw = page(&["Paid INR n/a"], &["t"], &["d"]);
        let rows = rows_from_page(raw, MismatchPolicy::Error, now()).unwrap();
        assert_eq!(rows[0].amount, None);
    }
}
