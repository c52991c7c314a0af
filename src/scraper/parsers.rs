use super::ScrapeError;
use crate::models::RawReportPage;
use scraper::{Html, Selector};

// Fixed selectors for the bribe-report listing markup. The three queries are
// independent; positional alignment across them is assumed, not guaranteed.
const AMOUNT_SELECTOR: &str = ".paid-amount span";
const TRANSACTION_SELECTOR: &str = ".heading-3 a";
const DEPARTMENT_SELECTOR: &str = ".name a";

fn selector(s: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(s).map_err(|e| ScrapeError::Selector(format!("{}: {}", s, e)))
}

fn select_texts(doc: &Html, sel: &Selector) -> Vec<String> {
    doc.select(sel)
        .map(|el| el.text().collect::<String>())
        .collect()
}

/// Pull the three field columns off a listing page, in document order.
/// Node text is taken verbatim (embedded whitespace and control characters
/// included) — trailing markup garbage is the cleaner's problem.
pub fn parse_report_page(html: &str) -> Result<RawReportPage, ScrapeError> {
    let doc = Html::parse_document(html);

    Ok(RawReportPage {
        amounts: select_texts(&doc, &selector(AMOUNT_SELECTOR)?),
        transactions: select_texts(&doc, &selector(TRANSACTION_SELECTOR)?),
        departments: select_texts(&doc, &selector(DEPARTMENT_SELECTOR)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <section class="report">
            <h2 class="heading-3"><a href="/r/1">Birth certificate</a></h2>
            <div class="name"><a href="/d/1">Municipal Services</a></div>
            <div class="paid-amount"><span>Paid INR 12,000&#13;
              2 days ago</span></div>
          </section>
          <section class="report">
            <h2 class="heading-3"><a href="/r/2">Driving licence renewal</a></h2>
            <div class="name"><a href="/d/2">Transport</a></div>
            <div class="paid-amount"><span>Paid INR 500</span></div>
          </section>
        </body></html>
    "#;

    #[test]
    fn test_columns_in_document_order() {
        let page = parse_report_page(PAGE).unwrap();

        assert_eq!(page.amounts.len(), 2);
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.departments.len(), 2);

        assert!(page.amounts[0].starts_with("Paid INR 12,000"));
        assert_eq!(page.amounts[1], "Paid INR 500");
        assert_eq!(page.transactions[0], "Birth certificate");
        assert_eq!(page.transactions[1], "Driving licence renewal");
        assert_eq!(page.departments[0], "Municipal Services");
        assert_eq!(page.departments[1], "Transport");
    }

    #[test]
    fn test_empty_page_yields_empty_columns() {
        let page = parse_report_page("<html><body><p>nothing here</p></body></html>").unwrap();
        assert!(page.amounts.is_empty());
        assert!(page.transactions.is_empty());
        assert!(page.departments.is_empty());
    }

    #[test]
    fn test_unequal_columns_pass_through() {
        // A report block missing its department link: the extractor reports
        // what it saw, shape policy is applied downstream.
        let html = r#"
            <div class="heading-3"><a>Only transaction</a></div>
            <div class="paid-amount"><span>Paid INR 100</span></div>
            <div class="heading-3"><a>Another transaction</a></div>
            <div class="paid-amount"><span>Paid INR 200</span></div>
            <div class="name"><a>Lone Department</a></div>
        "#;
        let page = parse_report_page(html).unwrap();
        assert_eq!(page.amounts.len(), 2);
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.departments.len(), 1);
    }
}
