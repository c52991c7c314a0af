use std::time::Instant;
use tracing::info;

/// Logs elapsed wall-clock time for a scrape run when dropped.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

/// Format a count with thousands separators.
pub fn fmt_number(n: i64) -> String {
    let s = n.abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Format a monetary amount with thousands separators, keeping one decimal
/// only when the value has a fractional part.
/// 12000.0 → "12,000" | 2500.5 → "2,500.5"
pub fn fmt_amount(x: f64) -> String {
    let rounded = (x * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        fmt_number(rounded as i64)
    } else {
        let tenths = (rounded.fract().abs() * 10.0).round() as i64;
        format!("{}.{}", fmt_number(rounded.trunc() as i64), tenths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(1_234_567), "1,234,567");
        assert_eq!(fmt_number(0), "0");
        assert_eq!(fmt_number(-42_000), "-42,000");
        assert_eq!(fmt_number(999), "999");
    }

    #[test]
    fn test_fmt_amount() {
        assert_eq!(fmt_amount(12000.0), "12,000");
        assert_eq!(fmt_amount(100.7), "100.7");
        assert_eq!(fmt_amount(2500.5), "2,500.5");
        assert_eq!(fmt_amount(100000.0), "100,000");
        assert_eq!(fmt_amount(500.0), "500");
        assert_eq!(fmt_amount(0.5), "0.5");
    }
}
