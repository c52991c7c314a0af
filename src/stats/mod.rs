//! Descriptive statistics over the combined report table.
//!
//! `summarize` is a pure function of the table: same input, same output, no
//! side effects. Rows whose amount failed to parse count as missing and are
//! excluded from every aggregate rather than imputed.

use crate::models::BribeReport;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

// ── Output types ──────────────────────────────────────────────────────────────

/// Five-number summary + mean over the amount column.
/// All fields are `None` when no row carries a usable amount.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverallStats {
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Mean amount for one department, rounded to 1 decimal.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentAggregate {
    pub department: String,
    pub mean_amount: f64,
    pub reports: usize,
}

/// One log-scale histogram bucket: `lower <= amount < upper`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub overall: OverallStats,
    pub by_department: Vec<DepartmentAggregate>,
    pub histogram: Vec<HistogramBucket>,
}

// ── Summarize ─────────────────────────────────────────────────────────────────

pub fn summarize(table: &[BribeReport]) -> Summary {
    let amounts: Vec<f64> = table.iter().filter_map(|r| r.amount).collect();
    let missing = table.len() - amounts.len();

    Summary {
        overall: overall_stats(&amounts, missing),
        by_department: department_means(table),
        histogram: log_histogram(&amounts),
    }
}

fn overall_stats(amounts: &[f64], missing: usize) -> OverallStats {
    if amounts.is_empty() {
        return OverallStats {
            count: 0,
            missing,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
            mean: None,
        };
    }

    let mut sorted = amounts.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

    OverallStats {
        count: sorted.len(),
        missing,
        min: Some(sorted[0]),
        q1: Some(percentile(&sorted, 0.25)),
        median: Some(percentile(&sorted, 0.5)),
        q3: Some(percentile(&sorted, 0.75)),
        max: Some(sorted[sorted.len() - 1]),
        mean: Some(mean),
    }
}

/// Linear-interpolation percentile over a sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Mean amount per department, descending. Stable sort keeps ties in
/// first-appearance order. Departments whose every amount is missing are
/// omitted — there is no mean to report.
fn department_means(table: &[BribeReport]) -> Vec<DepartmentAggregate> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();

    for row in table {
        let entry = match groups.entry(row.department.as_str()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                order.push(row.department.as_str());
                e.insert((0.0, 0))
            }
        };
        if let Some(amount) = row.amount {
            entry.0 += amount;
            entry.1 += 1;
        }
    }

    let mut aggregates: Vec<DepartmentAggregate> = order
        .into_iter()
        .filter_map(|department| {
            let (sum, n) = groups[department];
            if n == 0 {
                return None;
            }
            Some(DepartmentAggregate {
                department: department.to_string(),
                mean_amount: round1(sum / n as f64),
                reports: n,
            })
        })
        .collect();

    aggregates.sort_by(|a, b| b.mean_amount.total_cmp(&a.mean_amount));
    aggregates
}

/// Decade buckets `[10^k, 10^(k+1))` spanning the positive amounts,
/// histogram-ready for a log-scale x axis. Non-positive amounts have no
/// logarithm and are left out.
pub fn log_histogram(amounts: &[f64]) -> Vec<HistogramBucket> {
    let positive: Vec<f64> = amounts.iter().copied().filter(|a| *a > 0.0).collect();

    let Some(min) = positive.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = positive.iter().copied().fold(min, f64::max);

    let lo = min.log10().floor() as i32;
    let hi = max.log10().floor() as i32 + 1;

    (lo..hi)
        .map(|k| {
            let lower = 10f64.powi(k);
            let upper = 10f64.powi(k + 1);
            let count = positive
                .iter()
                .filter(|a| **a >= lower && **a < upper)
                .count();
            HistogramBucket {
                lower,
                upper,
                count,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
