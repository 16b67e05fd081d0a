//! Crawl progress tracking
//!
//! Counts categories, products and requests for one run and logs a progress
//! line at most once per reporting interval.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// Snapshot of a run's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub categories_completed: usize,
    pub categories_total: usize,
    pub products_found: usize,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Attempts beyond the first, across all requests
    pub retries: u64,
    pub elapsed_secs: f64,
    /// Percentage of successful requests, 0 when nothing was requested
    pub success_rate: f64,
}

#[derive(Debug)]
pub struct ProgressTracker {
    started: Instant,
    last_report: Option<Instant>,
    report_interval: Duration,
    categories_completed: usize,
    categories_total: usize,
    products_found: usize,
    successful_requests: u64,
    failed_requests: u64,
    retries: u64,
}

impl ProgressTracker {
    pub fn new(report_interval: Duration) -> Self {
        Self {
            started: Instant::now(),
            last_report: None,
            report_interval,
            categories_completed: 0,
            categories_total: 0,
            products_found: 0,
            successful_requests: 0,
            failed_requests: 0,
            retries: 0,
        }
    }

    pub fn add_categories(&mut self, count: usize) {
        self.categories_total += count;
    }

    pub fn category_completed(&mut self) {
        self.categories_completed += 1;
        self.maybe_report();
    }

    pub fn add_products(&mut self, count: usize) {
        self.products_found += count;
    }

    pub fn record_success(&mut self, attempts: u32) {
        self.successful_requests += 1;
        self.retries += u64::from(attempts.saturating_sub(1));
    }

    pub fn record_failure(&mut self, attempts: u32) {
        self.failed_requests += 1;
        self.retries += u64::from(attempts.saturating_sub(1));
    }

    /// Whether a progress line is due at `now`; marks it as reported when it is
    fn report_due(&mut self, now: Instant) -> bool {
        let due = self
            .last_report
            .is_none_or(|last| now.duration_since(last) >= self.report_interval);
        if due {
            self.last_report = Some(now);
        }
        due
    }

    pub fn maybe_report(&mut self) {
        if !self.report_due(Instant::now()) {
            return;
        }
        let stats = self.snapshot();
        info!(
            "📊 Progress: {}/{} categories, {} products, {} ok / {} failed requests ({:.1}% success), {:.0}s elapsed",
            stats.categories_completed,
            stats.categories_total,
            stats.products_found,
            stats.successful_requests,
            stats.failed_requests,
            stats.success_rate,
            stats.elapsed_secs
        );
    }

    fn snapshot(&self) -> ProgressStats {
        let total_requests = self.successful_requests + self.failed_requests;
        let success_rate = if total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / total_requests as f64 * 100.0
        };
        ProgressStats {
            categories_completed: self.categories_completed,
            categories_total: self.categories_total,
            products_found: self.products_found,
            successful_requests: self.successful_requests,
            failed_requests: self.failed_requests,
            retries: self.retries,
            elapsed_secs: self.started.elapsed().as_secs_f64(),
            success_rate,
        }
    }

    pub fn final_stats(&self) -> ProgressStats {
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_requests_and_retries() {
        let mut tracker = ProgressTracker::new(Duration::from_secs(5));
        tracker.add_categories(3);
        tracker.record_success(1);
        tracker.record_success(3);
        tracker.record_failure(3);
        tracker.add_products(12);
        tracker.category_completed();

        let stats = tracker.final_stats();
        assert_eq!(stats.categories_completed, 1);
        assert_eq!(stats.categories_total, 3);
        assert_eq!(stats.products_found, 12);
        assert_eq!(stats.successful_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.retries, 4);
        assert!((stats.success_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn empty_run_has_zero_success_rate() {
        let stats = ProgressTracker::new(Duration::from_secs(5)).final_stats();
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn reports_are_throttled() {
        let mut tracker = ProgressTracker::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(tracker.report_due(start));
        assert!(!tracker.report_due(start + Duration::from_secs(2)));
        assert!(tracker.report_due(start + Duration::from_secs(5)));
        assert!(!tracker.report_due(start + Duration::from_secs(9)));
        assert!(tracker.report_due(start + Duration::from_secs(11)));
    }
}
