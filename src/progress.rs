//! Progress-callback trait for per-school scrape events.
//!
//! Inject an [`Arc<dyn ScrapeProgressCallback>`] via
//! [`crate::config::ScrapeConfigBuilder::progress_callback`] to receive
//! events as the collection builder works through the school list.
//!
//! # Example
//!
//! ```rust
//! use dos2_skills::{ScrapeConfig, ScrapeProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     records: AtomicUsize,
//! }
//!
//! impl ScrapeProgressCallback for CountingCallback {
//!     fn on_school_complete(&self, _index: usize, _total: usize, name: &str, records: usize, _from_cache: bool) {
//!         let seen = self.records.fetch_add(records, Ordering::SeqCst) + records;
//!         eprintln!("{name}: {records} skills ({seen} so far)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { records: AtomicUsize::new(0) });
//!
//! let config = ScrapeConfig::builder()
//!     .progress_callback(counter as Arc<dyn ScrapeProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the collection builder as it processes each school.
///
/// Schools are processed one at a time, so calls never overlap; the
/// `Send + Sync` bound only lets the callback live inside a cloneable
/// config. All methods have default no-op implementations.
pub trait ScrapeProgressCallback: Send + Sync {
    /// Called once before the first fetch.
    fn on_scrape_start(&self, total_schools: usize) {
        let _ = total_schools;
    }

    /// Called before a school's page is fetched.
    ///
    /// # Arguments
    /// * `index` — 1-based position in the school list
    /// * `total` — number of schools in this run
    /// * `name`  — school name
    fn on_school_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called after a school's records were extracted.
    ///
    /// # Arguments
    /// * `records`    — number of skills extracted from the page
    /// * `from_cache` — the page was served from the response cache
    fn on_school_complete(
        &self,
        index: usize,
        total: usize,
        name: &str,
        records: usize,
        from_cache: bool,
    ) {
        let _ = (index, total, name, records, from_cache);
    }

    /// Called once after every school was processed.
    fn on_scrape_complete(&self, total_schools: usize, total_records: usize) {
        let _ = (total_schools, total_records);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ScrapeProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScrapeConfig`].
pub type ProgressCallback = Arc<dyn ScrapeProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        schools: Mutex<Vec<String>>,
        records: AtomicUsize,
        cached: AtomicUsize,
    }

    impl ScrapeProgressCallback for TrackingCallback {
        fn on_scrape_start(&self, total_schools: usize) {
            self.started_total.store(total_schools, Ordering::SeqCst);
        }

        fn on_school_start(&self, _index: usize, _total: usize, name: &str) {
            self.schools.lock().unwrap().push(name.to_string());
        }

        fn on_school_complete(
            &self,
            _index: usize,
            _total: usize,
            _name: &str,
            records: usize,
            from_cache: bool,
        ) {
            self.records.fetch_add(records, Ordering::SeqCst);
            if from_cache {
                self.cached.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_scrape_start(10);
        cb.on_school_start(1, 10, "Aerotheurge");
        cb.on_school_complete(1, 10, "Aerotheurge", 20, true);
        cb.on_scrape_complete(10, 200);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_scrape_start(2);
        tracker.on_school_start(1, 2, "Geomancer");
        tracker.on_school_complete(1, 2, "Geomancer", 21, false);
        tracker.on_school_start(2, 2, "Warfare");
        tracker.on_school_complete(2, 2, "Warfare", 19, true);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(*tracker.schools.lock().unwrap(), ["Geomancer", "Warfare"]);
        assert_eq!(tracker.records.load(Ordering::SeqCst), 40);
        assert_eq!(tracker.cached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_scrape_start(1);
        cb.on_scrape_complete(1, 0);
    }
}
