// src/telemetry.rs
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

pub const POLLS_TOTAL: &str = "oref_polls_total";
pub const POLL_ERRORS_TOTAL: &str = "oref_poll_errors_total";
pub const HISTORY_FALLBACK_TOTAL: &str = "oref_history_fallback_total";
pub const UNKNOWN_CATEGORY_TOTAL: &str = "oref_unknown_category_total";
pub const HISTORY_ROWS_SKIPPED_TOTAL: &str = "oref_history_rows_skipped_total";
pub const FETCH_MS: &str = "oref_fetch_ms";

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(POLLS_TOTAL, "Feed polls started, by feed.");
        describe_counter!(
            POLL_ERRORS_TOTAL,
            "Polls that failed, by feed and error kind."
        );
        describe_counter!(
            HISTORY_FALLBACK_TOTAL,
            "Live polls that fell back to the history feed."
        );
        describe_counter!(
            UNKNOWN_CATEGORY_TOTAL,
            "Category codes missing from the lookup tables."
        );
        describe_counter!(
            HISTORY_ROWS_SKIPPED_TOTAL,
            "History rows dropped as incomplete, undated or stale."
        );
        describe_histogram!(FETCH_MS, "Feed fetch + decode time in milliseconds.");
    });
}
