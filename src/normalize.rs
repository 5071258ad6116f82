//! Turns parsed feed records into [`Alert`]s and zone lists.
//!
//! Every locality field may pack several names separated by commas. Each
//! name is trimmed, dropped if empty or a test alert, and kept once in
//! first-seen order.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Asia::Jerusalem;
use metrics::counter;

use crate::alert::Alert;
use crate::category::{classify, CategoryScheme};
use crate::parser::{HistoryRecord, LiveRecord, ParsedFeedRecord};
use crate::telemetry;

/// Hebrew for "test"; the upstream tags its test alerts with it.
pub const TEST_MARKER: &str = "בדיקה";
/// Hebrew "region" prefix on zone labels.
pub const ZONE_PREFIX: &str = "מרחב ";

/// Split a raw field into usable locality names.
pub fn unpack_localities(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.contains(TEST_MARKER))
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|x| x == item) {
        list.push(item.to_string());
    }
}

/// Normalize whichever record shape the feed returned.
pub fn normalize_record(record: &ParsedFeedRecord, now: DateTime<Utc>, window: Duration) -> Alert {
    match record {
        ParsedFeedRecord::Live(live) => normalize_live(live),
        ParsedFeedRecord::History(history) => normalize_history(history, now, window),
    }
}

/// Live object: classify by the live table whenever `data` is present, even
/// if every locality in it was filtered out. No `data` means no alert.
pub fn normalize_live(record: &LiveRecord) -> Alert {
    let Some(data) = &record.data else {
        return Alert::none();
    };

    let mut cities = Vec::new();
    for raw in data {
        for name in unpack_localities(raw) {
            push_unique(&mut cities, name);
        }
    }

    let instructions = record
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Alert {
        kind: classify(CategoryScheme::Live, record.category.as_deref()),
        cities,
        instructions,
    }
}

/// Convert an upstream `alertDate` to an instant. Naive timestamps are
/// Israel local time; explicit offsets are honoured.
pub fn parse_alert_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    let naive = FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())?;

    // `earliest` resolves the autumn overlap; spring-forward gaps yield None.
    Jerusalem
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn skip_row(reason: &'static str) {
    counter!(telemetry::HISTORY_ROWS_SKIPPED_TOTAL, "reason" => reason).increment(1);
}

/// History rows: keep complete rows newer than `window`, classify with the
/// history table.
///
/// The type comes from the last qualifying row. Rows are assumed to be in
/// chronological order, so a window holding several categories reports the
/// latest one, not the most severe.
pub fn normalize_history(record: &HistoryRecord, now: DateTime<Utc>, window: Duration) -> Alert {
    let mut alert = Alert::none();

    for entry in &record.entries {
        if entry.alert_date().is_empty() || entry.data().is_empty() || entry.category().is_empty() {
            skip_row("incomplete");
            continue;
        }

        let Some(at) = parse_alert_date(entry.alert_date()) else {
            tracing::warn!(
                target: "oref_alerts::history",
                alert_date = entry.alert_date(),
                "unparseable alertDate, skipping row"
            );
            skip_row("bad_date");
            continue;
        };

        if now.signed_duration_since(at) > window {
            skip_row("stale");
            continue;
        }

        let mut qualified = false;
        for name in unpack_localities(entry.data()) {
            push_unique(&mut alert.cities, name);
            qualified = true;
        }

        if qualified {
            alert.kind = classify(CategoryScheme::History, Some(entry.category()));
        }
    }

    alert
}

/// Zone codes for the live object, with the region prefix stripped.
/// History arrays carry no zone codes and yield nothing.
pub fn extract_zones(record: &ParsedFeedRecord) -> Vec<String> {
    let ParsedFeedRecord::Live(live) = record else {
        return Vec::new();
    };

    let mut zones = Vec::new();
    for raw in live.data.iter().flatten() {
        for zone in unpack_localities(raw) {
            let zone = zone.replacen(ZONE_PREFIX, "", 1);
            let zone = zone.trim();
            if !zone.is_empty() {
                push_unique(&mut zones, zone);
            }
        }
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertType;
    use crate::parser::HistoryEntry;

    fn live(cat: Option<&str>, desc: Option<&str>, data: &[&str]) -> LiveRecord {
        LiveRecord {
            category: cat.map(str::to_string),
            description: desc.map(str::to_string),
            data: Some(data.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn il(ts: &str) -> DateTime<Utc> {
        parse_alert_date(ts).unwrap()
    }

    #[test]
    fn live_dedups_trims_and_drops_tests() {
        let rec = live(
            Some("1"),
            Some("היכנסו למרחב המוגן"),
            &[" שדרות ", "שדרות", "", "בדיקה", "נתיבות,אופקים", "שדרות, בדיקה 2"],
        );
        let alert = normalize_live(&rec);
        assert_eq!(alert.kind, AlertType::Missiles);
        assert_eq!(alert.cities, vec!["שדרות", "נתיבות", "אופקים"]);
        assert_eq!(alert.instructions.as_deref(), Some("היכנסו למרחב המוגן"));
    }

    #[test]
    fn live_without_data_is_none() {
        assert_eq!(normalize_live(&LiveRecord::empty()), Alert::none());
    }

    #[test]
    fn live_with_filtered_out_data_keeps_category() {
        let alert = normalize_live(&live(Some("1"), None, &["בדיקה"]));
        assert_eq!(alert.kind, AlertType::Missiles);
        assert!(alert.cities.is_empty());

        let alert = normalize_live(&live(Some("2"), None, &[]));
        assert_eq!(alert.kind, AlertType::General);
        assert!(alert.cities.is_empty());
    }

    #[test]
    fn live_empty_desc_is_dropped() {
        let alert = normalize_live(&live(Some("102"), Some(""), &["חיפה"]));
        assert_eq!(alert.kind, AlertType::GeneralDrill);
        assert_eq!(alert.instructions, None);
    }

    #[test]
    fn jerusalem_local_time_is_converted() {
        // Winter: UTC+2.
        assert_eq!(
            il("2024-01-10 12:00:00"),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap()
        );
        // Summer: UTC+3.
        assert_eq!(
            il("2024-07-10T12:00:00.500").timestamp(),
            Utc.with_ymd_and_hms(2024, 7, 10, 9, 0, 0).unwrap().timestamp()
        );
        assert_eq!(
            il("2024-07-10T12:00:00+00:00"),
            Utc.with_ymd_and_hms(2024, 7, 10, 12, 0, 0).unwrap()
        );
        assert_eq!(parse_alert_date("yesterday"), None);
    }

    #[test]
    fn history_drops_stale_and_incomplete_rows() {
        let now = il("2024-04-14 01:25:00");
        let rec = HistoryRecord {
            entries: vec![
                HistoryEntry::new("2024-04-14 01:22:00", "1", "קריית שמונה"),
                HistoryEntry::new("2024-04-14 01:24:30", "", "מטולה"),
                HistoryEntry::new("", "1", "מטולה"),
                HistoryEntry::new("not a date", "1", "מטולה"),
                HistoryEntry::new("2024-04-14 01:24:00", "2", "שלומי"),
            ],
        };
        let alert = normalize_history(&rec, now, Duration::seconds(120));
        assert_eq!(alert.kind, AlertType::HostileAircraftIntrusion);
        assert_eq!(alert.cities, vec!["שלומי"]);
        assert_eq!(alert.instructions, None);
    }

    #[test]
    fn history_last_qualifying_row_sets_type() {
        let now = il("2024-04-14 01:25:00");
        let rec = HistoryRecord {
            entries: vec![
                HistoryEntry::new("2024-04-14 01:24:00", "1", "אילת"),
                HistoryEntry::new("2024-04-14 01:24:10", "13", "אילת"),
                HistoryEntry::new("2024-04-14 01:24:20", "3", "בדיקה"),
            ],
        };
        let alert = normalize_history(&rec, now, Duration::seconds(120));
        // The duplicate locality still counts; the test-only row does not.
        assert_eq!(alert.kind, AlertType::EarlyWarning);
        assert_eq!(alert.cities, vec!["אילת"]);
    }

    #[test]
    fn history_with_nothing_recent_is_none() {
        let now = il("2024-04-14 02:00:00");
        let rec = HistoryRecord {
            entries: vec![HistoryEntry::new("2024-04-14 01:24:00", "1", "אילת")],
        };
        assert_eq!(normalize_history(&rec, now, Duration::seconds(120)), Alert::none());
        assert_eq!(
            normalize_history(&HistoryRecord::default(), now, Duration::seconds(120)),
            Alert::none()
        );
    }

    #[test]
    fn zones_split_strip_prefix_and_dedup() {
        let rec = ParsedFeedRecord::Live(live(
            Some("1"),
            None,
            &["גולן 1,חיפה 75", "מרחב שפלה 182", "חיפה 75", ",", "בדיקה 1"],
        ));
        assert_eq!(extract_zones(&rec), vec!["גולן 1", "חיפה 75", "שפלה 182"]);
    }

    #[test]
    fn zones_from_history_shape_are_empty() {
        let rec = ParsedFeedRecord::History(HistoryRecord {
            entries: vec![HistoryEntry::new("2024-04-14 01:24:00", "1", "גולן 1")],
        });
        assert!(extract_zones(&rec).is_empty());
    }
}
