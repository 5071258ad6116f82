// src/cooldown.rs
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;

use oref_alerts::Alert;

/// Per-locality cooldown so a long-running alert is announced once, not on
/// every poll.
/// - First sighting of a locality always passes.
/// - Inside cooldown, the locality is suppressed.
/// - Sightings refresh the timestamp only when they pass.
#[derive(Debug, Clone, Default)]
pub struct LocalityCooldown {
    cooldown: ChronoDuration,
    last_seen: HashMap<String, DateTime<Utc>>,
}

impl LocalityCooldown {
    /// `cooldown_secs` < 0 is treated as 0 (no cooldown).
    pub fn new(cooldown_secs: i64) -> Self {
        Self {
            cooldown: ChronoDuration::try_seconds(cooldown_secs.max(0))
                .unwrap_or(ChronoDuration::MAX),
            last_seen: HashMap::new(),
        }
    }

    /// Localities of `alert` not announced within the cooldown. Records them.
    pub fn fresh_localities(&mut self, alert: &Alert, now: DateTime<Utc>) -> Vec<String> {
        let mut out = Vec::new();
        for city in &alert.cities {
            let due = match self.last_seen.get(city) {
                None => true,
                Some(ts) => now.signed_duration_since(*ts) >= self.cooldown,
            };
            if due {
                self.last_seen.insert(city.clone(), now);
                out.push(city.clone());
            }
        }
        self.prune(now);
        out
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cooldown = self.cooldown;
        self.last_seen
            .retain(|_, ts| now.signed_duration_since(*ts) < cooldown);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.last_seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use oref_alerts::AlertType;

    fn alert(cities: &[&str]) -> Alert {
        Alert {
            kind: AlertType::Missiles,
            cities: cities.iter().map(|s| s.to_string()).collect(),
            instructions: None,
        }
    }

    #[test]
    fn first_sighting_passes_then_blocked() {
        let mut cd = LocalityCooldown::new(60);
        let t0 = Utc.with_ymd_and_hms(2024, 4, 14, 1, 0, 0).unwrap();
        assert_eq!(cd.fresh_localities(&alert(&["שדרות"]), t0), vec!["שדרות"]);

        let t1 = t0 + ChronoDuration::seconds(5);
        assert_eq!(
            cd.fresh_localities(&alert(&["שדרות", "נתיבות"]), t1),
            vec!["נתיבות"]
        );
    }

    #[test]
    fn after_cooldown_passes_again() {
        let mut cd = LocalityCooldown::new(60);
        let t0 = Utc.with_ymd_and_hms(2024, 4, 14, 1, 0, 0).unwrap();
        cd.fresh_localities(&alert(&["שדרות"]), t0);
        let later = t0 + ChronoDuration::seconds(61);
        assert_eq!(cd.fresh_localities(&alert(&["שדרות"]), later), vec!["שדרות"]);
    }

    #[test]
    fn expired_entries_are_pruned() {
        let mut cd = LocalityCooldown::new(10);
        let t0 = Utc.with_ymd_and_hms(2024, 4, 14, 1, 0, 0).unwrap();
        cd.fresh_localities(&alert(&["a", "b"]), t0);
        assert_eq!(cd.tracked(), 2);
        cd.fresh_localities(&Alert::none(), t0 + ChronoDuration::seconds(30));
        assert_eq!(cd.tracked(), 0);
    }
}
