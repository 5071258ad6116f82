//! Category code tables.
//!
//! The live feed and the history feed number their categories differently.
//! Each scheme has its own table and lookups never cross between them.

use metrics::counter;

use crate::alert::AlertType;
use crate::telemetry;

/// Which numbering scheme a category code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScheme {
    Live,
    History,
}

impl CategoryScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::History => "history",
        }
    }
}

/// Live feed codes. Drills are announced as `100 + code`, but only for the
/// codes listed here; other `1xx` values are unknown.
const LIVE_CATEGORIES: &[(u32, AlertType)] = &[
    (1, AlertType::Missiles),
    (2, AlertType::General),
    (3, AlertType::EarthQuake),
    (4, AlertType::RadiologicalEvent),
    (5, AlertType::Tsunami),
    (6, AlertType::HostileAircraftIntrusion),
    (7, AlertType::HazardousMaterials),
    (10, AlertType::EarlyWarning),
    (13, AlertType::TerroristInfiltration),
    (101, AlertType::MissilesDrill),
    (102, AlertType::GeneralDrill),
    (103, AlertType::EarthQuakeDrill),
    (104, AlertType::RadiologicalEventDrill),
    (105, AlertType::TsunamiDrill),
    (106, AlertType::HostileAircraftIntrusionDrill),
    (107, AlertType::HazardousMaterialsDrill),
    (113, AlertType::TerroristInfiltrationDrill),
];

const HISTORY_CATEGORIES: &[(u32, AlertType)] = &[
    (1, AlertType::Missiles),
    (2, AlertType::HostileAircraftIntrusion),
    (3, AlertType::General),
    (4, AlertType::General),
    (5, AlertType::General),
    (6, AlertType::General),
    (7, AlertType::EarthQuake),
    (8, AlertType::EarthQuake),
    (9, AlertType::RadiologicalEvent),
    (10, AlertType::TerroristInfiltration),
    (11, AlertType::Tsunami),
    (12, AlertType::HazardousMaterials),
    (13, AlertType::EarlyWarning),
    (15, AlertType::MissilesDrill),
    (16, AlertType::HostileAircraftIntrusionDrill),
    (17, AlertType::GeneralDrill),
    (18, AlertType::GeneralDrill),
    (19, AlertType::GeneralDrill),
    (20, AlertType::GeneralDrill),
    (21, AlertType::EarthQuakeDrill),
    (22, AlertType::EarthQuakeDrill),
    (23, AlertType::RadiologicalEventDrill),
    (24, AlertType::TerroristInfiltrationDrill),
    (25, AlertType::TsunamiDrill),
    (26, AlertType::HazardousMaterialsDrill),
];

fn find(table: &[(u32, AlertType)], code: u32) -> Option<AlertType> {
    table.iter().find(|(c, _)| *c == code).map(|(_, t)| *t)
}

/// Look up a numeric code in one scheme's table.
pub fn lookup(scheme: CategoryScheme, code: u32) -> Option<AlertType> {
    match scheme {
        CategoryScheme::Live => find(LIVE_CATEGORIES, code),
        CategoryScheme::History => find(HISTORY_CATEGORIES, code),
    }
}

/// Classify a raw category field.
///
/// A missing or blank code means a plain missile alert. A code that is present
/// but not in the table resolves to [`AlertType::Unknown`] and is reported
/// through `tracing` and the `oref_unknown_category_total` counter.
pub fn classify(scheme: CategoryScheme, raw: Option<&str>) -> AlertType {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return AlertType::Missiles,
    };

    if let Some(t) = raw.parse::<u32>().ok().and_then(|c| lookup(scheme, c)) {
        return t;
    }

    tracing::warn!(
        target: "oref_alerts::category",
        scheme = scheme.as_str(),
        category = raw,
        "unknown category"
    );
    counter!(telemetry::UNKNOWN_CATEGORY_TOTAL, "scheme" => scheme.as_str()).increment(1);
    AlertType::Unknown
}
