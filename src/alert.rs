//! Canonical alert model returned by every poll.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed taxonomy of alert kinds. `None` means the poll succeeded and nothing
/// is active; `Unknown` means the feed used a category code we have no mapping for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertType {
    Missiles,
    General,
    EarthQuake,
    RadiologicalEvent,
    Tsunami,
    HostileAircraftIntrusion,
    HazardousMaterials,
    EarlyWarning,
    TerroristInfiltration,
    MissilesDrill,
    GeneralDrill,
    EarthQuakeDrill,
    RadiologicalEventDrill,
    TsunamiDrill,
    HostileAircraftIntrusionDrill,
    HazardousMaterialsDrill,
    EarlyWarningDrill,
    TerroristInfiltrationDrill,
    None,
    Unknown,
}

impl AlertType {
    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missiles => "missiles",
            Self::General => "general",
            Self::EarthQuake => "earthQuake",
            Self::RadiologicalEvent => "radiologicalEvent",
            Self::Tsunami => "tsunami",
            Self::HostileAircraftIntrusion => "hostileAircraftIntrusion",
            Self::HazardousMaterials => "hazardousMaterials",
            Self::EarlyWarning => "earlyWarning",
            Self::TerroristInfiltration => "terroristInfiltration",
            Self::MissilesDrill => "missilesDrill",
            Self::GeneralDrill => "generalDrill",
            Self::EarthQuakeDrill => "earthQuakeDrill",
            Self::RadiologicalEventDrill => "radiologicalEventDrill",
            Self::TsunamiDrill => "tsunamiDrill",
            Self::HostileAircraftIntrusionDrill => "hostileAircraftIntrusionDrill",
            Self::HazardousMaterialsDrill => "hazardousMaterialsDrill",
            Self::EarlyWarningDrill => "earlyWarningDrill",
            Self::TerroristInfiltrationDrill => "terroristInfiltrationDrill",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_drill(self) -> bool {
        self.as_str().ends_with("Drill")
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One poll's view of the active alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertType,
    /// Unique localities in first-seen order.
    pub cities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Alert {
    /// The "nothing active" alert.
    pub fn none() -> Self {
        Self {
            kind: AlertType::None,
            cities: Vec::new(),
            instructions: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.kind != AlertType::None
    }
}

impl Default for Alert {
    fn default() -> Self {
        Self::none()
    }
}
