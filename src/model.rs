use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrowdDensity {
    Low,
    Medium,
    High,
}

impl CrowdDensity {
    /// Case-insensitive match on `LOW` / `MEDIUM` / `HIGH`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

/// One situational snapshot. Values outside their intended ranges are
/// accepted here and penalized by the evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub hour: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub crowd_density: CrowdDensity,
    pub crime_score: i64,
    pub movement_speed: f64,
    pub network_available: bool,
}

impl AssessmentInput {
    pub fn readings(&self) -> RangeReadings {
        RangeReadings {
            hour: self.hour,
            latitude: self.latitude,
            longitude: self.longitude,
            crime_score: self.crime_score,
            movement_speed: self.movement_speed,
        }
    }

    /// Messages for every value outside its intended domain. Scoring never
    /// looks at this.
    pub fn domain_violations(&self) -> Vec<String> {
        self.readings().violations()
    }
}

/// The range-checked part of an input; crowd density and network state
/// have no invalid values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeReadings {
    pub hour: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub crime_score: i64,
    pub movement_speed: f64,
}

impl RangeReadings {
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0..24).contains(&self.hour) {
            errors.push("Hour must be between 0 and 23".to_string());
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            errors.push("Latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            errors.push("Longitude must be between -180 and 180".to_string());
        }
        if !(0..=100).contains(&self.crime_score) {
            errors.push("Crime score must be between 0 and 100".to_string());
        }
        if self.movement_speed.is_nan() || self.movement_speed < 0.0 {
            errors.push("Movement speed must be 0 or greater".to_string());
        }

        errors
    }
}

/// The six risk dimensions, in the order they are evaluated and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    TimeOfDay,
    CrowdDensity,
    CrimeHistory,
    NetworkAvailability,
    MovementSpeed,
    GpsValidity,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::TimeOfDay,
        Factor::CrowdDensity,
        Factor::CrimeHistory,
        Factor::NetworkAvailability,
        Factor::MovementSpeed,
        Factor::GpsValidity,
    ];

    /// Name used in the weight table.
    pub fn key(self) -> &'static str {
        match self {
            Factor::TimeOfDay => "night_time",
            Factor::CrowdDensity => "crowd_density",
            Factor::CrimeHistory => "crime_history",
            Factor::NetworkAvailability => "network_availability",
            Factor::MovementSpeed => "movement_speed",
            Factor::GpsValidity => "gps_validity",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Wording used in the threat reason when this factor is notable.
    pub fn label(self) -> &'static str {
        match self {
            Factor::TimeOfDay => "night hours",
            Factor::CrowdDensity => "low crowd density",
            Factor::CrimeHistory => "high crime area",
            Factor::NetworkAvailability => "no network connectivity",
            Factor::MovementSpeed => "stationary or slow movement",
            Factor::GpsValidity => "invalid GPS coordinates",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    risk_score: u8,
    risk_level: RiskLevel,
    threat_reason: String,
    recommended_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emergency_actions: Option<Vec<String>>,
}

impl SafetyAssessment {
    pub(crate) fn new(
        risk_score: u8,
        risk_level: RiskLevel,
        threat_reason: String,
        recommended_action: String,
        emergency_actions: Option<Vec<String>>,
    ) -> Self {
        Self {
            risk_score,
            risk_level,
            threat_reason,
            recommended_action,
            emergency_actions,
        }
    }

    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn threat_reason(&self) -> &str {
        &self.threat_reason
    }

    pub fn recommended_action(&self) -> &str {
        &self.recommended_action
    }

    /// `None` unless the level is High.
    pub fn emergency_actions(&self) -> Option<&[String]> {
        self.emergency_actions.as_deref()
    }
}

impl fmt::Display for SafetyAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Risk Score: {}", self.risk_score)?;
        writeln!(f, "Risk Level: {}", self.risk_level)?;
        writeln!(f, "Threat Reason: {}", self.threat_reason)?;
        write!(f, "Recommended Action: {}", self.recommended_action)?;
        if let Some(actions) = &self.emergency_actions {
            write!(f, "\nEmergency Actions:")?;
            for action in actions {
                write!(f, "\n  - {}", action)?;
            }
        }
        Ok(())
    }
}
