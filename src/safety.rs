use crate::model::{AssessmentInput, CrowdDensity, Factor};

// 0.0 = Safe, 1.0 = Dangerous, 0.5 = can't tell (bad reading)
const AMBIGUOUS: f64 = 0.5;

pub fn time_of_day_risk(hour: i64) -> f64 {
    if !(0..24).contains(&hour) {
        return AMBIGUOUS;
    }
    // Night window: 21:00 - 05:59
    if hour >= 21 || hour < 6 { 1.0 } else { 0.0 }
}

/// Isolated places are riskier than crowded ones.
pub fn crowd_density_risk(density: CrowdDensity) -> f64 {
    match density {
        CrowdDensity::Low => 1.0,
        CrowdDensity::Medium => 0.5,
        CrowdDensity::High => 0.2,
    }
}

pub fn crime_history_risk(crime_score: i64) -> f64 {
    if !(0..=100).contains(&crime_score) {
        return AMBIGUOUS;
    }
    crime_score as f64 / 100.0
}

pub fn network_risk(network_available: bool) -> f64 {
    if network_available { 0.0 } else { 1.0 }
}

/// Standing still in a high-crime area is the dangerous case; moving at all
/// gives some protection.
pub fn movement_speed_risk(speed: f64, crime_score: i64) -> f64 {
    if speed < 0.0 {
        return AMBIGUOUS;
    }
    if speed == 0.0 && crime_score > 60 {
        return 1.0;
    }
    if speed > 0.0 {
        return 0.3;
    }
    // Stationary in a calmer area (also reached by NaN).
    AMBIGUOUS
}

pub fn is_valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

pub fn gps_validity_risk(lat: f64, lon: f64) -> f64 {
    if is_valid_coordinates(lat, lon) { 0.0 } else { 1.0 }
}

/// Per-factor contributions for one input, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub time_of_day: f64,
    pub crowd_density: f64,
    pub crime_history: f64,
    pub network: f64,
    pub movement_speed: f64,
    pub gps_validity: f64,
}

impl FactorScores {
    pub fn evaluate(input: &AssessmentInput) -> Self {
        Self {
            time_of_day: time_of_day_risk(input.hour),
            crowd_density: crowd_density_risk(input.crowd_density),
            crime_history: crime_history_risk(input.crime_score),
            network: network_risk(input.network_available),
            movement_speed: movement_speed_risk(input.movement_speed, input.crime_score),
            gps_validity: gps_validity_risk(input.latitude, input.longitude),
        }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::TimeOfDay => self.time_of_day,
            Factor::CrowdDensity => self.crowd_density,
            Factor::CrimeHistory => self.crime_history,
            Factor::NetworkAvailability => self.network,
            Factor::MovementSpeed => self.movement_speed,
            Factor::GpsValidity => self.gps_validity,
        }
    }

    /// `(factor, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
