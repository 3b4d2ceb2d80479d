//! Turns factor scores into the final assessment: weighted score, level,
//! and the text shown to the user.

use itertools::Itertools;
use tracing::debug;

use crate::config::RiskWeights;
use crate::model::{AssessmentInput, RiskLevel, SafetyAssessment};
use crate::safety::FactorScores;

pub const LOW_RISK_MAX: u8 = 30;
pub const MEDIUM_RISK_MAX: u8 = 60;

/// A factor above this value is named in the threat reason.
const NOTABLE: f64 = 0.5;

const SAFE_REASON: &str = "Safe conditions detected";

const EMERGENCY_ACTIONS: [&str; 5] = [
    "Trigger Alarm",
    "Send SOS to emergency contacts",
    "Flashlight Activation",
    "Move to safer area immediately",
    "Contact local authorities if needed",
];

/// Weighted mean of the factors scaled to 0..=100, rounded half to even.
pub fn aggregate(scores: &FactorScores, weights: &RiskWeights) -> u8 {
    let total_weight = weights.total();
    if total_weight <= 0.0 {
        return 0;
    }
    let weighted: f64 = scores
        .iter()
        .map(|(factor, value)| value * weights.weight(factor))
        .sum();
    // Divide, then scale: x.5 results depend on this order.
    let score = (weighted / total_weight * 100.0).round_ties_even();
    score.clamp(0.0, 100.0) as u8
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=LOW_RISK_MAX => RiskLevel::Low,
            s if s <= MEDIUM_RISK_MAX => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

pub fn threat_reason(scores: &FactorScores) -> String {
    let notable = scores
        .iter()
        .filter(|(_, value)| *value > NOTABLE)
        .map(|(factor, _)| factor.label())
        .join(", ");

    if notable.is_empty() {
        SAFE_REASON.to_string()
    } else {
        format!("Multiple risk factors: {}", notable)
    }
}

pub fn recommended_action(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Continue normal activities. Stay aware of surroundings.",
        RiskLevel::Medium => {
            "Increase vigilance. Consider moving to a safer area or increasing visibility. \
             Contact trusted contacts about your location."
        }
        RiskLevel::High => {
            "Prioritize immediate safety. Move to a well-lit, populated area immediately."
        }
    }
}

pub fn emergency_actions(level: RiskLevel) -> Option<Vec<String>> {
    match level {
        RiskLevel::High => Some(EMERGENCY_ACTIONS.iter().map(|a| a.to_string()).collect()),
        RiskLevel::Low | RiskLevel::Medium => None,
    }
}

/// Full pipeline for one input.
pub fn evaluate(input: &AssessmentInput, weights: &RiskWeights) -> SafetyAssessment {
    let scores = FactorScores::evaluate(input);
    let risk_score = aggregate(&scores, weights);
    let risk_level = RiskLevel::from_score(risk_score);

    debug!(risk_score, %risk_level, "assessment computed");

    SafetyAssessment::new(
        risk_score,
        risk_level,
        threat_reason(&scores),
        recommended_action(risk_level).to_string(),
        emergency_actions(risk_level),
    )
}

/// Holds the weight table so callers can share one engine.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    weights: RiskWeights,
}

impl RiskEngine {
    pub fn new(weights: RiskWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    pub fn evaluate(&self, input: &AssessmentInput) -> SafetyAssessment {
        evaluate(input, &self.weights)
    }
}
