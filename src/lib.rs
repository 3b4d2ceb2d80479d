//! Personal safety risk scoring: six situational factors weighted into a
//! 0-100 score, a Low/Medium/High level and advice text, plus the HTTP
//! service that exposes it.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod safety;

pub use config::{AppConfig, RiskWeights};
pub use engine::{RiskEngine, evaluate};
pub use error::{AssessError, ConfigError};
pub use model::{AssessmentInput, CrowdDensity, Factor, RiskLevel, SafetyAssessment};
pub use safety::FactorScores;
