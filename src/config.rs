use std::collections::{BTreeMap, HashMap};
use std::env;

use crate::error::ConfigError;
use crate::model::Factor;

/// Relative importance of each factor. Built once at startup and handed to
/// the engine by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskWeights {
    weights: BTreeMap<Factor, f64>,
}

impl Default for RiskWeights {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Factor::TimeOfDay, 15.0),
            (Factor::CrowdDensity, 15.0),
            (Factor::CrimeHistory, 25.0),
            (Factor::NetworkAvailability, 10.0),
            (Factor::MovementSpeed, 20.0),
            (Factor::GpsValidity, 15.0),
        ]);
        Self { weights }
    }
}

impl RiskWeights {
    /// Requires every factor, each weight finite and >= 0, and a positive,
    /// finite sum.
    pub fn new(weights: BTreeMap<Factor, f64>) -> Result<Self, ConfigError> {
        for factor in Factor::ALL {
            match weights.get(&factor) {
                None => return Err(ConfigError::MissingFactor(factor.key())),
                Some(w) if !w.is_finite() || *w < 0.0 => {
                    return Err(ConfigError::InvalidWeight(factor.key().to_string()));
                }
                Some(_) => {}
            }
        }
        let total = weights.values().sum::<f64>();
        if !total.is_finite() {
            return Err(ConfigError::WeightSumOverflow);
        }
        if total <= 0.0 {
            return Err(ConfigError::ZeroWeights);
        }
        Ok(Self { weights })
    }

    /// Defaults with the named factors replaced, e.g. `{"crime_history": 40}`.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Result<Self, ConfigError> {
        let mut weights = Self::default().weights;
        for (key, value) in overrides {
            let factor =
                Factor::from_key(key).ok_or_else(|| ConfigError::UnknownFactor(key.clone()))?;
            weights.insert(factor, *value);
        }
        Self::new(weights)
    }

    pub fn weight(&self, factor: Factor) -> f64 {
        self.weights.get(&factor).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Service settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub weights: RiskWeights,
    pub history_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => 5000,
        };
        let weights = match lookup("SAFETY_WEIGHTS") {
            Some(raw) => {
                let overrides: HashMap<String, f64> = serde_json::from_str(&raw)?;
                RiskWeights::with_overrides(&overrides)?
            }
            None => RiskWeights::default(),
        };
        let history_limit = match lookup("HISTORY_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidHistoryLimit(raw.clone()))?,
            None => DEFAULT_HISTORY_LIMIT,
        };
        Ok(Self {
            host,
            port,
            weights,
            history_limit,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
