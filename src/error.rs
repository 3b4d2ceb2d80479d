use thiserror::Error;

/// Structural problems with an assessment request. Out-of-range values are
/// not errors; they are scored with a penalty instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessError {
    #[error("malformed input for `{field}`: {reason}")]
    MalformedInput { field: &'static str, reason: String },
}

impl AssessError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        AssessError::MalformedInput {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("weight for `{0}` must be a finite, non-negative number")]
    InvalidWeight(String),

    #[error("unknown risk factor `{0}`")]
    UnknownFactor(String),

    #[error("no weight given for `{0}`")]
    MissingFactor(&'static str),

    #[error("weights must add up to a finite number")]
    WeightSumOverflow,

    #[error("weights must not all be zero")]
    ZeroWeights,

    #[error("invalid PORT value `{0}`")]
    InvalidPort(String),

    #[error("invalid HISTORY_LIMIT value `{0}`")]
    InvalidHistoryLimit(String),

    #[error("SAFETY_WEIGHTS is not a JSON object of numbers: {0}")]
    WeightsFormat(#[from] serde_json::Error),
}
