use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalmockError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid sampling parameter: {0}")]
    InvalidParameter(String),

    #[error("Distribution function sampling failed: {0}")]
    SamplingFailure(String),

    #[error("Orbit integration failed: {0}")]
    IntegrationFailure(String),

    #[error("Corrupted sample cache file {path}: {reason}")]
    CacheCorruption { path: String, reason: String },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<rand_distr::NormalError> for GalmockError {
    fn from(err: rand_distr::NormalError) -> Self {
        GalmockError::SamplingFailure(format!("invalid normal distribution: {err:?}"))
    }
}

impl From<rand_distr::GammaError> for GalmockError {
    fn from(err: rand_distr::GammaError) -> Self {
        GalmockError::SamplingFailure(format!("invalid gamma distribution: {err:?}"))
    }
}

impl From<tempfile::PersistError> for GalmockError {
    fn from(err: tempfile::PersistError) -> Self {
        GalmockError::IoError(err.error)
    }
}

impl PartialEq for GalmockError {
    fn eq(&self, other: &Self) -> bool {
        use GalmockError::*;
        match (self, other) {
            (InvalidRange(a), InvalidRange(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (SamplingFailure(a), SamplingFailure(b)) => a == b,
            (IntegrationFailure(a), IntegrationFailure(b)) => a == b,
            (
                CacheCorruption { path: pa, reason: ra },
                CacheCorruption { path: pb, reason: rb },
            ) => pa == pb && ra == rb,
            (
                DimensionMismatch {
                    expected: ea,
                    found: fa,
                },
                DimensionMismatch {
                    expected: eb,
                    found: fb,
                },
            ) => ea == eb && fa == fb,
            (DegenerateInput(a), DegenerateInput(b)) => a == b,

            // io errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
