use thiserror::Error;

/// Rejected scalar configuration or input shape. Raised before any computation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Safety distance must be positive, got {0}")]
    NonPositiveSafeDistance(f64),

    #[error("Repulsion strength must lie in (0, 1], got {0}")]
    StrengthOutOfRange(f64),

    #[error("Smoothing factor must be non-negative, got {0}")]
    NegativeSmoothingFactor(f64),

    #[error("Sample count must be at least 2, got {0}")]
    InvalidSampleCount(usize),

    #[error("Spline degree must lie in 1..=5, got {0}")]
    InvalidSplineDegree(usize),

    #[error("Obstacle radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("Invalid workspace bounds: {reason}")]
    InvalidBounds { reason: String },

    #[error("Waypoint sequence is empty")]
    EmptyPath,

    #[error("Waypoint sequence needs at least 2 points, got {0}")]
    PathTooShort(usize),

    #[error("Non-finite value in {field}")]
    NonFiniteValue { field: String },

    #[error("Invalid scenario name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Scenario name '{0}' is used more than once in the batch")]
    DuplicateName(String),
}

/// The smoothing spline could not be fitted to the given waypoints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Spline of degree {degree} needs more than {degree} points, got {count}")]
    TooFewPoints { count: usize, degree: usize },

    #[error("Waypoint {index} coincides with its successor")]
    CoincidentWaypoints { index: usize },

    #[error("Spline normal equations are singular")]
    SingularSystem,

    #[error("Waypoint {index} has a non-finite coordinate")]
    NonFiniteInput { index: usize },
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

impl From<ConfigError> for ApplicationError {
    fn from(e: ConfigError) -> Self {
        ApplicationError::Domain(DomainError::Config(e))
    }
}

impl From<FitError> for ApplicationError {
    fn from(e: FitError) -> Self {
        ApplicationError::Domain(DomainError::Fit(e))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
