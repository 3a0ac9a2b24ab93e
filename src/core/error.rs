use thiserror::Error;

/// Errors surfaced to callers of the economy core
///
/// Configuration errors are fatal at construction. Lookup failures only
/// surface from mutation entry points; read queries return fallbacks instead.
#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No resource definitions supplied")]
    MissingResources,

    #[error("No regions supplied")]
    MissingRegions,

    #[error("Duplicate resource definition: {0}")]
    DuplicateResource(String),

    #[error("Duplicate region: {0}")]
    DuplicateRegion(String),

    #[error("Unknown resource '{resource}' referenced by {context}")]
    UnknownResource { resource: String, context: String },

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Region '{region}' cannot afford upgrade (needs {cost}, has {wealth})")]
    InsufficientWealth { region: String, cost: i64, wealth: i64 },

    #[error("Scenario error: {0}")]
    Scenario(#[from] crate::scenario::ScenarioLoadError),
}

pub type Result<T> = std::result::Result<T, EconomyError>;
