use thiserror::Error;

/// Precondition violations raised by the derivation algorithms.
///
/// These are fatal for the single derivation call that raised them, never
/// for a whole chart assembly: the assembly policy logs the error and
/// omits the affected parameter, exactly as it treats a missing series.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("phenomenon '{name}' has {found} points but at least {needed} are required")]
    TooFewPoints {
        name: String,
        needed: usize,
        found: usize,
    },

    #[error("phenomenon '{name}' contains interval items; this derivation requires instantaneous items only")]
    NotInstantaneous { name: String },

    #[error("phenomenon '{name}' is not a numeric series")]
    NotNumeric { name: String },

    #[error("spline precision must be greater than zero")]
    InvalidPrecision,
}
