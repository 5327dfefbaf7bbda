use crate::derivation::error::DeriveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteogramError {
    #[error(transparent)]
    Derive(#[from] DeriveError),
}
