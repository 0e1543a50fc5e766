use rv_core::RvError;
use rv_transit::TransitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] RvError),

    #[error("transit error: {0}")]
    Transit(#[from] TransitError),
}

pub type SimResult<T> = Result<T, SimError>;
