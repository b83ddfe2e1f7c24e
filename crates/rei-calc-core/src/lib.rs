pub mod error;
pub mod expenses;
pub mod mortgage;
pub mod types;

#[cfg(feature = "residential")]
pub mod residential;

#[cfg(feature = "commercial")]
pub mod commercial;

#[cfg(feature = "wholesale")]
pub mod wholesale;

#[cfg(feature = "pricing")]
pub mod pricing;

pub use error::ReiCalcError;
pub use types::*;

/// Standard result type for all rei-calc operations
pub type ReiCalcResult<T> = Result<T, ReiCalcError>;
