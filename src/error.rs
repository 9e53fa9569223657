use crate::kind::SplineKind;

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, QuadError>;

/// Everything that can go wrong when building a mesh or integrating samples.
///
/// The infinite `r` and Jacobian values at the end of a [`SemiInfiniteMesh`](crate::SemiInfiniteMesh)
/// are not errors. They only become one, [`QuadError::InvalidSamples`], if they reach
/// [`integrate`](crate::integrate) without being replaced by a finite value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadError {
    #[error("arrays do not have the same dimensions: {xs} x-values and {ys} y-values")]
    DimensionMismatch { xs: usize, ys: usize },

    #[error("undefined interpolation type `{0}`, expected one of steffen, akima or cubic")]
    UnsupportedKind(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid samples: {0}")]
    InvalidSamples(#[from] SampleDefect),
}

/// The ways a pair of sample arrays can be unfit for interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SampleDefect {
    #[error("{kind} splines need at least {required} samples, got {found}")]
    TooFew {
        kind: SplineKind,
        required: usize,
        found: usize,
    },

    #[error("x-values must be strictly increasing, violated at index {index}")]
    NotStrictlyIncreasing { index: usize },

    #[error("sample at index {index} is not finite")]
    NonFinite { index: usize },

    #[error("the integral of the samples overflows")]
    IntegralOverflow,
}
