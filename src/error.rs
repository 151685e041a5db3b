//! Errors raised while configuring priors, simulators and samplers.
//!
//! Drawing from a sampler never fails; only construction and the multi-chain
//! runner (which must return a rectangular array) report errors.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbcError {
    /// The standard deviation of a prior must be finite and strictly positive.
    #[error("invalid standard deviation {0}: expected a finite value > 0")]
    InvalidStdDev(f64),

    /// The mean of a prior must be finite.
    #[error("invalid mean {0}: expected a finite value")]
    InvalidMean(f64),

    /// A simulator needs at least one trial to produce meaningful data.
    #[error("number of trials must be at least 1")]
    ZeroTrials,

    /// A multi-chain sampler needs at least one chain.
    #[error("number of chains must be at least 1")]
    ZeroChains,

    /// A chain's prior ran out before the requested number of samples was accepted.
    #[error("chain {chain} produced {produced} of {requested} requested samples before its prior was exhausted")]
    ChainExhausted {
        chain: usize,
        produced: usize,
        requested: usize,
    },
}

pub type Result<T> = std::result::Result<T, AbcError>;
