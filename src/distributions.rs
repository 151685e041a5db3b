/*!
Prior samplers over a probability-valued parameter.

A prior sampler is simply an infinite [`Iterator`] of candidate parameter values; the
rejection engine in [`crate::rejection`] accepts any iterator, so custom priors need no
extra trait. This module provides the two priors used for conversion-rate problems:

- [`UniformPrior`]: i.i.d. Uniform[0, 1) draws.
- [`TruncatedNormalPrior`]: Normal(mean, std_dev) draws restricted to [0, 1].

Both own a [`SmallRng`] and implement [`Seeded`], so runs can be reproduced and
parallel chains can be given independent streams.

This module is generic over the floating-point precision (e.g., `f32` or `f64`) using
the [`num_traits::Float`] trait.

# Examples

```rust
use mini_abc::distributions::{Seeded, TruncatedNormalPrior, UniformPrior};

let uniform: Vec<f64> = UniformPrior::new().set_seed(42).take(3).collect();
assert!(uniform.iter().all(|p| (0.0..1.0).contains(p)));

let normal = TruncatedNormalPrior::new(0.06, 0.02).unwrap().set_seed(42);
let draws: Vec<f64> = normal.take(3).collect();
assert!(draws.iter().all(|p| (0.0..=1.0).contains(p)));
```
*/

use num_traits::Float;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Standard, StandardNormal};
use std::marker::PhantomData;

use crate::error::{AbcError, Result};

/// Components that own a random number generator and can be re-seeded.
pub trait Seeded {
    /// Returns this instance with its random number generator seeded with `seed`.
    fn set_seed(self, seed: u64) -> Self;
}

/**
A uniform prior over [0, 1).

Every call to [`Iterator::next`] draws a fresh value; the sequence never ends.

# Examples

```rust
use mini_abc::core::take;
use mini_abc::distributions::{Seeded, UniformPrior};

let draws: Vec<f32> = take(5, UniformPrior::new().set_seed(7));
assert_eq!(draws.len(), 5);
```
*/
#[derive(Debug, Clone)]
pub struct UniformPrior<T> {
    rng: SmallRng,
    phantom: PhantomData<T>,
}

impl<T> UniformPrior<T> {
    /// Creates a uniform prior with an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            phantom: PhantomData,
        }
    }
}

impl<T> Default for UniformPrior<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Seeded for UniformPrior<T> {
    fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<T> Iterator for UniformPrior<T>
where
    Standard: Distribution<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        Some(self.rng.gen())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/**
A Normal(mean, std_dev) prior truncated to the closed interval [0, 1].

Draws outside the interval are discarded and redrawn, so each value costs an
almost-surely finite number of normal variates. Construction only checks that the
parameters describe a proper normal distribution. A mean far outside [0, 1] combined
with a tiny standard deviation is accepted but makes the sampler extremely slow,
possibly to the point of never yielding in practice.

# Examples

```rust
use mini_abc::distributions::{Seeded, TruncatedNormalPrior};

let prior = TruncatedNormalPrior::new(0.06, 0.02).unwrap().set_seed(1);
assert_eq!(prior.mean(), 0.06);
assert!(TruncatedNormalPrior::new(0.5, -1.0).is_err());
```
*/
#[derive(Debug, Clone)]
pub struct TruncatedNormalPrior<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    mean: T,
    std_dev: T,
    normal: Normal<T>,
    rng: SmallRng,
}

impl<T> TruncatedNormalPrior<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    /// Creates a truncated normal prior with an entropy-seeded generator.
    ///
    /// Fails if `mean` is not finite or if `std_dev` is not finite and strictly positive.
    pub fn new(mean: T, std_dev: T) -> Result<Self> {
        if !mean.is_finite() {
            return Err(AbcError::InvalidMean(mean.to_f64().unwrap_or(f64::NAN)));
        }
        let invalid_std = || AbcError::InvalidStdDev(std_dev.to_f64().unwrap_or(f64::NAN));
        if !std_dev.is_finite() || std_dev <= T::zero() {
            return Err(invalid_std());
        }
        let normal = Normal::new(mean, std_dev).map_err(|_| invalid_std())?;
        log::debug!(
            "truncated normal prior: mean={:?}, std_dev={:?}",
            mean.to_f64(),
            std_dev.to_f64()
        );
        Ok(Self {
            mean,
            std_dev,
            normal,
            rng: SmallRng::from_entropy(),
        })
    }

    /// Mean of the untruncated normal.
    pub fn mean(&self) -> T {
        self.mean
    }

    /// Standard deviation of the untruncated normal.
    pub fn std_dev(&self) -> T {
        self.std_dev
    }
}

impl<T> Seeded for TruncatedNormalPrior<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<T> Iterator for TruncatedNormalPrior<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let x = self.normal.sample(&mut self.rng);
            if x >= T::zero() && x <= T::one() {
                return Some(x);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
