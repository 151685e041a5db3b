/*!
Simulators: stochastic generative models mapping a candidate parameter to synthetic data.

The [`Simulator`] trait is the contract the rejection engine relies on. It is implemented by

- every closure `FnMut(&P) -> D`, which is the usual way to bake experiment constants
  (such as the number of trials) into a simulator, and
- [`BinomialSimulator`], which counts successes among `n_trials` Bernoulli trials.

A simulator must be stochastic and re-invocable: calling it repeatedly with the same
parameter generally yields different data.

# Examples

```rust
use mini_abc::distributions::Seeded;
use mini_abc::simulator::{BinomialSimulator, Simulator};

let mut conversions = BinomialSimulator::new(100).unwrap().set_seed(3);
let k = conversions.simulate(&0.1_f64);
assert!(k <= 100);

// A closure works just as well.
let mut always_two = |_p: &f64| 2_u64;
assert_eq!(always_two.simulate(&0.5), 2);
```
*/

use num_traits::Float;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use std::marker::PhantomData;

use crate::distributions::Seeded;
use crate::error::{AbcError, Result};

/// A generative model producing synthetic data for a candidate parameter `P`.
pub trait Simulator<P> {
    /// The type of the simulated (and observed) data.
    type Data;

    /// Runs the model once for parameter `theta`.
    fn simulate(&mut self, theta: &P) -> Self::Data;
}

impl<P, D, F> Simulator<P> for F
where
    F: FnMut(&P) -> D,
{
    type Data = D;

    fn simulate(&mut self, theta: &P) -> D {
        self(theta)
    }
}

/**
Counts the successes among `n_trials` independent Bernoulli(theta) trials.

Each call draws a single Binomial(n_trials, theta) variate, which has the same law as
summing the individual trials. This is the conversion model of an A/B test: `theta` is
the conversion rate and the result is the number of converted visitors.

`theta` is expected to lie in [0, 1]. Values outside that range saturate: `theta <= 0`
(or NaN) always yields 0 and `theta >= 1` always yields `n_trials`.

# Examples

```rust
use mini_abc::distributions::Seeded;
use mini_abc::simulator::{BinomialSimulator, Simulator};

let mut sim = BinomialSimulator::<f64>::new(40).unwrap().set_seed(1);
assert_eq!(sim.simulate(&0.0), 0);
assert_eq!(sim.simulate(&1.0), 40);
assert!(BinomialSimulator::<f64>::new(0).is_err());
```
*/
#[derive(Debug, Clone)]
pub struct BinomialSimulator<T> {
    /// The number of trials per simulation.
    pub n_trials: u64,
    rng: SmallRng,
    phantom: PhantomData<T>,
}

impl<T> BinomialSimulator<T> {
    /// Creates a simulator running `n_trials` trials per call. Fails if `n_trials` is 0.
    pub fn new(n_trials: u64) -> Result<Self> {
        if n_trials == 0 {
            return Err(AbcError::ZeroTrials);
        }
        Ok(Self {
            n_trials,
            rng: SmallRng::from_entropy(),
            phantom: PhantomData,
        })
    }
}

impl<T> Seeded for BinomialSimulator<T> {
    fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<T: Float> Simulator<T> for BinomialSimulator<T> {
    type Data = u64;

    fn simulate(&mut self, theta: &T) -> u64 {
        let p = theta.to_f64().unwrap_or(f64::NAN);
        if p.is_nan() || p <= 0.0 {
            return 0;
        }
        if p >= 1.0 {
            return self.n_trials;
        }
        Binomial::new(self.n_trials, p)
            .expect("Expected p in (0, 1) to be a valid binomial probability")
            .sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn counts_never_exceed_trials() {
        let mut sim = BinomialSimulator::new(100).unwrap().set_seed(42);
        for i in 0..1_000 {
            let p = i as f64 / 1_000.0;
            assert!(sim.simulate(&p) <= 100);
        }
    }

    #[test]
    fn mean_count_matches_n_times_p() {
        let mut sim = BinomialSimulator::new(100).unwrap().set_seed(7);
        let n_runs = 5_000;
        let total: u64 = (0..n_runs).map(|_| sim.simulate(&0.1_f64)).sum();
        let mean = total as f64 / n_runs as f64;
        assert_abs_diff_eq!(mean, 10.0, epsilon = 0.3);
    }

    #[test]
    fn repeated_calls_are_not_memoized() {
        let mut sim = BinomialSimulator::new(1_000).unwrap().set_seed(9);
        let draws: Vec<u64> = (0..20).map(|_| sim.simulate(&0.5_f32)).collect();
        assert!(draws.iter().any(|&d| d != draws[0]));
    }

    #[test]
    fn out_of_range_parameters_saturate() {
        let mut sim = BinomialSimulator::new(25).unwrap().set_seed(1);
        assert_eq!(sim.simulate(&-0.3_f64), 0);
        assert_eq!(sim.simulate(&f64::NAN), 0);
        assert_eq!(sim.simulate(&1.7_f64), 25);
    }

    #[test]
    fn parameters_next_to_the_bounds_are_sampled() {
        let mut sim = BinomialSimulator::new(25).unwrap().set_seed(2);
        assert!(sim.simulate(&f64::MIN_POSITIVE) <= 25);
        assert!(sim.simulate(&(1.0 - f64::EPSILON)) <= 25);

        let mut sim = BinomialSimulator::new(25).unwrap().set_seed(3);
        assert!(sim.simulate(&f32::MIN_POSITIVE) <= 25);
        assert!(sim.simulate(&(1.0 - f32::EPSILON)) <= 25);
    }

    #[test]
    fn zero_trials_is_rejected() {
        assert_eq!(
            BinomialSimulator::<f64>::new(0).unwrap_err(),
            AbcError::ZeroTrials
        );
    }

    #[test]
    fn closures_are_simulators() {
        let n_visitors = 3;
        let mut sim = |p: &f64| if *p > 0.5 { n_visitors } else { 0 };
        assert_eq!(sim.simulate(&0.9), 3);
        assert_eq!(sim.simulate(&0.1), 0);
    }
}
