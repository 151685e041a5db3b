/*!
# ABC Rejection Sampler

This module implements Approximate Bayesian Computation by rejection. Given

- a prior: any [`Iterator`] of candidate parameters (see [`crate::distributions`]),
- a simulator: anything implementing [`Simulator`] (see [`crate::simulator`]), and
- the observed data,

[`PosteriorSampler`] is itself an [`Iterator`] over posterior samples. Each call to
`next` draws candidates from the prior and runs the simulator on each of them until the
simulated data matches the observed data; the matching candidate is returned. Nothing is
drawn or simulated before the first call to `next`.

If the prior ends, the posterior ends too. Otherwise the sequence is infinite and a
single `next` may take arbitrarily long when the data is unlikely under the prior.

## Matching precondition

By default a candidate is accepted only if simulated and observed data are *exactly*
equal ([`ExactMatch`]). This is efficient for discrete, low-cardinality data such as
counts. For continuous or high-cardinality data the acceptance probability collapses
towards zero and the sampler never productively yields. Callers who need a different
criterion can plug in any [`Acceptance`] predicate with
[`PosteriorSampler::with_acceptance`].

## Multiple chains

[`RejectionSampler`] owns several independently seeded posterior samplers and runs them
in parallel through [`crate::core::ChainRunner`].

## Example Usage

```rust
use mini_abc::core::take;
use mini_abc::distributions::{Seeded, UniformPrior};
use mini_abc::rejection::PosteriorSampler;
use mini_abc::simulator::BinomialSimulator;

// 4 conversions out of 100 visitors, flat prior on the conversion rate.
let prior = UniformPrior::<f64>::new().set_seed(42);
let simulator = BinomialSimulator::new(100).unwrap().set_seed(43);
let mut posterior = PosteriorSampler::new(4, prior, simulator);

let samples = take(100, &mut posterior);
assert_eq!(samples.len(), 100);
assert!(posterior.n_proposed() >= 100);
```
*/

use rand::{thread_rng, Rng};
use std::iter::FusedIterator;

use crate::core::{HasChains, PosteriorChain};
use crate::distributions::Seeded;
use crate::error::{AbcError, Result};
use crate::simulator::Simulator;

/// Decides whether simulated data is close enough to the observed data.
pub trait Acceptance<D: ?Sized> {
    /// Returns `true` if the candidate that produced `simulated` should be accepted.
    fn accept(&self, simulated: &D, observed: &D) -> bool;
}

/// Accepts a candidate only if its simulated data equals the observed data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl<D: PartialEq + ?Sized> Acceptance<D> for ExactMatch {
    fn accept(&self, simulated: &D, observed: &D) -> bool {
        simulated == observed
    }
}

impl<D: ?Sized, F> Acceptance<D> for F
where
    F: Fn(&D, &D) -> bool,
{
    fn accept(&self, simulated: &D, observed: &D) -> bool {
        self(simulated, observed)
    }
}

/**
A lazy sequence of samples from the ABC posterior.

# Type Parameters
- `D`: The type of the observed (and simulated) data.
- `P`: The prior iterator.
- `S`: The simulator. Must implement [`Simulator<P::Item, Data = D>`](Simulator).
- `A`: The acceptance predicate, [`ExactMatch`] unless replaced.

The sampler only counts its work; it never keeps rejected candidates or data around.
Building a fresh sampler restarts inference.
*/
#[derive(Debug, Clone)]
pub struct PosteriorSampler<D, P, S, A = ExactMatch> {
    observed: D,
    prior: P,
    simulator: S,
    acceptance: A,
    n_proposed: u64,
    n_accepted: u64,
    exhausted: bool,
}

impl<D, P, S> PosteriorSampler<D, P, S, ExactMatch>
where
    P: Iterator,
    S: Simulator<P::Item, Data = D>,
{
    /**
    Creates a posterior sampler conditioned on `observed`.

    No candidate is drawn and the simulator is not called until the first sample is
    requested.

    # Arguments

    * `observed` - The observed data.
    * `prior` - The prior: anything that can be turned into an iterator of parameters.
    * `simulator` - The generative model mapping a parameter to simulated data.
    */
    pub fn new<I>(observed: D, prior: I, simulator: S) -> Self
    where
        I: IntoIterator<IntoIter = P>,
    {
        log::debug!("created posterior sampler");
        Self {
            observed,
            prior: prior.into_iter(),
            simulator,
            acceptance: ExactMatch,
            n_proposed: 0,
            n_accepted: 0,
            exhausted: false,
        }
    }
}

impl<D, P, S, A> PosteriorSampler<D, P, S, A> {
    /**
    Replaces the acceptance predicate.

    # Examples

    ```rust
    use mini_abc::core::take;
    use mini_abc::rejection::PosteriorSampler;

    // Accept any candidate whose simulated value is within 1 of the observation.
    let prior = vec![1_i64, 5, 9, 11, 20];
    let posterior = PosteriorSampler::new(10_i64, prior, |p: &i64| *p)
        .with_acceptance(|sim: &i64, obs: &i64| (sim - obs).abs() <= 1);
    assert_eq!(take(10, posterior), vec![9, 11]);
    ```
    */
    pub fn with_acceptance<B>(self, acceptance: B) -> PosteriorSampler<D, P, S, B>
    where
        B: Acceptance<D>,
    {
        PosteriorSampler {
            observed: self.observed,
            prior: self.prior,
            simulator: self.simulator,
            acceptance,
            n_proposed: self.n_proposed,
            n_accepted: self.n_accepted,
            exhausted: self.exhausted,
        }
    }

    /// The data this sampler is conditioned on.
    pub fn observed(&self) -> &D {
        &self.observed
    }

    /// Number of prior candidates drawn so far.
    pub fn n_proposed(&self) -> u64 {
        self.n_proposed
    }

    /// Number of candidates accepted so far.
    pub fn n_accepted(&self) -> u64 {
        self.n_accepted
    }
}

impl<D, P, S, A> Seeded for PosteriorSampler<D, P, S, A>
where
    P: Seeded,
    S: Seeded,
{
    /// Seeds the prior with `seed` and the simulator with `seed + 1`.
    fn set_seed(self, seed: u64) -> Self {
        Self {
            prior: self.prior.set_seed(seed),
            simulator: self.simulator.set_seed(seed.wrapping_add(1)),
            ..self
        }
    }
}

impl<D, P, S, A> Iterator for PosteriorSampler<D, P, S, A>
where
    P: Iterator,
    S: Simulator<P::Item, Data = D>,
    A: Acceptance<D>,
{
    type Item = P::Item;

    fn next(&mut self) -> Option<P::Item> {
        if self.exhausted {
            return None;
        }
        for theta in self.prior.by_ref() {
            self.n_proposed += 1;
            let simulated = self.simulator.simulate(&theta);
            if self.acceptance.accept(&simulated, &self.observed) {
                self.n_accepted += 1;
                log::trace!(
                    "accepted sample {} after {} proposals",
                    self.n_accepted,
                    self.n_proposed
                );
                return Some(theta);
            }
        }
        log::debug!(
            "prior exhausted after {} proposals, {} accepted",
            self.n_proposed,
            self.n_accepted
        );
        self.exhausted = true;
        None
    }
}

impl<D, P, S, A> FusedIterator for PosteriorSampler<D, P, S, A>
where
    P: Iterator,
    S: Simulator<P::Item, Data = D>,
    A: Acceptance<D>,
{
}

impl<D, P, S, A> PosteriorChain<P::Item> for PosteriorSampler<D, P, S, A>
where
    P: Iterator,
    S: Simulator<P::Item, Data = D>,
    A: Acceptance<D>,
{
    fn n_proposed(&self) -> u64 {
        self.n_proposed
    }

    fn n_accepted(&self) -> u64 {
        self.n_accepted
    }
}

/**
Several independent ABC posterior samplers run side by side.

Each chain owns a clone of the prior and the simulator. A global seed is kept; chain `i`
seeds its prior with `seed + 2i` and its simulator with `seed + 2i + 1`, so every random
stream in the sampler is distinct and runs are reproducible.

# Examples

```rust
use mini_abc::core::ChainRunner;
use mini_abc::distributions::UniformPrior;
use mini_abc::rejection::RejectionSampler;
use mini_abc::simulator::BinomialSimulator;

let prior = UniformPrior::<f64>::new();
let simulator = BinomialSimulator::new(100).unwrap();
let mut sampler = RejectionSampler::new(4, prior, simulator, 2).unwrap().set_seed(42);

let samples = sampler.run(50).unwrap();
assert_eq!(samples.shape(), &[2, 50]);
```
*/
#[derive(Debug, Clone)]
pub struct RejectionSampler<D, P, S, A = ExactMatch> {
    /// The independent posterior chains.
    pub chains: Vec<PosteriorSampler<D, P, S, A>>,
    /// The global random seed.
    pub seed: u64,
}

impl<D, P, S> RejectionSampler<D, P, S, ExactMatch>
where
    D: Clone,
    P: Iterator + Clone + Seeded,
    S: Simulator<P::Item, Data = D> + Clone + Seeded,
{
    /**
    Creates `n_chains` posterior samplers sharing the observed data, prior and simulator
    configuration, seeded from a random global seed.

    Fails with [`AbcError::ZeroChains`] if `n_chains` is 0.
    */
    pub fn new(observed: D, prior: P, simulator: S, n_chains: usize) -> Result<Self> {
        if n_chains == 0 {
            return Err(AbcError::ZeroChains);
        }
        let chains = (0..n_chains)
            .map(|_| PosteriorSampler::new(observed.clone(), prior.clone(), simulator.clone()))
            .collect();
        let seed = thread_rng().gen::<u64>();
        log::debug!("created rejection sampler with {n_chains} chains");
        Ok(Self { chains, seed }.set_seed(seed))
    }
}

impl<D, P, S, A> RejectionSampler<D, P, S, A> {
    /// Replaces the acceptance predicate of every chain.
    pub fn with_acceptance<B>(self, acceptance: B) -> RejectionSampler<D, P, S, B>
    where
        B: Acceptance<D> + Clone,
    {
        RejectionSampler {
            chains: self
                .chains
                .into_iter()
                .map(|chain| chain.with_acceptance(acceptance.clone()))
                .collect(),
            seed: self.seed,
        }
    }
}

impl<D, P, S, A> RejectionSampler<D, P, S, A>
where
    P: Seeded,
    S: Seeded,
{
    /**
    Sets a new global seed and re-seeds every chain from it.

    # Examples

    ```rust
    use mini_abc::distributions::UniformPrior;
    use mini_abc::rejection::RejectionSampler;
    use mini_abc::simulator::BinomialSimulator;

    let prior = UniformPrior::<f64>::new();
    let simulator = BinomialSimulator::new(10).unwrap();
    let sampler = RejectionSampler::new(1, prior, simulator, 3).unwrap().set_seed(7);
    assert_eq!(sampler.seed, 7);
    ```
    */
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.chains = self
            .chains
            .into_iter()
            .enumerate()
            .map(|(i, chain)| chain.set_seed(seed.wrapping_add(2 * i as u64)))
            .collect();
        self
    }
}

impl<D, P, S, A> HasChains<P::Item> for RejectionSampler<D, P, S, A>
where
    D: Send,
    P: Iterator + Send,
    S: Simulator<P::Item, Data = D> + Send,
    A: Acceptance<D> + Send,
{
    type Chain = PosteriorSampler<D, P, S, A>;

    fn chains(&self) -> &[Self::Chain] {
        &self.chains
    }

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}
