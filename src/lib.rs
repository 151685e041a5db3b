/*!
# mini-abc

Approximate Bayesian Computation (ABC) by rejection sampling.

ABC estimates the posterior distribution of a parameter without ever evaluating a
likelihood. All it needs is

1. a **prior**: an infinite [`Iterator`] of candidate parameters
   ([`distributions::UniformPrior`], [`distributions::TruncatedNormalPrior`], or your own),
2. a **simulator**: a stochastic model turning a parameter into synthetic data
   ([`simulator::BinomialSimulator`] or any closure), and
3. the **observed data**.

[`rejection::PosteriorSampler`] then lazily yields the prior candidates whose simulated
data matches the observation. Matching is exact by default, which suits discrete,
low-cardinality data such as counts.

# Example

```rust
use mini_abc::core::take;
use mini_abc::distributions::{Seeded, UniformPrior};
use mini_abc::rejection::PosteriorSampler;
use mini_abc::simulator::BinomialSimulator;
use mini_abc::stats::{fraction_above, mean};

let n_visitors = 100;
let n_conversions = 4;

let prior = UniformPrior::<f64>::new().set_seed(42);
let simulator = BinomialSimulator::new(n_visitors).unwrap().set_seed(43);
let posterior = PosteriorSampler::new(n_conversions, prior, simulator);

let samples = take(1_000, posterior);
let m = mean(&samples).unwrap();
assert!(m > 0.02 && m < 0.09);
assert!(fraction_above(&samples, 0.1).unwrap() < 0.1);
```
*/

pub mod core;
pub mod distributions;
pub mod error;
pub mod io;
pub mod rejection;
pub mod simulator;
pub mod stats;
