/*!
# Core Utilities.

This module provides the pieces shared by every sampler in the crate:
- [`take`], which materializes the first `n` items of any lazy sequence.
- The [`PosteriorChain<T>`] trait, which abstracts a single lazy posterior sequence that
  reports how much work it has done.
- [`run_chain`] and [`run_chain_progress`] for pulling a fixed number of samples out of
  one chain.
- The [`HasChains<T>`] trait for types that own several independent chains.
- The [`ChainRunner<T>`] trait that extends [`HasChains<T>`] with methods to run the chains
  in parallel (using Rayon), optionally displaying progress bars.

Any type implementing [`HasChains<T>`] automatically implements [`ChainRunner<T>`] via a
blanket implementation.
*/

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{AbcError, Result};
use crate::stats::ChainStats;

/// How many accepted samples pass between two refreshes of a progress bar message.
const PROGRESS_REFRESH: usize = 100;

/**
Returns the first `n` items produced by `iterable`, in order.

If the sequence ends before producing `n` items, the returned vector is shorter; callers
that need exactly `n` items must check its length. Pass `&mut sampler` to keep using a
sampler afterwards.

# Examples

```rust
use mini_abc::core::take;

assert_eq!(take(3, 1..), vec![1, 2, 3]);
assert_eq!(take(5, vec!['a', 'b']), vec!['a', 'b']);

let mut numbers = 0..10;
assert_eq!(take(2, &mut numbers), vec![0, 1]);
assert_eq!(numbers.next(), Some(2));
```
*/
pub fn take<I: IntoIterator>(n: usize, iterable: I) -> Vec<I::Item> {
    iterable.into_iter().take(n).collect()
}

/// A lazy sequence of posterior samples.
///
/// Besides yielding samples, a chain keeps count of the candidates it proposed and
/// accepted so far.
pub trait PosteriorChain<T>: Iterator<Item = T> {
    /// Number of prior candidates drawn so far.
    fn n_proposed(&self) -> u64;

    /// Number of candidates accepted (i.e., samples yielded) so far.
    fn n_accepted(&self) -> u64;

    /// Fraction of proposals that were accepted, or 0 before the first proposal.
    fn acceptance_rate(&self) -> f64 {
        match self.n_proposed() {
            0 => 0.0,
            n => self.n_accepted() as f64 / n as f64,
        }
    }

    /// Snapshot of the chain's counters.
    fn stats(&self) -> ChainStats {
        ChainStats {
            n_proposed: self.n_proposed(),
            n_accepted: self.n_accepted(),
            acceptance_rate: self.acceptance_rate(),
        }
    }
}

/// Pulls up to `n_collect` samples from a single chain.
///
/// The result is shorter than `n_collect` only if the chain ends early.
pub fn run_chain<T, C>(chain: &mut C, n_collect: usize) -> Vec<T>
where
    C: PosteriorChain<T>,
{
    take(n_collect, chain)
}

/// Pulls up to `n_collect` samples from a single chain while updating `pb`.
///
/// The progress bar advances once per accepted sample and its message shows the
/// running acceptance rate.
pub fn run_chain_progress<T, C>(chain: &mut C, n_collect: usize, pb: &ProgressBar) -> Vec<T>
where
    C: PosteriorChain<T>,
{
    pb.set_length(n_collect as u64);
    let mut out = Vec::with_capacity(n_collect);

    for i in 0..n_collect {
        match chain.next() {
            Some(sample) => out.push(sample),
            None => break,
        }
        pb.inc(1);
        if i % PROGRESS_REFRESH == 0 || i + 1 == n_collect {
            pb.set_message(format!("p(accept)={:.4}", chain.acceptance_rate()));
        }
    }

    out
}

/// Stacks per-chain sample vectors into an `[n_chains, n_collect]` array.
fn stack_chains<T>(samples: Vec<Vec<T>>, n_collect: usize) -> Result<Array2<T>> {
    let n_chains = samples.len();
    if let Some((chain, short)) = samples
        .iter()
        .enumerate()
        .find(|(_, s)| s.len() != n_collect)
    {
        return Err(AbcError::ChainExhausted {
            chain,
            produced: short.len(),
            requested: n_collect,
        });
    }
    let flat: Vec<T> = samples.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((n_chains, n_collect), flat)
        .expect("Expected equal-length chains to stack into a rectangular array"))
}

/// A trait for types that own multiple independent posterior chains.
///
/// - `T` is the parameter type (e.g. `f64`).
/// - `Chain` is the concrete chain type, which must implement [`PosteriorChain<T>`] and be
///   [`Send`].
pub trait HasChains<T> {
    type Chain: PosteriorChain<T> + Send;

    /// Returns the chains.
    fn chains(&self) -> &[Self::Chain];

    /// Returns a mutable reference to the vector of chains.
    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

/// Runs all chains of a [`HasChains`] implementor in parallel.
pub trait ChainRunner<T>: HasChains<T>
where
    T: Send,
{
    /**
    Pulls `n_collect` posterior samples from every chain in parallel.

    Returns an array of shape `[n_chains, n_collect]`, or
    [`AbcError::ChainExhausted`] if some chain's prior ended before it produced
    `n_collect` samples.
    */
    fn run(&mut self, n_collect: usize) -> Result<Array2<T>> {
        let samples: Vec<Vec<T>> = self
            .chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, n_collect))
            .collect();
        log_chain_stats::<T, _>(self.chains());
        stack_chains(samples, n_collect)
    }

    /// Same as [`ChainRunner::run`], but draws one progress bar per chain.
    fn run_progress(&mut self, n_collect: usize) -> Result<Array2<T>> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        let samples: Vec<Vec<T>> = self
            .chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(n_collect as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let samples = run_chain_progress(chain, n_collect, &pb);

                pb.finish_with_message(format!("Done! p(accept)={:.4}", chain.acceptance_rate()));
                samples
            })
            .collect();
        log_chain_stats::<T, _>(self.chains());
        stack_chains(samples, n_collect)
    }

    /// Per-chain proposal and acceptance counters.
    fn chain_stats(&self) -> Vec<ChainStats> {
        self.chains().iter().map(|chain| chain.stats()).collect()
    }
}

impl<T: Send, H: HasChains<T>> ChainRunner<T> for H {}

fn log_chain_stats<T, C: PosteriorChain<T>>(chains: &[C]) {
    for (i, chain) in chains.iter().enumerate() {
        log::debug!(
            "chain {i}: accepted {} of {} proposals (p(accept)={:.4})",
            chain.n_accepted(),
            chain.n_proposed(),
            chain.acceptance_rate()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A chain over a fixed list that accepts every other proposal.
    struct EveryOther {
        items: std::vec::IntoIter<u32>,
        proposed: u64,
        accepted: u64,
    }

    impl EveryOther {
        fn new(items: Vec<u32>) -> Self {
            Self {
                items: items.into_iter(),
                proposed: 0,
                accepted: 0,
            }
        }
    }

    impl Iterator for EveryOther {
        type Item = u32;

        fn next(&mut self) -> Option<u32> {
            for x in self.items.by_ref() {
                self.proposed += 1;
                if x % 2 == 0 {
                    self.accepted += 1;
                    return Some(x);
                }
            }
            None
        }
    }

    impl PosteriorChain<u32> for EveryOther {
        fn n_proposed(&self) -> u64 {
            self.proposed
        }

        fn n_accepted(&self) -> u64 {
            self.accepted
        }
    }

    struct Pair {
        chains: Vec<EveryOther>,
    }

    impl HasChains<u32> for Pair {
        type Chain = EveryOther;

        fn chains(&self) -> &[EveryOther] {
            &self.chains
        }

        fn chains_mut(&mut self) -> &mut Vec<EveryOther> {
            &mut self.chains
        }
    }

    #[test]
    fn take_returns_prefix_in_order() {
        assert_eq!(take(4, (0..).map(|x| x * 10)), vec![0, 10, 20, 30]);
        assert!(take(0, 0..).is_empty());
    }

    #[test]
    fn take_returns_fewer_when_sequence_ends() {
        assert_eq!(take(10, vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn run_chain_counts_work() {
        let mut chain = EveryOther::new((0..20).collect());
        let samples = run_chain(&mut chain, 3);
        assert_eq!(samples, vec![0, 2, 4]);
        assert_eq!(chain.n_proposed(), 5);
        assert_eq!(chain.n_accepted(), 3);
        assert!((chain.acceptance_rate() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn acceptance_rate_is_zero_before_any_proposal() {
        let chain = EveryOther::new(vec![]);
        assert_eq!(chain.acceptance_rate(), 0.0);
    }

    #[test]
    fn runner_stacks_chains_row_wise() {
        let mut pair = Pair {
            chains: vec![
                EveryOther::new((0..10).collect()),
                EveryOther::new((100..110).collect()),
            ],
        };
        let samples = pair.run(3).unwrap();
        assert_eq!(samples.shape(), &[2, 3]);
        assert_eq!(samples.row(0).to_vec(), vec![0, 2, 4]);
        assert_eq!(samples.row(1).to_vec(), vec![100, 102, 104]);

        let stats = pair.chain_stats();
        assert_eq!(stats[0].n_accepted, 3);
        assert_eq!(stats[1].n_proposed, 5);
    }

    #[test]
    fn runner_with_progress_matches_plain_run() {
        let mut pair = Pair {
            chains: vec![
                EveryOther::new((0..500).collect()),
                EveryOther::new((0..500).collect()),
            ],
        };
        let samples = pair.run_progress(200).unwrap();
        assert_eq!(samples.shape(), &[2, 200]);
        assert_eq!(samples[[1, 199]], 398);
    }

    #[test]
    fn stack_chains_keeps_chain_order() {
        let rows = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let samples = stack_chains(rows, 2).unwrap();
        assert_eq!(samples.shape(), &[3, 2]);
        assert_eq!(samples.column(1).to_vec(), vec![2, 4, 6]);

        let empty = stack_chains::<u32>(vec![vec![], vec![]], 0).unwrap();
        assert_eq!(empty.shape(), &[2, 0]);
    }

    #[test]
    fn runner_reports_exhausted_chain() {
        let mut pair = Pair {
            chains: vec![
                EveryOther::new((0..100).collect()),
                EveryOther::new(vec![2, 3, 4]),
            ],
        };
        let err = pair.run(5).unwrap_err();
        assert_eq!(
            err,
            AbcError::ChainExhausted {
                chain: 1,
                produced: 2,
                requested: 5
            }
        );
    }
}
