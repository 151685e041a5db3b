//! Summaries of posterior samples and sampler diagnostics.
//!
//! The functions here answer the usual questions asked of ABC output: where the posterior
//! mass lies ([`mean`], [`variance`]), how likely the parameter exceeds a threshold
//! ([`fraction_above`]), and how likely one parameter exceeds another ([`prob_greater`]).
//! All of them return `None` for inputs too small to summarize.

use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive};

/// Proposal and acceptance counters of a single chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainStats {
    pub n_proposed: u64,
    pub n_accepted: u64,
    pub acceptance_rate: f64,
}

/// Sample mean.
pub fn mean<T: Float + FromPrimitive>(samples: &[T]) -> Option<T> {
    ArrayView1::from(samples).mean()
}

/**
Unbiased sample variance (`ddof = 1`). Needs at least two samples.

# Examples

```rust
use mini_abc::stats::variance;

assert_eq!(variance(&[1.0, 3.0]), Some(2.0));
assert_eq!(variance(&[1.0]), None);
```
*/
pub fn variance<T: Float + FromPrimitive>(samples: &[T]) -> Option<T> {
    if samples.len() < 2 {
        return None;
    }
    Some(ArrayView1::from(samples).var(T::one()))
}

/**
Fraction of samples strictly greater than `threshold`.

# Examples

```rust
use mini_abc::stats::fraction_above;

let samples = [0.02, 0.05, 0.12, 0.08];
assert_eq!(fraction_above(&samples, 0.1), Some(0.25));
```
*/
pub fn fraction_above<T: PartialOrd>(samples: &[T], threshold: T) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let above = samples.iter().filter(|&x| *x > threshold).count();
    Some(above as f64 / samples.len() as f64)
}

/**
Fraction of index-aligned pairs `(a[i], b[i])` with `b[i] > a[i]`.

With independent posterior samples for two parameters this estimates the posterior
probability that the second parameter is larger. Only the first `min(a.len(), b.len())`
pairs are compared.

# Examples

```rust
use mini_abc::stats::prob_greater;

let a = [0.04, 0.05, 0.06];
let b = [0.05, 0.04, 0.07, 0.99];
assert_eq!(prob_greater(&a, &b), Some(2.0 / 3.0));
```
*/
pub fn prob_greater<T: PartialOrd>(a: &[T], b: &[T]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        return None;
    }
    let wins = a.iter().zip(b).filter(|(x, y)| y > x).count();
    Some(wins as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mean_and_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(mean(&xs).unwrap(), 2.5);
        assert_abs_diff_eq!(variance(&xs).unwrap(), 5.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_inputs_have_no_summary() {
        let empty: [f64; 0] = [];
        assert_eq!(mean(&empty), None);
        assert_eq!(variance(&[1.0_f32]), None);
        assert_eq!(variance::<f64>(&[]), None);
        assert_eq!(fraction_above(&empty, 0.5), None);
        assert_eq!(prob_greater(&empty, &[1.0]), None);
    }

    #[test]
    fn variance_of_constant_samples_is_zero() {
        let xs = [0.25_f32; 8];
        assert_eq!(mean(&xs), Some(0.25));
        assert_eq!(variance(&xs), Some(0.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let xs = [0.1_f32, 0.1, 0.2, 0.05];
        assert_eq!(fraction_above(&xs, 0.1), Some(0.25));
    }

    #[test]
    fn ties_do_not_count_as_wins() {
        let a = [1, 2, 3, 4];
        let b = [1, 3, 3, 5];
        assert_eq!(prob_greater(&a, &b), Some(0.5));
    }
}
