//! Tile-bag combinatorics.
//!
//! - [`factorial`] / [`multinomial_coefficient`]: checked integer helpers
//! - [`draw`]: probability distribution over the multisets a round can draw
//! - [`arrangement`]: distinguishable orderings of a drawn multiset

pub mod arrangement;
pub mod draw;

pub use arrangement::{enumerate_arrangements, Arrangement};
pub use draw::{enumerate_draws, DrawOutcome};

use crate::core::{Error, Result};

/// `n!` for `n >= 0`.
///
/// Fails with [`Error::NegativeFactorial`] for negative input and with
/// [`Error::ArithmeticOverflow`] above `34!`.
pub fn factorial(n: i64) -> Result<u128> {
    if n < 0 {
        return Err(Error::NegativeFactorial { n });
    }
    (2..=n as u128).try_fold(1u128, |acc, k| {
        acc.checked_mul(k)
            .ok_or_else(|| Error::overflow(format!("{}!", n)))
    })
}

/// `(Σ counts)! / Π counts_i!`.
///
/// Built as a product of binomials so intermediate values stay far below the
/// full factorial.
pub fn multinomial_coefficient(counts: &[u32]) -> Result<u128> {
    let mut result: u128 = 1;
    let mut running: u128 = 0;
    for &count in counts {
        for k in 1..=u128::from(count) {
            running += 1;
            // result * C(running, k) stays integral at every step.
            result = result
                .checked_mul(running)
                .ok_or_else(|| Error::overflow(format!("multinomial{:?}", counts)))?
                / k;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial_small() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(1).unwrap(), 1);
        assert_eq!(factorial(5).unwrap(), 120);
        assert_eq!(factorial(10).unwrap(), 3_628_800);
    }

    #[test]
    fn test_factorial_limits() {
        assert!(factorial(34).is_ok());
        assert!(matches!(factorial(35), Err(Error::ArithmeticOverflow { .. })));
        assert!(matches!(factorial(-1), Err(Error::NegativeFactorial { n: -1 })));
    }

    #[test]
    fn test_multinomial() {
        assert_eq!(multinomial_coefficient(&[]).unwrap(), 1);
        assert_eq!(multinomial_coefficient(&[4]).unwrap(), 1);
        assert_eq!(multinomial_coefficient(&[2, 2]).unwrap(), 6);
        assert_eq!(multinomial_coefficient(&[3, 1]).unwrap(), 4);
        assert_eq!(multinomial_coefficient(&[1, 1, 1]).unwrap(), 6);
        assert_eq!(multinomial_coefficient(&[0, 2, 0, 0, 2]).unwrap(), 6);
    }

    #[test]
    fn test_multinomial_matches_factorials() {
        let counts = [3u32, 5, 2, 4];
        let n: u32 = counts.iter().sum();
        let expected = factorial(i64::from(n)).unwrap()
            / counts
                .iter()
                .map(|&c| factorial(i64::from(c)).unwrap())
                .product::<u128>();
        assert_eq!(multinomial_coefficient(&counts).unwrap(), expected);
    }
}
