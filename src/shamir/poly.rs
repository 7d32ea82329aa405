//! Polynomial share generation and Lagrange reconstruction.

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use super::{ShamirError, ShamirResult};

/// One share: the evaluation point and the polynomial value there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    /// Evaluation point, 1-based.
    pub x: u32,
    /// Polynomial value at `x`, reduced mod the field prime.
    pub value: BigUint,
}

/// Split a secret into `available` shares, any `needed` of which
/// reconstruct it.
///
/// The constant coefficient is the secret itself; the remaining `needed−1`
/// coefficients are drawn uniformly below the prime and then reduced
/// modulo the secret (the preserved legacy quirk — see the module docs).
///
/// # Errors
/// [`ShamirError::SecretZero`] for a zero secret,
/// [`ShamirError::IllegalPieceCount`] unless `2 ≤ needed ≤ available`.
pub fn split<R: RngCore + CryptoRng>(
    secret: &BigUint,
    needed: u32,
    available: u32,
    prime: &BigUint,
    rng: &mut R,
) -> ShamirResult<Vec<Share>> {
    if secret.is_zero() {
        return Err(ShamirError::SecretZero);
    }
    if needed < 2 || available < needed {
        return Err(ShamirError::IllegalPieceCount {
            min: needed,
            total: available,
        });
    }

    let mut coefficients = Vec::with_capacity(needed as usize);
    coefficients.push(secret.clone());
    for _ in 1..needed {
        coefficients.push(rng.gen_biguint_below(prime) % secret);
    }

    let shares = (1..=available)
        .map(|x| {
            let point = BigUint::from(x);
            // Horner evaluation, reduced at every step.
            let mut value = BigUint::zero();
            for coefficient in coefficients.iter().rev() {
                value = (value * &point + coefficient) % prime;
            }
            Share { x, value }
        })
        .collect();

    Ok(shares)
}

/// Modular inverse in a prime field, via Fermat's little theorem.
fn mod_inverse(value: &BigInt, prime: &BigInt) -> BigInt {
    let exponent = prime - BigInt::from(2);
    value.modpow(&exponent, prime)
}

/// Reconstruct the secret from shares by Lagrange interpolation at zero.
///
/// Every supplied share participates; the caller is responsible for
/// passing a subset that actually determines the polynomial. Too few or
/// mismatched shares interpolate to a well-defined but wrong value rather
/// than an error.
#[must_use]
pub fn combine(shares: &[Share], prime: &BigUint) -> BigUint {
    let prime = BigInt::from(prime.clone());
    let mut accumulator = BigInt::zero();

    for (i, share) in shares.iter().enumerate() {
        let x_i = BigInt::from(share.x);
        let mut numerator = BigInt::one();
        let mut denominator = BigInt::one();
        for (j, other) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let x_j = BigInt::from(other.x);
            numerator = (numerator * -&x_j).mod_floor(&prime);
            denominator = (denominator * (&x_i - &x_j)).mod_floor(&prime);
        }

        let term =
            BigInt::from(share.value.clone()) * numerator * mod_inverse(&denominator, &prime);
        accumulator = (accumulator + term).mod_floor(&prime);
    }

    accumulator
        .to_biguint()
        .expect("floor-reduced accumulator is non-negative")
}
