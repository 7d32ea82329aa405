//! The fixed share-field primes.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::One;

use super::{ShamirError, ShamirResult};

/// NIST P-192 field prime: 2^192 − 2^64 − 1.
pub static PRIME_192: LazyLock<BigUint> = LazyLock::new(|| {
    (BigUint::one() << 192u32) - (BigUint::one() << 64u32) - BigUint::one()
});

/// NIST P-384 field prime: 2^384 − 2^128 − 2^96 + 2^32 − 1.
pub static PRIME_384: LazyLock<BigUint> = LazyLock::new(|| {
    (BigUint::one() << 384u32) - (BigUint::one() << 128u32) - (BigUint::one() << 96u32)
        + (BigUint::one() << 32u32)
        - BigUint::one()
});

/// Mersenne prime 2^4253 − 1, the big tier for long passphrases.
pub static PRIME_LARGE: LazyLock<BigUint> =
    LazyLock::new(|| (BigUint::one() << 4253u32) - BigUint::one());

/// The smallest fixed prime strictly greater than `secret`.
///
/// # Errors
/// [`ShamirError::SecretTooLong`] when the secret reaches the largest
/// prime.
pub fn mod_prime_for_secret(secret: &BigUint) -> ShamirResult<&'static BigUint> {
    if secret < &*PRIME_192 {
        Ok(&*PRIME_192)
    } else if secret < &*PRIME_384 {
        Ok(&*PRIME_384)
    } else if secret < &*PRIME_LARGE {
        Ok(&*PRIME_LARGE)
    } else {
        Err(ShamirError::SecretTooLong)
    }
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;

    use super::*;

    #[test]
    fn test_prime_bit_lengths() {
        assert_eq!(PRIME_192.bits(), 192);
        assert_eq!(PRIME_384.bits(), 384);
        assert_eq!(PRIME_LARGE.bits(), 4253);
    }

    #[test]
    fn test_small_secret_uses_smallest_prime() {
        let secret = BigUint::from(1234u32);
        assert_eq!(mod_prime_for_secret(&secret).unwrap(), &*PRIME_192);
    }

    #[test]
    fn test_selection_is_strictly_greater() {
        // A secret equal to a prime must spill into the next tier.
        assert_eq!(mod_prime_for_secret(&PRIME_192).unwrap(), &*PRIME_384);
        assert_eq!(mod_prime_for_secret(&PRIME_384).unwrap(), &*PRIME_LARGE);
    }

    #[test]
    fn test_256_bit_secret_needs_the_middle_tier() {
        let secret = BigUint::one() << 255u32;
        assert_eq!(mod_prime_for_secret(&secret).unwrap(), &*PRIME_384);
    }

    #[test]
    fn test_oversized_secret_is_rejected() {
        assert!(matches!(
            mod_prime_for_secret(&PRIME_LARGE),
            Err(ShamirError::SecretTooLong)
        ));
        let zero = BigUint::zero();
        assert!(mod_prime_for_secret(&zero).is_ok());
    }
}
